// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Domain models and core data structures.
//!
//! This module defines the typed identifiers and records exchanged with the
//! repositories. Identifiers are opaque integers assigned by the store.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlbumId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenreId(pub i64);

/// The primary artist of an album.
///
/// Compilations have no single album artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumArtist {
    Artist(ArtistId),
    Compilation,
}

impl AlbumArtist {
    /// Storage encoding of [`AlbumArtist::Compilation`].
    pub(crate) const COMPILATION_ID: i64 = -2;

    pub fn artist_id(self) -> Option<ArtistId> {
        match self {
            AlbumArtist::Artist(id) => Some(id),
            AlbumArtist::Compilation => None,
        }
    }
}

/// Values for a track about to be inserted.
#[derive(Debug, Clone)]
pub struct NewTrack<'a> {
    pub name: &'a str,
    pub filepath: &'a Path,
    /// Duration in milliseconds.
    pub duration: i64,
    pub track_number: i64,
    pub disc_number: i64,
    pub album_id: AlbumId,
    pub year: Option<i64>,
    pub popularity: i64,
    /// Last listen timestamp, 0 if never listened to.
    pub listened_at: i64,
    /// File modification timestamp.
    pub modified_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub filepath: PathBuf,
    pub duration: i64,
    pub track_number: i64,
    pub disc_number: i64,
    pub album_id: AlbumId,
    pub year: Option<i64>,
    pub popularity: i64,
    pub listened_at: i64,
    pub modified_at: i64,
}

impl Track {
    pub fn never_listened(&self) -> bool {
        self.listened_at == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfos {
    pub name: String,
    pub filepath: PathBuf,
    pub duration: i64,
    pub album_id: AlbumId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: TrackId,
    pub name: String,
}

/// A track on which an artist appears without being the album artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestAppearance {
    pub id: TrackId,
    pub name: String,
}
