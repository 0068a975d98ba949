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

//! # Track catalogue storage.
//!
//! A data access layer over SQLite for a music library's track catalogue.
//!
//! The crate is organised around an explicit execution handle, [`Db`], and a
//! set of repositories that issue parameterized statements through it:
//!
//! * [`TrackRepository`] owns the `tracks` table and the two link tables
//!   `track_artists` and `track_genres`.
//! * [`ArtistRepository`], [`AlbumRepository`] and [`GenreRepository`] own
//!   their respective tables and serve the joined lookups of the track
//!   repository.
//!
//! ## Handles and threads
//!
//! Every repository operation takes the handle as its first argument. The
//! host application opens one handle at start-up and passes it explicitly;
//! there is no ambient global connection. A [`Db`] may be moved to another
//! thread but never shared, so background workers open their own.
//!
//! ## Commits
//!
//! Writes open an implicit transaction that stays pending until
//! [`Db::commit`] is called. Only [`TrackRepository::increment_popularity`],
//! [`TrackRepository::set_listened_at`] and, on request,
//! [`TrackRepository::set_popularity`] commit on their own.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod repo;
pub mod util;

pub use crate::{
    config::CatalogConfig,
    db::Db,
    error::{CatalogError, Outcome, Result},
    model::{
        AlbumArtist, AlbumId, ArtistId, GenreId, GuestAppearance, NewTrack, SearchHit, Track,
        TrackId, TrackInfos,
    },
    repo::{AlbumRepository, ArtistRepository, GenreRepository, TrackRepository},
};

#[cfg(test)]
pub(crate) mod tests {
    use crate::db::Db;

    pub(crate) type TestResult<T> = anyhow::Result<T>;

    pub(crate) fn establish_db() -> TestResult<Db> {
        Db::open_in_memory()
    }
}
