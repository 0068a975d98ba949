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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite values and
//! the typed identifiers and records of [`crate::model`].

use std::path::PathBuf;

use rusqlite::{
    Result, Row, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::model::{AlbumArtist, AlbumId, ArtistId, GenreId, Track, TrackId, TrackInfos};

macro_rules! sql_id {
    ($id:ty) => {
        impl ToSql for $id {
            fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $id {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value.as_i64().map(Self)
            }
        }
    };
}

sql_id!(TrackId);
sql_id!(ArtistId);
sql_id!(AlbumId);
sql_id!(GenreId);

impl ToSql for AlbumArtist {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        let val = match self {
            AlbumArtist::Artist(id) => id.0,
            AlbumArtist::Compilation => AlbumArtist::COMPILATION_ID,
        };
        Ok(ToSqlOutput::from(val))
    }
}

impl FromSql for AlbumArtist {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_i64()? {
            AlbumArtist::COMPILATION_ID => Ok(AlbumArtist::Compilation),
            id => Ok(AlbumArtist::Artist(ArtistId(id))),
        }
    }
}

impl Track {
    /// Maps a full `tracks` row to a [`Track`] instance.
    ///
    /// Expects the columns in the order of [`Track::COLUMNS`].
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        let filepath: String = row.get(2)?;
        let year: Option<i64> = row.get(7)?;
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            filepath: PathBuf::from(filepath),
            duration: row.get(3)?,
            track_number: row.get(4)?,
            disc_number: row.get(5)?,
            album_id: row.get(6)?,
            year: year.filter(|&y| y != 0),
            popularity: row.get(8)?,
            listened_at: row.get(9)?,
            modified_at: row.get(10)?,
        })
    }

    pub(crate) const COLUMNS: &'static str = "id, name, filepath, duration, tracknumber, \
         discnumber, album_id, year, popularity, ltime, mtime";
}

impl TrackInfos {
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        let filepath: String = row.get(1)?;
        Ok(Self {
            name: row.get(0)?,
            filepath: PathBuf::from(filepath),
            duration: row.get(2)?,
            album_id: row.get(3)?,
        })
    }
}
