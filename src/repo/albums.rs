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

use rusqlite::{OptionalExtension, params};

use crate::{
    db::Db,
    error::Result,
    model::{AlbumArtist, AlbumId},
};

/// Access to the `albums` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlbumRepository;

impl AlbumRepository {
    /// Inserts a new album. Commit needed.
    pub fn add(&self, db: &Db, name: &str, artist: AlbumArtist) -> Result<AlbumId> {
        db.execute(
            "INSERT INTO albums (name, artist_id) VALUES (?, ?)",
            params![name, artist],
        )?;
        Ok(AlbumId(db.last_insert_rowid()))
    }

    pub fn name(&self, db: &Db, album_id: AlbumId) -> Result<Option<String>> {
        let mut stmt = db.conn().prepare_cached("SELECT name FROM albums WHERE id = ?")?;
        Ok(stmt.query_row(params![album_id], |row| row.get(0)).optional()?)
    }

    /// The album artist, [`AlbumArtist::Compilation`] for unknown albums.
    pub fn artist_id(&self, db: &Db, album_id: AlbumId) -> Result<AlbumArtist> {
        let mut stmt = db
            .conn()
            .prepare_cached("SELECT artist_id FROM albums WHERE id = ?")?;
        let artist = stmt
            .query_row(params![album_id], |row| row.get(0))
            .optional()?;
        Ok(artist.unwrap_or(AlbumArtist::Compilation))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::{model::ArtistId, tests::*};

    #[test]
    fn album_artist_round_trips_compilation_marker() -> TestResult<()> {
        let db = establish_db()?;
        let albums = AlbumRepository;

        let regular = albums.add(&db, "OK Computer", AlbumArtist::Artist(ArtistId(3)))?;
        let various = albums.add(&db, "Now 42", AlbumArtist::Compilation)?;

        assert_eq!(
            albums.artist_id(&db, regular)?,
            AlbumArtist::Artist(ArtistId(3))
        );
        assert_eq!(albums.artist_id(&db, various)?, AlbumArtist::Compilation);
        assert_eq!(
            albums.artist_id(&db, AlbumId(999))?,
            AlbumArtist::Compilation
        );
        assert_eq!(albums.name(&db, various)?.as_deref(), Some("Now 42"));
        Ok(())
    }
}
