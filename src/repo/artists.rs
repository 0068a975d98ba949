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

use crate::{db::Db, error::Result, model::ArtistId};

/// Access to the `artists` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtistRepository;

impl ArtistRepository {
    /// Inserts a new artist. Commit needed.
    pub fn add(&self, db: &Db, name: &str) -> Result<ArtistId> {
        db.execute("INSERT INTO artists (name) VALUES (?)", params![name])?;
        Ok(ArtistId(db.last_insert_rowid()))
    }

    /// Looks up an artist by name, ignoring case.
    pub fn id_for_name(&self, db: &Db, name: &str) -> Result<Option<ArtistId>> {
        let mut stmt =
            db.conn().prepare_cached("SELECT id FROM artists WHERE name = ? COLLATE NOCASE")?;
        Ok(stmt.query_row(params![name], |row| row.get(0)).optional()?)
    }

    pub fn name(&self, db: &Db, artist_id: ArtistId) -> Result<Option<String>> {
        let mut stmt = db.conn().prepare_cached("SELECT name FROM artists WHERE id = ?")?;
        Ok(stmt.query_row(params![artist_id], |row| row.get(0)).optional()?)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::tests::*;

    #[test]
    fn add_and_resolve_artist() -> TestResult<()> {
        let db = establish_db()?;
        let artists = ArtistRepository;

        let id = artists.add(&db, "Radiohead")?;
        assert_eq!(artists.id_for_name(&db, "radiohead")?, Some(id));
        assert_eq!(artists.name(&db, id)?.as_deref(), Some("Radiohead"));

        assert_eq!(artists.id_for_name(&db, "Blur")?, None);
        assert_eq!(artists.name(&db, ArtistId(id.0 + 1))?, None);
        Ok(())
    }
}
