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

use crate::{db::Db, error::Result, model::GenreId};

/// Access to the `genres` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenreRepository;

impl GenreRepository {
    /// Inserts a new genre. Commit needed.
    pub fn add(&self, db: &Db, name: &str) -> Result<GenreId> {
        db.execute("INSERT INTO genres (name) VALUES (?)", params![name])?;
        Ok(GenreId(db.last_insert_rowid()))
    }

    pub fn id_for_name(&self, db: &Db, name: &str) -> Result<Option<GenreId>> {
        let mut stmt =
            db.conn().prepare_cached("SELECT id FROM genres WHERE name = ? COLLATE NOCASE")?;
        Ok(stmt.query_row(params![name], |row| row.get(0)).optional()?)
    }

    pub fn name(&self, db: &Db, genre_id: GenreId) -> Result<Option<String>> {
        let mut stmt = db.conn().prepare_cached("SELECT name FROM genres WHERE id = ?")?;
        Ok(stmt.query_row(params![genre_id], |row| row.get(0)).optional()?)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::tests::*;

    #[test]
    fn add_and_resolve_genre() -> TestResult<()> {
        let db = establish_db()?;
        let genres = GenreRepository;

        let id = genres.add(&db, "Jazz")?;
        assert_eq!(genres.id_for_name(&db, "JAZZ")?, Some(id));
        assert_eq!(genres.name(&db, id)?.as_deref(), Some("Jazz"));
        Ok(())
    }
}
