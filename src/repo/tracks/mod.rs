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

//! Track persistence.
//!
//! [`TrackRepository`] owns the `tracks` table and the `track_artists` and
//! `track_genres` link tables. All other access to these tables goes
//! through it.
//!
//! # Commits
//!
//! Mutators leave their writes pending on the handle unless documented
//! otherwise; the caller decides when to [`Db::commit`]. Popularity bumps and
//! listen timestamps are fire-and-forget events and commit immediately.
//!
//! # Missing rows
//!
//! Lookups for an unknown track id return `None` or an empty collection
//! rather than an error. Errors are reserved for storage failures.


use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use rusqlite::{OptionalExtension, Params, params, types::FromSql};

use crate::{
    config::CatalogConfig,
    db::Db,
    error::{CatalogError, Outcome, Result},
    model::{
        AlbumArtist, AlbumId, ArtistId, GenreId, GuestAppearance, NewTrack, SearchHit, Track,
        TrackId, TrackInfos,
    },
    repo::ArtistRepository,
    util::names::translate_artist_name,
};

/// Number of tracks returned by the popularity and listening selections.
const SELECTION_LIMIT: i64 = 100;

/// Maximum number of hits returned by [`TrackRepository::search`].
const SEARCH_LIMIT: i64 = 25;

/// Lower bound of [`TrackRepository::average_popularity`].
const MIN_AVERAGE_POPULARITY: f64 = 5.0;

/// Access to tracks and their artist and genre links.
#[derive(Debug, Clone)]
pub struct TrackRepository {
    artists: ArtistRepository,
    translate: fn(&str) -> String,
    unknown_label: String,
}

impl Default for TrackRepository {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}

impl TrackRepository {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            artists: ArtistRepository,
            translate: translate_artist_name,
            unknown_label: config.unknown_label.clone(),
        }
    }

    /// Replaces the function used to turn stored artist names into display
    /// names in [`TrackRepository::artist_names`].
    pub fn with_translator(mut self, translate: fn(&str) -> String) -> Self {
        self.translate = translate;
        self
    }

    /// Adds a new track. Commit needed.
    ///
    /// Importing a library must not stop at one bad file, so failures are
    /// logged and reported as [`Outcome::Ignored`] instead of an error. This
    /// covers filepaths that are not valid UTF-8 as well as any storage
    /// failure, e.g. a filepath that is already in the catalogue.
    pub fn add(&self, db: &Db, track: &NewTrack<'_>) -> Outcome<TrackId> {
        let outcome = Outcome::from(Self::insert(db, track));
        if let Outcome::Ignored(err) = &outcome {
            log::warn!(
                "Failed to add track {}: {err}",
                track.filepath.display()
            );
        }
        outcome
    }

    fn insert(db: &Db, track: &NewTrack<'_>) -> Result<TrackId> {
        let filepath = track
            .filepath
            .to_str()
            .ok_or_else(|| CatalogError::InvalidPath(track.filepath.to_path_buf()))?;

        db.execute(
            "INSERT INTO tracks (name, filepath, duration, tracknumber, discnumber,
                                 album_id, year, popularity, ltime, mtime)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                track.name,
                filepath,
                track.duration,
                track.track_number,
                track.disc_number,
                track.album_id,
                track.year,
                track.popularity,
                track.listened_at,
                track.modified_at,
            ],
        )?;

        Ok(TrackId(db.last_insert_rowid()))
    }

    /// Links an artist to a track unless already linked. Commit needed.
    ///
    /// Returns whether a link was created.
    pub fn add_artist(&self, db: &Db, track_id: TrackId, artist_id: ArtistId) -> Result<bool> {
        if self.artist_ids(db, track_id)?.contains(&artist_id) {
            return Ok(false);
        }
        db.execute(
            "INSERT INTO track_artists (track_id, artist_id) VALUES (?, ?)",
            params![track_id, artist_id],
        )?;
        log::trace!("Linked artist {} to track {}", artist_id.0, track_id.0);
        Ok(true)
    }

    /// Links a genre to a track unless already linked. Commit needed.
    ///
    /// Returns whether a link was created.
    pub fn add_genre(&self, db: &Db, track_id: TrackId, genre_id: GenreId) -> Result<bool> {
        if self.genre_ids(db, track_id)?.contains(&genre_id) {
            return Ok(false);
        }
        db.execute(
            "INSERT INTO track_genres (track_id, genre_id) VALUES (?, ?)",
            params![track_id, genre_id],
        )?;
        log::trace!("Linked genre {} to track {}", genre_id.0, track_id.0);
        Ok(true)
    }

    /// Ids of all tracks with the given name, ignoring case.
    pub fn ids_for_name(&self, db: &Db, name: &str) -> Result<Vec<TrackId>> {
        query_column(
            db,
            "SELECT id FROM tracks WHERE name = ? COLLATE NOCASE",
            params![name],
        )
    }

    pub fn id_by_path(&self, db: &Db, filepath: &Path) -> Result<Option<TrackId>> {
        // A path that cannot be stored cannot be found either.
        let Some(filepath) = filepath.to_str() else {
            return Ok(None);
        };
        query_scalar(
            db,
            "SELECT id FROM tracks WHERE filepath = ?",
            params![filepath],
        )
    }

    pub fn name(&self, db: &Db, track_id: TrackId) -> Result<Option<String>> {
        query_scalar(db, "SELECT name FROM tracks WHERE id = ?", params![track_id])
    }

    pub fn path(&self, db: &Db, track_id: TrackId) -> Result<Option<PathBuf>> {
        let filepath: Option<String> = query_scalar(
            db,
            "SELECT filepath FROM tracks WHERE id = ?",
            params![track_id],
        )?;
        Ok(filepath.map(PathBuf::from))
    }

    /// The release year, `None` for unknown tracks and tracks without a year.
    pub fn year(&self, db: &Db, track_id: TrackId) -> Result<Option<i64>> {
        let year: Option<Option<i64>> =
            query_scalar(db, "SELECT year FROM tracks WHERE id = ?", params![track_id])?;
        Ok(year.flatten().filter(|&year| year != 0))
    }

    pub fn album_id(&self, db: &Db, track_id: TrackId) -> Result<Option<AlbumId>> {
        query_scalar(
            db,
            "SELECT album_id FROM tracks WHERE id = ?",
            params![track_id],
        )
    }

    /// Position of the track on its album.
    pub fn number(&self, db: &Db, track_id: TrackId) -> Result<Option<i64>> {
        query_scalar(
            db,
            "SELECT tracknumber FROM tracks WHERE id = ?",
            params![track_id],
        )
    }

    /// Duration in milliseconds.
    pub fn duration(&self, db: &Db, track_id: TrackId) -> Result<Option<i64>> {
        query_scalar(
            db,
            "SELECT duration FROM tracks WHERE id = ?",
            params![track_id],
        )
    }

    pub fn popularity(&self, db: &Db, track_id: TrackId) -> Result<Option<i64>> {
        query_scalar(
            db,
            "SELECT popularity FROM tracks WHERE id = ?",
            params![track_id],
        )
    }

    /// Name of the track's album, or the configured unknown label.
    pub fn album_name(&self, db: &Db, track_id: TrackId) -> Result<String> {
        let name: Option<String> = query_scalar(
            db,
            "SELECT albums.name FROM albums, tracks
             WHERE tracks.id = ? AND tracks.album_id = albums.id",
            params![track_id],
        )?;
        Ok(name.unwrap_or_else(|| self.unknown_label.clone()))
    }

    /// Linked artist ids in the order they were linked.
    pub fn artist_ids(&self, db: &Db, track_id: TrackId) -> Result<Vec<ArtistId>> {
        query_column(
            db,
            "SELECT artist_id FROM track_artists WHERE track_id = ? ORDER BY rowid",
            params![track_id],
        )
    }

    /// Display names of the linked artists, as `"artist1, artist2, ..."`.
    pub fn artist_names(&self, db: &Db, track_id: TrackId) -> Result<String> {
        let names: Vec<String> = query_column(
            db,
            "SELECT artists.name FROM artists, track_artists
             WHERE track_artists.track_id = ? AND track_artists.artist_id = artists.id
             ORDER BY track_artists.rowid",
            params![track_id],
        )?;
        let names: Vec<String> = names.iter().map(|name| (self.translate)(name)).collect();
        Ok(names.join(", "))
    }

    /// Linked genre ids in the order they were linked.
    pub fn genre_ids(&self, db: &Db, track_id: TrackId) -> Result<Vec<GenreId>> {
        query_column(
            db,
            "SELECT genre_id FROM track_genres WHERE track_id = ? ORDER BY rowid",
            params![track_id],
        )
    }

    /// Names of the linked genres, as `"genre1, genre2, ..."`.
    pub fn genre_names(&self, db: &Db, track_id: TrackId) -> Result<String> {
        let names: Vec<String> = query_column(
            db,
            "SELECT genres.name FROM genres, track_genres
             WHERE track_genres.track_id = ? AND track_genres.genre_id = genres.id
             ORDER BY track_genres.rowid",
            params![track_id],
        )?;
        Ok(names.join(", "))
    }

    /// Modification times of all tracks, keyed by filepath.
    ///
    /// Library rescans diff the files on disk against this map, so it has to
    /// be captured before anything derived from the catalogue is shown.
    pub fn all_modification_times(&self, db: &Db) -> Result<HashMap<PathBuf, i64>> {
        let mut stmt = db
            .conn()
            .prepare_cached("SELECT filepath, mtime FROM tracks")?;
        let mtimes: HashMap<PathBuf, i64> = stmt
            .query_map([], |row| {
                let filepath: String = row.get(0)?;
                Ok((PathBuf::from(filepath), row.get(1)?))
            })?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(mtimes)
    }

    pub fn infos(&self, db: &Db, track_id: TrackId) -> Result<Option<TrackInfos>> {
        let mut stmt = db.conn().prepare_cached(
            "SELECT name, filepath, duration, album_id FROM tracks WHERE id = ?",
        )?;
        Ok(stmt
            .query_row(params![track_id], TrackInfos::from_row)
            .optional()?)
    }

    /// The full row of a track.
    pub fn track(&self, db: &Db, track_id: TrackId) -> Result<Option<Track>> {
        let sql = format!("SELECT {} FROM tracks WHERE id = ?", Track::COLUMNS);
        let mut stmt = db.conn().prepare_cached(&sql)?;
        Ok(stmt.query_row(params![track_id], Track::from_row).optional()?)
    }

    /// Artist of the track's album.
    ///
    /// Tracks without an album count as part of a compilation.
    pub fn album_artist_id(&self, db: &Db, track_id: TrackId) -> Result<AlbumArtist> {
        let artist: Option<AlbumArtist> = query_scalar(
            db,
            "SELECT albums.artist_id FROM albums, tracks
             WHERE tracks.id = ? AND tracks.album_id = albums.id",
            params![track_id],
        )?;
        Ok(artist.unwrap_or(AlbumArtist::Compilation))
    }

    pub fn all_paths(&self, db: &Db) -> Result<Vec<PathBuf>> {
        let paths: Vec<String> = query_column(db, "SELECT filepath FROM tracks", [])?;
        Ok(paths.into_iter().map(PathBuf::from).collect())
    }

    pub fn count(&self, db: &Db) -> Result<i64> {
        let count = db
            .conn()
            .query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn is_empty(&self, db: &Db) -> Result<bool> {
        Ok(self.count(db)? == 0)
    }

    /// Tracks the artist performs on without being the album artist.
    pub fn tracks_as_non_album_artist(
        &self,
        db: &Db,
        artist_id: ArtistId,
    ) -> Result<Vec<GuestAppearance>> {
        let mut stmt = db.conn().prepare_cached(
            "SELECT tracks.id, tracks.name
             FROM tracks, track_artists, albums
             WHERE albums.id = tracks.album_id
             AND track_artists.artist_id = ?1
             AND track_artists.track_id = tracks.id
             AND albums.artist_id != ?1",
        )?;
        let tracks = stmt
            .query_map(params![artist_id], |row| {
                Ok(GuestAppearance {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tracks)
    }

    /// The most listened to tracks, most popular first.
    pub fn most_popular(&self, db: &Db) -> Result<Vec<TrackId>> {
        query_column(
            db,
            "SELECT id FROM tracks WHERE popularity != 0
             ORDER BY popularity DESC LIMIT ?",
            params![SELECTION_LIMIT],
        )
    }

    /// Average popularity of the most popular tracks.
    ///
    /// Never less than 5, so that thresholds derived from it stay meaningful
    /// for sparsely played libraries.
    pub fn average_popularity(&self, db: &Db) -> Result<f64> {
        let average: Option<f64> = db.conn().query_row(
            "SELECT AVG(popularity) FROM
                (SELECT popularity FROM tracks ORDER BY popularity DESC LIMIT ?)",
            params![SELECTION_LIMIT],
            |row| row.get(0),
        )?;
        Ok(average
            .filter(|&average| average > MIN_AVERAGE_POPULARITY)
            .unwrap_or(MIN_AVERAGE_POPULARITY))
    }

    /// Increments the popularity of a track and commits immediately.
    ///
    /// Commits every write pending on the handle, not only this one.
    pub fn increment_popularity(&self, db: &Db, track_id: TrackId) -> Result<()> {
        let current = self.popularity(db, track_id)?.unwrap_or_default();
        db.execute(
            "UPDATE tracks SET popularity = ? WHERE id = ?",
            params![current + 1, track_id],
        )?;
        db.commit()
    }

    /// Records when a track was last listened to and commits immediately.
    pub fn set_listened_at(&self, db: &Db, track_id: TrackId, time: i64) -> Result<()> {
        db.execute(
            "UPDATE tracks SET ltime = ? WHERE id = ?",
            params![time, track_id],
        )?;
        db.commit()
    }

    /// A random selection of tracks that were never listened to.
    pub fn never_listened_to(&self, db: &Db) -> Result<Vec<TrackId>> {
        query_column(
            db,
            "SELECT id FROM tracks WHERE ltime = 0 ORDER BY random() LIMIT ?",
            params![SELECTION_LIMIT],
        )
    }

    /// The most recently listened to tracks, latest first.
    pub fn recently_listened_to(&self, db: &Db) -> Result<Vec<TrackId>> {
        query_column(
            db,
            "SELECT id FROM tracks WHERE ltime != 0 ORDER BY ltime DESC LIMIT ?",
            params![SELECTION_LIMIT],
        )
    }

    pub fn random_tracks(&self, db: &Db) -> Result<Vec<TrackId>> {
        query_column(
            db,
            "SELECT id FROM tracks ORDER BY random() LIMIT ?",
            params![SELECTION_LIMIT],
        )
    }

    /// Sets the last listen time. Commit needed.
    pub fn set_ltime(&self, db: &Db, track_id: TrackId, ltime: i64) -> Result<()> {
        db.execute(
            "UPDATE tracks SET ltime = ? WHERE id = ?",
            params![ltime, track_id],
        )?;
        Ok(())
    }

    /// Sets the popularity of a track, committing only if `commit` is set.
    ///
    /// Concurrent writers can hold the database lock; the update is then
    /// dropped and reported as [`Outcome::Ignored`]. If the update opened the
    /// handle's transaction it is rolled back, otherwise writes pending from
    /// earlier calls stay pending.
    pub fn set_popularity(
        &self,
        db: &Db,
        track_id: TrackId,
        popularity: i64,
        commit: bool,
    ) -> Outcome<()> {
        let opens_transaction = !db.has_pending_writes();
        let result = db
            .execute(
                "UPDATE tracks SET popularity = ? WHERE id = ?",
                params![popularity, track_id],
            )
            .and_then(|_| if commit { db.commit() } else { Ok(()) });
        let outcome = Outcome::from(result);
        if let Outcome::Ignored(err) = &outcome {
            log::debug!("Dropped popularity update of track {}: {err}", track_id.0);
            if opens_transaction {
                if let Err(err) = db.rollback() {
                    log::debug!("Failed to roll back dropped popularity update: {err}");
                }
            }
        }
        outcome
    }

    /// Removes all artist and genre links of a track. Commit needed.
    pub fn clean(&self, db: &Db, track_id: TrackId) -> Result<()> {
        db.execute(
            "DELETE FROM track_artists WHERE track_id = ?",
            params![track_id],
        )?;
        db.execute(
            "DELETE FROM track_genres WHERE track_id = ?",
            params![track_id],
        )?;
        Ok(())
    }

    /// Tracks whose name contains `searched`, matching case.
    ///
    /// `searched` is used as a `LIKE` pattern, so `%` and `_` in it act as
    /// wildcards.
    pub fn search(&self, db: &Db, searched: &str) -> Result<Vec<SearchHit>> {
        let mut stmt = db
            .conn()
            .prepare_cached("SELECT id, name FROM tracks WHERE name LIKE ? LIMIT ?")?;
        let hits = stmt
            .query_map(params![format!("%{searched}%"), SEARCH_LIMIT], |row| {
                Ok(SearchHit {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hits)
    }

    /// Finds a track by title and artist.
    ///
    /// `artist` is compared against the album artist's name and against the
    /// joined display names of the track artists. Only tracks named `title`
    /// are considered, so the scan stays small.
    pub fn search_track(&self, db: &Db, artist: &str, title: &str) -> Result<Option<TrackId>> {
        for track_id in self.ids_for_name(db, title)? {
            if let Some(album_artist) = self.album_artist_id(db, track_id)?.artist_id() {
                if self.artists.name(db, album_artist)?.as_deref() == Some(artist) {
                    return Ok(Some(track_id));
                }
            }
            if self.artist_names(db, track_id)? == artist {
                return Ok(Some(track_id));
            }
        }
        Ok(None)
    }

    /// Removes a track and its links. Commit needed.
    ///
    /// Unknown paths are ignored.
    pub fn remove(&self, db: &Db, filepath: &Path) -> Result<()> {
        let Some(track_id) = self.id_by_path(db, filepath)? else {
            return Ok(());
        };
        db.execute(
            "DELETE FROM track_genres WHERE track_id = ?",
            params![track_id],
        )?;
        db.execute(
            "DELETE FROM track_artists WHERE track_id = ?",
            params![track_id],
        )?;
        db.execute("DELETE FROM tracks WHERE id = ?", params![track_id])?;
        log::debug!("Removed track {} ({})", track_id.0, filepath.display());
        Ok(())
    }
}

fn query_scalar<T: FromSql, P: Params>(db: &Db, sql: &str, params: P) -> Result<Option<T>> {
    let mut stmt = db.conn().prepare_cached(sql)?;
    Ok(stmt.query_row(params, |row| row.get(0)).optional()?)
}

fn query_column<T: FromSql, P: Params>(db: &Db, sql: &str, params: P) -> Result<Vec<T>> {
    let mut stmt = db.conn().prepare_cached(sql)?;
    let values = stmt
        .query_map(params, |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(values)
}
