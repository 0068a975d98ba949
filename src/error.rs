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

//! Error types.
//!
//! Most operations propagate storage failures as [`CatalogError`]. The two
//! hot paths that must never abort a caller, track import and popularity
//! updates, report failures as [`Outcome::Ignored`] instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] confy::ConfyError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Result of a best-effort write.
///
/// A write that fails is not an error for the caller; the failure is kept so
/// that it can still be inspected or counted.
#[must_use]
#[derive(Debug)]
pub enum Outcome<T> {
    Applied(T),
    Ignored(CatalogError),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn is_ignored(&self) -> bool {
        !self.is_applied()
    }

    /// The value of an applied write.
    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Ignored(_) => None,
        }
    }

    /// The error that was swallowed, if any.
    pub fn ignored(&self) -> Option<&CatalogError> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Ignored(err) => Some(err),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Applied(value),
            Err(err) => Outcome::Ignored(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_result() {
        let applied: Outcome<i32> = Ok(7).into();
        assert!(applied.is_applied());
        assert_eq!(applied.applied(), Some(7));

        let ignored: Outcome<i32> =
            Err(CatalogError::InvalidPath(PathBuf::from("/bad"))).into();
        assert!(ignored.is_ignored());
        assert!(matches!(
            ignored.ignored(),
            Some(CatalogError::InvalidPath(_))
        ));
        assert_eq!(ignored.applied(), None);
    }
}
