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

/// Articles that tagging tools move behind the name for sorting.
const ARTICLES: [&str; 2] = ["The", "the"];

/// Converts a stored artist name into its display form.
///
/// Libraries often store names sorted by their article, such as
/// `"Beatles, The"`. This moves the article back in front of the name. Any
/// other name is returned unchanged.
///
/// # Examples
///
/// ```
/// use trackdb::util::names::translate_artist_name;
///
/// assert_eq!(translate_artist_name("Beatles, The"), "The Beatles");
/// assert_eq!(translate_artist_name("Kings of Leon"), "Kings of Leon");
/// ```
pub fn translate_artist_name(name: &str) -> String {
    for article in ARTICLES {
        if let Some(head) = name
            .strip_suffix(article)
            .and_then(|rest| rest.strip_suffix(", "))
        {
            return format!("{article} {head}");
        }
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_article_to_front() {
        assert_eq!(translate_artist_name("Beatles, The"), "The Beatles");
        assert_eq!(translate_artist_name("xx, the"), "the xx");
    }

    #[test]
    fn leaves_other_names_alone() {
        assert_eq!(translate_artist_name("The Who"), "The Who");
        assert_eq!(translate_artist_name("Breathe"), "Breathe");
        assert_eq!(translate_artist_name(""), "");
    }
}
