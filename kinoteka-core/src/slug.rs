//! Movie slug derivation.
//!
//! The slug is computed synchronously inside the movie-creation transaction
//! from the lowered, trimmed title: whitespace runs become hyphens and the
//! Azerbaijani letters `əöüıçşğ` fold to their ASCII counterparts.

/// Transliteration table applied after lowercasing.
const FOLD_TABLE: [(char, char); 7] = [
    ('ə', 'e'),
    ('ö', 'o'),
    ('ü', 'u'),
    ('ı', 'i'),
    ('ç', 'c'),
    ('ş', 's'),
    ('ğ', 'g'),
];

fn fold_char(c: char) -> char {
    FOLD_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Derive a URL slug from a movie title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for word in title.trim().to_lowercase().split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.extend(word.chars().map(fold_char));
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("The Dark Knight"), "the-dark-knight");
    }

    #[test]
    fn folds_azerbaijani_letters() {
        assert_eq!(slugify("Köhnə Şəhər"), "kohne-seher");
        assert_eq!(slugify("Uçuş"), "ucus");
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(slugify("  Pulp   Fiction  "), "pulp-fiction");
    }

    #[test]
    fn empty_title_gives_empty_slug() {
        assert_eq!(slugify("   "), "");
    }
}
