//! Catalog listing parameters: filters, ordering, pagination and the fixed
//! curated sections.

use std::collections::BTreeSet;

use crate::error::{CoreError, Result};

/// Maximum review length in characters.
pub const MAX_REVIEW_LENGTH: usize = 800;

/// Title searches return at most this many movies.
pub const SEARCH_RESULT_LIMIT: i64 = 5;

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Hard cap on requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 1000;
/// Hard cap on page numbers, chosen so `number * MAX_PAGE_SIZE` cannot
/// overflow an `i64` offset.
pub const MAX_PAGE_NUMBER: i64 = i64::MAX / MAX_PAGE_SIZE;

/// `new-added` section: listed within this window, premiered before it.
pub const NEW_ADDED_WINDOW_DAYS: i64 = 100;
/// `most-popular` section: IMDb point range and vote floor.
pub const MOST_POPULAR_POINT_MIN: f64 = 7.0;
pub const MOST_POPULAR_POINT_MAX: f64 = 8.0;
pub const MOST_POPULAR_MIN_VOTES: i32 = 300_000;
/// `most-rated` section: vote floor.
pub const MOST_RATED_MIN_VOTES: i32 = 800_000;

/// Homepage pool: premiere lookback and minimum IMDb point.
pub const RECENT_POOL_LOOKBACK_DAYS: i64 = 2920;
pub const RECENT_POOL_MIN_POINT: f64 = 6.0;

/// A named curated movie listing with a fixed predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSection {
    NewAdded,
    MostPopular,
    MostRated,
}

impl CatalogSection {
    /// Parse a section name, normalizing case and surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "new-added" => Ok(Self::NewAdded),
            "most-popular" => Ok(Self::MostPopular),
            "most-rated" => Ok(Self::MostRated),
            _ => Err(CoreError::Validation(
                "This is not a valid section name for catalog".to_string(),
            )),
        }
    }
}

/// Only 6 and 12 are accepted section sizes; anything else becomes 12.
pub fn coerce_section_count(count: i64) -> i64 {
    if count == 6 || count == 12 { count } else { 12 }
}

/// The new-movies strip accepts 6 or 8; anything else becomes 8.
pub fn coerce_new_movies_count(count: i64) -> i64 {
    if count == 6 || count == 8 { count } else { 8 }
}

/// Filter parameters shared by the catalog listing and the watchlist listing.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Genre slugs, OR semantics within the set.
    pub genres: Vec<String>,
    /// Certificate slugs.
    pub rate: Vec<String>,
    /// Streaming platform slugs.
    pub platforms: Vec<String>,
    pub imdb_min: Option<f64>,
    pub imdb_max: Option<f64>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

/// Split a comma-separated slug set such as `?genres=sci-fi,action`.
pub fn parse_slug_set(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Sort order for movie listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieOrdering {
    /// Newest premiere first, then best IMDb point.
    #[default]
    Default,
    ImdbAsc,
    ImdbDesc,
    YearAsc,
    YearDesc,
}

impl MovieOrdering {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("imdb") => Self::ImdbAsc,
            Some("-imdb") => Self::ImdbDesc,
            Some("year") => Self::YearAsc,
            Some("-year") => Self::YearDesc,
            _ => Self::Default,
        }
    }
}

/// A 1-based page request with a clamped size.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(number: Option<i64>, size: Option<i64>) -> Self {
        Self {
            number: number.unwrap_or(1).clamp(1, MAX_PAGE_NUMBER),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.size
    }

    /// Page number of the following page, if `total` leaves one.
    pub fn next(&self, total: i64) -> Option<i64> {
        (self.number * self.size < total).then_some(self.number + 1)
    }

    pub fn previous(&self) -> Option<i64> {
        (self.number > 1).then_some(self.number - 1)
    }
}

/// Parse a comma-separated id list such as `"1,2,3"`.
///
/// Every token must be an integer; duplicates collapse to a set.
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>> {
    let mut ids = BTreeSet::new();
    for token in raw.split(',') {
        let id: i64 = token.trim().parse().map_err(|_| {
            CoreError::Validation("This field is required and has to be numbers".to_string())
        })?;
        ids.insert(id);
    }
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_parse_normalizes() {
        assert_eq!(
            CatalogSection::parse(" Most-Popular ").unwrap(),
            CatalogSection::MostPopular
        );
        assert_eq!(
            CatalogSection::parse("new-added").unwrap(),
            CatalogSection::NewAdded
        );
        assert!(matches!(
            CatalogSection::parse("trending"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn section_count_coerces_to_twelve() {
        assert_eq!(coerce_section_count(6), 6);
        assert_eq!(coerce_section_count(12), 12);
        assert_eq!(coerce_section_count(7), 12);
        assert_eq!(coerce_section_count(-3), 12);
    }

    #[test]
    fn new_movies_count_coerces_to_eight() {
        assert_eq!(coerce_new_movies_count(6), 6);
        assert_eq!(coerce_new_movies_count(8), 8);
        assert_eq!(coerce_new_movies_count(12), 8);
    }

    #[test]
    fn ordering_parse() {
        assert_eq!(MovieOrdering::parse(Some("-imdb")), MovieOrdering::ImdbDesc);
        assert_eq!(MovieOrdering::parse(Some("year")), MovieOrdering::YearAsc);
        assert_eq!(MovieOrdering::parse(Some("bogus")), MovieOrdering::Default);
        assert_eq!(MovieOrdering::parse(None), MovieOrdering::Default);
    }

    #[test]
    fn page_clamps_size_and_computes_links() {
        let page = Page::new(Some(2), Some(5000));
        assert_eq!(page.size, MAX_PAGE_SIZE);

        let page = Page::new(Some(2), Some(10));
        assert_eq!(page.offset(), 10);
        assert_eq!(page.next(25), Some(3));
        assert_eq!(page.next(20), None);
        assert_eq!(page.previous(), Some(1));
        assert_eq!(Page::default().previous(), None);
    }

    #[test]
    fn huge_page_numbers_cannot_overflow_the_offset() {
        // 9.3e15 * 1000 would wrap an unclamped i64 offset.
        let page = Page::new(Some(9_300_000_000_000_000), Some(1000));
        assert_eq!(page.number, MAX_PAGE_NUMBER);
        assert_eq!(page.offset(), (MAX_PAGE_NUMBER - 1) * MAX_PAGE_SIZE);
        assert_eq!(page.next(1_000_000), None);

        let page = Page::new(Some(i64::MAX), Some(i64::MAX));
        assert!(page.offset() >= 0);
    }

    #[test]
    fn id_list_parses_and_dedupes() {
        assert_eq!(parse_id_list("3, 1,2,3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn id_list_rejects_non_numeric() {
        assert!(matches!(
            parse_id_list("1,two,3"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(parse_id_list(""), Err(CoreError::Validation(_))));
    }

    #[test]
    fn slug_sets_split_on_commas() {
        assert_eq!(
            parse_slug_set(Some("sci-fi, action,")),
            vec!["sci-fi", "action"]
        );
        assert!(parse_slug_set(None).is_empty());
        assert!(parse_slug_set(Some("")).is_empty());
    }
}
