//! Page-number pagination envelope with next/previous links derived from
//! the request URI.

use axum::http::Uri;

use kinoteka_core::api_types::{PageLinks, Paginated};
use kinoteka_core::catalog::Page;

pub fn paginated<T>(uri: &Uri, page: Page, count: i64, results: Vec<T>) -> Paginated<T> {
    Paginated {
        links: PageLinks {
            next: page.next(count).map(|number| page_link(uri, number)),
            previous: page.previous().map(|number| page_link(uri, number)),
        },
        count,
        results,
    }
}

/// Rewrite the request URI with a different `page` value, keeping every
/// other query parameter in place.
fn page_link(uri: &Uri, page: i64) -> String {
    let mut params: Vec<String> = uri
        .query()
        .map(|query| {
            query
                .split('&')
                .filter(|param| !param.is_empty() && !param.starts_with("page="))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    params.push(format!("page={page}"));
    format!("{}?{}", uri.path(), params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_preserve_other_params() {
        let uri = Uri::from_static("/api/v1/movies/?genres=sci-fi&page=2&year_min=2010");
        let page = Page::new(Some(2), None);
        let result = paginated(&uri, page, 35, vec![1, 2, 3]);
        assert_eq!(
            result.links.next.as_deref(),
            Some("/api/v1/movies/?genres=sci-fi&year_min=2010&page=3")
        );
        assert_eq!(
            result.links.previous.as_deref(),
            Some("/api/v1/movies/?genres=sci-fi&year_min=2010&page=1")
        );
        assert_eq!(result.count, 35);
    }

    #[test]
    fn first_and_last_pages_drop_dead_links() {
        let uri = Uri::from_static("/api/v1/directors/");
        let page = Page::default();
        let result = paginated(&uri, page, 4, vec![(); 4]);
        assert!(result.links.next.is_none());
        assert!(result.links.previous.is_none());
    }
}
