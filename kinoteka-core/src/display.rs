//! Derived display fields used by the movie detail and home-page responses.

/// Format an integer with thousands separators, e.g. `1234567` -> `"1,234,567"`.
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let first_group = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Extract the video id from a trailer URL.
///
/// Takes the value of the first `=` parameter, up to the next `&` if one
/// follows. Returns the whole URL unchanged when it carries no `=` at all,
/// matching how the home-page consumer treats plain video ids.
pub fn trailer_video_id(url: &str) -> &str {
    let start = match url.find('=') {
        Some(idx) => idx + 1,
        None => return url,
    };
    let rest = &url[start..];
    match rest.find('&') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(25_000_000), "25,000,000");
    }

    #[test]
    fn thousands_handles_negative() {
        assert_eq!(thousands(-1_234), "-1,234");
    }

    #[test]
    fn video_id_from_query_url() {
        assert_eq!(
            trailer_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn video_id_stops_at_next_param() {
        assert_eq!(
            trailer_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn url_without_params_passes_through() {
        assert_eq!(trailer_video_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }
}
