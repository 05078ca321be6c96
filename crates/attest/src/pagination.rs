//! Link-header pagination parsing.

use crate::http::{HttpHeaders, header_get};

/// Pagination state extracted from a Link response header.
///
/// Link headers look like:
/// `<https://api.github.com/repositories/123/commits/abc/check-runs?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// The next page number (from rel="next" link).
    pub next_page: Option<u32>,
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
}

impl PageInfo {
    /// Returns true if there are more pages to fetch.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Returns the total number of pages if known.
    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.last_page
    }
}

/// Parse a Link header into pagination state.
pub fn parse_link_header(link_header: &str) -> PageInfo {
    let mut info = PageInfo::default();

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel)
            && let Some(page_num) = extract_page_from_url(url)
        {
            match rel_type {
                "next" => info.next_page = Some(page_num),
                "last" => info.last_page = Some(page_num),
                _ => {}
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let query_start = url.find('?')?;
    let query = &url[query_start + 1..];

    for param in query.split('&') {
        if let Some(value) = param.strip_prefix("page=") {
            return value.parse().ok();
        }
    }

    None
}

/// Pagination state from a response's Link header, if any.
pub(crate) fn page_info_from_headers(headers: &HttpHeaders) -> PageInfo {
    header_get(headers, "link")
        .map(parse_link_header)
        .unwrap_or_default()
}
