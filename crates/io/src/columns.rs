// Column role resolution for marketplace review exports
//
// Exports from different tools name their columns differently
// (reviewDescription, Review Text, body, ...). Each role has a list of
// lowercase fragments; headers are scanned in file order and the first
// header containing any fragment of the role wins. Changing either order
// changes which column is picked on ambiguous header sets.

use serde::Serialize;

use crate::error::UploadError;

pub const TEXT_FRAGMENTS: &[&str] = &["reviewdescription", "review_text", "review text", "body", "content"];
pub const RATING_FRAGMENTS: &[&str] = &["ratingscore", "rating", "stars"];
pub const TITLE_FRAGMENTS: &[&str] = &["reviewtitle", "title"];
pub const DATE_FRAGMENTS: &[&str] = &["date"];

/// Header chosen for each role. Only the text column is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub text: String,
    pub rating: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Result<Self, UploadError> {
        let text = find_column(headers, TEXT_FRAGMENTS).ok_or_else(|| UploadError::MissingColumn {
            role: "review text".into(),
            found: headers.to_vec(),
        })?;

        let map = Self {
            text,
            rating: find_column(headers, RATING_FRAGMENTS),
            title: find_column(headers, TITLE_FRAGMENTS),
            date: find_column(headers, DATE_FRAGMENTS),
        };
        log::debug!("resolved review columns: {map:?}");
        Ok(map)
    }
}

/// First header (in file order) containing any of the fragments, case-insensitively.
pub fn find_column(headers: &[String], fragments: &[&str]) -> Option<String> {
    headers
        .iter()
        .find(|h| {
            let lower = h.to_lowercase();
            fragments.iter().any(|f| lower.contains(f))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn marketplace_export_headers() {
        let h = headers(&["Date", "Rating Score", "Review Title", "ReviewDescription"]);
        let map = ColumnMap::resolve(&h).unwrap();
        assert_eq!(map.text, "ReviewDescription");
        assert_eq!(map.rating.as_deref(), Some("Rating Score"));
        assert_eq!(map.title.as_deref(), Some("Review Title"));
        assert_eq!(map.date.as_deref(), Some("Date"));
    }

    #[test]
    fn generic_body_column() {
        let h = headers(&["id", "stars", "body"]);
        let map = ColumnMap::resolve(&h).unwrap();
        assert_eq!(map.text, "body");
        assert_eq!(map.rating.as_deref(), Some("stars"));
        assert_eq!(map.title, None);
        assert_eq!(map.date, None);
    }

    #[test]
    fn header_order_decides_ambiguity() {
        // Both match the text role; the earlier header wins even though
        // "reviewdescription" is the first fragment in the list.
        let h = headers(&["Content", "reviewDescription"]);
        assert_eq!(ColumnMap::resolve(&h).unwrap().text, "Content");
    }

    #[test]
    fn first_date_like_header_wins() {
        let h = headers(&["Updated Date", "date", "body"]);
        assert_eq!(ColumnMap::resolve(&h).unwrap().date.as_deref(), Some("Updated Date"));
    }

    #[test]
    fn missing_text_column_lists_headers() {
        let h = headers(&["Date", "Rating", "Author"]);
        let err = ColumnMap::resolve(&h).unwrap_err();
        assert_eq!(err.found_headers().unwrap(), h.as_slice());
        let msg = err.to_string();
        assert!(msg.contains("review text column not found"));
        assert!(msg.contains("Date, Rating, Author"));
    }
}
