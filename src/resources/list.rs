//! Pagination: list envelopes and query options.

use serde::{Deserialize, Serialize};

/// One page of a listing.
///
/// Decoded from the wire shape `{"data": [...], "cursor": {"next": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireList<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Cursor for the next page, if there is one.
    pub next_cursor: Option<String>,
}

impl<T> ListResponse<T> {
    /// Returns true if another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

#[derive(Deserialize)]
struct WireList<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    cursor: Option<WireCursor>,
}

#[derive(Deserialize)]
struct WireCursor {
    #[serde(default)]
    next: Option<String>,
}

impl<T> From<WireList<T>> for ListResponse<T> {
    fn from(wire: WireList<T>) -> Self {
        Self {
            items: wire.data,
            next_cursor: wire
                .cursor
                .and_then(|c| c.next)
                .filter(|next| !next.is_empty()),
        }
    }
}

/// Paging parameters shared by every listing.
///
/// Zero and empty values are treated as unset.
///
/// # Example
///
/// ```
/// use sendpigeon::resources::ListOptions;
///
/// let options = ListOptions::new().with_limit(25).with_cursor("c_2");
/// assert_eq!(options.limit, Some(25));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub cursor: Option<String>,
}

impl ListOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of items to skip.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Continues from a cursor returned by a previous page.
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        Query::new()
            .number("limit", self.limit)
            .number("offset", self.offset)
            .text("cursor", self.cursor.as_deref())
    }
}

/// Query string builder that skips unset parameters.
///
/// Keys are emitted in sorted order.
#[derive(Debug, Default)]
pub(crate) struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a number unless it is absent or zero.
    pub(crate) fn number(mut self, key: &'static str, value: Option<u32>) -> Self {
        if let Some(value) = value.filter(|v| *v > 0) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Adds a string unless it is absent or empty.
    pub(crate) fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Appends the query string to `path`, or returns `path` unchanged when
    /// no parameter is set.
    pub(crate) fn append_to(mut self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        self.pairs.sort_by_key(|(key, _)| *key);
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish();
        format!("{path}?{query}")
    }
}

/// Percent-encodes a single path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
