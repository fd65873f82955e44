//! Paginated resource listings
//!
//! A listing endpoint (`<endpoint>/<type>`) returns the total number of
//! resources of that type plus one page of `{name, url}` summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pagination parameters for a listing request
///
/// Unset fields are left off the URL so the server default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of results to return
    pub limit: Option<u32>,
    /// Number of results to skip
    pub offset: Option<u32>,
}

impl Page {
    /// Builds the query string for these parameters, including the leading `?`.
    ///
    /// Returns an empty string when no parameter is set.
    pub fn query(&self) -> String {
        let params: Vec<String> = [("limit", self.limit), ("offset", self.offset)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
            .collect();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Summary entry of a listing: a resource name and its URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Body of a listing response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBody {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// One page of a resource listing
///
/// `count` is the total number of resources the server reports for the
/// type; `results` holds only the entries of the requested page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceList {
    url: String,
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<NamedResource>,
}

impl ResourceList {
    pub(crate) fn from_body(url: String, body: ListBody) -> Self {
        Self {
            url,
            count: body.count,
            next: body.next,
            previous: body.previous,
            results: body.results,
        }
    }

    /// Returns the listing URL this page was loaded from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the total number of resources reported by the server
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the URL of the next page, if any
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Returns the URL of the previous page, if any
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Returns the entries of this page
    pub fn results(&self) -> &[NamedResource] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedResource> {
        self.results.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResourceList {
    type Item = &'a NamedResource;
    type IntoIter = std::slice::Iter<'a, NamedResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for ResourceList {
    type Item = NamedResource;
    type IntoIter = std::vec::IntoIter<NamedResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl fmt::Display for ResourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.results.iter().map(|r| r.name.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
