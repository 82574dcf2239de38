//! Fetch responses and the results the controller keeps.

use crate::request::FetchRequest;
use serde::{Deserialize, Deserializer, Serialize};

/// Body returned by a [`DataSource`](crate::DataSource).
///
/// Every field has a default and `rows`/`totalCount` accept `null`, so an empty
/// or partial body deserializes to zero results instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct FetchResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub rows: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
    /// Page number the server actually applied, when it echoes one.
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl<T> FetchResponse<T> {
    pub fn new(rows: Vec<T>, total_count: u64) -> Self {
        Self {
            rows,
            total_count,
            page: None,
            page_size: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn with_page_echo(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Turns the raw body into a [`FetchResult`], filling the page echo from
    /// `request` when the server sent none. A total smaller than the rows on
    /// this page is raised to the row count.
    pub fn into_result(self, request: &FetchRequest) -> FetchResult<T> {
        let total_count = self.total_count.max(self.rows.len() as u64);
        FetchResult {
            page_info: PageInfo {
                page_number: self.page.unwrap_or(request.page_number),
                page_size: self.page_size.unwrap_or(request.page_size),
            },
            rows: self.rows,
            total_count,
        }
    }
}

fn null_as_default<'de, D, V>(deserializer: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Default + Deserialize<'de>,
{
    Ok(Option::<V>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> Default for FetchResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Page and size the server applied (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_number: u32,
    pub page_size: u32,
}

/// The outcome of one successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
    pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FetchRequest {
        FetchRequest {
            page_number: 2,
            page_size: 20,
            filters: Vec::new(),
            sorting: None,
        }
    }

    #[test]
    fn test_into_result_uses_request_when_server_has_no_echo() {
        let result = FetchResponse::new(vec![1, 2, 3], 23).into_result(&request());
        assert_eq!(
            result.page_info,
            PageInfo {
                page_number: 2,
                page_size: 20
            }
        );
        assert_eq!(result.total_count, 23);
    }

    #[test]
    fn test_into_result_prefers_server_echo() {
        let result = FetchResponse::new(vec![1], 1)
            .with_page_echo(1, 10)
            .into_result(&request());
        assert_eq!(result.page_info.page_number, 1);
        assert_eq!(result.page_info.page_size, 10);
    }

    #[test]
    fn test_null_fields_deserialize_as_empty() {
        let response: FetchResponse<u32> =
            serde_json::from_str(r#"{"rows":null,"totalCount":null}"#).unwrap();
        assert_eq!(response, FetchResponse::empty());
    }

    #[test]
    fn test_total_never_below_row_count() {
        let result = FetchResponse::new(vec!["a", "b"], 0).into_result(&request());
        assert_eq!(result.total_count, 2);
    }
}
