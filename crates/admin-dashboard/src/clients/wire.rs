//! Decoding list bodies.

use page_controller::FetchResponse;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Parses a list endpoint body.
///
/// Anything that does not decode to a list page is zero rows: an empty body,
/// `null`, `{}`, null fields, non-JSON and wrong-shape bodies alike. Transport
/// failures are reported before the body is read.
pub fn parse_list_body<T: DeserializeOwned>(body: &str) -> FetchResponse<T> {
    if body.trim().is_empty() {
        return FetchResponse::empty();
    }
    match serde_json::from_str::<Option<FetchResponse<T>>>(body) {
        Ok(parsed) => parsed.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "Unreadable list body, showing no rows");
            FetchResponse::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_mean_zero_results() {
        for body in ["", "  ", "null", "{}", r#"{"rows":null,"totalCount":null}"#] {
            let response: FetchResponse<u32> = parse_list_body(body);
            assert!(response.rows.is_empty(), "body {body:?}");
            assert_eq!(response.total_count, 0);
        }
    }

    #[test]
    fn test_full_body_is_parsed() {
        let response: FetchResponse<u32> =
            parse_list_body(r#"{"rows":[1,2],"totalCount":9,"page":2,"pageSize":2}"#);
        assert_eq!(response.rows, vec![1, 2]);
        assert_eq!(response.total_count, 9);
        assert_eq!(response.page, Some(2));
    }

    #[test]
    fn test_garbage_means_zero_results() {
        for body in ["<html>502</html>", r#"{"rows":"nope"}"#, "[1, 2"] {
            let response: FetchResponse<u32> = parse_list_body(body);
            assert!(response.rows.is_empty(), "body {body:?}");
            assert_eq!(response.total_count, 0);
        }
    }
}
