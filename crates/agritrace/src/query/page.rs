//! Page request and page result types.

use serde::{Deserialize, Serialize};

use super::QueryError;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page size applied when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

/// Caller-supplied paging and sorting parameters.
///
/// `page` is one-based. The sort field is a plain column name checked
/// against the target entity's allow-list when the query is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
    pub sort_field: String,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: "created_at".to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl PageRequest {
    /// First page with the given size, sorted by creation time descending.
    pub fn first(page_size: u64) -> Self {
        PageRequest {
            page_size,
            ..PageRequest::default()
        }
    }

    /// Checks page bounds: `page >= 1` and `1 <= page_size <= 100`.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page < 1 {
            return Err(QueryError::InvalidPage {
                message: format!("page must be >= 1, got {}", self.page),
            });
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(QueryError::InvalidPage {
                message: format!(
                    "page_size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, self.page_size
                ),
            });
        }
        Ok(())
    }

    /// Row offset of the first entry on this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.page_size
    }
}

/// One page of shaped rows plus paging metadata.
///
/// Echoes the requested page, page size, sort field and direction so a
/// caller can reproduce the window without keeping the request around.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<V> {
    pub total: u64,
    pub total_page: u64,
    pub page: u64,
    pub page_size: u64,
    pub sort_field: String,
    pub direction: SortDirection,
    pub data: Vec<V>,
}

impl<V> PageResult<V> {
    /// Builds the result envelope for one fetched page.
    pub fn assemble(data: Vec<V>, total: u64, request: &PageRequest) -> Self {
        PageResult {
            total,
            total_page: total_pages(total, request.page_size),
            page: request.page,
            page_size: request.page_size,
            sort_field: request.sort_field.clone(),
            direction: request.direction,
            data,
        }
    }
}

/// Number of pages needed to hold `total` rows, `page_size` rows each.
///
/// This is the only place page-count arithmetic lives; every listing
/// result goes through it.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(100, 100), 1);
        assert_eq!(total_pages(101, 100), 2);
    }

    #[test]
    fn test_default_request() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.sort_field, "created_at");
        assert_eq!(request.direction, SortDirection::Desc);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_page_zero() {
        let request = PageRequest {
            page: 0,
            ..PageRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(QueryError::InvalidPage { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_page_size_out_of_bounds() {
        let too_small = PageRequest {
            page_size: 0,
            ..PageRequest::default()
        };
        assert!(too_small.validate().is_err());

        let too_large = PageRequest {
            page_size: MAX_PAGE_SIZE + 1,
            ..PageRequest::default()
        };
        assert!(too_large.validate().is_err());

        let at_limit = PageRequest {
            page_size: MAX_PAGE_SIZE,
            ..PageRequest::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_offset_is_zero_based() {
        let request = PageRequest {
            page: 3,
            page_size: 20,
            ..PageRequest::default()
        };
        assert_eq!(request.offset(), 40);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn test_direction_parses_both_spellings() {
        let short: SortDirection = serde_json::from_str("\"asc\"").unwrap();
        let long: SortDirection = serde_json::from_str("\"ascending\"").unwrap();
        assert_eq!(short, SortDirection::Asc);
        assert_eq!(long, SortDirection::Asc);
    }

    #[test]
    fn test_request_deserializes_with_partial_fields() {
        let request: PageRequest = serde_json::from_str("{\"page\": 2}").unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_assemble_carries_request_metadata() {
        let request = PageRequest {
            page: 2,
            page_size: 10,
            sort_field: "name".to_string(),
            direction: SortDirection::Asc,
        };
        let result = PageResult::assemble(vec!["a", "b"], 12, &request);
        assert_eq!(result.total, 12);
        assert_eq!(result.total_page, 2);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 10);
        assert_eq!(result.sort_field, "name");
        assert_eq!(result.direction, SortDirection::Asc);
        assert_eq!(result.data.len(), 2);
    }

    #[test]
    fn test_result_serializes_sort_echo() {
        let result = PageResult::assemble(
            vec!["row"],
            25,
            &PageRequest {
                page: 2,
                page_size: 10,
                ..PageRequest::default()
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_page"], 3);
        assert_eq!(json["sort_field"], "created_at");
        assert_eq!(json["direction"], "desc");
    }
}
