use std::collections::HashMap;

use crate::domain::entities::query::{
    FilterCriteria, PageRequest, SortDirection, SortSpec, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
use crate::domain::entities::record::Field;

/// Raw query-string pairs as received.
pub type RawQuery = HashMap<String, String>;

pub fn filter_criteria(query: &RawQuery) -> FilterCriteria {
    FilterCriteria {
        category_filter: query.get("categoryFilter").cloned(),
        branch_filter: query.get("branchFilter").cloned(),
        supplier_filter: query.get("supplierFilter").cloned(),
    }
}

/// Reads the integer prefix of `raw` (`"2.5"` is 2, `"3abc"` is 3).
/// Digit runs too long for `u64` saturate.
fn leading_integer(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Positive integer or `default`; input without a numeric prefix or below 1 falls back.
fn positive_or(value: Option<&String>, default: u64) -> u64 {
    value
        .map(String::as_str)
        .and_then(leading_integer)
        .filter(|parsed| *parsed >= 1)
        .unwrap_or(default)
}

pub fn page_request(query: &RawQuery) -> PageRequest {
    let field = query
        .get("sortBy")
        .and_then(|name| Field::from_api_name(name.trim()))
        .unwrap_or(Field::XnMemoDate);
    let direction = match query.get("sortOrder").map(|order| order.trim()) {
        Some("asc") => SortDirection::Asc,
        _ => SortDirection::Desc,
    };

    PageRequest {
        page: positive_or(query.get("page"), DEFAULT_PAGE),
        page_size: positive_or(query.get("limit"), DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        sort: SortSpec { field, direction },
    }
}
