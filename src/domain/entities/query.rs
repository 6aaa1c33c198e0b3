use serde::Serialize;

use crate::domain::entities::record::{Field, SalesRecord};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 1000;
pub const MAX_PAGE_SIZE: u64 = 10_000;

/// Optional substring constraints shared by listing and aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_filter: Option<String>,
}

/// Case-insensitive substring constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    pub field: Field,
    pub needle: String,
}

/// Storage-layer filter: every clause must hold. An empty predicate matches all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub clauses: Vec<Contains>,
}

impl Predicate {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: Field::XnMemoDate,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: u64,
    pub page_size: u64,
    pub sort: SortSpec,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortSpec::default(),
        }
    }
}

impl PageRequest {
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
    pub records_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(request: &PageRequest, total_records: u64) -> Self {
        let page_size = request.page_size.max(1);
        Self {
            current_page: request.page,
            total_pages: total_records.div_ceil(page_size),
            total_records,
            records_per_page: page_size,
            has_next_page: request.skip().saturating_add(page_size) < total_records,
            has_prev_page: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<SalesRecord>,
    pub pagination: Pagination,
}
