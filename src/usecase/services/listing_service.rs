use std::sync::Arc;

use crate::domain::entities::query::{FilterCriteria, Page, PageRequest, Pagination};
use crate::domain::entities::record::Field;
use crate::domain::entities::summary::FilterOptions;
use crate::usecase::ports::repo::{RecordSource, StoreError};
use crate::usecase::services::query_builder::build_predicate;

/// Paged listing and filter dropdown values.
#[derive(Clone)]
pub struct ListingService {
    source: Arc<dyn RecordSource>,
}

impl ListingService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// One page of filtered records plus pagination metadata. Pages past the end are empty.
    pub fn list(
        &self,
        criteria: &FilterCriteria,
        request: &PageRequest,
    ) -> Result<Page, StoreError> {
        let predicate = build_predicate(criteria);
        let total_records = self.source.count(&predicate)?;
        let pagination = Pagination::new(request, total_records);

        let skip = request.skip();
        let records = if skip >= total_records {
            Vec::new()
        } else {
            self.source
                .find(&predicate, request.sort, skip, pagination.records_per_page)?
        };

        Ok(Page {
            records,
            pagination,
        })
    }

    pub fn filter_options(&self) -> Result<FilterOptions, StoreError> {
        Ok(FilterOptions {
            categories: self.non_blank_distinct(Field::CategoryFilter)?,
            branches: self.non_blank_distinct(Field::BranchFilter)?,
            suppliers: self.non_blank_distinct(Field::SupplierFilter)?,
        })
    }

    fn non_blank_distinct(&self, field: Field) -> Result<Vec<String>, StoreError> {
        let mut values = self.source.distinct(field)?;
        values.retain(|value| !value.trim().is_empty());
        Ok(values)
    }
}
