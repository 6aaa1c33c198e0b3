use std::sync::Arc;

use crate::domain::entities::query::Predicate;
use crate::domain::entities::record::{Field, SalesRecord};
use crate::domain::entities::summary::Aggregate;
use crate::usecase::ports::repo::{RecordSource, StoreError};

const SAMPLE_SIZE: u64 = 3;

/// Post-import sanity check over the whole active record set.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyReport {
    pub total_records: u64,
    pub distinct_categories: usize,
    pub distinct_branches: usize,
    pub distinct_suppliers: usize,
    pub samples: Vec<SalesRecord>,
    pub totals: Aggregate,
}

pub struct VerifyService {
    source: Arc<dyn RecordSource>,
}

impl VerifyService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub fn verify(&self) -> Result<VerifyReport, StoreError> {
        let all = Predicate::match_all();

        Ok(VerifyReport {
            total_records: self.source.count(&all)?,
            distinct_categories: self.source.distinct(Field::CategoryFilter)?.len(),
            distinct_branches: self.source.distinct(Field::BranchFilter)?.len(),
            distinct_suppliers: self.source.distinct(Field::SupplierFilter)?.len(),
            samples: self.source.first(SAMPLE_SIZE)?,
            totals: self.source.aggregate(&all)?,
        })
    }
}
