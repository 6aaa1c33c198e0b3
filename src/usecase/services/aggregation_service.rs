use std::sync::Arc;

use crate::domain::entities::query::FilterCriteria;
use crate::domain::entities::summary::Summary;
use crate::usecase::ports::repo::{RecordSource, StoreError};
use crate::usecase::services::query_builder::build_predicate;

/// Summary statistics over the filtered set, recomputed on every call.
#[derive(Clone)]
pub struct AggregationService {
    source: Arc<dyn RecordSource>,
}

impl AggregationService {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Uses the same predicate as the listing, ignoring pagination.
    pub fn summarize(&self, criteria: &FilterCriteria) -> Result<Summary, StoreError> {
        let predicate = build_predicate(criteria);
        let aggregate = self.source.aggregate(&predicate)?;
        Ok(Summary::from(aggregate))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::entities::query::{Predicate, SortSpec};
    use crate::domain::entities::record::{Field, SalesRecord};
    use crate::domain::entities::summary::Aggregate;

    #[derive(Default)]
    struct StubSource {
        aggregate: Aggregate,
        seen: Mutex<Vec<Predicate>>,
    }

    impl RecordSource for StubSource {
        fn count(&self, _predicate: &Predicate) -> Result<u64, StoreError> {
            Ok(self.aggregate.count)
        }

        fn find(
            &self,
            _predicate: &Predicate,
            _sort: SortSpec,
            _skip: u64,
            _limit: u64,
        ) -> Result<Vec<SalesRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn first(&self, _limit: u64) -> Result<Vec<SalesRecord>, StoreError> {
            Ok(Vec::new())
        }

        fn distinct(&self, _field: Field) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        fn aggregate(&self, predicate: &Predicate) -> Result<Aggregate, StoreError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(predicate.clone());
            }
            Ok(self.aggregate)
        }
    }

    #[test]
    fn summary_of_empty_set_is_all_zero() {
        let service = AggregationService::new(Arc::new(StubSource::default()));

        let summary = service
            .summarize(&FilterCriteria::default())
            .expect("summary should succeed");

        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn summary_projects_aggregate_and_uses_filter_predicate() {
        let source = Arc::new(StubSource {
            aggregate: Aggregate {
                count: 4,
                sum_net_amount: 400.0,
                sum_net_sls_qty: 8.0,
                avg_net_amount: 100.0,
                avg_item_mrp: 55.5,
                max_net_amount: 250.0,
                min_net_amount: 10.0,
            },
            ..StubSource::default()
        });
        let service = AggregationService::new(source.clone());
        let criteria = FilterCriteria {
            branch_filter: Some("main".to_string()),
            ..FilterCriteria::default()
        };

        let summary = service.summarize(&criteria).expect("summary should succeed");

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.total_net_amount, 400.0);
        assert_eq!(summary.total_net_sls_qty, 8.0);
        assert_eq!(summary.avg_net_amount, 100.0);
        assert_eq!(summary.avg_item_mrp, 55.5);
        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].clauses.len(), 1);
        assert_eq!(seen[0].clauses[0].field, Field::BranchFilter);
    }
}
