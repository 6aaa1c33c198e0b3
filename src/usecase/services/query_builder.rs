use crate::domain::entities::query::{Contains, FilterCriteria, Predicate};
use crate::domain::entities::record::Field;

/// Builds the predicate shared by listing and aggregation. Absent and empty filters
/// add no constraint; the rest are ANDed.
pub fn build_predicate(criteria: &FilterCriteria) -> Predicate {
    let filters = [
        (Field::CategoryFilter, &criteria.category_filter),
        (Field::BranchFilter, &criteria.branch_filter),
        (Field::SupplierFilter, &criteria.supplier_filter),
    ];

    let clauses = filters
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(needle) if !needle.is_empty() => Some(Contains {
                field,
                needle: needle.to_string(),
            }),
            _ => None,
        })
        .collect();

    Predicate { clauses }
}
