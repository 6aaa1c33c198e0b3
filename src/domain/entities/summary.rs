use serde::Serialize;

/// Grouped statistics over a filtered record set, as the store computes them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub count: u64,
    pub sum_net_amount: f64,
    pub sum_net_sls_qty: f64,
    pub avg_net_amount: f64,
    pub avg_item_mrp: f64,
    pub max_net_amount: f64,
    pub min_net_amount: f64,
}

/// The `/data/summary` payload. All-zero when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    #[serde(rename = "totalRecords")]
    pub total_records: u64,
    #[serde(rename = "totalNetAmount")]
    pub total_net_amount: f64,
    #[serde(rename = "totalNetSlsQty")]
    pub total_net_sls_qty: f64,
    #[serde(rename = "avgNetAmount")]
    pub avg_net_amount: f64,
    #[serde(rename = "avgItemMRP")]
    pub avg_item_mrp: f64,
}

impl From<Aggregate> for Summary {
    fn from(value: Aggregate) -> Self {
        Summary {
            total_records: value.count,
            total_net_amount: value.sum_net_amount,
            total_net_sls_qty: value.sum_net_sls_qty,
            avg_net_amount: value.avg_net_amount,
            avg_item_mrp: value.avg_item_mrp,
        }
    }
}

/// Distinct, non-blank filter keys for the table UI's dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub branches: Vec<String>,
    pub suppliers: Vec<String>,
}
