use serde::Serialize;

/// Number of positional columns in the source sheet.
pub const FIELD_COUNT: usize = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// One column of the fixed sales-sheet layout, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    XnMemoDate,
    DepartmentShortName,
    CategoryShortName,
    CategoryFilter,
    BranchAlias,
    BranchFilter,
    SupplierAlias,
    SupplierFilter,
    SupplierName,
    SupplierCity,
    ArticleNo,
    Para1Name,
    Para2Name,
    Para2Index,
    Fabric,
    SubFabric,
    Concept,
    ItemId,
    ItemMrp,
    Property,
    Para3Name,
    Para4Name,
    PurDate,
    NetSlsQty,
    NetAmount,
    NetSlsCostValue,
    SlsExtCostValue,
}

impl Field {
    /// Column order is a contract with the source file.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::XnMemoDate,
        Field::DepartmentShortName,
        Field::CategoryShortName,
        Field::CategoryFilter,
        Field::BranchAlias,
        Field::BranchFilter,
        Field::SupplierAlias,
        Field::SupplierFilter,
        Field::SupplierName,
        Field::SupplierCity,
        Field::ArticleNo,
        Field::Para1Name,
        Field::Para2Name,
        Field::Para2Index,
        Field::Fabric,
        Field::SubFabric,
        Field::Concept,
        Field::ItemId,
        Field::ItemMrp,
        Field::Property,
        Field::Para3Name,
        Field::Para4Name,
        Field::PurDate,
        Field::NetSlsQty,
        Field::NetAmount,
        Field::NetSlsCostValue,
        Field::SlsExtCostValue,
    ];

    pub fn position(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::XnMemoDate
            | Field::Para2Index
            | Field::ItemMrp
            | Field::PurDate
            | Field::NetSlsQty
            | Field::NetAmount
            | Field::NetSlsCostValue
            | Field::SlsExtCostValue => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }

    /// Name used in JSON payloads and the `sortBy` parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            Field::XnMemoDate => "xnMemoDate",
            Field::DepartmentShortName => "departmentShortName",
            Field::CategoryShortName => "categoryShortName",
            Field::CategoryFilter => "categoryFilter",
            Field::BranchAlias => "branchAlias",
            Field::BranchFilter => "branchFilter",
            Field::SupplierAlias => "supplierAlias",
            Field::SupplierFilter => "supplierFilter",
            Field::SupplierName => "supplierName",
            Field::SupplierCity => "supplierCity",
            Field::ArticleNo => "articleNo",
            Field::Para1Name => "para1Name",
            Field::Para2Name => "para2Name",
            Field::Para2Index => "para2Index",
            Field::Fabric => "fabric",
            Field::SubFabric => "subFabric",
            Field::Concept => "concept",
            Field::ItemId => "itemId",
            Field::ItemMrp => "itemMRP",
            Field::Property => "property",
            Field::Para3Name => "para3Name",
            Field::Para4Name => "para4Name",
            Field::PurDate => "purDate",
            Field::NetSlsQty => "netSlsQty",
            Field::NetAmount => "netAmount",
            Field::NetSlsCostValue => "netSlsCostValue",
            Field::SlsExtCostValue => "slsExtCostValue",
        }
    }

    /// SQL column name.
    pub fn column(self) -> &'static str {
        match self {
            Field::XnMemoDate => "xn_memo_date",
            Field::DepartmentShortName => "department_short_name",
            Field::CategoryShortName => "category_short_name",
            Field::CategoryFilter => "category_filter",
            Field::BranchAlias => "branch_alias",
            Field::BranchFilter => "branch_filter",
            Field::SupplierAlias => "supplier_alias",
            Field::SupplierFilter => "supplier_filter",
            Field::SupplierName => "supplier_name",
            Field::SupplierCity => "supplier_city",
            Field::ArticleNo => "article_no",
            Field::Para1Name => "para1_name",
            Field::Para2Name => "para2_name",
            Field::Para2Index => "para2_index",
            Field::Fabric => "fabric",
            Field::SubFabric => "sub_fabric",
            Field::Concept => "concept",
            Field::ItemId => "item_id",
            Field::ItemMrp => "item_mrp",
            Field::Property => "property",
            Field::Para3Name => "para3_name",
            Field::Para4Name => "para4_name",
            Field::PurDate => "pur_date",
            Field::NetSlsQty => "net_sls_qty",
            Field::NetAmount => "net_amount",
            Field::NetSlsCostValue => "net_sls_cost_value",
            Field::SlsExtCostValue => "sls_ext_cost_value",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.api_name() == name)
    }
}

/// A raw spreadsheet cell, passed through untouched until the storage layer coerces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Empty cells and whitespace-only text carry no value.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) | Cell::Bool(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// A normalized sheet row, one cell per [`Field`], ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub source_row: usize,
    pub cells: [Cell; FIELD_COUNT],
}

impl Record {
    pub fn get(&self, field: Field) -> &Cell {
        &self.cells[field.position()]
    }
}

/// A persisted record as the read side returns it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    #[serde(rename = "_id")]
    pub id: i64,
    pub xn_memo_date: Option<f64>,
    pub department_short_name: Option<String>,
    pub category_short_name: Option<String>,
    pub category_filter: Option<String>,
    pub branch_alias: Option<String>,
    pub branch_filter: Option<String>,
    pub supplier_alias: Option<String>,
    pub supplier_filter: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_city: Option<String>,
    pub article_no: String,
    pub para1_name: Option<String>,
    pub para2_name: Option<String>,
    pub para2_index: Option<f64>,
    pub fabric: Option<String>,
    pub sub_fabric: Option<String>,
    pub concept: Option<String>,
    pub item_id: Option<String>,
    #[serde(rename = "itemMRP")]
    pub item_mrp: Option<f64>,
    pub property: Option<String>,
    pub para3_name: Option<String>,
    pub para4_name: Option<String>,
    pub pur_date: Option<f64>,
    pub net_sls_qty: Option<f64>,
    pub net_amount: Option<f64>,
    pub net_sls_cost_value: Option<f64>,
    pub sls_ext_cost_value: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("sheet has no header row")]
    MissingHeader,
    #[error("sheet layout drifted: expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
}

/// Checks the header row width against [`Field::ALL`]; trailing empty header cells are ignored.
pub fn check_layout(header: &[Cell]) -> Result<(), LayoutError> {
    let found = header
        .iter()
        .rposition(|cell| !cell.is_blank())
        .map_or(0, |idx| idx + 1);
    if found != FIELD_COUNT {
        return Err(LayoutError::ColumnCount {
            expected: FIELD_COUNT,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_positions_follow_layout_order() {
        for (idx, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.position(), idx);
        }
        assert_eq!(Field::ArticleNo.position(), 10);
        assert_eq!(Field::SlsExtCostValue.position(), 26);
    }

    #[test]
    fn api_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_api_name(field.api_name()), Some(field));
        }
        assert_eq!(Field::from_api_name("itemMRP"), Some(Field::ItemMrp));
        assert_eq!(Field::from_api_name("nope"), None);
    }

    #[test]
    fn check_layout_ignores_trailing_empty_headers() {
        let mut header: Vec<Cell> = Field::ALL
            .iter()
            .map(|field| Cell::from(field.api_name()))
            .collect();
        header.push(Cell::Empty);
        header.push(Cell::Text("  ".to_string()));

        assert_eq!(check_layout(&header), Ok(()));
    }

    #[test]
    fn check_layout_rejects_drifted_width() {
        let header: Vec<Cell> = (0..26).map(|idx| Cell::Text(format!("c{idx}"))).collect();

        assert_eq!(
            check_layout(&header),
            Err(LayoutError::ColumnCount {
                expected: 27,
                found: 26
            })
        );
    }
}
