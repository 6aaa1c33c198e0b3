use crate::domain::entities::record::{Cell, Field, Record, FIELD_COUNT};

/// Maps one positional sheet row onto the fixed field layout.
///
/// Returns `None` for rows that should be skipped: empty rows, rows whose first
/// cell (the memo date) is blank, and rows without an article number. Cells are
/// not coerced here; slots past the end of a short row are `Cell::Empty`.
pub fn normalize_row(row: &[Cell], row_idx: usize) -> Option<Record> {
    match row.first() {
        None => return None,
        Some(first) if first.is_blank() => return None,
        Some(_) => {}
    }

    let cells: [Cell; FIELD_COUNT] =
        std::array::from_fn(|position| row.get(position).cloned().unwrap_or_default());
    let record = Record {
        source_row: row_idx,
        cells,
    };

    if record.get(Field::ArticleNo).is_blank() {
        return None;
    }

    Some(record)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedRows {
    pub records: Vec<Record>,
    pub skipped: usize,
}

/// Normalizes every data row. `rows` excludes the header; row indices are sheet
/// indices, so the first data row is index 1.
pub fn normalize_rows(rows: &[Vec<Cell>]) -> NormalizedRows {
    let mut normalized = NormalizedRows::default();
    for (offset, row) in rows.iter().enumerate() {
        match normalize_row(row, offset + 1) {
            Some(record) => normalized.records.push(record),
            None => normalized.skipped += 1,
        }
    }
    normalized
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_row(memo_date: f64, article_no: &str, category: &str) -> Vec<Cell> {
        let mut row = vec![Cell::Empty; FIELD_COUNT];
        row[Field::XnMemoDate.position()] = Cell::Number(memo_date);
        row[Field::CategoryFilter.position()] = Cell::from(category);
        row[Field::BranchFilter.position()] = Cell::from("MAIN ROAD");
        row[Field::SupplierFilter.position()] = Cell::from("ACME TEXTILES");
        row[Field::ArticleNo.position()] = Cell::from(article_no);
        row[Field::ItemMrp.position()] = Cell::Number(499.0);
        row[Field::NetSlsQty.position()] = Cell::Number(2.0);
        row[Field::NetAmount.position()] = Cell::Number(998.0);
        row
    }

    #[test]
    fn maps_positional_cells_to_fields() {
        let row = sample_row(45123.0, "ART-1", "SILK SAREE");

        let record = normalize_row(&row, 4).expect("row should normalize");

        assert_eq!(record.source_row, 4);
        assert_eq!(record.get(Field::XnMemoDate), &Cell::Number(45123.0));
        assert_eq!(record.get(Field::ArticleNo), &Cell::from("ART-1"));
        assert_eq!(record.get(Field::CategoryFilter), &Cell::from("SILK SAREE"));
        assert_eq!(record.get(Field::NetAmount), &Cell::Number(998.0));
    }

    #[test]
    fn skips_empty_rows() {
        assert_eq!(normalize_row(&[], 1), None);
    }

    #[test]
    fn skips_rows_with_blank_first_cell_regardless_of_other_cells() {
        let mut row = sample_row(45123.0, "ART-1", "SILK");
        row[0] = Cell::Empty;
        assert_eq!(normalize_row(&row, 1), None);

        row[0] = Cell::Text("   ".to_string());
        assert_eq!(normalize_row(&row, 1), None);
    }

    #[test]
    fn skips_rows_without_article_number() {
        let mut row = sample_row(45123.0, "", "SILK");
        assert_eq!(normalize_row(&row, 1), None);

        row[Field::ArticleNo.position()] = Cell::Empty;
        assert_eq!(normalize_row(&row, 1), None);
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let mut row = sample_row(45123.0, "ART-9", "SILK");
        row.truncate(11);

        let record = normalize_row(&row, 2).expect("row should normalize");

        assert_eq!(record.get(Field::ArticleNo), &Cell::from("ART-9"));
        assert_eq!(record.get(Field::SlsExtCostValue), &Cell::Empty);
    }

    #[test]
    fn cells_pass_through_without_coercion() {
        let mut row = sample_row(45123.0, "ART-1", "SILK");
        row[Field::NetAmount.position()] = Cell::from("not a number");
        row[Field::ArticleNo.position()] = Cell::Number(1042.0);

        let record = normalize_row(&row, 1).expect("row should normalize");

        assert_eq!(record.get(Field::NetAmount), &Cell::from("not a number"));
        assert_eq!(record.get(Field::ArticleNo), &Cell::Number(1042.0));
    }

    #[test]
    fn normalize_rows_counts_skips_and_keeps_sheet_indices() {
        let rows = vec![
            sample_row(45123.0, "ART-1", "SILK"),
            sample_row(45124.0, "", "SILK"),
            sample_row(45125.0, "ART-3", "COTTON"),
        ];

        let normalized = normalize_rows(&rows);

        assert_eq!(normalized.skipped, 1);
        let source_rows: Vec<usize> = normalized.records.iter().map(|r| r.source_row).collect();
        assert_eq!(source_rows, vec![1, 3]);
    }
}
