use rusqlite::types::Value;

use crate::domain::entities::record::{Cell, FieldKind};

/// Casts a raw cell to the column's storage type.
pub fn coerce(cell: &Cell, kind: FieldKind) -> Result<Value, String> {
    match (kind, cell) {
        (_, Cell::Empty) => Ok(Value::Null),
        (FieldKind::Text, Cell::Text(text)) => Ok(Value::Text(text.clone())),
        (FieldKind::Text, Cell::Number(number)) => Ok(Value::Text(number.to_string())),
        (FieldKind::Text, Cell::Bool(flag)) => Ok(Value::Text(flag.to_string())),
        (FieldKind::Number, Cell::Number(number)) if number.is_finite() => Ok(Value::Real(*number)),
        (FieldKind::Number, Cell::Number(number)) => {
            Err(format!("cannot store non-finite number {number}"))
        }
        (FieldKind::Number, Cell::Bool(flag)) => Ok(Value::Real(if *flag { 1.0 } else { 0.0 })),
        (FieldKind::Number, Cell::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            match trimmed.parse::<f64>() {
                Ok(number) if number.is_finite() => Ok(Value::Real(number)),
                _ => Err(format!("cast to number failed for value \"{text}\"")),
            }
        }
    }
}
