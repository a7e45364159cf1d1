//! Conversion of single-value query results

use crate::error::{DriverError, Error, Result};
use crate::model::CellValue;
use crate::normalize::Normalizer;

fn conversion_error(value: &CellValue, target: &str) -> Error {
    Error::Scan {
        row: 1,
        source: DriverError::Conversion {
            column: 0,
            message: format!("cannot convert {} value {:?} to {}", value.kind(), value, target),
        },
    }
}

/// Integer view of a scalar; floats convert only when they have no fraction
pub fn to_int(value: &CellValue) -> Result<i64> {
    match value {
        CellValue::Integer(i) => Ok(*i),
        CellValue::Bool(b) => Ok(i64::from(*b)),
        CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
        CellValue::Text(s) => s.trim().parse().map_err(|_| conversion_error(value, "integer")),
        CellValue::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| conversion_error(value, "integer")),
        _ => Err(conversion_error(value, "integer")),
    }
}

/// Float view of a scalar, rounded to the normalizer's precision
pub fn to_float(value: &CellValue, normalizer: &Normalizer) -> Result<f64> {
    let f = match value {
        CellValue::Float(f) => *f,
        CellValue::Integer(i) => *i as f64,
        CellValue::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| conversion_error(value, "float"))?,
        CellValue::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| conversion_error(value, "float"))?,
        _ => return Err(conversion_error(value, "float")),
    };
    Ok(normalizer.round_float(f))
}

/// String view of a scalar; NULL has no string form
pub fn to_string(value: &CellValue, normalizer: &Normalizer) -> Result<String> {
    if value.is_null() {
        return Err(conversion_error(value, "string"));
    }
    Ok(normalizer.stringify(value))
}
