//! Conversion of decoded cell values into canonical display strings
//!
//! Drivers report column types with vendor-specific names and decode numeric
//! columns into different native representations. The [`Normalizer`] collapses
//! that variability into one deterministic string per cell. It never fails:
//! values that do not fit their declared type degrade to a generic conversion
//! and a debug trace.

pub mod number;

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::config::{NormalizeConfig, Strictness};
use crate::model::{CellValue, TypeCategory, DEFAULT_DATETIME_FORMAT};

/// Cell value normalizer
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
    strictness: Strictness,
}

impl Normalizer {
    /// Create a type-aware normalizer with the given settings
    pub fn new(config: NormalizeConfig) -> Self {
        Self {
            config,
            strictness: Strictness::Typed,
        }
    }

    /// Set the normalization tier
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Convert one cell to its display string.
    ///
    /// NULL always yields the empty string. Rejecting NULL for the raw tier is
    /// the caller's job since it is a scan failure, not a formatting concern.
    pub fn normalize(&self, type_name: &str, value: &CellValue) -> String {
        if value.is_null() {
            return String::new();
        }

        match self.strictness {
            Strictness::Raw | Strictness::Generic => self.stringify(value),
            Strictness::Typed => self.typed(type_name, value),
        }
    }

    /// Best-effort conversion of any value to text
    pub fn stringify(&self, value: &CellValue) -> String {
        match value {
            CellValue::Timestamp(ts) => self.format_timestamp(ts),
            other => other.display().into_owned(),
        }
    }

    /// Round a floating-point value to the configured precision
    pub fn round_float(&self, value: f64) -> f64 {
        number::round_to(value, self.config.float_precision)
    }

    fn typed(&self, type_name: &str, value: &CellValue) -> String {
        match (TypeCategory::classify(type_name), value) {
            (TypeCategory::Double, v) => self.double(type_name, v),
            (TypeCategory::Number, CellValue::Integer(i)) => {
                number::trim_fraction(&i.to_string()).to_string()
            }
            (TypeCategory::Number | TypeCategory::Decimal, v) => self.decimal(type_name, v),
            (TypeCategory::Integer, v) => self.integer(type_name, v),
            (TypeCategory::Date, CellValue::Timestamp(ts)) => self.format_timestamp(ts),
            (TypeCategory::Date | TypeCategory::Text, v) => self.stringify(v),
            (TypeCategory::Unrecognized, v) => {
                trace_fallback(type_name, v);
                self.stringify(v)
            }
        }
    }

    fn double(&self, type_name: &str, value: &CellValue) -> String {
        let parsed = match value {
            CellValue::Float(f) => Some(*f),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bytes(b) => std::str::from_utf8(b)
                .ok()
                .and_then(|s| s.trim().parse::<f64>().ok()),
            _ => None,
        };

        match parsed {
            Some(f) => self.round_float(f).to_string(),
            None => {
                trace_fallback(type_name, value);
                self.stringify(value)
            }
        }
    }

    fn decimal(&self, type_name: &str, value: &CellValue) -> String {
        let text = self.without_exponent(type_name, value, self.stringify(value));
        number::trim_fraction(&text).to_string()
    }

    fn integer(&self, type_name: &str, value: &CellValue) -> String {
        let native = self.native_form(value);
        let text = if native.contains('[') {
            self.stringify(value)
        } else {
            native
        };
        let text = self.without_exponent(type_name, value, text);
        number::trim_fraction(&text).to_string()
    }

    fn without_exponent(&self, type_name: &str, value: &CellValue, text: String) -> String {
        if !number::has_exponent(&text) {
            return text;
        }
        match number::exponent_to_integer(&text) {
            Some(plain) => plain,
            None => {
                trace_fallback(type_name, value);
                text
            }
        }
    }

    /// Native rendering of a value; byte sequences show as a list of byte values
    fn native_form(&self, value: &CellValue) -> String {
        match value {
            CellValue::Bytes(b) => format!("{:?}", b),
            other => self.stringify(other),
        }
    }

    fn format_timestamp(&self, ts: &NaiveDateTime) -> String {
        let mut out = String::new();
        if write!(out, "{}", ts.format(&self.config.datetime_format)).is_err() {
            tracing::debug!(
                format = %self.config.datetime_format,
                "invalid datetime format, using default"
            );
            return ts.format(DEFAULT_DATETIME_FORMAT).to_string();
        }
        out
    }
}

fn trace_fallback(type_name: &str, value: &CellValue) {
    tracing::debug!(
        type_name,
        kind = %value.kind(),
        value = ?value,
        "no conversion rule for column type, using generic conversion"
    );
}
