//! JSON output format

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::Table;
use crate::reshape;

use super::OutputFormatter;

/// JSON output formatter.
///
/// Without a key the output is an array of records. With a key it is an object
/// mapping each key value to the records sharing it.
pub struct JsonOutput {
    pretty: bool,
    key: Option<String>,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self {
            pretty: true,
            key: None,
        }
    }

    pub fn compact() -> Self {
        Self {
            pretty: false,
            key: None,
        }
    }

    pub fn keyed_by(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    fn write_value<T: Serialize>(&self, value: &T, writer: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        match &self.key {
            Some(key) => {
                let grouped = reshape::keyed_map_list(table, key)
                    .with_context(|| format!("key column not found: {}", key))?;
                self.write_value(&grouped, writer)
            }
            None => {
                let records = reshape::map_list(table).unwrap_or_default();
                self.write_value(&records, writer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_table;

    fn render(output: JsonOutput, table: &Table) -> Result<serde_json::Value> {
        let mut out = Vec::new();
        output.render(table, &mut out)?;
        Ok(serde_json::from_slice(&out)?)
    }

    #[test]
    fn test_json_records() {
        let value = render(JsonOutput::compact(), &sample_table()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": "1", "name": "ann"},
                {"id": "2", "name": "O'Brien, Pat"}
            ])
        );
    }

    #[test]
    fn test_json_keyed() {
        let value = render(JsonOutput::new().keyed_by("name"), &sample_table()).unwrap();
        assert_eq!(value["ann"][0]["id"], "1");
        assert_eq!(value["O'Brien, Pat"][0]["id"], "2");
    }

    #[test]
    fn test_json_missing_key() {
        let err = render(JsonOutput::new().keyed_by("nope"), &sample_table()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_json_compact_is_one_line() {
        let mut out = Vec::new();
        JsonOutput::compact().render(&sample_table(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_json_without_columns() {
        let value = render(JsonOutput::new(), &Table::default()).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}
