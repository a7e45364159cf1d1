//! CSV output format

use std::io::Write;

use anyhow::Result;

use crate::model::Table;

use super::OutputFormatter;

/// CSV output formatter; the header is the first record
pub struct CsvOutput {
    delimiter: u8,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for CsvOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        if table.column_count() == 0 {
            return Ok(());
        }

        let mut wtr = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        for record in table.records() {
            wtr.write_record(record)?;
        }
        wtr.flush()?;

        Ok(())
    }
}
