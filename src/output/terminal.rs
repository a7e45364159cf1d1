//! Terminal grid output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::model::Table;

use super::OutputFormatter;

/// Box-drawn grid followed by a row count
pub struct TerminalOutput {
    show_count: bool,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self { show_count: true }
    }

    pub fn without_count() -> Self {
        Self { show_count: false }
    }

    fn write_count(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        if !self.show_count {
            return Ok(());
        }
        match table.row_count() {
            1 => writeln!(writer, "(1 row)")?,
            n => writeln!(writer, "({} rows)", n)?,
        }
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        if table.column_count() == 0 {
            writeln!(writer, "(no columns)")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        for record in table.records() {
            builder.push_record(record.iter().cloned());
        }

        let mut grid = builder.build();
        grid.with(Style::modern());
        writeln!(writer, "{}", grid)?;

        self.write_count(table, writer)
    }
}
