//! Output formatting for query results

mod csv;
mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::model::Table;

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a result table to a writer
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type.
    ///
    /// `key_column` groups JSON records by that column; other formats ignore it.
    pub fn create(format: OutputFormat, key_column: Option<&str>) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => match key_column {
                Some(key) => Box::new(JsonOutput::new().keyed_by(key)),
                None => Box::new(JsonOutput::new()),
            },
            OutputFormat::Csv => Box::new(CsvOutput::new()),
        }
    }
}

/// Render a result table to stdout
pub fn render_to_stdout(table: &Table, format: OutputFormat, key_column: Option<&str>) -> Result<()> {
    let formatter = OutputFactory::create(format, key_column);
    let mut stdout = std::io::stdout().lock();
    formatter.render(table, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_table() -> Table {
    let mut table = Table::new(vec!["id".to_string(), "name".to_string()]);
    table.add_row(vec!["1".to_string(), "ann".to_string()]);
    table.add_row(vec!["2".to_string(), "O'Brien, Pat".to_string()]);
    table
}
