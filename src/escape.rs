//! Escaping of values embedded directly in SQL text
//!
//! These helpers exist for statements that cannot use bind parameters. Prefer
//! passing arguments to [`crate::execute`] and [`crate::query`].

/// Double every single quote
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// Replace CR and LF with the two-character sequences `\r` and `\n`, then double quotes
pub fn escape_literal_controls(text: &str) -> String {
    escape_literal(&text.replace('\r', "\\r").replace('\n', "\\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("O'Brien"), "O''Brien");
        assert_eq!(escape_literal("plain"), "plain");
        assert_eq!(escape_literal("a\nb"), "a\nb");
    }

    #[test]
    fn test_escape_literal_controls() {
        assert_eq!(escape_literal_controls("it's\r\nok"), "it''s\\r\\nok");
        assert_eq!(escape_literal_controls("O'Brien"), "O''Brien");
    }
}
