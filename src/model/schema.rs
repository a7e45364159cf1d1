//! Runtime value kinds and declared column type categories

use serde::{Deserialize, Serialize};

/// Runtime kind of a decoded cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Null,
    Bool,
    Integer,
    Float,
    Text,
    Timestamp,
    Bytes,
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellKind::Null => write!(f, "null"),
            CellKind::Bool => write!(f, "bool"),
            CellKind::Integer => write!(f, "integer"),
            CellKind::Float => write!(f, "float"),
            CellKind::Text => write!(f, "text"),
            CellKind::Timestamp => write!(f, "timestamp"),
            CellKind::Bytes => write!(f, "bytes"),
        }
    }
}

/// Category of a driver-reported database type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    Double,
    Number,
    Decimal,
    Integer,
    Date,
    Text,
    Unrecognized,
}

const INTEGER_KEYWORDS: &[&str] = &["INTEGER", "INT", "BIGINT"];

const TEXT_KEYWORDS: &[&str] = &[
    "TEXT",
    "text",
    "CHAR",
    "VARCHAR",
    "VARCHAR2",
    "NVARCHAR2",
    "TIMESTAMP",
    "DATETIME",
];

impl TypeCategory {
    /// Classify a declared type name.
    ///
    /// The name is split into alphanumeric words so that `NUMBER(10,2)` and
    /// `DOUBLE PRECISION` match their keyword. Categories are tried in a fixed
    /// order and the first match wins.
    pub fn classify(type_name: &str) -> TypeCategory {
        let words: Vec<&str> = type_name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let has = |keyword: &str| words.iter().any(|w| *w == keyword);

        if has("DOUBLE") {
            TypeCategory::Double
        } else if has("NUMBER") {
            TypeCategory::Number
        } else if has("DECIMAL") {
            TypeCategory::Decimal
        } else if words
            .iter()
            .any(|w| INTEGER_KEYWORDS.iter().any(|k| w.eq_ignore_ascii_case(k)))
        {
            TypeCategory::Integer
        } else if has("DATE") {
            TypeCategory::Date
        } else if TEXT_KEYWORDS.iter().any(|k| has(k)) {
            TypeCategory::Text
        } else {
            TypeCategory::Unrecognized
        }
    }
}

impl std::fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeCategory::Double => write!(f, "double"),
            TypeCategory::Number => write!(f, "number"),
            TypeCategory::Decimal => write!(f, "decimal"),
            TypeCategory::Integer => write!(f, "integer"),
            TypeCategory::Date => write!(f, "date"),
            TypeCategory::Text => write!(f, "text"),
            TypeCategory::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keywords() {
        assert_eq!(TypeCategory::classify("DOUBLE"), TypeCategory::Double);
        assert_eq!(TypeCategory::classify("DOUBLE PRECISION"), TypeCategory::Double);
        assert_eq!(TypeCategory::classify("NUMBER(10)"), TypeCategory::Number);
        assert_eq!(TypeCategory::classify("DECIMAL(12,4)"), TypeCategory::Decimal);
        assert_eq!(TypeCategory::classify("VARCHAR2"), TypeCategory::Text);
        assert_eq!(TypeCategory::classify("DATE"), TypeCategory::Date);
        assert_eq!(TypeCategory::classify("DATETIME"), TypeCategory::Text);
    }

    #[test]
    fn test_classify_integer_family_ignores_case() {
        assert_eq!(TypeCategory::classify("integer"), TypeCategory::Integer);
        assert_eq!(TypeCategory::classify("UNSIGNED BIGINT"), TypeCategory::Integer);
        assert_eq!(TypeCategory::classify("Int"), TypeCategory::Integer);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(TypeCategory::classify(""), TypeCategory::Unrecognized);
        assert_eq!(TypeCategory::classify("POINT"), TypeCategory::Unrecognized);
        assert_eq!(TypeCategory::classify("double"), TypeCategory::Unrecognized);
        assert_eq!(TypeCategory::classify("BLOB"), TypeCategory::Unrecognized);
    }
}
