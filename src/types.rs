use crate::error::{PortalError, PortalResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Cell Values
//==============================================================================

/// A scalar value stored in one worksheet cell.
///
/// Serialized untagged, so JSON sees plain `"text"`, `2020`, `20.5` or `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// One raw cell: `None` is an absent/null cell.
pub type Cell = Option<CellValue>;

/// An ordered sequence of cells with no field names attached.
pub type RawRow = Vec<Cell>;

impl CellValue {
    /// The value used for fields whose source cell is missing.
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// True for empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Convert a JSON scalar into a cell.
    ///
    /// `null` maps to an absent cell; arrays and objects are rejected since a
    /// worksheet cell can only hold a scalar.
    pub fn from_json(value: &serde_json::Value) -> PortalResult<Cell> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(CellValue::Bool(*b))),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Some(CellValue::Int(i))),
                None => Ok(Some(CellValue::Float(n.as_f64().unwrap_or_default()))),
            },
            Value::String(s) => Ok(Some(CellValue::Text(s.clone()))),
            Value::Array(_) | Value::Object(_) => Err(PortalError::Validation(
                "cell values must be strings, numbers or booleans".to_string(),
            )),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// Build a raw row of text cells, mostly for tests and seed header blocks.
pub fn text_row<S: AsRef<str>>(values: &[S]) -> RawRow {
    values
        .iter()
        .map(|v| Some(CellValue::from(v.as_ref())))
        .collect()
}

//==============================================================================
// Records
//==============================================================================

/// A named-field view of one data row, keyed in field order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, CellValue>);

impl Record {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: CellValue) -> Option<CellValue> {
        self.0.insert(field.into(), value)
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cell_value_json_is_untagged() {
        let cells: RawRow = vec![
            Some(CellValue::from("2020")),
            Some(CellValue::Int(7)),
            Some(CellValue::Float(2.5)),
            Some(CellValue::Bool(true)),
            None,
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"["2020",7,2.5,true,null]"#);

        let back: RawRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = CellValue::from_json(&serde_json::json!(["a"])).unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));

        let err = CellValue::from_json(&serde_json::json!({"a": 1})).unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(CellValue::from_json(&serde_json::Value::Null).unwrap(), None);
        assert_eq!(
            CellValue::from_json(&serde_json::json!(12)).unwrap(),
            Some(CellValue::Int(12))
        );
        assert_eq!(
            CellValue::from_json(&serde_json::json!(1.5)).unwrap(),
            Some(CellValue::Float(1.5))
        );
        assert_eq!(
            CellValue::from_json(&serde_json::json!("x")).unwrap(),
            Some(CellValue::from("x"))
        );
    }

    #[test]
    fn test_is_blank() {
        assert!(CellValue::empty().is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("a").is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn test_record_keeps_field_order_in_json() {
        let record = Record::new()
            .with("year", "2021")
            .with("title", "New Award")
            .with("amount", 1200i64);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"year":"2021","title":"New Award","amount":1200}"#);
        assert_eq!(record.fields().collect::<Vec<_>>(), vec!["year", "title", "amount"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::from("abc").to_string(), "abc");
        assert_eq!(CellValue::Int(2020).to_string(), "2020");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
    }
}
