use indexmap::IndexMap;
use serde::Serialize;

/// One CSV row: header name to trimmed cell value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CsvRecord {
    fields: IndexMap<String, String>,
}

impl CsvRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(header.into(), value.into());
    }

    /// Raw value of a column, empty or not.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    /// First non-empty value among several historical spellings of a column.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The untouched row, kept for provenance.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.fields).unwrap_or(serde_json::Value::Null)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = CsvRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_skips_empty_and_missing() {
        let record: CsvRecord = [("Total_Sales", ""), ("Closed_Sales", "812")]
            .into_iter()
            .collect();
        assert_eq!(
            record.first_of(&["Total_Sales", "Sales", "Closed_Sales"]),
            Some("812")
        );
        assert_eq!(record.first_of(&["Sales"]), None);
    }

    #[test]
    fn test_first_of_prefers_earlier_alias() {
        let record: CsvRecord = [("Sales", "10"), ("Total_Sales", "20")]
            .into_iter()
            .collect();
        assert_eq!(record.first_of(&["Total_Sales", "Sales"]), Some("20"));
    }

    #[test]
    fn test_to_json_keeps_every_column() {
        let record: CsvRecord = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = record.to_json();
        assert_eq!(json, serde_json::json!({"b": "2", "a": "1"}));
    }
}
