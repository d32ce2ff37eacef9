//! Financial record model
//!
//! Records arrive from the hosted `financial_data` table (or a local export of
//! it) and are not validated upstream. Every field is optional and decoded
//! leniently: a field that holds the wrong kind of value is treated as absent
//! rather than failing the whole batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `data_type` tag that marks a record as income regardless of its sign
pub const INCOME_TAG: &str = "income";

/// Label used for records without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One row of extracted financial data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FinancialRecord {
    /// Build a record from named text columns (CSV headers and cells).
    /// Cells are kept verbatim; only `amount` is parsed.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut record = Self::default();
        for (key, value) in fields {
            record.set_field(key, Scalar::Text(value.to_string()));
        }
        record
    }

    /// Fill one field from a column. The first non-empty value for a field
    /// wins, so `data_type` and `dataType` may both be present.
    fn set_field(&mut self, key: &str, value: Scalar) {
        let slot = match key {
            "id" => &mut self.id,
            "date" => &mut self.date,
            "category" => &mut self.category,
            "data_type" | "dataType" => &mut self.data_type,
            "description" => &mut self.description,
            "amount" => {
                if self.amount.is_none() {
                    self.amount = value.into_amount();
                }
                return;
            }
            _ => return,
        };
        if slot.is_none() {
            *slot = value.into_text();
        }
    }

    /// Amount with missing, non-numeric and non-finite values coerced to zero
    pub fn amount_value(&self) -> f64 {
        self.amount.filter(|a| a.is_finite()).unwrap_or(0.0)
    }

    /// Category label, falling back to [`UNCATEGORIZED`]
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    /// Whether the record carries the explicit income tag
    pub fn is_income_tagged(&self) -> bool {
        self.data_type.as_deref() == Some(INCOME_TAG)
    }

    /// Calendar date of the record, if present and parseable
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Parse the date formats the platform emits.
///
/// Plain dates (`2024-01-31`), RFC 3339 timestamps, and Postgres-style
/// timestamps with or without an offset are accepted. Timestamps keep the
/// calendar date as written; no timezone conversion is applied.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

// =============================================================================
// Lenient field decoding
// =============================================================================

/// Any scalar a loosely-typed column may hold
enum Scalar {
    Missing,
    Flag(bool),
    Number(f64),
    Text(String),
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, string, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Flag(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar::Number(v as f64))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Scalar, E> {
        Ok(Scalar::Number(v as f64))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Scalar, E> {
        Ok(Scalar::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Missing)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scalar, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }

    // Nested values are drained so the surrounding record still decodes
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Scalar, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Scalar::Missing)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scalar, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Scalar::Missing)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

impl Scalar {
    fn into_amount(self) -> Option<f64> {
        let amount = match self {
            Scalar::Number(n) => Some(n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Flag(_) | Scalar::Missing => None,
        };
        amount.filter(|a| a.is_finite())
    }

    fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(s) if s.is_empty() => None,
            Scalar::Text(s) => Some(s),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Flag(b) => Some(b.to_string()),
            Scalar::Missing => None,
        }
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = FinancialRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a financial record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FinancialRecord, A::Error> {
        let mut record = FinancialRecord::default();
        while let Some(key) = map.next_key::<String>()? {
            let value: Scalar = map.next_value()?;
            record.set_field(&key, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for FinancialRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> FinancialRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decodes_platform_row() {
        let record = decode(
            r#"{"id": 7, "date": "2024-03-05", "amount": "-42.10",
                "category": "Travel", "data_type": "expense", "user_id": "u1"}"#,
        );
        assert_eq!(record.id.as_deref(), Some("7"));
        assert_eq!(record.amount, Some(-42.10));
        assert_eq!(record.category_label(), "Travel");
        assert!(!record.is_income_tagged());
        assert_eq!(record.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_accepts_camel_case_data_type() {
        let record = decode(r#"{"amount": -5, "dataType": "income"}"#);
        assert!(record.is_income_tagged());
    }

    #[test]
    fn test_both_data_type_spellings() {
        let record = decode(r#"{"amount": 5, "data_type": "income", "dataType": "income"}"#);
        assert!(record.is_income_tagged());

        let record = decode(r#"{"amount": -5, "dataType": "", "data_type": "income"}"#);
        assert!(record.is_income_tagged());

        let record = decode(r#"{"amount": -5, "data_type": "expense", "dataType": "income"}"#);
        assert_eq!(record.data_type.as_deref(), Some("expense"));
    }

    #[test]
    fn test_from_fields_keeps_text_verbatim() {
        let record = FinancialRecord::from_fields([
            ("id", "1e3"),
            ("amount", "-12.50"),
            ("category", "007"),
            ("description", "12.50"),
            ("notes", "ignored"),
        ]);
        assert_eq!(record.id.as_deref(), Some("1e3"));
        assert_eq!(record.amount, Some(-12.5));
        assert_eq!(record.category.as_deref(), Some("007"));
        assert_eq!(record.description.as_deref(), Some("12.50"));
    }

    #[test]
    fn test_malformed_fields_become_absent() {
        let record = decode(
            r#"{"date": {"nested": true}, "amount": "twelve", "category": "", "data_type": null}"#,
        );
        assert_eq!(record.date, None);
        assert_eq!(record.amount, None);
        assert_eq!(record.amount_value(), 0.0);
        assert_eq!(record.category_label(), UNCATEGORIZED);
        assert_eq!(record.data_type, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let record = decode("{}");
        assert_eq!(record, FinancialRecord::default());
        assert_eq!(record.amount_value(), 0.0);
        assert_eq!(record.parsed_date(), None);
    }

    #[test]
    fn test_boolean_amount_is_not_numeric() {
        let record = decode(r#"{"amount": true}"#);
        assert_eq!(record.amount, None);
    }

    #[test]
    fn test_parse_date_formats() {
        let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31);
        assert_eq!(parse_date("2024-01-31"), jan_31);
        assert_eq!(parse_date(" 2024-01-31 "), jan_31);
        assert_eq!(parse_date("2024-01-31T23:15:00Z"), jan_31);
        assert_eq!(parse_date("2024-01-31T23:15:00.123+02:00"), jan_31);
        assert_eq!(parse_date("2024-01-31 08:00:00"), jan_31);
        assert_eq!(parse_date("2024-01-31 08:00:00+00"), jan_31);
        assert_eq!(parse_date("2024-01-31T08:00:00"), jan_31);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }
}
