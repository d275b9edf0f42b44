// ============================================================
// CELL VALUES
// ============================================================
// A cell holds text, a number, or nothing. Serialized form keeps
// numbers as numbers and renders empty cells as "".

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Build a cell from a raw text field, mapping blank input to `Empty`.
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric coercion: native numbers pass through, text is parsed
    /// with thousands separators stripped.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .or_else(|| trimmed.replace(',', "").parse::<f64>().ok())
            }
            CellValue::Empty => None,
        }
    }

    /// Display form used for haystacks and delimited exports. Integral
    /// numbers render without a trailing `.0`.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Empty => String::new(),
        }
    }
}

pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::from_text(&value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl Serialize for CellValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, a number, or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CellValue, E> {
        Ok(if v.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(v.to_string())
        })
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<CellValue, E> {
        self.visit_str(&v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Number(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Text(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Empty)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Empty)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<CellValue, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CellValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(CellValue::from_text("   "), CellValue::Empty);
        assert_eq!(
            CellValue::from_text("hello"),
            CellValue::Text("hello".to_string())
        );
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CellValue::from_text("85000").as_number(), Some(85000.0));
        assert_eq!(CellValue::from_text("1,234.5").as_number(), Some(1234.5));
        assert_eq!(CellValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(CellValue::from_text("abc").as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_render_trims_integral_floats() {
        assert_eq!(CellValue::Number(1.0).render(), "1");
        assert_eq!(CellValue::Number(2.5).render(), "2.5");
        assert_eq!(CellValue::Empty.render(), "");
    }

    #[test]
    fn test_serde_roundtrip() {
        let cells = vec![
            CellValue::Text("John".to_string()),
            CellValue::Number(42.0),
            CellValue::Number(1.5),
            CellValue::Empty,
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"["John",42,1.5,""]"#);

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }

    #[test]
    fn test_null_deserializes_to_empty() {
        let back: CellValue = serde_json::from_str("null").unwrap();
        assert_eq!(back, CellValue::Empty);
    }
}
