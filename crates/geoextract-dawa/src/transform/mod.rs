//! DAWA records → GeoJSON features
//!
//! One module per dataset. Each holds the record type as it arrives on the
//! wire and a pure `map` function. Every mapper emits the same property keys
//! for every record, using `null` for missing values.

pub mod access_address;
pub mod post_code;
pub mod road;
pub mod unit_address;

use std::fmt;

use geoextract_core::MappingError;
use serde::Deserialize;
use serde::de::IgnoredAny;

// Re-exports
pub use access_address::AccessAddress;
pub use post_code::PostCode;
pub use road::Road;
pub use unit_address::UnitAddress;

/// Reject records without an identifier
fn require_id(id: &str) -> Result<(), MappingError> {
    if id.trim().is_empty() {
        return Err(MappingError::new("record has no id"));
    }
    Ok(())
}

/// Lifecycle status of legacy DAWA address entities
fn status_name(status: i32) -> String {
    match status {
        1 => "active".to_string(),
        2 => "discontinued".to_string(),
        3 => "pending".to_string(),
        4 => "cancelled".to_string(),
        other => other.to_string(),
    }
}

/// Lifecycle status of DAR entities (`darstatus`)
fn dar_status_name(status: i32) -> String {
    match status {
        2 => "pending".to_string(),
        3 => "active".to_string(),
        4 => "discontinued".to_string(),
        5 => "cancelled".to_string(),
        other => other.to_string(),
    }
}

/// A numeric code as it arrives on the wire: `101` or `"0101"` depending on
/// entity. Anything else is kept so `map` can reject it as a mapping error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCode {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(_) => f.write_str("<non-scalar>"),
        }
    }
}

fn is_code_digits(s: &str) -> bool {
    (1..=4).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Zero-padded four digit code (municipality, road). Blank text is missing.
fn code(raw: Option<&RawCode>, field: &str, id: &str) -> Result<Option<String>, MappingError> {
    match raw {
        None => Ok(None),
        Some(RawCode::Int(n @ 0..=9999)) => Ok(Some(format!("{n:04}"))),
        Some(RawCode::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawCode::Text(s)) if is_code_digits(s.trim()) => {
            Ok(Some(format!("{:0>4}", s.trim())))
        }
        Some(other) => Err(MappingError::new(format!("invalid {field}: {other}")).for_record(id)),
    }
}

/// Post code number: an integer up to 9999 or exactly four digits of text
fn post_code_number(raw: Option<&RawCode>) -> Result<String, MappingError> {
    match raw {
        None => Err(MappingError::new("post code has no number")),
        Some(RawCode::Int(n @ 0..=9999)) => Ok(format!("{n:04}")),
        Some(RawCode::Text(s)) if s.len() == 4 && is_code_digits(s) => Ok(s.clone()),
        Some(other) => {
            Err(MappingError::new("not a four digit post code").for_record(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Coded {
        #[serde(default)]
        code: Option<RawCode>,
    }

    fn parse(json: &str) -> Option<RawCode> {
        serde_json::from_str::<Coded>(json).unwrap().code
    }

    fn normalized(json: &str) -> Result<Option<String>, MappingError> {
        code(parse(json).as_ref(), "road_code", "a1")
    }

    #[test]
    fn code_from_number_or_text() {
        assert_eq!(normalized(r#"{"code":101}"#), Ok(Some("0101".to_string())));
        assert_eq!(normalized(r#"{"code":"0101"}"#), Ok(Some("0101".to_string())));
        assert_eq!(normalized(r#"{"code":"8000"}"#), Ok(Some("8000".to_string())));
        assert_eq!(normalized(r#"{"code":""}"#), Ok(None));
        assert_eq!(normalized(r#"{"code":null}"#), Ok(None));
        assert_eq!(normalized(r#"{}"#), Ok(None));
    }

    #[test]
    fn malformed_codes_decode_but_fail_mapping() {
        for json in [
            r#"{"code":"abc"}"#,
            r#"{"code":"12a4"}"#,
            r#"{"code":"01010"}"#,
            r#"{"code":70000}"#,
            r#"{"code":-1}"#,
            r#"{"code":1.5}"#,
            r#"{"code":[1]}"#,
        ] {
            let err = normalized(json).unwrap_err();
            assert_eq!(err.record_id.as_deref(), Some("a1"), "{json}");
            assert!(err.reason.starts_with("invalid road_code"), "{json}");
        }
    }

    #[test]
    fn post_code_numbers() {
        let number = |json: &str| post_code_number(parse(json).as_ref());
        assert_eq!(number(r#"{"code":"1620"}"#), Ok("1620".to_string()));
        assert_eq!(number(r#"{"code":800}"#), Ok("0800".to_string()));
        assert!(number(r#"{"code":"800"}"#).is_err());
        assert!(number(r#"{"code":" 800"}"#).is_err());
        assert!(number(r#"{"code":"12a4"}"#).is_err());
        assert!(number(r#"{"code":70000}"#).is_err());
        assert!(number(r#"{}"#).is_err());
    }

    #[test]
    fn status_names() {
        assert_eq!(status_name(1), "active");
        assert_eq!(status_name(3), "pending");
        assert_eq!(status_name(9), "9");
        assert_eq!(dar_status_name(3), "active");
        assert_eq!(dar_status_name(4), "discontinued");
        assert_eq!(dar_status_name(1), "1");
    }

    #[test]
    fn blank_id_rejected() {
        assert!(require_id("").is_err());
        assert!(require_id("  ").is_err());
        assert!(require_id("0a3f5081-c35e-32b8-e044-0003ba298018").is_ok());
    }
}
