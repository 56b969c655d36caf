//! Post code (`postnummer`) → feature without geometry

use geoextract_core::{GeoJsonFeature, MappingError};
use serde::Deserialize;

use super::{RawCode, post_code_number};

/// DAWA postal district
#[derive(Debug, Clone, Deserialize)]
pub struct PostCode {
    #[serde(rename = "nr", default)]
    pub number: Option<RawCode>,

    #[serde(rename = "navn", default)]
    pub name: Option<String>,

    /// Post code reserved for a single large recipient
    #[serde(rename = "stormodtager", default)]
    pub bulk_recipient: Option<bool>,
}

pub fn map(post_code: PostCode) -> Result<GeoJsonFeature, MappingError> {
    let number = post_code_number(post_code.number.as_ref())?;

    Ok(GeoJsonFeature::builder()
        .property("number", Some(number))
        .property("name", post_code.name)
        .property("bulk_recipient", post_code.bulk_recipient)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PostCode {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn maps_post_code() {
        let f = map(parse(r#"{"nr":"8000","navn":"Aarhus C","stormodtager":false}"#)).unwrap();
        assert_eq!(f.properties["number"].as_deref(), Some("8000"));
        assert_eq!(f.properties["name"].as_deref(), Some("Aarhus C"));
        assert_eq!(f.properties["bulk_recipient"].as_deref(), Some("false"));
        assert!(f.geometry.is_none());
    }

    #[test]
    fn low_numbers_are_padded() {
        let f = map(parse(r#"{"nr":800,"navn":"Høje Taastrup"}"#)).unwrap();
        assert_eq!(f.properties["number"].as_deref(), Some("0800"));
        assert_eq!(f.properties["bulk_recipient"], None);
    }

    #[test]
    fn five_digits_is_mapping_error() {
        let err = map(parse(r#"{"nr":12345}"#)).unwrap_err();
        assert_eq!(err.record_id.as_deref(), Some("12345"));
    }

    #[test]
    fn out_of_range_number_is_mapping_error() {
        let err = map(parse(r#"{"nr":70000}"#)).unwrap_err();
        assert_eq!(err.record_id.as_deref(), Some("70000"));
    }

    #[test]
    fn non_digit_text_is_mapping_error() {
        let err = map(parse(r#"{"nr":"12a4"}"#)).unwrap_err();
        assert_eq!(err.record_id.as_deref(), Some("12a4"));
    }

    #[test]
    fn short_text_is_not_padded() {
        let err = map(parse(r#"{"nr":"800"}"#)).unwrap_err();
        assert_eq!(err.record_id.as_deref(), Some("800"));
    }

    #[test]
    fn missing_number_is_mapping_error() {
        assert!(map(parse(r#"{"navn":"Nowhere"}"#)).is_err());
    }
}
