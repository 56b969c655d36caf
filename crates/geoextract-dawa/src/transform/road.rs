//! Road (`vej`) → feature with the road name line as geometry

use geoextract_core::{GeoJsonFeature, Geometry, MappingError};
use serde::Deserialize;

use super::{RawCode, code, dar_status_name, require_id};

/// DAWA named road (entity `navngivenvej`)
#[derive(Debug, Clone, Deserialize)]
pub struct Road {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "darstatus", default)]
    pub status: Option<i32>,

    #[serde(rename = "navn", default)]
    pub name: Option<String>,

    /// Shortened name used in addresses (max 20 chars)
    #[serde(rename = "adresseringsnavn", default)]
    pub addressing_name: Option<String>,

    #[serde(rename = "administreresafkommune", default)]
    pub municipality: Option<RawCode>,

    #[serde(rename = "oprettet", default)]
    pub created: Option<String>,

    #[serde(rename = "ændret", default)]
    pub updated: Option<String>,

    #[serde(rename = "beliggenhed_vejnavnelinje", default)]
    pub name_line: Option<Geometry>,
}

pub fn map(road: Road) -> Result<GeoJsonFeature, MappingError> {
    require_id(&road.id)?;
    let municipality = code(road.municipality.as_ref(), "municipality", &road.id)?;
    if road.name_line.as_ref().is_some_and(|g| !g.is_finite()) {
        return Err(MappingError::new("non-finite coordinate in road geometry").for_record(&road.id));
    }

    Ok(GeoJsonFeature::builder()
        .property("id", Some(&road.id))
        .property("name", road.name)
        .property("addressing_name", road.addressing_name)
        .property("municipality", municipality)
        .property("status", road.status.map(dar_status_name))
        .property("created", road.created)
        .property("updated", road.updated)
        .geometry(road.name_line)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_road_with_line() {
        let road: Road = serde_json::from_str(
            r#"{
                "id": "e0a3c29b-0c1d-4f6e-9d5c-2ef1f1f7b1d2",
                "darstatus": 3,
                "navn": "Vesterbrogade",
                "adresseringsnavn": "Vesterbrogade",
                "administreresafkommune": "0101",
                "beliggenhed_vejnavnelinje": {
                    "type": "MultiLineString",
                    "coordinates": [[[723000.1, 6175000.2], [723100.5, 6175050.0]]]
                }
            }"#,
        )
        .unwrap();
        let f = map(road).unwrap();
        assert_eq!(f.properties["name"].as_deref(), Some("Vesterbrogade"));
        assert_eq!(f.properties["municipality"].as_deref(), Some("0101"));
        assert_eq!(f.properties["status"].as_deref(), Some("active"));
        assert!(matches!(f.geometry, Some(Geometry::MultiLineString(ref l)) if l[0].len() == 2));
    }

    #[test]
    fn road_without_line_has_no_geometry() {
        let road: Road = serde_json::from_str(r#"{"id":"r1","navn":"Ved Stranden"}"#).unwrap();
        let f = map(road).unwrap();
        assert!(f.geometry.is_none());
        assert_eq!(f.properties.len(), 7);
        assert_eq!(f.properties["created"], None);
    }

    #[test]
    fn unknown_geometry_type_fails_to_decode() {
        let result = serde_json::from_str::<Road>(
            r#"{"id":"r1","beliggenhed_vejnavnelinje":{"type":"Circle","coordinates":[1,2]}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn malformed_municipality_is_mapping_error() {
        let road: Road =
            serde_json::from_str(r#"{"id":"r3","administreresafkommune":"1O1"}"#).unwrap();
        let err = map(road).unwrap_err();
        assert_eq!(err.record_id.as_deref(), Some("r3"));
    }

    #[test]
    fn missing_id_is_mapping_error() {
        let road: Road = serde_json::from_str(r#"{"navn":"Ved Stranden"}"#).unwrap();
        assert!(map(road).is_err());
    }

    #[test]
    fn non_finite_line_is_mapping_error() {
        let road = Road {
            id: "r2".into(),
            status: None,
            name: None,
            addressing_name: None,
            municipality: None,
            created: None,
            updated: None,
            name_line: Some(Geometry::LineString(vec![[0.0, 0.0], [f64::INFINITY, 1.0]])),
        };
        assert!(map(road).is_err());
    }
}
