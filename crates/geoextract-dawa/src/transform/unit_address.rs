//! Unit address (`enhedsadresse`) → feature without geometry

use geoextract_core::{GeoJsonFeature, MappingError};
use serde::Deserialize;

use super::{require_id, status_name};

/// DAWA unit address (entity `adresse`): a floor/door within an access address
#[derive(Debug, Clone, Deserialize)]
pub struct UnitAddress {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "adgangsadresseid", default)]
    pub access_address_id: String,

    #[serde(default)]
    pub status: Option<i32>,

    #[serde(rename = "etage", default)]
    pub floor_name: Option<String>,

    #[serde(rename = "dør", default)]
    pub suite_name: Option<String>,

    #[serde(rename = "oprettet", default)]
    pub created: Option<String>,

    #[serde(rename = "ændret", default)]
    pub updated: Option<String>,
}

pub fn map(unit: UnitAddress) -> Result<GeoJsonFeature, MappingError> {
    require_id(&unit.id)?;
    if unit.access_address_id.trim().is_empty() {
        return Err(MappingError::new("no access address id").for_record(&unit.id));
    }

    Ok(GeoJsonFeature::builder()
        .property("id", Some(&unit.id))
        .property("access_address_id", Some(&unit.access_address_id))
        .property("status", unit.status.map(status_name))
        .property("floor_name", unit.floor_name)
        .property("suite_name", unit.suite_name)
        .property("created", unit.created)
        .property("updated", unit.updated)
        .build())
}
