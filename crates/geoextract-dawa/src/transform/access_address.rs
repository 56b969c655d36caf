//! Access address (`adgangsadresse`) → Point feature

use geoextract_core::{GeoJsonFeature, Geometry, MappingError};
use serde::Deserialize;

use super::{RawCode, code, require_id, status_name};

/// DAWA access address as delivered by the replication extract
#[derive(Debug, Clone, Deserialize)]
pub struct AccessAddress {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub status: Option<i32>,

    #[serde(rename = "oprettet", default)]
    pub created: Option<String>,

    #[serde(rename = "ændret", default)]
    pub updated: Option<String>,

    #[serde(rename = "kommunekode", default)]
    pub municipal_code: Option<RawCode>,

    #[serde(rename = "vejkode", default)]
    pub road_code: Option<RawCode>,

    #[serde(rename = "navngivenvej_id", default)]
    pub road_id: Option<String>,

    #[serde(rename = "husnr", default)]
    pub house_number: Option<String>,

    #[serde(rename = "postnr", default)]
    pub post_district_code: Option<RawCode>,

    #[serde(rename = "supplerendebynavn", default)]
    pub supplementary_town_name: Option<String>,

    #[serde(rename = "matrikelnr", default)]
    pub plot_id: Option<String>,

    /// ETRS89 / UTM zone 32N easting
    #[serde(rename = "etrs89koordinat_øst", default)]
    pub east: Option<f64>,

    /// ETRS89 / UTM zone 32N northing
    #[serde(rename = "etrs89koordinat_nord", default)]
    pub north: Option<f64>,

    #[serde(rename = "adressepunktændringsdato", default)]
    pub location_updated: Option<String>,
}

/// Map an access address to a feature with a Point geometry when both
/// coordinates are known.
pub fn map(address: AccessAddress) -> Result<GeoJsonFeature, MappingError> {
    require_id(&address.id)?;
    let municipal_code = code(address.municipal_code.as_ref(), "municipal_code", &address.id)?;
    let road_code = code(address.road_code.as_ref(), "road_code", &address.id)?;
    let post_district_code =
        code(address.post_district_code.as_ref(), "post_district_code", &address.id)?;

    let geometry = match (address.east, address.north) {
        (Some(east), Some(north)) => {
            let point = Geometry::Point([east, north]);
            if !point.is_finite() {
                return Err(MappingError::new("non-finite coordinate").for_record(&address.id));
            }
            Some(point)
        }
        (None, None) => None,
        _ => {
            return Err(
                MappingError::new("only one of the two coordinates is present")
                    .for_record(&address.id),
            );
        }
    };

    Ok(GeoJsonFeature::builder()
        .property("id", Some(&address.id))
        .property("status", address.status.map(status_name))
        .property("created", address.created)
        .property("updated", address.updated)
        .property("municipal_code", municipal_code)
        .property("road_code", road_code)
        .property("road_id", address.road_id)
        .property("house_number", address.house_number)
        .property("post_district_code", post_district_code)
        .property("supplementary_town_name", address.supplementary_town_name)
        .property("plot_id", address.plot_id)
        .property("location_updated", address.location_updated)
        .property("east_coordinate", address.east)
        .property("north_coordinate", address.north)
        .geometry(geometry)
        .build())
}
