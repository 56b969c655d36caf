//! GeoJSON feature model and line serialization

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Feature properties. Sorted so the same feature always serializes to the
/// same bytes.
pub type Properties = BTreeMap<String, Option<String>>;

/// A position as `[x, y]` (easting/northing or lon/lat)
pub type Position = [f64; 2];

/// The `type` member of a feature; always `"Feature"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// GeoJSON geometry object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// True when every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        fn ring(r: &[Position]) -> bool {
            r.iter().all(|p| p.iter().all(|c| c.is_finite()))
        }
        match self {
            Self::Point(p) => ring(std::slice::from_ref(p)),
            Self::LineString(l) => ring(l),
            Self::MultiLineString(ls) | Self::Polygon(ls) => ls.iter().all(|l| ring(l)),
            Self::MultiPolygon(ps) => ps.iter().flatten().all(|l| ring(l)),
        }
    }
}

/// One line of a `.geojson` output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl GeoJsonFeature {
    pub fn new(properties: Properties, geometry: Option<Geometry>) -> Self {
        Self {
            kind: FeatureType::Feature,
            properties,
            geometry,
        }
    }

    pub fn builder() -> FeatureBuilder {
        FeatureBuilder::default()
    }

    /// Serialize as compact JSON followed by `\n`, appending to `buf`.
    ///
    /// Compact serde_json output escapes control characters inside strings,
    /// so the only newline written is the terminator.
    pub fn write_line(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(&mut *buf, self)?;
        buf.push(b'\n');
        Ok(())
    }
}

/// Incremental construction of a [`GeoJsonFeature`] inside mappers
#[derive(Debug, Default)]
pub struct FeatureBuilder {
    properties: Properties,
    geometry: Option<Geometry>,
}

impl FeatureBuilder {
    /// Set a property; `None` is kept and serialized as `null`
    pub fn property<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.properties
            .insert(key.to_string(), value.map(|v| v.to_string()));
        self
    }

    pub fn geometry(mut self, geometry: Option<Geometry>) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn build(self) -> GeoJsonFeature {
        GeoJsonFeature::new(self.properties, self.geometry)
    }
}
