use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw property mapping of a source feature.
pub type Properties = serde_json::Map<String, Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionMarker {
    #[default]
    FeatureCollection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureMarker {
    #[default]
    Feature,
}

/// A GeoJSON feature collection as produced by the analysis pipeline.
///
/// `crs` and every feature's `geometry` are kept as opaque JSON and never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionMarker,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureMarker,
    // `null` and absent both read as an empty mapping.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
    #[serde(default)]
    pub geometry: Value,
}

fn null_as_empty<'de, D>(d: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Properties>::deserialize(d)?.unwrap_or_default())
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionMarker::FeatureCollection,
            name: None,
            crs: None,
            features,
        }
    }

    /// Named CRS (`crs.properties.name`), if the collection declares one.
    pub fn crs_name(&self) -> Option<&str> {
        self.crs.as_ref()?.get("properties")?.get("name")?.as_str()
    }
}

impl Feature {
    pub fn new(properties: Properties, geometry: Value) -> Self {
        Self {
            kind: FeatureMarker::Feature,
            properties,
            geometry,
        }
    }
}

/// Normalized cell properties; field order is the output declaration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebProperties {
    pub suitability_score: f64,
    pub customers_5km: i64,
    pub customers_10km: i64,
    pub customers_15km: i64,
    pub coverage_ratio: f64,
    pub score_proximity: f64,
    pub score_coverage: f64,
    pub score_infrastructure: f64,
    pub score_demographics: f64,
    pub score_operational: f64,
    pub center_lat: f64,
    pub center_lon: f64,
    pub row: i64,
    pub col: i64,
    pub in_city: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebFeature {
    #[serde(rename = "type")]
    pub kind: FeatureMarker,
    pub properties: WebProperties,
    pub geometry: Value,
}

/// Web-optimized output collection. `crs` is written as `null` when the source had none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebCollection {
    #[serde(rename = "type")]
    pub kind: CollectionMarker,
    pub name: String,
    pub crs: Option<Value>,
    pub features: Vec<WebFeature>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_missing_properties_read_as_empty() {
        let c: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": null, "geometry": null },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } }
            ]
        }))
        .unwrap();
        assert!(c.features.iter().all(|f| f.properties.is_empty()));
        assert!(c.name.is_none());
        assert!(c.crs.is_none());
    }

    #[test]
    fn wrong_collection_marker_is_rejected() {
        let r: Result<FeatureCollection, _> = serde_json::from_value(json!({
            "type": "Feature",
            "features": []
        }));
        assert!(r.is_err());

        let r: Result<FeatureCollection, _> =
            serde_json::from_value(json!({ "type": "FeatureCollection" }));
        assert!(r.is_err(), "features must be present");
    }

    #[test]
    fn crs_name_reads_named_crs() {
        let c: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
            "features": []
        }))
        .unwrap();
        assert_eq!(c.crs_name(), Some("urn:ogc:def:crs:OGC:1.3:CRS84"));
        assert_eq!(FeatureCollection::new(vec![]).crs_name(), None);
    }

    #[test]
    fn geometry_keeps_key_order() {
        let src = r#"{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]]}}"#;
        let f: Feature = serde_json::from_str(src).unwrap();
        assert_eq!(serde_json::to_string(&f).unwrap(), src);
    }
}
