use serde_json::Value;

use crate::model::{CollectionMarker, WebCollection, WebFeature};

pub const DEFAULT_COLLECTION_NAME: &str = "grid_suitability.web";

/// Wrap normalized features into the output collection. `crs` is passed through as-is.
pub fn assemble(
    features: Vec<WebFeature>,
    crs: Option<Value>,
    name: impl Into<String>,
) -> WebCollection {
    WebCollection {
        kind: CollectionMarker::FeatureCollection,
        name: name.into(),
        crs,
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_crs_serializes_as_null() {
        let c = assemble(vec![], None, DEFAULT_COLLECTION_NAME);
        assert_eq!(
            serde_json::to_string(&c).unwrap(),
            r#"{"type":"FeatureCollection","name":"grid_suitability.web","crs":null,"features":[]}"#
        );
    }

    #[test]
    fn crs_block_is_passed_through() {
        let crs = json!({ "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::32612" } });
        let c = assemble(vec![], Some(crs.clone()), "cells");
        assert_eq!(c.crs, Some(crs));
        assert_eq!(c.name, "cells");
        assert_eq!(c.kind, CollectionMarker::FeatureCollection);
    }
}
