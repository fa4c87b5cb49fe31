use serde_json::Value;

use crate::foundation::error::{GridError, GridResult, MissingInFeature};
use crate::model::{FeatureCollection, Properties};
use crate::schema::REQUIRED_PROPERTIES;

/// How many features the validator inspects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Only feature 0; the rest of the collection is assumed uniform.
    #[default]
    FirstFeature,
    /// Every feature, reporting each failing index.
    AllFeatures,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValidationSummary {
    pub required_checked: usize,
    pub features_checked: usize,
    /// Total property count of the first feature.
    pub first_feature_properties: usize,
    /// The first feature's required values, in required-list order.
    pub samples: Vec<(&'static str, Value)>,
}

/// Required property names absent from `props`, in required-list order.
pub fn missing_required(props: &Properties) -> Vec<String> {
    REQUIRED_PROPERTIES
        .iter()
        .filter(|name| !props.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect()
}

/// Gate the pipeline on the presence of required properties.
///
/// Only presence is checked here; value types are checked while normalizing.
pub fn validate_collection(
    collection: &FeatureCollection,
    mode: ValidationMode,
) -> GridResult<ValidationSummary> {
    let Some(first) = collection.features.first() else {
        return Err(GridError::EmptyCollection);
    };

    let checked = match mode {
        ValidationMode::FirstFeature => &collection.features[..1],
        ValidationMode::AllFeatures => &collection.features[..],
    };

    let failures: Vec<MissingInFeature> = checked
        .iter()
        .enumerate()
        .filter_map(|(feature, f)| {
            let names = missing_required(&f.properties);
            (!names.is_empty()).then_some(MissingInFeature { feature, names })
        })
        .collect();

    if !failures.is_empty() {
        tracing::warn!(
            failing = failures.len(),
            checked = checked.len(),
            "required property check failed"
        );
        return Err(GridError::MissingProperties { failures });
    }

    let samples = REQUIRED_PROPERTIES
        .iter()
        .map(|name| {
            let value = first.properties.get(*name).cloned().unwrap_or(Value::Null);
            (*name, value)
        })
        .collect();

    Ok(ValidationSummary {
        required_checked: REQUIRED_PROPERTIES.len(),
        features_checked: checked.len(),
        first_feature_properties: first.properties.len(),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Feature;
    use serde_json::json;

    fn cell(props: Value) -> Feature {
        let Value::Object(map) = props else {
            panic!("props must be an object");
        };
        Feature::new(map, json!({ "type": "Point", "coordinates": [0.0, 0.0] }))
    }

    fn complete() -> Value {
        json!({
            "suitability_score": 87.456,
            "customers_5km": 1200,
            "customers_10km": 3400,
            "customers_15km": 5000,
            "center_lat": 29.123456789,
            "center_lon": -110.987654321
        })
    }

    #[test]
    fn empty_collection_fails() {
        let c = FeatureCollection::new(vec![]);
        for mode in [ValidationMode::FirstFeature, ValidationMode::AllFeatures] {
            assert!(matches!(
                validate_collection(&c, mode),
                Err(GridError::EmptyCollection)
            ));
        }
    }

    #[test]
    fn missing_center_lat_is_reported_by_name() {
        let mut props = complete();
        props.as_object_mut().unwrap().remove("center_lat");
        let c = FeatureCollection::new(vec![cell(props)]);

        let err = validate_collection(&c, ValidationMode::FirstFeature).unwrap_err();
        assert_eq!(err.missing_names(), vec!["center_lat"]);
    }

    #[test]
    fn first_feature_mode_ignores_later_features() {
        let c = FeatureCollection::new(vec![cell(complete()), cell(json!({ "row": 1 }))]);

        let summary = validate_collection(&c, ValidationMode::FirstFeature).unwrap();
        assert_eq!(summary.features_checked, 1);
        assert_eq!(summary.required_checked, 6);
        assert_eq!(summary.first_feature_properties, 6);
        assert_eq!(summary.samples[0], ("suitability_score", json!(87.456)));
    }

    #[test]
    fn all_features_mode_reports_every_failing_index() {
        let mut partial = complete();
        partial.as_object_mut().unwrap().remove("customers_15km");
        let c = FeatureCollection::new(vec![
            cell(complete()),
            cell(partial),
            cell(complete()),
            cell(json!({})),
        ]);

        let Err(GridError::MissingProperties { failures }) =
            validate_collection(&c, ValidationMode::AllFeatures)
        else {
            panic!("expected missing properties");
        };
        let indices: Vec<usize> = failures.iter().map(|f| f.feature).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(failures[0].names, vec!["customers_15km"]);
        assert_eq!(failures[1].names.len(), 6);
    }

    #[test]
    fn presence_only_not_types() {
        let mut props = complete();
        props["suitability_score"] = json!("not a number");
        let c = FeatureCollection::new(vec![cell(props)]);
        assert!(validate_collection(&c, ValidationMode::FirstFeature).is_ok());
    }
}
