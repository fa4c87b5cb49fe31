use rayon::prelude::*;
use serde_json::Value;

use crate::coerce;
use crate::foundation::error::{GridError, GridResult};
use crate::model::{Feature, FeatureMarker, Properties, WebFeature, WebProperties};
use crate::schema::{self, PropertyDefault, PropertySpec};

/// Why a single property could not be normalized. Carries no feature index; see
/// [`CoercionFailure::at`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoercionFailure {
    Missing {
        property: &'static str,
    },
    Invalid {
        property: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl CoercionFailure {
    fn invalid(spec: &PropertySpec, value: &Value) -> Self {
        Self::Invalid {
            property: spec.name,
            expected: spec.kind.type_name(),
            value: coerce::describe(value),
        }
    }

    pub fn at(self, feature: usize) -> GridError {
        match self {
            Self::Missing { property } => GridError::missing(feature, vec![property.to_string()]),
            Self::Invalid {
                property,
                expected,
                value,
            } => GridError::TypeCoercion {
                feature,
                property: property.to_string(),
                expected,
                value,
            },
        }
    }
}

/// Map raw properties onto the web schema: coerce, round, substitute defaults.
///
/// Unknown source properties are dropped.
pub fn normalize_properties(props: &Properties) -> Result<WebProperties, CoercionFailure> {
    Ok(WebProperties {
        suitability_score: float_field(props, &schema::SUITABILITY_SCORE)?,
        customers_5km: integer_field(props, &schema::CUSTOMERS_5KM)?,
        customers_10km: integer_field(props, &schema::CUSTOMERS_10KM)?,
        customers_15km: integer_field(props, &schema::CUSTOMERS_15KM)?,
        coverage_ratio: float_field(props, &schema::COVERAGE_RATIO)?,
        score_proximity: float_field(props, &schema::SCORE_PROXIMITY)?,
        score_coverage: float_field(props, &schema::SCORE_COVERAGE)?,
        score_infrastructure: float_field(props, &schema::SCORE_INFRASTRUCTURE)?,
        score_demographics: float_field(props, &schema::SCORE_DEMOGRAPHICS)?,
        score_operational: float_field(props, &schema::SCORE_OPERATIONAL)?,
        center_lat: float_field(props, &schema::CENTER_LAT)?,
        center_lon: float_field(props, &schema::CENTER_LON)?,
        row: integer_field(props, &schema::ROW)?,
        col: integer_field(props, &schema::COL)?,
        in_city: bool_field(props, &schema::IN_CITY)?,
    })
}

/// Normalize one feature; geometry moves through untouched.
pub fn normalize_feature(index: usize, feature: Feature) -> GridResult<WebFeature> {
    let properties = normalize_properties(&feature.properties).map_err(|e| e.at(index))?;
    Ok(WebFeature {
        kind: FeatureMarker::Feature,
        properties,
        geometry: feature.geometry,
    })
}

/// Normalize every feature, preserving order.
///
/// Any failure aborts the batch. With `parallel` the work is spread over the rayon pool and the
/// error reported is still the one with the lowest feature index.
#[tracing::instrument(skip(features), fields(count = features.len()))]
pub fn normalize_features(features: Vec<Feature>, parallel: bool) -> GridResult<Vec<WebFeature>> {
    let out = if parallel {
        let results: Vec<GridResult<WebFeature>> = features
            .into_par_iter()
            .enumerate()
            .map(|(i, f)| normalize_feature(i, f))
            .collect();
        results.into_iter().collect::<GridResult<Vec<_>>>()?
    } else {
        features
            .into_iter()
            .enumerate()
            .map(|(i, f)| normalize_feature(i, f))
            .collect::<GridResult<Vec<_>>>()?
    };

    tracing::info!(cleaned = out.len(), "cleaned features");
    Ok(out)
}

fn default_number(spec: &PropertySpec) -> Result<f64, CoercionFailure> {
    match spec.default {
        Some(PropertyDefault::Number(v)) => Ok(v),
        Some(PropertyDefault::Bool(b)) => Ok(f64::from(u8::from(b))),
        None => Err(CoercionFailure::Missing {
            property: spec.name,
        }),
    }
}

fn float_field(props: &Properties, spec: &PropertySpec) -> Result<f64, CoercionFailure> {
    let x = match props.get(spec.name) {
        Some(v) => coerce::to_float(v).ok_or_else(|| CoercionFailure::invalid(spec, v))?,
        None => default_number(spec)?,
    };
    Ok(match spec.kind.decimals() {
        Some(decimals) => coerce::round_to(x, decimals),
        None => x,
    })
}

fn integer_field(props: &Properties, spec: &PropertySpec) -> Result<i64, CoercionFailure> {
    match props.get(spec.name) {
        Some(v) => coerce::to_integer(v).ok_or_else(|| CoercionFailure::invalid(spec, v)),
        // Schema defaults are small whole numbers.
        None => default_number(spec).map(|v| v as i64),
    }
}

fn bool_field(props: &Properties, spec: &PropertySpec) -> Result<bool, CoercionFailure> {
    match props.get(spec.name) {
        Some(v) => Ok(coerce::truthy(v)),
        None => match spec.default {
            Some(PropertyDefault::Bool(b)) => Ok(b),
            Some(PropertyDefault::Number(v)) => Ok(v != 0.0),
            None => Err(CoercionFailure::Missing {
                property: spec.name,
            }),
        },
    }
}
