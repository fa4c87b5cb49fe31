use std::path::{Path, PathBuf};

use crate::assemble::{DEFAULT_COLLECTION_NAME, assemble};
use crate::foundation::error::{GridError, GridResult};
use crate::io;
use crate::model::{FeatureCollection, WebCollection};
use crate::normalize::normalize_features;
use crate::schema;
use crate::validate::{ValidationMode, ValidationSummary, validate_collection};

pub const DEFAULT_SOURCE_PATH: &str =
    "data/processed/hermosillo_distribucion_grid_suitability_v2.geojson";
pub const DEFAULT_OUTPUT_PATH: &str = "src/data/grid_suitability.web.geojson";

/// Inputs of one generator run. Relative paths resolve against the process working directory.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    pub source: PathBuf,
    pub output: PathBuf,
    pub collection_name: String,
    pub validation: ValidationMode,
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            validation: ValidationMode::default(),
            parallel: false,
        }
    }
}

/// What the written file looked like when read back.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputCheck {
    pub features: usize,
    pub properties_per_feature: usize,
    pub sample_suitability_score: Option<f64>,
    pub sample_customers_5km: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenerateOutcome {
    pub output: PathBuf,
    pub bytes: u64,
    pub validation: ValidationSummary,
    pub check: OutputCheck,
}

/// Validate, normalize and assemble without touching the filesystem.
#[tracing::instrument(skip_all, fields(features = source.features.len()))]
pub fn build_web_collection(
    source: FeatureCollection,
    config: &PipelineConfig,
) -> GridResult<(WebCollection, ValidationSummary)> {
    let summary = validate_collection(&source, config.validation)?;
    tracing::info!(
        required = summary.required_checked,
        properties = summary.first_feature_properties,
        "required properties present"
    );
    for (name, value) in &summary.samples {
        tracing::info!(property = *name, %value, "sample value");
    }

    let FeatureCollection { crs, features, .. } = source;
    let features = normalize_features(features, config.parallel)?;
    Ok((assemble(features, crs, config.collection_name.clone()), summary))
}

/// Full generator run: load, build, write, read back.
///
/// The output file is written only once every feature normalized.
#[tracing::instrument(skip_all, fields(source = %config.source.display()))]
pub fn generate(config: &PipelineConfig) -> GridResult<GenerateOutcome> {
    let source = io::read_collection(&config.source)?;
    tracing::info!(features = source.features.len(), "loaded source");

    let (web, validation) = build_web_collection(source, config)?;

    let bytes = io::write_json(&config.output, &web)?;
    tracing::info!(
        path = %config.output.display(),
        bytes,
        kib = bytes as f64 / 1024.0,
        "wrote output"
    );

    let check = verify_output(&config.output, web.features.len())?;
    Ok(GenerateOutcome {
        output: config.output.clone(),
        bytes,
        validation,
        check,
    })
}

/// Re-read a written collection and confirm the feature count survived the round trip.
pub fn verify_output(path: &Path, expected_features: usize) -> GridResult<OutputCheck> {
    let written = io::read_collection(path)?;
    if written.features.len() != expected_features {
        return Err(GridError::Other(anyhow::anyhow!(
            "'{}' holds {} features, expected {expected_features}",
            path.display(),
            written.features.len()
        )));
    }

    let first = written.features.first().map(|f| &f.properties);
    let check = OutputCheck {
        features: written.features.len(),
        properties_per_feature: first.map_or(0, |p| p.len()),
        sample_suitability_score: first
            .and_then(|p| p.get(schema::SUITABILITY_SCORE.name))
            .and_then(|v| v.as_f64()),
        sample_customers_5km: first
            .and_then(|p| p.get(schema::CUSTOMERS_5KM.name))
            .and_then(|v| v.as_i64()),
    };
    tracing::info!(
        features = check.features,
        properties = check.properties_per_feature,
        "verified output"
    );
    Ok(check)
}
