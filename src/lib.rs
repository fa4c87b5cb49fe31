//! gridweb turns a grid-suitability GeoJSON produced by the siting analysis into the compact,
//! typed collection the web map loads.
//!
//! The pipeline is a short chain of value transformations:
//!
//! - [`validate_collection`] gates on required properties
//! - [`normalize_features`] coerces, rounds and fills defaults per [`schema::GRID_SCHEMA`]
//! - [`assemble`] wraps the result with the passthrough CRS
//!
//! [`generate`] runs the chain end to end against files on disk; [`report`] prints read-only
//! verification summaries.
#![forbid(unsafe_code)]

pub mod assemble;
pub mod coerce;
mod foundation;
pub mod io;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod validate;

pub use crate::assemble::{DEFAULT_COLLECTION_NAME, assemble};
pub use crate::foundation::error::{GridError, GridResult, MissingInFeature};
pub use crate::io::{read_collection, write_json};
pub use crate::model::{
    Feature, FeatureCollection, Properties, WebCollection, WebFeature, WebProperties,
};
pub use crate::normalize::{normalize_feature, normalize_features, normalize_properties};
pub use crate::pipeline::{
    GenerateOutcome, OutputCheck, PipelineConfig, build_web_collection, generate, verify_output,
};
pub use crate::report::CollectionStats;
pub use crate::validate::{ValidationMode, ValidationSummary, validate_collection};
