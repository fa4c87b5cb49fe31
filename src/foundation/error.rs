use std::fmt;
use std::path::PathBuf;

pub type GridResult<T> = Result<T, GridError>;

/// Required properties absent from one feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingInFeature {
    pub feature: usize,
    pub names: Vec<String>,
}

impl fmt::Display for MissingInFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature {}: [{}]", self.feature, self.names.join(", "))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("feature collection is empty")]
    EmptyCollection,

    #[error("missing required properties: {}", format_failures(failures))]
    MissingProperties { failures: Vec<MissingInFeature> },

    #[error("feature {feature}: property '{property}' cannot be coerced to {expected}: {value}")]
    TypeCoercion {
        feature: usize,
        property: String,
        expected: &'static str,
        value: String,
    },

    #[error("parse error in '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("i/o error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridError {
    pub fn missing(feature: usize, names: Vec<String>) -> Self {
        Self::MissingProperties {
            failures: vec![MissingInFeature { feature, names }],
        }
    }

    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Every missing name across all reported features, in report order.
    pub fn missing_names(&self) -> Vec<&str> {
        match self {
            Self::MissingProperties { failures } => failures
                .iter()
                .flat_map(|f| f.names.iter().map(String::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn format_failures(failures: &[MissingInFeature]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GridError::EmptyCollection
                .to_string()
                .contains("feature collection is empty")
        );
        assert!(
            GridError::missing(0, vec!["center_lat".to_string()])
                .to_string()
                .contains("missing required properties: feature 0: [center_lat]")
        );
        assert!(
            GridError::parse("in.geojson", "eof")
                .to_string()
                .contains("parse error in 'in.geojson': eof")
        );
        assert!(
            GridError::SourceNotFound {
                path: PathBuf::from("data/x.geojson")
            }
            .to_string()
            .contains("data/x.geojson")
        );
    }

    #[test]
    fn missing_names_flattens_every_feature() {
        let err = GridError::MissingProperties {
            failures: vec![
                MissingInFeature {
                    feature: 0,
                    names: vec!["center_lat".to_string()],
                },
                MissingInFeature {
                    feature: 4,
                    names: vec!["customers_5km".to_string(), "center_lon".to_string()],
                },
            ],
        };
        assert_eq!(
            err.missing_names(),
            vec!["center_lat", "customers_5km", "center_lon"]
        );
        assert!(err.to_string().contains("feature 0: [center_lat]; feature 4:"));
        assert!(GridError::EmptyCollection.missing_names().is_empty());
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GridError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
