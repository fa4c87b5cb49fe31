//! Property schema for grid-suitability cells.
//!
//! The required list is a contract with the upstream analysis pipeline; types and rounding are a
//! contract with the web map. Consumers must not assume more precision than declared here.

/// Target type of a normalized property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Float rounded to `decimals` places.
    Float { decimals: u32 },
    Integer,
    Boolean,
}

impl PropertyKind {
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Float { .. } => "float",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    pub fn decimals(self) -> Option<u32> {
        match self {
            Self::Float { decimals } => Some(decimals),
            Self::Integer | Self::Boolean => None,
        }
    }
}

/// Value substituted when an optional property is absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyDefault {
    Number(f64),
    Bool(bool),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    /// `None` means required.
    pub default: Option<PropertyDefault>,
}

impl PropertySpec {
    pub const fn required(self) -> bool {
        self.default.is_none()
    }
}

const fn float(name: &'static str, decimals: u32, default: Option<f64>) -> PropertySpec {
    PropertySpec {
        name,
        kind: PropertyKind::Float { decimals },
        default: match default {
            Some(v) => Some(PropertyDefault::Number(v)),
            None => None,
        },
    }
}

const fn integer(name: &'static str, default: Option<f64>) -> PropertySpec {
    PropertySpec {
        name,
        kind: PropertyKind::Integer,
        default: match default {
            Some(v) => Some(PropertyDefault::Number(v)),
            None => None,
        },
    }
}

pub const SUITABILITY_SCORE: PropertySpec = float("suitability_score", 2, None);
pub const CUSTOMERS_5KM: PropertySpec = integer("customers_5km", None);
pub const CUSTOMERS_10KM: PropertySpec = integer("customers_10km", None);
pub const CUSTOMERS_15KM: PropertySpec = integer("customers_15km", None);
pub const COVERAGE_RATIO: PropertySpec = float("coverage_ratio", 4, Some(0.0));
pub const SCORE_PROXIMITY: PropertySpec = float("score_proximity", 2, Some(0.0));
pub const SCORE_COVERAGE: PropertySpec = float("score_coverage", 2, Some(0.0));
pub const SCORE_INFRASTRUCTURE: PropertySpec = float("score_infrastructure", 2, Some(0.0));
pub const SCORE_DEMOGRAPHICS: PropertySpec = float("score_demographics", 2, Some(0.0));
pub const SCORE_OPERATIONAL: PropertySpec = float("score_operational", 2, Some(0.0));
pub const CENTER_LAT: PropertySpec = float("center_lat", 6, None);
pub const CENTER_LON: PropertySpec = float("center_lon", 6, None);
pub const ROW: PropertySpec = integer("row", Some(0.0));
pub const COL: PropertySpec = integer("col", Some(0.0));
pub const IN_CITY: PropertySpec = PropertySpec {
    name: "in_city",
    kind: PropertyKind::Boolean,
    default: Some(PropertyDefault::Bool(true)),
};

/// Every recognized property, in output declaration order.
pub const GRID_SCHEMA: [PropertySpec; 15] = [
    SUITABILITY_SCORE,
    CUSTOMERS_5KM,
    CUSTOMERS_10KM,
    CUSTOMERS_15KM,
    COVERAGE_RATIO,
    SCORE_PROXIMITY,
    SCORE_COVERAGE,
    SCORE_INFRASTRUCTURE,
    SCORE_DEMOGRAPHICS,
    SCORE_OPERATIONAL,
    CENTER_LAT,
    CENTER_LON,
    ROW,
    COL,
    IN_CITY,
];

/// Properties the validator insists on, in the order they are reported.
pub const REQUIRED_PROPERTIES: [&str; 6] = [
    SUITABILITY_SCORE.name,
    CUSTOMERS_5KM.name,
    CUSTOMERS_10KM.name,
    CUSTOMERS_15KM.name,
    CENTER_LAT.name,
    CENTER_LON.name,
];

/// Properties the verification reports check for presence.
pub const CRITICAL_PROPERTIES: [&str; 5] = [
    SUITABILITY_SCORE.name,
    CUSTOMERS_5KM.name,
    CUSTOMERS_10KM.name,
    CENTER_LAT.name,
    CENTER_LON.name,
];

pub fn lookup(name: &str) -> Option<&'static PropertySpec> {
    GRID_SCHEMA.iter().find(|spec| spec.name == name)
}
