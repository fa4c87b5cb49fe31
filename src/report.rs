//! Read-only verification reports over a source or web collection.

use std::io::{self, Write};

use serde_json::Value;

use crate::coerce;
use crate::foundation::error::{GridError, GridResult};
use crate::model::{FeatureCollection, Properties};
use crate::schema::{self, CRITICAL_PROPERTIES, PropertySpec};

const RULE_WIDTH: usize = 70;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountStats {
    pub total: i64,
    pub max: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub suitability: ScoreStats,
    pub customers_5km: CountStats,
    pub customers_10km: CountStats,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionStats {
    pub name: Option<String>,
    pub crs_name: Option<String>,
    pub features: usize,
    pub features_with_properties: usize,
    /// First feature's properties, sorted by key.
    pub first_properties: Vec<(String, Value)>,
    /// Presence of each critical property on the first feature.
    pub critical: Vec<(&'static str, bool)>,
    /// Present only when every critical property is on the first feature.
    pub metrics: Option<Metrics>,
}

impl CollectionStats {
    /// Customer counts are coerced to integers before summing, so fractional counts in a source
    /// file are truncated per feature.
    pub fn compute(collection: &FeatureCollection) -> GridResult<Self> {
        let first = collection.features.first().map(|f| &f.properties);

        let mut first_properties: Vec<(String, Value)> = first
            .map(|p| p.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        first_properties.sort_by(|a, b| a.0.cmp(&b.0));

        let critical: Vec<(&'static str, bool)> = CRITICAL_PROPERTIES
            .iter()
            .map(|name| (*name, first.is_some_and(|p| p.contains_key(*name))))
            .collect();

        let metrics = if critical.iter().all(|(_, present)| *present) {
            Some(compute_metrics(collection)?)
        } else {
            None
        };

        Ok(Self {
            name: collection.name.clone(),
            crs_name: collection.crs_name().map(str::to_string),
            features: collection.features.len(),
            features_with_properties: collection
                .features
                .iter()
                .filter(|f| !f.properties.is_empty())
                .count(),
            first_properties,
            critical,
            metrics,
        })
    }

    pub fn properties_per_feature(&self) -> usize {
        self.first_properties.len()
    }

    pub fn all_critical_present(&self) -> bool {
        !self.critical.is_empty() && self.critical.iter().all(|(_, present)| *present)
    }

    /// Verdict of the final verification.
    pub fn passed(&self) -> bool {
        self.features > 0
            && self.all_critical_present()
            && self.features_with_properties == self.features
    }

    fn has_critical(&self, name: &str) -> bool {
        self.critical.iter().any(|(n, present)| *n == name && *present)
    }
}

fn compute_metrics(collection: &FeatureCollection) -> GridResult<Metrics> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut c5 = CountStats { total: 0, max: 0 };
    let mut c10 = CountStats { total: 0, max: 0 };

    for (i, f) in collection.features.iter().enumerate() {
        let score = metric_float(i, &f.properties, &schema::SUITABILITY_SCORE)?;
        min = min.min(score);
        max = max.max(score);
        sum += score;

        let n5 = metric_integer(i, &f.properties, &schema::CUSTOMERS_5KM)?;
        let n10 = metric_integer(i, &f.properties, &schema::CUSTOMERS_10KM)?;
        for (acc, n) in [(&mut c5, n5), (&mut c10, n10)] {
            acc.total = acc.total.saturating_add(n);
            acc.max = if i == 0 { n } else { acc.max.max(n) };
        }
    }

    Ok(Metrics {
        suitability: ScoreStats {
            min,
            max,
            mean: sum / collection.features.len() as f64,
        },
        customers_5km: c5,
        customers_10km: c10,
    })
}

fn metric_value<'a>(i: usize, props: &'a Properties, spec: &PropertySpec) -> GridResult<&'a Value> {
    props
        .get(spec.name)
        .ok_or_else(|| GridError::missing(i, vec![spec.name.to_string()]))
}

fn coercion_error(i: usize, spec: &PropertySpec, v: &Value) -> GridError {
    GridError::TypeCoercion {
        feature: i,
        property: spec.name.to_string(),
        expected: spec.kind.type_name(),
        value: coerce::describe(v),
    }
}

fn metric_float(i: usize, props: &Properties, spec: &PropertySpec) -> GridResult<f64> {
    let v = metric_value(i, props, spec)?;
    coerce::to_float(v).ok_or_else(|| coercion_error(i, spec, v))
}

fn metric_integer(i: usize, props: &Properties, spec: &PropertySpec) -> GridResult<i64> {
    let v = metric_value(i, props, spec)?;
    coerce::to_integer(v).ok_or_else(|| coercion_error(i, spec, v))
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_value(v: &Value) -> String {
    match v {
        Value::Number(n) if n.is_f64() => format!("{:.2}", n.as_f64().unwrap_or_default()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "YES" } else { "NO" }
}

fn banner<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "  {title}")?;
    writeln!(out, "{rule}")
}

fn write_property_list<W: Write>(out: &mut W, stats: &CollectionStats) -> io::Result<()> {
    for (key, value) in &stats.first_properties {
        writeln!(out, "  {key}: {}", format_value(value))?;
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W, file_name: &str, stats: &CollectionStats) -> io::Result<()> {
    writeln!(out, "File: {file_name}")?;
    writeln!(out, "Type: FeatureCollection")?;
    writeln!(out, "Name: {}", stats.name.as_deref().unwrap_or("-"))?;
    Ok(())
}

/// Final verification of a web file. Returns the verdict.
pub fn render_verification<W: Write>(
    out: &mut W,
    stats: &CollectionStats,
    file_name: &str,
    file_size: u64,
) -> io::Result<bool> {
    banner(out, "FINAL VERIFICATION - GRID SUITABILITY WEB")?;
    writeln!(out)?;
    write_header(out, file_name, stats)?;
    writeln!(out, "Total features: {}", stats.features)?;
    writeln!(out)?;

    writeln!(
        out,
        "Features with properties: {}/{}",
        stats.features_with_properties, stats.features
    )?;
    writeln!(out, "Properties per feature: {}", stats.properties_per_feature())?;
    writeln!(out)?;

    writeln!(out, "Properties:")?;
    write_property_list(out, stats)?;
    writeln!(out)?;

    writeln!(out, "Critical properties:")?;
    for (name, present) in &stats.critical {
        writeln!(out, "  {name:25} {}", yes_no(*present))?;
    }
    writeln!(out)?;

    if let Some(m) = &stats.metrics {
        writeln!(out, "Statistics:")?;
        writeln!(out, "  Suitability Score:")?;
        writeln!(out, "    Min: {:.2}", m.suitability.min)?;
        writeln!(out, "    Max: {:.2}", m.suitability.max)?;
        writeln!(out, "    Average: {:.2}", m.suitability.mean)?;
        for (label, c) in [("5km", m.customers_5km), ("10km", m.customers_10km)] {
            writeln!(out, "  Customers {label}:")?;
            writeln!(out, "    Total: {}", group_thousands(c.total))?;
            writeln!(out, "    Max per cell: {}", c.max)?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "File size: {} bytes ({:.1} KB)",
        group_thousands(i64::try_from(file_size).unwrap_or(i64::MAX)),
        file_size as f64 / 1024.0
    )?;
    writeln!(out)?;

    let passed = stats.passed();
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    if passed {
        writeln!(out, "  ALL CHECKS PASSED")?;
        writeln!(out, "  File is ready for the web map")?;
    } else {
        writeln!(out, "  CHECKS FAILED")?;
        writeln!(out, "  Regenerate the file with: gridweb generate")?;
    }
    writeln!(out, "{rule}")?;
    Ok(passed)
}

/// Source-file summary: identity, CRS, first-feature property list.
pub fn render_source_report<W: Write>(
    out: &mut W,
    stats: &CollectionStats,
    file_name: &str,
) -> io::Result<()> {
    banner(out, "SOURCE FILE VERIFICATION")?;
    writeln!(out)?;
    write_header(out, file_name, stats)?;
    writeln!(out, "CRS: {}", stats.crs_name.as_deref().unwrap_or("-"))?;
    writeln!(out, "Total features: {}", stats.features)?;
    writeln!(out)?;

    writeln!(out, "Properties in source file (first feature):")?;
    write_property_list(out, stats)?;
    writeln!(out)?;
    writeln!(out, "Total properties: {}", stats.properties_per_feature())?;
    writeln!(out)?;
    Ok(())
}

/// Side-by-side presence table. Returns whether the source carries every critical property.
pub fn render_comparison<W: Write>(
    out: &mut W,
    source: &CollectionStats,
    web: &CollectionStats,
) -> io::Result<bool> {
    banner(out, "SOURCE vs WEB")?;
    writeln!(out)?;
    writeln!(
        out,
        "Source file:  {} features, {} properties",
        source.features,
        source.properties_per_feature()
    )?;
    writeln!(
        out,
        "Web file:     {} features, {} properties",
        web.features,
        web.properties_per_feature()
    )?;
    writeln!(out)?;

    writeln!(out, "Critical properties present:")?;
    for name in CRITICAL_PROPERTIES {
        writeln!(
            out,
            "  {name:25} Source: {:3}  Web: {}",
            yes_no(source.has_critical(name)),
            yes_no(web.has_critical(name))
        )?;
    }
    writeln!(out)?;

    let valid = source.all_critical_present();
    if valid {
        banner(out, "SOURCE FILE CONFIRMED AND VALID")?;
    } else {
        banner(out, "SOURCE FILE INCOMPLETE")?;
    }
    Ok(valid)
}
