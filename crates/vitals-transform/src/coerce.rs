//! Numeric key coercion.
//!
//! Failures never propagate: an unparseable value is blanked and counted as
//! both a parse error and a null.

use vitals_model::{CleanStats, NormalizedRow, NumericField, NumericKind, RecordType, UnifiedSchema};

/// Outcome of coercing one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoerceOutcome {
    /// Empty after trimming.
    Null,
    /// Canonical rendering of the parsed number.
    Value(String),
    /// Non-empty but not a finite number.
    ParseError,
}

/// Parses a float, returning None for invalid, empty or non-finite strings.
pub fn parse_finite(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Renders a decimal the way a shortest round-trip float repr does: plain
/// notation with at least one fractional digit (`45` → `45.0`), switching to
/// exponent notation (`1e+16`, `1.5e-05`) below `1e-4` and from `1e16` up.
pub fn format_decimal(v: f64) -> String {
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{v:e}");
        if let Some((mantissa, exponent)) = scientific.split_once('e')
            && let Ok(exponent) = exponent.parse::<i32>()
        {
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!("{mantissa}e{sign}{:02}", exponent.abs());
        }
        return scientific;
    }
    let plain = v.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// Truncates towards zero and renders every integer digit, with no width limit.
fn format_integer(v: f64) -> String {
    let truncated = v.trunc();
    if truncated == 0.0 {
        return "0".to_string();
    }
    format!("{truncated:.0}")
}

pub fn coerce_value(raw: &str, kind: NumericKind) -> CoerceOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CoerceOutcome::Null;
    }
    let Some(number) = parse_finite(trimmed) else {
        return CoerceOutcome::ParseError;
    };
    match kind {
        NumericKind::Integer => CoerceOutcome::Value(format_integer(number)),
        NumericKind::Decimal => CoerceOutcome::Value(format_decimal(number)),
    }
}

/// The numeric fields of a record type, resolved against one schema.
#[derive(Debug, Clone)]
pub struct FieldCoercer {
    fields: Vec<(NumericField, Option<usize>)>,
}

impl FieldCoercer {
    pub fn new(record_type: &RecordType, schema: &UnifiedSchema) -> Self {
        let fields = record_type
            .numeric_fields
            .iter()
            .map(|field| (field.clone(), schema.position(&field.name)))
            .collect();
        Self { fields }
    }

    /// Rewrites every numeric field of `row` in place.
    ///
    /// A field missing from the schema reads as empty and counts as a null,
    /// but is never added to the row.
    pub fn apply(&self, row: &mut NormalizedRow, stats: &mut CleanStats) {
        for (field, position) in &self.fields {
            let raw = position.map(|idx| row.value(idx)).unwrap_or("");
            match coerce_value(raw, field.kind) {
                CoerceOutcome::Null => {
                    stats.record_null(&field.name);
                    if let Some(idx) = position {
                        row.set(*idx, String::new());
                    }
                }
                CoerceOutcome::Value(value) => {
                    if let Some(idx) = position {
                        row.set(*idx, value);
                    }
                }
                CoerceOutcome::ParseError => {
                    stats.record_parse_error(&field.name);
                    stats.record_null(&field.name);
                    if let Some(idx) = position {
                        row.set(*idx, String::new());
                    }
                }
            }
        }
    }
}
