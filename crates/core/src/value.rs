//! Scalar parameter values and their canonical text form.
//!
//! Every combination produced by the engine is a [`ParameterDict`]: an
//! insertion-ordered map from parameter name to [`ParameterValue`].

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single scalar parameter value.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

/// One fully resolved set of parameters, in key order.
pub type ParameterDict = IndexMap<String, ParameterValue>;

/// A value produced while flattening a specification.
///
/// Grid keys contribute scalars; group keys contribute whole rows which are
/// merged into the combination.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Value(ParameterValue),
    Row(ParameterDict),
}

impl From<ParameterValue> for Candidate {
    fn from(value: ParameterValue) -> Self {
        Self::Value(value)
    }
}

impl From<ParameterDict> for Candidate {
    fn from(row: ParameterDict) -> Self {
        Self::Row(row)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Display for ParameterValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            // Shell scripts compare against lower-case `true`/`false`
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Float(value) => format_float(formatter, *value),
            Self::String(value) => formatter.write_str(value),
            Self::Null => formatter.write_str("null"),
        }
    }
}

/// Keeps a trailing `.0` on integral floats so `1.0` does not turn into `1`.
///
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent notation with
/// a signed, two-digit exponent (`1e+20`, `1.5e-07`).
fn format_float(formatter: &mut Formatter<'_>, value: f64) -> std::fmt::Result {
    if value.is_nan() {
        return formatter.write_str("nan");
    }
    if value.is_infinite() {
        return formatter.write_str(if value > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{value:e}");
    let exponent = scientific
        .split_once('e')
        .and_then(|(mantissa, exponent)| Some((mantissa, exponent.parse::<i32>().ok()?)));

    match exponent {
        Some((mantissa, exponent)) if !(-4..16).contains(&exponent) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(formatter, "{mantissa}e{sign}{:02}", exponent.abs())
        }
        _ if value.fract() == 0.0 => write!(formatter, "{value:.1}"),
        _ => write!(formatter, "{value}"),
    }
}

/// Returns the canonical textual form of a parameter value.
///
/// Booleans render as `true`/`false`, null as `null`, everything else with its
/// plain string conversion.
///
/// # Examples
///
/// ```
/// use sweep_core::value::{format_parameter, ParameterValue};
///
/// assert_eq!(format_parameter(&ParameterValue::Bool(true)), "true");
/// assert_eq!(format_parameter(&ParameterValue::Null), "null");
/// assert_eq!(format_parameter(&ParameterValue::Integer(42)), "42");
/// ```
pub fn format_parameter(param: &ParameterValue) -> String {
    param.to_string()
}
