//! Parameter specifications, as loaded and as expanded.
//!
//! Documents are first deserialized into the shape-only [`RawSpec`] tree and
//! then checked into the typed [`ParameterSpec`] model, so that malformed
//! specifications surface as [`Error`] values instead of opaque serde errors.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::special::SpecialParameter;
use crate::value::{ParameterDict, ParameterValue};

/// Name prefix, compared case-insensitively, that marks a group key.
pub const GROUP_PREFIX: &str = "group";

/// A parameter specification as it appears in a document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawSpec {
    Value(ParameterValue),
    List(Vec<RawSpec>),
    Mapping(IndexMap<String, RawSpec>),
}

impl RawSpec {
    /// Unwraps a scalar, reporting `context` when the value is anything else.
    pub(crate) fn into_value(self, context: &str) -> Result<ParameterValue> {
        match self {
            Self::Value(value) => Ok(value),
            Self::List(_) | Self::Mapping(_) => Err(Error::invalid_specification(format!(
                "{context} must be a scalar value"
            ))),
        }
    }

    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Self::Value(_) => "a scalar",
            Self::List(_) => "a list",
            Self::Mapping(_) => "a mapping",
        }
    }
}

/// Converts a raw mapping into a literal row of scalars.
pub(crate) fn raw_row(fields: IndexMap<String, RawSpec>) -> Result<ParameterDict> {
    fields
        .into_iter()
        .map(|(key, spec)| {
            let value = spec.into_value(&format!("Value of `{key}` in a group row"))?;
            Ok((key, value))
        })
        .collect()
}

/// The top level of a parameter document: one mapping or a list of them.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawParameterSet {
    Single(IndexMap<String, RawSpec>),
    Many(Vec<IndexMap<String, RawSpec>>),
}

/// A checked parameter specification for a single key.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSpec {
    /// A literal scalar.
    Value(ParameterValue),
    /// A glob, range or groups resolver.
    Special(SpecialParameter),
    /// A literal group row, only meaningful under a group key.
    Row(ParameterDict),
    /// Candidates that are concatenated in order.
    List(Vec<ParameterSpec>),
}

impl TryFrom<RawSpec> for ParameterSpec {
    type Error = Error;

    fn try_from(raw: RawSpec) -> Result<Self> {
        match raw {
            RawSpec::Value(value) => Ok(Self::Value(value)),
            RawSpec::List(items) => Ok(Self::List(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>>>()?,
            )),
            RawSpec::Mapping(fields) => {
                if fields.is_empty() {
                    return Err(Error::MissingResolutionMode);
                }

                let special_count = fields
                    .keys()
                    .filter(|key| SpecialParameter::is_special_field(key))
                    .count();

                if special_count == fields.len() {
                    Ok(Self::Special(SpecialParameter::from_fields(fields)?))
                } else if special_count == 0 {
                    Ok(Self::Row(raw_row(fields)?))
                } else {
                    Err(Error::invalid_specification(format!(
                        "mapping mixes special parameter fields with other keys: {}",
                        fields.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
                    )))
                }
            }
        }
    }
}

impl From<ParameterValue> for ParameterSpec {
    fn from(value: ParameterValue) -> Self {
        Self::Value(value)
    }
}

impl From<SpecialParameter> for ParameterSpec {
    fn from(special: SpecialParameter) -> Self {
        Self::Special(special)
    }
}

impl From<ParameterDict> for ParameterSpec {
    fn from(row: ParameterDict) -> Self {
        Self::Row(row)
    }
}

impl<T: Into<ParameterSpec>> From<Vec<T>> for ParameterSpec {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for ParameterSpec {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for ParameterSpec {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for ParameterSpec {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for ParameterSpec {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

/// How a key's resolved values enter a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Each scalar candidate becomes the key's value.
    Grid,
    /// Each row candidate is merged into the combination, replacing the key.
    Group,
}

impl KeyKind {
    /// Classifies a key by the case-insensitive `group` name prefix.
    pub fn infer(name: &str) -> Self {
        if name.to_lowercase().starts_with(GROUP_PREFIX) {
            Self::Group
        } else {
            Self::Grid
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry {
    pub spec: ParameterSpec,
    pub kind: KeyKind,
}

/// An ordered mapping from parameter name to specification.
///
/// # Examples
///
/// ```
/// use sweep_core::parameter_definitions::{KeyKind, Parameters};
///
/// let parameters = Parameters::new()
///     .with("seed", vec![1_i64, 2, 3])
///     .with("Group_inputs", vec!["unused"]);
///
/// assert_eq!(parameters.get("seed").unwrap().kind, KeyKind::Grid);
/// assert_eq!(parameters.get("Group_inputs").unwrap().kind, KeyKind::Group);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: IndexMap<String, ParameterEntry>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key whose kind is inferred from its name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, spec: impl Into<ParameterSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    /// Adds a key that is merged as a group regardless of its name.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, spec: impl Into<ParameterSpec>) -> Self {
        self.insert_with_kind(name, spec, KeyKind::Group);
        self
    }

    /// Inserts or replaces a key, inferring its kind. A replaced key keeps its
    /// position.
    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<ParameterSpec>) {
        let name = name.into();
        let kind = KeyKind::infer(&name);
        self.insert_with_kind(name, spec, kind);
    }

    pub fn insert_with_kind(
        &mut self,
        name: impl Into<String>,
        spec: impl Into<ParameterSpec>,
        kind: KeyKind,
    ) {
        let entry = ParameterEntry {
            spec: spec.into(),
            kind,
        };
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ParameterEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<IndexMap<String, RawSpec>> for Parameters {
    type Error = Error;

    fn try_from(raw: IndexMap<String, RawSpec>) -> Result<Self> {
        let mut parameters = Self::new();
        for (name, spec) in raw {
            let spec = ParameterSpec::try_from(spec).map_err(|e| match e {
                Error::InvalidSpecification(reason) => {
                    Error::InvalidSpecification(format!("parameter `{name}`: {reason}"))
                }
                other => other,
            })?;
            parameters.insert(name, spec);
        }

        Ok(parameters)
    }
}

/// The full input of an expansion: mappings expanded independently and
/// concatenated in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    mappings: Vec<Parameters>,
}

impl ParameterSet {
    pub fn mappings(&self) -> &[Parameters] {
        &self.mappings
    }

    /// Sets `name` to a single scalar in every mapping.
    pub fn set_all(&mut self, name: &str, value: &ParameterValue) {
        for parameters in &mut self.mappings {
            parameters.insert(name, value.clone());
        }
    }
}

impl From<Parameters> for ParameterSet {
    fn from(parameters: Parameters) -> Self {
        Self {
            mappings: vec![parameters],
        }
    }
}

impl From<Vec<Parameters>> for ParameterSet {
    fn from(mappings: Vec<Parameters>) -> Self {
        Self { mappings }
    }
}

impl TryFrom<RawParameterSet> for ParameterSet {
    type Error = Error;

    fn try_from(raw: RawParameterSet) -> Result<Self> {
        let raw_mappings = match raw {
            RawParameterSet::Single(mapping) => vec![mapping],
            RawParameterSet::Many(mappings) => mappings,
        };

        let mappings = raw_mappings
            .into_iter()
            .map(Parameters::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { mappings })
    }
}
