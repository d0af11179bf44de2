//! Special parameters: values produced by a resolver instead of written out.
//!
//! A special parameter is written as a mapping with exactly one of the
//! `glob`, `range` or `groups` fields (`root_dir` may accompany `glob`):
//!
//! ```yaml
//! input: {glob: "*.csv", root_dir: "~/data"}
//! seed: {range: [0, 10, 2]}
//! group_model: {groups: [{model: small, lr: 0.1}, {model: large, lr: 0.01}]}
//! ```

use std::path::Path;

use glob::MatchOptions;
use indexmap::IndexMap;
use log::{debug, warn};

use crate::config::{expand_pattern, expand_root_dir, ExpansionConfig};
use crate::error::{Error, Result};
use crate::parameter_definitions::{raw_row, RawSpec};
use crate::value::{Candidate, ParameterDict, ParameterValue};

pub const GLOB_FIELD: &str = "glob";
pub const ROOT_DIR_FIELD: &str = "root_dir";
pub const RANGE_FIELD: &str = "range";
pub const GROUPS_FIELD: &str = "groups";

const MODE_FIELDS: [&str; 3] = [GLOB_FIELD, RANGE_FIELD, GROUPS_FIELD];

/// A half-open integer range with a non-zero step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeSpec {
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpecification`] if `step` is zero.
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::invalid_specification("`range` step must not be zero"));
        }

        Ok(Self { start, stop, step })
    }

    /// Builds a range from `[stop]`, `[start, stop]` or `[start, stop, step]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpecification`] for any other arity or a zero
    /// step.
    pub fn from_arguments(arguments: &[i64]) -> Result<Self> {
        match *arguments {
            [stop] => Self::new(0, stop, 1),
            [start, stop] => Self::new(start, stop, 1),
            [start, stop, step] => Self::new(start, stop, step),
            _ => Err(Error::invalid_specification(format!(
                "`range` takes 1 to 3 integers, got {}",
                arguments.len()
            ))),
        }
    }

    pub fn iter(&self) -> RangeIter {
        RangeIter {
            next: self.start,
            stop: self.stop,
            step: self.step,
        }
    }
}

/// Iterator over the integers of a [`RangeSpec`].
#[derive(Debug, Clone)]
pub struct RangeIter {
    next: i64,
    stop: i64,
    step: i64,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let in_range = if self.step > 0 {
            self.next < self.stop
        } else {
            self.next > self.stop
        };

        if !in_range {
            return None;
        }

        let current = self.next;
        self.next = current.checked_add(self.step).unwrap_or(self.stop);
        Some(current)
    }
}

/// A resolver with exactly one mode.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialParameter {
    /// Sorted paths matching `pattern`, relative to `root_dir` when given.
    Glob {
        pattern: String,
        root_dir: Option<String>,
    },
    /// The integers of a half-open range.
    Range(RangeSpec),
    /// Ready-made rows, passed through in order.
    Groups(Vec<ParameterDict>),
}

impl SpecialParameter {
    pub fn glob(pattern: impl Into<String>, root_dir: Option<&str>) -> Self {
        Self::Glob {
            pattern: pattern.into(),
            root_dir: root_dir.map(ToString::to_string),
        }
    }

    /// # Errors
    ///
    /// See [`RangeSpec::from_arguments`].
    pub fn range(arguments: &[i64]) -> Result<Self> {
        Ok(Self::Range(RangeSpec::from_arguments(arguments)?))
    }

    pub fn groups(rows: Vec<ParameterDict>) -> Self {
        Self::Groups(rows)
    }

    /// Builds groups from equally long columns: row `i` holds the `i`-th value
    /// of every column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpecification`] if the columns differ in length.
    pub fn from_columns(columns: IndexMap<String, Vec<ParameterValue>>) -> Result<Self> {
        let row_count = columns.values().next().map_or(0, Vec::len);

        if let Some((name, column)) = columns.iter().find(|(_, c)| c.len() != row_count) {
            return Err(Error::invalid_specification(format!(
                "`groups` column `{name}` has {} values, expected {row_count}",
                column.len()
            )));
        }

        let rows = (0..row_count)
            .map(|index| {
                columns
                    .iter()
                    .map(|(name, column)| (name.clone(), column[index].clone()))
                    .collect()
            })
            .collect();

        Ok(Self::Groups(rows))
    }

    pub fn is_special_field(name: &str) -> bool {
        name == ROOT_DIR_FIELD || MODE_FIELDS.contains(&name)
    }

    /// Name of the active mode field.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Glob { .. } => GLOB_FIELD,
            Self::Range(_) => RANGE_FIELD,
            Self::Groups(_) => GROUPS_FIELD,
        }
    }

    /// Builds a special parameter from the fields of a mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if no mode or more than one mode is present, if
    /// `root_dir` is given without `glob`, or if a field has the wrong shape.
    pub fn from_fields(mut fields: IndexMap<String, RawSpec>) -> Result<Self> {
        let modes: Vec<&'static str> = MODE_FIELDS
            .into_iter()
            .filter(|field| fields.contains_key(*field))
            .collect();

        let mode = match modes.len() {
            0 => return Err(Error::MissingResolutionMode),
            1 => modes[0],
            _ => return Err(Error::AmbiguousSpecialParameter(modes)),
        };

        let root_dir = fields.shift_remove(ROOT_DIR_FIELD);
        if root_dir.is_some() && mode != GLOB_FIELD {
            return Err(Error::invalid_specification(
                "`root_dir` can only be used together with `glob`",
            ));
        }

        let Some(value) = fields.shift_remove(mode) else {
            return Err(Error::MissingResolutionMode);
        };

        match mode {
            GLOB_FIELD => Ok(Self::Glob {
                pattern: parse_string(value, GLOB_FIELD)?,
                root_dir: root_dir
                    .map(|root_dir| parse_optional_string(root_dir, ROOT_DIR_FIELD))
                    .transpose()?
                    .flatten(),
            }),
            RANGE_FIELD => Self::range(&parse_integers(value)?),
            _ => parse_groups(value),
        }
    }

    /// Resolves into a sequence of candidates.
    ///
    /// Globbing happens here, so every call observes the filesystem afresh.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GlobPattern`] for a malformed pattern, and
    /// [`Error::NoGlobMatch`] when nothing matches and `config` rejects empty
    /// resolutions.
    pub fn resolve(&self, config: &ExpansionConfig) -> Result<Resolution<'_>> {
        match self {
            Self::Glob { pattern, root_dir } => {
                let paths = glob_paths(pattern, root_dir.as_deref())?;
                if paths.is_empty() && config.rejects_empty() {
                    return Err(Error::NoGlobMatch {
                        pattern: pattern.clone(),
                    });
                }

                debug!("Glob `{}` matched {} path(s)", pattern, paths.len());
                Ok(Resolution::Paths(paths.into_iter()))
            }
            Self::Range(range) => Ok(Resolution::Range(range.iter())),
            Self::Groups(rows) => Ok(Resolution::Groups(rows.iter())),
        }
    }
}

/// The values of a resolved [`SpecialParameter`], produced lazily.
#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    Paths(std::vec::IntoIter<String>),
    Range(RangeIter),
    Groups(std::slice::Iter<'a, ParameterDict>),
}

impl Iterator for Resolution<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        match self {
            Self::Paths(paths) => paths.next().map(|p| ParameterValue::String(p).into()),
            Self::Range(range) => range.next().map(|i| ParameterValue::Integer(i).into()),
            Self::Groups(rows) => rows.next().cloned().map(Candidate::Row),
        }
    }
}

fn glob_paths(pattern: &str, root_dir: Option<&str>) -> Result<Vec<String>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = collapse_recursive_wildcards(&expand_pattern(pattern));
    let root_dir = expand_root_dir(root_dir);
    let directories_only = pattern.ends_with('/');

    let full_pattern = match &root_dir {
        Some(root_dir) => Path::new(&glob::Pattern::escape(root_dir))
            .join(&pattern)
            .to_string_lossy()
            .into_owned(),
        None => pattern,
    };

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut paths = Vec::new();
    for entry in glob::glob_with(&full_pattern, options)? {
        match entry {
            Ok(path) => {
                let relative = root_dir
                    .as_ref()
                    .and_then(|root_dir| path.strip_prefix(root_dir).ok())
                    .map(Path::to_path_buf);
                let mut path = relative.unwrap_or(path).to_string_lossy().into_owned();
                if directories_only && !path.ends_with('/') {
                    path.push('/');
                }
                paths.push(path);
            }
            Err(e) => warn!(
                "Skipping unreadable path `{}` while globbing: {}",
                e.path().display(),
                e.error()
            ),
        }
    }

    paths.sort();
    Ok(paths)
}

/// Folds runs of `*` into one, so `**` matches within a single directory
/// level instead of recursing.
fn collapse_recursive_wildcards(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

fn parse_string(raw: RawSpec, field: &str) -> Result<String> {
    match raw {
        RawSpec::Value(ParameterValue::String(value)) => Ok(value),
        other => Err(Error::invalid_specification(format!(
            "`{field}` must be a string, found {}",
            other.shape()
        ))),
    }
}

fn parse_optional_string(raw: RawSpec, field: &str) -> Result<Option<String>> {
    match raw {
        RawSpec::Value(ParameterValue::Null) => Ok(None),
        other => parse_string(other, field).map(Some),
    }
}

fn parse_integers(raw: RawSpec) -> Result<Vec<i64>> {
    let items = match raw {
        RawSpec::List(items) => items,
        other => {
            return Err(Error::invalid_specification(format!(
                "`{RANGE_FIELD}` must be a list of integers, found {}",
                other.shape()
            )))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            RawSpec::Value(ParameterValue::Integer(value)) => Ok(value),
            other => Err(Error::invalid_specification(format!(
                "`{RANGE_FIELD}` must be a list of integers, found {} item",
                other.shape()
            ))),
        })
        .collect()
}

fn parse_groups(raw: RawSpec) -> Result<SpecialParameter> {
    match raw {
        RawSpec::List(rows) => {
            let rows = rows
                .into_iter()
                .map(|row| match row {
                    RawSpec::Mapping(fields) => raw_row(fields),
                    other => Err(Error::invalid_specification(format!(
                        "`{GROUPS_FIELD}` rows must be mappings, found {}",
                        other.shape()
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(SpecialParameter::Groups(rows))
        }
        RawSpec::Mapping(columns) => {
            let columns = columns
                .into_iter()
                .map(|(name, column)| {
                    let RawSpec::List(values) = column else {
                        return Err(Error::invalid_specification(format!(
                            "`{GROUPS_FIELD}` column `{name}` must be a list"
                        )));
                    };
                    let values = values
                        .into_iter()
                        .map(|value| value.into_value(&format!("Item of column `{name}`")))
                        .collect::<Result<Vec<_>>>()?;
                    Ok((name, values))
                })
                .collect::<Result<IndexMap<_, _>>>()?;
            SpecialParameter::from_columns(columns)
        }
        RawSpec::Value(_) => Err(Error::invalid_specification(format!(
            "`{GROUPS_FIELD}` must be a list of rows or a mapping of columns"
        ))),
    }
}
