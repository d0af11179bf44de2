//! Expansion of parameter sets into one flat [`ParameterDict`] per job.
//!
//! Each mapping of a [`ParameterSet`] is reduced to a [`Grid`] of candidate
//! lists, then walked as a Cartesian product in key order with the last key
//! varying fastest. Group keys are removed from every combination and their
//! row is merged in at the top level; later groups overwrite earlier keys.

use itertools::structs::MultiProduct;
use itertools::{Either, Itertools};
use log::{debug, info, warn};

use crate::config::ExpansionConfig;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::parameter_definitions::{KeyKind, ParameterSet, Parameters};
use crate::value::{Candidate, ParameterDict};

/// Candidate values for every key of one mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    keys: Vec<String>,
    candidates: Vec<Vec<Candidate>>,
}

impl Grid {
    /// Flattens every key of `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSpecification`] when a grid key resolves to a
    /// row or a group key to a scalar, [`Error::EmptyResolution`] when a key
    /// has no candidates and `config` rejects that, and any resolution error.
    pub fn build(parameters: &Parameters, config: &ExpansionConfig) -> Result<Self> {
        let mut keys = Vec::with_capacity(parameters.len());
        let mut candidates = Vec::with_capacity(parameters.len());

        for (key, entry) in parameters.iter() {
            let values = flatten(&entry.spec, config)?;
            check_kind(key, entry.kind, &values)?;

            if values.is_empty() && config.rejects_empty() {
                return Err(Error::EmptyResolution { key: key.clone() });
            }

            debug!("Parameter `{}` has {} candidate value(s)", key, values.len());
            keys.push(key.clone());
            candidates.push(values);
        }

        Ok(Self { keys, candidates })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn candidates(&self, key: &str) -> Option<&[Candidate]> {
        let index = self.keys.iter().position(|k| k == key)?;
        Some(&self.candidates[index])
    }

    /// Number of combinations the grid expands to.
    pub fn combination_count(&self) -> usize {
        self.candidates
            .iter()
            .fold(1_usize, |count, values| count.saturating_mul(values.len()))
    }
}

fn check_kind(key: &str, kind: KeyKind, values: &[Candidate]) -> Result<()> {
    for value in values {
        match (kind, value) {
            (KeyKind::Grid, Candidate::Value(_)) | (KeyKind::Group, Candidate::Row(_)) => {}
            (KeyKind::Grid, Candidate::Row(_)) => {
                return Err(Error::invalid_specification(format!(
                    "parameter `{key}` resolves to a group row but is not a group key"
                )));
            }
            (KeyKind::Group, Candidate::Value(value)) => {
                return Err(Error::invalid_specification(format!(
                    "group parameter `{key}` must resolve to rows, found `{value}`"
                )));
            }
        }
    }

    Ok(())
}

impl IntoIterator for Grid {
    type Item = ParameterDict;
    type IntoIter = GridCombinations;

    fn into_iter(self) -> GridCombinations {
        let rows = if self.candidates.is_empty() {
            Either::Left(std::iter::once(Vec::new()))
        } else {
            Either::Right(
                self.candidates
                    .into_iter()
                    .map(Vec::into_iter)
                    .multi_cartesian_product(),
            )
        };

        GridCombinations {
            keys: self.keys,
            rows,
        }
    }
}

/// Lazy combinations of a single [`Grid`].
pub struct GridCombinations {
    keys: Vec<String>,
    rows: Either<std::iter::Once<Vec<Candidate>>, MultiProduct<std::vec::IntoIter<Candidate>>>,
}

impl Iterator for GridCombinations {
    type Item = ParameterDict;

    fn next(&mut self) -> Option<ParameterDict> {
        let row = self.rows.next()?;
        Some(merge_row(&self.keys, row))
    }
}

/// Zips a product row back onto its keys, unpacking group rows.
fn merge_row(keys: &[String], row: Vec<Candidate>) -> ParameterDict {
    let mut combo = ParameterDict::with_capacity(row.len());
    let mut groups = Vec::new();

    for (key, candidate) in keys.iter().zip(row) {
        match candidate {
            Candidate::Value(value) => {
                combo.insert(key.clone(), value);
            }
            Candidate::Row(group) => groups.push(group),
        }
    }

    for group in groups {
        combo.extend(group);
    }

    combo
}

/// Lazy combinations of a whole [`ParameterSet`], mapping after mapping.
pub struct Combinations {
    inner: std::iter::Flatten<std::vec::IntoIter<Grid>>,
}

impl Iterator for Combinations {
    type Item = ParameterDict;

    fn next(&mut self) -> Option<ParameterDict> {
        self.inner.next()
    }
}

/// Expands a parameter set into its combinations.
///
/// All keys are resolved up front, so specification and filesystem errors
/// surface here; the product itself is generated lazily.
///
/// # Errors
///
/// See [`Grid::build`].
///
/// # Examples
///
/// ```
/// use sweep_core::combination::expand;
/// use sweep_core::config::ExpansionConfig;
/// use sweep_core::parameter_definitions::{ParameterSet, Parameters};
///
/// let set = ParameterSet::from(Parameters::new().with("x", vec![1_i64, 2]).with("y", "a"));
/// let combos: Vec<_> = expand(&set, &ExpansionConfig::default())?.collect();
/// assert_eq!(combos.len(), 2);
/// # Ok::<(), sweep_core::error::Error>(())
/// ```
pub fn expand(parameter_set: &ParameterSet, config: &ExpansionConfig) -> Result<Combinations> {
    let grids = parameter_set
        .mappings()
        .iter()
        .map(|parameters| Grid::build(parameters, config))
        .collect::<Result<Vec<_>>>()?;

    let mut total = 0_usize;
    for (index, grid) in grids.iter().enumerate() {
        let count = grid.combination_count();
        if count == 0 {
            warn!("Parameter mapping {} yields no combinations", index);
        }
        total = total.saturating_add(count);
    }
    info!(
        "Expanding {} parameter mapping(s) into {} combination(s)",
        grids.len(),
        total
    );

    Ok(Combinations {
        inner: grids.into_iter().flatten(),
    })
}

impl ParameterSet {
    /// Shorthand for [`expand`].
    ///
    /// # Errors
    ///
    /// See [`Grid::build`].
    pub fn expand(&self, config: &ExpansionConfig) -> Result<Combinations> {
        expand(self, config)
    }
}
