use itertools::Itertools;

use crate::config::ExpansionConfig;
use crate::error::Result;
use crate::parameter_definitions::ParameterSpec;
use crate::value::Candidate;

/// Reduces a specification to its plain list of candidate values.
///
/// Special parameters are resolved, lists are flattened recursively and
/// concatenated in order, and anything else becomes a single candidate.
/// Duplicates are kept.
///
/// # Errors
///
/// Propagates resolution errors from special parameters.
pub fn flatten(spec: &ParameterSpec, config: &ExpansionConfig) -> Result<Vec<Candidate>> {
    match spec {
        ParameterSpec::Special(special) => Ok(special.resolve(config)?.collect()),
        ParameterSpec::List(items) => items
            .iter()
            .map(|item| flatten(item, config))
            .flatten_ok()
            .collect(),
        ParameterSpec::Value(value) => Ok(vec![Candidate::Value(value.clone())]),
        ParameterSpec::Row(row) => Ok(vec![Candidate::Row(row.clone())]),
    }
}
