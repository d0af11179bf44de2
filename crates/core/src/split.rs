use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{format_parameter, ParameterDict, ParameterValue};

/// True for keys that are passed as arguments rather than variables: names
/// starting with `$` or `-`.
pub fn is_argument_key(key: &str) -> bool {
    key.starts_with('$') || key.starts_with('-')
}

/// Splits a combination into `(variables, arguments)`, keeping key order.
pub fn split_variables_and_arguments(param_dict: &ParameterDict) -> (ParameterDict, ParameterDict) {
    let (arguments, variables): (ParameterDict, ParameterDict) = param_dict
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .partition(|(key, _)| is_argument_key(key));

    (variables, arguments)
}

/// A combination split into variables and arguments.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SplitParameters<V = ParameterValue> {
    pub variables: IndexMap<String, V>,
    pub arguments: IndexMap<String, V>,
}

impl From<&ParameterDict> for SplitParameters {
    fn from(param_dict: &ParameterDict) -> Self {
        let (variables, arguments) = split_variables_and_arguments(param_dict);
        Self {
            variables,
            arguments,
        }
    }
}

impl SplitParameters {
    /// Canonical text form of every value.
    pub fn formatted(&self) -> SplitParameters<String> {
        SplitParameters {
            variables: format_dict(&self.variables),
            arguments: format_dict(&self.arguments),
        }
    }
}

fn format_dict(dict: &ParameterDict) -> IndexMap<String, String> {
    dict.iter()
        .map(|(key, value)| (key.clone(), format_parameter(value)))
        .collect()
}
