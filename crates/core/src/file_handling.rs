//! Reading parameter documents and writing expanded combinations.
//!
//! Parameter documents are YAML: either a single mapping from parameter name
//! to specification, or a list of such mappings.

use std::fs::File;

use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::parameter_definitions::{ParameterSet, RawParameterSet};
use crate::split::SplitParameters;

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

/// Loads and checks a parameter set from a YAML file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The YAML is malformed or is neither a mapping nor a list of mappings
/// - A specification is invalid (bad range, ambiguous special parameter, ...)
///
/// # Examples
///
/// ```no_run
/// use sweep_core::config::ExpansionConfig;
/// use sweep_core::file_handling::load_parameter_set;
///
/// let parameter_set = load_parameter_set("parameters.yml")?;
/// for combination in parameter_set.expand(&ExpansionConfig::default())? {
///     println!("{combination:?}");
/// }
/// # Ok::<(), sweep_core::error::Error>(())
/// ```
pub fn load_parameter_set(path: &str) -> Result<ParameterSet> {
    let reader = get_reader("parameters", path)?;

    let document: Value = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "parameters".to_string(),
            path.to_string(),
            e,
        )
    })?;

    ParameterSet::try_from(raw_parameter_set(document, "reading", path)?)
}

/// Parses a parameter set from YAML text.
///
/// # Errors
///
/// Same as [`load_parameter_set`], minus IO failures.
pub fn parse_parameter_set(yaml: &str) -> Result<ParameterSet> {
    let document: Value = serde_yaml::from_str(yaml).map_err(|e| {
        Error::yaml_error(
            "parsing".to_string(),
            "parameters".to_string(),
            "<inline>".to_string(),
            e,
        )
    })?;

    ParameterSet::try_from(raw_parameter_set(document, "parsing", "<inline>")?)
}

fn raw_parameter_set(document: Value, action: &str, path: &str) -> Result<RawParameterSet> {
    check_keys(&document)?;

    serde_yaml::from_value(document).map_err(|e| {
        Error::yaml_error(
            action.to_string(),
            "parameters".to_string(),
            path.to_string(),
            e,
        )
    })
}

/// Rejects mappings, at any depth, whose keys are not strings.
fn check_keys(value: &Value) -> Result<()> {
    match value {
        Value::Mapping(mapping) => mapping.iter().try_for_each(|(key, value)| {
            if !key.is_string() {
                return Err(Error::invalid_specification(format!(
                    "keys must be strings, found `{}`",
                    describe_key(key)
                )));
            }
            check_keys(value)
        }),
        Value::Sequence(items) => items.iter().try_for_each(check_keys),
        Value::Tagged(tagged) => check_keys(&tagged.value),
        _ => Ok(()),
    }
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        Value::Bool(value) => value.to_string(),
        Value::Number(value) => value.to_string(),
        Value::String(value) => value.clone(),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => tagged.tag.to_string(),
    }
}

/// Writes formatted combinations to disk as a YAML list.
///
/// # Errors
///
/// Returns an error if the file cannot be created or serialization fails.
pub fn write_combinations(path: &str, combinations: &[SplitParameters<String>]) -> Result<()> {
    let f = File::create(path)
        .map_err(|e| Error::io_error("combinations".to_string(), path.to_string(), e))?;

    serde_yaml::to_writer(f, combinations).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            "combinations".to_string(),
            path.to_string(),
            e,
        )
    })
}

/// Reads combinations previously written by [`write_combinations`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a list of
/// combinations.
pub fn read_combinations(path: &str) -> Result<Vec<SplitParameters<String>>> {
    let reader = get_reader("combinations", path)?;

    serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "combinations".to_string(),
            path.to_string(),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpansionConfig;
    use indexmap::IndexMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{content}").unwrap();
        temp_file
    }

    #[test]
    fn test_load_single_mapping() {
        let temp_file = write_temp("x: [1, 2]\ny: {range: [3]}\n");
        let set = load_parameter_set(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(set.mappings().len(), 1);
        assert_eq!(set.expand(&ExpansionConfig::default()).unwrap().count(), 6);
    }

    #[test]
    fn test_load_list_of_mappings() {
        let temp_file = write_temp("- x: 1\n- x: [2, 3]\n");
        let set = load_parameter_set(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(set.mappings().len(), 2);
        assert_eq!(set.expand(&ExpansionConfig::default()).unwrap().count(), 3);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_file = write_temp("invalid: yaml: content: [");
        let result = load_parameter_set(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_load_scalar_document_rejected() {
        let temp_file = write_temp("just a string");
        let result = load_parameter_set(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }

    #[test]
    fn test_non_string_key_names_the_key() {
        let result = parse_parameter_set("1: [1, 2]\n");
        match result {
            Err(Error::InvalidSpecification(reason)) => assert!(reason.contains("`1`")),
            other => panic!("expected InvalidSpecification, got {other:?}"),
        }

        let result = parse_parameter_set("x: {groups: [{true: 1}]}\n");
        assert!(matches!(result, Err(Error::InvalidSpecification(_))));
    }

    #[test]
    fn test_load_file_not_found() {
        let result = load_parameter_set("/this/path/does/not/exist.yml");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_ambiguous_special_parameter() {
        let temp_file = write_temp("x: {glob: '*.csv', range: [0, 3]}\n");
        let result = load_parameter_set(temp_file.path().to_str().unwrap());
        assert!(matches!(result, Err(Error::AmbiguousSpecialParameter(_))));
    }

    #[test]
    fn test_parse_parameter_set_inline() {
        let set = parse_parameter_set("{a: [true, false]}").unwrap();
        assert_eq!(set.expand(&ExpansionConfig::default()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_and_read_combinations() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().to_str().unwrap();

        let mut variables = IndexMap::new();
        variables.insert("x".to_string(), "1".to_string());
        let mut arguments = IndexMap::new();
        arguments.insert("-n".to_string(), "true".to_string());
        let combinations = vec![SplitParameters {
            variables,
            arguments,
        }];

        write_combinations(temp_path, &combinations).unwrap();
        let read_back = read_combinations(temp_path).unwrap();
        assert_eq!(read_back, combinations);
    }
}
