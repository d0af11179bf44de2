//! Command-line parameter overrides.
//!
//! Overrides are given as `key=value` pairs and replace (or add) a scalar
//! parameter in every mapping of the loaded parameter set.

use log::debug;
use sweep_core::error::Error::ParameterFormat;
use sweep_core::error::Result;
use sweep_core::parameter_definitions::ParameterSet;
use sweep_core::value::ParameterValue;

/// Parses `key=value` pairs, reading each value as a YAML scalar.
///
/// Only the first `=` separates key from value, so values may contain `=`.
///
/// # Errors
///
/// Returns [`ParameterFormat`] if a pair has no `=`, an empty key, or a value
/// that is not a scalar.
///
/// # Examples
///
/// ```rust
/// use sweep_cli::overrides::parse_overrides;
/// use sweep_core::value::ParameterValue;
///
/// let overrides = parse_overrides(&["n=3".to_string()])?;
/// assert_eq!(overrides, vec![("n".to_string(), ParameterValue::Integer(3))]);
/// # Ok::<(), sweep_core::error::Error>(())
/// ```
pub fn parse_overrides(pairs: &[String]) -> Result<Vec<(String, ParameterValue)>> {
    pairs.iter().map(|pair| parse_override(pair)).collect()
}

fn parse_override(pair: &str) -> Result<(String, ParameterValue)> {
    let Some((key, raw_value)) = pair.split_once('=') else {
        return Err(ParameterFormat(pair.to_string()));
    };

    if key.is_empty() {
        return Err(ParameterFormat(pair.to_string()));
    }

    let value = if raw_value.is_empty() {
        ParameterValue::String(String::new())
    } else {
        serde_yaml::from_str::<ParameterValue>(raw_value)
            .map_err(|_| ParameterFormat(pair.to_string()))?
    };

    Ok((key.to_string(), value))
}

/// Applies parsed overrides to every mapping of `parameter_set`.
pub fn apply_overrides(parameter_set: &mut ParameterSet, overrides: &[(String, ParameterValue)]) {
    for (key, value) in overrides {
        debug!("Overriding `{}` with `{}`", key, value);
        parameter_set.set_all(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_core::config::ExpansionConfig;
    use sweep_core::file_handling::parse_parameter_set;

    #[test]
    fn test_parse_typed_values() {
        let overrides = parse_overrides(&[
            "n=3".to_string(),
            "rate=0.5".to_string(),
            "debug=true".to_string(),
            "name=run".to_string(),
            "nothing=null".to_string(),
        ])
        .unwrap();

        assert_eq!(
            overrides,
            vec![
                ("n".to_string(), ParameterValue::Integer(3)),
                ("rate".to_string(), ParameterValue::Float(0.5)),
                ("debug".to_string(), ParameterValue::Bool(true)),
                ("name".to_string(), ParameterValue::from("run")),
                ("nothing".to_string(), ParameterValue::Null),
            ]
        );
    }

    #[test]
    fn test_value_may_contain_equals() {
        let overrides = parse_overrides(&["$query=a=b".to_string()]).unwrap();
        assert_eq!(overrides[0].0, "$query");
        assert_eq!(overrides[0].1, ParameterValue::from("a=b"));
    }

    #[test]
    fn test_empty_value_is_empty_string() {
        let overrides = parse_overrides(&["suffix=".to_string()]).unwrap();
        assert_eq!(overrides[0].1, ParameterValue::from(""));
    }

    #[test]
    fn test_missing_equals_rejected() {
        let result = parse_overrides(&["novalue".to_string()]);
        assert!(matches!(result, Err(ParameterFormat(_))));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = parse_overrides(&["=3".to_string()]);
        assert!(matches!(result, Err(ParameterFormat(_))));
    }

    #[test]
    fn test_non_scalar_value_rejected() {
        let result = parse_overrides(&["list=[1, 2]".to_string()]);
        assert!(matches!(result, Err(ParameterFormat(_))));
    }

    #[test]
    fn test_apply_overrides_replaces_lists() {
        let mut parameter_set = parse_parameter_set("x: [1, 2, 3]\ny: [a, b]").unwrap();
        let overrides = parse_overrides(&["x=9".to_string(), "z=new".to_string()]).unwrap();

        apply_overrides(&mut parameter_set, &overrides);
        let combinations: Vec<_> = parameter_set
            .expand(&ExpansionConfig::default())
            .unwrap()
            .collect();

        assert_eq!(combinations.len(), 2);
        let keys: Vec<&str> = combinations[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(combinations[1].get("x"), Some(&ParameterValue::Integer(9)));
    }
}
