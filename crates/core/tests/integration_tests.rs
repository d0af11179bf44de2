//! Integration tests for sweep-core
//!
//! These tests verify that loading, expansion, splitting and formatting work
//! together correctly by running complete workflows end-to-end.

use std::fs::File;
use std::io::Write;

use sweep_core::{
    combination::expand,
    config::ExpansionConfig,
    error::Error,
    file_handling::{load_parameter_set, parse_parameter_set, read_combinations, write_combinations},
    split::SplitParameters,
    value::{format_parameter, ParameterDict, ParameterValue},
};
use tempfile::NamedTempFile;

fn texts(combination: &ParameterDict) -> Vec<(String, String)> {
    combination
        .iter()
        .map(|(k, v)| (k.clone(), format_parameter(v)))
        .collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Test a sweep mixing globbed inputs, a range and grouped settings
#[test]
fn test_complete_sweep_workflow() {
    let data_dir = tempfile::tempdir().unwrap();
    for name in ["beta.csv", "alpha.csv", "notes.txt"] {
        File::create(data_dir.path().join(name)).unwrap();
    }

    let yaml_content = format!(
        r#"
input: {{glob: "*.csv", root_dir: "{}"}}
seed: {{range: [0, 2]}}
group_model:
  groups:
    - {{model: small, lr: 0.1}}
    - {{model: large, lr: 0.01}}
"$out": /tmp/results
"#,
        data_dir.path().to_str().unwrap()
    );

    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{yaml_content}").unwrap();

    let parameter_set = load_parameter_set(temp_file.path().to_str().unwrap()).unwrap();
    let combinations: Vec<ParameterDict> = parameter_set
        .expand(&ExpansionConfig::default())
        .unwrap()
        .collect();

    assert_eq!(combinations.len(), 8);
    assert_eq!(
        texts(&combinations[0]),
        pairs(&[
            ("input", "alpha.csv"),
            ("seed", "0"),
            ("$out", "/tmp/results"),
            ("model", "small"),
            ("lr", "0.1"),
        ])
    );
    assert_eq!(
        texts(&combinations[7]),
        pairs(&[
            ("input", "beta.csv"),
            ("seed", "1"),
            ("$out", "/tmp/results"),
            ("model", "large"),
            ("lr", "0.01"),
        ])
    );

    let job = SplitParameters::from(&combinations[0]).formatted();
    assert_eq!(job.arguments.len(), 1);
    assert_eq!(job.arguments.get("$out"), Some(&"/tmp/results".to_string()));
    assert!(!job.variables.contains_key("$out"));
    assert!(!job.variables.contains_key("group_model"));
}

/// Test that a list of mappings expands each independently
#[test]
fn test_multiple_mappings_workflow() {
    let parameter_set = parse_parameter_set(
        r#"
- mode: fast
  "-n": [1, 2]
- mode: slow
  "-n": 10
  debug: [true, null]
"#,
    )
    .unwrap();

    let combinations: Vec<ParameterDict> = expand(&parameter_set, &ExpansionConfig::default())
        .unwrap()
        .collect();

    let rendered: Vec<Vec<(String, String)>> = combinations.iter().map(texts).collect();
    assert_eq!(
        rendered,
        vec![
            pairs(&[("mode", "fast"), ("-n", "1")]),
            pairs(&[("mode", "fast"), ("-n", "2")]),
            pairs(&[("mode", "slow"), ("-n", "10"), ("debug", "true")]),
            pairs(&[("mode", "slow"), ("-n", "10"), ("debug", "null")]),
        ]
    );
}

/// Test column-form groups and mixed candidate lists
#[test]
fn test_column_groups_and_mixed_lists() {
    let parameter_set = parse_parameter_set(
        r#"
size: [8, {range: [16, 33, 16]}]
GROUP:
  groups:
    width: [1, 2]
    height: [3, 4]
"#,
    )
    .unwrap();

    let combinations: Vec<ParameterDict> = parameter_set
        .expand(&ExpansionConfig::default())
        .unwrap()
        .collect();

    assert_eq!(combinations.len(), 6);
    assert_eq!(
        texts(&combinations[1]),
        pairs(&[("size", "8"), ("width", "2"), ("height", "4")])
    );
    assert_eq!(
        texts(&combinations[5]),
        pairs(&[("size", "32"), ("width", "2"), ("height", "4")])
    );
}

/// Test the empty-resolution policy end-to-end
#[test]
fn test_empty_glob_policy_workflow() {
    let data_dir = tempfile::tempdir().unwrap();
    let yaml_content = format!(
        "input: {{glob: '*.none', root_dir: '{}'}}\nx: [1, 2]\n",
        data_dir.path().to_str().unwrap()
    );
    let parameter_set = parse_parameter_set(&yaml_content).unwrap();

    let lenient = parameter_set.expand(&ExpansionConfig::default()).unwrap();
    assert_eq!(lenient.count(), 0);

    let strict = parameter_set.expand(&ExpansionConfig::strict());
    assert!(matches!(strict, Err(Error::NoGlobMatch { .. })));
}

/// Test that globs are re-evaluated on every expansion
#[test]
fn test_glob_reevaluated_per_expansion() {
    let data_dir = tempfile::tempdir().unwrap();
    let yaml_content = format!(
        "input: {{glob: '*.log', root_dir: '{}'}}\n",
        data_dir.path().to_str().unwrap()
    );
    let parameter_set = parse_parameter_set(&yaml_content).unwrap();

    assert_eq!(
        parameter_set.expand(&ExpansionConfig::default()).unwrap().count(),
        0
    );

    File::create(data_dir.path().join("first.log")).unwrap();
    assert_eq!(
        parameter_set.expand(&ExpansionConfig::default()).unwrap().count(),
        1
    );
}

/// Test invalid specifications are reported, not guessed at
#[test]
fn test_invalid_specifications() {
    assert!(matches!(
        parse_parameter_set("x: {range: [1, 2, 3, 4]}"),
        Err(Error::InvalidSpecification(_))
    ));
    assert!(matches!(
        parse_parameter_set("x: {range: [0, 3], groups: []}"),
        Err(Error::AmbiguousSpecialParameter(_))
    ));
    assert!(matches!(
        parse_parameter_set("x: {root_dir: /tmp}"),
        Err(Error::MissingResolutionMode)
    ));
}

/// Test writing the formatted jobs and reading them back
#[test]
fn test_combination_output_workflow() {
    let parameter_set = parse_parameter_set("flag: [true, false]\n\"--rate\": 0.5\n").unwrap();
    let jobs: Vec<SplitParameters<String>> = parameter_set
        .expand(&ExpansionConfig::default())
        .unwrap()
        .map(|combination| SplitParameters::from(&combination).formatted())
        .collect();

    let output_dir = tempfile::tempdir().unwrap();
    let output_path = output_dir.path().join("jobs.yml");
    let output_path = output_path.to_str().unwrap();

    write_combinations(output_path, &jobs).unwrap();
    let read_back = read_combinations(output_path).unwrap();

    assert_eq!(read_back, jobs);
    assert_eq!(read_back[1].variables.get("flag"), Some(&"false".to_string()));
    assert_eq!(read_back[0].arguments.get("--rate"), Some(&"0.5".to_string()));
    assert_eq!(
        ParameterValue::Float(0.5).to_string(),
        read_back[1].arguments["--rate"]
    );
}
