use indexmap::IndexMap;
use itertools::Itertools;
use sweep_core::error::{Error, Result};
use sweep_core::split::SplitParameters;

fn join_pairs(pairs: &IndexMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join(" ")
}

/// Renders one combination as `index: variables | arguments`.
///
/// Empty segments are left out, so a job with only arguments reads
/// `index: | arguments`.
pub fn render_text_line(index: usize, job: &SplitParameters<String>) -> String {
    let mut line = format!("{index}:");

    if !job.variables.is_empty() {
        line.push(' ');
        line.push_str(&join_pairs(&job.variables));
    }
    if !job.arguments.is_empty() {
        line.push_str(" | ");
        line.push_str(&join_pairs(&job.arguments));
    }

    line
}

pub fn render_text(jobs: &[SplitParameters<String>]) -> String {
    jobs.iter()
        .enumerate()
        .map(|(index, job)| render_text_line(index, job))
        .join("\n")
}

/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_yaml(jobs: &[SplitParameters<String>]) -> Result<String> {
    serde_yaml::to_string(jobs).map_err(|e| {
        Error::yaml_error(
            "rendering".to_string(),
            "combinations".to_string(),
            "<stdout>".to_string(),
            e,
        )
    })
}
