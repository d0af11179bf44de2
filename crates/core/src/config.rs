//! Expansion settings and path utilities.
//!
//! This module holds the knobs that change how empty resolutions are treated
//! and the helpers that resolve parameter file paths, expanding `~` the way a
//! shell would.

/// Default path for the parameter specification file
const DEFAULT_PARAMETERS_PATH: &str = "./parameters.yml";

/// What to do when a glob matches nothing or a key resolves to no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Keep going: the affected mapping simply yields zero combinations.
    #[default]
    Allow,
    /// Fail with [`crate::error::Error::NoGlobMatch`] or
    /// [`crate::error::Error::EmptyResolution`].
    Reject,
}

/// Settings applied to a single expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpansionConfig {
    pub empty_policy: EmptyPolicy,
}

impl ExpansionConfig {
    /// A configuration that errors on empty globs and empty keys.
    pub fn strict() -> Self {
        Self {
            empty_policy: EmptyPolicy::Reject,
        }
    }

    pub fn rejects_empty(&self) -> bool {
        self.empty_policy == EmptyPolicy::Reject
    }
}

/// Resolves the parameter specification file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses
/// `./parameters.yml`. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use sweep_core::config::get_parameters_path;
///
/// let default_path = get_parameters_path(&None);
/// assert!(default_path.ends_with("parameters.yml"));
/// ```
pub fn get_parameters_path(parameters_path_arg: &Option<String>) -> String {
    let parameters_path = match parameters_path_arg {
        Some(parameters_path) => parameters_path,
        None => DEFAULT_PARAMETERS_PATH,
    };

    expand_path(parameters_path)
}

/// Expands `~` in any user-supplied path.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}

/// Expands `~` in a glob root directory, if one is given.
///
/// # Examples
///
/// ```
/// use sweep_core::config::expand_root_dir;
///
/// let expanded = expand_root_dir(Some("~/data"));
/// assert!(expanded.is_some());
///
/// assert!(expand_root_dir(None).is_none());
/// ```
pub fn expand_root_dir(root_dir: Option<&str>) -> Option<String> {
    root_dir.map(expand_path)
}

/// Expands `~` in a glob pattern.
pub fn expand_pattern(pattern: &str) -> String {
    expand_path(pattern)
}
