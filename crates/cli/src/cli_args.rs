//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate.

use clap::{Parser, ValueEnum};
use sweep_core::config::{EmptyPolicy, ExpansionConfig};

/// How expanded combinations are printed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per combination: index, variables, then arguments.
    #[default]
    Text,
    /// A YAML list of `variables`/`arguments` mappings.
    Yaml,
}

/// Command-line arguments for the sweep CLI tool.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use sweep_cli::cli_args::Args;
///
/// let args = Args::parse_from(["sweep", "sweep.yml", "--strict"]);
/// assert!(args.strict);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the parameter specification YAML.
    ///
    /// If not provided, defaults to `./parameters.yml`.
    #[arg(num_args(1))]
    pub parameters_path: Option<String>,

    /// Scalar parameters to add or override in every mapping, as key=value.
    ///
    /// The value is read as a YAML scalar, so `-p n=3` sets an integer and
    /// `-p debug=true` a boolean.
    ///
    /// # Examples
    /// ```bash
    /// sweep sweep.yml -p seed=7 -p '$out=/scratch/run'
    /// ```
    #[arg(long = "param", short = 'p', action = clap::ArgAction::Append)]
    pub parameters: Vec<String>,

    /// Fail when a glob matches nothing or a parameter has no values, instead
    /// of silently producing zero combinations.
    #[arg(long, action)]
    pub strict: bool,

    /// Output format for the combinations.
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only print the number of combinations.
    #[arg(long, action)]
    pub count: bool,

    /// Also write the combinations as YAML to this path.
    #[arg(long, short = 'o')]
    pub output_path: Option<String>,
}

impl Args {
    pub fn expansion_config(&self) -> ExpansionConfig {
        ExpansionConfig {
            empty_policy: if self.strict {
                EmptyPolicy::Reject
            } else {
                EmptyPolicy::Allow
            },
        }
    }
}
