//! Sweep Core Library
//!
//! This crate expands declarative, possibly nested parameter specifications
//! into the full set of concrete parameter combinations, one per job in a
//! parameter sweep.
//!
//! # Key Features
//!
//! - **Special Parameters**: Values from file globs, integer ranges or ready-made groups
//! - **Flattening**: Nested lists of literals and special parameters reduce to candidate lists
//! - **Combinations**: Cartesian product in key order, with group rows merged into each job
//! - **Splitting and Formatting**: Variables vs. `$`/`-` arguments, canonical value text
//! - **Error Handling**: Malformed specifications are rejected, never guessed at
//!
//! # Examples
//!
//! Expanding a parameter file:
//!
//! ```no_run
//! use sweep_core::config::ExpansionConfig;
//! use sweep_core::file_handling::load_parameter_set;
//! use sweep_core::split::SplitParameters;
//!
//! let parameter_set = load_parameter_set("parameters.yml")?;
//! for combination in parameter_set.expand(&ExpansionConfig::default())? {
//!     let job = SplitParameters::from(&combination).formatted();
//!     println!("{:?} {:?}", job.variables, job.arguments);
//! }
//! # Ok::<(), sweep_core::error::Error>(())
//! ```

pub mod combination;
pub mod config;
pub mod error;
pub mod file_handling;
pub mod flatten;
pub mod parameter_definitions;
pub mod special;
pub mod split;
pub mod value;
