//! Sweep CLI Library
//!
//! This crate provides the command-line interface for sweep. It loads a
//! parameter specification, applies command-line overrides, expands every
//! combination and prints (or writes) them split into variables and
//! arguments, ready for a job-submission layer.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`overrides`]: `key=value` overrides applied to every mapping
//! - [`output`]: Text and YAML rendering of expanded combinations
//!
//! # Examples
//!
//! ```bash
//! # Print every combination of ./parameters.yml
//! sweep
//!
//! # Fix the seed and fail on globs that match nothing
//! sweep sweep.yml -p seed=7 --strict
//!
//! # Count the jobs without printing them
//! sweep sweep.yml --count
//!
//! # Write the jobs as YAML for another tool
//! sweep sweep.yml --format yaml -o jobs.yml
//! ```

pub mod cli_args;
pub mod output;
pub mod overrides;
