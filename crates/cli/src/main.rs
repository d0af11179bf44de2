use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use sweep_core::config;
use sweep_core::error::Result;
use sweep_core::file_handling;
use sweep_core::split::SplitParameters;

use sweep_cli::cli_args::{Args, OutputFormat};
use sweep_cli::output::{render_text, render_yaml};
use sweep_cli::overrides::{apply_overrides, parse_overrides};

fn execute() -> Result<()> {
    let args = Args::parse();

    let parameters_path = config::get_parameters_path(&args.parameters_path);
    debug!("Parameters path: `{}`", parameters_path);

    let mut parameter_set = file_handling::load_parameter_set(&parameters_path)?;

    let overrides = parse_overrides(&args.parameters)?;
    apply_overrides(&mut parameter_set, &overrides);

    let combinations = parameter_set.expand(&args.expansion_config())?;

    if args.count && args.output_path.is_none() {
        println!("{}", combinations.count());
        return Ok(());
    }

    let jobs: Vec<SplitParameters<String>> = combinations
        .map(|combination| SplitParameters::from(&combination).formatted())
        .collect();

    if let Some(output_path) = &args.output_path {
        let output_path = config::expand_path(output_path);
        file_handling::write_combinations(&output_path, &jobs)?;
        info!("Wrote {} combination(s) to `{}`", jobs.len(), output_path);
    }

    if args.count {
        println!("{}", jobs.len());
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => {
            if !jobs.is_empty() {
                println!("{}", render_text(&jobs));
            }
        }
        OutputFormat::Yaml => print!("{}", render_yaml(&jobs)?),
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
