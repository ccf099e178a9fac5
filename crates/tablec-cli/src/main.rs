//! tablec CLI.

use std::io::{self, IsTerminal};

use clap::Parser;
use tablec_cli::cli::{Cli, Command};
use tablec_cli::commands::{outcome_to_json, run_import, run_validators};
use tablec_cli::logging::init_logging;
use tablec_cli::summary::{print_import_summary, print_validators};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Import(args) => match run_import(args) {
            Ok(outcome) if args.json => match outcome_to_json(&outcome) {
                Ok(json) => {
                    println!("{json}");
                    i32::from(outcome.has_failures())
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    2
                }
            },
            Ok(outcome) => {
                print_import_summary(&outcome);
                i32::from(outcome.has_failures())
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                2
            }
        },
        Command::Validators => {
            print_validators(&run_validators());
            0
        }
    };
    std::process::exit(exit_code);
}
