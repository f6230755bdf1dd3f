//! vcl-deploy - VCL and edge configuration deployment
//!
//! Command line entry point. Argument parsing and dispatch only; everything
//! else lives in the `vcl_deploy` library.

use clap::Parser;
use miette::Diagnostic;

use vcl_deploy::cli::{Cli, Commands};
use vcl_deploy::{DeployError, commands, ui};

fn main() {
    let cli = Cli::parse();
    ui::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Deploy(args) => commands::deploy::run(args, cli.verbose),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

fn report_error(e: &DeployError) {
    eprintln!("Error: {}", e);
    if let Some(related) = e.related() {
        for failure in related {
            eprintln!("  - {}", failure);
        }
    }
    if let Some(help) = e.help() {
        eprintln!("Help: {}", help);
    }
}
