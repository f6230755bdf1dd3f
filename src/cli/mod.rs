//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - deploy: Deploy command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod deploy;

pub use completions::CompletionsArgs;
pub use deploy::DeployArgs;

/// vcl-deploy - VCL and edge configuration deployment
///
/// Clone the active version of a service, replace its configuration with a local
/// bundle, validate it and activate it.
#[derive(Parser, Debug)]
#[command(
    name = "vcl-deploy",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Deploy VCL and edge configuration to a versioned CDN service",
    long_about = "vcl-deploy clones the active version of a service, replaces its vcl files and \
                  declared resources (backends, conditions, headers, logging, ...) with a local \
                  bundle, validates the result and activates it.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  vcl-deploy deploy ./vcl --service SERVICE_ID            \x1b[90m# Deploy and ask before activating\x1b[0m\n   \
                  vcl-deploy deploy ./vcl -s SERVICE_ID --auto-activate   \x1b[90m# Activate once validation passes\x1b[0m\n   \
                  vcl-deploy deploy ./vcl -s ID --backends backends.json  \x1b[90m# Also reconcile resources\x1b[0m\n   \
                  vcl-deploy deploy ./vcl -s ID --vars HOST,SERVICEID     \x1b[90m# Substitute ${HOST} and ${SERVICEID}\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a vcl bundle to a service
    Deploy(DeployArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
