//! Run configuration for vcl-deploy
//!
//! This module contains:
//! - `vcl-deploy.yaml` - optional configuration file ([`file`])
//! - [`DeployConfig`] - the fully resolved settings of one deployment ([`deploy`])
//!
//! Values are layered: configuration file, then environment, then command-line
//! flags. The deployment core only ever sees a resolved [`DeployConfig`] and an
//! explicit variable map; it never reads the process environment itself.

pub mod deploy;
pub mod file;

pub use deploy::{ActivationMode, DeployConfig};
pub use file::{CONFIG_FILE, ConfigFile, load_config_file, locate_config_file};

/// Environment variable holding the primary API key
pub const API_KEY_ENV: &str = "FASTLY_APIKEY";

/// Environment variable holding the service id
pub const SERVICE_ID_ENV: &str = "FASTLY_SERVICE_ID";

/// Variable that receives the resolved service id when listed in `vars`
pub const SERVICE_ID_VAR: &str = "SERVICEID";

/// Entry point used when none is configured
pub const DEFAULT_MAIN: &str = "main.vcl";
