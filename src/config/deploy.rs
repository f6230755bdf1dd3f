//! Resolved deployment configuration

use std::collections::HashMap;
use std::path::PathBuf;

use super::{API_KEY_ENV, ConfigFile, DEFAULT_MAIN, SERVICE_ID_ENV, SERVICE_ID_VAR};
use crate::api::transport::DEFAULT_ENDPOINT;
use crate::cli::DeployArgs;
use crate::domain::ResourceKind;
use crate::error::{Result, config};
use crate::sync::ProtectRules;

/// What happens once the new version passes validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationMode {
    Auto,
    #[default]
    Prompt,
    Decline,
}

impl ActivationMode {
    pub fn is_auto(self) -> bool {
        self == Self::Auto
    }
}

/// Fully resolved settings of one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    pub service_id: String,
    pub folders: Vec<PathBuf>,
    pub main: String,
    pub vars: Vec<String>,
    pub desired_state: Option<PathBuf>,
    pub api_keys: Vec<String>,
    pub rules: ProtectRules,
    pub activation: ActivationMode,
    pub endpoint: String,
    pub verbose: bool,
    pub disable_logs: bool,
}

impl DeployConfig {
    /// Layer flags over the configuration file, falling back to `env`
    pub fn resolve(
        file: ConfigFile,
        args: &DeployArgs,
        verbose: bool,
        env: &HashMap<String, String>,
    ) -> Result<Self> {
        let service_id = resolve_service(args, &file, env)?;

        let folders = prefer(args.folders.clone(), file.folders);
        if folders.is_empty() {
            return Err(config::missing_folders());
        }

        let main = args
            .main
            .clone()
            .or(file.main)
            .unwrap_or_else(|| DEFAULT_MAIN.to_string());

        let api_keys = resolve_api_keys(prefer(args.api_keys.clone(), file.api_keys), env);
        if api_keys.is_empty() {
            return Err(config::missing_api_keys(API_KEY_ENV));
        }

        let mut rules = ProtectRules::new();
        for name in prefer(args.skip_conditions.clone(), file.skip_conditions) {
            rules.add_skip(ResourceKind::Condition, name.trim());
        }
        if args.skip.is_empty() {
            for (key, names) in &file.skip {
                let kind = parse_kind(key)?;
                for name in names {
                    rules.add_skip(kind.clone(), name.trim());
                }
            }
        } else {
            for entry in &args.skip {
                let (kind, name) = parse_skip(entry)?;
                rules.add_skip(kind, name);
            }
        }
        for substring in prefer(args.protected.clone(), file.protected) {
            rules.add_logic_substring(substring.trim());
        }

        let activation = if args.auto_activate {
            ActivationMode::Auto
        } else if args.no_activate {
            ActivationMode::Decline
        } else {
            match (file.auto_activate, file.no_activate) {
                (true, true) => {
                    return Err(config::invalid(
                        "auto_activate and no_activate cannot both be set",
                    ));
                }
                (true, false) => ActivationMode::Auto,
                (false, true) => ActivationMode::Decline,
                (false, false) => ActivationMode::Prompt,
            }
        };

        Ok(Self {
            service_id,
            folders,
            main,
            vars: prefer(args.vars.clone(), file.vars),
            desired_state: args.backends.clone().or(file.backends),
            api_keys,
            rules,
            activation,
            endpoint: args
                .endpoint
                .clone()
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            verbose: verbose || file.verbose,
            disable_logs: args.disable_logs || file.disable_logs,
        })
    }

    /// Values available to `${NAME}` substitution
    ///
    /// `SERVICEID`, when listed in `vars`, is the resolved service id.
    pub fn variable_values(&self, env: &HashMap<String, String>) -> HashMap<String, String> {
        let mut values = env.clone();
        if self.vars.iter().any(|v| v.trim() == SERVICE_ID_VAR) {
            values.insert(SERVICE_ID_VAR.to_string(), self.service_id.clone());
        }
        values
    }
}

/// Flags replace list values from the file instead of extending them
///
/// This holds for the protection lists too: `--skip` replaces the whole `skip`
/// map of the file.
fn prefer<T>(flags: Vec<T>, file: Vec<T>) -> Vec<T> {
    if flags.is_empty() { file } else { flags }
}

/// The service option is either an id or the name of a variable holding one
///
/// `--service` (or its `FASTLY_SERVICE_ID` fallback) wins over the file.
fn resolve_service(
    args: &DeployArgs,
    file: &ConfigFile,
    env: &HashMap<String, String>,
) -> Result<String> {
    let raw = args
        .service
        .clone()
        .or_else(|| env.get(SERVICE_ID_ENV).cloned())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| file.service.clone())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| config::missing_service(SERVICE_ID_ENV))?;

    Ok(env
        .get(&raw)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map_or(raw, str::to_string))
}

fn resolve_api_keys(configured: Vec<String>, env: &HashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let from_env = env.get(API_KEY_ENV).cloned().into_iter();
    for key in from_env.chain(configured) {
        let key = key.trim().to_string();
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

fn parse_kind(key: &str) -> Result<ResourceKind> {
    ResourceKind::from_bundle_key(key)
        .ok_or_else(|| config::unknown_kind(key))
}

fn parse_skip(entry: &str) -> Result<(ResourceKind, String)> {
    let (kind, name) = entry
        .split_once('=')
        .ok_or_else(|| config::invalid_skip(entry, "expected KIND=NAME"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(config::invalid_skip(entry, "name is empty"));
    }
    Ok((parse_kind(kind)?, name.to_string()))
}
