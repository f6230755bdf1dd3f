//! Deploy command
//!
//! Resolves the run configuration, wires the HTTP transport, credential pool,
//! bundle loader and reporter together, and runs the deploy operation on a
//! tokio runtime.

use std::collections::HashMap;
use std::sync::Arc;

use console::Term;

use crate::api::{ApiClient, CredentialPool, HttpTransport, ServiceApi};
use crate::cli::DeployArgs;
use crate::config::{
    ActivationMode, ConfigFile, DeployConfig, load_config_file, locate_config_file,
};
use crate::error::{Result, config, fs};
use crate::loader::FsBundleLoader;
use crate::operations::deploy::{
    ActivationDecision, AutoActivate, DeclineActivation, DeployOperation, DeployOptions,
    PromptActivation,
};
use crate::ui::{ConsoleReporter, Reporter};

/// Run deploy command
pub fn run(args: DeployArgs, verbose: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file = match locate_config_file(args.config.as_deref(), &cwd)? {
        Some(path) => load_config_file(&path)?,
        None => ConfigFile::default(),
    };

    if args.env || file.env {
        load_dotenv()?;
    }

    let env = environment_snapshot();
    let config = DeployConfig::resolve(file, &args, verbose, &env)?;
    let loader = FsBundleLoader {
        folders: config.folders.clone(),
        vars: config.vars.clone(),
        values: config.variable_values(&env),
        desired_state: config.desired_state.clone(),
    };
    let reporter: Arc<dyn Reporter> =
        Arc::new(ConsoleReporter::new(config.verbose, config.disable_logs));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| fs::io_error(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(deploy(config, loader, reporter))
}

async fn deploy(
    config: DeployConfig,
    loader: FsBundleLoader,
    reporter: Arc<dyn Reporter>,
) -> Result<()> {
    let transport = Arc::new(HttpTransport::new(&config.endpoint)?);
    let client = ApiClient::new(
        transport,
        CredentialPool::from_keys(&config.api_keys),
        Arc::clone(&reporter),
    );
    let api = ServiceApi::new(Arc::new(client), &config.service_id);
    let decision = activation_decision(config.activation, reporter.as_ref());

    let mut operation = DeployOperation::new(
        api,
        Arc::new(loader),
        decision,
        Arc::clone(&reporter),
        DeployOptions::from(&config),
    );
    let report = operation.execute().await?;

    if report.activated {
        reporter.success("Your VCL has been deployed.");
    } else {
        reporter.info(&format!(
            "Version {} of {} passed validation and was left inactive",
            report.version, report.service.id
        ));
    }
    Ok(())
}

/// Prompting needs a terminal; without one the draft is left inactive
fn activation_decision(
    mode: ActivationMode,
    reporter: &dyn Reporter,
) -> Arc<dyn ActivationDecision> {
    match mode {
        ActivationMode::Auto => Arc::new(AutoActivate),
        ActivationMode::Decline => Arc::new(DeclineActivation),
        ActivationMode::Prompt if Term::stdout().is_term() => Arc::new(PromptActivation),
        ActivationMode::Prompt => {
            reporter.warn("Not running in a terminal; pass --auto-activate to activate");
            Arc::new(DeclineActivation)
        }
    }
}

fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded environment file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(config::invalid(format!("Failed to load .env: {e}"))),
    }
}

/// Process environment as a map, skipping entries that are not valid UTF-8
fn environment_snapshot() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}
