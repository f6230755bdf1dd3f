use clap::Parser;
use std::path::PathBuf;

/// Arguments for deploy command
///
/// Every option can also be set in the configuration file; flags win.
#[derive(Parser, Debug, Clone, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Deploy ./vcl and ask before activating:\n    vcl-deploy deploy ./vcl --service SERVICE_ID\n\n\
                  Read the service id from an environment variable:\n    vcl-deploy deploy ./vcl --service MY_SERVICE_ENV_VAR --env\n\n\
                  Reconcile resources but keep two conditions:\n    vcl-deploy deploy ./vcl -s ID --backends backends.json --skip-conditions geo,bot\n\n\
                  Protect logging sinks by name:\n    vcl-deploy deploy ./vcl -s ID --backends b.json --skip logging.syslog=audit")]
pub struct DeployArgs {
    /// Folders containing the .vcl files to upload
    #[arg(value_name = "FOLDERS")]
    pub folders: Vec<PathBuf>,

    /// Service id, or the name of an environment variable holding it
    #[arg(long, short = 's', env = "FASTLY_SERVICE_ID")]
    pub service: Option<String>,

    /// Entry point vcl file [default: main.vcl]
    #[arg(long, short = 'm')]
    pub main: Option<String>,

    /// Variables to substitute as ${NAME} in vcl files
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub vars: Vec<String>,

    /// Desired-state bundle (JSON or YAML) with backends, conditions, headers, ...
    #[arg(long, short = 'b', value_name = "FILE")]
    pub backends: Option<PathBuf>,

    /// API keys, tried in order when a key hits the rate limit
    #[arg(long = "api-keys", short = 'k', value_delimiter = ',', value_name = "KEYS")]
    pub api_keys: Vec<String>,

    /// Conditions that are never deleted (replaces the configuration file's list)
    #[arg(long = "skip-conditions", value_delimiter = ',', value_name = "NAMES")]
    pub skip_conditions: Vec<String>,

    /// Resources that are never deleted, as KIND=NAME (e.g. backends=origin)
    #[arg(long, value_name = "KIND=NAME")]
    pub skip: Vec<String>,

    /// vcl files whose name contains any of these are never deleted
    #[arg(long, short = 'p', value_delimiter = ',', value_name = "SUBSTRINGS")]
    pub protected: Vec<String>,

    /// Activate the new version without asking once validation passes
    #[arg(long, conflicts_with = "no_activate")]
    pub auto_activate: bool,

    /// Leave the new version inactive without asking
    #[arg(long)]
    pub no_activate: bool,

    /// Load a .env file from the working directory first
    #[arg(long)]
    pub env: bool,

    /// API endpoint [default: https://api.fastly.com]
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Do not print progress
    #[arg(long)]
    pub disable_logs: bool,

    /// Configuration file [default: vcl-deploy.yaml if present]
    #[arg(long, short = 'c', env = "VCL_DEPLOY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: DeployArgs,
    }

    fn parse(args: &[&str]) -> DeployArgs {
        let mut argv = vec!["deploy"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_deploy_args_lists_are_comma_separated() {
        let args = parse(&[
            "./vcl",
            "./shared",
            "--vars",
            "HOST,SERVICEID",
            "--api-keys",
            "k1,k2",
            "--skip-conditions",
            "geo,bot",
            "--protected",
            "shared_",
        ]);
        assert_eq!(args.folders.len(), 2);
        assert_eq!(args.vars, vec!["HOST", "SERVICEID"]);
        assert_eq!(args.api_keys, vec!["k1", "k2"]);
        assert_eq!(args.skip_conditions, vec!["geo", "bot"]);
        assert_eq!(args.protected, vec!["shared_"]);
    }

    #[test]
    fn test_deploy_args_skip_repeats() {
        let args = parse(&[
            "./vcl",
            "--skip",
            "backends=origin",
            "--skip",
            "logging.syslog=audit",
        ]);
        assert_eq!(args.skip, vec!["backends=origin", "logging.syslog=audit"]);
    }

    #[test]
    fn test_deploy_args_activation_flags_conflict() {
        let argv = ["deploy", "./vcl", "--auto-activate", "--no-activate"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_deploy_args_defaults() {
        let args = parse(&["./vcl"]);
        assert!(args.service.is_none());
        assert!(args.main.is_none());
        assert!(!args.auto_activate);
        assert!(!args.env);
    }
}
