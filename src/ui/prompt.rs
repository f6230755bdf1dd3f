//! Interactive activation prompt

use inquire::Confirm;

use crate::domain::{ServiceSummary, VersionNumber};
use crate::error::{DeployError, Result};

/// Ask the operator whether a validated version should go live
pub fn confirm_activation(service: &ServiceSummary, version: VersionNumber) -> Result<bool> {
    println!();
    println!(
        "Version {version} of {} passed validation and is ready to activate.",
        display_name(service)
    );

    Confirm::new(&format!("Activate version {version} now?"))
        .with_default(false)
        .with_help_message("Answer 'n' to leave the draft inactive for later activation")
        .prompt()
        .map_err(|e| DeployError::PromptFailed {
            message: e.to_string(),
        })
}

fn display_name(service: &ServiceSummary) -> String {
    if service.name.is_empty() {
        service.id.clone()
    } else {
        format!("{} ({})", service.name, service.id)
    }
}
