//! Desired-state bundle files

use std::path::Path;

use crate::domain::DesiredState;
use crate::error::{Result, config, fs};

/// Parse a desired-state bundle
///
/// `.json` files are read as JSON, everything else as YAML. The parsed bundle
/// is validated before it is returned.
pub fn load_desired_state(path: &Path) -> Result<DesiredState> {
    let display = path.display().to_string();
    if !path.is_file() {
        return Err(config::bundle_not_found(display));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| fs::read_failed(&display, e.to_string()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let desired: DesiredState = if is_json {
        serde_json::from_str(&content).map_err(|e| config::bundle_parse_failed(&display, e.to_string()))?
    } else {
        serde_yaml::from_str(&content).map_err(|e| config::bundle_parse_failed(&display, e.to_string()))?
    };

    desired.validate()?;
    Ok(desired)
}
