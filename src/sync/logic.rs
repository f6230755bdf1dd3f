//! Routing logic files and the entry point

use futures::future::join_all;

use super::ProtectRules;
use crate::api::ServiceApi;
use crate::domain::{LogicFile, VersionNumber, entry_point_name};
use crate::error::{Result, deploy};
use crate::ui::Reporter;

const LOGIC_KIND: &str = "vcl";

/// What logic file synchronisation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicSummary {
    pub protected: Vec<String>,
    pub deleted: Vec<String>,
    pub uploaded: Vec<String>,
}

/// Replace the unprotected logic files of `version` with `files`
pub async fn sync_logic_files(
    api: &ServiceApi,
    version: VersionNumber,
    files: &[LogicFile],
    rules: &ProtectRules,
    reporter: &dyn Reporter,
) -> Result<LogicSummary> {
    let mut summary = LogicSummary::default();
    let mut failures = Vec::new();

    let current = api.list_logic_files(version).await?;
    let (protected, removable): (Vec<_>, Vec<_>) = current
        .into_iter()
        .partition(|file| rules.is_logic_protected(&file.name));

    for file in &protected {
        reporter.verbose(&format!(
            "Skipping protected file \"{}\" for version {version}",
            file.name
        ));
    }
    summary.protected = protected.into_iter().map(|f| f.name).collect();

    let deletes = join_all(removable.iter().map(|file| async move {
        reporter.verbose(&format!("Deleting \"{}\" for version {version}", file.name));
        (file.name.as_str(), api.delete_logic_file(version, &file.name).await)
    }))
    .await;
    for (name, outcome) in deletes {
        match outcome {
            Ok(()) => summary.deleted.push(name.to_string()),
            Err(e) => {
                reporter.warn(&format!("Failed to delete vcl {name}: {e}"));
                failures.push(e);
            }
        }
    }
    reporter.info("Deleted old vcl");

    reporter.info("Uploading new VCL");
    let to_upload: Vec<&LogicFile> = files
        .iter()
        .filter(|file| {
            let kept = summary.protected.contains(&file.name);
            if kept {
                reporter.warn(&format!(
                    "Not uploading {} because a protected file with that name is in place",
                    file.name
                ));
            }
            !kept
        })
        .collect();
    let uploads = join_all(to_upload.into_iter().map(|file| async move {
        reporter.verbose(&format!(
            "Uploading new VCL {} with version {version}",
            file.name
        ));
        (file.name.as_str(), api.create_logic_file(version, file).await)
    }))
    .await;
    for (name, outcome) in uploads {
        match outcome {
            Ok(()) => summary.uploaded.push(name.to_string()),
            Err(e) => {
                reporter.warn(&format!("Failed to upload vcl {name}: {e}"));
                failures.push(e);
            }
        }
    }

    if failures.is_empty() {
        Ok(summary)
    } else {
        Err(deploy::reconcile_failed(LOGIC_KIND, failures))
    }
}

/// Flag `main` as the entry point of `version`
///
/// `main` may be given with or without its `.vcl` extension and must be one of
/// the `uploaded` files. Returns the name the entry point was set to.
pub async fn assign_entry_point(
    api: &ServiceApi,
    version: VersionNumber,
    main: &str,
    uploaded: &[String],
    reporter: &dyn Reporter,
) -> Result<String> {
    let name = entry_point_name(main);
    reporter.verbose(&format!("Try to set \"{main}\" as the main entry point"));
    if !uploaded.iter().any(|uploaded| uploaded == name) {
        return Err(deploy::entry_point_not_found(name, uploaded));
    }
    api.set_main_logic_file(version, name).await?;
    reporter.info(&format!("\"{main}\" set as the main entry point"));
    Ok(name.to_string())
}
