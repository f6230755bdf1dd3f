//! Delete-then-create reconciliation of one resource kind
//!
//! 1. List the remote resources of the kind on the draft version
//! 2. Delete every one the protect predicate does not cover, concurrently
//! 3. Once every delete has settled, create every desired resource, concurrently
//! 4. If anything failed, return one aggregate error listing each failure
//!
//! A failed delete does not stop sibling deletes or the create phase; the
//! aggregate is only raised once the kind has fully settled.

use futures::future::join_all;

use super::ResourceAdapter;
use crate::domain::{Resource, VersionNumber};
use crate::error::{DeployError, Result, deploy};
use crate::ui::Reporter;

/// What one reconciliation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub kind: String,
    /// Remote resources left in place by the protect predicate
    pub protected: Vec<String>,
    pub deleted: Vec<String>,
    pub created: Vec<String>,
}

/// Converge one resource kind of `version` to `desired`
///
/// Desired resources whose name is protected and still present remotely are
/// kept as they are rather than created a second time.
pub async fn reconcile(
    adapter: &dyn ResourceAdapter,
    version: VersionNumber,
    desired: &[Resource],
    protect: &(dyn Fn(&str) -> bool + Sync),
    reporter: &dyn Reporter,
) -> Result<ReconcileSummary> {
    let kind = adapter.kind();
    let label = kind.label();
    let mut summary = ReconcileSummary {
        kind: kind.to_string(),
        ..ReconcileSummary::default()
    };

    reporter.verbose(&format!("Now, delete all existing {kind}"));
    let current = adapter.list(version).await?;
    let (protected, removable): (Vec<Resource>, Vec<Resource>) =
        current.into_iter().partition(|r| protect(&r.name));

    for resource in &protected {
        reporter.verbose(&format!("Skipping protected {label} {}", resource.name));
    }
    summary.protected = protected.into_iter().map(|r| r.name).collect();

    let mut failures = Vec::new();

    let deletes = join_all(removable.iter().map(|resource| async move {
        let outcome = adapter.delete(version, &resource.name).await;
        (resource.name.as_str(), outcome)
    }))
    .await;
    for (name, outcome) in deletes {
        match outcome {
            Ok(()) => summary.deleted.push(name.to_string()),
            Err(e) => {
                reporter.warn(&format!("Failed to delete {label} {name}: {e}"));
                failures.push(e);
            }
        }
    }
    reporter.info(&format!("Deleted old {kind}"));

    if desired.is_empty() {
        return finish(summary, failures);
    }

    let to_create: Vec<&Resource> = desired
        .iter()
        .filter(|r| {
            let kept = summary.protected.contains(&r.name);
            if kept {
                reporter.verbose(&format!("Keeping protected {label} {}", r.name));
            }
            !kept
        })
        .collect();

    let label = label.as_str();
    let creates = join_all(to_create.into_iter().map(|resource| async move {
        reporter.verbose(&format!("upload {label} {}", resource.name));
        let outcome = adapter.create(version, resource).await;
        if outcome.is_ok() {
            reporter.verbose(&format!("✓ {} {} uploaded", capitalize(label), resource.name));
        }
        (resource.name.as_str(), outcome)
    }))
    .await;
    for (name, outcome) in creates {
        match outcome {
            Ok(()) => summary.created.push(name.to_string()),
            Err(e) => {
                reporter.warn(&format!("Failed to upload {label} {name}: {e}"));
                failures.push(e);
            }
        }
    }
    reporter.info(&format!("Uploaded new {kind}"));

    finish(summary, failures)
}

fn finish(summary: ReconcileSummary, failures: Vec<DeployError>) -> Result<ReconcileSummary> {
    if failures.is_empty() {
        Ok(summary)
    } else {
        Err(deploy::reconcile_failed(summary.kind, failures))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
