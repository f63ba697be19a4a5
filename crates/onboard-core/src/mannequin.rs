//! The bulk onboarding step: read mannequin rows from a CSV and add each
//! account to its target org or repository.
//!
//! A bad row is logged and skipped; processing continues. Only file-level
//! problems (missing file, wrong header) abort the whole run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OnboardError, Result};
use crate::github::GithubClient;

pub const EXPECTED_HEADER: [&str; 4] = ["mannequin_username", "mannequin_id", "role", "target"];

#[derive(Debug, Clone, Deserialize)]
pub struct MannequinRow {
    pub mannequin_username: String,
    /// Username or email of the account to onboard.
    pub mannequin_id: String,
    pub role: String,
    /// An org name, or `owner/repo` for a repository.
    pub target: String,
}

/// Map a mannequin role onto a GitHub role/permission. Unrecognized roles
/// fall back to read access.
pub fn github_role(role: &str) -> &'static str {
    match role {
        "Admin" => "admin",
        "Member" => "member",
        "Owner" => "owner",
        "Read" => "pull",
        "Write" => "push",
        "Contributor" => "pull",
        _ => "pull",
    }
}

fn is_known_role(role: &str) -> bool {
    matches!(
        role,
        "Admin" | "Member" | "Owner" | "Read" | "Write" | "Contributor"
    )
}

fn validate_row(row: &MannequinRow) -> Result<()> {
    if row.mannequin_id.is_empty() || row.target.is_empty() || row.role.is_empty() {
        return Err(OnboardError::InvalidRow(
            "identifier, target, and role must be provided".to_string(),
        ));
    }
    if !is_known_role(&row.role) {
        return Err(OnboardError::InvalidRow(format!(
            "unknown role '{}'",
            row.role
        )));
    }
    Ok(())
}

/// Check the CSV header before touching any row.
fn validate_header(path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?;
    let got: Vec<&str> = headers.iter().collect();
    if got != EXPECTED_HEADER {
        return Err(OnboardError::CsvHeader {
            expected: EXPECTED_HEADER.join(","),
            got: got.join(","),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ProcessSummary {
    pub processed: u32,
    pub failed: u32,
}

/// Process every row in the file. Returns how many rows succeeded and how
/// many failed; fails outright only on file-level errors.
pub fn process_file(client: &GithubClient, path: &Path) -> Result<ProcessSummary> {
    if !path.exists() {
        return Err(OnboardError::FileNotFound(path.display().to_string()));
    }
    validate_header(path)?;

    let mut reader = csv::Reader::from_path(path)?;
    let mut summary = ProcessSummary::default();
    for record in reader.deserialize::<MannequinRow>() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(error = %e, "unreadable row; skipping");
                summary.failed += 1;
                continue;
            }
        };
        match process_row(client, &row) {
            Ok(()) => {
                tracing::info!(
                    mannequin = %row.mannequin_username,
                    to = %row.target,
                    role = %row.role,
                    "onboarded"
                );
                summary.processed += 1;
            }
            Err(e) => {
                tracing::error!(
                    mannequin = %row.mannequin_username,
                    to = %row.target,
                    error = %e,
                    "failed to onboard"
                );
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn process_row(client: &GithubClient, row: &MannequinRow) -> Result<()> {
    validate_row(row)?;
    let role = github_role(&row.role);
    if row.target.contains('/') {
        client.add_repo_collaborator(&row.target, &row.mannequin_id, role)
    } else {
        let user_id = client.user_id(&row.mannequin_id)?;
        client.invite_to_org(&row.target, user_id, role)
    }
}
