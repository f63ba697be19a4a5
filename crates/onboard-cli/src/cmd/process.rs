use std::path::Path;

use anyhow::Context;
use onboard_core::dispatch::TOKEN_ENV;
use onboard_core::github::GithubClient;
use onboard_core::mannequin;
use onboard_core::Credential;

use crate::output;

pub fn run(file: &Path, api_url: &str, json: bool) -> anyhow::Result<()> {
    let credential =
        Credential::from_env(TOKEN_ENV).with_context(|| format!("{TOKEN_ENV} is not set"))?;
    let client = GithubClient::with_base_url(credential, api_url);

    let summary = mannequin::process_file(&client, file)
        .with_context(|| format!("failed to process '{}'", file.display()))?;

    if json {
        output::print_json(&summary)?;
    } else {
        println!(
            "processed {} mannequin(s), {} failed",
            summary.processed, summary.failed
        );
    }

    // The legacy script always exited 0 here; a non-zero exit on partial
    // failure lets the hosting environment's failure check actually fire.
    if summary.failed > 0 {
        anyhow::bail!("{} mannequin(s) failed to onboard", summary.failed);
    }
    Ok(())
}
