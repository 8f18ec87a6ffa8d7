//! Issue labeler
//!
//! Audits the open issues of one repository against a label-prefix policy
//! and remediates violations through the GitHub CLI.
//!
//! # Requirements
//!
//! - GitHub CLI (`gh`) must be installed and in PATH
//! - `gh` must be authenticated (`gh auth login`)
//!
//! # Usage
//!
//! ```bash
//! issue-labeler --repo acme/widgets --label-prefix type
//! issue-labeler --repo acme/widgets --label-prefix type --add-label --default-label type/unknown
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use issue_labeler::cli::Cli;
use issue_labeler::config::{FileConfig, Settings};
use issue_labeler::gh::GhExecutor;
use issue_labeler::logging::init_tracing;
use issue_labeler::remediator;
use issue_labeler::tracker::GhTracker;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let file = match &cli.config {
        Some(path) => Some(FileConfig::load_from_path(path)?),
        None => FileConfig::load()?,
    };
    let settings = Settings::resolve(cli.overrides(), file).context("invalid configuration")?;

    tracing::info!(
        repo = %settings.policy.repo_slug(),
        prefix = %settings.policy.required_prefix(),
        add_label = settings.policy.add_label,
        "starting label audit"
    );

    let gh = GhExecutor::new(settings.gh_host.clone());
    if let Err(e) = gh.check_available().await {
        // Continue anyway - the first tracker call reports the real failure
        tracing::warn!("gh CLI check failed: {}", e);
    }
    let tracker = GhTracker::new(gh);

    let ctx = CancellationToken::new();
    spawn_cancellation(ctx.clone(), cli.timeout());

    let report = remediator::run(&ctx, &tracker, &settings.policy).await?;

    tracing::info!(
        inspected = report.inspected,
        flagged = report.flagged.len(),
        labeled = report.labeled.len(),
        commented = report.commented.len(),
        "label audit complete"
    );
    Ok(())
}

/// Cancel `ctx` on Ctrl+C or when the optional timeout elapses
fn spawn_cancellation(ctx: CancellationToken, timeout: Option<std::time::Duration>) {
    tokio::spawn(async move {
        let deadline = async {
            match timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::warn!("interrupted, cancelling run"),
            _ = deadline => tracing::warn!("timeout reached, cancelling run"),
            _ = ctx.cancelled() => return,
        }
        ctx.cancel();
    });
}
