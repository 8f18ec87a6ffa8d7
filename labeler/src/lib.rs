//! Issue label policy auditor
//!
//! Finds open GitHub issues lacking a label under a required namespace
//! (for example `type/`) and remediates them by commenting, optionally
//! applying a default label first.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use issue_labeler::{remediator, tracker::RecordingTracker, PolicyConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let tracker = RecordingTracker::new(issues);
//! let report = remediator::run(&CancellationToken::new(), &tracker, &config).await?;
//! ```
//!
//! # Requirements
//! - `gh` CLI installed and authenticated (`gh auth login`) for [`tracker::GhTracker`]

pub mod classifier;
pub mod cli;
pub mod config;
pub mod gh;
pub mod logging;
pub mod remediator;
pub mod tracker;
pub mod types;

pub use config::{PolicyConfig, Settings};
pub use remediator::{RemediationError, RunReport};
pub use tracker::IssueTracker;
pub use types::Issue;
