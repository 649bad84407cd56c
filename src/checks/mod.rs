//! Per-category risk checks.
//!
//! Each check takes the immutable [`RuleSet`](crate::rules::RuleSet) and the
//! arguments its category carries, and returns a verdict. None of them fail:
//! no matching rule means "not dangerous".

/// Sensitive-name and system-directory checks for file writes and edits.
pub mod file;
/// Version-control command check (force push, hard reset, ...).
pub mod git;
/// Payload and destination checks for network requests.
pub mod network;
/// Shell command table plus composite exfiltration detection.
pub mod shell;
