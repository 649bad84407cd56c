//! agent-riskgate: risk classification and approval-policy gate for agent tool calls.
//!
//! Before an agent runs a shell command, writes or edits a file, performs a
//! version-control operation, or sends a network request, the gate classifies
//! the call as safe or dangerous (with a [`Severity`]) and, given an
//! [`ApprovalPolicy`], decides whether it may run without confirmation.
//!
//! The gate is fail-open: it only restricts actions it recognizes as risky.
//! Unknown tools and missing arguments classify as not dangerous. It is not a
//! sandbox.
//!
//! # Architecture
//!
//! - **[`action`]** — Tool-name resolution and per-category argument extraction.
//! - **[`rules`]** — Pattern matchers, ordered rule tables, composite rules.
//! - **[`checks`]** — Per-category evaluation over a rule set.
//! - **[`eval`]** — Verdicts, the [`Classifier`], approval policies and [`decide`].
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`hook`]** — PreToolUse hook request/response types.
//! - **[`logging`]** — stderr logger setup.

/// Action descriptors and tool-name resolution.
pub mod action;
/// Per-category risk checks.
pub mod checks;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Classifier, verdict types, and the policy gate.
pub mod eval;
/// Hook protocol types.
pub mod hook;
/// Logger initialization.
pub mod logging;
/// Rule tables and matchers.
pub mod rules;

use std::sync::LazyLock;

pub use action::{ActionDescriptor, ToolCategory};
pub use eval::{ApprovalPolicy, Classifier, RiskVerdict, Severity, decide};

static BUILTIN: LazyLock<Classifier> = LazyLock::new(Classifier::builtin);

/// Classify a tool call against the built-in rule tables.
///
/// This is the main entry point for tests and simple usage. To include
/// configured extra rules, build a [`Classifier`] from [`config::Config`].
pub fn classify(tool_name: &str, args: &serde_json::Value) -> RiskVerdict {
    BUILTIN.classify_tool(tool_name, args)
}

/// Classify a tool call and apply `policy`. Returns `true` when it may run
/// without approval.
pub fn evaluate(tool_name: &str, args: &serde_json::Value, policy: ApprovalPolicy) -> bool {
    decide(policy, &classify(tool_name, args))
}
