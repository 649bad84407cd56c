use serde::{Deserialize, Serialize};

use super::{RiskVerdict, Severity};

/// Operator-chosen mapping from verdicts to auto-allow vs. approval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    #[default]
    AlwaysAsk,
    WarnOnly,
    BlockCritical,
    Disabled,
}

impl ApprovalPolicy {
    pub const ALL: [ApprovalPolicy; 4] = [
        ApprovalPolicy::AlwaysAsk,
        ApprovalPolicy::WarnOnly,
        ApprovalPolicy::BlockCritical,
        ApprovalPolicy::Disabled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalPolicy::AlwaysAsk => "always_ask",
            ApprovalPolicy::WarnOnly => "warn_only",
            ApprovalPolicy::BlockCritical => "block_critical",
            ApprovalPolicy::Disabled => "disabled",
        }
    }

    /// Match one of the four known literals. Unknown names are the caller's problem.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

/// Decide whether an action may run without approval.
///
/// Returns `true` to auto-execute, `false` when approval is required.
pub fn decide(policy: ApprovalPolicy, verdict: &RiskVerdict) -> bool {
    if policy == ApprovalPolicy::Disabled {
        return true;
    }
    if !verdict.dangerous {
        return true;
    }
    match policy {
        ApprovalPolicy::WarnOnly => true,
        ApprovalPolicy::BlockCritical => verdict.severity == Severity::Warning,
        ApprovalPolicy::AlwaysAsk | ApprovalPolicy::Disabled => false,
    }
}
