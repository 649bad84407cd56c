use serde::{Deserialize, Serialize};

/// Risk tier of a dangerous action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// Result of classifying one action.
///
/// `severity` is always set; it stays at [`Severity::Warning`] for safe actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskVerdict {
    pub dangerous: bool,
    pub reason: String,
    pub severity: Severity,
}

impl RiskVerdict {
    pub fn safe() -> Self {
        Self::default()
    }

    pub fn dangerous(severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            dangerous: true,
            reason: reason.into(),
            severity,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.dangerous && self.severity == Severity::Critical
    }
}
