use super::{CompositeRule, Pattern, RiskRule, RuleError, RuleSet, Signal};
use crate::eval::Severity::{self, Critical, Warning};

/// (regex, case-insensitive, severity, reason)
type RegexRow = (&'static str, bool, Severity, &'static str);

// Order matters: first match wins.
const SHELL: &[RegexRow] = &[
    (r"\brm\s+-rf", false, Critical, "recursive force deletion"),
    (r"\brm\s+-r\s+/", false, Critical, "recursive deletion from root"),
    (r"\bchmod\s+777", false, Warning, "overly permissive permissions"),
    (r"\bchmod\s+-R", false, Warning, "recursive permission change"),
    (r"\bmkfs\b", false, Critical, "filesystem formatting"),
    (r"\bdd\s+if=", false, Critical, "low-level disk operation"),
    (r"\b(shutdown|reboot)\b", false, Critical, "system power operation"),
    (r"\bkill\s+-9", false, Warning, "force-kill process"),
    (r"\bpkill\b", false, Warning, "kill process by name"),
    (r"\bsudo\b", false, Warning, "elevated privileges"),
    (
        r"\b(curl|wget)\b.*\|\s*(bash|sh)\b",
        false,
        Critical,
        "pipe remote content to shell",
    ),
    (r"\beval\b", false, Warning, "dynamic code evaluation"),
    (r"\bexec\b", false, Warning, "process replacement"),
];

const FILE_SENSITIVE: &[RegexRow] = &[
    (r"\.env$", false, Warning, "environment file"),
    (r"credentials", true, Warning, "credentials file"),
    (r"id_rsa", false, Warning, "SSH private key"),
    (r"\.ssh/", false, Warning, "SSH directory"),
    (r"/etc/", false, Warning, "system configuration file"),
    (r"\.pem$", false, Warning, "certificate or key file"),
    (r"\.key$", false, Warning, "key file"),
    (r"password", true, Warning, "password file"),
    (r"secret", true, Warning, "secret file"),
];

const FILE_SYSTEM_DIRS: &[RegexRow] = &[
    (r"^/etc/", false, Critical, "write to system directory"),
    (r"^/sys/", false, Critical, "write to system directory"),
    (r"^/proc/", false, Critical, "write to system directory"),
];

const GIT: &[RegexRow] = &[
    (r"\bpush\s+(--force|-f)", false, Critical, "force push to remote"),
    (
        r"\breset\s+--hard",
        false,
        Warning,
        "hard reset discards local changes",
    ),
    (r"\bclean\s+-fd", false, Warning, "force-clean untracked files"),
    (
        r"\bbranch\s+-D\s+(main|master)\b",
        false,
        Critical,
        "deleting default branch",
    ),
];

/// Hosts that may receive request payloads without a warning.
pub const NETWORK_ALLOWED_HOSTS: &[&str] = &["github.com", "gitlab.com", "npmjs.com", "pypi.org"];

pub const EXFILTRATION_REASON: &str =
    "potential data exfiltration via network request with file content";

fn table(rows: &[RegexRow]) -> Result<Vec<RiskRule>, RuleError> {
    rows.iter()
        .map(|&(pattern, ci, severity, reason)| {
            Ok(RiskRule::new(Pattern::regex(pattern, ci)?, severity, reason))
        })
        .collect()
}

fn exfiltration() -> Result<CompositeRule, RuleError> {
    Ok(CompositeRule {
        signals: vec![
            Signal {
                name: "network fetch",
                any_of: vec![Pattern::regex(r"\b(curl|wget)\b", false)?],
            },
            Signal {
                name: "data submission",
                // "POST" also covers "-X POST"
                any_of: vec![Pattern::literal("POST"), Pattern::literal("--data")],
            },
            Signal {
                name: "local content",
                any_of: vec![Pattern::regex(r"\bcat\b", false)?, Pattern::literal("<")],
            },
        ],
        severity: Critical,
        reason: EXFILTRATION_REASON.into(),
    })
}

/// Compile the built-in tables.
pub fn build() -> Result<RuleSet, RuleError> {
    Ok(RuleSet {
        shell: table(SHELL)?,
        shell_composite: vec![exfiltration()?],
        file_sensitive: table(FILE_SENSITIVE)?,
        file_system_dirs: table(FILE_SYSTEM_DIRS)?,
        git: table(GIT)?,
        network_allowed_hosts: NETWORK_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect(),
    })
}

impl RuleSet {
    /// The built-in tables.
    pub fn builtin() -> Self {
        build().expect("built-in rule tables must compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_compile() {
        let set = build().unwrap();
        assert_eq!(set.shell.len(), SHELL.len());
        assert_eq!(set.file_sensitive.len(), FILE_SENSITIVE.len());
        assert_eq!(set.file_system_dirs.len(), 3);
        assert_eq!(set.git.len(), 4);
        assert_eq!(set.shell_composite.len(), 1);
    }

    #[test]
    fn shell_table_order_preserved() {
        let set = RuleSet::builtin();
        assert_eq!(set.shell[0].reason, "recursive force deletion");
        assert_eq!(set.shell.last().unwrap().reason, "process replacement");
    }

    #[test]
    fn default_allowed_hosts() {
        let set = RuleSet::builtin();
        assert!(set.network_allowed_hosts.contains(&"pypi.org".to_string()));
        assert_eq!(set.network_allowed_hosts.len(), 4);
    }
}
