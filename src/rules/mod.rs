//! Rule tables: pattern matchers, single-signal rules, composite rules, and
//! the immutable [`RuleSet`] the classifier evaluates against.

/// Built-in rule tables.
pub mod builtin;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::Severity;

/// Errors raised while building a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid regex `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("empty pattern for rule `{reason}`")]
    EmptyPattern { reason: String },
}

/// A single matcher: literal substring or compiled regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    /// Compile a regular expression, rejecting it here rather than at match time.
    pub fn regex(pattern: &str, case_insensitive: bool) -> Result<Self, RuleError> {
        RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map(Pattern::Regex)
            .map_err(|source| RuleError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Pattern::Literal(needle) => haystack.contains(needle.as_str()),
            Pattern::Regex(re) => re.is_match(haystack),
        }
    }
}

/// One entry of an ordered, first-match-wins rule list.
#[derive(Debug, Clone)]
pub struct RiskRule {
    pub pattern: Pattern,
    pub severity: Severity,
    pub reason: String,
}

impl RiskRule {
    pub fn new(pattern: Pattern, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            pattern,
            severity,
            reason: reason.into(),
        }
    }

    /// Build a rule from its declarative form.
    pub fn from_def(def: &RuleDef) -> Result<Self, RuleError> {
        if def.pattern.is_empty() {
            return Err(RuleError::EmptyPattern {
                reason: def.reason.clone(),
            });
        }
        let pattern = if def.regex {
            Pattern::regex(&def.pattern, def.case_insensitive)?
        } else if def.case_insensitive {
            Pattern::regex(&regex::escape(&def.pattern), true)?
        } else {
            Pattern::literal(def.pattern.clone())
        };
        Ok(Self::new(pattern, def.severity, def.reason.clone()))
    }
}

/// Declarative rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleDef {
    pub pattern: String,
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub case_insensitive: bool,
    pub severity: Severity,
    pub reason: String,
}

/// Return the first rule in `rules` whose pattern matches `haystack`.
pub fn first_match<'r>(rules: &'r [RiskRule], haystack: &str) -> Option<&'r RiskRule> {
    rules.iter().find(|rule| rule.pattern.is_match(haystack))
}

/// A group of alternative patterns; the group matches if any member does.
#[derive(Debug, Clone)]
pub struct Signal {
    pub name: &'static str,
    pub any_of: Vec<Pattern>,
}

impl Signal {
    pub fn is_present(&self, haystack: &str) -> bool {
        self.any_of.iter().any(|p| p.is_match(haystack))
    }
}

/// Multi-signal rule: fires only when every signal is present.
#[derive(Debug, Clone)]
pub struct CompositeRule {
    pub signals: Vec<Signal>,
    pub severity: Severity,
    pub reason: String,
}

impl CompositeRule {
    pub fn is_match(&self, haystack: &str) -> bool {
        !self.signals.is_empty() && self.signals.iter().all(|s| s.is_present(haystack))
    }

    /// Signal names joined for log lines, e.g. `network fetch + data submission`.
    pub fn signal_names(&self) -> String {
        self.signals.iter().map(|s| s.name).collect::<Vec<_>>().join(" + ")
    }
}

/// Immutable set of per-category rule tables.
///
/// Built once (see [`RuleSet::builtin`] and [`RuleSet::with_extra`]) and then
/// only read. Extending it produces a new value.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub shell: Vec<RiskRule>,
    pub shell_composite: Vec<CompositeRule>,
    pub file_sensitive: Vec<RiskRule>,
    pub file_system_dirs: Vec<RiskRule>,
    pub git: Vec<RiskRule>,
    pub network_allowed_hosts: Vec<String>,
}

/// Extra rules and host list layered on top of the built-in tables.
#[derive(Debug, Clone, Default)]
pub struct RuleExtensions<'a> {
    pub shell: &'a [RuleDef],
    pub file: &'a [RuleDef],
    pub git: &'a [RuleDef],
    pub allowed_hosts: Option<&'a [String]>,
}

impl RuleSet {
    /// Build a new set from the built-ins plus `ext`.
    ///
    /// Extra rules are appended, so built-in rules keep precedence.
    pub fn with_extra(ext: &RuleExtensions<'_>) -> Result<Self, RuleError> {
        let mut set = builtin::build()?;
        set.shell.extend(compile(ext.shell)?);
        set.file_sensitive.extend(compile(ext.file)?);
        set.git.extend(compile(ext.git)?);
        if let Some(hosts) = ext.allowed_hosts {
            set.network_allowed_hosts = hosts.to_vec();
        }
        Ok(set)
    }
}

fn compile(defs: &[RuleDef]) -> Result<Vec<RiskRule>, RuleError> {
    defs.iter().map(RiskRule::from_def).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(pattern: &str, regex: bool) -> RuleDef {
        RuleDef {
            pattern: pattern.into(),
            regex,
            case_insensitive: false,
            severity: Severity::Warning,
            reason: "test rule".into(),
        }
    }

    #[test]
    fn literal_matches_substring() {
        let p = Pattern::literal("rm -rf");
        assert!(p.is_match("sudo rm -rf /"));
        assert!(!p.is_match("rm -r foo"));
    }

    #[test]
    fn invalid_regex_rejected_at_build() {
        let err = RiskRule::from_def(&def("(unclosed", true)).unwrap_err();
        assert!(matches!(err, RuleError::InvalidRegex { .. }));
    }

    #[test]
    fn empty_pattern_rejected() {
        let err = RiskRule::from_def(&def("", false)).unwrap_err();
        assert!(matches!(err, RuleError::EmptyPattern { .. }));
    }

    #[test]
    fn case_insensitive_literal() {
        let mut d = def("Token", false);
        d.case_insensitive = true;
        let rule = RiskRule::from_def(&d).unwrap();
        assert!(rule.pattern.is_match("api_TOKEN.txt"));
    }

    #[test]
    fn first_match_wins() {
        let rules = vec![
            RiskRule::new(Pattern::literal("a"), Severity::Warning, "first"),
            RiskRule::new(Pattern::literal("ab"), Severity::Critical, "second"),
        ];
        assert_eq!(first_match(&rules, "abc").unwrap().reason, "first");
        assert!(first_match(&rules, "xyz").is_none());
    }

    #[test]
    fn composite_requires_every_signal() {
        let rule = CompositeRule {
            signals: vec![
                Signal {
                    name: "a",
                    any_of: vec![Pattern::literal("a")],
                },
                Signal {
                    name: "b",
                    any_of: vec![Pattern::literal("b"), Pattern::literal("c")],
                },
            ],
            severity: Severity::Critical,
            reason: "both".into(),
        };
        assert!(rule.is_match("a c"));
        assert!(!rule.is_match("a"));
        assert!(!rule.is_match("bc"));
        assert_eq!(rule.signal_names(), "a + b");
    }

    #[test]
    fn extra_rules_append_after_builtins() {
        let extra = [def("terraform destroy", false)];
        let set = RuleSet::with_extra(&RuleExtensions {
            shell: &extra,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(set.shell.last().unwrap().reason, "test rule");
        assert_eq!(set.shell.len(), builtin::build().unwrap().shell.len() + 1);
    }

    #[test]
    fn bad_extra_rule_rejects_whole_set() {
        let extra = [def("[", true)];
        let result = RuleSet::with_extra(&RuleExtensions {
            git: &extra,
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
