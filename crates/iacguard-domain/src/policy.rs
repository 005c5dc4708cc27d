use iacguard_types::Severity;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

#[derive(Clone, Debug)]
pub struct RulePolicy {
    pub enabled: bool,
    pub severity: Severity,
    /// Globs over node construct paths and logical ids; matching nodes are skipped.
    pub allow: Vec<String>,
}

impl RulePolicy {
    pub fn enabled(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity,
            allow: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: Severity::Info,
            allow: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    pub max_findings: usize,
    pub rules: BTreeMap<String, RulePolicy>,
}

impl EffectiveConfig {
    /// Policy for an enabled rule; `None` when the rule is disabled or unconfigured.
    pub fn rule_policy(&self, rule_id: &str) -> Option<&RulePolicy> {
        self.rules.get(rule_id).filter(|p| p.enabled)
    }
}
