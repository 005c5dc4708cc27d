use iacguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use iacguard_domain::rules;
use iacguard_types::Severity;
use std::collections::BTreeMap;

pub const PROFILES: &[&str] = &["strict", "warn", "audit"];

const DEFAULT_MAX_FINDINGS: usize = 200;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into the config file.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    let cfg = match profile {
        "strict" => build("strict", FailOn::Error, |rule| rule.default_severity),
        "warn" => build("warn", FailOn::Error, |_| Severity::Warning),
        "audit" => build("audit", FailOn::Error, |_| Severity::Info),
        _ => return None,
    };
    Some(cfg)
}

fn build(profile: &str, fail_on: FailOn, severity: fn(&rules::Rule) -> Severity) -> EffectiveConfig {
    let rules: BTreeMap<String, RulePolicy> = rules::registry()
        .iter()
        .map(|rule| (rule.id.to_string(), RulePolicy::enabled(severity(rule))))
        .collect();

    EffectiveConfig {
        profile: profile.to_string(),
        fail_on,
        max_findings: DEFAULT_MAX_FINDINGS,
        rules,
    }
}
