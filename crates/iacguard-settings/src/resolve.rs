use crate::{model::IacguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use iacguard_domain::policy::{EffectiveConfig, FailOn};
use iacguard_domain::rules;
use iacguard_types::Severity;

const DEFAULT_PROFILE: &str = "strict";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: IacguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        )
    })?;

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        if rules::find(rule_id).is_none() {
            anyhow::bail!("unknown rule id in config: {rule_id}");
        }
        let Some(entry) = effective.rules.get_mut(rule_id) else {
            anyhow::bail!("profile {profile} has no policy for {rule_id}");
        };

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
        }
        if !rc.allow.is_empty() {
            validate_allowlist(rule_id, &rc.allow)?;
            entry.allow = rc.allow.clone();
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    Ok(ResolvedConfig { effective })
}

fn validate_allowlist(rule_id: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid allow glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
