use crate::emit;
use crate::model::{CloudAssembly, ResourceNode};
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::{DomainReport, SeverityCounts};
use crate::resolve::TreeContext;
use crate::rules::{self, Rule, RuleOutcome};
use globset::{Glob, GlobSet, GlobSetBuilder};
use iacguard_types::{Finding, IacguardData, Severity, Verdict};

/// A registered rule together with its effective policy for this pass.
struct ActiveRule {
    rule: &'static Rule,
    severity: Severity,
    allow: Option<GlobSet>,
}

impl ActiveRule {
    fn allows(&self, node: &ResourceNode) -> bool {
        self.allow
            .as_ref()
            .is_some_and(|set| set.is_match(node.display_path()) || set.is_match(&node.id))
    }
}

pub fn evaluate(model: &CloudAssembly, cfg: &EffectiveConfig) -> DomainReport {
    let active = active_rules(cfg);

    let mut findings: Vec<Finding> = Vec::new();
    let mut rules_applied = 0u32;
    let mut suppressed = 0u32;

    for tree in &model.stacks {
        let ctx = TreeContext::new(tree);
        for node in tree.nodes() {
            for active in &active {
                let rule = active.rule;
                if !rule.applies_to(node.kind) {
                    continue;
                }
                if active.allows(node) {
                    tracing::debug!(rule = rule.id, node = %node.id, "node allowlisted");
                    continue;
                }

                rules_applied += 1;
                let outcome = rule.evaluate(node, &ctx);
                tracing::debug!(
                    template = %tree.template,
                    node = %node.id,
                    rule = rule.id,
                    ?outcome,
                    "rule evaluated"
                );
                if outcome != RuleOutcome::NonCompliant {
                    continue;
                }

                if node.suppresses(rule.id) {
                    suppressed += 1;
                    continue;
                }
                findings.push(emit::finding(rule, active.severity, tree, node));
            }
        }
    }

    // Deterministic ordering before truncation.
    findings.sort_by(compare_findings);

    let total = findings.len() as u32;

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let verdict = compute_verdict(&emitted, cfg.fail_on);
    let mut counts = SeverityCounts::from_findings(&emitted);
    counts.suppressed = suppressed;

    let data = IacguardData {
        profile: cfg.profile.clone(),
        templates_scanned: model.stacks.len() as u32,
        resources_scanned: model.resource_count() as u32,
        rules_applied,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    tracing::info!(
        templates = data.templates_scanned,
        resources = data.resources_scanned,
        findings = total,
        suppressed,
        "evaluation finished"
    );

    DomainReport {
        verdict,
        findings: emitted,
        data,
        counts,
    }
}

fn active_rules(cfg: &EffectiveConfig) -> Vec<ActiveRule> {
    rules::registry()
        .iter()
        .filter_map(|rule| {
            let policy = cfg.rule_policy(rule.id)?;
            Some(ActiveRule {
                rule,
                severity: policy.severity,
                allow: build_allowlist(&policy.allow),
            })
        })
        .collect()
}

/// Patterns are validated by the settings layer; anything invalid here is dropped.
fn build_allowlist(allow: &[String]) -> Option<GlobSet> {
    if allow.is_empty() {
        return None;
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in allow {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => tracing::warn!(pattern = %pattern, error = %err, "ignoring invalid allow glob"),
        }
    }
    builder.build().ok()
}

fn compute_verdict(findings: &[Finding], fail_on: FailOn) -> Verdict {
    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}

pub(crate) fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) template (missing last)
    // 3) node display path (missing last)
    // 4) rule_id
    // 5) code
    // 6) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let (at, ap) = match &a.location {
        Some(l) => (l.template.as_str(), l.display_path()),
        None => ("~", "~"),
    };
    let (bt, bp) = match &b.location {
        Some(l) => (l.template.as_str(), l.display_path()),
        None => ("~", "~"),
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then(at.cmp(bt))
        .then(ap.cmp(bp))
        .then(a.rule_id.cmp(&b.rule_id))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}
