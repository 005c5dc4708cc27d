//! The `rules` use case: list the registered rules.

use iacguard_domain::rules;
use iacguard_types::Severity;

/// One registered rule, as shown by `iacguard rules`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSummary {
    pub id: &'static str,
    pub code: &'static str,
    pub kinds: Vec<&'static str>,
    pub default_severity: Severity,
}

/// Registered rules, in evaluation order.
pub fn list_rules() -> Vec<RuleSummary> {
    rules::registry()
        .iter()
        .map(|rule| RuleSummary {
            id: rule.id,
            code: rule.code,
            kinds: rule.kinds.iter().map(|k| k.tag()).collect(),
            default_severity: rule.default_severity,
        })
        .collect()
}

/// One line per rule: id, default severity and the kinds it applies to.
pub fn format_rules(rules: &[RuleSummary]) -> String {
    let width = rules.iter().map(|r| r.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for r in rules {
        out.push_str(&format!(
            "{:<width$}  {:<7}  {}\n",
            r.id,
            r.default_severity.as_str(),
            r.kinds.join(", "),
            width = width
        ));
    }
    out
}
