use iacguard_types::{IacguardReport, Severity, Verdict};

pub fn render_markdown(report: &IacguardReport) -> String {
    let mut out = String::new();

    out.push_str("# iacguard report\n\n");
    let verdict = match report.verdict.status {
        Verdict::Pass => "PASS",
        Verdict::Warn => "WARN",
        Verdict::Fail => "FAIL",
    };
    let data = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Profile: `{}`\n- Scanned: {} template(s), {} resource(s)\n- Findings: {} (emitted) / {} (total)\n",
        verdict,
        data.profile,
        data.templates_scanned,
        data.resources_scanned,
        data.findings_emitted,
        data.findings_total
    ));
    if report.verdict.counts.suppressed > 0 {
        out.push_str(&format!(
            "- Suppressed: {}\n",
            report.verdict.counts.suppressed
        ));
    }
    out.push('\n');

    for reason in &report.verdict.reasons {
        out.push_str(&format!("> {}\n\n", escape_cell(reason)));
    }
    if let Some(r) = &data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");
    out.push_str("| Severity | Rule | Resource | Message |\n");
    out.push_str("| --- | --- | --- | --- |\n");

    for f in &report.findings {
        let sev = match f.severity {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        };
        let resource = match &f.location {
            Some(loc) => format!(
                "`{}` in `{}`",
                escape_cell(loc.display_path()),
                escape_cell(loc.template.as_str())
            ),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            "| {} | `{}` | {} | {} |\n",
            sev,
            f.rule_id,
            resource,
            escape_cell(&f.message)
        ));
    }

    // One remediation line per rule, in order of first appearance.
    let mut seen: Vec<&str> = Vec::new();
    let mut remediation = String::new();
    for f in &report.findings {
        let Some(help) = &f.help else { continue };
        if seen.contains(&f.rule_id.as_str()) {
            continue;
        }
        seen.push(&f.rule_id);
        remediation.push_str(&format!("- `{}`: {}\n", f.rule_id, help));
        if let Some(url) = &f.url {
            remediation.push_str(&format!("  - url: {}\n", url));
        }
    }
    if !remediation.is_empty() {
        out.push_str("\n## Remediation\n\n");
        out.push_str(&remediation);
    }

    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}
