use iacguard_types::{IacguardReport, Severity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={template},title={rule_id}::{message}`
pub fn render_github_annotations(report: &IacguardReport) -> Vec<String> {
    report
        .findings
        .iter()
        .map(|f| {
            let level = match f.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "notice",
            };

            let mut props = Vec::new();
            if let Some(loc) = &f.location {
                props.push(format!("file={}", escape_property(loc.template.as_str())));
            }
            props.push(format!("title={}", escape_property(&f.rule_id)));

            let message = escape_data(&format!("[{}] {}", f.code, f.message));
            format!("::{} {}::{}", level, props.join(","), message)
        })
        .collect()
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
