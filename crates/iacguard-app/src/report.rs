use anyhow::Context;
use iacguard_types::{
    Finding, IacguardData, IacguardReport, ReportEnvelope, RunMeta, SCHEMA_REPORT_V1, Severity,
    ToolMeta, Verdict, VerdictCounts, VerdictSummary, ids,
};
use time::OffsetDateTime;

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "iacguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<IacguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse iacguard report")
}

pub fn serialize_report(report: &IacguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// A failing report carrying a single `tool.runtime` finding.
pub fn runtime_error_report(message: &str) -> IacguardReport {
    let now = OffsetDateTime::now_utc();

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
        },
        verdict: VerdictSummary {
            status: Verdict::Fail,
            counts: VerdictCounts {
                info: 0,
                warning: 0,
                error: 1,
                suppressed: 0,
            },
            reasons: vec!["tool_error".to_string()],
        },
        findings: vec![Finding {
            severity: Severity::Error,
            rule_id: ids::RULE_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: None,
            help: Some("Fix the tool error and re-run iacguard.".to_string()),
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: IacguardData {
            profile: "unknown".to_string(),
            findings_total: 1,
            findings_emitted: 1,
            ..IacguardData::default()
        },
    }
}
