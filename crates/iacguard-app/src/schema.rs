//! JSON schemas for the report and the config file.

use anyhow::Context;
use iacguard_settings::IacguardConfigV1;
use iacguard_types::IacguardReport;

pub fn report_schema_json() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(IacguardReport);
    serde_json::to_string_pretty(&schema).context("serialize report schema")
}

pub fn config_schema_json() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(IacguardConfigV1);
    serde_json::to_string_pretty(&schema).context("serialize config schema")
}
