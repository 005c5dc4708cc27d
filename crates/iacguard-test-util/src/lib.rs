//! Golden-file helpers shared by the CLI integration and BDD suites.

use serde_json::Value;

const TIMESTAMP_KEYS: &[&str] = &["started_at", "ended_at"];
const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize the run-dependent parts of a report for golden comparison.
///
/// `tool.version` is replaced only on a root report envelope, so finding payloads that
/// happen to carry a `tool` object are left alone. Timestamps and `duration_ms` are
/// replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if is_envelope(&value)
        && let Some(tool) = value.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert(
            "version".to_string(),
            Value::String(VERSION_PLACEHOLDER.to_string()),
        );
    }
    normalize_run_fields(&mut value);
    value
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        ["schema", "tool", "run", "verdict", "findings"]
            .iter()
            .all(|k| obj.contains_key(*k))
    })
}

fn normalize_run_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(*key)
                    && !v.is_null()
                {
                    *v = Value::String(TIMESTAMP_PLACEHOLDER.to_string());
                }
            }
            if let Some(v) = map.get_mut("duration_ms") {
                *v = Value::Number(0.into());
            }
            for val in map.values_mut() {
                normalize_run_fields(val);
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(normalize_run_fields),
        _ => {}
    }
}
