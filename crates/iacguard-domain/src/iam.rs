//! Typed view of a resolved IAM policy document.
//!
//! Built from an already-resolved [`AttrValue`]: unresolved fragments have become `Null`
//! and are skipped. Unknown shapes read as empty, never as an error.

use crate::model::AttrValue;
use std::collections::BTreeMap;

const AWS_PRINCIPAL: &str = "AWS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    /// Principal descriptors as written; `"*"` entries stand for any principal.
    pub principals: Vec<String>,
    /// operator -> (condition key -> expected values)
    pub conditions: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn has_any_principal(&self) -> bool {
        self.principals.iter().any(|p| p == "*")
    }

    /// Expected values for `operator` / `key`; keys compare case-insensitively.
    pub fn condition_values(&self, operator: &str, key: &str) -> &[String] {
        self.conditions
            .get(operator)
            .and_then(|keys| {
                keys.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v.as_slice())
            })
            .unwrap_or(&[])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    pub statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn from_value(value: &AttrValue) -> Self {
        let statements = match value.get("Statement") {
            Some(AttrValue::List(items)) => items.iter().filter_map(parse_statement).collect(),
            Some(single @ AttrValue::Record(_)) => parse_statement(single).into_iter().collect(),
            _ => Vec::new(),
        };
        Self { statements }
    }
}

fn parse_statement(value: &AttrValue) -> Option<PolicyStatement> {
    let effect = match value.get("Effect").and_then(AttrValue::as_str)? {
        "Allow" => Effect::Allow,
        "Deny" => Effect::Deny,
        _ => return None,
    };

    Some(PolicyStatement {
        effect,
        actions: strings(value.get("Action")),
        principals: principals(value.get("Principal")),
        conditions: conditions(value.get("Condition")),
        resources: strings(value.get("Resource")),
    })
}

/// A string or a list of strings; anything else contributes nothing.
fn strings(value: Option<&AttrValue>) -> Vec<String> {
    match value {
        Some(AttrValue::String(s)) => vec![s.clone()],
        Some(AttrValue::List(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn scalars(value: &AttrValue) -> Vec<String> {
    match value {
        AttrValue::List(items) => items.iter().filter_map(AttrValue::scalar_string).collect(),
        other => other.scalar_string().into_iter().collect(),
    }
}

/// `"*"`, `{"AWS": "*"}`, `{"AWS": [...]}` and lists of those. `Service`, `Federated`
/// and `CanonicalUser` entries are not collected.
fn principals(value: Option<&AttrValue>) -> Vec<String> {
    match value {
        Some(AttrValue::String(s)) => vec![s.clone()],
        Some(AttrValue::List(items)) => items.iter().flat_map(|v| principals(Some(v))).collect(),
        Some(AttrValue::Record(map)) => strings(map.get(AWS_PRINCIPAL)),
        _ => Vec::new(),
    }
}

fn conditions(value: Option<&AttrValue>) -> BTreeMap<String, BTreeMap<String, Vec<String>>> {
    let Some(AttrValue::Record(operators)) = value else {
        return BTreeMap::new();
    };
    operators
        .iter()
        .filter_map(|(operator, keys)| match keys {
            AttrValue::Record(keys) => Some((
                operator.clone(),
                keys.iter()
                    .map(|(key, expected)| (key.clone(), scalars(expected)))
                    .collect(),
            )),
            _ => None,
        })
        .collect()
}
