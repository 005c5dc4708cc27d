use crate::model::{AttrValue, Reference, ResourceNode, ResourceTree, Suppression};
use crate::policy::{EffectiveConfig, FailOn, RulePolicy};
use crate::rules;
use iacguard_types::{Severity, TemplatePath};
use serde_json::Value;
use std::collections::BTreeMap;

pub const TEST_TEMPLATE: &str = "Test.template.json";

/// Plain JSON value, no intrinsics.
pub fn attr(value: Value) -> AttrValue {
    AttrValue::from(value)
}

/// JSON with `Ref`, `Fn::GetAtt` and `Fn::Join` recognised, the way templates spell them.
pub fn cfn(value: Value) -> AttrValue {
    match value {
        Value::Object(map) if map.len() == 1 => {
            let (key, inner) = map.into_iter().next().unwrap();
            match (key.as_str(), inner) {
                ("Ref", Value::String(target)) => AttrValue::Ref(Reference::to_ref(target)),
                ("Fn::GetAtt", Value::Array(parts)) if parts.len() == 2 => {
                    let target = parts[0].as_str().unwrap_or_default();
                    let attribute = parts[1].as_str().unwrap_or_default();
                    AttrValue::Ref(Reference::new(target, attribute))
                }
                ("Fn::Join", Value::Array(mut args)) if args.len() == 2 => {
                    let parts = args.pop().unwrap();
                    let delimiter = args.pop().unwrap();
                    let parts = match parts {
                        Value::Array(items) => items.into_iter().map(cfn).collect(),
                        other => vec![cfn(other)],
                    };
                    AttrValue::Join {
                        delimiter: delimiter.as_str().unwrap_or_default().to_string(),
                        parts,
                    }
                }
                (function, _) if function.starts_with("Fn::") => {
                    AttrValue::Opaque(function.to_string())
                }
                (key, inner) => {
                    let mut out = BTreeMap::new();
                    out.insert(key.to_string(), cfn(inner));
                    AttrValue::Record(out)
                }
            }
        }
        Value::Object(map) => {
            AttrValue::Record(map.into_iter().map(|(k, v)| (k, cfn(v))).collect())
        }
        Value::Array(items) => AttrValue::List(items.into_iter().map(cfn).collect()),
        other => AttrValue::from(other),
    }
}

pub fn reference(target: &str, attribute: &str) -> AttrValue {
    AttrValue::Ref(Reference::new(target, attribute))
}

pub fn join(delimiter: &str, parts: Vec<AttrValue>) -> AttrValue {
    AttrValue::Join {
        delimiter: delimiter.to_string(),
        parts,
    }
}

/// A node whose properties are read with [`cfn`].
pub fn node(type_name: &str, id: &str, properties: Value) -> ResourceNode {
    let mut node = ResourceNode::new(id, type_name);
    if let Value::Object(map) = properties {
        node.properties = map.into_iter().map(|(k, v)| (k, cfn(v))).collect();
    }
    node
}

pub fn bucket(id: &str, properties: Value) -> ResourceNode {
    node("AWS::S3::Bucket", id, properties)
}

pub fn bucket_policy(id: &str, properties: Value) -> ResourceNode {
    node("AWS::S3::BucketPolicy", id, properties)
}

pub fn notebook(id: &str, properties: Value) -> ResourceNode {
    node("AWS::SageMaker::NotebookInstance", id, properties)
}

pub fn endpoint_config(id: &str, properties: Value) -> ResourceNode {
    node("AWS::SageMaker::EndpointConfig", id, properties)
}

pub fn search_domain(id: &str, properties: Value) -> ResourceNode {
    node("AWS::OpenSearchService::Domain", id, properties)
}

pub fn with_path(mut node: ResourceNode, path: &str) -> ResourceNode {
    node.path = Some(path.to_string());
    node
}

pub fn suppressed(mut node: ResourceNode, rule_id: &str) -> ResourceNode {
    node.suppressions.push(Suppression {
        rule_id: rule_id.to_string(),
        reason: "accepted for tests".to_string(),
    });
    node
}

pub fn tree(nodes: Vec<ResourceNode>) -> ResourceTree {
    ResourceTree::new(TemplatePath::new(TEST_TEMPLATE), nodes)
}

pub fn config_with_rule(rule_id: &str, severity: Severity) -> EffectiveConfig {
    config_with_rule_allow(rule_id, severity, Vec::new())
}

pub fn config_with_rule_allow(rule_id: &str, severity: Severity, allow: Vec<&str>) -> EffectiveConfig {
    let mut policy = RulePolicy::enabled(severity);
    policy.allow = allow.into_iter().map(|s| s.to_string()).collect();

    let mut rules = BTreeMap::new();
    rules.insert(rule_id.to_string(), policy);

    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        rules,
    }
}

/// Every registered rule at its default severity.
pub fn config_all_rules() -> EffectiveConfig {
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        rules: rules::registry()
            .iter()
            .map(|r| (r.id.to_string(), RulePolicy::enabled(r.default_severity)))
            .collect(),
    }
}

/// A deny-insecure-transport statement over `resources`.
pub fn deny_insecure_transport(resources: Value) -> Value {
    serde_json::json!({
        "Effect": "Deny",
        "Principal": {"AWS": "*"},
        "Action": "s3:*",
        "Condition": {"Bool": {"aws:SecureTransport": "false"}},
        "Resource": resources,
    })
}

/// Policy node attached to `bucket_id` via `Ref` carrying `statements`.
pub fn policy_for(id: &str, bucket_id: &str, statements: Vec<Value>) -> ResourceNode {
    bucket_policy(
        id,
        serde_json::json!({
            "Bucket": {"Ref": bucket_id},
            "PolicyDocument": {"Version": "2012-10-17", "Statement": statements},
        }),
    )
}
