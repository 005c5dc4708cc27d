//! Turns a non-compliant outcome into the externally visible finding.

use crate::fingerprint::fingerprint_for_node;
use crate::model::{ResourceNode, ResourceTree};
use crate::rules::Rule;
use iacguard_types::{Finding, NodeLocation, Severity};
use serde_json::json;

pub fn finding(rule: &Rule, severity: Severity, tree: &ResourceTree, node: &ResourceNode) -> Finding {
    let template = tree.template.as_str();
    Finding {
        severity,
        rule_id: rule.id.to_string(),
        code: rule.code.to_string(),
        message: format!("{} '{}' {}", node.kind.tag(), node.display_path(), rule.message),
        location: Some(NodeLocation {
            template: tree.template.clone(),
            node_id: node.id.clone(),
            path: node.path.clone(),
        }),
        help: Some(rule.help.to_string()),
        url: None,
        fingerprint: Some(fingerprint_for_node(rule.id, rule.code, template, &node.id)),
        data: json!({
            "resource_type": node.type_name,
            "logical_id": node.id,
            "template": template,
        }),
    }
}
