//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Evaluation idempotence and ordering determinism
//! - Not-applicable kinds never producing findings
//! - Reference cycles of any length failing closed

use crate::engine::{compare_findings, evaluate};
use crate::model::{AttrValue, CloudAssembly, Reference, ResourceNode, ResourceTree};
use crate::resolve::TreeContext;
use crate::rules::{self, RuleOutcome};
use crate::test_support::{attr, config_all_rules, tree};
use iacguard_types::{Finding, Severity, TemplatePath, ids};
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_logical_id() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][A-Za-z0-9]{0,11}").expect("valid regex")
}

fn arb_status() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(json!("Enabled")),
        Just(json!("Suspended")),
        Just(json!("Disabled")),
        Just(json!(true)),
        Just(json!(null)),
    ]
}

fn arb_flag() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(json!(true)),
        Just(json!(false)),
        Just(json!("true")),
        Just(json!("no")),
    ]
}

fn arb_acl() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop_oneof![
        Just("Private"),
        Just("PublicRead"),
        Just("PublicReadWrite"),
        Just("AuthenticatedRead"),
        Just("LogDeliveryWrite"),
    ])
}

/// A bucket with an arbitrary mix of the properties the rule library reads.
fn arb_bucket() -> impl Strategy<Value = ResourceNode> {
    (
        arb_logical_id(),
        arb_status(),
        prop::collection::vec(arb_flag(), 4),
        arb_acl(),
        prop::option::of("[a-z]{3,12}"),
    )
        .prop_map(|(id, status, flags, acl, name)| {
            let mut node = ResourceNode::new(id, "AWS::S3::Bucket");
            node.properties.insert(
                "VersioningConfiguration".to_string(),
                attr(json!({"Status": status})),
            );
            node.properties.insert(
                "PublicAccessBlockConfiguration".to_string(),
                attr(json!({
                    "BlockPublicPolicy": flags[0],
                    "BlockPublicAcls": flags[1],
                    "IgnorePublicAcls": flags[2],
                    "RestrictPublicBuckets": flags[3],
                })),
            );
            if let Some(acl) = acl {
                node.properties
                    .insert("AccessControl".to_string(), attr(json!(acl)));
            }
            if let Some(name) = name {
                node.properties
                    .insert("BucketName".to_string(), attr(json!(name)));
            }
            node
        })
}

/// Nodes of kinds no rule targets.
fn arb_foreign_node() -> impl Strategy<Value = ResourceNode> {
    (
        arb_logical_id(),
        prop_oneof![
            Just("AWS::SQS::Queue"),
            Just("AWS::KMS::Key"),
            Just("AWS::Lambda::Function"),
            Just("Custom::Thing"),
        ],
    )
        .prop_map(|(id, type_name)| {
            let mut node = ResourceNode::new(id, type_name);
            node.properties
                .insert("VersioningConfiguration".to_string(), attr(json!({"Status": "Suspended"})));
            node
        })
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

fn arb_finding() -> impl Strategy<Value = Finding> {
    (
        arb_severity(),
        prop_oneof![
            Just(ids::RULE_S3_VERSIONING_ENABLED),
            Just(ids::RULE_S3_PUBLIC_ACCESS_BLOCKED),
            Just(ids::RULE_SAGEMAKER_NOTEBOOK_IN_VPC),
        ],
        prop_oneof![
            Just("A.template.json"),
            Just("B.template.json"),
            Just("nested/C.template.json"),
        ],
        arb_logical_id(),
        "test message [a-z]{1,20}",
    )
        .prop_map(|(severity, rule_id, template, node_id, message)| Finding {
            severity,
            rule_id: rule_id.to_string(),
            code: "code".to_string(),
            message,
            location: Some(iacguard_types::NodeLocation {
                template: TemplatePath::new(template),
                node_id,
                path: None,
            }),
            help: None,
            url: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        })
}

fn assembly(nodes: Vec<ResourceNode>) -> CloudAssembly {
    CloudAssembly {
        stacks: vec![tree(nodes)],
    }
}

// ============================================================================
// Property tests: evaluation
// ============================================================================

proptest! {
    /// Two passes over the same tree yield identical findings.
    #[test]
    fn evaluation_is_idempotent(buckets in prop::collection::vec(arb_bucket(), 0..8)) {
        let model = assembly(buckets);
        let cfg = config_all_rules();

        let first = evaluate(&model, &cfg);
        let second = evaluate(&model, &cfg);
        prop_assert_eq!(first.findings, second.findings);
        prop_assert_eq!(first.data, second.data);
    }

    /// Kinds outside every rule's subject list never produce findings.
    #[test]
    fn foreign_kinds_are_never_reported(nodes in prop::collection::vec(arb_foreign_node(), 1..8)) {
        let model = assembly(nodes.clone());
        let report = evaluate(&model, &config_all_rules());
        prop_assert!(report.findings.is_empty());
        prop_assert_eq!(report.data.rules_applied, 0);

        let t = tree(nodes);
        let ctx = TreeContext::new(&t);
        for node in t.nodes() {
            for rule in rules::registry() {
                prop_assert_eq!(rule.evaluate(node, &ctx), RuleOutcome::NotApplicable);
            }
        }
    }

    /// Emitted findings come out in the documented order.
    #[test]
    fn emitted_findings_are_sorted(buckets in prop::collection::vec(arb_bucket(), 0..8)) {
        let report = evaluate(&assembly(buckets), &config_all_rules());
        for pair in report.findings.windows(2) {
            prop_assert_ne!(
                compare_findings(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater
            );
        }
    }

    /// Every emitted finding names a node of a kind its rule targets.
    #[test]
    fn findings_match_rule_kinds(
        buckets in prop::collection::vec(arb_bucket(), 0..6),
        foreign in prop::collection::vec(arb_foreign_node(), 0..4),
    ) {
        let mut nodes = buckets;
        nodes.extend(foreign);
        let t = tree(nodes);
        let report = evaluate(&CloudAssembly { stacks: vec![t.clone()] }, &config_all_rules());

        for finding in &report.findings {
            let rule = rules::find(&finding.rule_id).expect("registered rule");
            let node_id = &finding.location.as_ref().expect("location").node_id;
            let node = t.node(node_id).expect("node in tree");
            prop_assert!(rule.applies_to(node.kind));
        }
    }

    /// A reference cycle of any length resolves to unresolved and fails closed.
    #[test]
    fn reference_cycles_fail_closed(len in 1usize..12) {
        let nodes: Vec<ResourceNode> = (0..len)
            .map(|i| {
                let mut node = ResourceNode::new(format!("B{i}"), "AWS::S3::Bucket");
                let next = format!("B{}", (i + 1) % len);
                node.properties.insert(
                    "BucketName".to_string(),
                    AttrValue::Ref(Reference::to_ref(next.clone())),
                );
                let mut status = std::collections::BTreeMap::new();
                status.insert("Status".to_string(), AttrValue::Ref(Reference::to_ref(next)));
                node.properties
                    .insert("VersioningConfiguration".to_string(), AttrValue::Record(status));
                node
            })
            .collect();
        let t = ResourceTree::new(TemplatePath::new("Cycle.template.json"), nodes);
        let ctx = TreeContext::new(&t);
        let rule = rules::find(ids::RULE_S3_VERSIONING_ENABLED).expect("registered rule");

        for node in t.nodes() {
            prop_assert!(ctx.resolve_reference(&Reference::to_ref(node.id.clone())).is_unresolved());
            prop_assert_eq!(rule.evaluate(node, &ctx), RuleOutcome::NonCompliant);
        }
    }

    /// Sorting any permutation of the same findings gives the same order.
    #[test]
    fn findings_ordering_is_deterministic(
        findings in prop::collection::vec(arb_finding(), 0..20),
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        use rand::seq::SliceRandom;

        let mut baseline = findings.clone();
        baseline.sort_by(compare_findings);

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut shuffled = findings;
        shuffled.shuffle(&mut rng);
        shuffled.sort_by(compare_findings);

        prop_assert_eq!(baseline, shuffled);
    }
}
