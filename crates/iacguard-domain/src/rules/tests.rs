use super::{RuleOutcome, find, registry};
use crate::model::ResourceNode;
use crate::resolve::TreeContext;
use crate::test_support::{
    bucket, deny_insecure_transport, endpoint_config, node, notebook, policy_for, search_domain,
    tree,
};
use iacguard_types::ids;
use serde_json::{Value, json};

/// Outcome of `rule_id` against the first node of a tree built from `nodes`.
fn outcome(rule_id: &str, nodes: Vec<ResourceNode>) -> RuleOutcome {
    let rule = find(rule_id).expect("registered rule");
    let t = tree(nodes);
    let ctx = TreeContext::new(&t);
    rule.evaluate(&t.nodes()[0], &ctx)
}

fn bucket_outcome(rule_id: &str, properties: Value) -> RuleOutcome {
    outcome(rule_id, vec![bucket("Data", properties)])
}

use RuleOutcome::{Compliant, NonCompliant, NotApplicable};

#[test]
fn registry_ids_are_unique_and_explained() {
    let mut seen = std::collections::BTreeSet::new();
    for rule in registry() {
        assert!(seen.insert(rule.id), "duplicate rule id {}", rule.id);
        assert!(!rule.kinds.is_empty(), "{} has no kinds", rule.id);
        assert!(
            iacguard_types::lookup_explanation(rule.id).is_some(),
            "{} has no explanation",
            rule.id
        );
        assert!(
            iacguard_types::lookup_explanation(rule.code).is_some(),
            "{} has no explanation",
            rule.code
        );
    }
}

#[test]
fn non_matching_kind_is_not_applicable() {
    let nb = notebook("Nb", json!({}));
    for rule in registry()
        .iter()
        .filter(|r| r.kinds.contains(&crate::model::ResourceKind::S3Bucket))
    {
        assert_eq!(outcome(rule.id, vec![nb.clone()]), NotApplicable, "{}", rule.id);
    }

    let unknown = node("AWS::SQS::Queue", "Queue", json!({}));
    for rule in registry() {
        assert_eq!(outcome(rule.id, vec![unknown.clone()]), NotApplicable, "{}", rule.id);
    }
}

#[test]
fn versioning_requires_enabled_status() {
    let rule = ids::RULE_S3_VERSIONING_ENABLED;
    assert_eq!(
        bucket_outcome(rule, json!({"VersioningConfiguration": {"Status": "Enabled"}})),
        Compliant
    );
    assert_eq!(
        bucket_outcome(rule, json!({"VersioningConfiguration": {"Status": "Suspended"}})),
        NonCompliant
    );
    assert_eq!(bucket_outcome(rule, json!({})), NonCompliant);
    assert_eq!(
        bucket_outcome(rule, json!({"VersioningConfiguration": "Enabled"})),
        NonCompliant
    );
}

#[test]
fn versioning_status_through_unresolved_parameter_fails_closed() {
    assert_eq!(
        bucket_outcome(
            ids::RULE_S3_VERSIONING_ENABLED,
            json!({"VersioningConfiguration": {"Status": {"Ref": "VersioningParam"}}})
        ),
        NonCompliant
    );
}

fn all_blocked() -> Value {
    json!({
        "BlockPublicPolicy": true,
        "BlockPublicAcls": true,
        "IgnorePublicAcls": true,
        "RestrictPublicBuckets": true,
    })
}

#[test]
fn public_access_block_requires_every_flag() {
    let rule = ids::RULE_S3_PUBLIC_ACCESS_BLOCKED;
    assert_eq!(
        bucket_outcome(rule, json!({"PublicAccessBlockConfiguration": all_blocked()})),
        Compliant
    );

    for flag in [
        "BlockPublicPolicy",
        "BlockPublicAcls",
        "IgnorePublicAcls",
        "RestrictPublicBuckets",
    ] {
        let mut config = all_blocked();
        config[flag] = json!(false);
        assert_eq!(
            bucket_outcome(rule, json!({"PublicAccessBlockConfiguration": config})),
            NonCompliant,
            "{flag} false"
        );
    }

    assert_eq!(bucket_outcome(rule, json!({})), NonCompliant);
}

#[test]
fn public_access_block_accepts_string_booleans() {
    let config = json!({
        "BlockPublicPolicy": "true",
        "BlockPublicAcls": "True",
        "IgnorePublicAcls": true,
        "RestrictPublicBuckets": "TRUE",
    });
    assert_eq!(
        bucket_outcome(
            ids::RULE_S3_PUBLIC_ACCESS_BLOCKED,
            json!({"PublicAccessBlockConfiguration": config})
        ),
        Compliant
    );
}

#[test]
fn logging_needs_destination_or_prefix() {
    let rule = ids::RULE_S3_LOGGING_ENABLED;
    assert_eq!(
        bucket_outcome(rule, json!({"LoggingConfiguration": {"LogFilePrefix": "logs/"}})),
        Compliant
    );
    assert_eq!(
        outcome(
            rule,
            vec![
                bucket(
                    "Data",
                    json!({"LoggingConfiguration": {"DestinationBucketName": {"Ref": "Logs"}}})
                ),
                bucket("Logs", json!({})),
            ]
        ),
        Compliant
    );
    assert_eq!(
        bucket_outcome(rule, json!({"LoggingConfiguration": {"LogFilePrefix": ""}})),
        NonCompliant
    );
    assert_eq!(bucket_outcome(rule, json!({"LoggingConfiguration": {}})), NonCompliant);
}

#[test]
fn public_read_acl_cases() {
    let rule = ids::RULE_S3_PUBLIC_READ_PROHIBITED;
    assert_eq!(bucket_outcome(rule, json!({})), Compliant);
    assert_eq!(bucket_outcome(rule, json!({"AccessControl": "private"})), Compliant);
    assert_eq!(bucket_outcome(rule, json!({"AccessControl": "LogDeliveryWrite"})), Compliant);

    for acl in ["PublicRead", "PublicReadWrite", "AuthenticatedRead"] {
        assert_eq!(
            bucket_outcome(rule, json!({"AccessControl": acl})),
            NonCompliant,
            "{acl}"
        );
    }

    assert_eq!(
        bucket_outcome(
            rule,
            json!({
                "AccessControl": "PublicRead",
                "PublicAccessBlockConfiguration": {"IgnorePublicAcls": true}
            })
        ),
        Compliant
    );
    assert_eq!(
        bucket_outcome(
            rule,
            json!({
                "AccessControl": "PublicRead",
                "PublicAccessBlockConfiguration": {"BlockPublicAcls": "true"}
            })
        ),
        Compliant
    );
}

#[test]
fn unresolved_acl_is_treated_as_granting() {
    let props = json!({"AccessControl": {"Fn::If": ["IsPublic", "PublicReadWrite", "Private"]}});
    assert_eq!(
        bucket_outcome(ids::RULE_S3_PUBLIC_READ_PROHIBITED, props.clone()),
        NonCompliant
    );
    assert_eq!(
        bucket_outcome(ids::RULE_S3_PUBLIC_WRITE_PROHIBITED, props),
        NonCompliant
    );
}

#[test]
fn public_write_only_flags_read_write() {
    let rule = ids::RULE_S3_PUBLIC_WRITE_PROHIBITED;
    assert_eq!(bucket_outcome(rule, json!({"AccessControl": "PublicRead"})), Compliant);
    assert_eq!(
        bucket_outcome(rule, json!({"AccessControl": "PublicReadWrite"})),
        NonCompliant
    );
    assert_eq!(
        bucket_outcome(
            rule,
            json!({
                "AccessControl": "PublicReadWrite",
                "PublicAccessBlockConfiguration": {"BlockPublicAcls": true}
            })
        ),
        Compliant
    );
}

#[test]
fn replication_needs_one_enabled_rule() {
    let rule = ids::RULE_S3_REPLICATION_ENABLED;
    let disabled_only = json!({
        "ReplicationConfiguration": {
            "Role": "arn:aws:iam::123456789012:role/replication",
            "Rules": [{"Status": "Disabled", "Destination": {"Bucket": "arn:aws:s3:::dst"}}]
        }
    });
    let mixed = json!({
        "ReplicationConfiguration": {
            "Role": "arn:aws:iam::123456789012:role/replication",
            "Rules": [
                {"Status": "Disabled", "Destination": {"Bucket": "arn:aws:s3:::dst"}},
                {"Status": "Enabled", "Destination": {"Bucket": "arn:aws:s3:::dst"}}
            ]
        }
    });
    assert_eq!(bucket_outcome(rule, disabled_only), NonCompliant);
    assert_eq!(bucket_outcome(rule, mixed), Compliant);
    assert_eq!(bucket_outcome(rule, json!({})), NonCompliant);
}

fn encryption(by_default: Value) -> Value {
    json!({
        "BucketEncryption": {
            "ServerSideEncryptionConfiguration": [{"ServerSideEncryptionByDefault": by_default}]
        }
    })
}

#[test]
fn server_side_encryption_needs_algorithm() {
    let rule = ids::RULE_S3_SERVER_SIDE_ENCRYPTION_ENABLED;
    assert_eq!(
        bucket_outcome(rule, encryption(json!({"SSEAlgorithm": "AES256"}))),
        Compliant
    );
    assert_eq!(
        bucket_outcome(rule, encryption(json!({"SSEAlgorithm": ""}))),
        NonCompliant
    );
    assert_eq!(bucket_outcome(rule, json!({})), NonCompliant);
}

#[test]
fn kms_encryption_needs_algorithm_and_key() {
    let rule = ids::RULE_S3_DEFAULT_ENCRYPTION_KMS;
    assert_eq!(
        bucket_outcome(rule, encryption(json!({"SSEAlgorithm": "AES256"}))),
        NonCompliant
    );
    assert_eq!(
        bucket_outcome(rule, encryption(json!({"SSEAlgorithm": "aws:kms"}))),
        NonCompliant
    );
    assert_eq!(
        outcome(
            rule,
            vec![
                bucket(
                    "Data",
                    encryption(json!({
                        "SSEAlgorithm": "aws:kms:dsse",
                        "KMSMasterKeyID": {"Fn::GetAtt": ["Key", "Arn"]}
                    }))
                ),
                node("AWS::KMS::Key", "Key", json!({})),
            ]
        ),
        Compliant
    );
}

#[test]
fn object_lock_needs_retention() {
    let rule = ids::RULE_S3_DEFAULT_LOCK_ENABLED;
    let locked = json!({
        "ObjectLockEnabled": true,
        "ObjectLockConfiguration": {
            "ObjectLockEnabled": "Enabled",
            "Rule": {"DefaultRetention": {"Mode": "GOVERNANCE", "Days": 30}}
        }
    });
    assert_eq!(bucket_outcome(rule, locked.clone()), Compliant);

    let mut zero_days = locked.clone();
    zero_days["ObjectLockConfiguration"]["Rule"]["DefaultRetention"]["Days"] = json!(0);
    assert_eq!(bucket_outcome(rule, zero_days), NonCompliant);

    let mut no_flag = locked;
    no_flag["ObjectLockEnabled"] = json!(false);
    assert_eq!(bucket_outcome(rule, no_flag), NonCompliant);

    assert_eq!(
        bucket_outcome(rule, json!({"ObjectLockEnabled": true})),
        NonCompliant
    );
}

fn named_bucket() -> ResourceNode {
    bucket("Data", json!({"BucketName": "data"}))
}

#[test]
fn ssl_canonical_statement_is_compliant() {
    let stmt = deny_insecure_transport(json!(["arn:aws:s3:::data", "arn:aws:s3:::data/*"]));
    assert_eq!(
        outcome(
            ids::RULE_S3_SSL_REQUESTS_ONLY,
            vec![named_bucket(), policy_for("Policy", "Data", vec![stmt])]
        ),
        Compliant
    );
}

#[test]
fn ssl_statement_over_other_bucket_objects_is_non_compliant() {
    let stmt = deny_insecure_transport(json!(["arn:aws:s3:::data", "arn:aws:s3:::other/*"]));
    assert_eq!(
        outcome(
            ids::RULE_S3_SSL_REQUESTS_ONLY,
            vec![named_bucket(), policy_for("Policy", "Data", vec![stmt])]
        ),
        NonCompliant
    );
}

#[test]
fn ssl_divergent_prefixes_are_non_compliant() {
    for objects in ["arn:aws:s3:::dataSuffix/*", "arn:aws:s3:::data/subpath/*"] {
        let stmt = deny_insecure_transport(json!(["arn:aws:s3:::data", objects]));
        assert_eq!(
            outcome(
                ids::RULE_S3_SSL_REQUESTS_ONLY,
                vec![named_bucket(), policy_for("Policy", "Data", vec![stmt])]
            ),
            NonCompliant,
            "{objects}"
        );
    }
}

#[test]
fn ssl_broad_resource_wildcards_are_non_compliant() {
    for resources in [
        json!(["arn:aws:s3:::data*"]),
        json!(["arn:aws:s3:::dat*"]),
        json!(["arn:aws:s3:::*"]),
        json!("*"),
        json!(["arn:aws:s3:::data", "arn:aws:s3:::data*"]),
    ] {
        let stmt = deny_insecure_transport(resources.clone());
        assert_eq!(
            outcome(
                ids::RULE_S3_SSL_REQUESTS_ONLY,
                vec![named_bucket(), policy_for("Policy", "Data", vec![stmt])]
            ),
            NonCompliant,
            "{resources}"
        );
    }
}

#[test]
fn ssl_service_or_federated_wildcard_is_not_any_principal() {
    for principal in [json!({"Service": "*"}), json!({"Federated": "*"})] {
        let mut stmt =
            deny_insecure_transport(json!(["arn:aws:s3:::data", "arn:aws:s3:::data/*"]));
        stmt["Principal"] = principal.clone();
        assert_eq!(
            outcome(
                ids::RULE_S3_SSL_REQUESTS_ONLY,
                vec![named_bucket(), policy_for("Policy", "Data", vec![stmt])]
            ),
            NonCompliant,
            "{principal}"
        );
    }
}

#[test]
fn ssl_get_object_only_is_non_compliant() {
    let mut stmt = deny_insecure_transport(json!(["arn:aws:s3:::data", "arn:aws:s3:::data/*"]));
    stmt["Action"] = json!("s3:getObject");
    assert_eq!(
        outcome(
            ids::RULE_S3_SSL_REQUESTS_ONLY,
            vec![named_bucket(), policy_for("Policy", "Data", vec![stmt])]
        ),
        NonCompliant
    );
}

#[test]
fn ssl_without_policy_is_non_compliant() {
    assert_eq!(
        outcome(ids::RULE_S3_SSL_REQUESTS_ONLY, vec![named_bucket()]),
        NonCompliant
    );
}

#[test]
fn ssl_policy_for_missing_or_other_bucket_does_not_apply() {
    let stmt = deny_insecure_transport(json!(["arn:aws:s3:::data", "arn:aws:s3:::data/*"]));
    let dangling = policy_for("Dangling", "Gone", vec![stmt.clone()]);
    let mut other = policy_for("Other", "Data", vec![stmt]);
    other
        .properties
        .insert("Bucket".to_string(), crate::test_support::attr(json!("other")));

    assert_eq!(
        outcome(
            ids::RULE_S3_SSL_REQUESTS_ONLY,
            vec![named_bucket(), dangling, other]
        ),
        NonCompliant
    );
}

#[test]
fn ssl_with_joined_resources_and_resolved_name_is_compliant() {
    let stmt = deny_insecure_transport(json!([
        {"Fn::GetAtt": ["Data", "Arn"]},
        {"Fn::Join": ["", [{"Fn::GetAtt": ["Data", "Arn"]}, "/*"]]}
    ]));
    let policy = crate::test_support::bucket_policy(
        "Policy",
        json!({
            "Bucket": "data",
            "PolicyDocument": {"Statement": [stmt]}
        }),
    );
    assert_eq!(
        outcome(ids::RULE_S3_SSL_REQUESTS_ONLY, vec![named_bucket(), policy]),
        Compliant
    );
}

#[test]
fn reference_cycle_fails_closed() {
    let a = bucket(
        "A",
        json!({"BucketName": {"Ref": "B"}, "VersioningConfiguration": {"Status": {"Ref": "B"}}}),
    );
    let b = bucket("B", json!({"BucketName": {"Ref": "A"}}));
    let stmt = deny_insecure_transport(json!("*"));

    assert_eq!(
        outcome(ids::RULE_S3_VERSIONING_ENABLED, vec![a.clone(), b.clone()]),
        NonCompliant
    );
    assert_eq!(
        outcome(
            ids::RULE_S3_SSL_REQUESTS_ONLY,
            vec![a, b, policy_for("Policy", "A", vec![stmt])]
        ),
        NonCompliant
    );
}

#[test]
fn notebook_vpc_and_internet_access() {
    let in_vpc = ids::RULE_SAGEMAKER_NOTEBOOK_IN_VPC;
    let no_internet = ids::RULE_SAGEMAKER_NOTEBOOK_NO_DIRECT_INTERNET_ACCESS;

    let placed = notebook(
        "Nb",
        json!({"SubnetId": "subnet-123", "DirectInternetAccess": "Disabled"}),
    );
    assert_eq!(outcome(in_vpc, vec![placed.clone()]), Compliant);
    assert_eq!(outcome(no_internet, vec![placed]), Compliant);

    let open = notebook("Nb", json!({"SubnetId": "subnet-123", "DirectInternetAccess": "Enabled"}));
    assert_eq!(outcome(no_internet, vec![open]), NonCompliant);

    let unplaced = notebook("Nb", json!({"DirectInternetAccess": "Disabled"}));
    assert_eq!(outcome(in_vpc, vec![unplaced.clone()]), NonCompliant);
    assert_eq!(outcome(no_internet, vec![unplaced]), NonCompliant);
}

#[test]
fn kms_encryption_with_aws_managed_key_is_non_compliant() {
    let rule = ids::RULE_S3_DEFAULT_ENCRYPTION_KMS;
    for key in [
        "alias/aws/s3",
        "arn:aws:kms:us-east-1:111122223333:alias/aws/s3",
    ] {
        assert_eq!(
            bucket_outcome(
                rule,
                encryption(json!({"SSEAlgorithm": "aws:kms", "KMSMasterKeyID": key}))
            ),
            NonCompliant,
            "{key}"
        );
    }
    for key in [
        "alias/data-key",
        "arn:aws:kms:us-east-1:111122223333:key/1234abcd",
    ] {
        assert_eq!(
            bucket_outcome(
                rule,
                encryption(json!({"SSEAlgorithm": "aws:kms", "KMSMasterKeyID": key}))
            ),
            Compliant,
            "{key}"
        );
    }
}

#[test]
fn kms_keys_on_sagemaker_resources() {
    let nb_rule = ids::RULE_SAGEMAKER_NOTEBOOK_KMS_KEY_CONFIGURED;
    let ec_rule = ids::RULE_SAGEMAKER_ENDPOINT_CONFIG_KMS_KEY_CONFIGURED;

    assert_eq!(
        outcome(nb_rule, vec![notebook("Nb", json!({"KmsKeyId": "alias/nb"}))]),
        Compliant
    );
    assert_eq!(outcome(nb_rule, vec![notebook("Nb", json!({}))]), NonCompliant);
    assert_eq!(
        outcome(
            ec_rule,
            vec![
                endpoint_config("Ec", json!({"KmsKeyId": {"Ref": "Key"}})),
                node("AWS::KMS::Key", "Key", json!({}))
            ]
        ),
        Compliant
    );
    assert_eq!(
        outcome(ec_rule, vec![endpoint_config("Ec", json!({"KmsKeyId": {"Ref": "Gone"}}))]),
        NonCompliant
    );
    assert_eq!(
        outcome(nb_rule, vec![endpoint_config("Ec", json!({}))]),
        NotApplicable
    );
}

#[test]
fn search_domain_vpc_placement() {
    let rule = ids::RULE_OPENSEARCH_IN_VPC_ONLY;
    assert_eq!(
        outcome(
            rule,
            vec![search_domain("Search", json!({"VPCOptions": {"SubnetIds": ["subnet-1"]}}))]
        ),
        Compliant
    );
    assert_eq!(
        outcome(
            rule,
            vec![search_domain("Search", json!({"VPCOptions": {"SubnetIds": [""]}}))]
        ),
        NonCompliant
    );
    assert_eq!(
        outcome(
            rule,
            vec![search_domain("Search", json!({"VPCOptions": {"SubnetIds": []}}))]
        ),
        NonCompliant
    );
    assert_eq!(
        outcome(
            rule,
            vec![node(
                "AWS::Elasticsearch::Domain",
                "Legacy",
                json!({"VPCOptions": {"SubnetIds": [{"Ref": "Subnet"}]}})
            )]
        ),
        NonCompliant
    );
}

#[test]
fn search_domain_encryption() {
    let at_rest = ids::RULE_OPENSEARCH_ENCRYPTED_AT_REST;
    let n2n = ids::RULE_OPENSEARCH_NODE_TO_NODE_ENCRYPTION;
    let encrypted = search_domain(
        "Search",
        json!({
            "EncryptionAtRestOptions": {"Enabled": true},
            "NodeToNodeEncryptionOptions": {"Enabled": "true"}
        }),
    );
    assert_eq!(outcome(at_rest, vec![encrypted.clone()]), Compliant);
    assert_eq!(outcome(n2n, vec![encrypted]), Compliant);

    let plain = search_domain("Search", json!({"EncryptionAtRestOptions": {"Enabled": false}}));
    assert_eq!(outcome(at_rest, vec![plain.clone()]), NonCompliant);
    assert_eq!(outcome(n2n, vec![plain]), NonCompliant);
}
