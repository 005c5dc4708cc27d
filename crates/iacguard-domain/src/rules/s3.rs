use super::values::{equals, is_non_empty_string, is_positive, is_true};
use crate::model::{AttrValue, ResourceNode};
use crate::resolve::{Resolved, TreeContext};
use crate::statement;

const READ_ACLS: &[&str] = &["PublicRead", "PublicReadWrite", "AuthenticatedRead"];
const WRITE_ACLS: &[&str] = &["PublicReadWrite"];
const KMS_ALGORITHMS: &[&str] = &["aws:kms", "aws:kms:dsse"];
const AWS_MANAGED_ALIAS_PREFIX: &str = "alias/aws/";

pub fn default_lock_enabled(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    if !is_true(&ctx.lookup(node, &["ObjectLockEnabled"])) {
        return false;
    }
    let retention = ctx.lookup(
        node,
        &["ObjectLockConfiguration", "Rule", "DefaultRetention"],
    );
    let Some(retention) = retention.value() else {
        return false;
    };

    let mode = retention.get("Mode").and_then(AttrValue::as_str);
    let has_period = ["Days", "Years"]
        .iter()
        .any(|key| retention.get(key).is_some_and(is_positive));

    mode.is_some_and(|m| !m.is_empty()) && has_period
}

pub fn public_access_blocked(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    [
        "BlockPublicPolicy",
        "BlockPublicAcls",
        "IgnorePublicAcls",
        "RestrictPublicBuckets",
    ]
    .iter()
    .all(|flag| is_true(&ctx.lookup(node, &["PublicAccessBlockConfiguration", *flag])))
}

pub fn logging_enabled(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    ["DestinationBucketName", "LogFilePrefix"]
        .iter()
        .any(|field| is_non_empty_string(&ctx.lookup(node, &["LoggingConfiguration", *field])))
}

pub fn public_read_prohibited(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    acl_prohibits(node, ctx, READ_ACLS)
}

pub fn public_write_prohibited(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    acl_prohibits(node, ctx, WRITE_ACLS)
}

/// A `Private` or absent ACL always passes; otherwise the ACL must not be one of
/// `granting`, unless ACLs are blocked or ignored. An unresolved ACL counts as granting.
fn acl_prohibits(node: &ResourceNode, ctx: &TreeContext<'_>, granting: &[&str]) -> bool {
    let acl = ctx.lookup(node, &["AccessControl"]);
    match &acl {
        Resolved::Value(AttrValue::Null) => return true,
        Resolved::Value(AttrValue::String(s)) if s.eq_ignore_ascii_case("Private") => return true,
        _ => {}
    }

    let grants = match acl.as_str() {
        Some(s) => granting.contains(&s),
        None => acl.is_unresolved(),
    };
    if !grants {
        return true;
    }

    ["BlockPublicAcls", "IgnorePublicAcls"]
        .iter()
        .any(|flag| is_true(&ctx.lookup(node, &["PublicAccessBlockConfiguration", *flag])))
}

pub fn replication_enabled(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    let rules = ctx.lookup(node, &["ReplicationConfiguration", "Rules"]);
    let Some(rules) = rules.value().and_then(AttrValue::as_list) else {
        return false;
    };
    rules
        .iter()
        .any(|rule| rule.get("Status").and_then(AttrValue::as_str) == Some("Enabled"))
}

fn default_encryption_entries(node: &ResourceNode, ctx: &TreeContext<'_>) -> Vec<AttrValue> {
    let config = ctx.lookup(
        node,
        &["BucketEncryption", "ServerSideEncryptionConfiguration"],
    );
    match config.into_value() {
        Some(AttrValue::List(entries)) => entries
            .into_iter()
            .filter_map(|e| e.get("ServerSideEncryptionByDefault").cloned())
            .collect(),
        _ => Vec::new(),
    }
}

pub fn server_side_encryption_enabled(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    default_encryption_entries(node, ctx).iter().any(|e| {
        e.get("SSEAlgorithm")
            .and_then(AttrValue::as_str)
            .is_some_and(|a| !a.is_empty())
    })
}

pub fn default_encryption_kms(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    default_encryption_entries(node, ctx).iter().any(|e| {
        let kms = e
            .get("SSEAlgorithm")
            .and_then(AttrValue::as_str)
            .is_some_and(|a| KMS_ALGORITHMS.contains(&a));
        let key = e
            .get("KMSMasterKeyID")
            .and_then(AttrValue::as_str)
            .is_some_and(|k| !k.trim().is_empty() && !is_aws_managed_key(k));
        kms && key
    })
}

/// `alias/aws/<service>` or the same alias inside a full KMS ARN.
fn is_aws_managed_key(key: &str) -> bool {
    key.starts_with(AWS_MANAGED_ALIAS_PREFIX)
        || key.contains(&format!(":{AWS_MANAGED_ALIAS_PREFIX}"))
}

pub fn versioning_enabled(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    equals(
        &ctx.lookup(node, &["VersioningConfiguration", "Status"]),
        "Enabled",
    )
}

pub fn ssl_requests_only(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    statement::enforces_secure_transport(node, ctx)
}
