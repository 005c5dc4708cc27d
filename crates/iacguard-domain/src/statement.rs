//! Decides whether a bucket is reachable only over TLS, from the bucket policies that
//! attach to it in the same tree.

use crate::iam::{Effect, PolicyDocument, PolicyStatement};
use crate::model::{AttrValue, Reference, ResourceKind, ResourceNode};
use crate::resolve::{Resolved, TreeContext};

const SECURE_TRANSPORT_KEY: &str = "aws:SecureTransport";
const BOOL_OPERATOR: &str = "Bool";

/// Bucket-policy nodes whose `Bucket` names this bucket, directly or by resolved value.
pub fn attached_policies<'t>(bucket: &ResourceNode, ctx: &TreeContext<'t>) -> Vec<&'t ResourceNode> {
    let bucket_ref = ctx.resolve_reference(&Reference::to_ref(&bucket.id));

    ctx.tree()
        .nodes_of_kind(ResourceKind::S3BucketPolicy)
        .filter(|policy| match policy.property("Bucket") {
            Some(AttrValue::Ref(r)) if r.is_ref() && r.target == bucket.id => true,
            Some(raw) => match (ctx.resolve(raw), &bucket_ref) {
                (Resolved::Value(AttrValue::String(a)), Resolved::Value(AttrValue::String(b))) => {
                    a == *b
                }
                _ => false,
            },
            None => false,
        })
        .collect()
}

/// True iff some attached policy carries a statement that denies every non-TLS request
/// against both the bucket and its objects.
pub fn enforces_secure_transport(bucket: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    let Resolved::Value(AttrValue::String(arn)) =
        ctx.resolve_reference(&Reference::new(&bucket.id, "Arn"))
    else {
        return false;
    };
    let objects = format!("{arn}/*");

    let policies = attached_policies(bucket, ctx);
    if policies.is_empty() {
        tracing::debug!(bucket = %bucket.id, "no bucket policy attached");
        return false;
    }

    policies.iter().any(|policy| {
        let Some(raw) = policy.property("PolicyDocument") else {
            return false;
        };
        let Some(document) = ctx.resolve(raw).into_value() else {
            return false;
        };
        PolicyDocument::from_value(&document)
            .statements
            .iter()
            .any(|stmt| denies_insecure_transport(stmt) && covers_all(stmt, &[&arn, &objects]))
    })
}

fn denies_insecure_transport(stmt: &PolicyStatement) -> bool {
    stmt.effect == Effect::Deny
        && stmt.has_any_principal()
        && stmt
            .condition_values(BOOL_OPERATOR, SECURE_TRANSPORT_KEY)
            .iter()
            .any(|v| v.eq_ignore_ascii_case("false"))
        && stmt
            .actions
            .iter()
            .any(|a| a == "*" || a.eq_ignore_ascii_case("s3:*"))
}

/// Every target must appear verbatim among the statement's resources. The object target
/// is `<ARN>/*`, so the only wildcard that counts is `/*` directly after the bucket ARN;
/// broader patterns such as `<ARN>*`, `arn:aws:s3:::*` or `*` do not.
fn covers_all(stmt: &PolicyStatement, targets: &[&str]) -> bool {
    targets
        .iter()
        .all(|target| stmt.resources.iter().any(|pattern| pattern == target))
}
