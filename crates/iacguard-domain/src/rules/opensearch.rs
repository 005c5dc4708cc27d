use super::values::is_true;
use crate::model::{AttrValue, ResourceNode};
use crate::resolve::TreeContext;

pub fn in_vpc_only(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    let subnets = ctx.lookup(node, &["VPCOptions", "SubnetIds"]);
    subnets
        .value()
        .and_then(AttrValue::as_list)
        .is_some_and(|ids| {
            ids.iter()
                .any(|id| id.as_str().is_some_and(|s| !s.trim().is_empty()))
        })
}

pub fn encrypted_at_rest(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    is_true(&ctx.lookup(node, &["EncryptionAtRestOptions", "Enabled"]))
}

pub fn node_to_node_encryption(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    is_true(&ctx.lookup(node, &["NodeToNodeEncryptionOptions", "Enabled"]))
}
