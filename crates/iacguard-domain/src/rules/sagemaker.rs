use super::values::{equals, is_non_empty_string};
use crate::model::ResourceNode;
use crate::resolve::TreeContext;

pub fn notebook_in_vpc(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    is_non_empty_string(&ctx.lookup(node, &["SubnetId"]))
}

/// `Disabled` is only accepted by the service for VPC-placed notebooks.
pub fn notebook_no_direct_internet_access(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    equals(&ctx.lookup(node, &["DirectInternetAccess"]), "Disabled") && notebook_in_vpc(node, ctx)
}

/// Shared by notebook instances and endpoint configurations.
pub fn kms_key_configured(node: &ResourceNode, ctx: &TreeContext<'_>) -> bool {
    is_non_empty_string(&ctx.lookup(node, &["KmsKeyId"]))
}
