//! The predicate library and the ordered rule registry.
//!
//! A predicate returns `true` when the node does not violate the rule. Predicates are pure:
//! they read the node and, through the [`TreeContext`], the rest of its tree.

use crate::model::{ResourceKind, ResourceNode};
use crate::resolve::TreeContext;
use iacguard_types::{Severity, ids};

mod opensearch;
mod s3;
mod sagemaker;
mod values;

#[cfg(test)]
mod tests;

pub type Predicate = fn(&ResourceNode, &TreeContext<'_>) -> bool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    Compliant,
    NonCompliant,
    NotApplicable,
}

/// One registered rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub code: &'static str,
    /// Resource kinds the rule applies to; every other kind is not applicable.
    pub kinds: &'static [ResourceKind],
    pub default_severity: Severity,
    pub predicate: Predicate,
    /// Short statement of the violation, completed with the node identity by the emitter.
    pub message: &'static str,
    pub help: &'static str,
}

impl Rule {
    pub fn applies_to(&self, kind: ResourceKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn evaluate(&self, node: &ResourceNode, ctx: &TreeContext<'_>) -> RuleOutcome {
        if !self.applies_to(node.kind) {
            return RuleOutcome::NotApplicable;
        }
        if (self.predicate)(node, ctx) {
            RuleOutcome::Compliant
        } else {
            RuleOutcome::NonCompliant
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("kinds", &self.kinds)
            .field("default_severity", &self.default_severity)
            .finish_non_exhaustive()
    }
}

const BUCKET: &[ResourceKind] = &[ResourceKind::S3Bucket];
const NOTEBOOK: &[ResourceKind] = &[ResourceKind::SageMakerNotebookInstance];
const ENDPOINT_CONFIG: &[ResourceKind] = &[ResourceKind::SageMakerEndpointConfig];
const SEARCH_DOMAIN: &[ResourceKind] = &[
    ResourceKind::OpenSearchDomain,
    ResourceKind::ElasticsearchDomain,
];

static RULES: &[Rule] = &[
    Rule {
        id: ids::RULE_S3_DEFAULT_LOCK_ENABLED,
        code: ids::CODE_OBJECT_LOCK_DISABLED,
        kinds: BUCKET,
        default_severity: Severity::Warning,
        predicate: s3::default_lock_enabled,
        message: "does not enable object lock with a default retention",
        help: "Set ObjectLockEnabled and an ObjectLockConfiguration.Rule.DefaultRetention with a Mode and Days or Years.",
    },
    Rule {
        id: ids::RULE_S3_PUBLIC_ACCESS_BLOCKED,
        code: ids::CODE_PUBLIC_ACCESS_NOT_BLOCKED,
        kinds: BUCKET,
        default_severity: Severity::Error,
        predicate: s3::public_access_blocked,
        message: "does not block all public access",
        help: "Set all four PublicAccessBlockConfiguration flags to true.",
    },
    Rule {
        id: ids::RULE_S3_LOGGING_ENABLED,
        code: ids::CODE_ACCESS_LOGGING_DISABLED,
        kinds: BUCKET,
        default_severity: Severity::Warning,
        predicate: s3::logging_enabled,
        message: "has server access logging disabled",
        help: "Add a LoggingConfiguration with a DestinationBucketName or LogFilePrefix.",
    },
    Rule {
        id: ids::RULE_S3_PUBLIC_READ_PROHIBITED,
        code: ids::CODE_PUBLIC_READ_ACL,
        kinds: BUCKET,
        default_severity: Severity::Error,
        predicate: s3::public_read_prohibited,
        message: "grants public read access through its ACL",
        help: "Use a private AccessControl or enable BlockPublicAcls / IgnorePublicAcls.",
    },
    Rule {
        id: ids::RULE_S3_PUBLIC_WRITE_PROHIBITED,
        code: ids::CODE_PUBLIC_WRITE_ACL,
        kinds: BUCKET,
        default_severity: Severity::Error,
        predicate: s3::public_write_prohibited,
        message: "grants public write access through its ACL",
        help: "Remove PublicReadWrite or enable BlockPublicAcls / IgnorePublicAcls.",
    },
    Rule {
        id: ids::RULE_S3_REPLICATION_ENABLED,
        code: ids::CODE_REPLICATION_DISABLED,
        kinds: BUCKET,
        default_severity: Severity::Warning,
        predicate: s3::replication_enabled,
        message: "has no enabled replication rule",
        help: "Add a ReplicationConfiguration with at least one rule whose Status is Enabled.",
    },
    Rule {
        id: ids::RULE_S3_SERVER_SIDE_ENCRYPTION_ENABLED,
        code: ids::CODE_ENCRYPTION_MISSING,
        kinds: BUCKET,
        default_severity: Severity::Error,
        predicate: s3::server_side_encryption_enabled,
        message: "has no default server-side encryption",
        help: "Add BucketEncryption with a ServerSideEncryptionByDefault.SSEAlgorithm.",
    },
    Rule {
        id: ids::RULE_S3_DEFAULT_ENCRYPTION_KMS,
        code: ids::CODE_NOT_KMS_ENCRYPTED,
        kinds: BUCKET,
        default_severity: Severity::Warning,
        predicate: s3::default_encryption_kms,
        message: "is not encrypted by default with a KMS key",
        help: "Use SSEAlgorithm aws:kms (or aws:kms:dsse) together with a KMSMasterKeyID.",
    },
    Rule {
        id: ids::RULE_S3_VERSIONING_ENABLED,
        code: ids::CODE_VERSIONING_DISABLED,
        kinds: BUCKET,
        default_severity: Severity::Warning,
        predicate: s3::versioning_enabled,
        message: "has versioning disabled",
        help: "Set VersioningConfiguration.Status to Enabled.",
    },
    Rule {
        id: ids::RULE_S3_SSL_REQUESTS_ONLY,
        code: ids::CODE_TLS_NOT_ENFORCED,
        kinds: BUCKET,
        default_severity: Severity::Error,
        predicate: s3::ssl_requests_only,
        message: "does not deny requests made without TLS",
        help: "Attach a bucket policy denying s3:* to any principal when aws:SecureTransport is false, on the bucket ARN and ARN/*.",
    },
    Rule {
        id: ids::RULE_SAGEMAKER_NOTEBOOK_IN_VPC,
        code: ids::CODE_NOTEBOOK_OUTSIDE_VPC,
        kinds: NOTEBOOK,
        default_severity: Severity::Error,
        predicate: sagemaker::notebook_in_vpc,
        message: "is not placed in a VPC",
        help: "Set SubnetId (and SecurityGroupIds) on the notebook instance.",
    },
    Rule {
        id: ids::RULE_SAGEMAKER_NOTEBOOK_NO_DIRECT_INTERNET_ACCESS,
        code: ids::CODE_DIRECT_INTERNET_ACCESS,
        kinds: NOTEBOOK,
        default_severity: Severity::Error,
        predicate: sagemaker::notebook_no_direct_internet_access,
        message: "allows direct internet access",
        help: "Place the notebook in a VPC and set DirectInternetAccess to Disabled.",
    },
    Rule {
        id: ids::RULE_SAGEMAKER_NOTEBOOK_KMS_KEY_CONFIGURED,
        code: ids::CODE_NOTEBOOK_KMS_KEY_MISSING,
        kinds: NOTEBOOK,
        default_severity: Severity::Warning,
        predicate: sagemaker::kms_key_configured,
        message: "has no KMS key configured",
        help: "Set KmsKeyId on the notebook instance.",
    },
    Rule {
        id: ids::RULE_SAGEMAKER_ENDPOINT_CONFIG_KMS_KEY_CONFIGURED,
        code: ids::CODE_ENDPOINT_CONFIG_KMS_KEY_MISSING,
        kinds: ENDPOINT_CONFIG,
        default_severity: Severity::Warning,
        predicate: sagemaker::kms_key_configured,
        message: "has no KMS key configured",
        help: "Set KmsKeyId on the endpoint configuration.",
    },
    Rule {
        id: ids::RULE_OPENSEARCH_IN_VPC_ONLY,
        code: ids::CODE_DOMAIN_OUTSIDE_VPC,
        kinds: SEARCH_DOMAIN,
        default_severity: Severity::Error,
        predicate: opensearch::in_vpc_only,
        message: "is reachable outside a VPC",
        help: "Set VPCOptions.SubnetIds on the domain.",
    },
    Rule {
        id: ids::RULE_OPENSEARCH_ENCRYPTED_AT_REST,
        code: ids::CODE_DOMAIN_UNENCRYPTED_AT_REST,
        kinds: SEARCH_DOMAIN,
        default_severity: Severity::Error,
        predicate: opensearch::encrypted_at_rest,
        message: "is not encrypted at rest",
        help: "Set EncryptionAtRestOptions.Enabled to true.",
    },
    Rule {
        id: ids::RULE_OPENSEARCH_NODE_TO_NODE_ENCRYPTION,
        code: ids::CODE_NODE_TO_NODE_UNENCRYPTED,
        kinds: SEARCH_DOMAIN,
        default_severity: Severity::Warning,
        predicate: opensearch::node_to_node_encryption,
        message: "does not encrypt node-to-node traffic",
        help: "Set NodeToNodeEncryptionOptions.Enabled to true.",
    },
];

/// Every rule, in evaluation order.
pub fn registry() -> &'static [Rule] {
    RULES
}

pub fn find(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.id == id)
}
