//! Stable identifiers for rules and finding codes.
//!
//! `rule_id` is a dotted namespace (`<service>.<rule>`). `code` is a short snake_case discriminator.

// Rules: s3
pub const RULE_S3_DEFAULT_LOCK_ENABLED: &str = "s3.default_lock_enabled";
pub const RULE_S3_PUBLIC_ACCESS_BLOCKED: &str = "s3.public_access_blocked";
pub const RULE_S3_LOGGING_ENABLED: &str = "s3.logging_enabled";
pub const RULE_S3_PUBLIC_READ_PROHIBITED: &str = "s3.public_read_prohibited";
pub const RULE_S3_PUBLIC_WRITE_PROHIBITED: &str = "s3.public_write_prohibited";
pub const RULE_S3_REPLICATION_ENABLED: &str = "s3.replication_enabled";
pub const RULE_S3_SERVER_SIDE_ENCRYPTION_ENABLED: &str = "s3.server_side_encryption_enabled";
pub const RULE_S3_DEFAULT_ENCRYPTION_KMS: &str = "s3.default_encryption_kms";
pub const RULE_S3_VERSIONING_ENABLED: &str = "s3.versioning_enabled";
pub const RULE_S3_SSL_REQUESTS_ONLY: &str = "s3.ssl_requests_only";

// Rules: sagemaker
pub const RULE_SAGEMAKER_NOTEBOOK_IN_VPC: &str = "sagemaker.notebook_in_vpc";
pub const RULE_SAGEMAKER_NOTEBOOK_NO_DIRECT_INTERNET_ACCESS: &str =
    "sagemaker.notebook_no_direct_internet_access";
pub const RULE_SAGEMAKER_NOTEBOOK_KMS_KEY_CONFIGURED: &str = "sagemaker.notebook_kms_key_configured";
pub const RULE_SAGEMAKER_ENDPOINT_CONFIG_KMS_KEY_CONFIGURED: &str =
    "sagemaker.endpoint_config_kms_key_configured";

// Rules: opensearch
pub const RULE_OPENSEARCH_IN_VPC_ONLY: &str = "opensearch.in_vpc_only";
pub const RULE_OPENSEARCH_ENCRYPTED_AT_REST: &str = "opensearch.encrypted_at_rest";
pub const RULE_OPENSEARCH_NODE_TO_NODE_ENCRYPTION: &str = "opensearch.node_to_node_encryption";

// Codes: s3
pub const CODE_OBJECT_LOCK_DISABLED: &str = "object_lock_disabled";
pub const CODE_PUBLIC_ACCESS_NOT_BLOCKED: &str = "public_access_not_blocked";
pub const CODE_ACCESS_LOGGING_DISABLED: &str = "access_logging_disabled";
pub const CODE_PUBLIC_READ_ACL: &str = "public_read_acl";
pub const CODE_PUBLIC_WRITE_ACL: &str = "public_write_acl";
pub const CODE_REPLICATION_DISABLED: &str = "replication_disabled";
pub const CODE_ENCRYPTION_MISSING: &str = "encryption_missing";
pub const CODE_NOT_KMS_ENCRYPTED: &str = "not_kms_encrypted";
pub const CODE_VERSIONING_DISABLED: &str = "versioning_disabled";
pub const CODE_TLS_NOT_ENFORCED: &str = "tls_not_enforced";

// Codes: sagemaker
pub const CODE_NOTEBOOK_OUTSIDE_VPC: &str = "notebook_outside_vpc";
pub const CODE_DIRECT_INTERNET_ACCESS: &str = "direct_internet_access";
pub const CODE_NOTEBOOK_KMS_KEY_MISSING: &str = "notebook_kms_key_missing";
pub const CODE_ENDPOINT_CONFIG_KMS_KEY_MISSING: &str = "endpoint_config_kms_key_missing";

// Codes: opensearch
pub const CODE_DOMAIN_OUTSIDE_VPC: &str = "domain_outside_vpc";
pub const CODE_DOMAIN_UNENCRYPTED_AT_REST: &str = "domain_unencrypted_at_rest";
pub const CODE_NODE_TO_NODE_UNENCRYPTED: &str = "node_to_node_unencrypted";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
