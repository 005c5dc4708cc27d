//! Explain registry for rules and codes.
//!
//! Maps rule IDs and codes to human-readable explanations with remediation guidance.
//! Every rule has exactly one code, so both identifiers resolve to the same entry.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after template snippets.
    pub examples: ExamplePair,
}

/// Before and after template snippets.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Resource properties that trigger a finding.
    pub before: &'static str,
    /// Resource properties that pass the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_S3_DEFAULT_LOCK_ENABLED | ids::CODE_OBJECT_LOCK_DISABLED => {
            Some(explain_default_lock_enabled())
        }
        ids::RULE_S3_PUBLIC_ACCESS_BLOCKED | ids::CODE_PUBLIC_ACCESS_NOT_BLOCKED => {
            Some(explain_public_access_blocked())
        }
        ids::RULE_S3_LOGGING_ENABLED | ids::CODE_ACCESS_LOGGING_DISABLED => {
            Some(explain_logging_enabled())
        }
        ids::RULE_S3_PUBLIC_READ_PROHIBITED | ids::CODE_PUBLIC_READ_ACL => {
            Some(explain_public_read_prohibited())
        }
        ids::RULE_S3_PUBLIC_WRITE_PROHIBITED | ids::CODE_PUBLIC_WRITE_ACL => {
            Some(explain_public_write_prohibited())
        }
        ids::RULE_S3_REPLICATION_ENABLED | ids::CODE_REPLICATION_DISABLED => {
            Some(explain_replication_enabled())
        }
        ids::RULE_S3_SERVER_SIDE_ENCRYPTION_ENABLED | ids::CODE_ENCRYPTION_MISSING => {
            Some(explain_server_side_encryption())
        }
        ids::RULE_S3_DEFAULT_ENCRYPTION_KMS | ids::CODE_NOT_KMS_ENCRYPTED => {
            Some(explain_default_encryption_kms())
        }
        ids::RULE_S3_VERSIONING_ENABLED | ids::CODE_VERSIONING_DISABLED => {
            Some(explain_versioning_enabled())
        }
        ids::RULE_S3_SSL_REQUESTS_ONLY | ids::CODE_TLS_NOT_ENFORCED => {
            Some(explain_ssl_requests_only())
        }
        ids::RULE_SAGEMAKER_NOTEBOOK_IN_VPC | ids::CODE_NOTEBOOK_OUTSIDE_VPC => {
            Some(explain_notebook_in_vpc())
        }
        ids::RULE_SAGEMAKER_NOTEBOOK_NO_DIRECT_INTERNET_ACCESS | ids::CODE_DIRECT_INTERNET_ACCESS => {
            Some(explain_notebook_no_direct_internet_access())
        }
        ids::RULE_SAGEMAKER_NOTEBOOK_KMS_KEY_CONFIGURED | ids::CODE_NOTEBOOK_KMS_KEY_MISSING => {
            Some(explain_notebook_kms_key())
        }
        ids::RULE_SAGEMAKER_ENDPOINT_CONFIG_KMS_KEY_CONFIGURED
        | ids::CODE_ENDPOINT_CONFIG_KMS_KEY_MISSING => Some(explain_endpoint_config_kms_key()),
        ids::RULE_OPENSEARCH_IN_VPC_ONLY | ids::CODE_DOMAIN_OUTSIDE_VPC => {
            Some(explain_opensearch_in_vpc())
        }
        ids::RULE_OPENSEARCH_ENCRYPTED_AT_REST | ids::CODE_DOMAIN_UNENCRYPTED_AT_REST => {
            Some(explain_opensearch_encrypted_at_rest())
        }
        ids::RULE_OPENSEARCH_NODE_TO_NODE_ENCRYPTION | ids::CODE_NODE_TO_NODE_UNENCRYPTED => {
            Some(explain_opensearch_node_to_node())
        }
        ids::RULE_TOOL_RUNTIME | ids::CODE_RUNTIME_ERROR => Some(explain_tool_runtime()),
        _ => None,
    }
}

/// List all known rule IDs.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_S3_DEFAULT_LOCK_ENABLED,
        ids::RULE_S3_PUBLIC_ACCESS_BLOCKED,
        ids::RULE_S3_LOGGING_ENABLED,
        ids::RULE_S3_PUBLIC_READ_PROHIBITED,
        ids::RULE_S3_PUBLIC_WRITE_PROHIBITED,
        ids::RULE_S3_REPLICATION_ENABLED,
        ids::RULE_S3_SERVER_SIDE_ENCRYPTION_ENABLED,
        ids::RULE_S3_DEFAULT_ENCRYPTION_KMS,
        ids::RULE_S3_VERSIONING_ENABLED,
        ids::RULE_S3_SSL_REQUESTS_ONLY,
        ids::RULE_SAGEMAKER_NOTEBOOK_IN_VPC,
        ids::RULE_SAGEMAKER_NOTEBOOK_NO_DIRECT_INTERNET_ACCESS,
        ids::RULE_SAGEMAKER_NOTEBOOK_KMS_KEY_CONFIGURED,
        ids::RULE_SAGEMAKER_ENDPOINT_CONFIG_KMS_KEY_CONFIGURED,
        ids::RULE_OPENSEARCH_IN_VPC_ONLY,
        ids::RULE_OPENSEARCH_ENCRYPTED_AT_REST,
        ids::RULE_OPENSEARCH_NODE_TO_NODE_ENCRYPTION,
        ids::RULE_TOOL_RUNTIME,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_OBJECT_LOCK_DISABLED,
        ids::CODE_PUBLIC_ACCESS_NOT_BLOCKED,
        ids::CODE_ACCESS_LOGGING_DISABLED,
        ids::CODE_PUBLIC_READ_ACL,
        ids::CODE_PUBLIC_WRITE_ACL,
        ids::CODE_REPLICATION_DISABLED,
        ids::CODE_ENCRYPTION_MISSING,
        ids::CODE_NOT_KMS_ENCRYPTED,
        ids::CODE_VERSIONING_DISABLED,
        ids::CODE_TLS_NOT_ENFORCED,
        ids::CODE_NOTEBOOK_OUTSIDE_VPC,
        ids::CODE_DIRECT_INTERNET_ACCESS,
        ids::CODE_NOTEBOOK_KMS_KEY_MISSING,
        ids::CODE_ENDPOINT_CONFIG_KMS_KEY_MISSING,
        ids::CODE_DOMAIN_OUTSIDE_VPC,
        ids::CODE_DOMAIN_UNENCRYPTED_AT_REST,
        ids::CODE_NODE_TO_NODE_UNENCRYPTED,
        ids::CODE_RUNTIME_ERROR,
    ]
}

// --- s3 ---

fn explain_default_lock_enabled() -> Explanation {
    Explanation {
        title: "S3 Object Lock Enabled",
        description: "\
Detects buckets that do not enable Object Lock with a default retention rule.

Object Lock stores objects using a write-once-read-many model. Without a default
retention mode and period, objects can be deleted or overwritten before any retention
obligation is met. Both the lock flag and a retention rule (mode plus days or years)
are required.",
        remediation: "\
Set `ObjectLockEnabled: true` and add `ObjectLockConfiguration.Rule.DefaultRetention`
with a `Mode` (`GOVERNANCE` or `COMPLIANCE`) and a positive `Days` or `Years`.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "ObjectLockEnabled": true,
    "ObjectLockConfiguration": {
      "ObjectLockEnabled": "Enabled",
      "Rule": { "DefaultRetention": { "Mode": "GOVERNANCE", "Days": 30 } }
    }
  }
}"#,
        },
    }
}

fn explain_public_access_blocked() -> Explanation {
    Explanation {
        title: "S3 Public Access Blocked",
        description: "\
Detects buckets whose public access block does not set all four flags.

`BlockPublicAcls`, `BlockPublicPolicy`, `IgnorePublicAcls` and `RestrictPublicBuckets`
each close a different path to public exposure. Leaving any one of them unset or
false re-opens that path.",
        remediation: "\
Set all four flags of `PublicAccessBlockConfiguration` to `true`.",
        examples: ExamplePair {
            before: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "PublicAccessBlockConfiguration": { "BlockPublicAcls": true, "BlockPublicPolicy": false }
  }
}"#,
            after: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "PublicAccessBlockConfiguration": {
      "BlockPublicAcls": true,
      "BlockPublicPolicy": true,
      "IgnorePublicAcls": true,
      "RestrictPublicBuckets": true
    }
  }
}"#,
        },
    }
}

fn explain_logging_enabled() -> Explanation {
    Explanation {
        title: "S3 Server Access Logging Enabled",
        description: "\
Detects buckets without server access logging.

Access logs record every request made against the bucket and are the primary source for
security audits and incident response.",
        remediation: "\
Add a `LoggingConfiguration` with a `DestinationBucketName` (and optionally a
`LogFilePrefix`).",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "LoggingConfiguration": {
      "DestinationBucketName": { "Ref": "AccessLogs" },
      "LogFilePrefix": "data/"
    }
  }
}"#,
        },
    }
}

fn explain_public_read_prohibited() -> Explanation {
    Explanation {
        title: "S3 Public Read Prohibited",
        description: "\
Detects buckets whose canned ACL grants read access to everyone or to any
authenticated AWS user (`PublicRead`, `PublicReadWrite`, `AuthenticatedRead`).

The grant is not reported when the public access block sets `BlockPublicAcls` or
`IgnorePublicAcls`, because either flag neutralizes the ACL. A `Private` ACL is never
reported.",
        remediation: "\
Remove the public canned ACL (or set it to `Private`). Serve public content through a
CDN with origin access control instead.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": { "AccessControl": "PublicRead" } }"#,
            after: r#"{ "Type": "AWS::S3::Bucket", "Properties": { "AccessControl": "Private" } }"#,
        },
    }
}

fn explain_public_write_prohibited() -> Explanation {
    Explanation {
        title: "S3 Public Write Prohibited",
        description: "\
Detects buckets whose canned ACL grants write access to everyone (`PublicReadWrite`).

Anyone could upload, overwrite or delete objects. The grant is not reported when the
public access block sets `BlockPublicAcls` or `IgnorePublicAcls`. A `Private` ACL is
never reported.",
        remediation: "\
Remove the `PublicReadWrite` canned ACL and grant write access to specific principals
through a bucket policy.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": { "AccessControl": "PublicReadWrite" } }"#,
            after: r#"{ "Type": "AWS::S3::Bucket", "Properties": { "AccessControl": "Private" } }"#,
        },
    }
}

fn explain_replication_enabled() -> Explanation {
    Explanation {
        title: "S3 Replication Enabled",
        description: "\
Detects buckets without at least one enabled replication rule.

Cross-region or cross-account replication protects against regional outages and
accidental deletion. A replication configuration whose rules are all `Disabled` does
not replicate anything.",
        remediation: "\
Add a `ReplicationConfiguration` with a `Role` and at least one rule whose `Status` is
`Enabled`.",
        examples: ExamplePair {
            before: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "ReplicationConfiguration": { "Role": "arn:aws:iam::111122223333:role/replication", "Rules": [ { "Status": "Disabled" } ] }
  }
}"#,
            after: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "ReplicationConfiguration": {
      "Role": "arn:aws:iam::111122223333:role/replication",
      "Rules": [ { "Status": "Enabled", "Destination": { "Bucket": "arn:aws:s3:::replica" } } ]
    }
  }
}"#,
        },
    }
}

fn explain_server_side_encryption() -> Explanation {
    Explanation {
        title: "S3 Server-Side Encryption Enabled",
        description: "\
Detects buckets that do not declare default server-side encryption.

Any algorithm satisfies this rule; see `s3.default_encryption_kms` for the stricter
customer-managed key requirement.",
        remediation: "\
Add `BucketEncryption.ServerSideEncryptionConfiguration` with a
`ServerSideEncryptionByDefault.SSEAlgorithm` (`AES256` or `aws:kms`).",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "BucketEncryption": {
      "ServerSideEncryptionConfiguration": [
        { "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" } }
      ]
    }
  }
}"#,
        },
    }
}

fn explain_default_encryption_kms() -> Explanation {
    Explanation {
        title: "S3 Default Encryption Uses KMS",
        description: "\
Detects buckets whose default encryption does not use a customer-managed KMS key.

S3-managed keys (`AES256`) and the AWS-managed `aws/s3` key cannot be scoped with a key
policy or disabled independently. The rule requires an `aws:kms` (or `aws:kms:dsse`)
algorithm together with an explicit `KMSMasterKeyID`.",
        remediation: "\
Set `SSEAlgorithm` to `aws:kms` and reference a customer-managed key in
`KMSMasterKeyID`.",
        examples: ExamplePair {
            before: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "BucketEncryption": {
      "ServerSideEncryptionConfiguration": [
        { "ServerSideEncryptionByDefault": { "SSEAlgorithm": "AES256" } }
      ]
    }
  }
}"#,
            after: r#"{
  "Type": "AWS::S3::Bucket",
  "Properties": {
    "BucketEncryption": {
      "ServerSideEncryptionConfiguration": [
        {
          "ServerSideEncryptionByDefault": {
            "SSEAlgorithm": "aws:kms",
            "KMSMasterKeyID": { "Fn::GetAtt": ["DataKey", "Arn"] }
          }
        }
      ]
    }
  }
}"#,
        },
    }
}

fn explain_versioning_enabled() -> Explanation {
    Explanation {
        title: "S3 Versioning Enabled",
        description: "\
Detects buckets without versioning, or with versioning `Suspended`.

Versioning keeps prior object versions so overwrites and deletions can be recovered.",
        remediation: "\
Set `VersioningConfiguration.Status` to `Enabled`.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": { "VersioningConfiguration": { "Status": "Suspended" } } }"#,
            after: r#"{ "Type": "AWS::S3::Bucket", "Properties": { "VersioningConfiguration": { "Status": "Enabled" } } }"#,
        },
    }
}

fn explain_ssl_requests_only() -> Explanation {
    Explanation {
        title: "S3 SSL Requests Only",
        description: "\
Detects buckets whose bucket policy does not deny requests made without TLS.

A qualifying statement must:
- have `Effect: Deny`
- apply to any principal (`*`)
- deny `s3:*` (or `*`); narrower actions leave other operations reachable
- carry the condition `Bool` / `aws:SecureTransport` = `false`
- cover both the bucket ARN and `<bucket ARN>/*`

Buckets without any attached policy are reported.",
        remediation: "\
Attach a bucket policy with a statement denying all S3 actions when
`aws:SecureTransport` is false, scoped to the bucket and its objects.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::S3::Bucket", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::S3::BucketPolicy",
  "Properties": {
    "Bucket": { "Ref": "Data" },
    "PolicyDocument": {
      "Statement": [
        {
          "Effect": "Deny",
          "Principal": { "AWS": "*" },
          "Action": "s3:*",
          "Condition": { "Bool": { "aws:SecureTransport": "false" } },
          "Resource": [
            { "Fn::GetAtt": ["Data", "Arn"] },
            { "Fn::Join": ["", [{ "Fn::GetAtt": ["Data", "Arn"] }, "/*"]] }
          ]
        }
      ]
    }
  }
}"#,
        },
    }
}

// --- sagemaker ---

fn explain_notebook_in_vpc() -> Explanation {
    Explanation {
        title: "SageMaker Notebook In VPC",
        description: "\
Detects notebook instances that are not placed in a VPC subnet.

Without a `SubnetId` the notebook runs in a service-managed network with no security
groups or flow logs under your control.",
        remediation: "\
Set `SubnetId` (and `SecurityGroupIds`) on the notebook instance.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::SageMaker::NotebookInstance", "Properties": { "InstanceType": "ml.t3.medium" } }"#,
            after: r#"{
  "Type": "AWS::SageMaker::NotebookInstance",
  "Properties": { "InstanceType": "ml.t3.medium", "SubnetId": { "Ref": "PrivateSubnet1" } }
}"#,
        },
    }
}

fn explain_notebook_no_direct_internet_access() -> Explanation {
    Explanation {
        title: "SageMaker Notebook Without Direct Internet Access",
        description: "\
Detects notebook instances that allow direct internet access.

`DirectInternetAccess` defaults to `Enabled`. It must be explicitly `Disabled`, and the
notebook must be placed in a VPC so traffic flows through your own egress controls.",
        remediation: "\
Set `DirectInternetAccess: Disabled` and a `SubnetId`.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::SageMaker::NotebookInstance", "Properties": { "DirectInternetAccess": "Enabled" } }"#,
            after: r#"{
  "Type": "AWS::SageMaker::NotebookInstance",
  "Properties": { "DirectInternetAccess": "Disabled", "SubnetId": { "Ref": "PrivateSubnet1" } }
}"#,
        },
    }
}

fn explain_notebook_kms_key() -> Explanation {
    Explanation {
        title: "SageMaker Notebook KMS Key Configured",
        description: "\
Detects notebook instances whose storage volume is not encrypted with a
customer-managed KMS key.",
        remediation: "\
Set `KmsKeyId` on the notebook instance.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::SageMaker::NotebookInstance", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::SageMaker::NotebookInstance",
  "Properties": { "KmsKeyId": { "Ref": "NotebookKey" } }
}"#,
        },
    }
}

fn explain_endpoint_config_kms_key() -> Explanation {
    Explanation {
        title: "SageMaker Endpoint Configuration KMS Key Configured",
        description: "\
Detects endpoint configurations whose attached storage is not encrypted with a
customer-managed KMS key.",
        remediation: "\
Set `KmsKeyId` on the endpoint configuration.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::SageMaker::EndpointConfig", "Properties": { "ProductionVariants": [] } }"#,
            after: r#"{
  "Type": "AWS::SageMaker::EndpointConfig",
  "Properties": { "ProductionVariants": [], "KmsKeyId": { "Fn::GetAtt": ["EndpointKey", "Arn"] } }
}"#,
        },
    }
}

// --- opensearch ---

fn explain_opensearch_in_vpc() -> Explanation {
    Explanation {
        title: "Search Domain In VPC Only",
        description: "\
Detects OpenSearch and Elasticsearch domains that expose a public endpoint.

A domain is VPC-placed only when `VPCOptions.SubnetIds` lists at least one subnet.",
        remediation: "\
Add `VPCOptions` with `SubnetIds` (and `SecurityGroupIds`).",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::OpenSearchService::Domain", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::OpenSearchService::Domain",
  "Properties": { "VPCOptions": { "SubnetIds": [{ "Ref": "PrivateSubnet1" }] } }
}"#,
        },
    }
}

fn explain_opensearch_encrypted_at_rest() -> Explanation {
    Explanation {
        title: "Search Domain Encrypted At Rest",
        description: "\
Detects OpenSearch and Elasticsearch domains without encryption at rest.",
        remediation: "\
Set `EncryptionAtRestOptions.Enabled` to `true`.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::OpenSearchService::Domain", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::OpenSearchService::Domain",
  "Properties": { "EncryptionAtRestOptions": { "Enabled": true } }
}"#,
        },
    }
}

fn explain_opensearch_node_to_node() -> Explanation {
    Explanation {
        title: "Search Domain Node-To-Node Encryption",
        description: "\
Detects OpenSearch and Elasticsearch domains that do not encrypt traffic between
cluster nodes.",
        remediation: "\
Set `NodeToNodeEncryptionOptions.Enabled` to `true`.",
        examples: ExamplePair {
            before: r#"{ "Type": "AWS::Elasticsearch::Domain", "Properties": {} }"#,
            after: r#"{
  "Type": "AWS::Elasticsearch::Domain",
  "Properties": { "NodeToNodeEncryptionOptions": { "Enabled": true } }
}"#,
        },
    }
}

// --- tool ---

fn explain_tool_runtime() -> Explanation {
    Explanation {
        title: "Tool Runtime Error",
        description: "\
iacguard could not complete the check: an input template could not be read or parsed,
or the configuration was invalid. The report carries this single finding instead of
rule results.",
        remediation: "\
Read the finding message for the underlying cause, fix the input or the configuration,
and re-run the check.",
        examples: ExamplePair {
            before: r#"{ "Resources": "not-an-object" }"#,
            after: r#"{ "Resources": {} }"#,
        },
    }
}
