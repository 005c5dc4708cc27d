use iacguard_types::TemplatePath;
use std::collections::BTreeMap;

/// Every synthesized stack in scope, one resource tree per template.
#[derive(Clone, Debug, Default)]
pub struct CloudAssembly {
    pub stacks: Vec<ResourceTree>,
}

impl CloudAssembly {
    pub fn resource_count(&self) -> usize {
        self.stacks.iter().map(|t| t.nodes().len()).sum()
    }
}

/// Resource nodes of one template, in tree order, with a by-id index.
///
/// Logical ids are unique within a tree; if a caller supplies duplicates the first
/// node wins lookups while every node is still visited.
#[derive(Clone, Debug, Default)]
pub struct ResourceTree {
    pub template: TemplatePath,
    nodes: Vec<ResourceNode>,
    index: BTreeMap<String, usize>,
}

impl ResourceTree {
    pub fn new(template: TemplatePath, nodes: Vec<ResourceNode>) -> Self {
        let mut index = BTreeMap::new();
        for (ix, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(ix);
        }
        Self {
            template,
            nodes,
            index,
        }
    }

    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&ResourceNode> {
        self.index.get(id).map(|&ix| &self.nodes[ix])
    }

    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}

/// Explicit type discriminator for the resource kinds the rule library understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    S3Bucket,
    S3BucketPolicy,
    SageMakerNotebookInstance,
    SageMakerEndpointConfig,
    OpenSearchDomain,
    ElasticsearchDomain,
    Unknown,
}

impl ResourceKind {
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "AWS::S3::Bucket" => ResourceKind::S3Bucket,
            "AWS::S3::BucketPolicy" => ResourceKind::S3BucketPolicy,
            "AWS::SageMaker::NotebookInstance" => ResourceKind::SageMakerNotebookInstance,
            "AWS::SageMaker::EndpointConfig" => ResourceKind::SageMakerEndpointConfig,
            "AWS::OpenSearchService::Domain" => ResourceKind::OpenSearchDomain,
            "AWS::Elasticsearch::Domain" => ResourceKind::ElasticsearchDomain,
            _ => ResourceKind::Unknown,
        }
    }

    /// Short tag used in messages and rule listings.
    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::S3Bucket => "bucket",
            ResourceKind::S3BucketPolicy => "bucket-policy",
            ResourceKind::SageMakerNotebookInstance => "notebook-instance",
            ResourceKind::SageMakerEndpointConfig => "endpoint-config",
            ResourceKind::OpenSearchDomain => "opensearch-domain",
            ResourceKind::ElasticsearchDomain => "elasticsearch-domain",
            ResourceKind::Unknown => "unknown",
        }
    }

    /// Property that backs `Ref` for this kind, when the template can carry it.
    pub fn ref_property(self) -> Option<&'static str> {
        match self {
            ResourceKind::S3Bucket => Some("BucketName"),
            ResourceKind::SageMakerNotebookInstance => Some("NotebookInstanceName"),
            ResourceKind::SageMakerEndpointConfig => Some("EndpointConfigName"),
            ResourceKind::OpenSearchDomain | ResourceKind::ElasticsearchDomain => {
                Some("DomainName")
            }
            ResourceKind::S3BucketPolicy | ResourceKind::Unknown => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResourceNode {
    /// Logical id, unique within the owning tree.
    pub id: String,
    pub kind: ResourceKind,
    /// Raw provider type, e.g. `AWS::S3::Bucket`.
    pub type_name: String,
    /// Construct path recorded by the toolkit, if any.
    pub path: Option<String>,
    pub properties: BTreeMap<String, AttrValue>,
    pub suppressions: Vec<Suppression>,
}

impl ResourceNode {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            id: id.into(),
            kind: ResourceKind::from_type_name(&type_name),
            type_name,
            path: None,
            properties: BTreeMap::new(),
            suppressions: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&AttrValue> {
        self.properties.get(name)
    }

    pub fn display_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.id)
    }

    pub fn suppresses(&self, rule_id: &str) -> bool {
        self.suppressions.iter().any(|s| s.rule_id == rule_id)
    }
}

/// An inline suppression recorded in the resource's metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suppression {
    pub rule_id: String,
    pub reason: String,
}

/// Raw attribute value as synthesized; may contain unresolved references.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<AttrValue>),
    Record(BTreeMap<String, AttrValue>),
    Ref(Reference),
    /// String concatenation of `parts` with `delimiter`, evaluated at resolve time.
    Join {
        delimiter: String,
        parts: Vec<AttrValue>,
    },
    /// An intrinsic the engine cannot evaluate (`Fn::If`, `Fn::Sub`, ...). Never resolves.
    Opaque(String),
}

impl AttrValue {
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        match self {
            AttrValue::Record(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Scalar rendering used for `Join` parts and string comparisons.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            AttrValue::String(s) => Some(s.clone()),
            AttrValue::Number(n) => Some(n.to_string()),
            AttrValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Plain JSON conversion: no intrinsic functions are interpreted.
impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttrValue::Null,
            serde_json::Value::Bool(b) => AttrValue::Bool(b),
            serde_json::Value::Number(n) => AttrValue::Number(n),
            serde_json::Value::String(s) => AttrValue::String(s),
            serde_json::Value::Array(items) => {
                AttrValue::List(items.into_iter().map(AttrValue::from).collect())
            }
            serde_json::Value::Object(map) => AttrValue::Record(
                map.into_iter()
                    .map(|(k, v)| (k, AttrValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// "The value of `attribute` on node `target`", known only at resolve time.
///
/// `attribute == "Ref"` stands for the node's primary reference value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reference {
    pub target: String,
    pub attribute: String,
}

pub const REF_ATTRIBUTE: &str = "Ref";

impl Reference {
    pub fn new(target: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            attribute: attribute.into(),
        }
    }

    pub fn to_ref(target: impl Into<String>) -> Self {
        Self::new(target, REF_ATTRIBUTE)
    }

    pub fn is_ref(&self) -> bool {
        self.attribute == REF_ATTRIBUTE
    }
}
