use iacguard_domain::model::{AttrValue, Reference, ResourceNode, ResourceTree, Suppression};
use iacguard_types::TemplatePath;
use serde_json::{Map, Value};

const CDK_PATH_METADATA: &str = "aws:cdk:path";
const SUPPRESSION_METADATA: &str = "iacguard";

/// Structural problems with a template document.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),

    #[error("template top level is not a JSON object")]
    NotAnObject,

    #[error("`Resources` is not a JSON object")]
    ResourcesNotAnObject,

    #[error("resource {logical_id} is not a JSON object")]
    ResourceNotAnObject { logical_id: String },

    #[error("resource {logical_id} has no string `Type`")]
    MissingType { logical_id: String },

    #[error("resource {logical_id} has a malformed {function}")]
    MalformedIntrinsic {
        logical_id: String,
        function: &'static str,
    },
}

/// Parse one synthesized template into a resource tree, in document order.
pub fn parse_template(path: &TemplatePath, text: &str) -> Result<ResourceTree, TemplateError> {
    let doc: Value = serde_json::from_str(text)?;
    let Value::Object(doc) = doc else {
        return Err(TemplateError::NotAnObject);
    };

    let resources = match doc.get("Resources") {
        None => return Ok(ResourceTree::new(path.clone(), Vec::new())),
        Some(Value::Object(resources)) => resources,
        Some(_) => return Err(TemplateError::ResourcesNotAnObject),
    };

    let mut nodes = Vec::with_capacity(resources.len());
    for (logical_id, resource) in resources {
        nodes.push(parse_resource(logical_id, resource)?);
    }

    tracing::debug!(template = %path, resources = nodes.len(), "parsed template");
    Ok(ResourceTree::new(path.clone(), nodes))
}

fn parse_resource(logical_id: &str, resource: &Value) -> Result<ResourceNode, TemplateError> {
    let Value::Object(resource) = resource else {
        return Err(TemplateError::ResourceNotAnObject {
            logical_id: logical_id.to_string(),
        });
    };
    let Some(type_name) = resource.get("Type").and_then(Value::as_str) else {
        return Err(TemplateError::MissingType {
            logical_id: logical_id.to_string(),
        });
    };

    let mut node = ResourceNode::new(logical_id, type_name);

    if let Some(Value::Object(properties)) = resource.get("Properties") {
        for (name, value) in properties {
            node.properties
                .insert(name.clone(), to_attr(logical_id, value)?);
        }
    }

    if let Some(Value::Object(metadata)) = resource.get("Metadata") {
        node.path = metadata
            .get(CDK_PATH_METADATA)
            .and_then(Value::as_str)
            .map(str::to_string);
        node.suppressions = suppressions(logical_id, metadata);
    }

    Ok(node)
}

/// `Metadata.iacguard.rules_to_suppress: [{ "id": ..., "reason": ... }]`
fn suppressions(logical_id: &str, metadata: &Map<String, Value>) -> Vec<Suppression> {
    let Some(entries) = metadata
        .get(SUPPRESSION_METADATA)
        .and_then(|m| m.get("rules_to_suppress"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let Some(rule_id) = entry.get("id").and_then(Value::as_str) else {
                tracing::warn!(node = %logical_id, "suppression without rule id ignored");
                return None;
            };
            let reason = entry
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if reason.trim().is_empty() {
                tracing::warn!(node = %logical_id, rule = %rule_id, "suppression has no reason");
            }
            Some(Suppression {
                rule_id: rule_id.to_string(),
                reason: reason.to_string(),
            })
        })
        .collect()
}

/// Convert a property value, turning `Ref`, `Fn::GetAtt` and `Fn::Join` into their model
/// counterparts. Any other `Fn::*` becomes opaque.
fn to_attr(logical_id: &str, value: &Value) -> Result<AttrValue, TemplateError> {
    let malformed = |function: &'static str| TemplateError::MalformedIntrinsic {
        logical_id: logical_id.to_string(),
        function,
    };

    Ok(match value {
        Value::Object(map) if map.len() == 1 => {
            let (key, inner) = map.iter().next().ok_or_else(|| malformed("object"))?;
            match key.as_str() {
                "Ref" => {
                    let target = inner.as_str().ok_or_else(|| malformed("Ref"))?;
                    AttrValue::Ref(Reference::to_ref(target))
                }
                "Fn::GetAtt" => AttrValue::Ref(get_att(inner).ok_or_else(|| malformed("Fn::GetAtt"))?),
                "Fn::Join" => {
                    let Some([Value::String(delimiter), parts]) =
                        inner.as_array().map(Vec::as_slice)
                    else {
                        return Err(malformed("Fn::Join"));
                    };
                    let parts = match parts {
                        Value::Array(items) => items
                            .iter()
                            .map(|item| to_attr(logical_id, item))
                            .collect::<Result<Vec<_>, _>>()?,
                        other => vec![to_attr(logical_id, other)?],
                    };
                    AttrValue::Join {
                        delimiter: delimiter.to_string(),
                        parts,
                    }
                }
                function if function.starts_with("Fn::") => AttrValue::Opaque(function.to_string()),
                _ => record(logical_id, map)?,
            }
        }
        Value::Object(map) => record(logical_id, map)?,
        Value::Array(items) => AttrValue::List(
            items
                .iter()
                .map(|item| to_attr(logical_id, item))
                .collect::<Result<_, _>>()?,
        ),
        scalar => AttrValue::from(scalar.clone()),
    })
}

fn record(logical_id: &str, map: &Map<String, Value>) -> Result<AttrValue, TemplateError> {
    Ok(AttrValue::Record(
        map.iter()
            .map(|(k, v)| Ok((k.clone(), to_attr(logical_id, v)?)))
            .collect::<Result<_, TemplateError>>()?,
    ))
}

/// `["Id", "Attr"]` or `"Id.Attr"`; the attribute may itself contain dots.
fn get_att(value: &Value) -> Option<Reference> {
    match value {
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(target), Value::String(attribute)] => {
                Some(Reference::new(target, attribute))
            }
            _ => None,
        },
        Value::String(dotted) => {
            let (target, attribute) = dotted.split_once('.')?;
            if target.is_empty() || attribute.is_empty() {
                return None;
            }
            Some(Reference::new(target, attribute))
        }
        _ => None,
    }
}
