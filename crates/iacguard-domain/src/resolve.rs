//! Attribute resolution against an explicit tree context.
//!
//! References to nodes in the tree are followed recursively. Values that only exist after
//! deployment (generated names, ARNs of resources without an explicit name) become
//! deploy-time tokens of the form `${LogicalId.Attribute}`: non-empty, comparable, but never
//! equal to a required literal. Dangling references, cycles and opaque intrinsics resolve
//! to [`Resolved::Unresolved`].

use crate::model::{AttrValue, Reference, ResourceKind, ResourceNode, ResourceTree};
use std::collections::BTreeMap;

const PSEUDO_PARAMETER_PREFIX: &str = "AWS::";
const S3_ARN_PREFIX: &str = "arn:aws:s3:::";

/// Outcome of resolving one attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// Reference-free value. `Null` doubles as "absent".
    Value(AttrValue),
    Unresolved,
}

impl Resolved {
    pub fn value(&self) -> Option<&AttrValue> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Unresolved => None,
        }
    }

    pub fn into_value(self) -> Option<AttrValue> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Unresolved => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(AttrValue::as_str)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolved::Unresolved)
    }

    /// Absent or explicitly null.
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Value(AttrValue::Null))
    }
}

/// (node id, attribute) pairs on the current resolution path.
type ResolutionPath = Vec<(String, String)>;

/// Read-only view of the tree that owns the node being evaluated.
#[derive(Clone, Copy, Debug)]
pub struct TreeContext<'a> {
    tree: &'a ResourceTree,
}

impl<'a> TreeContext<'a> {
    pub fn new(tree: &'a ResourceTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'a ResourceTree {
        self.tree
    }

    /// Resolve a raw value. Concrete values pass through; nested unresolved elements
    /// become `Null`.
    pub fn resolve(&self, value: &AttrValue) -> Resolved {
        let mut path = ResolutionPath::new();
        self.resolve_in(value, &mut path)
    }

    pub fn resolve_reference(&self, reference: &Reference) -> Resolved {
        let mut path = ResolutionPath::new();
        self.resolve_reference_in(reference, &mut path)
    }

    /// Walk `path` through the node's properties, resolving indirections at each step.
    ///
    /// A missing segment yields `Value(Null)`; an indirection that cannot be followed
    /// yields `Unresolved`.
    pub fn lookup(&self, node: &ResourceNode, path: &[&str]) -> Resolved {
        let Some((first, rest)) = path.split_first() else {
            return Resolved::Value(AttrValue::Null);
        };
        let Some(mut current) = node.property(first).cloned() else {
            return Resolved::Value(AttrValue::Null);
        };

        for segment in rest {
            let container = match current {
                AttrValue::Ref(_) | AttrValue::Join { .. } | AttrValue::Opaque(_) => {
                    match self.resolve(&current) {
                        Resolved::Value(v) => v,
                        Resolved::Unresolved => return Resolved::Unresolved,
                    }
                }
                other => other,
            };
            match container.get(segment) {
                Some(next) => current = next.clone(),
                None => return Resolved::Value(AttrValue::Null),
            }
        }

        self.resolve(&current)
    }

    fn resolve_in(&self, value: &AttrValue, path: &mut ResolutionPath) -> Resolved {
        match value {
            AttrValue::Ref(reference) => self.resolve_reference_in(reference, path),
            AttrValue::Join { delimiter, parts } => {
                let mut rendered = Vec::with_capacity(parts.len());
                for part in parts {
                    let Resolved::Value(v) = self.resolve_in(part, path) else {
                        return Resolved::Unresolved;
                    };
                    let Some(s) = v.scalar_string() else {
                        return Resolved::Unresolved;
                    };
                    rendered.push(s);
                }
                Resolved::Value(AttrValue::String(rendered.join(delimiter)))
            }
            AttrValue::Opaque(function) => {
                tracing::trace!(function = %function, "opaque intrinsic left unresolved");
                Resolved::Unresolved
            }
            AttrValue::List(items) => Resolved::Value(AttrValue::List(
                items
                    .iter()
                    .map(|item| {
                        self.resolve_in(item, path)
                            .into_value()
                            .unwrap_or(AttrValue::Null)
                    })
                    .collect(),
            )),
            AttrValue::Record(map) => Resolved::Value(AttrValue::Record(
                map.iter()
                    .map(|(k, v)| {
                        let resolved = self.resolve_in(v, path).into_value();
                        (k.clone(), resolved.unwrap_or(AttrValue::Null))
                    })
                    .collect::<BTreeMap<_, _>>(),
            )),
            AttrValue::Null | AttrValue::Bool(_) | AttrValue::Number(_) | AttrValue::String(_) => {
                Resolved::Value(value.clone())
            }
        }
    }

    fn resolve_reference_in(&self, reference: &Reference, path: &mut ResolutionPath) -> Resolved {
        if reference.target.starts_with(PSEUDO_PARAMETER_PREFIX) {
            return Resolved::Value(AttrValue::String(format!("${{{}}}", reference.target)));
        }

        let Some(node) = self.tree.node(&reference.target) else {
            tracing::debug!(
                target_node = %reference.target,
                attribute = %reference.attribute,
                "reference target not in tree"
            );
            return Resolved::Unresolved;
        };

        let frame = (reference.target.clone(), reference.attribute.clone());
        if path.contains(&frame) {
            tracing::debug!(
                target_node = %reference.target,
                attribute = %reference.attribute,
                "reference cycle"
            );
            return Resolved::Unresolved;
        }

        path.push(frame);
        let out = self.resolve_attribute(node, reference, path);
        path.pop();
        out
    }

    fn resolve_attribute(
        &self,
        node: &ResourceNode,
        reference: &Reference,
        path: &mut ResolutionPath,
    ) -> Resolved {
        if node.kind == ResourceKind::S3Bucket && reference.attribute == "Arn" {
            return match node.property("BucketName") {
                Some(raw) => match self.resolve_in(raw, path) {
                    Resolved::Value(AttrValue::String(name)) => {
                        Resolved::Value(AttrValue::String(format!("{S3_ARN_PREFIX}{name}")))
                    }
                    Resolved::Value(_) => deploy_time_token(reference),
                    Resolved::Unresolved => Resolved::Unresolved,
                },
                None => deploy_time_token(reference),
            };
        }

        let property = if reference.is_ref() {
            node.kind.ref_property()
        } else {
            Some(reference.attribute.as_str())
        };

        match property.and_then(|p| node.property(p)) {
            Some(raw) => self.resolve_in(raw, path),
            None => deploy_time_token(reference),
        }
    }
}

fn deploy_time_token(reference: &Reference) -> Resolved {
    Resolved::Value(AttrValue::String(format!(
        "${{{}.{}}}",
        reference.target, reference.attribute
    )))
}
