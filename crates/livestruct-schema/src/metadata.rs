// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing JSON metadata for type descriptors.
//!
//! Every node is a flat object so that readers in any language can walk it
//! without a schema of the schema:
//!
//! ```json
//! {"type":"object","name":"Person","fields":[
//!   {"type":"string","name":"FirstName"},
//!   {"type":"string","name":"LastName"},
//!   {"type":"int","name":"Age","signed":true}
//! ]}
//! ```

use crate::{ArrayDescriptor, FieldDescriptor, PrimitiveKind, SchemaError, TypeDescriptor, TypeKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeType {
    Bool,
    Int,
    Float,
    Complex,
    String,
    Array,
    Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bits: Option<u8>,
    #[serde(default, skip_serializing_if = "is_false")]
    nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<Node>>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Node {
    fn bare(node_type: NodeType, name: Option<String>, nullable: bool) -> Self {
        Self {
            node_type,
            name,
            signed: None,
            bits: None,
            nullable,
            length: None,
            element: None,
            fields: None,
        }
    }

    fn from_descriptor(desc: &TypeDescriptor, name: Option<String>) -> Self {
        match &desc.kind {
            TypeKind::Primitive(kind) => {
                let (node_type, signed, bits) = match *kind {
                    PrimitiveKind::Bool => (NodeType::Bool, None, None),
                    PrimitiveKind::VarInt { signed } => (NodeType::Int, Some(signed), None),
                    PrimitiveKind::FixedInt { signed, bits } => {
                        (NodeType::Int, Some(signed), Some(bits))
                    }
                    PrimitiveKind::Float { bits } => (NodeType::Float, None, Some(bits)),
                    PrimitiveKind::Complex { bits } => (NodeType::Complex, None, Some(bits)),
                    PrimitiveKind::String => (NodeType::String, None, None),
                };
                Self {
                    signed,
                    bits,
                    ..Self::bare(node_type, name, desc.nullable)
                }
            }
            TypeKind::Object(fields) => Self {
                fields: Some(
                    fields
                        .iter()
                        .map(|f| Self::from_descriptor(&f.type_desc, Some(f.name.clone())))
                        .collect(),
                ),
                ..Self::bare(NodeType::Object, name, desc.nullable)
            },
            TypeKind::Array(arr) => Self {
                length: arr.length,
                element: Some(Box::new(Self::from_descriptor(&arr.element_type, None))),
                ..Self::bare(NodeType::Array, name, desc.nullable)
            },
        }
    }

    fn into_descriptor(self, path: &str) -> Result<TypeDescriptor, SchemaError> {
        let invalid = |msg: &str| SchemaError::InvalidMetadata(format!("{}: {}", path, msg));

        let kind = match self.node_type {
            NodeType::Bool => TypeKind::Primitive(PrimitiveKind::Bool),
            NodeType::String => TypeKind::Primitive(PrimitiveKind::String),
            NodeType::Int => {
                let signed = self.signed.unwrap_or(true);
                TypeKind::Primitive(match self.bits {
                    Some(bits) => PrimitiveKind::FixedInt { signed, bits },
                    None => PrimitiveKind::VarInt { signed },
                })
            }
            NodeType::Float => {
                let bits = self.bits.ok_or_else(|| invalid("float without bits"))?;
                TypeKind::Primitive(PrimitiveKind::Float { bits })
            }
            NodeType::Complex => {
                let bits = self.bits.ok_or_else(|| invalid("complex without bits"))?;
                TypeKind::Primitive(PrimitiveKind::Complex { bits })
            }
            NodeType::Array => {
                let element = self.element.ok_or_else(|| invalid("array without element"))?;
                let element_path = format!("{}[]", path);
                let element_type = Arc::new(element.into_descriptor(&element_path)?);
                TypeKind::Array(ArrayDescriptor {
                    element_type,
                    length: self.length,
                })
            }
            NodeType::Object => {
                let nodes = self.fields.ok_or_else(|| invalid("object without fields"))?;
                let mut fields = Vec::with_capacity(nodes.len());
                for node in nodes {
                    let name = node
                        .name
                        .clone()
                        .ok_or_else(|| invalid("object field without name"))?;
                    if fields.iter().any(|f: &FieldDescriptor| f.name == name) {
                        return Err(invalid(&format!("duplicate field {}", name)));
                    }
                    let field_path = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", path, name)
                    };
                    let type_desc = Arc::new(node.into_descriptor(&field_path)?);
                    fields.push(FieldDescriptor::new(name, type_desc));
                }
                TypeKind::Object(fields)
            }
        };

        if let TypeKind::Primitive(p) = &kind {
            if !p.is_valid() {
                return Err(invalid(&format!("unsupported bit width for {}", p.type_name())));
            }
        }

        Ok(TypeDescriptor {
            name: String::new(),
            kind,
            nullable: self.nullable,
        })
    }
}

/// Serialize a root descriptor to JSON metadata bytes.
///
/// The root's type name is emitted as `name`; nested nodes carry field names.
pub fn to_metadata(desc: &TypeDescriptor) -> Result<Vec<u8>, SchemaError> {
    desc.validate()?;
    let name = (!desc.name.is_empty()).then(|| desc.name.clone());
    let node = Node::from_descriptor(desc, name);
    Ok(serde_json::to_vec(&node)?)
}

/// Parse JSON metadata bytes into a root descriptor.
pub fn from_metadata(bytes: &[u8]) -> Result<TypeDescriptor, SchemaError> {
    let node: Node = serde_json::from_slice(bytes)?;
    let name = node.name.clone().unwrap_or_default();
    let mut desc = node.into_descriptor("")?;
    desc.validate()
        .map_err(|e| SchemaError::InvalidMetadata(e.to_string()))?;
    desc.name = name;
    Ok(desc)
}
