//! In-memory XML tree.
//!
//! The introspector walks parents, siblings and whole subtrees in
//! several passes, which a streaming reader cannot serve. This module
//! materializes the document once: every element keeps its written
//! name, its resolved namespace, its attributes and its direct text.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, SchemaError};

pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Name as written, prefix included.
    pub qname: String,
    pub local: String,
    /// Namespace the element prefix resolves to, if bound.
    pub namespace: Option<String>,
    pub attrs: Vec<(String, String)>,
    /// Direct character data of this element.
    pub text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl XmlNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn in_xs_namespace(&self) -> bool {
        self.namespace.as_deref() == Some(XS_NAMESPACE)
    }
}

#[derive(Debug, Default)]
pub struct XmlTree {
    nodes: Vec<XmlNode>,
}

impl XmlTree {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(xml.as_bytes());
        let config = reader.config_mut();
        config.check_comments = false;
        config.expand_empty_elements = true;
        config.trim_text(true);

        let mut tree = XmlTree::default();
        // Namespace scopes, innermost last.
        let mut scopes: Vec<HashMap<String, String>> = vec![HashMap::new()];
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(event) => {
                    let id = tree.push_element(&event, &mut scopes, open.last().copied())?;
                    open.push(id);
                }
                Event::End(_) => {
                    open.pop();
                    scopes.pop();
                }
                Event::Text(event) => {
                    if let Some(&id) = open.last() {
                        tree.nodes[id].text.push_str(&event.xml_content()?);
                    }
                }
                Event::GeneralRef(event) => {
                    if let Some(&id) = open.last() {
                        let raw = event.xml_content()?;
                        push_general_ref(&mut tree.nodes[id].text, &raw)?;
                    }
                }
                Event::Eof => break,
                _ => (),
            }
        }
        Ok(tree)
    }

    fn push_element(
        &mut self,
        event: &BytesStart<'_>,
        scopes: &mut Vec<HashMap<String, String>>,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let qname = String::from_utf8_lossy(event.name().as_ref()).into_owned();

        let mut attrs = Vec::new();
        let mut scope = scopes.last().cloned().unwrap_or_default();
        for attribute in event.attributes() {
            let attribute = attribute?;
            let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map(Cow::into_owned)?;
            if name == "xmlns" {
                scope.insert(String::new(), value.clone());
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                scope.insert(prefix.to_string(), value.clone());
            }
            attrs.push((name, value));
        }
        scopes.push(scope);

        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (prefix.to_string(), local.to_string()),
            None => (String::new(), qname.clone()),
        };
        let namespace = scopes
            .last()
            .and_then(|scope| scope.get(&prefix))
            .cloned();

        let id = self.nodes.len();
        self.nodes.push(XmlNode {
            qname,
            local,
            namespace,
            attrs,
            text: String::new(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        Ok(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() { None } else { Some(0) }
    }

    pub fn node(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Document-order ids of the subtree below `id` (the node itself
    /// excluded).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev());
        }
        out
    }

    /// All elements in the document, in document order.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        0..self.nodes.len()
    }

    /// Concatenated text of the whole subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.nodes[id].text.clone();
        for child in self.descendants(id) {
            out.push_str(&self.nodes[child].text);
        }
        out
    }
}

fn push_general_ref(target: &mut String, raw: &str) -> Result<()> {
    if let Some(number) = raw.strip_prefix('#') {
        let code = if let Some(hex) = number.strip_prefix('x') {
            u32::from_str_radix(hex, 16)
        } else {
            number.parse::<u32>()
        };
        if let Ok(code) = code {
            if let Some(character) = char::from_u32(code) {
                target.push(character);
                return Ok(());
            }
        }
        return Err(SchemaError::BadCharRef(raw.to_string()));
    }
    match resolve_xml_entity(raw) {
        Some(entity) => {
            target.push_str(entity);
            Ok(())
        }
        None => Err(SchemaError::BadCharRef(raw.to_string())),
    }
}
