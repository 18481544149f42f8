//! In-memory element tree standing in for the host page DOM
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Detached nodes stay in the arena until the document is dropped.

mod markup;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create an empty document with a root element of the given tag
    pub fn new(root_tag: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.create_element(root_tag);
        doc
    }

    /// Parse an HTML fragment into a document rooted at a synthetic `body`
    pub fn parse(html: &str) -> Result<Self> {
        let mut doc = Self::new("body");
        let root = doc.root;
        markup::parse_into(&mut doc, root, html)?;
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ---------------------------------------------------------------------
    // Tree structure
    // ---------------------------------------------------------------------

    /// Append `child` to `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove `node` from its parent, keeping its subtree intact
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Detach every child of `node`
    pub fn remove_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Children that are elements (text nodes skipped)
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Iterate from `node` up to the root, starting with `node` itself
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&n| self.parent(n))
    }

    /// Whether `node` is `ancestor` or lies inside its subtree
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// Depth-first search of the descendants of `node` (excluding `node`)
    pub fn find_descendant<F>(&self, node: NodeId, mut pred: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if pred(self, current) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }

    pub fn find_by_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.find_descendant(node, |doc, n| doc.tag(n) == Some(tag))
    }

    pub fn find_by_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.find_descendant(node, |doc, n| doc.has_class(n, class))
    }

    /// Copy the subtree rooted at `node`; the copy is detached
    pub fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let kind = self.nodes[node.0].kind.clone();
        let copy = self.push(kind);
        let children = self.nodes[node.0].children.clone();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // ---------------------------------------------------------------------
    // Element data
    // ---------------------------------------------------------------------

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].kind, NodeKind::Element { .. })
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn attrs(&self, node: NodeId) -> &[(String, String)] {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    /// Set an attribute; no-op on text nodes
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            attrs.retain(|(k, _)| k != name);
        }
    }

    /// Set or clear a boolean attribute such as `disabled`
    pub fn set_flag(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            self.set_attr(node, name, "");
        } else {
            self.remove_attr(node, name);
        }
    }

    // Classes are kept in the `class` attribute, space separated.

    pub fn classes(&self, node: NodeId) -> impl Iterator<Item = &str> {
        self.attr(node, "class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            let mut list: Vec<String> = self.classes(node).map(str::to_string).collect();
            list.push(class.to_string());
            self.set_attr(node, "class", &list.join(" "));
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            let list: Vec<&str> = self.classes(node).filter(|c| *c != class).collect();
            let joined = list.join(" ");
            self.set_attr(node, "class", &joined);
        }
    }

    /// Add `class` when `force` is true, remove it otherwise
    pub fn toggle_class(&mut self, node: NodeId, class: &str, force: bool) {
        if force {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Read one property from the inline `style` attribute
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        parse_style(self.attr(node, "style").unwrap_or(""))
            .into_iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v)
    }

    /// Set one property of the inline `style` attribute, keeping the others
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        let mut props = parse_style(self.attr(node, "style").unwrap_or(""));
        match props.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => props.push((property.to_string(), value.to_string())),
        }
        let style = props
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "style", &style);
    }

    // ---------------------------------------------------------------------
    // Text and markup
    // ---------------------------------------------------------------------

    /// Concatenated text of `node` and all its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace the children of `node` with a single text node
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.remove_children(node);
        let text = self.create_text(text);
        self.append_child(node, text);
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            markup::serialize(self, child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        markup::serialize(self, node, &mut out);
        out
    }

    /// Replace the children of `node` with the parsed `html` fragment
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        self.remove_children(node);
        markup::parse_into(self, node, html)
    }

    pub(crate) fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            if k.is_empty() {
                return None;
            }
            Some((k.to_ascii_lowercase(), v.trim().to_string()))
        })
        .collect()
}
