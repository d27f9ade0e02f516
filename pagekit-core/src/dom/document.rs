//! Arena-backed element tree

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::selector::Selector;
use super::spec::NodeSpec;

/// Handle to a node of one [`Document`].
///
/// Ids are only minted by the document that owns the node and are never reused,
/// so a detached node keeps its id and can be re-attached later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index, stable for the document's lifetime
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
}

/// In-memory page document
///
/// Only elements are modelled; text lives on the element that owns it. Node 0
/// is the document root and its single child is `body`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `body`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.create_element("#document");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// Build a document whose `body` is described by `spec`
    ///
    /// The spec's own tag is ignored; its classes and attributes land on `body`.
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        doc.apply_spec(body, spec);
        doc
    }

    /// Append `spec` (and its subtree) under `parent`
    pub fn append_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let node = self.create_element(&spec.tag);
        self.apply_spec(node, spec);
        self.append_child(parent, node);
        node
    }

    fn apply_spec(&mut self, node: NodeId, spec: &NodeSpec) {
        for class in spec.class.split_whitespace() {
            self.add_class(node, class);
        }
        for (name, value) in &spec.attrs {
            self.set_attr(node, name, value);
        }
        self.element_mut(node).text.clone_from(&spec.text);
        for child in &spec.children {
            self.append_spec(node, child);
        }
        self.init_form_state(node);
    }

    /// Snapshot a subtree back into a spec (used for reports and fixtures)
    pub fn to_spec(&self, node: NodeId) -> NodeSpec {
        let element = self.element(node);
        let value = if is_form_control(&element.tag) {
            Some(element.value.clone())
        } else {
            None
        };
        NodeSpec {
            tag: element.tag.clone(),
            class: element.classes.join(" "),
            attrs: element.attrs.clone(),
            text: element.text.clone(),
            value,
            children: self.nodes[node.0]
                .children
                .iter()
                .map(|child| self.to_spec(*child))
                .collect(),
        }
    }

    // ===== structure =====

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            element: Element {
                tag: tag.to_ascii_lowercase(),
                ..Element::default()
            },
        });
        id
    }

    /// Whether `node` was minted by this document
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Append `child` as the last child of `parent`, moving it if already attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` before `reference` under `parent`; appends when `reference`
    /// is `None` or not a child of `parent`
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let position = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` right after `node`; no-op when `node` is detached
    pub fn insert_after(&mut self, node: NodeId, child: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let next = self.next_sibling(node);
        self.insert_before(parent, child, next);
    }

    /// Remove `node` from its parent; the subtree stays intact and addressable
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|c| *c == node)?;
        siblings.get(position + 1).copied()
    }

    /// Whether the node is reachable from the document root
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.root || self.is_descendant_of(node, self.root)
    }

    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Pre-order descendants of `scope`, excluding `scope` itself
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    // ===== queries =====

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(self, node)
    }

    /// `node` or its nearest ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current != self.root && selector.matches(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| selector.matches(self, *node))
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    // ===== element data =====

    fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0].element
    }

    fn element_mut(&mut self, node: NodeId) -> &mut Element {
        &mut self.nodes[node.0].element
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.element(node).tag
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.element(node).classes
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            self.element_mut(node).classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.element_mut(node).classes.retain(|c| c != class);
    }

    /// Flip `class`, returning whether it is now present
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.element(node).attrs.contains_key(name)
    }

    /// Set an attribute; `class` is routed to the class list
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "class" {
            let element = self.element_mut(node);
            element.classes.clear();
            for class in value.split_whitespace() {
                if !element.classes.iter().any(|c| c == class) {
                    element.classes.push(class.to_string());
                }
            }
            return;
        }
        self.element_mut(node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.element_mut(node).attrs.remove(name);
    }

    /// `data-*` attribute, `key` given without the prefix
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attr(node, &format!("data-{key}"))
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.element(node).text.clone();
        for child in self.children(node) {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    /// Replace the node's own text (children are kept)
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        text.clone_into(&mut self.element_mut(node).text);
    }

    // ===== form state =====

    pub fn value(&self, node: NodeId) -> &str {
        &self.element(node).value
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        value.clone_into(&mut self.element_mut(node).value);
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).checked
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        self.element_mut(node).checked = checked;
    }

    /// Option value: the `value` attribute, falling back to the label
    pub fn option_value(&self, option: NodeId) -> String {
        self.attr(option, "value")
            .map_or_else(|| self.text_content(option).trim().to_string(), str::to_string)
    }

    /// `<option>` children of a select, in order
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|node| self.tag(*node) == "option")
            .collect()
    }

    /// Restore every control under `form` to its markup default
    pub fn reset_form(&mut self, form: NodeId) {
        let controls: Vec<NodeId> = self
            .descendants(form)
            .into_iter()
            .filter(|node| is_form_control(self.tag(*node)))
            .collect();
        for control in controls {
            self.init_form_state(control);
        }
    }

    fn init_form_state(&mut self, node: NodeId) {
        match self.tag(node) {
            "input" => {
                let default = self.attr(node, "value").unwrap_or_default().to_string();
                let checked = self.has_attr(node, "checked");
                let element = self.element_mut(node);
                element.value = default;
                element.checked = checked;
            }
            "textarea" => {
                let default = self.element(node).text.clone();
                self.element_mut(node).value = default;
            }
            "select" => {
                let options = self.options(node);
                let chosen = options
                    .iter()
                    .find(|option| self.has_attr(**option, "selected"))
                    .or_else(|| options.first())
                    .map(|option| self.option_value(*option))
                    .unwrap_or_default();
                self.element_mut(node).value = chosen;
            }
            _ => {}
        }
    }
}

fn is_form_control(tag: &str) -> bool {
    matches!(tag, "input" | "select" | "textarea")
}
