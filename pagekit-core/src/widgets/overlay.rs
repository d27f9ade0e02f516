//! Backdrop and page scroll lock

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::types::ModalId;

/// Component that can hold the scroll lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayOwner {
    Modal(ModalId),
    Navigation,
}

/// Page-wide scroll lock
///
/// `body` carries the lock class exactly while at least one owner holds it, so
/// closing one overlay never unlocks scrolling under another.
#[derive(Debug)]
pub struct ScrollLock {
    class: String,
    holders: BTreeSet<OverlayOwner>,
}

impl ScrollLock {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            holders: BTreeSet::new(),
        }
    }

    pub fn acquire(&mut self, doc: &mut Document, owner: OverlayOwner) {
        self.holders.insert(owner);
        self.sync(doc);
    }

    pub fn release(&mut self, doc: &mut Document, owner: OverlayOwner) {
        self.holders.remove(&owner);
        self.sync(doc);
    }

    pub fn release_all(&mut self, doc: &mut Document) {
        self.holders.clear();
        self.sync(doc);
    }

    pub fn is_locked(&self) -> bool {
        !self.holders.is_empty()
    }

    pub fn is_held_by(&self, owner: OverlayOwner) -> bool {
        self.holders.contains(&owner)
    }

    fn sync(&self, doc: &mut Document) {
        let body = doc.body();
        if self.holders.is_empty() {
            doc.remove_class(body, &self.class);
        } else {
            doc.add_class(body, &self.class);
        }
    }
}

/// Semi-transparent backdrop owned by one modal or the navigation shell
#[derive(Debug)]
pub struct Overlay {
    owner: OverlayOwner,
    class: String,
    backdrop: Option<NodeId>,
}

impl Overlay {
    pub fn new(owner: OverlayOwner, class: impl Into<String>) -> Self {
        Self {
            owner,
            class: class.into(),
            backdrop: None,
        }
    }

    pub fn owner(&self) -> OverlayOwner {
        self.owner
    }

    pub fn backdrop(&self) -> Option<NodeId> {
        self.backdrop
    }

    /// Backdrop is attached to the document
    pub fn is_active(&self, doc: &Document) -> bool {
        self.backdrop.is_some_and(|node| doc.is_connected(node))
    }

    /// Whether `node` is this overlay's backdrop (or inside it)
    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        self.backdrop
            .is_some_and(|backdrop| node == backdrop || doc.is_descendant_of(node, backdrop))
    }

    /// Attach the backdrop to `body` and lock scrolling; no-op while active
    pub fn add(&mut self, doc: &mut Document, lock: &mut ScrollLock) {
        if !self.is_active(doc) {
            let backdrop = match self.backdrop {
                Some(node) => node,
                None => {
                    let node = doc.create_element("div");
                    doc.add_class(node, &self.class);
                    self.backdrop = Some(node);
                    node
                }
            };
            let body = doc.body();
            doc.append_child(body, backdrop);
        }
        lock.acquire(doc, self.owner);
    }

    /// Detach the backdrop and release this owner's scroll lock
    pub fn remove(&mut self, doc: &mut Document, lock: &mut ScrollLock) {
        if let Some(backdrop) = self.backdrop {
            doc.detach(backdrop);
        }
        lock.release(doc, self.owner);
    }
}
