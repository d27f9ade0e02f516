//! Burger menu of the page header

use super::overlay::{Overlay, OverlayOwner, ScrollLock};
use crate::config::ClassNames;
use crate::dom::{Document, NodeId, Selector};
use crate::error::CoreResult;

#[derive(Debug)]
pub struct NavigationShell {
    header: NodeId,
    button: NodeId,
    menu: Option<NodeId>,
    leaf: Selector,
    overlay: Overlay,
    open: bool,
    classes: ClassNames,
}

impl NavigationShell {
    /// Bind to `.header` and `.header__burger`; `None` when either is missing
    pub fn mount(doc: &Document, classes: &ClassNames) -> CoreResult<Option<Self>> {
        let header_sel = Selector::parse(&format!(".{}", classes.header))?;
        let button_sel = Selector::parse(&format!(".{}", classes.header_burger))?;
        let menu_sel = Selector::parse(&format!(".{}", classes.header_menu))?;
        let leaf = Selector::parse(&format!(".{} li", classes.header_menu))?;

        let header = doc.query_selector(doc.root(), &header_sel);
        let button = doc.query_selector(doc.root(), &button_sel);
        let (Some(header), Some(button)) = (header, button) else {
            log::debug!("[Nav] header or burger missing, navigation shell not mounted");
            return Ok(None);
        };

        Ok(Some(Self {
            header,
            button,
            menu: doc.query_selector(doc.root(), &menu_sel),
            leaf,
            overlay: Overlay::new(OverlayOwner::Navigation, classes.overlay.clone()),
            open: false,
            classes: classes.clone(),
        }))
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Click landed on the burger button
    pub fn is_toggle_target(&self, doc: &Document, target: NodeId) -> bool {
        target == self.button || doc.is_descendant_of(target, self.button)
    }

    /// Click landed on a menu item
    pub fn is_leaf_target(&self, doc: &Document, target: NodeId) -> bool {
        let in_menu = self
            .menu
            .is_none_or(|menu| target == menu || doc.is_descendant_of(target, menu));
        in_menu && doc.closest(target, &self.leaf).is_some()
    }

    pub fn toggle(&mut self, doc: &mut Document, lock: &mut ScrollLock) {
        if self.open {
            self.close(doc, lock);
        } else {
            self.open(doc, lock);
        }
    }

    pub fn open(&mut self, doc: &mut Document, lock: &mut ScrollLock) {
        doc.add_class(self.header, &self.classes.header_menu_open);
        doc.add_class(self.button, &self.classes.active);
        self.overlay.add(doc, lock);
        self.open = true;
        log::debug!("[Nav] opened");
    }

    pub fn close(&mut self, doc: &mut Document, lock: &mut ScrollLock) {
        doc.remove_class(self.header, &self.classes.header_menu_open);
        doc.remove_class(self.button, &self.classes.active);
        self.overlay.remove(doc, lock);
        if self.open {
            log::debug!("[Nav] closed");
        }
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeSpec;
    use serde_json::json;

    fn doc() -> Document {
        let spec: NodeSpec = serde_json::from_value(json!({
            "tag": "body",
            "children": [
                {"tag": "header", "class": "header", "children": [
                    {"tag": "button", "class": "header__burger", "children": [{"tag": "span"}]},
                    {"tag": "nav", "class": "header__menu", "children": [
                        {"tag": "ul", "children": [
                            {"tag": "li", "children": [{"tag": "a", "attrs": {"href": "#program"}}]}
                        ]}
                    ]}
                ]}
            ]
        }))
        .unwrap();
        Document::from_spec(&spec)
    }

    #[test]
    fn toggle_locks_scroll() {
        let mut doc = doc();
        let mut lock = ScrollLock::new("no-scroll");
        let mut nav = NavigationShell::mount(&doc, &ClassNames::default()).unwrap().unwrap();

        nav.toggle(&mut doc, &mut lock);
        let header = doc.query_selector(doc.root(), &Selector::parse(".header").unwrap()).unwrap();
        assert!(nav.is_open());
        assert!(doc.has_class(header, "header__menu--open"));
        assert!(doc.has_class(doc.body(), "no-scroll"));
        assert!(nav.overlay().is_active(&doc));

        nav.toggle(&mut doc, &mut lock);
        assert!(!nav.is_open());
        assert!(!doc.has_class(header, "header__menu--open"));
        assert!(!doc.has_class(doc.body(), "no-scroll"));
    }

    #[test]
    fn targets() {
        let doc = doc();
        let nav = NavigationShell::mount(&doc, &ClassNames::default()).unwrap().unwrap();
        let link = doc.query_selector(doc.root(), &Selector::parse("a").unwrap()).unwrap();
        let burger_icon = doc.query_selector(doc.root(), &Selector::parse(".header__burger span").unwrap()).unwrap();

        assert!(nav.is_leaf_target(&doc, link));
        assert!(nav.is_toggle_target(&doc, burger_icon));
        assert!(!nav.is_leaf_target(&doc, burger_icon));
    }

    #[test]
    fn not_mounted_without_burger() {
        let mut doc = Document::new();
        let body = doc.body();
        let header = doc.create_element("header");
        doc.add_class(header, "header");
        doc.append_child(body, header);
        assert!(NavigationShell::mount(&doc, &ClassNames::default()).unwrap().is_none());
    }
}
