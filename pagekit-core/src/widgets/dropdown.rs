//! Styled replacement for native single-select controls

use serde::Serialize;

use crate::config::ClassNames;
use crate::dom::{Document, NodeId, Selector};
use crate::error::{CoreError, CoreResult};
use crate::types::{ChangeEvent, DropdownId};

/// One entry of the native select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Part of a dropdown hit by a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownHit {
    /// Option row at `index`
    Row { dropdown: DropdownId, index: usize },
    /// The styled face (or its title)
    Face { dropdown: DropdownId },
}

/// Dropdown widget built over one `<select>`
///
/// The markup it generates:
///
/// ```text
/// div.select
/// ├── select.select-hidden      (native control, moved inside)
/// ├── div.select-styled
/// │   └── span.select-styled__title
/// └── ul.select-options
///     └── li[rel=<value>] ...   (one per option, same order)
/// ```
#[derive(Debug)]
pub struct Dropdown {
    id: DropdownId,
    source: NodeId,
    wrapper: NodeId,
    styled: NodeId,
    title: NodeId,
    list: NodeId,
    rows: Vec<NodeId>,
    options: Vec<SelectOption>,
    placeholder: String,
    selected: Option<usize>,
    open: bool,
}

impl Dropdown {
    /// Replace `source` with the styled widget
    ///
    /// Fails with [`CoreError::EmptySelect`] when the select has no options;
    /// the document is left untouched in that case.
    pub fn mount(
        doc: &mut Document,
        id: DropdownId,
        source: NodeId,
        classes: &ClassNames,
    ) -> CoreResult<Self> {
        let options: Vec<SelectOption> = doc
            .options(source)
            .into_iter()
            .map(|option| SelectOption {
                label: doc.text_content(option),
                value: doc.option_value(option),
            })
            .collect();
        let Some(first) = options.first() else {
            let name = doc.attr(source, "name").unwrap_or("<unnamed>").to_string();
            return Err(CoreError::EmptySelect(name));
        };
        let placeholder = doc
            .data(source, "title")
            .filter(|title| !title.is_empty())
            .map_or_else(|| first.label.clone(), str::to_string);

        doc.add_class(source, &classes.select_hidden);

        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, &classes.select_wrapper);
        if let Some(parent) = doc.parent(source) {
            doc.insert_before(parent, wrapper, Some(source));
        }
        doc.append_child(wrapper, source);

        let styled = doc.create_element("div");
        doc.add_class(styled, &classes.select_styled);
        doc.append_child(wrapper, styled);

        let title = doc.create_element("span");
        doc.add_class(title, &classes.select_title);
        doc.set_text(title, &placeholder);
        doc.append_child(styled, title);

        let list = doc.create_element("ul");
        doc.add_class(list, &classes.select_options);
        doc.insert_after(styled, list);

        let rows = options
            .iter()
            .map(|option| {
                let row = doc.create_element("li");
                doc.set_text(row, &option.label);
                doc.set_attr(row, "rel", &option.value);
                doc.append_child(list, row);
                row
            })
            .collect();

        log::debug!("[Dropdown] mounted {} with {} option(s)", id.index(), options.len());

        Ok(Self {
            id,
            source,
            wrapper,
            styled,
            title,
            list,
            rows,
            options,
            placeholder,
            selected: None,
            open: false,
        })
    }

    pub fn id(&self) -> DropdownId {
        self.id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn wrapper(&self) -> NodeId {
        self.wrapper
    }

    pub fn styled(&self) -> NodeId {
        self.styled
    }

    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, doc: &mut Document, open: bool, classes: &ClassNames) {
        self.open = open;
        if open {
            doc.add_class(self.styled, &classes.active);
            doc.add_class(self.list, &classes.open);
        } else {
            doc.remove_class(self.styled, &classes.active);
            doc.remove_class(self.list, &classes.open);
        }
    }

    /// Pick the option at `index` and notify the native select
    fn select(&mut self, doc: &mut Document, index: usize, classes: &ClassNames) -> Option<ChangeEvent> {
        let option = self.options.get(index)?.clone();

        doc.set_text(self.title, &option.label);
        doc.remove_class(self.title, &classes.active);
        doc.set_value(self.source, &option.value);
        self.set_open(doc, false, classes);

        for (i, row) in self.rows.iter().enumerate() {
            if i == index {
                doc.add_class(*row, &classes.active);
            } else {
                doc.remove_class(*row, &classes.active);
            }
        }
        doc.add_class(self.wrapper, &classes.selected);
        self.selected = Some(index);

        if let Ok(invalid) = Selector::parse(&format!(".{}", classes.invalid)) {
            if let Some(marked) = doc.closest(self.source, &invalid) {
                doc.remove_class(marked, &classes.invalid);
                doc.remove_attr(marked, "data-error");
            }
        }
        doc.remove_attr(self.source, "data-error");

        Some(ChangeEvent {
            source: self.source,
            value: option.value,
        })
    }

    /// Back to the freshly mounted look (after the owning form is reset)
    fn reset(&mut self, doc: &mut Document, classes: &ClassNames) {
        self.set_open(doc, false, classes);
        doc.set_text(self.title, &self.placeholder);
        for row in &self.rows {
            doc.remove_class(*row, &classes.active);
        }
        doc.remove_class(self.wrapper, &classes.selected);
        self.selected = None;
    }
}

/// All dropdowns of a page; at most one is open
#[derive(Debug)]
pub struct DropdownRegistry {
    classes: ClassNames,
    widgets: Vec<Dropdown>,
    open: Option<DropdownId>,
}

impl DropdownRegistry {
    pub fn new(classes: ClassNames) -> Self {
        Self {
            classes,
            widgets: Vec::new(),
            open: None,
        }
    }

    /// Mount a dropdown over every match of `selector`; empty selects are logged and skipped
    pub fn mount_all(&mut self, doc: &mut Document, selector: &Selector) {
        for source in doc.query_selector_all(doc.root(), selector) {
            if doc.tag(source) != "select" {
                continue;
            }
            let id = DropdownId(self.widgets.len());
            match Dropdown::mount(doc, id, source, &self.classes) {
                Ok(widget) => self.widgets.push(widget),
                Err(e) => log::warn!("[Dropdown] skipped: {e}"),
            }
        }
    }

    pub fn get(&self, id: DropdownId) -> Option<&Dropdown> {
        self.widgets.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dropdown> {
        self.widgets.iter()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn open_dropdown(&self) -> Option<DropdownId> {
        self.open
    }

    /// Dropdown part under `target`, if any
    pub fn hit(&self, doc: &Document, target: NodeId) -> Option<DropdownHit> {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            for widget in &self.widgets {
                if let Some(index) = widget.rows.iter().position(|row| *row == node) {
                    return Some(DropdownHit::Row {
                        dropdown: widget.id,
                        index,
                    });
                }
                if widget.styled == node {
                    return Some(DropdownHit::Face { dropdown: widget.id });
                }
            }
            cursor = doc.parent(node);
        }
        None
    }

    /// Flip one dropdown, closing every other first
    pub fn toggle(&mut self, doc: &mut Document, id: DropdownId) {
        let Some(target) = self.widgets.get(id.0) else {
            return;
        };
        let open = !target.open;
        for widget in &mut self.widgets {
            if widget.id != id && widget.open {
                widget.set_open(doc, false, &self.classes);
            }
        }
        if let Some(widget) = self.widgets.get_mut(id.0) {
            widget.set_open(doc, open, &self.classes);
        }
        self.open = open.then_some(id);
    }

    pub fn select(&mut self, doc: &mut Document, id: DropdownId, index: usize) -> Option<ChangeEvent> {
        let widget = self.widgets.get_mut(id.0)?;
        let change = widget.select(doc, index, &self.classes)?;
        if self.open == Some(id) {
            self.open = None;
        }
        log::debug!("[Dropdown] {} -> {:?}", id.index(), change.value);
        Some(change)
    }

    pub fn close_all(&mut self, doc: &mut Document) {
        for widget in &mut self.widgets {
            if widget.open {
                widget.set_open(doc, false, &self.classes);
            }
        }
        self.open = None;
    }

    /// Reset every dropdown whose native select lives under `scope`
    pub fn reset_within(&mut self, doc: &mut Document, scope: NodeId) {
        for widget in &mut self.widgets {
            if doc.is_descendant_of(widget.source, scope) {
                widget.reset(doc, &self.classes);
                if self.open == Some(widget.id) {
                    self.open = None;
                }
            }
        }
    }
}
