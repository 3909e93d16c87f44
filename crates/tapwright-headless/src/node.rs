//! Node storage for the in-memory tree.

use std::collections::HashMap;
use tapwright_core::{Element, ElementHandle, ElementKind, ElementNode, Point, Rect, Size};

/// Description of a node to add.
#[derive(Clone, Debug)]
pub struct NodeSpec {
    kind: ElementKind,
    id: Option<String>,
    text: Option<String>,
    offset: Point,
    size: Size,
    visible: bool,
}

impl NodeSpec {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            text: None,
            offset: Point::ZERO,
            size: Size::new(100.0, 40.0),
            visible: true,
        }
    }

    pub fn container() -> Self {
        Self::new(ElementKind::Container)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text).with_text(text)
    }

    pub fn button(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Button).with_text(text)
    }

    pub fn input(id: impl Into<String>) -> Self {
        Self::new(ElementKind::TextInput).with_id(id).with_text("")
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Position relative to the parent.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.offset = Point::new(x, y);
        self
    }

    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

pub(crate) struct NodeRecord {
    spec: NodeSpec,
    parent: Option<ElementHandle>,
    children: Vec<ElementHandle>,
}

pub(crate) struct NodeStore {
    next_handle: u64,
    root: ElementHandle,
    nodes: HashMap<ElementHandle, NodeRecord>,
}

impl NodeStore {
    pub(crate) fn new(width: f32, height: f32) -> Self {
        let root = ElementHandle(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            NodeRecord {
                spec: NodeSpec::container().sized(width, height),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            next_handle: 1,
            root,
            nodes,
        }
    }

    pub(crate) fn root(&self) -> ElementHandle {
        self.root
    }

    /// Adds under `parent`, falling back to the root if `parent` is gone.
    pub(crate) fn add(&mut self, parent: ElementHandle, spec: NodeSpec) -> ElementHandle {
        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            log::warn!("parent {parent} no longer exists, adding to root");
            self.root
        };
        let handle = ElementHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(
            handle,
            NodeRecord {
                spec,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        if let Some(record) = self.nodes.get_mut(&parent) {
            record.children.push(handle);
        }
        handle
    }

    /// Removes `handle` and its whole subtree. The root only loses children.
    pub(crate) fn remove(&mut self, handle: ElementHandle) {
        let Some(record) = self.nodes.get_mut(&handle) else {
            return;
        };
        let children = std::mem::take(&mut record.children);
        let parent = record.parent;
        for child in children {
            self.remove(child);
        }
        if handle == self.root {
            return;
        }
        self.nodes.remove(&handle);
        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.retain(|child| *child != handle);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.remove(self.root);
    }

    pub(crate) fn contains(&self, handle: ElementHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    pub(crate) fn set_visible(&mut self, handle: ElementHandle, visible: bool) {
        if let Some(record) = self.nodes.get_mut(&handle) {
            record.spec.visible = visible;
        }
    }

    pub(crate) fn set_text(&mut self, handle: ElementHandle, text: &str) {
        if let Some(record) = self.nodes.get_mut(&handle) {
            record.spec.text = Some(text.to_string());
        }
    }

    pub(crate) fn text(&self, handle: ElementHandle) -> Option<String> {
        self.nodes.get(&handle).and_then(|record| record.spec.text.clone())
    }

    pub(crate) fn find_by_id(&self, id: &str) -> Option<ElementHandle> {
        let mut matches: Vec<ElementHandle> = self
            .nodes
            .iter()
            .filter(|(_, record)| record.spec.id.as_deref() == Some(id))
            .map(|(handle, _)| *handle)
            .collect();
        matches.sort();
        matches.into_iter().next()
    }

    pub(crate) fn snapshot(&self) -> ElementNode {
        self.snapshot_node(self.root, Point::ZERO)
    }

    fn snapshot_node(&self, handle: ElementHandle, parent_origin: Point) -> ElementNode {
        let Some(record) = self.nodes.get(&handle) else {
            // Handles in `children` always exist; an empty node keeps the
            // snapshot well-formed regardless.
            return ElementNode::leaf(
                Element {
                    handle,
                    kind: ElementKind::Container,
                    id: None,
                    text: None,
                    bounds: Rect::default(),
                },
                false,
            );
        };
        let origin = parent_origin.offset(record.spec.offset);
        ElementNode {
            element: Element {
                handle,
                kind: record.spec.kind,
                id: record.spec.id.clone(),
                text: record.spec.text.clone(),
                bounds: Rect::from_origin_size(origin, record.spec.size),
            },
            visible: record.spec.visible,
            children: record
                .children
                .iter()
                .map(|child| self.snapshot_node(*child, origin))
                .collect(),
        }
    }
}
