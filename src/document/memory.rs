//! In-memory document.
//!
//! A flat arena of elements with a fixed block layout: every element has a
//! document-space box, appended children stack below their previous siblings
//! inside the parent. Good enough to drive the site natively (the window shows
//! only the canvas) and to observe its effects in tests.

use std::collections::BTreeMap;

use crate::document::{Compound, Cursor, Document, NodeId, Rect, Viewport, parse_selector_list};

/// Height given to elements appended at runtime, such as cards.
pub const APPENDED_HEIGHT: f64 = 240.0;

#[derive(Clone, Debug, Default)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub inner_html: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Box in document coordinates.
    pub bounds: Rect,
}

impl Element {
    fn matches(&self, compound: &Compound) -> bool {
        compound.tag.as_ref().is_none_or(|tag| *tag == self.tag)
            && compound
                .id
                .as_ref()
                .is_none_or(|id| self.attributes.get("id") == Some(id))
            && compound.classes.iter().all(|c| self.classes.contains(c))
            && compound
                .attributes
                .iter()
                .all(|a| self.attributes.contains_key(a))
    }
}

#[derive(Debug)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    viewport: Viewport,
    scroll_y: f64,
    scroll_height: f64,
    scroll_changed: bool,
    generation: u64,
    cursor: Cursor,
    reduced_motion: bool,
}

impl MemoryDocument {
    /// Empty document holding only `<body>`, as tall as the viewport.
    pub fn new(width: f64, height: f64) -> Self {
        let body = Element {
            tag: "body".to_string(),
            bounds: Rect {
                left: 0.0,
                top: 0.0,
                width,
                height,
            },
            ..Default::default()
        };
        Self {
            elements: vec![body],
            viewport: Viewport { width, height },
            scroll_y: 0.0,
            scroll_height: height,
            scroll_changed: false,
            generation: 0,
            cursor: Cursor::Default,
            reduced_motion: false,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node).map_or(&[], |e| e.children.as_slice())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?.style.get(property).map(String::as_str)
    }

    pub fn inner_html(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.inner_html.as_str())
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Insert a laid out element. `attributes` may carry `id` and `class`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
        bounds: Rect,
    ) -> NodeId {
        let mut element = Element {
            tag: tag.to_ascii_lowercase(),
            parent: Some(parent),
            bounds,
            ..Default::default()
        };
        for (name, value) in attributes {
            if *name == "class" {
                element.classes = value.split_whitespace().map(str::to_string).collect();
            }
            element.attributes.insert(name.to_string(), value.to_string());
        }
        let id = NodeId(self.elements.len());
        self.elements.push(element);
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.children.push(id);
        }
        self.scroll_height = self.scroll_height.max(bounds.top + bounds.height);
        self.generation += 1;
        id
    }

    /// Full width block at the given document offset.
    pub fn block(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)], top: f64, height: f64) -> NodeId {
        let width = self.viewport.width;
        self.insert(
            parent,
            tag,
            attributes,
            Rect {
                left: 0.0,
                top,
                width,
                height,
            },
        )
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.viewport.height).max(0.0)
    }

    /// Scroll by a delta as a wheel would, clamped to the document.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll_y + delta);
    }

    /// Whether the scroll offset changed since the last call.
    pub fn take_scroll_change(&mut self) -> bool {
        std::mem::take(&mut self.scroll_changed)
    }

    fn matches_any(&self, node: NodeId, list: &[Compound]) -> bool {
        self.element(node)
            .is_some_and(|e| list.iter().any(|c| e.matches(c)))
    }

    fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.element(node).and_then(|e| e.parent);
        while let Some(p) = current {
            depth += 1;
            current = self.element(p).and_then(|e| e.parent);
        }
        depth
    }
}

impl Document for MemoryDocument {
    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let list = parse_selector_list(selector);
        (0..self.elements.len())
            .map(NodeId)
            .filter(|n| self.matches_any(*n, &list))
            .collect()
    }

    fn append_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        class: &str,
        inner_html: &str,
    ) -> anyhow::Result<NodeId> {
        let parent_el = self
            .element(parent)
            .ok_or_else(|| anyhow::anyhow!("no element {:?}", parent))?;
        let top = parent_el
            .children
            .last()
            .and_then(|c| self.element(*c))
            .map_or(parent_el.bounds.top, |c| c.bounds.bottom());
        let bounds = Rect {
            left: parent_el.bounds.left,
            top,
            width: parent_el.bounds.width,
            height: APPENDED_HEIGHT,
        };
        let node = self.insert(parent, tag, &[("class", class)], bounds);
        if let Some(e) = self.elements.get_mut(node.0) {
            e.inner_html = inner_html.to_string();
        }
        if let Some(p) = self.elements.get_mut(parent.0) {
            p.bounds.height = p.bounds.height.max(bounds.bottom() - p.bounds.top);
        }
        Ok(node)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            if !e.classes.iter().any(|c| c == class) {
                e.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(e) = self.elements.get_mut(node.0) {
            e.style.insert(property.to_string(), value.to_string());
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.attributes.get(name).cloned()
    }

    fn rect(&self, node: NodeId) -> Option<Rect> {
        let bounds = self.element(node)?.bounds;
        Some(Rect {
            top: bounds.top - self.scroll_y,
            ..bounds
        })
    }

    fn element_at(&self, x: f64, y: f64) -> Option<NodeId> {
        (0..self.elements.len())
            .map(NodeId)
            .filter(|n| self.rect(*n).is_some_and(|r| r.contains(x, y)))
            // deepest wins, later siblings paint over earlier ones
            .max_by_key(|n| (self.depth(*n), n.0))
    }

    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let list = parse_selector_list(selector);
        let mut current = Some(node);
        while let Some(n) = current {
            if self.matches_any(n, &list) {
                return Some(n);
            }
            current = self.element(n)?.parent;
        }
        None
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn scroll_to(&mut self, y: f64) {
        let y = y.clamp(0.0, self.max_scroll());
        if y != self.scroll_y {
            self.scroll_y = y;
            self.scroll_changed = true;
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.root())
    }
}

/// The page structure the site expects, laid out for the given viewport.
///
/// Sections are one viewport tall each: hero, proof, operations, doctrine and
/// timeline, preceded by the boot overlay, progress bar and navigation.
pub fn site_skeleton(width: f64, height: f64) -> MemoryDocument {
    let mut doc = MemoryDocument::new(width, height);
    let body = doc.root();
    doc.add_class(body, "boot-mode");

    doc.insert(
        body,
        "div",
        &[("id", "boot-sequence"), ("class", "boot-sequence")],
        Rect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        },
    );
    doc.insert(
        body,
        "div",
        &[("class", "scroll-progress")],
        Rect {
            left: 0.0,
            top: 0.0,
            width: 4.0,
            height: 0.0,
        },
    );

    let sections = ["hero", "proof", "operations", "doctrine", "timeline"];
    let mut section_nodes = Vec::new();
    for (i, id) in sections.iter().enumerate() {
        let node = doc.block(body, "section", &[("id", id)], i as f64 * height, height);
        section_nodes.push(node);
    }

    let hero = section_nodes[0];
    doc.block(hero, "div", &[("class", "hero-text")], height * 0.25, height * 0.3);
    for (i, target) in ["proof", "operations"].iter().enumerate() {
        doc.insert(
            hero,
            "a",
            &[("class", "btn"), ("data-target", target)],
            Rect {
                left: 40.0 + i as f64 * 200.0,
                top: height * 0.6,
                width: 160.0,
                height: 48.0,
            },
        );
    }
    for i in 0..3 {
        doc.insert(
            hero,
            "div",
            &[("class", "metric-item")],
            Rect {
                left: 40.0 + i as f64 * 200.0,
                top: height * 0.75,
                width: 160.0,
                height: 60.0,
            },
        );
    }
    doc.insert(
        hero,
        "button",
        &[("class", "action"), ("data-action", "contact")],
        Rect {
            left: width - 200.0,
            top: height * 0.75,
            width: 160.0,
            height: 48.0,
        },
    );

    let containers = [
        (1, "proof-grid"),
        (2, "operations-container"),
        (3, "doctrine-grid"),
        (4, "timeline-container"),
    ];
    for (section, id) in containers {
        let top = section as f64 * height + 80.0;
        doc.block(section_nodes[section], "div", &[("id", id)], top, 0.0);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_has_the_page_contract() {
        let doc = site_skeleton(1280.0, 720.0);
        for selector in [
            "#boot-sequence",
            ".scroll-progress",
            "#proof-grid",
            "#operations-container",
            "#doctrine-grid",
            "#timeline-container",
            "#hero",
            ".hero-text",
        ] {
            assert!(doc.query(selector).is_some(), "{}", selector);
        }
        assert_eq!(doc.query_all("section[id]").len(), 5);
        assert_eq!(doc.query_all(".btn").len(), 2);
        assert_eq!(doc.query_all(".metric-item").len(), 3);
        assert_eq!(doc.scroll_height(), 5.0 * 720.0);
        assert!(doc.has_class(doc.root(), "boot-mode"));
    }

    #[test]
    fn appended_children_stack() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let grid = doc.query("#proof-grid").unwrap();
        let before = doc.generation();
        let a = doc.append_child(grid, "div", "skill-vault metal-panel", "<h3>A</h3>").unwrap();
        let b = doc.append_child(grid, "div", "skill-vault metal-panel", "<h3>B</h3>").unwrap();
        assert!(doc.generation() > before);
        assert_eq!(doc.children(grid), &[a, b]);
        assert_eq!(doc.rect(b).unwrap().top, doc.rect(a).unwrap().bottom());
        assert_eq!(doc.query_all(".skill-vault.metal-panel").len(), 2);
        assert_eq!(doc.inner_html(a), Some("<h3>A</h3>"));
    }

    #[test]
    fn scrolling_moves_rects_and_clamps() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let proof = doc.query("#proof").unwrap();
        assert_eq!(doc.rect(proof).unwrap().top, 720.0);
        doc.scroll_to(500.0);
        assert!(doc.take_scroll_change());
        assert!(!doc.take_scroll_change());
        assert_eq!(doc.rect(proof).unwrap().top, 220.0);
        doc.scroll_to(1.0e9);
        assert_eq!(doc.scroll_y(), 4.0 * 720.0);
        doc.scroll_by(-1.0e9);
        assert_eq!(doc.scroll_y(), 0.0);
    }

    #[test]
    fn hit_testing_finds_the_deepest_element() {
        let doc = site_skeleton(1280.0, 720.0);
        let hit = doc.element_at(60.0, 720.0 * 0.6 + 10.0).unwrap();
        assert_eq!(doc.attribute(hit, "data-target").as_deref(), Some("proof"));
        let hero = doc.query("#hero").unwrap();
        assert_eq!(doc.closest(hit, "section[id]"), Some(hero));
        assert_eq!(doc.closest(hit, "[data-action]"), None);
    }
}
