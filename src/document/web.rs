//! Browser DOM backend.
//!
//! Elements are looked up with `querySelector` and kept in a registry so that the
//! rest of the site can hold plain [`NodeId`]s. Each registered element carries
//! its index in a `data-node-id` attribute, so looking it up again is constant
//! time. The registry only grows; the page is not expected to remove the
//! elements the site binds to.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::document::{Cursor, Document, NodeId, Rect, Registry, Viewport};

const NODE_ATTR: &str = "data-node-id";

pub struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
    nodes: RefCell<Registry<Element>>,
    generation: Cell<u64>,
}

impl WebDocument {
    pub fn new() -> anyhow::Result<Self> {
        let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("window has no document"))?;
        Ok(Self {
            window,
            document,
            nodes: RefCell::new(Registry::default()),
            generation: Cell::new(0),
        })
    }

    fn register(&self, element: Element) -> NodeId {
        let tag = element
            .get_attribute(NODE_ATTR)
            .and_then(|value| value.parse().ok());
        let (node, added) = self.nodes.borrow_mut().register(element.clone(), tag);
        if added && element.set_attribute(NODE_ATTR, &node.0.to_string()).is_err() {
            log::debug!("could not tag element {:?}", node);
        }
        node
    }

    fn get(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node)
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.get(node)?.dyn_into::<HtmlElement>().ok()
    }
}

impl Document for WebDocument {
    fn query(&self, selector: &str) -> Option<NodeId> {
        let element = self.document.query_selector(selector).ok()??;
        Some(self.register(element))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            log::debug!("invalid selector '{}'", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.register(element))
            .collect()
    }

    fn append_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        class: &str,
        inner_html: &str,
    ) -> anyhow::Result<NodeId> {
        let parent = self
            .get(parent)
            .ok_or_else(|| anyhow::anyhow!("unknown node {:?}", parent))?;
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| anyhow::anyhow!("create_element({}) failed: {:?}", tag, e))?;
        element.set_class_name(class);
        element.set_inner_html(inner_html);
        parent
            .append_child(&element)
            .map_err(|e| anyhow::anyhow!("append_child failed: {:?}", e))?;
        self.generation.set(self.generation.get() + 1);
        Ok(self.register(element))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get(node) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get(node) {
            let _ = element.class_list().remove_1(class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.html(node) {
            let _ = element.style().set_property(property, value);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.get(node)?.get_attribute(name)
    }

    fn rect(&self, node: NodeId) -> Option<Rect> {
        let r = self.get(node)?.get_bounding_client_rect();
        Some(Rect {
            left: r.left(),
            top: r.top(),
            width: r.width(),
            height: r.height(),
        })
    }

    fn element_at(&self, x: f64, y: f64) -> Option<NodeId> {
        let element = self.document.element_from_point(x as f32, y as f32)?;
        Some(self.register(element))
    }

    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
        let element = self.get(node)?.closest(selector).ok()??;
        Some(self.register(element))
    }

    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Viewport {
            width: dimension(self.window.inner_width()),
            height: dimension(self.window.inner_height()),
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_height(&self) -> f64 {
        self.document
            .document_element()
            .map_or(0.0, |root| root.scroll_height() as f64)
    }

    fn scroll_to(&mut self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if let Some(body) = self.document.body() {
            let _ = body.style().set_property("cursor", cursor.as_css());
        }
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn body(&self) -> Option<NodeId> {
        let body: Element = self.document.body()?.into();
        Some(self.register(body))
    }
}
