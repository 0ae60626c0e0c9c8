//! The page the site draws into.
//!
//! Everything outside the canvas is an HTML document the site does not own: it
//! toggles classes, writes inline styles, appends cards and reads layout. The
//! [`Document`] trait is that contract. [`web::WebDocument`] implements it on
//! top of the browser DOM, [`memory::MemoryDocument`] keeps a small element tree
//! in memory for the native preview and for tests.
//!
//! Elements are addressed through opaque [`NodeId`]s handed out by the document.
//! Selectors are restricted to what the site uses: comma separated lists of
//! compound selectors made of a tag, `#id`, `.class` and `[attr]` parts.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use memory::MemoryDocument;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Bounding box relative to the viewport, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.bottom()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

pub trait Document {
    fn query(&self, selector: &str) -> Option<NodeId>;
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// Append a new `tag` element with the given class list and inner HTML to `parent`.
    fn append_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        class: &str,
        inner_html: &str,
    ) -> anyhow::Result<NodeId>;

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn rect(&self, node: NodeId) -> Option<Rect>;
    /// Topmost element under the given client position.
    fn element_at(&self, x: f64, y: f64) -> Option<NodeId>;
    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId>;

    fn viewport(&self) -> Viewport;
    fn scroll_y(&self) -> f64;
    /// Total height of the scrollable document.
    fn scroll_height(&self) -> f64;
    fn scroll_to(&mut self, y: f64);

    /// Changes whenever elements are added, so that lazily bound targets can be rediscovered.
    fn generation(&self) -> u64;

    fn set_cursor(&mut self, cursor: Cursor);

    /// Whether the user asked the platform to minimise motion.
    fn prefers_reduced_motion(&self) -> bool {
        false
    }

    fn body(&self) -> Option<NodeId> {
        self.query("body")
    }
}

/// One compound selector such as `section[id]` or `.metal-panel.skill-vault`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<String>,
}

impl Compound {
    pub fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if selector.is_empty() || selector.contains(char::is_whitespace) {
            return None;
        }
        let mut compound = Compound::default();
        let mut rest = selector;
        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];
        while let Some(kind) = rest.chars().next() {
            rest = &rest[kind.len_utf8()..];
            if kind == '[' {
                let end = rest.find(']')?;
                compound.attributes.push(rest[..end].to_string());
                rest = &rest[end + 1..];
                continue;
            }
            let end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
            let name = rest[..end].to_string();
            if name.is_empty() {
                return None;
            }
            match kind {
                '#' => compound.id = Some(name),
                '.' => compound.classes.push(name),
                _ => return None,
            }
            rest = &rest[end..];
        }
        Some(compound)
    }
}

/// Split a selector list on commas. Parts that do not parse are dropped with a debug log.
pub fn parse_selector_list(selectors: &str) -> Vec<Compound> {
    selectors
        .split(',')
        .filter_map(|part| {
            let parsed = Compound::parse(part);
            if parsed.is_none() {
                log::debug!("unsupported selector '{}'", part.trim());
            }
            parsed
        })
        .collect()
}

/// Hands out stable [`NodeId`]s for host elements.
///
/// The host stamps each element with the index it got (`tag`), so finding an
/// element again is a single index check instead of a scan.
#[derive(Debug)]
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) struct Registry<T> {
    items: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<T: PartialEq + Clone> Registry<T> {
    /// Returns the id for `item` and whether it was newly added. A new item must
    /// be stamped with `id.0` by the caller.
    pub(crate) fn register(&mut self, item: T, tag: Option<usize>) -> (NodeId, bool) {
        if let Some(idx) = tag {
            if self.items.get(idx) == Some(&item) {
                return (NodeId(idx), false);
            }
        }
        self.items.push(item);
        (NodeId(self.items.len() - 1), true)
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<T> {
        self.items.get(node.0).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_reuses_tagged_items() {
        let mut registry = Registry::default();
        let (a, new) = registry.register("a", None);
        assert!(new);
        let (b, _) = registry.register("b", None);
        assert_eq!(registry.register("a", Some(a.0)), (a, false));
        assert_eq!(registry.register("b", Some(b.0)), (b, false));
        assert_eq!(registry.len(), 2);

        // a stale or foreign tag does not alias another item
        let (c, new) = registry.register("c", Some(a.0));
        assert!(new);
        assert_ne!(c, a);
        assert_eq!(registry.get(c), Some("c"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn parses_compound_selectors() {
        let c = Compound::parse("section[id]").unwrap();
        assert_eq!(c.tag.as_deref(), Some("section"));
        assert_eq!(c.attributes, vec!["id".to_string()]);

        let c = Compound::parse(".operation-card.metal-panel").unwrap();
        assert_eq!(c.tag, None);
        assert_eq!(c.classes, vec!["operation-card", "metal-panel"]);

        let c = Compound::parse("#boot-sequence").unwrap();
        assert_eq!(c.id.as_deref(), Some("boot-sequence"));
    }

    #[test]
    fn selector_lists_split_on_commas() {
        let list = parse_selector_list(".skill-vault, .operation-card, .doctrine-card");
        assert_eq!(list.len(), 3);
        assert!(parse_selector_list("nav a").is_empty());
        assert!(Compound::parse("[data-target").is_none());
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect {
            left: 10.0,
            top: 10.0,
            width: 10.0,
            height: 10.0,
        };
        assert!(r.contains(10.0, 10.0));
        assert!(!r.contains(20.0, 15.0));
        assert_eq!(r.bottom(), 20.0);
    }
}
