//! Smooth scrolling to page sections from `[data-target]` links.

use crate::{
    config::AnimationConfig,
    document::Document,
    motion::tween::{Easing, Tween},
};

#[derive(Debug)]
pub struct Navigator {
    offset: f64,
    duration: f32,
    scroll: Option<Tween<f32>>,
}

impl Navigator {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            offset: config.nav_offset,
            duration: config.nav_secs,
            scroll: None,
        }
    }

    /// If the click landed on a `[data-target]` link, start scrolling to its section.
    /// Returns the id of the section being scrolled to.
    pub fn click(&mut self, doc: &impl Document, x: f64, y: f64) -> Option<String> {
        let hit = doc.element_at(x, y)?;
        let link = doc.closest(hit, "[data-target]")?;
        let target = doc.attribute(link, "data-target")?;
        self.scroll_to_section(doc, &target).then_some(target)
    }

    /// Start scrolling so that `#id` ends up `offset` pixels below the viewport top.
    pub fn scroll_to_section(&mut self, doc: &impl Document, id: &str) -> bool {
        let Some(rect) = doc.query(&format!("#{}", id)).and_then(|node| doc.rect(node)) else {
            log::debug!("navigation target #{} not found", id);
            return false;
        };
        let from = doc.scroll_y();
        let to = (from + rect.top - self.offset).max(0.0);
        self.scroll = Some(Tween::new(from as f32, to as f32, self.duration, Easing::Power2InOut));
        true
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Step a running smooth scroll and apply it to the document.
    pub fn advance(&mut self, dt: f32, doc: &mut impl Document) {
        let Some(tween) = &mut self.scroll else {
            return;
        };
        let y = tween.advance(dt);
        let finished = tween.is_finished();
        doc.scroll_to(y as f64);
        if finished {
            self.scroll = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::site_skeleton;

    #[test]
    fn link_click_scrolls_to_section_minus_offset() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut nav = Navigator::new(&AnimationConfig::default());
        let target = nav.click(&doc, 60.0, 720.0 * 0.6 + 10.0);
        assert_eq!(target.as_deref(), Some("proof"));
        assert!(nav.is_scrolling());

        nav.advance(0.5, &mut doc);
        let halfway = doc.scroll_y();
        assert!(halfway > 0.0 && halfway < 660.0);
        nav.advance(0.6, &mut doc);
        assert!(!nav.is_scrolling());
        assert_eq!(doc.scroll_y(), 660.0);
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let doc = site_skeleton(1280.0, 720.0);
        let mut nav = Navigator::new(&AnimationConfig::default());
        assert!(!nav.scroll_to_section(&doc, "missing"));
        assert!(!nav.is_scrolling());
        assert_eq!(nav.click(&doc, 5.0, 5.0), None);
    }
}
