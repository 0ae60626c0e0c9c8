//! Page scroll tracking.
//!
//! Recomputes how far down the page the reader is on every scroll event and
//! mirrors it into the `.scroll-progress` bar. No smoothing, no debouncing.

use crate::document::Document;

const PROGRESS_SELECTOR: &str = ".scroll-progress";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Down,
    #[default]
    Up,
}

#[derive(Debug, Default)]
pub struct ScrollTracker {
    fraction: f32,
    direction: Direction,
    last_offset: f64,
    depth: u8,
}

/// Share of the scrollable distance covered at `offset`, clamped to `[0, 1]`.
pub fn scroll_fraction(offset: f64, scroll_height: f64, viewport_height: f64) -> f32 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (offset / scrollable).clamp(0.0, 1.0) as f32
}

impl ScrollTracker {
    /// Track the document's current position right away. The previous offset
    /// starts at the page top, so a page restored mid-scroll reads as `Down`.
    pub fn new(doc: &mut impl Document) -> Self {
        let mut tracker = Self::default();
        tracker.update(doc);
        tracker
    }

    /// Recompute the scroll state and write the progress bar. Returns the new fraction.
    pub fn update(&mut self, doc: &mut impl Document) -> f32 {
        let offset = doc.scroll_y();
        self.fraction = scroll_fraction(offset, doc.scroll_height(), doc.viewport().height);
        self.direction = if offset > self.last_offset {
            Direction::Down
        } else {
            Direction::Up
        };
        self.last_offset = offset;
        self.depth = (self.fraction * 100.0).round() as u8;

        match doc.query(PROGRESS_SELECTOR) {
            Some(bar) => doc.set_style(bar, "height", &format!("{}%", self.fraction * 100.0)),
            None => log::debug!("no {} element", PROGRESS_SELECTOR),
        }
        self.fraction
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Scroll position as a whole percentage, 0 to 100.
    pub fn depth(&self) -> u8 {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::site_skeleton;

    #[test]
    fn fraction_is_clamped_and_monotonic() {
        let mut previous = 0.0;
        for step in 0..=100 {
            let offset = step as f64 * 30.0;
            let f = scroll_fraction(offset, 3600.0, 720.0);
            assert!((0.0..=1.0).contains(&f));
            assert!(f >= previous);
            previous = f;
        }
        assert_eq!(scroll_fraction(5000.0, 3600.0, 720.0), 1.0);
        assert_eq!(scroll_fraction(-10.0, 3600.0, 720.0), 0.0);
    }

    #[test]
    fn nothing_to_scroll_means_zero() {
        assert_eq!(scroll_fraction(0.0, 720.0, 720.0), 0.0);
        assert_eq!(scroll_fraction(100.0, 500.0, 720.0), 0.0);
    }

    #[test]
    fn restored_position_counts_as_scrolling_down() {
        let mut doc = site_skeleton(1280.0, 720.0);
        doc.scroll_to(720.0);
        let tracker = ScrollTracker::new(&mut doc);
        assert_eq!(tracker.direction(), Direction::Down);
        assert_eq!(tracker.depth(), 25);
    }

    #[test]
    fn tracks_direction_and_writes_the_bar() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut tracker = ScrollTracker::new(&mut doc);
        assert_eq!(tracker.fraction(), 0.0);
        assert_eq!(tracker.direction(), Direction::Up);

        doc.scroll_to(1440.0);
        assert_eq!(tracker.update(&mut doc), 0.5);
        assert_eq!(tracker.direction(), Direction::Down);
        assert_eq!(tracker.depth(), 50);
        let bar = doc.query(".scroll-progress").unwrap();
        assert_eq!(doc.style(bar, "height"), Some("50%"));

        doc.scroll_to(720.0);
        tracker.update(&mut doc);
        assert_eq!(tracker.direction(), Direction::Up);
        assert_eq!(tracker.depth(), 25);
    }
}
