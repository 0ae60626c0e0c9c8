//! Pointer and keyboard tracking outside the 3D scene.

use instant::Duration;

use crate::document::Document;

#[derive(Debug)]
pub struct InputTracker {
    position: (f64, f64),
    moving: bool,
    since_move: Duration,
    idle_after: Duration,
}

impl InputTracker {
    pub fn new(idle_after: Duration) -> Self {
        Self {
            position: (0.0, 0.0),
            moving: false,
            since_move: Duration::ZERO,
            idle_after,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.position = (x, y);
        self.moving = true;
        self.since_move = Duration::ZERO;
    }

    pub fn pointer_leave(&mut self) {
        self.moving = false;
    }

    /// Clears the moving flag once the pointer has rested long enough.
    pub fn advance(&mut self, dt: Duration) {
        if !self.moving {
            return;
        }
        self.since_move += dt;
        if self.since_move >= self.idle_after {
            self.moving = false;
        }
    }

    /// Run the `[data-action]` the clicked element belongs to, if any.
    pub fn click(&mut self, doc: &impl Document, x: f64, y: f64) -> Option<String> {
        let target = doc.element_at(x, y)?;
        let action = doc
            .closest(target, "[data-action]")
            .and_then(|node| doc.attribute(node, "data-action"))?;
        log::info!("Action executed: {}", action);
        Some(action)
    }

    pub fn key_down(&mut self, doc: &mut impl Document, key: &str) {
        if key == "Escape" {
            if let Some(body) = doc.body() {
                doc.remove_class(body, "modal-open");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::site_skeleton;

    #[test]
    fn moving_clears_after_rest() {
        let mut input = InputTracker::new(Duration::from_millis(100));
        input.pointer_move(10.0, 20.0);
        assert!(input.is_moving());
        input.advance(Duration::from_millis(60));
        assert!(input.is_moving());
        input.pointer_move(12.0, 20.0);
        input.advance(Duration::from_millis(60));
        assert!(input.is_moving());
        input.advance(Duration::from_millis(40));
        assert!(!input.is_moving());
        assert_eq!(input.position(), (12.0, 20.0));
    }

    #[test]
    fn leaving_stops_moving() {
        let mut input = InputTracker::new(Duration::from_millis(100));
        input.pointer_move(1.0, 1.0);
        input.pointer_leave();
        assert!(!input.is_moving());
    }

    #[test]
    fn clicks_resolve_data_actions() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut input = InputTracker::new(Duration::from_millis(100));
        let (x, y) = (1280.0 - 150.0, 720.0 * 0.75 + 10.0);
        assert_eq!(input.click(&doc, x, y).as_deref(), Some("contact"));
        assert_eq!(input.click(&doc, 5.0, 5.0), None);

        let body = doc.body().unwrap();
        doc.add_class(body, "modal-open");
        input.key_down(&mut doc, "Enter");
        assert!(doc.has_class(body, "modal-open"));
        input.key_down(&mut doc, "Escape");
        assert!(!doc.has_class(body, "modal-open"));
    }
}
