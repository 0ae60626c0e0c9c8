//! Application state: boot sequence, device class, current section and page visibility.

use instant::Duration;

use crate::{
    config::Config,
    document::{Document, Viewport},
};

const BOOT_OVERLAY: &str = "#boot-sequence";
const SECTIONS: &str = "section[id]";

#[derive(Debug)]
pub struct AppCore {
    booted: bool,
    ready: bool,
    boot_elapsed: Duration,
    boot_duration: Duration,
    tablet_breakpoint: f64,
    is_mobile: bool,
    current_section: Option<String>,
    hidden: bool,
}

impl AppCore {
    pub fn new(config: &Config, viewport: Viewport) -> Self {
        let mut core = Self {
            booted: false,
            ready: false,
            boot_elapsed: Duration::ZERO,
            boot_duration: Duration::from_millis(config.animation.boot_duration_ms),
            tablet_breakpoint: config.breakpoints.tablet as f64,
            is_mobile: false,
            current_section: None,
            hidden: false,
        };
        core.check_device(viewport);
        log::info!("[CORE] Boot sequence initiated...");
        core
    }

    pub fn check_device(&mut self, viewport: Viewport) {
        self.is_mobile = viewport.width < self.tablet_breakpoint;
    }

    pub fn is_mobile(&self) -> bool {
        self.is_mobile
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Count frame time towards the boot delay. Returns true on the one frame the
    /// boot overlay is dismissed.
    pub fn advance_boot(&mut self, dt: Duration, doc: &mut impl Document) -> bool {
        if self.booted {
            return false;
        }
        self.boot_elapsed += dt;
        if self.boot_elapsed < self.boot_duration {
            return false;
        }

        match doc.query(BOOT_OVERLAY) {
            Some(overlay) => doc.add_class(overlay, "hidden"),
            None => log::debug!("no {} element", BOOT_OVERLAY),
        }
        if let Some(body) = doc.body() {
            doc.remove_class(body, "boot-mode");
            doc.add_class(body, "ready");
        }
        self.booted = true;
        self.ready = true;
        log::info!("[CORE] System online. Ready for interaction.");
        true
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current_section.as_deref()
    }

    pub fn update_section(&mut self, id: &str) {
        if self.current_section.as_deref() == Some(id) {
            return;
        }
        self.current_section = Some(id.to_string());
        log::info!("[CORE] Current section: {}", id);
    }

    /// Pick the `section[id]` crossing the middle of the viewport.
    pub fn track_section(&mut self, doc: &impl Document) {
        let centre = doc.viewport().height / 2.0;
        let current = doc.query_all(SECTIONS).into_iter().find_map(|node| {
            let rect = doc.rect(node)?;
            (rect.top <= centre && rect.bottom() > centre)
                .then(|| doc.attribute(node, "id"))
                .flatten()
        });
        if let Some(id) = current {
            self.update_section(&id);
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            log::info!("[CORE] Page hidden - reducing activity");
        } else {
            log::info!("[CORE] Page visible - resuming activity");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::site_skeleton;

    #[test]
    fn boots_once_after_the_delay() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut core = AppCore::new(&Config::default(), doc.viewport());
        assert!(!core.advance_boot(Duration::from_millis(2499), &mut doc));
        assert!(!core.is_booted());
        assert!(core.advance_boot(Duration::from_millis(1), &mut doc));
        assert!(core.is_booted() && core.is_ready());
        assert!(!core.advance_boot(Duration::from_secs(10), &mut doc));

        let body = doc.body().unwrap();
        let overlay = doc.query("#boot-sequence").unwrap();
        assert!(doc.has_class(overlay, "hidden"));
        assert!(doc.has_class(body, "ready"));
        assert!(!doc.has_class(body, "boot-mode"));
    }

    #[test]
    fn device_class_follows_width() {
        let mut core = AppCore::new(
            &Config::default(),
            Viewport {
                width: 500.0,
                height: 800.0,
            },
        );
        assert!(core.is_mobile());
        core.check_device(Viewport {
            width: 768.0,
            height: 800.0,
        });
        assert!(!core.is_mobile());
    }

    #[test]
    fn section_under_the_viewport_centre() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut core = AppCore::new(&Config::default(), doc.viewport());
        core.track_section(&doc);
        assert_eq!(core.current_section(), Some("hero"));
        doc.scroll_to(720.0 * 2.0);
        core.track_section(&doc);
        assert_eq!(core.current_section(), Some("operations"));
    }
}
