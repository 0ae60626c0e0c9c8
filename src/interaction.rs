//! Pointer feedback on the hero.
//!
//! Pointer positions are converted to normalized device coordinates and cast
//! into the scene. Entering the hero scales it up and switches the cursor,
//! leaving scales it back; a click pulses it. The layer keeps at most one
//! hovered object, so each transition fires exactly once per change.

use cgmath::Vector2;

use crate::{
    camera::to_ndc,
    document::{Cursor, Document},
    pick::Raycaster,
    scene::Scene,
};

/// What a pointer event did to the hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroEvent {
    HoverStart,
    HoverEnd,
    Clicked,
}

#[derive(Debug)]
pub struct PointerLayer {
    raycaster: Raycaster,
    ndc: Vector2<f32>,
    hovered: bool,
    enabled: bool,
}

impl PointerLayer {
    /// Build the layer for a scene that has already been set up.
    pub fn new(scene: &Scene) -> Self {
        let ndc = Vector2::new(0.0, 0.0);
        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera(ndc, &scene.camera);
        log::info!("[3D] Interactions ready");
        Self {
            raycaster,
            ndc,
            hovered: false,
            enabled: true,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn ndc(&self) -> Vector2<f32> {
        self.ndc
    }

    fn update_ndc(&mut self, doc: &impl Document, x: f64, y: f64) {
        let viewport = doc.viewport();
        self.ndc = to_ndc(x, y, viewport.width, viewport.height);
    }

    fn hits_hero(&mut self, scene: &Scene) -> bool {
        self.raycaster.set_from_camera(self.ndc, &scene.camera);
        self.raycaster.intersect(&scene.hero.pick_targets()).is_some()
    }

    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        doc: &mut impl Document,
        x: f64,
        y: f64,
    ) -> Option<HeroEvent> {
        if !self.enabled {
            return None;
        }
        self.update_ndc(doc, x, y);
        let hit = self.hits_hero(scene);
        match (hit, self.hovered) {
            (true, false) => {
                self.hovered = true;
                scene.hero.hover_start();
                doc.set_cursor(Cursor::Pointer);
                Some(HeroEvent::HoverStart)
            }
            (false, true) => {
                self.hovered = false;
                scene.hero.hover_end();
                doc.set_cursor(Cursor::Default);
                Some(HeroEvent::HoverEnd)
            }
            _ => None,
        }
    }

    pub fn click(
        &mut self,
        scene: &mut Scene,
        doc: &impl Document,
        x: f64,
        y: f64,
    ) -> Option<HeroEvent> {
        if !self.enabled {
            return None;
        }
        self.update_ndc(doc, x, y);
        if !self.hits_hero(scene) {
            return None;
        }
        scene.hero.pulse();
        log::info!("[3D] Hero core clicked");
        Some(HeroEvent::Clicked)
    }

    pub fn touch_start(&mut self, doc: &impl Document, x: f64, y: f64) {
        if self.enabled {
            self.update_ndc(doc, x, y);
        }
    }

    /// Touch drags tilt the hero directly.
    pub fn touch_move(&mut self, scene: &mut Scene, doc: &impl Document, x: f64, y: f64) {
        if !self.enabled {
            return;
        }
        let viewport = doc.viewport();
        scene.tilt_towards(to_ndc(x, y, viewport.width, viewport.height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, document::memory::MemoryDocument, scene::ScaleState};

    fn setup() -> (Scene, PointerLayer, MemoryDocument) {
        let mut config = Config::default();
        config.hero.detail = 1;
        config.hero.inner_detail = 1;
        let scene = Scene::new(&config, 1280, 720);
        let layer = PointerLayer::new(&scene);
        (scene, layer, MemoryDocument::new(1280.0, 720.0))
    }

    #[test]
    fn hover_fires_once_per_session() {
        let (mut scene, mut layer, mut doc) = setup();
        let mut events = Vec::new();
        for x in [640.0, 645.0, 650.0, 5.0, 10.0, 640.0, 641.0] {
            events.extend(layer.pointer_move(&mut scene, &mut doc, x, 360.0));
        }
        assert_eq!(
            events,
            vec![HeroEvent::HoverStart, HeroEvent::HoverEnd, HeroEvent::HoverStart]
        );
        assert_eq!(doc.cursor(), Cursor::Pointer);
        assert_eq!(scene.hero.scale_state(), ScaleState::Hovered);
    }

    #[test]
    fn click_on_hero_pulses() {
        let (mut scene, mut layer, doc) = setup();
        assert_eq!(layer.click(&mut scene, &doc, 5.0, 5.0), None);
        assert_eq!(layer.click(&mut scene, &doc, 640.0, 360.0), Some(HeroEvent::Clicked));
        assert_eq!(scene.hero.scale_state(), ScaleState::Pulsing);
    }

    #[test]
    fn disabled_layer_ignores_everything() {
        let (mut scene, mut layer, mut doc) = setup();
        layer.disable();
        assert_eq!(layer.pointer_move(&mut scene, &mut doc, 640.0, 360.0), None);
        assert_eq!(layer.click(&mut scene, &doc, 640.0, 360.0), None);
        layer.touch_move(&mut scene, &doc, 0.0, 0.0);
        assert_eq!(scene.pointer(), Vector2::new(0.0, 0.0));
        layer.enable();
        assert!(layer.pointer_move(&mut scene, &mut doc, 640.0, 360.0).is_some());
    }

    #[test]
    fn touch_drag_tilts_the_hero() {
        let (mut scene, mut layer, doc) = setup();
        layer.touch_start(&doc, 1280.0, 0.0);
        assert_eq!(layer.ndc(), Vector2::new(1.0, 1.0));
        layer.touch_move(&mut scene, &doc, 1280.0, 720.0);
        assert_eq!(scene.pointer(), Vector2::new(1.0, -1.0));
        assert_eq!(scene.hero.target_rotation(), Vector2::new(-0.5, 0.5));
    }
}
