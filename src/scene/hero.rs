//! The hero: two nested wireframe icosahedra with a point light at their centre.
//!
//! Rotation eases towards a target set by the pointer. Scale is driven by at most
//! one tween at a time; hover and click feedback hand over to each other so that
//! the hero always comes back to the scale matching its hover state.

use cgmath::{Vector2, Vector3};

use crate::{
    config::{HeroConfig, MouseConfig, linear_rgb},
    data_structures::{
        geometry::{PolyMesh, icosahedron},
        instance::{Instance, Style},
    },
    motion::tween::{Easing, Tween},
    pick::Target,
    scene::PointLight,
};

/// Tilt easing step per 60 Hz frame, in seconds.
const TILT_STEP: f32 = 0.016;

/// Which visual state the scale is in. Exactly one applies at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleState {
    Idle,
    Hovered,
    Pulsing,
}

#[derive(Debug)]
enum ScaleMotion {
    /// Heading to the resting scale of the current hover state.
    Settle(Tween<Vector3<f32>>),
    /// Click feedback: up to the pulse scale and back to where it started.
    Pulse(Tween<Vector3<f32>>),
}

#[derive(Debug)]
pub struct Hero {
    pub outer: PolyMesh,
    pub inner: PolyMesh,
    pub outer_style: Style,
    pub inner_style: Style,
    pub core_light: PointLight,
    rotation: Vector2<f32>,
    target_rotation: Vector2<f32>,
    scale: Vector3<f32>,
    motion: Option<ScaleMotion>,
    hovered: bool,
    config: HeroConfig,
}

impl Hero {
    pub fn new(config: &HeroConfig) -> Self {
        let primary = linear_rgb(config.color_primary);
        let secondary = linear_rgb(config.color_secondary);
        let light = &config.core_light;
        Self {
            outer: icosahedron(config.radius, config.detail),
            inner: icosahedron(config.radius * config.inner_ratio, config.inner_detail),
            outer_style: Style {
                color: primary,
                opacity: config.opacity,
                emissive: primary.map(|c| c * config.emissive_intensity),
                size: 0.0,
            },
            inner_style: Style {
                color: secondary,
                opacity: config.opacity * config.inner_opacity_ratio,
                emissive: secondary.map(|c| c * config.inner_emissive_intensity),
                size: 0.0,
            },
            core_light: PointLight {
                color: linear_rgb(light.color),
                intensity: light.intensity,
                range: light.range,
                position: light.position.into(),
            },
            rotation: Vector2::new(0.0, 0.0),
            target_rotation: Vector2::new(0.0, 0.0),
            scale: config.scale_idle.into(),
            motion: None,
            hovered: false,
            config: config.clone(),
        }
    }

    pub fn rotation(&self) -> Vector2<f32> {
        self.rotation
    }

    pub fn target_rotation(&self) -> Vector2<f32> {
        self.target_rotation
    }

    pub fn set_target_rotation(&mut self, target: Vector2<f32>) {
        self.target_rotation = target;
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn scale_state(&self) -> ScaleState {
        match (&self.motion, self.hovered) {
            (Some(ScaleMotion::Pulse(_)), _) => ScaleState::Pulsing,
            (_, true) => ScaleState::Hovered,
            (_, false) => ScaleState::Idle,
        }
    }

    /// Whether a scale tween is still running.
    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    fn resting_scale(&self) -> Vector3<f32> {
        if self.hovered {
            self.config.scale_hover.into()
        } else {
            self.config.scale_idle.into()
        }
    }

    fn settle(&mut self) {
        let target = self.resting_scale();
        self.motion = if self.scale == target {
            None
        } else {
            Some(ScaleMotion::Settle(Tween::new(
                self.scale,
                target,
                self.config.hover_secs,
                Easing::BackOut,
            )))
        };
    }

    pub fn hover_start(&mut self) {
        self.hovered = true;
        // a running pulse finishes first and settles afterwards
        if !matches!(self.motion, Some(ScaleMotion::Pulse(_))) {
            self.settle();
        }
    }

    pub fn hover_end(&mut self) {
        self.hovered = false;
        if !matches!(self.motion, Some(ScaleMotion::Pulse(_))) {
            self.settle();
        }
    }

    /// Scale up to the pulse scale and back once.
    pub fn pulse(&mut self) {
        let base = match &self.motion {
            // clicking again mid-pulse restarts from the same base instead of creeping upwards
            Some(ScaleMotion::Pulse(tween)) => tween.from(),
            _ => self.scale,
        };
        self.motion = Some(ScaleMotion::Pulse(
            Tween::new(
                base,
                self.config.scale_pulse.into(),
                self.config.pulse_secs,
                Easing::Power2Out,
            )
            .yoyo(1),
        ));
    }

    pub(crate) fn tick(&mut self, dt: f32, pointer: Vector2<f32>, mouse: &MouseConfig) {
        let frames = dt * 60.0;
        let ease = (mouse.tilt_ease * TILT_STEP * frames).min(1.0);
        self.rotation += (self.target_rotation - self.rotation) * ease;
        if pointer.x.abs() < mouse.idle_threshold && pointer.y.abs() < mouse.idle_threshold {
            self.rotation.x += mouse.idle_spin[0] * frames;
            self.rotation.y += mouse.idle_spin[1] * frames;
        }

        let finished = match &mut self.motion {
            Some(ScaleMotion::Settle(tween)) | Some(ScaleMotion::Pulse(tween)) => {
                self.scale = tween.advance(dt);
                tween.is_finished()
            }
            None => false,
        };
        if finished {
            let was_pulse = matches!(self.motion, Some(ScaleMotion::Pulse(_)));
            self.motion = None;
            if was_pulse {
                self.settle();
            }
        }
    }

    pub fn transform(&self) -> Instance {
        Instance::new()
            .with_euler(self.rotation.x, self.rotation.y, 0.0)
            .with_scale(self.scale)
    }

    /// Outer and inner shell in world space, for ray picking.
    pub fn pick_targets(&self) -> [Target<'_>; 2] {
        let transform = self.transform();
        [
            Target {
                mesh: &self.outer,
                transform: transform.clone(),
            },
            Target {
                mesh: &self.inner,
                transform,
            },
        ]
    }

    /// The core light follows the hero's transform.
    pub fn world_core_light(&self) -> PointLight {
        let world = &self.transform() * &Instance::from(self.core_light.position);
        PointLight {
            position: world.position,
            ..self.core_light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(hero: &mut Hero, secs: f32) {
        let mouse = MouseConfig::default();
        for _ in 0..(secs / DT).ceil() as usize {
            hero.tick(DT, Vector2::new(0.5, 0.5), &mouse);
        }
    }

    fn hero() -> Hero {
        Hero::new(&HeroConfig {
            detail: 1,
            inner_detail: 1,
            ..HeroConfig::default()
        })
    }

    #[test]
    fn hover_then_leave_returns_to_idle() {
        let mut hero = hero();
        hero.hover_start();
        assert_eq!(hero.scale_state(), ScaleState::Hovered);
        run(&mut hero, 0.5);
        assert_eq!(hero.scale(), Vector3::new(1.1, 1.1, 1.1));
        hero.hover_end();
        run(&mut hero, 0.5);
        assert_eq!(hero.scale(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(hero.scale_state(), ScaleState::Idle);
        assert!(!hero.is_animating());
    }

    #[test]
    fn pulse_returns_to_pre_click_scale() {
        let mut hero = hero();
        hero.pulse();
        assert_eq!(hero.scale_state(), ScaleState::Pulsing);
        run(&mut hero, 0.15);
        assert!(hero.scale().x > 1.15);
        run(&mut hero, 0.2);
        assert_eq!(hero.scale(), Vector3::new(1.0, 1.0, 1.0));
        assert!(!hero.is_animating());
    }

    #[test]
    fn leaving_during_pulse_settles_to_idle() {
        let mut hero = hero();
        hero.hover_start();
        run(&mut hero, 0.5);
        hero.pulse();
        run(&mut hero, 0.1);
        hero.hover_end();
        assert_eq!(hero.scale_state(), ScaleState::Pulsing);
        run(&mut hero, 0.25);
        // pulse landed back on the hover scale and now heads for idle
        assert_eq!(hero.scale_state(), ScaleState::Idle);
        run(&mut hero, 0.5);
        assert_eq!(hero.scale(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn repeated_clicks_do_not_creep() {
        let mut hero = hero();
        hero.pulse();
        run(&mut hero, 0.1);
        hero.pulse();
        run(&mut hero, 0.1);
        hero.pulse();
        run(&mut hero, 0.5);
        assert_eq!(hero.scale(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn rotation_eases_towards_target() {
        let mut hero = hero();
        hero.set_target_rotation(Vector2::new(0.25, -0.5));
        run(&mut hero, 1.0);
        let r = hero.rotation();
        assert!(r.x > 0.0 && r.x < 0.25);
        assert!(r.y < 0.0 && r.y > -0.5);
        run(&mut hero, 20.0);
        assert!((hero.rotation() - hero.target_rotation()).x.abs() < 1e-3);
    }

    #[test]
    fn one_frame_closes_tilt_ease_times_step() {
        let mouse = MouseConfig::default();
        let mut hero = hero();
        hero.set_target_rotation(Vector2::new(1.0, -1.0));
        hero.tick(DT, Vector2::new(0.5, 0.5), &mouse);
        let expected = mouse.tilt_ease * 0.016;
        assert!((hero.rotation().x - expected).abs() < 1e-6);
        assert!((hero.rotation().y + expected).abs() < 1e-6);
    }

    #[test]
    fn idle_spin_only_without_pointer() {
        let mouse = MouseConfig::default();
        let mut hero = hero();
        hero.tick(DT, Vector2::new(0.0, 0.0), &mouse);
        assert!(hero.rotation().x > 0.0 && hero.rotation().y > hero.rotation().x);
        let mut still = self::hero();
        still.tick(DT, Vector2::new(0.2, 0.0), &mouse);
        assert_eq!(still.rotation(), Vector2::new(0.0, 0.0));
    }
}
