//! Decorative motion for page elements.
//!
//! [`MotionEngine::new`] declares a fixed set of bindings, each tying elements
//! to a [`Visual`] state and a trigger: the scroll position of a section, the
//! moment an element scrolls into view, pointer hover or a delay after start.
//! The engine only writes styles; nothing reads its state back.
//!
//! The 3D objects animate themselves with the same [`tween`] primitives.

pub mod tween;

use std::{
    collections::HashSet,
    ops::{Add, Mul, Sub},
};

use crate::{
    config::AnimationConfig,
    document::{Document, NodeId},
};
use tween::{Easing, Interpolate, Tween};

const HERO_TEXT: &str = ".hero-text";
const HERO_SECTION: &str = "#hero";
const CARDS: &str = ".skill-vault, .operation-card, .doctrine-card";
const BUTTONS: &str = ".btn";
const METRICS: &str = ".metric-item";

/// Animatable style of an element: opacity, vertical offset in px and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub opacity: f32,
    pub y: f32,
    pub scale: f32,
}

impl Visual {
    pub const REST: Visual = Visual {
        opacity: 1.0,
        y: 0.0,
        scale: 1.0,
    };

    pub fn faded(opacity: f32, y: f32) -> Self {
        Self {
            opacity,
            y,
            ..Self::REST
        }
    }

    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Self::REST
        }
    }

    pub fn apply(&self, doc: &mut impl Document, node: NodeId) {
        doc.set_style(node, "opacity", &format!("{}", self.opacity));
        doc.set_style(
            node,
            "transform",
            &format!("translateY({}px) scale({})", self.y, self.scale),
        );
    }
}

impl Add for Visual {
    type Output = Visual;

    fn add(self, rhs: Visual) -> Visual {
        Visual {
            opacity: self.opacity + rhs.opacity,
            y: self.y + rhs.y,
            scale: self.scale + rhs.scale,
        }
    }
}

impl Sub for Visual {
    type Output = Visual;

    fn sub(self, rhs: Visual) -> Visual {
        Visual {
            opacity: self.opacity - rhs.opacity,
            y: self.y - rhs.y,
            scale: self.scale - rhs.scale,
        }
    }
}

impl Mul<f32> for Visual {
    type Output = Visual;

    fn mul(self, rhs: f32) -> Visual {
        Visual {
            opacity: self.opacity * rhs,
            y: self.y * rhs,
            scale: self.scale * rhs,
        }
    }
}

/// Section progress scrubs the targets between two states, lagging behind by `smoothing`.
#[derive(Debug)]
struct Scrub {
    targets: Vec<NodeId>,
    trigger: NodeId,
    from: Visual,
    to: Visual,
    smoothing: f32,
    progress: Tween<f32>,
}

impl Scrub {
    /// 0 when the trigger's top reaches the viewport centre, 1 when its bottom does.
    fn target_progress(&self, doc: &impl Document) -> f32 {
        let Some(rect) = doc.rect(self.trigger) else {
            return 0.0;
        };
        if rect.height <= 0.0 {
            return 0.0;
        }
        let centre = doc.viewport().height / 2.0;
        ((centre - rect.top) / rect.height).clamp(0.0, 1.0) as f32
    }

    fn update(&mut self, dt: f32, doc: &mut impl Document) {
        let target = self.target_progress(doc);
        if (target - self.progress.to()).abs() > f32::EPSILON {
            let current = self.progress.sample();
            self.progress = Tween::new(current, target, self.smoothing, Easing::Power2Out);
        }
        let p = self.progress.advance(dt);
        let visual = self.from.lerp(self.to, p);
        for node in &self.targets {
            visual.apply(doc, *node);
        }
    }
}

/// Elements matching `selector` fade in once their top crosses `threshold` of the viewport.
#[derive(Debug)]
struct Reveal {
    selector: &'static str,
    seen_generation: Option<u64>,
    known: HashSet<NodeId>,
    pending: Vec<NodeId>,
    running: Vec<(NodeId, Tween<Visual>)>,
    from: Visual,
    threshold: f64,
    duration: f32,
}

impl Reveal {
    fn discover(&mut self, doc: &mut impl Document) {
        let generation = doc.generation();
        if self.seen_generation == Some(generation) {
            return;
        }
        self.seen_generation = Some(generation);
        for node in doc.query_all(self.selector) {
            if self.known.insert(node) {
                self.from.apply(doc, node);
                self.pending.push(node);
            }
        }
    }

    fn update(&mut self, dt: f32, doc: &mut impl Document) {
        self.discover(doc);

        let line = doc.viewport().height * self.threshold;
        let (crossed, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|node| doc.rect(*node).is_some_and(|r| r.top <= line));
        self.pending = waiting;
        self.running.extend(crossed.into_iter().map(|node| {
            (
                node,
                Tween::new(self.from, Visual::REST, self.duration, Easing::Power1Out),
            )
        }));

        for (node, tween) in &mut self.running {
            tween.advance(dt).apply(doc, *node);
        }
        self.running.retain(|(_, tween)| !tween.is_finished());
    }
}

#[derive(Debug)]
struct HoverTarget {
    node: NodeId,
    inside: bool,
    current: Visual,
    tween: Option<Tween<Visual>>,
}

/// Pointer hover scales each target up and back down.
#[derive(Debug)]
struct Hover {
    targets: Vec<HoverTarget>,
    hovered: Visual,
    duration: f32,
}

impl Hover {
    fn pointer(&mut self, doc: &impl Document, position: Option<(f64, f64)>) {
        for target in &mut self.targets {
            let inside = match (position, doc.rect(target.node)) {
                (Some((x, y)), Some(rect)) => rect.contains(x, y),
                _ => false,
            };
            if inside == target.inside {
                continue;
            }
            target.inside = inside;
            let to = if inside { self.hovered } else { Visual::REST };
            target.tween = Some(Tween::new(target.current, to, self.duration, Easing::BackOut));
        }
    }

    fn update(&mut self, dt: f32, doc: &mut impl Document) {
        for target in &mut self.targets {
            if let Some(tween) = &mut target.tween {
                target.current = tween.advance(dt);
                let finished = tween.is_finished();
                target.current.apply(doc, target.node);
                if finished {
                    target.tween = None;
                }
            }
        }
    }
}

/// One-off entrance of every target after a delay, staggered in document order.
#[derive(Debug)]
struct Entrance {
    targets: Vec<(NodeId, Tween<Visual>)>,
    done: bool,
}

impl Entrance {
    fn update(&mut self, dt: f32, doc: &mut impl Document) {
        if self.done {
            return;
        }
        for (node, tween) in &mut self.targets {
            tween.advance(dt).apply(doc, *node);
        }
        self.done = self.targets.iter().all(|(_, t)| t.is_finished());
    }
}

#[derive(Debug)]
enum Binding {
    Scrub(Scrub),
    Reveal(Reveal),
    Hover(Hover),
    Entrance(Entrance),
}

#[derive(Debug, Default)]
pub struct MotionEngine {
    bindings: Vec<Binding>,
}

impl MotionEngine {
    /// Declare every binding. Returns an inert engine when motion is turned off.
    pub fn new(config: &AnimationConfig, doc: &mut impl Document) -> Self {
        if !config.enabled {
            log::warn!("[MOTION] Animations disabled by configuration");
            return Self::default();
        }
        if doc.prefers_reduced_motion() {
            log::warn!("[MOTION] Reduced motion requested, animations disabled");
            return Self::default();
        }

        let mut bindings = Vec::new();

        match doc.query(HERO_SECTION) {
            Some(trigger) => bindings.push(Binding::Scrub(Scrub {
                targets: doc.query_all(HERO_TEXT),
                trigger,
                from: Visual::REST,
                to: Visual::faded(config.hero_text_opacity, config.hero_text_lift),
                smoothing: config.scrub_secs,
                progress: Tween::new(0.0, 0.0, 0.0, Easing::Linear),
            })),
            None => log::debug!("no {} element, hero text stays put", HERO_SECTION),
        }

        bindings.push(Binding::Reveal(Reveal {
            selector: CARDS,
            seen_generation: None,
            known: HashSet::new(),
            pending: Vec::new(),
            running: Vec::new(),
            from: Visual::faded(0.0, config.card_offset),
            threshold: config.card_threshold as f64,
            duration: config.card_secs,
        }));

        bindings.push(Binding::Hover(Hover {
            targets: doc
                .query_all(BUTTONS)
                .into_iter()
                .map(|node| HoverTarget {
                    node,
                    inside: false,
                    current: Visual::REST,
                    tween: None,
                })
                .collect(),
            hovered: Visual::scaled(config.button_scale),
            duration: config.button_secs,
        }));

        let from = Visual::faded(0.0, config.metric_offset);
        let metrics = doc.query_all(METRICS);
        for node in &metrics {
            from.apply(doc, *node);
        }
        bindings.push(Binding::Entrance(Entrance {
            targets: metrics
                .into_iter()
                .enumerate()
                .map(|(i, node)| {
                    let delay = config.metric_delay_secs + i as f32 * config.metric_stagger_secs;
                    let tween = Tween::new(from, Visual::REST, config.metric_secs, Easing::Power2Out)
                        .with_delay(delay);
                    (node, tween)
                })
                .collect(),
            done: false,
        }));

        log::info!("[MOTION] {} bindings declared", bindings.len());
        Self { bindings }
    }

    pub fn is_enabled(&self) -> bool {
        !self.bindings.is_empty()
    }

    pub fn pointer_move(&mut self, doc: &impl Document, x: f64, y: f64) {
        for binding in &mut self.bindings {
            if let Binding::Hover(hover) = binding {
                hover.pointer(doc, Some((x, y)));
            }
        }
    }

    pub fn pointer_leave(&mut self, doc: &impl Document) {
        for binding in &mut self.bindings {
            if let Binding::Hover(hover) = binding {
                hover.pointer(doc, None);
            }
        }
    }

    pub fn update(&mut self, dt: f32, doc: &mut impl Document) {
        for binding in &mut self.bindings {
            match binding {
                Binding::Scrub(scrub) => scrub.update(dt, doc),
                Binding::Reveal(reveal) => reveal.update(dt, doc),
                Binding::Hover(hover) => hover.update(dt, doc),
                Binding::Entrance(entrance) => entrance.update(dt, doc),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, site_skeleton};

    fn run(engine: &mut MotionEngine, doc: &mut MemoryDocument, secs: f32) {
        for _ in 0..(secs * 60.0).ceil() as usize {
            engine.update(1.0 / 60.0, doc);
        }
    }

    #[test]
    fn disabled_by_config_or_preference() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let config = AnimationConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(!MotionEngine::new(&config, &mut doc).is_enabled());
        doc.set_reduced_motion(true);
        assert!(!MotionEngine::new(&AnimationConfig::default(), &mut doc).is_enabled());
    }

    #[test]
    fn metrics_enter_after_delay_with_stagger() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut engine = MotionEngine::new(&AnimationConfig::default(), &mut doc);
        let metrics = doc.query_all(".metric-item");
        assert_eq!(doc.style(metrics[0], "opacity"), Some("0"));

        run(&mut engine, &mut doc, 2.75);
        let first: f32 = doc.style(metrics[0], "opacity").unwrap().parse().unwrap();
        let last: f32 = doc.style(metrics[2], "opacity").unwrap().parse().unwrap();
        assert!(first > 0.0);
        assert_eq!(last, 0.0);

        run(&mut engine, &mut doc, 1.0);
        for node in metrics {
            assert_eq!(doc.style(node, "opacity"), Some("1"));
            assert_eq!(doc.style(node, "transform"), Some("translateY(0px) scale(1)"));
        }
    }

    #[test]
    fn cards_reveal_once_when_scrolled_into_view() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut engine = MotionEngine::new(&AnimationConfig::default(), &mut doc);
        let grid = doc.query("#proof-grid").unwrap();
        let card = doc.append_child(grid, "div", "skill-vault metal-panel", "").unwrap();

        run(&mut engine, &mut doc, 0.1);
        assert_eq!(doc.style(card, "opacity"), Some("0"));

        // card top at 800 crosses 80 % of 720 once scrolled past 224
        doc.scroll_to(300.0);
        run(&mut engine, &mut doc, 1.0);
        assert_eq!(doc.style(card, "opacity"), Some("1"));

        doc.scroll_to(0.0);
        run(&mut engine, &mut doc, 1.0);
        assert_eq!(doc.style(card, "opacity"), Some("1"));
    }

    #[test]
    fn buttons_scale_on_hover() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut engine = MotionEngine::new(&AnimationConfig::default(), &mut doc);
        let btn = doc.query(".btn").unwrap();

        engine.pointer_move(&doc, 60.0, 720.0 * 0.6 + 10.0);
        run(&mut engine, &mut doc, 0.5);
        assert_eq!(doc.style(btn, "transform"), Some("translateY(0px) scale(1.05)"));

        engine.pointer_move(&doc, 5.0, 5.0);
        run(&mut engine, &mut doc, 0.5);
        assert_eq!(doc.style(btn, "transform"), Some("translateY(0px) scale(1)"));
    }

    #[test]
    fn hero_text_fades_as_the_hero_scrolls_away() {
        let mut doc = site_skeleton(1280.0, 720.0);
        let mut engine = MotionEngine::new(&AnimationConfig::default(), &mut doc);
        let text = doc.query(".hero-text").unwrap();

        run(&mut engine, &mut doc, 2.0);
        let resting: f32 = doc.style(text, "opacity").unwrap().parse().unwrap();
        // hero top starts above the centre line, so the scrub begins half way
        assert!((resting - 0.85).abs() < 1e-3);

        doc.scroll_to(720.0);
        run(&mut engine, &mut doc, 2.0);
        assert_eq!(doc.style(text, "opacity"), Some("0.7"));
        assert_eq!(doc.style(text, "transform"), Some("translateY(-30px) scale(1)"));
    }
}
