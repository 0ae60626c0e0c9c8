//! The page as a whole.
//!
//! [`Site`] owns every subsystem and the document they act on. The host feeds
//! it frame deltas, [`PageEvent`]s and, once the asynchronous fetch resolves,
//! the portfolio data. Nothing here blocks: data loading happens outside and
//! the scene, pointer layer and motion bindings never wait for it.

use instant::Duration;

use crate::{
    camera::to_ndc,
    config::Config,
    content::{Rendered, SiteData, render_content},
    core::AppCore,
    document::Document,
    input::InputTracker,
    interaction::{HeroEvent, PointerLayer},
    motion::MotionEngine,
    navigation::Navigator,
    render::{RendererFactory, SceneRenderer},
    scene::Scene,
    scroll::ScrollTracker,
};

/// Longest step the scene advances in one frame, in seconds. Stalls and
/// throttled tabs would otherwise make the spins jump.
const MAX_SCENE_STEP: f32 = 0.1;

/// Everything the page reacts to. Coordinates are CSS pixels relative to the viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Click { x: f64, y: f64 },
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    /// The document scroll offset changed; the tracker reads the new offset itself.
    Scroll,
    Resize { width: u32, height: u32 },
    KeyDown(String),
    VisibilityChanged { hidden: bool },
}

pub struct Site<D: Document> {
    config: Config,
    doc: D,
    core: AppCore,
    input: InputTracker,
    scroll: ScrollTracker,
    navigator: Navigator,
    motion: MotionEngine,
    scene: Option<Scene>,
    pointer: Option<PointerLayer>,
    renderer: Option<Box<dyn SceneRenderer>>,
    rendered: Option<Rendered>,
}

impl<D: Document> Site<D> {
    /// Bring up every subsystem in order. Without a renderer factory, or when it
    /// fails, the 3D layer is skipped and the page runs 2D only.
    pub fn new(config: Config, mut doc: D, renderer: Option<RendererFactory>) -> Self {
        log::info!("[SYSTEM] Initializing...");

        let input = InputTracker::new(Duration::from_millis(config.animation.input_idle_ms));
        let scroll = ScrollTracker::new(&mut doc);
        let mut core = AppCore::new(&config, doc.viewport());
        core.track_section(&doc);

        let (scene, renderer) = match renderer {
            Some(factory) => {
                let viewport = doc.viewport();
                let scene = Scene::new(&config, viewport.width as u32, viewport.height as u32);
                match factory(&scene) {
                    Ok(renderer) => (Some(scene), Some(renderer)),
                    Err(e) => {
                        log::warn!("[3D] Rendering unavailable, 3D features disabled: {:#}", e);
                        (None, None)
                    }
                }
            }
            None => {
                log::warn!("[3D] No renderer. 3D features disabled.");
                (None, None)
            }
        };
        let pointer = scene.as_ref().map(PointerLayer::new);

        let motion = MotionEngine::new(&config.animation, &mut doc);
        let navigator = Navigator::new(&config.animation);

        Self {
            config,
            doc,
            core,
            input,
            scroll,
            navigator,
            motion,
            scene,
            pointer,
            renderer,
            rendered: None,
        }
    }

    /// Advance every clock by `dt` and draw a frame unless the page is hidden.
    pub fn frame(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        self.input.advance(dt);
        self.core.advance_boot(dt, &mut self.doc);
        self.navigator.advance(secs, &mut self.doc);
        self.motion.update(secs, &mut self.doc);

        if self.core.is_hidden() {
            return;
        }
        if let Some(scene) = &mut self.scene {
            scene.tick(secs.min(MAX_SCENE_STEP));
            if let Some(renderer) = &mut self.renderer {
                if let Err(e) = renderer.render(scene) {
                    log::error!("{:#}", e);
                }
            }
        }
    }

    /// Dispatch one page event. Returns what happened to the hero, if anything.
    pub fn handle(&mut self, event: PageEvent) -> Option<HeroEvent> {
        match event {
            PageEvent::PointerMove { x, y } => {
                self.input.pointer_move(x, y);
                self.motion.pointer_move(&self.doc, x, y);
                let (scene, pointer) = (self.scene.as_mut()?, self.pointer.as_mut()?);
                let viewport = self.doc.viewport();
                scene.tilt_towards(to_ndc(x, y, viewport.width, viewport.height));
                pointer.pointer_move(scene, &mut self.doc, x, y)
            }
            PageEvent::PointerLeave => {
                self.input.pointer_leave();
                self.motion.pointer_leave(&self.doc);
                None
            }
            PageEvent::Click { x, y } => {
                self.input.click(&self.doc, x, y);
                self.navigator.click(&self.doc, x, y);
                let (scene, pointer) = (self.scene.as_mut()?, self.pointer.as_mut()?);
                pointer.click(scene, &self.doc, x, y)
            }
            PageEvent::TouchStart { x, y } => {
                self.pointer.as_mut()?.touch_start(&self.doc, x, y);
                None
            }
            PageEvent::TouchMove { x, y } => {
                let (scene, pointer) = (self.scene.as_mut()?, self.pointer.as_mut()?);
                pointer.touch_move(scene, &self.doc, x, y);
                None
            }
            PageEvent::Scroll => {
                let fraction = self.scroll.update(&mut self.doc);
                if let Some(scene) = &mut self.scene {
                    scene.set_scroll_depth(fraction);
                }
                self.core.track_section(&self.doc);
                None
            }
            PageEvent::Resize { width, height } => {
                if let Some(scene) = &mut self.scene {
                    scene.resize(width, height);
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(width, height);
                }
                self.core.check_device(self.doc.viewport());
                None
            }
            PageEvent::KeyDown(key) => {
                self.input.key_down(&mut self.doc, &key);
                None
            }
            PageEvent::VisibilityChanged { hidden } => {
                self.core.set_hidden(hidden);
                None
            }
        }
    }

    /// Stamp the cards into the page. Only the first call has an effect.
    pub fn on_data(&mut self, data: &SiteData) -> Rendered {
        if let Some(rendered) = self.rendered {
            log::debug!("content already rendered");
            return rendered;
        }
        let rendered = render_content(&mut self.doc, data);
        log::info!(
            "[SYSTEM] Rendered {} skills, {} projects, {} doctrines, {} timeline entries",
            rendered.skills,
            rendered.projects,
            rendered.doctrines,
            rendered.timeline
        );
        self.rendered = Some(rendered);
        rendered
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn core(&self) -> &AppCore {
        &self.core
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn motion(&self) -> &MotionEngine {
        &self.motion
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn pointer(&self) -> Option<&PointerLayer> {
        self.pointer.as_ref()
    }

    pub fn pointer_mut(&mut self) -> Option<&mut PointerLayer> {
        self.pointer.as_mut()
    }

    pub fn renderer_size(&self) -> Option<(u32, u32)> {
        self.renderer.as_ref().map(|renderer| renderer.size())
    }

    pub fn rendered(&self) -> Option<Rendered> {
        self.rendered
    }
}
