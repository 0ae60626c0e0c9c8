#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use instant::Duration;
use vault_folio::{
    Config, PageEvent, Site,
    document::{Document, memory::{MemoryDocument, site_skeleton}},
    render::{RendererFactory, SceneRenderer},
    scene::Scene,
};

pub(crate) const FRAME: Duration = Duration::from_millis(16);

/// What the site asked of its renderer.
#[derive(Debug, Default)]
pub(crate) struct RenderLog {
    frames: u32,
    size: (u32, u32),
    resizes: Vec<(u32, u32)>,
    last_aspect: Option<f32>,
}

impl RenderLog {
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn resizes(&self) -> &[(u32, u32)] {
        &self.resizes
    }

    pub fn last_aspect(&self) -> Option<f32> {
        self.last_aspect
    }
}

/// Renderer without a GPU; records frames and sizes.
pub(crate) struct HeadlessRenderer(Rc<RefCell<RenderLog>>);

impl SceneRenderer for HeadlessRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        let mut log = self.0.borrow_mut();
        if width > 0 && height > 0 {
            log.size = (width, height);
        }
        log.resizes.push((width, height));
    }

    fn size(&self) -> (u32, u32) {
        self.0.borrow().size
    }

    fn render(&mut self, scene: &Scene) -> anyhow::Result<()> {
        let mut log = self.0.borrow_mut();
        log.frames += 1;
        log.last_aspect = Some(scene.camera.aspect);
        Ok(())
    }
}

pub(crate) fn headless(log: Rc<RefCell<RenderLog>>, width: u32, height: u32) -> RendererFactory {
    log.borrow_mut().size = (width, height);
    Box::new(move |_| Ok(Box::new(HeadlessRenderer(log)) as Box<dyn SceneRenderer>))
}

/// Defaults with a coarse hero, which keeps picking cheap.
pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.hero.detail = 1;
    config.hero.inner_detail = 1;
    config
}

/// A site over the standard page skeleton with a headless renderer.
pub(crate) fn site(width: u32, height: u32) -> (Site<MemoryDocument>, Rc<RefCell<RenderLog>>) {
    site_with(test_config(), width, height)
}

pub(crate) fn site_with(config: Config, width: u32, height: u32) -> (Site<MemoryDocument>, Rc<RefCell<RenderLog>>) {
    let log = Rc::new(RefCell::new(RenderLog::default()));
    let doc = site_skeleton(width as f64, height as f64);
    let site = Site::new(config, doc, Some(headless(log.clone(), width, height)));
    (site, log)
}

/// Advance like the native host does: one frame, then report any scroll movement.
pub(crate) fn run_frames(site: &mut Site<MemoryDocument>, frames: u32) {
    for _ in 0..frames {
        site.frame(FRAME);
        if site.document_mut().take_scroll_change() {
            site.handle(PageEvent::Scroll);
        }
    }
}

pub(crate) fn scroll_to(site: &mut Site<MemoryDocument>, offset: f64) {
    site.document_mut().scroll_to(offset);
    site.document_mut().take_scroll_change();
    site.handle(PageEvent::Scroll);
}
