//! vault-folio
//!
//! A single-page portfolio with a 3D hero scene, running in the browser via
//! WASM/WebGL2 or natively in a window as a preview. The page itself is
//! reached through the [`document::Document`] trait, so every behaviour can be
//! driven headless over the in-memory document.
//!
//! High-level modules
//! - `site`: the orchestrator owning every subsystem, fed frames and page events
//! - `flow`: the winit event loop hosting a site on native and web
//! - `scene`: hero mesh, lights, grid and particles, advanced every frame
//! - `camera` / `pick`: perspective camera and CPU ray picking
//! - `interaction`: hover, click and touch feedback on the hero
//! - `scroll`, `navigation`, `input`, `core`: page state and chrome
//! - `motion`: tweens and the DOM animation bindings
//! - `content`: portfolio data, loading with a fallback, card templates
//! - `context` / `render` / `pipelines`: the wgpu renderer
//! - `config` / `resources`: tunables and asset loading
//!

pub mod camera;
pub mod config;
pub mod content;
pub mod context;
pub mod core;
pub mod data_structures;
pub mod document;
pub mod flow;
pub mod input;
pub mod interaction;
pub mod motion;
pub mod navigation;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod scroll;
pub mod site;

pub use config::Config;
pub use site::{PageEvent, Site};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::run().map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
