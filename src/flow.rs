//! Application event loop.
//!
//! The [`App`] is a winit [`ApplicationHandler`] hosting one [`Site`]. Setup is
//! asynchronous on the web: the GPU context and the config resolve in a
//! `spawn_local` task and report back through the event-loop proxy, while the
//! content fetch runs as an independent task. Natively both are driven to
//! completion on a tokio runtime before the first frame.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window (bound to `#three-canvas` on the web) and
//!    starts the config + GPU task and the data task
//! 2. `FlowEvent::Initialized` builds the site; buffered data is rendered
//! 3. page events arrive as `FlowEvent::Page` (web) or translated winit events (native)
//! 4. every `RedrawRequested` advances the site by the elapsed time and asks for the next frame

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::{Config, load_config},
    content::{SiteData, load_site_data},
    context::Context,
    render::GpuRenderer,
    site::{PageEvent, Site},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, prelude::*};

#[cfg(target_arch = "wasm32")]
type HostDocument = crate::document::web::WebDocument;
#[cfg(not(target_arch = "wasm32"))]
type HostDocument = crate::document::MemoryDocument;

#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "three-canvas";

pub(crate) enum FlowEvent {
    Initialized {
        config: Config,
        ctx: Option<Context>,
    },
    Page(PageEvent),
    DataLoaded(SiteData),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { ctx, .. } => f
                .debug_struct("Initialized")
                .field("gpu", &ctx.is_some())
                .finish(),
            Self::Page(event) => f.debug_tuple("Page").field(event).finish(),
            Self::DataLoaded(_) => f.write_str("DataLoaded"),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: EventLoopProxy<FlowEvent>,
    window: Option<Arc<Window>>,
    site: Option<Site<HostDocument>>,
    // data that resolved before the site existed
    pending_data: Option<SiteData>,
    last_time: Instant,
    #[cfg(not(target_arch = "wasm32"))]
    cursor: (f64, f64),
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            window: None,
            site: None,
            pending_data: None,
            last_time: Instant::now(),
            #[cfg(not(target_arch = "wasm32"))]
            cursor: (0.0, 0.0),
        })
    }

    fn initialize(&mut self, config: Config, ctx: Option<Context>) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let Some(doc) = host_document(&window) else {
            return;
        };
        let factory = ctx.map(GpuRenderer::factory);
        let mut site = Site::new(config, doc, factory);
        if let Some(data) = self.pending_data.take() {
            site.on_data(&data);
        }
        #[cfg(target_arch = "wasm32")]
        install_listeners(&self.proxy);
        self.site = Some(site);
        self.last_time = Instant::now();
        window.request_redraw();
    }

    fn on_data(&mut self, data: SiteData) {
        match &mut self.site {
            Some(site) => {
                site.on_data(&data);
            }
            None => self.pending_data = Some(data),
        }
    }

    fn dispatch(&mut self, event: PageEvent) {
        if let Some(site) = &mut self.site {
            if let Some(hero_event) = site.handle(event) {
                log::debug!("hero: {:?}", hero_event);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn logical(&self, position: winit::dpi::PhysicalPosition<f64>) -> (f64, f64) {
        let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let logical: winit::dpi::LogicalPosition<f64> = position.to_logical(scale);
        (logical.x, logical.y)
    }

    /// Translate native window input into page events. On the web the DOM
    /// listeners deliver these instead.
    #[cfg(not(target_arch = "wasm32"))]
    fn translate(&mut self, event: &WindowEvent) {
        use winit::{
            event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase},
            keyboard::Key,
        };

        /// Pixels scrolled per wheel line.
        const LINE_HEIGHT: f64 = 40.0;

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.logical(*position);
                self.cursor = (x, y);
                self.dispatch(PageEvent::PointerMove { x, y });
            }
            WindowEvent::CursorLeft { .. } => self.dispatch(PageEvent::PointerLeave),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor;
                self.dispatch(PageEvent::Click { x, y });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, lines) => -*lines as f64 * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -self.logical(*position).1,
                };
                if let Some(site) = &mut self.site {
                    site.document_mut().scroll_by(dy);
                }
            }
            WindowEvent::Touch(touch) => {
                let (x, y) = self.logical(touch.location);
                match touch.phase {
                    TouchPhase::Started => self.dispatch(PageEvent::TouchStart { x, y }),
                    TouchPhase::Moved => self.dispatch(PageEvent::TouchMove { x, y }),
                    TouchPhase::Ended | TouchPhase::Cancelled => (),
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let key = match &event.logical_key {
                    Key::Named(named) => format!("{:?}", named),
                    Key::Character(c) => c.to_string(),
                    _ => return,
                };
                self.dispatch(PageEvent::KeyDown(key));
            }
            WindowEvent::Occluded(hidden) => {
                self.dispatch(PageEvent::VisibilityChanged { hidden: *hidden })
            }
            _ => (),
        }
    }
}

/// The page the site acts on: the real DOM on the web, a virtual one natively.
fn host_document(window: &Window) -> Option<HostDocument> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = window;
        match crate::document::web::WebDocument::new() {
            Ok(doc) => Some(doc),
            Err(e) => {
                log::error!("[SYSTEM] No document to attach to: {:#}", e);
                None
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        Some(crate::document::memory::site_skeleton(size.width, size.height))
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Vault");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID))
                .and_then(|canvas| canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            if canvas.is_none() {
                log::warn!("no #{} canvas, winit creates its own", CANVAS_ID);
            }
            window_attributes = window_attributes.with_canvas(canvas);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        // the content fetch does not wait for the scene
        let data_future = load_site_data();
        let init_future = async move {
            let config = load_config().await;
            let ctx = match Context::new(window, &config).await {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    log::warn!("[3D] WebGL unavailable. 3D features disabled. ({:#})", e);
                    None
                }
            };
            (config, ctx)
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (config, ctx) = self.async_runtime.block_on(init_future);
            self.initialize(config, ctx);
            let data = self.async_runtime.block_on(data_future);
            self.on_data(data);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let (config, ctx) = init_future.await;
                if proxy.send_event(FlowEvent::Initialized { config, ctx }).is_err() {
                    log::error!("event loop closed before the site was initialised");
                }
            });
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let data = data_future.await;
                if proxy.send_event(FlowEvent::DataLoaded(data)).is_err() {
                    log::error!("event loop closed before the data arrived");
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized { config, ctx } => self.initialize(config, ctx),
            FlowEvent::Page(page_event) => self.dispatch(page_event),
            FlowEvent::DataLoaded(data) => self.on_data(data),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        #[cfg(not(target_arch = "wasm32"))]
        self.translate(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                #[cfg(not(target_arch = "wasm32"))]
                if let (Some(site), Some(window)) = (&mut self.site, &self.window) {
                    let logical = size.to_logical::<f64>(window.scale_factor());
                    site.document_mut().set_viewport(logical.width, logical.height);
                }
                self.dispatch(PageEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                if let Some(site) = &mut self.site {
                    site.frame(dt);
                    // smooth scrolling and the wheel move the virtual page
                    #[cfg(not(target_arch = "wasm32"))]
                    if site.document_mut().take_scroll_change() {
                        site.handle(PageEvent::Scroll);
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Forward window-level DOM events into the event loop. The listeners live as
/// long as the page.
#[cfg(target_arch = "wasm32")]
fn install_listeners(proxy: &EventLoopProxy<FlowEvent>) {
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent, VisibilityState};

    let Some(window) = web_sys::window() else {
        return;
    };

    fn listen(
        target: &web_sys::EventTarget,
        kind: &str,
        proxy: &EventLoopProxy<FlowEvent>,
        to_page: impl Fn(&web_sys::Event) -> Option<PageEvent> + 'static,
    ) {
        let proxy = proxy.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let Some(page_event) = to_page(&event) {
                // the loop is gone once the page unloads
                let _ = proxy.send_event(FlowEvent::Page(page_event));
            }
        });
        if target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("could not listen to {}", kind);
        }
        closure.forget();
    }

    fn first_touch(event: &web_sys::Event) -> Option<(f64, f64)> {
        let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
        Some((touch.client_x() as f64, touch.client_y() as f64))
    }

    listen(&window, "mousemove", proxy, |event| {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        Some(PageEvent::PointerMove {
            x: mouse.client_x() as f64,
            y: mouse.client_y() as f64,
        })
    });
    listen(&window, "click", proxy, |event| {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        Some(PageEvent::Click {
            x: mouse.client_x() as f64,
            y: mouse.client_y() as f64,
        })
    });
    listen(&window, "touchstart", proxy, |event| {
        first_touch(event).map(|(x, y)| PageEvent::TouchStart { x, y })
    });
    listen(&window, "touchmove", proxy, |event| {
        first_touch(event).map(|(x, y)| PageEvent::TouchMove { x, y })
    });
    listen(&window, "scroll", proxy, |_| Some(PageEvent::Scroll));
    listen(&window, "keydown", proxy, |event| {
        Some(PageEvent::KeyDown(event.dyn_ref::<KeyboardEvent>()?.key()))
    });
    listen(&window, "mouseout", proxy, |event| {
        // only when the pointer leaves the page itself
        let mouse = event.dyn_ref::<MouseEvent>()?;
        mouse.related_target().is_none().then_some(PageEvent::PointerLeave)
    });
    if let Some(document) = window.document() {
        let doc = document.clone();
        listen(&document, "visibilitychange", proxy, move |_| {
            Some(PageEvent::VisibilityChanged {
                hidden: doc.visibility_state() == VisibilityState::Hidden,
            })
        });
    }
}

/// Start the site and block until the window closes (returns immediately on the web).
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info)?;
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
