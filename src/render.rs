//! Drawing the scene.
//!
//! The rendering capability is modelled as a [`SceneRenderer`] trait object
//! created once at startup. [`GpuRenderer`] is the wgpu implementation; the
//! site keeps running without one when no adapter or surface is available.
//!
//! Per frame the renderer uploads transforms, then collects one [`Render`]
//! per scene object and sorts the draws into pipeline batches before issuing
//! them in a single pass.

use crate::{
    camera::CameraResources,
    context::Context,
    data_structures::instance::{Instance, Style},
    pipelines::{
        Pipelines,
        environment::{EnvironmentResources, EnvironmentUniform},
    },
    resources::mesh::GpuMesh,
    scene::Scene,
};

/// Something that can draw a [`Scene`] into a surface of a given size.
pub trait SceneRenderer {
    fn resize(&mut self, width: u32, height: u32);
    fn size(&self) -> (u32, u32);
    fn render(&mut self, scene: &Scene) -> anyhow::Result<()>;
}

/// Creates the renderer for a freshly built scene. Called at most once.
pub type RendererFactory = Box<dyn FnOnce(&Scene) -> anyhow::Result<Box<dyn SceneRenderer>>>;

/// A single draw: static vertices and one instance.
pub struct Drawable<'a> {
    pub vertices: &'a wgpu::Buffer,
    pub instance: &'a wgpu::Buffer,
    pub amount: u32,
}

impl<'a> From<&'a GpuMesh> for Drawable<'a> {
    fn from(mesh: &'a GpuMesh) -> Self {
        Drawable {
            vertices: &mesh.vertex_buffer,
            instance: &mesh.instance_buffer,
            amount: mesh.num_vertices,
        }
    }
}

/// How a scene object is drawn.
///
/// - `None` renders nothing, e.g. a fully transparent object
/// - `Lines(Drawable)` renders a line list
/// - `Points(Drawable)` renders camera-facing particle quads
/// - `Composed(Vec<Render>)` recursively renders multiple objects
pub enum Render<'a> {
    None,
    Lines(Drawable<'a>),
    Points(Drawable<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Sort the draws into per-pipeline batches, keeping submission order.
    pub(crate) fn set_pipelines(self, lines: &mut Vec<Drawable<'a>>, points: &mut Vec<Drawable<'a>>) {
        match self {
            Render::Lines(drawable) => lines.push(drawable),
            Render::Points(drawable) => points.push(drawable),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(lines, points)),
            Render::None => (),
        }
    }
}

struct SceneMeshes {
    grid: GpuMesh,
    hero_outer: GpuMesh,
    hero_inner: GpuMesh,
    particles: GpuMesh,
}

impl SceneMeshes {
    fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        Self {
            grid: GpuMesh::lines(device, "grid", &scene.grid.lines),
            hero_outer: GpuMesh::lines(device, "hero outer", &scene.hero.outer.wireframe()),
            hero_inner: GpuMesh::lines(device, "hero inner", &scene.hero.inner.wireframe()),
            particles: GpuMesh::particles(device, "particles", &scene.particles.points),
        }
    }

    fn write(&self, queue: &wgpu::Queue, scene: &Scene) {
        let hero = scene.hero.transform();
        let place = |mesh: &GpuMesh, transform: &Instance, style: &Style| {
            mesh.write_instance(queue, transform.to_raw(style));
        };
        place(&self.grid, &scene.grid.transform(), &scene.grid.style);
        place(&self.hero_outer, &hero, &scene.hero.outer_style);
        place(&self.hero_inner, &hero, &scene.hero.inner_style);
        place(&self.particles, &scene.particles.transform(), &scene.particles.style);
    }

    fn renders<'a>(&'a self, scene: &Scene) -> Render<'a> {
        let visible = |mesh: &'a GpuMesh, style: &Style, render: fn(Drawable<'a>) -> Render<'a>| {
            if style.opacity <= 0.0 || mesh.num_vertices == 0 {
                Render::None
            } else {
                render(mesh.into())
            }
        };
        Render::Composed(vec![
            visible(&self.grid, &scene.grid.style, Render::Lines),
            visible(&self.particles, &scene.particles.style, Render::Points),
            // inner shell first so the outer one blends over it
            visible(&self.hero_inner, &scene.hero.inner_style, Render::Lines),
            visible(&self.hero_outer, &scene.hero.outer_style, Render::Lines),
        ])
    }
}

pub struct GpuRenderer {
    ctx: Context,
    camera: CameraResources,
    environment: EnvironmentResources,
    pipelines: Pipelines,
    meshes: SceneMeshes,
}

impl GpuRenderer {
    pub fn new(mut ctx: Context, scene: &Scene) -> Self {
        let camera = CameraResources::new(&ctx.device, &scene.camera);
        let environment = EnvironmentResources::new(
            &ctx.device,
            EnvironmentUniform::new(&scene.ambient, &scene.fog, &scene.point_lights()),
        );
        let pipelines = Pipelines::new(
            &ctx.device,
            &ctx.config,
            &camera.bind_group_layout,
            &environment.bind_group_layout,
        );
        let meshes = SceneMeshes::new(&ctx.device, scene);
        let (width, height) = ctx.size();
        ctx.resize(width, height);
        log::info!("[3D] Renderer ready");
        Self {
            ctx,
            camera,
            environment,
            pipelines,
            meshes,
        }
    }

    /// Build the factory the site calls once its scene exists.
    pub fn factory(ctx: Context) -> RendererFactory {
        Box::new(move |scene| Ok(Box::new(GpuRenderer::new(ctx, scene)) as Box<dyn SceneRenderer>))
    }

    fn draw(&mut self, scene: &Scene) -> Result<(), wgpu::CurrentSurfaceTexture> {
        // Rendering requires the surface to be configured
        if !self.ctx.is_surface_configured {
            return Ok(());
        }

        self.camera.write(&self.ctx.queue, &scene.camera);
        self.environment
            .write(&self.ctx.queue, &scene.ambient, &scene.fog, &scene.point_lights());
        self.meshes.write(&self.ctx.queue, scene);

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            status => return Err(status),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let mut lines = Vec::new();
            let mut points = Vec::new();
            self.meshes.renders(scene).set_pipelines(&mut lines, &mut points);

            render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
            render_pass.set_bind_group(1, &self.environment.bind_group, &[]);

            render_pass.set_pipeline(&self.pipelines.lines);
            for drawable in lines {
                render_pass.set_vertex_buffer(0, drawable.vertices.slice(..));
                render_pass.set_vertex_buffer(1, drawable.instance.slice(..));
                render_pass.draw(0..drawable.amount, 0..1);
            }

            render_pass.set_pipeline(&self.pipelines.particles);
            for drawable in points {
                render_pass.set_vertex_buffer(0, drawable.vertices.slice(..));
                render_pass.set_vertex_buffer(1, drawable.instance.slice(..));
                render_pass.draw(0..drawable.amount, 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl SceneRenderer for GpuRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    fn render(&mut self, scene: &Scene) -> anyhow::Result<()> {
        match self.draw(scene) {
            Ok(()) => Ok(()),
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                self.ctx.reconfigure();
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!("Unable to render {:?}", e)),
        }
    }
}
