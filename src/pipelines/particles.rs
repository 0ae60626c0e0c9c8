use crate::{
    data_structures::instance::InstanceRaw,
    pipelines::mk_render_pipeline,
    resources::mesh::{ParticleVertex, Vertex},
};

/// Camera-facing quads for the particle cloud. The quad size comes from the instance.
pub fn mk_particles_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Particle Shader"),
        source: wgpu::ShaderSource::Wgsl(
            concat!(include_str!("common.wgsl"), include_str!("particles.wgsl")).into(),
        ),
    };
    mk_render_pipeline(
        device,
        layout,
        config.format,
        wgpu::PrimitiveTopology::TriangleList,
        &[ParticleVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
