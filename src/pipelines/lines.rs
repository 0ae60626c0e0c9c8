use crate::{
    data_structures::instance::InstanceRaw,
    pipelines::mk_render_pipeline,
    resources::mesh::{LineVertex, Vertex},
};

/// Grid and hero wireframes.
pub fn mk_lines_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    layout: &wgpu::PipelineLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(
            concat!(include_str!("common.wgsl"), include_str!("lines.wgsl")).into(),
        ),
    };
    mk_render_pipeline(
        device,
        layout,
        config.format,
        wgpu::PrimitiveTopology::LineList,
        &[LineVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
