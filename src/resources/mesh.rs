use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::data_structures::instance::InstanceRaw;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl Vertex for LineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// One corner of a camera-facing particle quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    pub center: [f32; 3],
    pub corner: [f32; 2],
}

impl Vertex for ParticleVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

const QUAD: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

pub fn line_vertices(points: &[Vector3<f32>]) -> Vec<LineVertex> {
    points
        .iter()
        .map(|p| LineVertex {
            position: (*p).into(),
        })
        .collect()
}

/// WebGL has no usable point size, so every particle becomes two triangles.
pub fn particle_vertices(points: &[Vector3<f32>]) -> Vec<ParticleVertex> {
    points
        .iter()
        .flat_map(|p| {
            QUAD.iter().map(move |corner| ParticleVertex {
                center: (*p).into(),
                corner: *corner,
            })
        })
        .collect()
}

/// Static vertices plus a single-instance buffer rewritten every frame.
#[derive(Debug)]
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub instance_buffer: wgpu::Buffer,
    pub num_vertices: u32,
}

impl GpuMesh {
    pub fn new<V: bytemuck::Pod>(device: &wgpu::Device, name: &str, vertices: &[V]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{:?} Instance Buffer", name)),
            size: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            instance_buffer,
            num_vertices: vertices.len() as u32,
        }
    }

    pub fn lines(device: &wgpu::Device, name: &str, points: &[Vector3<f32>]) -> Self {
        Self::new(device, name, &line_vertices(points))
    }

    pub fn particles(device: &wgpu::Device, name: &str, points: &[Vector3<f32>]) -> Self {
        Self::new(device, name, &particle_vertices(points))
    }

    pub fn write_instance(&self, queue: &wgpu::Queue, raw: InstanceRaw) {
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_particle_gets_a_quad() {
        let points = [Vector3::new(1.0, 2.0, 3.0), Vector3::new(-1.0, 0.0, 0.0)];
        let vertices = particle_vertices(&points);
        assert_eq!(vertices.len(), 12);
        assert!(vertices[..6].iter().all(|v| v.center == [1.0, 2.0, 3.0]));
        let sum = vertices[..6]
            .iter()
            .fold([0.0, 0.0], |acc, v| [acc[0] + v.corner[0], acc[1] + v.corner[1]]);
        assert_eq!(sum, [0.0, 0.0]);
    }
}
