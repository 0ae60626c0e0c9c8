use wgpu::util::DeviceExt;

use crate::scene::{AmbientLight, Fog, PointLight};

pub const MAX_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    // xyz position, w range (0 means no falloff)
    position: [f32; 4],
    // rgb pre-multiplied with the intensity
    color: [f32; 4],
}

impl From<&PointLight> for PointLightRaw {
    fn from(light: &PointLight) -> Self {
        let [r, g, b] = light.color;
        Self {
            position: light.position.extend(light.range).into(),
            color: [r * light.intensity, g * light.intensity, b * light.intensity, 1.0],
        }
    }
}

/// Lights and fog, shared by every pipeline in the scene.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EnvironmentUniform {
    ambient: [f32; 4],
    fog_color: [f32; 4],
    // near, far, number of active lights, unused
    fog_range: [f32; 4],
    lights: [PointLightRaw; MAX_LIGHTS],
}

impl EnvironmentUniform {
    pub fn new(ambient: &AmbientLight, fog: &Fog, lights: &[PointLight]) -> Self {
        let mut uniform = Self::default();
        uniform.update(ambient, fog, lights);
        uniform
    }

    pub fn update(&mut self, ambient: &AmbientLight, fog: &Fog, lights: &[PointLight]) {
        let [r, g, b] = ambient.color;
        self.ambient = [r * ambient.intensity, g * ambient.intensity, b * ambient.intensity, 1.0];
        self.fog_color = [fog.color[0], fog.color[1], fog.color[2], 1.0];
        if lights.len() > MAX_LIGHTS {
            log::warn!("{} point lights in the scene, only {} are shaded", lights.len(), MAX_LIGHTS);
        }
        let count = lights.len().min(MAX_LIGHTS);
        self.fog_range = [fog.near, fog.far, count as f32, 0.0];
        self.lights = [PointLightRaw::default(); MAX_LIGHTS];
        for (slot, light) in self.lights.iter_mut().zip(lights) {
            *slot = light.into();
        }
    }

    pub fn light_count(&self) -> usize {
        self.fog_range[2] as usize
    }
}

pub struct EnvironmentResources {
    pub uniform: EnvironmentUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl EnvironmentResources {
    pub fn new(device: &wgpu::Device, uniform: EnvironmentUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Environment Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("environment_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, ambient: &AmbientLight, fog: &Fog, lights: &[PointLight]) {
        self.uniform.update(ambient, fog, lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("environment_bind_group_layout"),
    })
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;

    #[test]
    fn lights_are_premultiplied_and_capped() {
        let light = PointLight {
            color: [1.0, 0.5, 0.0],
            intensity: 2.0,
            range: 100.0,
            position: Vector3::new(1.0, 2.0, 3.0),
        };
        let ambient = AmbientLight {
            color: [1.0, 1.0, 1.0],
            intensity: 0.4,
        };
        let fog = Fog {
            color: [0.0, 0.0, 0.0],
            near: 50.0,
            far: 1000.0,
        };
        let uniform = EnvironmentUniform::new(&ambient, &fog, &vec![light; 6]);
        assert_eq!(uniform.light_count(), MAX_LIGHTS);
        assert_eq!(uniform.lights[0].color, [2.0, 1.0, 0.0, 1.0]);
        assert_eq!(uniform.lights[3].position, [1.0, 2.0, 3.0, 100.0]);
        assert_eq!(uniform.ambient[0], 0.4);
        // uniform buffers are laid out in 16 byte rows
        assert_eq!(std::mem::size_of::<EnvironmentUniform>() % 16, 0);
    }
}
