//! Perspective camera and its GPU uniform.
//!
//! The camera sits on the z axis and looks down `-z`, the way the hero scene is
//! composed; scrolling only moves it along z.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector2, Vector3, Vector4};

use crate::pick::Ray;

/// wgpu clip space has z in `[0, 1]` while cgmath produces OpenGL's `[-1, 1]`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(z: f32, fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, z),
            direction: -Vector3::unit_z(),
            fovy: Deg(fovy),
            aspect,
            near,
            far,
        }
    }

    /// Keep the aspect ratio in sync with the viewport. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction, Vector3::unit_y())
    }

    /// OpenGL-convention projection, used for unprojecting pointer rays.
    pub fn projection(&self) -> Matrix4<f32> {
        cgmath::perspective(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection() * self.view()
    }

    /// Ray through the given normalized device coordinates (`[-1, 1]`, y up).
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Option<Ray> {
        let inverse = (self.projection() * self.view()).invert()?;
        let unproject = |z: f32| {
            let p = inverse * Vector4::new(ndc.x, ndc.y, z, 1.0);
            p.truncate() / p.w
        };
        let near = unproject(-1.0);
        let far = unproject(1.0);
        let direction = (far - near).normalize();
        Some(Ray::new(
            Vector3::new(self.position.x, self.position.y, self.position.z),
            direction,
        ))
    }
}

/// Map a client-space position (pixels, y down) to normalized device coordinates.
pub fn to_ndc(x: f64, y: f64, width: f64, height: f64) -> Vector2<f32> {
    if width <= 0.0 || height <= 0.0 {
        return Vector2::new(0.0, 0.0);
    }
    Vector2::new(
        ((x / width) * 2.0 - 1.0) as f32,
        (-(y / height) * 2.0 + 1.0) as f32,
    )
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    // camera basis for billboarding particles
    right: [f32; 4],
    up: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            view_position: [0.0, 0.0, 0.0, 1.0],
            right: [1.0, 0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0, 0.0],
        }
    }

    pub fn update_view_proj(&mut self, camera: &PerspectiveCamera) {
        self.view_proj = camera.view_projection().into();
        self.view_position = camera.position.to_homogeneous().into();
        let right = camera.direction.cross(Vector3::unit_y()).normalize();
        let up = right.cross(camera.direction).normalize();
        self.right = right.extend(0.0).into();
        self.up = up.extend(0.0).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer and its bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: &PerspectiveCamera) -> Self {
        use wgpu::util::DeviceExt;

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &PerspectiveCamera) {
        self.uniform.update_view_proj(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
