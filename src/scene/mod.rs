//! The 3D world behind the page.
//!
//! A [`Scene`] is built once from the [`Config`] and then mutated every frame by
//! [`Scene::tick`]: the hero eases towards the pointer tilt, the grid and the
//! particle cloud spin slowly and the camera glides along z with the scroll
//! position. It owns no GPU state; a [`crate::render::SceneRenderer`] draws it.

pub mod hero;

use cgmath::{Vector2, Vector3};

use crate::{
    camera::PerspectiveCamera,
    config::{Config, GridConfig, LightConfig, MouseConfig, SceneConfig, linear_rgb},
    data_structures::{
        geometry::{grid_lines, particle_field},
        instance::{Instance, Style},
    },
    motion::tween::{Easing, Tween},
};

pub use hero::{Hero, ScaleState};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which the light has faded out completely.
    pub range: f32,
    pub position: Vector3<f32>,
}

impl From<&LightConfig> for PointLight {
    fn from(light: &LightConfig) -> Self {
        Self {
            color: linear_rgb(light.color),
            intensity: light.intensity,
            range: light.range,
            position: light.position.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Linear fog between `near` and `far`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

#[derive(Debug)]
pub struct Grid {
    /// Line-list vertices in object space.
    pub lines: Vec<Vector3<f32>>,
    pub style: Style,
    pub position: Vector3<f32>,
    pub rotation_x: f32,
    spin: f32,
}

impl Grid {
    fn new(config: &GridConfig) -> Self {
        let color = linear_rgb(config.color);
        Self {
            lines: grid_lines(config.size, config.divisions),
            style: Style {
                color,
                opacity: config.opacity,
                emissive: [0.0; 3],
                size: 0.0,
            },
            position: Vector3::new(0.0, config.height, 0.0),
            rotation_x: 0.0,
            spin: config.spin,
        }
    }

    pub fn transform(&self) -> Instance {
        Instance::new()
            .with_position(self.position)
            .with_euler(self.rotation_x, 0.0, 0.0)
    }
}

#[derive(Debug)]
pub struct Particles {
    pub points: Vec<Vector3<f32>>,
    pub style: Style,
    /// Rotation around x and y, in radians.
    pub rotation: Vector2<f32>,
    period: f32,
    clock: f32,
}

impl Particles {
    pub fn transform(&self) -> Instance {
        Instance::new().with_euler(self.rotation.x, self.rotation.y, 0.0)
    }

    fn tick(&mut self, dt: f32) {
        if self.period <= 0.0 {
            return;
        }
        self.clock = (self.clock + dt) % self.period;
        let angle = self.clock / self.period * std::f32::consts::TAU;
        self.rotation = Vector2::new(angle, angle);
    }
}

#[derive(Debug)]
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub background: [f32; 3],
    pub fog: Fog,
    pub ambient: AmbientLight,
    pub lights: Vec<PointLight>,
    pub hero: Hero,
    pub grid: Grid,
    pub particles: Particles,
    pointer: Vector2<f32>,
    camera_tween: Option<Tween<f32>>,
    scene_config: SceneConfig,
    mouse: MouseConfig,
}

impl Scene {
    pub fn new(config: &Config, width: u32, height: u32) -> Self {
        let scene = &config.scene;
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let particles = &config.particles;
        log::info!(
            "[3D] Building scene: hero detail {}, {} particles",
            config.hero.detail,
            particles.count
        );

        Self {
            camera: PerspectiveCamera::new(scene.camera_z, scene.fov, aspect, scene.near, scene.far),
            background: linear_rgb(scene.bg_color),
            fog: Fog {
                color: linear_rgb(scene.fog_color),
                near: scene.fog_near,
                far: scene.fog_far,
            },
            ambient: AmbientLight {
                color: linear_rgb(scene.ambient.color),
                intensity: scene.ambient.intensity,
            },
            lights: vec![(&scene.key_light).into(), (&scene.fill_light).into()],
            hero: Hero::new(&config.hero),
            grid: Grid::new(&config.grid),
            particles: Particles {
                points: particle_field(particles.count, particles.spread, particles.seed),
                style: Style {
                    color: linear_rgb(particles.color),
                    opacity: particles.opacity,
                    emissive: [0.0; 3],
                    size: particles.size,
                },
                rotation: Vector2::new(0.0, 0.0),
                period: particles.rotation_secs,
                clock: 0.0,
            },
            pointer: Vector2::new(0.0, 0.0),
            camera_tween: None,
            scene_config: scene.clone(),
            mouse: config.mouse.clone(),
        }
    }

    /// Advance every continuous animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.hero.tick(dt, self.pointer, &self.mouse);
        self.grid.rotation_x += self.grid.spin * dt * 60.0;
        self.particles.tick(dt);

        if let Some(tween) = &mut self.camera_tween {
            self.camera.position.z = tween.advance(dt);
            if tween.is_finished() {
                self.camera_tween = None;
            }
        }
    }

    pub fn pointer(&self) -> Vector2<f32> {
        self.pointer
    }

    /// Record the pointer position and aim the hero at it.
    pub fn tilt_towards(&mut self, ndc: Vector2<f32>) {
        self.pointer = ndc;
        let strength = self.mouse.tilt_strength;
        self.hero
            .set_target_rotation(Vector2::new(ndc.y * strength, ndc.x * strength));
    }

    /// Glide the camera towards the depth matching `fraction` of the page scrolled.
    pub fn set_scroll_depth(&mut self, fraction: f32) {
        let config = &self.scene_config;
        let fraction = fraction.clamp(0.0, 1.0);
        let target = config.camera_z - fraction * (config.camera_z - config.camera_z_scroll);
        self.camera_tween = Some(Tween::new(
            self.camera.position.z,
            target,
            config.camera_tween_secs,
            Easing::Power1Out,
        ));
    }

    /// Camera z the current depth tween is heading for.
    pub fn camera_target_z(&self) -> f32 {
        self.camera_tween
            .as_ref()
            .map_or(self.camera.position.z, |tween| tween.to())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Every point light in the scene, including the one travelling with the hero.
    pub fn point_lights(&self) -> Vec<PointLight> {
        let mut lights = self.lights.clone();
        lights.push(self.hero.world_core_light());
        lights
    }
}
