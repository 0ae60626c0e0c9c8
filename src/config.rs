//! Visual constants table.
//!
//! Every tunable number of the site lives here: camera and fog parameters,
//! hero mesh geometry and colours, particle field, background grid, pointer
//! tilt, animation timings and layout breakpoints. The table is immutable once
//! built; components copy the sections they need at construction time.
//!
//! Defaults are compiled in. An optional `config.json` asset may override any
//! subset of keys, missing keys keep their defaults.

use serde::Deserialize;

use crate::resources::load_string;

/// Name of the optional override file inside the asset directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub scene: SceneConfig,
    pub hero: HeroConfig,
    pub particles: ParticleConfig,
    pub grid: GridConfig,
    pub mouse: MouseConfig,
    pub animation: AnimationConfig,
    pub breakpoints: Breakpoints,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
    /// Camera z once the page is scrolled all the way down.
    pub camera_z_scroll: f32,
    /// Seconds the camera takes to settle on a new scroll depth.
    pub camera_tween_secs: f32,
    pub bg_color: u32,
    pub fog_color: u32,
    pub fog_near: f32,
    pub fog_far: f32,
    pub ambient: LightConfig,
    pub key_light: LightConfig,
    pub fill_light: LightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 10000.0,
            camera_z: 35.0,
            camera_z_scroll: 15.0,
            camera_tween_secs: 0.3,
            bg_color: 0x050507,
            fog_color: 0x050507,
            fog_near: 50.0,
            fog_far: 1000.0,
            ambient: LightConfig {
                color: 0xffffff,
                intensity: 0.4,
                range: 0.0,
                position: [0.0; 3],
            },
            key_light: LightConfig {
                color: 0x00F5FF,
                intensity: 1.2,
                range: 100.0,
                position: [20.0, 20.0, 20.0],
            },
            fill_light: LightConfig {
                color: 0x7B2FF7,
                intensity: 0.8,
                range: 80.0,
                position: [-20.0, 10.0, 15.0],
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub color: u32,
    pub intensity: f32,
    /// Distance at which a point light fades out. Unused for ambient light.
    pub range: f32,
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 1.0,
            range: 0.0,
            position: [0.0; 3],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeroConfig {
    pub radius: f32,
    pub detail: u32,
    /// Inner mesh radius relative to the outer one.
    pub inner_ratio: f32,
    pub inner_detail: u32,
    pub color_primary: u32,
    pub color_secondary: u32,
    pub opacity: f32,
    /// Inner mesh opacity relative to `opacity`.
    pub inner_opacity_ratio: f32,
    pub emissive_intensity: f32,
    pub inner_emissive_intensity: f32,
    pub core_light: LightConfig,
    pub scale_idle: [f32; 3],
    pub scale_hover: [f32; 3],
    pub scale_pulse: [f32; 3],
    pub hover_secs: f32,
    /// Duration of one leg of the click pulse. The pulse plays up and back down.
    pub pulse_secs: f32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            detail: 4,
            inner_ratio: 0.95,
            inner_detail: 3,
            color_primary: 0x00F5FF,
            color_secondary: 0x7B2FF7,
            opacity: 0.3,
            inner_opacity_ratio: 0.7,
            emissive_intensity: 0.3,
            inner_emissive_intensity: 0.2,
            core_light: LightConfig {
                color: 0x00F5FF,
                intensity: 0.8,
                range: 60.0,
                position: [0.0; 3],
            },
            scale_idle: [1.0; 3],
            scale_hover: [1.1; 3],
            scale_pulse: [1.2; 3],
            hover_secs: 0.3,
            pulse_secs: 0.15,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: u32,
    pub size: f32,
    /// Edge length of the cube the particles are scattered in.
    pub spread: f32,
    pub color: u32,
    pub opacity: f32,
    /// Seconds for one full turn around x and y.
    pub rotation_secs: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 200,
            size: 0.5,
            spread: 120.0,
            color: 0x00F5FF,
            opacity: 0.6,
            rotation_secs: 60.0,
            seed: 0x5EED_F011,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
    pub color: u32,
    pub opacity: f32,
    pub height: f32,
    /// Rotation around x per 60 Hz frame.
    pub spin: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            divisions: 20,
            color: 0x00F5FF,
            opacity: 0.1,
            height: -20.0,
            spin: 0.00005,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MouseConfig {
    pub tilt_strength: f32,
    /// Each 60 Hz frame closes `tilt_ease * 0.016` of the gap to the target tilt.
    pub tilt_ease: f32,
    /// Pointer displacement below which the hero spins on its own.
    pub idle_threshold: f32,
    /// Idle spin around x and y per 60 Hz frame.
    pub idle_spin: [f32; 2],
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            tilt_strength: 0.5,
            tilt_ease: 0.8,
            idle_threshold: 0.01,
            idle_spin: [0.0005, 0.0008],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Motion bindings are skipped entirely when false.
    pub enabled: bool,
    pub boot_duration_ms: u64,
    pub button_scale: f32,
    pub button_secs: f32,
    pub hero_text_opacity: f32,
    pub hero_text_lift: f32,
    pub scrub_secs: f32,
    pub card_offset: f32,
    pub card_secs: f32,
    /// Fraction of the viewport height a card top has to cross to reveal.
    pub card_threshold: f32,
    pub metric_offset: f32,
    pub metric_secs: f32,
    pub metric_stagger_secs: f32,
    pub metric_delay_secs: f32,
    pub nav_offset: f64,
    pub nav_secs: f32,
    pub input_idle_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            boot_duration_ms: 2500,
            button_scale: 1.05,
            button_secs: 0.3,
            hero_text_opacity: 0.7,
            hero_text_lift: -30.0,
            scrub_secs: 1.0,
            card_offset: 30.0,
            card_secs: 0.8,
            card_threshold: 0.8,
            metric_offset: 20.0,
            metric_secs: 0.6,
            metric_stagger_secs: 0.1,
            metric_delay_secs: 2.7,
            nav_offset: 60.0,
            nav_secs: 1.0,
            input_idle_ms: 100,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 480,
            tablet: 768,
            desktop: 1024,
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load `config.json` from the assets, falling back to the compiled-in table.
pub async fn load_config() -> Config {
    match load_string(CONFIG_FILE).await {
        Ok(json) => match Config::from_json(&json) {
            Ok(config) => {
                log::info!("[CONFIG] Loaded overrides from {}", CONFIG_FILE);
                config
            }
            Err(e) => {
                log::warn!("[CONFIG] Ignoring malformed {}: {}", CONFIG_FILE, e);
                Config::default()
            }
        },
        Err(_) => {
            log::debug!("[CONFIG] No {} found, using defaults", CONFIG_FILE);
            Config::default()
        }
    }
}

/// Split a `0xRRGGBB` colour into sRGB channels in `[0, 1]`.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Like [`rgb`] but converted to linear space for shading into an sRGB surface.
pub fn linear_rgb(hex: u32) -> [f32; 3] {
    rgb(hex).map(|c| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = Config::from_json(r#"{ "particles": { "count": 12 }, "animation": { "enabled": false } }"#)
            .unwrap();
        assert_eq!(config.particles.count, 12);
        assert_eq!(config.particles.size, 0.5);
        assert!(!config.animation.enabled);
        assert_eq!(config.animation.boot_duration_ms, 2500);
        assert_eq!(config.hero, HeroConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn splits_hex_colours() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x0000ff), [0.0, 0.0, 1.0]);
        let linear = linear_rgb(0x808080);
        assert!(linear[0] > 0.2 && linear[0] < 0.23);
    }
}
