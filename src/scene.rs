//! Scene assembly from configuration.

use crate::camera::Camera;
use crate::colors::Color;
use crate::config::{AppConfig, CameraConfig, InstanceConfig};
use crate::instance::ModelInstance;
use crate::loader::{self, LoadError};
use crate::math::{Vec2i, Vec3};
use crate::mesh::Mesh;
use crate::render::{OutputSink, Renderer};

/// Reference lines in canvas coordinates, drawn over the scene when
/// `scene.demo_lines` is set.
pub const DEMO_LINES: [(Vec2i, Vec2i, Color); 3] = [
    (Vec2i::new(-120, -240), Vec2i::new(120, 240), Color::AQUAMARINE),
    (Vec2i::new(240, 120), Vec2i::new(-200, -100), Color::RED_VIOLET),
    (Vec2i::new(-50, -200), Vec2i::new(60, 240), Color::GOLD),
];

/// The mesh, its placements and the camera.
#[derive(Debug, Clone)]
pub struct Scene {
    mesh: Mesh,
    placements: Vec<InstanceConfig>,
    camera: Camera,
    demo_lines: bool,
}

impl Scene {
    /// Loads the configured model (or the built-in cube) and camera.
    pub fn from_config(config: &AppConfig) -> Result<Self, LoadError> {
        let mesh = match &config.scene.model {
            Some(path) => loader::load_mesh(path, config.scene.model_color)?,
            None => {
                log::info!("no model configured, using the built-in cube");
                Mesh::cube()
            }
        };

        if config.scene.instances.is_empty() {
            log::warn!("scene has no instances; only overlays will be drawn");
        }

        Ok(Self::new(
            mesh,
            config.scene.instances.clone(),
            camera_from_config(&config.camera),
        )
        .with_demo_lines(config.scene.demo_lines))
    }

    pub fn new(mesh: Mesh, placements: Vec<InstanceConfig>, camera: Camera) -> Self {
        Self {
            mesh,
            placements,
            camera,
            demo_lines: false,
        }
    }

    pub fn with_demo_lines(mut self, enabled: bool) -> Self {
        self.demo_lines = enabled;
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// One instance per placement, all sharing the scene mesh.
    pub fn instances(&self) -> Vec<ModelInstance<'_>> {
        self.placements
            .iter()
            .map(|p| {
                ModelInstance::with_placement(
                    &self.mesh,
                    Vec3::from(p.translation),
                    p.scale,
                    p.rotation.to_radians(),
                    Vec3::from(p.axis),
                )
            })
            .collect()
    }

    /// Advances spinning instances to `elapsed_secs` after start.
    pub fn animate(&self, instances: &mut [ModelInstance<'_>], elapsed_secs: f32) {
        for (instance, placement) in instances.iter_mut().zip(&self.placements) {
            if placement.spin != 0.0 {
                let degrees = placement.rotation + placement.spin * elapsed_secs;
                instance.set_rotation(degrees.to_radians(), Vec3::from(placement.axis));
            }
        }
    }

    /// Clears, draws every instance (and the demo lines if enabled).
    /// The caller presents the frame.
    pub fn render<S: OutputSink>(&self, renderer: &mut Renderer<S>, instances: &[ModelInstance<'_>]) {
        renderer.clear();
        renderer.draw_instances(instances, &self.camera);
        if self.demo_lines {
            for (p0, p1, color) in DEMO_LINES {
                renderer.draw_line_2d(p0, p1, color);
            }
        }
    }
}

/// Camera placed and oriented from configuration (angles in degrees).
pub fn camera_from_config(config: &CameraConfig) -> Camera {
    Camera::with_angles(
        Vec3::from(config.position),
        config.yaw.to_radians(),
        config.pitch.to_radians(),
        config.roll.to_radians(),
    )
}
