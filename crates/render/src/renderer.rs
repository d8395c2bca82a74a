use crate::hud::HealthBar;
use glam::{Mat4, Vec3};
use pursuit_kernel::{CameraView, GameSession, Phase};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    /// Match the aspect ratio to a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Camera/view configuration for rendering one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    pub projection: Projection,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::new(0.0, 0.5, 0.0),
            projection: Projection::default(),
        }
    }
}

impl RenderView {
    pub fn from_camera(camera: CameraView, projection: Projection) -> Self {
        Self {
            eye: camera.eye,
            target: camera.target,
            projection,
        }
    }

    /// View of the session's current camera.
    pub fn of_session(session: &GameSession, projection: Projection) -> Self {
        Self::from_camera(session.view(), projection)
    }

    pub fn view_matrix(&self) -> Mat4 {
        // Straight-down orbit pitch would make Y a degenerate up vector.
        let forward = (self.target - self.eye).normalize_or_zero();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads session state and a view and produces output. It never
/// mutates the session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given session and view.
    fn render(&self, session: &GameSession, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of a session, used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &GameSession, view: &RenderView) -> String {
        let mut out = String::new();
        let phase = match session.phase() {
            Phase::Running => "running",
            Phase::GameOver => "game over",
        };
        out.push_str(&format!(
            "=== Session (frame={}, phase={}, variant={}) ===\n",
            session.frame_count(),
            phase,
            session.config().variant()
        ));

        let bar = HealthBar::from_health(session.health());
        let filled = (bar.fraction() * 10.0).round() as usize;
        out.push_str(&format!(
            "Health: {:>3} [{}{}] {}\n",
            bar.health,
            "#".repeat(filled),
            "-".repeat(10 - filled),
            bar.color.name()
        ));

        match session.player() {
            Some(p) => out.push_str(&format!(
                "Player: pos=({:.2}, {:.2}, {:.2}) airborne={}\n",
                p.position.x, p.position.y, p.position.z, p.is_jumping
            )),
            None => out.push_str("Player: not spawned\n"),
        }

        let e = session.enemy().position;
        out.push_str(&format!("Enemy: pos=({:.2}, {:.2}, {:.2})", e.x, e.y, e.z));
        if let Some(p) = session.player() {
            out.push_str(&format!(
                " distance={:.2}",
                session.enemy().distance_to(p.position)
            ));
        }
        out.push('\n');

        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.projection.fov_degrees
        ));

        if let Some(reason) = session.fault() {
            out.push_str(&format!("Fault: {reason}\n"));
        }

        out
    }
}
