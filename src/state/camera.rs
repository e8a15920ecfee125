//! Viewer camera: orbit angles, pan offset and zoom driven by mouse input.

/// Radians of orbit per pixel of right-button drag.
const ORBIT_PER_PX: f64 = 0.01;
/// Wheel delta is multiplied by this before exponentiation.
const ZOOM_PER_DELTA: f64 = 0.001;
pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    Orbit,
    Pan,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub zoom: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub drag: Option<Drag>,
    pub last_x: f64,
    pub last_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            yaw: 0.6,
            pitch: 0.4,
            offset_x: 0.0,
            offset_y: 0.0,
            drag: None,
            last_x: 0.0,
            last_y: 0.0,
        }
    }
}

impl Camera {
    pub fn begin(&mut self, drag: Drag, x: f64, y: f64) {
        self.drag = Some(drag);
        self.last_x = x;
        self.last_y = y;
    }

    /// Apply mouse motion to whichever drag is active.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        self.last_x = x;
        self.last_y = y;
        match self.drag {
            Some(Drag::Orbit) => {
                self.yaw += dx * ORBIT_PER_PX;
                self.pitch = (self.pitch + dy * ORBIT_PER_PX).clamp(-1.5, 1.5);
            }
            Some(Drag::Pan) => {
                self.offset_x += dx;
                self.offset_y += dy;
            }
            None => {}
        }
    }

    pub fn end(&mut self) {
        self.drag = None;
    }

    /// Positive wheel delta zooms in.
    pub fn zoom_by(&mut self, delta_y: f64) {
        self.zoom = (self.zoom * (delta_y * ZOOM_PER_DELTA).exp()).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Project a unit-cube vertex to canvas pixels around (`cx`, `cy`).
    pub fn project(&self, v: [f64; 3], cx: f64, cy: f64, scale: f64) -> (f64, f64) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let x = v[0] * cos_yaw - v[2] * sin_yaw;
        let z = v[0] * sin_yaw + v[2] * cos_yaw;
        let y = v[1] * cos_pitch - z * sin_pitch;
        let s = scale * self.zoom;
        (cx + self.offset_x + x * s, cy + self.offset_y + y * s)
    }
}
