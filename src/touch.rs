//! Platform-neutral touch data: points, frames and notification phases.

/// Frames never hold more than this many points; extra fingers are ignored.
pub const MAX_POINTS: usize = 2;

/// One finger's contact, copied out of the platform touch list for the
/// duration of a single notification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TouchPoint {
    pub id: i32,
    pub screen_x: f64,
    pub screen_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl TouchPoint {
    /// Point with identical screen/client/page coordinates. Handy for tests and
    /// for pages that are neither scrolled nor offset on screen.
    pub fn at(id: i32, x: f64, y: f64) -> Self {
        Self {
            id,
            screen_x: x,
            screen_y: y,
            client_x: x,
            client_y: y,
            page_x: x,
            page_y: y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

impl TouchPhase {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "touchstart" => Some(Self::Start),
            "touchmove" => Some(Self::Move),
            "touchend" => Some(Self::End),
            "touchcancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn event_type(self) -> &'static str {
        match self {
            Self::Start => "touchstart",
            Self::Move => "touchmove",
            Self::End => "touchend",
            Self::Cancel => "touchcancel",
        }
    }
}

/// The active points of one accepted notification, in platform order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchFrame {
    points: Vec<TouchPoint>,
}

impl TouchFrame {
    pub fn new(points: impl IntoIterator<Item = TouchPoint>) -> Self {
        Self {
            points: points.into_iter().take(MAX_POINTS).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[TouchPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Separation of the first two points in screen space, if there are two.
    pub fn pinch_distance(&self) -> Option<f64> {
        match self.points.as_slice() {
            [a, b, ..] => Some(pinch_distance(a, b)),
            _ => None,
        }
    }
}

/// Euclidean distance between two points' screen coordinates.
pub fn pinch_distance(a: &TouchPoint, b: &TouchPoint) -> f64 {
    let dx = b.screen_x - a.screen_x;
    let dy = b.screen_y - a.screen_y;
    (dx * dx + dy * dy).sqrt()
}
