//! Pointer Event Synthesizer.
//!
//! Turns an abstract [`PointerIntent`] plus the touch frame it came from into a
//! fully populated [`SyntheticEvent`]. Delivery to the DOM happens behind the
//! [`PointerSink`] trait so the classifier can be driven without a browser.

use log::trace;
use serde::Serialize;

use crate::touch::TouchFrame;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum IntentKind {
    Down,
    Up,
    Move,
    Wheel,
}

impl IntentKind {
    pub fn event_type(self) -> &'static str {
        match self {
            IntentKind::Down => "mousedown",
            IntentKind::Up => "mouseup",
            IntentKind::Move => "mousemove",
            IntentKind::Wheel => "wheel",
        }
    }

    pub fn is_wheel(self) -> bool {
        matches!(self, IntentKind::Wheel)
    }
}

/// DOM `button` value of a synthesized event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Button {
    None,
    Primary,
    Auxiliary,
    Secondary,
}

impl Button {
    pub fn dom_value(self) -> i16 {
        match self {
            Button::None => -1,
            Button::Primary => 0,
            Button::Auxiliary => 1,
            Button::Secondary => 2,
        }
    }

    /// Bit this button occupies in the DOM `buttons` mask.
    pub fn mask(self) -> u16 {
        match self {
            Button::None => 0,
            Button::Primary => 1,
            Button::Secondary => 2,
            Button::Auxiliary => 4,
        }
    }
}

/// Which mouse button a gesture impersonates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ButtonProfile {
    /// Plain click, used for quick taps.
    Default,
    /// Right button: orbit drags and context-menu clicks.
    Secondary,
    /// Middle button: two-finger pans.
    Auxiliary,
}

impl ButtonProfile {
    pub fn button(self) -> Button {
        match self {
            ButtonProfile::Default => Button::Primary,
            ButtonProfile::Secondary => Button::Secondary,
            ButtonProfile::Auxiliary => Button::Auxiliary,
        }
    }

    /// (`button`, `buttons`) pair for an event of `kind`.
    fn resolve(self, kind: IntentKind) -> (Button, u16) {
        let held = self.button().mask();
        match kind {
            IntentKind::Down => (self.button(), held),
            // released bit is already cleared when mouseup fires
            IntentKind::Up => (self.button(), 0),
            // a tap's leading move happens before anything is pressed
            IntentKind::Move => match self {
                ButtonProfile::Default => (self.button(), 0),
                _ => (self.button(), held),
            },
            IntentKind::Wheel => (Button::None, held),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointerIntent {
    pub kind: IntentKind,
    pub profile: ButtonProfile,
    pub delta_y: f64,
}

impl PointerIntent {
    pub fn down(profile: ButtonProfile) -> Self {
        Self { kind: IntentKind::Down, profile, delta_y: 0.0 }
    }

    pub fn up(profile: ButtonProfile) -> Self {
        Self { kind: IntentKind::Up, profile, delta_y: 0.0 }
    }

    pub fn moved(profile: ButtonProfile) -> Self {
        Self { kind: IntentKind::Move, profile, delta_y: 0.0 }
    }

    pub fn wheel(profile: ButtonProfile, delta_y: f64) -> Self {
        Self { kind: IntentKind::Wheel, profile, delta_y }
    }
}

/// Screen/client/page coordinates of a synthesized event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Coords {
    pub screen_x: f64,
    pub screen_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl Coords {
    /// Mean of two points, the single point, or all zeros for an empty frame.
    pub fn from_frame(frame: &TouchFrame) -> Self {
        match frame.points() {
            [a, b, ..] => Coords {
                screen_x: (a.screen_x + b.screen_x) / 2.0,
                screen_y: (a.screen_y + b.screen_y) / 2.0,
                client_x: (a.client_x + b.client_x) / 2.0,
                client_y: (a.client_y + b.client_y) / 2.0,
                page_x: (a.page_x + b.page_x) / 2.0,
                page_y: (a.page_y + b.page_y) / 2.0,
            },
            [p] => Coords {
                screen_x: p.screen_x,
                screen_y: p.screen_y,
                client_x: p.client_x,
                client_y: p.client_y,
                page_x: p.page_x,
                page_y: p.page_y,
            },
            [] => Coords::default(),
        }
    }
}

/// Everything needed to construct and dispatch one DOM event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SyntheticEvent {
    pub kind: IntentKind,
    pub coords: Coords,
    pub button: Button,
    pub buttons: u16,
    pub bubbles: bool,
    /// Vertical wheel delta; zero for mouse events.
    pub delta_y: f64,
}

impl SyntheticEvent {
    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }
}

pub fn synthesize(intent: PointerIntent, frame: &TouchFrame) -> SyntheticEvent {
    let (button, buttons) = intent.profile.resolve(intent.kind);
    SyntheticEvent {
        kind: intent.kind,
        coords: Coords::from_frame(frame),
        button,
        buttons,
        bubbles: true,
        delta_y: if intent.kind.is_wheel() { intent.delta_y } else { 0.0 },
    }
}

/// Destination of synthesized events.
pub trait PointerSink {
    fn deliver(&mut self, event: SyntheticEvent);

    /// Width of the physical screen in device pixels, used to normalize zoom.
    fn screen_width(&self) -> f64;
}

/// Synthesize `intent` against `frame` and hand it to `sink`.
pub fn emit<S: PointerSink + ?Sized>(sink: &mut S, intent: PointerIntent, frame: &TouchFrame) {
    let event = synthesize(intent, frame);
    if log::log_enabled!(log::Level::Trace) {
        trace!(
            "synth {}",
            serde_json::to_string(&event).unwrap_or_else(|_| event.event_type().to_string())
        );
    }
    sink.deliver(event);
}
