//! DOM side of the bridge: touch notifications in, mouse and wheel events out.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, MouseEvent, MouseEventInit, Touch, TouchEvent, TouchList, WheelEvent,
    WheelEventInit, Window,
};

use crate::bridge::Bridge;
use crate::broker::{Admission, ListenerBroker, SealedPage};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::gate::TouchNotification;
use crate::gesture::{LongPressTimer, Ticket};
use crate::synth::{Coords, PointerSink, SyntheticEvent};
use crate::touch::{TouchPhase, TouchPoint, MAX_POINTS};

pub type WebBridge = Bridge<WebTimer, DomSink>;

pub struct WebTouch<'a>(pub &'a TouchEvent);

impl TouchNotification for WebTouch<'_> {
    fn target_id(&self) -> Option<String> {
        self.0
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .map(|el| el.id())
    }

    fn active_points(&self) -> Vec<TouchPoint> {
        points(&self.0.touches())
    }

    fn changed_points(&self) -> Vec<TouchPoint> {
        points(&self.0.changed_touches())
    }

    fn suppress_default(&self) {
        self.0.prevent_default();
    }
}

fn points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .take(MAX_POINTS)
        .map(|t| TouchPoint {
            id: t.identifier(),
            screen_x: coordinate(&t, "screenX"),
            screen_y: coordinate(&t, "screenY"),
            client_x: coordinate(&t, "clientX"),
            client_y: coordinate(&t, "clientY"),
            page_x: coordinate(&t, "pageX"),
            page_y: coordinate(&t, "pageY"),
        })
        .collect()
}

// web-sys exposes touch coordinates as i32; browsers report sub-pixel doubles
fn coordinate(touch: &Touch, key: &str) -> f64 {
    Reflect::get(touch, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Dispatches synthesized events on the canvas. The canvas is looked up on
/// first delivery and cached from then on, even if it later leaves the DOM.
pub struct DomSink {
    window: Window,
    document: Document,
    canvas_id: String,
    target: Option<Element>,
}

impl DomSink {
    pub fn new(window: Window, document: Document, canvas_id: &str) -> Self {
        Self {
            window,
            document,
            canvas_id: canvas_id.to_string(),
            target: None,
        }
    }

    fn target(&mut self) -> Option<Element> {
        if self.target.is_none() {
            self.target = self.document.get_element_by_id(&self.canvas_id);
            if self.target.is_some() {
                debug!("resolved #{} as event target", self.canvas_id);
            }
        }
        self.target.clone()
    }
}

impl PointerSink for DomSink {
    fn deliver(&mut self, event: SyntheticEvent) {
        let Some(target) = self.target() else {
            warn!("no #{} to receive {}", self.canvas_id, event.event_type());
            return;
        };
        let built = if event.kind.is_wheel() {
            wheel_event(&event)
        } else {
            mouse_event(&event)
        };
        if let Err(e) = built.and_then(|dom| target.dispatch_event(&dom)) {
            warn!("{}", BridgeError::js("dispatch synthetic event", e));
        }
    }

    fn screen_width(&self) -> f64 {
        self.window
            .screen()
            .and_then(|s| s.width())
            .map(f64::from)
            .unwrap_or(0.0)
    }
}

// pageX/pageY are derived by the browser from client coordinates and scroll
fn mouse_event(event: &SyntheticEvent) -> Result<Event, JsValue> {
    let init = MouseEventInit::new();
    init.set_bubbles(event.bubbles);
    init.set_cancelable(true);
    init.set_composed(true);
    init.set_button(event.button.dom_value());
    init.set_buttons(event.buttons);
    set_coords(&init, &event.coords)?;
    MouseEvent::new_with_mouse_event_init_dict(event.event_type(), &init).map(Event::from)
}

fn wheel_event(event: &SyntheticEvent) -> Result<Event, JsValue> {
    let init = WheelEventInit::new();
    init.set_bubbles(event.bubbles);
    init.set_cancelable(true);
    init.set_composed(true);
    init.set_buttons(event.buttons);
    init.set_delta_y(event.delta_y);
    init.set_delta_mode(WheelEvent::DOM_DELTA_PIXEL);
    set_coords(&init, &event.coords)?;
    WheelEvent::new_with_event_init_dict(event.event_type(), &init).map(Event::from)
}

// the typed setters take i32 and would truncate a two-finger mean like 40.5
fn set_coords(init: &JsValue, coords: &Coords) -> Result<(), JsValue> {
    for (key, value) in [
        ("screenX", coords.screen_x),
        ("screenY", coords.screen_y),
        ("clientX", coords.client_x),
        ("clientY", coords.client_y),
    ] {
        Reflect::set(init, &JsValue::from_str(key), &JsValue::from_f64(value))?;
    }
    Ok(())
}

/// Long-press timer on `setTimeout`. Fires back into the owning bridge.
pub struct WebTimer {
    owner: Weak<RefCell<WebBridge>>,
}

impl LongPressTimer for WebTimer {
    type Handle = Timeout;

    fn arm(&mut self, after_ms: u32, ticket: Ticket) -> Timeout {
        let owner = self.owner.clone();
        Timeout::new(after_ms, move || {
            if let Some(bridge) = owner.upgrade() {
                bridge.borrow_mut().long_press_elapsed(ticket);
            }
        })
    }

    fn disarm(&mut self, handle: Timeout) {
        // dropping a Timeout clears it
        drop(handle);
    }
}

/// A bridge wired into the page.
pub struct Installation {
    bridge: Rc<RefCell<WebBridge>>,
    page: SealedPage,
}

impl Installation {
    /// Keep the bridge alive for the rest of the page's life.
    pub fn persist(self) {
        self.page.persist();
        std::mem::forget(self.bridge);
    }
}

/// Register the bridge's touch listeners on the document, then seal the page
/// so nothing else can listen to touches. Must run before any other script
/// registers touch listeners.
pub fn install(config: BridgeConfig) -> BridgeResult<Installation> {
    let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
    let document = window.document().ok_or(BridgeError::NoDocument)?;

    let sink = DomSink::new(window.clone(), document.clone(), &config.canvas_id);
    let bridge = Rc::new_cyclic(|owner: &Weak<RefCell<WebBridge>>| {
        let timer = WebTimer {
            owner: owner.clone(),
        };
        RefCell::new(Bridge::new(&config, timer, sink))
    });

    let mut broker = ListenerBroker::new();
    let capability = broker.capability()?;
    for phase in [
        TouchPhase::Start,
        TouchPhase::Move,
        TouchPhase::End,
        TouchPhase::Cancel,
    ] {
        let bridge = bridge.clone();
        let admission = broker.listen(&document, phase.event_type(), Some(&capability), move |event: &Event| {
            let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            match bridge.try_borrow_mut() {
                Ok(mut b) => {
                    b.on_touch(phase, &WebTouch(touch));
                }
                Err(_) => warn!("{} arrived while the bridge was busy", phase.event_type()),
            }
        });
        debug_assert_eq!(admission, Admission::Allowed);
    }

    let page = broker.seal_page(&window)?;
    info!(
        "touch bridge installed on #{} (long press {} ms)",
        config.canvas_id, config.gesture.long_press_ms
    );
    Ok(Installation { bridge, page })
}
