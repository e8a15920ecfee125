//! Registration Broker.
//!
//! The bridge must be the only consumer of raw touch input on the page. It
//! registers its touch listeners through the broker first, then seals the
//! page: from that point every `addEventListener` call on the page is routed
//! through [`RegistrationPolicy`], which silently drops touch-family
//! registrations and lets everything else through. Sealing lasts for the
//! lifetime of the page.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use js_sys::{Function, Reflect};
use log::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::{Event, EventTarget, Window};

use crate::error::{BridgeError, BridgeResult, JsContext};

pub fn is_touch_family(event_type: &str) -> bool {
    event_type.starts_with("touch")
}

/// Proof that the holder is the bridge. Issued once per broker.
#[derive(Debug)]
pub struct TouchCapability {
    _sealed: (),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Dropped,
}

#[derive(Debug, Default)]
pub struct RegistrationPolicy {
    issued: bool,
    dropped: u32,
}

impl RegistrationPolicy {
    pub fn issue_capability(&mut self) -> BridgeResult<TouchCapability> {
        if self.issued {
            return Err(BridgeError::CapabilityTaken);
        }
        self.issued = true;
        Ok(TouchCapability { _sealed: () })
    }

    pub fn admit(&mut self, event_type: &str, capability: Option<&TouchCapability>) -> Admission {
        if !is_touch_family(event_type) || capability.is_some() {
            return Admission::Allowed;
        }
        self.dropped += 1;
        Admission::Dropped
    }

    /// Touch registrations refused so far.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Broker before sealing: the bridge registers its own listeners here.
pub struct ListenerBroker {
    policy: Rc<RefCell<RegistrationPolicy>>,
    listeners: Vec<EventListener>,
}

impl Default for ListenerBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerBroker {
    pub fn new() -> Self {
        Self {
            policy: Rc::new(RefCell::new(RegistrationPolicy::default())),
            listeners: Vec::new(),
        }
    }

    pub fn capability(&mut self) -> BridgeResult<TouchCapability> {
        self.policy.borrow_mut().issue_capability()
    }

    /// Register a capture-phase, non-passive listener so the callback may
    /// call `preventDefault`.
    pub fn listen<F>(
        &mut self,
        target: &EventTarget,
        event_type: &'static str,
        capability: Option<&TouchCapability>,
        callback: F,
    ) -> Admission
    where
        F: FnMut(&Event) + 'static,
    {
        if self.policy.borrow_mut().admit(event_type, capability) == Admission::Dropped {
            debug!("broker refused {} listener without capability", event_type);
            return Admission::Dropped;
        }
        let options = EventListenerOptions {
            phase: EventListenerPhase::Capture,
            passive: false,
        };
        self.listeners
            .push(EventListener::new_with_options(target, event_type, options, callback));
        Admission::Allowed
    }

    /// Route every later `EventTarget.prototype.addEventListener` call on the
    /// page through the policy.
    pub fn seal_page(self, window: &Window) -> BridgeResult<SealedPage> {
        let ctor = Reflect::get(window, &JsValue::from_str("EventTarget"))
            .context("window.EventTarget")?;
        let proto = Reflect::get(&ctor, &JsValue::from_str("prototype"))
            .context("EventTarget.prototype")?;
        let original = Reflect::get(&proto, &JsValue::from_str("addEventListener"))
            .context("EventTarget.prototype.addEventListener")?;

        let policy = self.policy.clone();
        let gatekeeper = Closure::wrap(Box::new(move |event_type: String| {
            let mut policy = policy.borrow_mut();
            let admitted = policy.admit(&event_type, None) == Admission::Allowed;
            if !admitted {
                debug!(
                    "dropped page registration for {} ({} so far)",
                    event_type,
                    policy.dropped()
                );
            }
            admitted
        }) as Box<dyn FnMut(String) -> bool>);

        // `this` has to reach the original, which a Rust closure cannot see
        let factory = Function::new_with_args(
            "original, admit",
            concat!(
                "return function (type, listener, options) {",
                " if (!admit(String(type))) { return; }",
                " return original.call(this, type, listener, options);",
                " };"
            ),
        );
        let shim = factory
            .call2(&JsValue::NULL, &original, gatekeeper.as_ref())
            .context("build addEventListener shim")?;
        Reflect::set(&proto, &JsValue::from_str("addEventListener"), &shim)
            .context("install addEventListener shim")?;
        info!("page sealed; {} bridge listener(s) active", self.listeners.len());

        Ok(SealedPage {
            listeners: self.listeners,
            gatekeeper,
        })
    }
}

/// Broker after sealing. Dropping it removes the bridge's listeners and
/// leaves a dead gatekeeper behind, so callers keep it or [`persist`] it.
///
/// [`persist`]: SealedPage::persist
pub struct SealedPage {
    listeners: Vec<EventListener>,
    gatekeeper: Closure<dyn FnMut(String) -> bool>,
}

impl SealedPage {
    pub fn persist(self) {
        for listener in self.listeners {
            listener.forget();
        }
        self.gatekeeper.forget();
    }
}
