//! Interception Gate: decides which touch notifications belong to the canvas
//! and normalizes the ones that do.

use log::trace;

use crate::touch::{TouchFrame, TouchPoint};

/// A raw platform touch notification.
pub trait TouchNotification {
    /// `id` of the target element, or `None` when the target is not an element
    /// and so has no identity to compare.
    fn target_id(&self) -> Option<String>;
    /// Points still on the surface.
    fn active_points(&self) -> Vec<TouchPoint>;
    /// Points that changed in this notification (the lifted ones on an end).
    fn changed_points(&self) -> Vec<TouchPoint>;
    /// Stop the platform from scrolling, zooming or selecting.
    fn suppress_default(&self);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Accept(TouchFrame),
    /// Not ours: leave it to the platform untouched.
    PassThrough,
}

#[derive(Clone, Debug)]
pub struct Gate {
    canvas_id: String,
}

impl Gate {
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
        }
    }

    pub fn admits(&self, target_id: Option<&str>) -> bool {
        target_id.is_none_or(|id| id == self.canvas_id)
    }

    pub fn check<N: TouchNotification + ?Sized>(&self, notification: &N) -> Verdict {
        let target = notification.target_id();
        if !self.admits(target.as_deref()) {
            trace!("touch on {:?} passed through", target);
            return Verdict::PassThrough;
        }
        notification.suppress_default();
        Verdict::Accept(normalize(notification))
    }
}

/// Active points, or the changed points once the last finger has lifted so
/// that an end still knows where it happened.
pub fn normalize<N: TouchNotification + ?Sized>(notification: &N) -> TouchFrame {
    let active = notification.active_points();
    if active.is_empty() {
        TouchFrame::new(notification.changed_points())
    } else {
        TouchFrame::new(active)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use super::*;

    pub(crate) struct FakeNotification {
        pub target: Option<String>,
        pub active: Vec<TouchPoint>,
        pub changed: Vec<TouchPoint>,
        pub suppressed: Cell<bool>,
    }

    impl FakeNotification {
        pub fn on(target: &str, active: Vec<TouchPoint>) -> Self {
            Self {
                target: Some(target.to_string()),
                changed: active.clone(),
                active,
                suppressed: Cell::new(false),
            }
        }

        /// End notification: nothing left on the surface.
        pub fn lifted(target: &str, changed: Vec<TouchPoint>) -> Self {
            Self {
                target: Some(target.to_string()),
                active: Vec::new(),
                changed,
                suppressed: Cell::new(false),
            }
        }
    }

    impl TouchNotification for FakeNotification {
        fn target_id(&self) -> Option<String> {
            self.target.clone()
        }

        fn active_points(&self) -> Vec<TouchPoint> {
            self.active.clone()
        }

        fn changed_points(&self) -> Vec<TouchPoint> {
            self.changed.clone()
        }

        fn suppress_default(&self) {
            self.suppressed.set(true);
        }
    }

    #[test]
    fn other_elements_pass_through_untouched() {
        let gate = Gate::new("canvas");
        let n = FakeNotification::on("toolbar", vec![TouchPoint::at(0, 1.0, 1.0)]);
        assert_eq!(gate.check(&n), Verdict::PassThrough);
        assert!(!n.suppressed.get());
    }

    #[test]
    fn canvas_touches_are_accepted_and_suppressed() {
        let gate = Gate::new("canvas");
        let n = FakeNotification::on("canvas", vec![TouchPoint::at(0, 1.0, 2.0)]);
        match gate.check(&n) {
            Verdict::Accept(frame) => assert_eq!(frame.points()[0].client_y, 2.0),
            Verdict::PassThrough => panic!("canvas touch rejected"),
        }
        assert!(n.suppressed.get());
    }

    #[test]
    fn targets_without_identity_are_accepted() {
        let gate = Gate::new("canvas");
        let mut n = FakeNotification::on("x", vec![]);
        n.target = None;
        assert!(matches!(gate.check(&n), Verdict::Accept(_)));
        assert!(gate.admits(None));
        assert!(!gate.admits(Some("")));
    }

    #[test]
    fn lifted_fingers_fall_back_to_changed_points() {
        let n = FakeNotification::lifted("canvas", vec![TouchPoint::at(3, 9.0, 9.0)]);
        let frame = normalize(&n);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.points()[0].id, 3);

        let n = FakeNotification::lifted("canvas", vec![]);
        assert!(normalize(&n).is_empty());
    }
}
