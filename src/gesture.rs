//! Gesture Classifier.
//!
//! A touch-start cannot tell a tap from a drag or a long-press, so the
//! classifier parks in a pending mode and commits on the next signal: a move
//! (drag), an end (tap) or the long-press timer (context click). Each mode
//! variant carries only the memory that mode needs; the pinch distance lives
//! inside `Pinching` and the armed timer inside the pending variants, so
//! neither can outlive its mode.

use log::debug;

use crate::config::GestureConfig;
use crate::synth::{emit, ButtonProfile, PointerIntent, PointerSink};
use crate::touch::TouchFrame;

/// Identifies one arming of the long-press timer. A fire carrying a ticket
/// other than the currently armed one is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Schedules the single deferred long-press callback.
///
/// Implementations call [`Classifier::long_press_elapsed`] with the ticket once
/// `after_ms` has passed, unless [`LongPressTimer::disarm`] ran first.
pub trait LongPressTimer {
    type Handle;

    fn arm(&mut self, after_ms: u32, ticket: Ticket) -> Self::Handle;
    fn disarm(&mut self, handle: Self::Handle);
}

struct Armed<H> {
    handle: H,
    ticket: Ticket,
}

struct Pending<H> {
    timer: Option<Armed<H>>,
    /// Frame of the touch-start; the long-press click lands here.
    origin: TouchFrame,
}

enum Mode<H> {
    Idle,
    PendingRotate(Pending<H>),
    PendingPinch(Pending<H>),
    Rotating,
    Pinching { last_distance: Option<f64> },
}

/// Observable name of the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    PendingRotate,
    PendingPinch,
    Rotating,
    Pinching,
}

impl<H> Mode<H> {
    fn kind(&self) -> GestureMode {
        match self {
            Mode::Idle => GestureMode::Idle,
            Mode::PendingRotate(_) => GestureMode::PendingRotate,
            Mode::PendingPinch(_) => GestureMode::PendingPinch,
            Mode::Rotating => GestureMode::Rotating,
            Mode::Pinching { .. } => GestureMode::Pinching,
        }
    }
}

pub struct Classifier<T: LongPressTimer> {
    mode: Mode<T::Handle>,
    timer: T,
    config: GestureConfig,
    issued: u64,
}

impl<T: LongPressTimer> Classifier<T> {
    pub fn new(config: GestureConfig, timer: T) -> Self {
        Self {
            mode: Mode::Idle,
            timer,
            config,
            issued: 0,
        }
    }

    pub fn mode(&self) -> GestureMode {
        self.mode.kind()
    }

    /// Whether a long-press callback is currently scheduled.
    pub fn long_press_armed(&self) -> bool {
        match &self.mode {
            Mode::PendingRotate(p) | Mode::PendingPinch(p) => p.timer.is_some(),
            _ => false,
        }
    }

    /// Cancel the outstanding long-press callback, if any. The mode is left
    /// alone: a pending gesture stays pending until a move or end resolves it.
    pub fn disarm(&mut self) {
        if let Mode::PendingRotate(p) | Mode::PendingPinch(p) = &mut self.mode {
            if let Some(armed) = p.timer.take() {
                self.timer.disarm(armed.handle);
            }
        }
    }

    /// Drop all per-gesture state without synthesizing anything.
    pub fn reset(&mut self) {
        self.disarm();
        self.mode = Mode::Idle;
    }

    pub fn touch_start<S: PointerSink + ?Sized>(&mut self, frame: &TouchFrame, sink: &mut S) {
        self.disarm();
        // a new finger mid-drag: release the drag so no button stays held
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Rotating => emit(sink, PointerIntent::up(ButtonProfile::Secondary), frame),
            Mode::Pinching { .. } => emit(sink, PointerIntent::up(ButtonProfile::Auxiliary), frame),
            _ => {}
        }
        if frame.is_empty() {
            return;
        }
        let ticket = self.next_ticket();
        let handle = self.timer.arm(self.config.long_press_ms, ticket);
        let pending = Pending {
            timer: Some(Armed { handle, ticket }),
            origin: frame.clone(),
        };
        self.mode = if frame.len() >= 2 {
            Mode::PendingPinch(pending)
        } else {
            Mode::PendingRotate(pending)
        };
        debug!("touch start with {} point(s) -> {:?}", frame.len(), self.mode());
    }

    pub fn touch_move<S: PointerSink + ?Sized>(&mut self, frame: &TouchFrame, sink: &mut S) {
        self.disarm();
        self.mode = match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => Mode::Idle,
            Mode::PendingRotate(_) => {
                emit(sink, PointerIntent::down(ButtonProfile::Secondary), frame);
                debug!("drag confirmed -> Rotating");
                Mode::Rotating
            }
            Mode::PendingPinch(_) => {
                emit(sink, PointerIntent::down(ButtonProfile::Auxiliary), frame);
                debug!("two-finger drag confirmed -> Pinching");
                Mode::Pinching {
                    last_distance: frame.pinch_distance(),
                }
            }
            Mode::Rotating if frame.is_empty() => {
                emit(sink, PointerIntent::up(ButtonProfile::Secondary), frame);
                Mode::Idle
            }
            Mode::Rotating => {
                emit(sink, PointerIntent::moved(ButtonProfile::Secondary), frame);
                Mode::Rotating
            }
            Mode::Pinching { last_distance } => match frame.pinch_distance() {
                Some(distance) => {
                    emit(sink, PointerIntent::moved(ButtonProfile::Secondary), frame);
                    if let Some(previous) = last_distance {
                        if let Some(delta) = self.zoom_delta(previous, distance, sink.screen_width()) {
                            emit(sink, PointerIntent::wheel(ButtonProfile::Auxiliary, delta), frame);
                        }
                    }
                    Mode::Pinching {
                        last_distance: Some(distance),
                    }
                }
                None => {
                    // a finger is gone without a touch-end; treat it as one
                    emit(sink, PointerIntent::up(ButtonProfile::Auxiliary), frame);
                    debug!("pinch lost its second point -> Idle");
                    Mode::Idle
                }
            },
        };
    }

    pub fn touch_end<S: PointerSink + ?Sized>(&mut self, frame: &TouchFrame, sink: &mut S) {
        self.disarm();
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => {}
            Mode::PendingRotate(_) => {
                emit(sink, PointerIntent::moved(ButtonProfile::Default), frame);
                emit(sink, PointerIntent::down(ButtonProfile::Default), frame);
                emit(sink, PointerIntent::up(ButtonProfile::Default), frame);
                debug!("quick tap");
            }
            Mode::PendingPinch(_) => debug!("two-finger tap ignored"),
            Mode::Rotating => emit(sink, PointerIntent::up(ButtonProfile::Secondary), frame),
            Mode::Pinching { .. } => emit(sink, PointerIntent::up(ButtonProfile::Auxiliary), frame),
        }
    }

    /// The platform withdrew the touches. Committed drags are released; a
    /// pending gesture is dropped without a click.
    pub fn touch_cancel<S: PointerSink + ?Sized>(&mut self, frame: &TouchFrame, sink: &mut S) {
        self.disarm();
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Rotating => emit(sink, PointerIntent::up(ButtonProfile::Secondary), frame),
            Mode::Pinching { .. } => emit(sink, PointerIntent::up(ButtonProfile::Auxiliary), frame),
            _ => debug!("touch cancelled"),
        }
    }

    /// Long-press timer callback. Synthesizes a secondary click at the
    /// touch-start point when `ticket` is still the armed one.
    pub fn long_press_elapsed<S: PointerSink + ?Sized>(&mut self, ticket: Ticket, sink: &mut S) {
        let current = match &self.mode {
            Mode::PendingRotate(p) | Mode::PendingPinch(p) => {
                p.timer.as_ref().is_some_and(|armed| armed.ticket == ticket)
            }
            _ => false,
        };
        if !current {
            debug!("stale long-press {:?} ignored", ticket);
            return;
        }
        if let Mode::PendingRotate(p) | Mode::PendingPinch(p) =
            std::mem::replace(&mut self.mode, Mode::Idle)
        {
            emit(sink, PointerIntent::down(ButtonProfile::Secondary), &p.origin);
            emit(sink, PointerIntent::up(ButtonProfile::Secondary), &p.origin);
            debug!("long press -> context click");
        }
    }

    fn next_ticket(&mut self) -> Ticket {
        self.issued = self.issued.wrapping_add(1);
        Ticket(self.issued)
    }

    /// Wheel delta for a change in finger separation. Positive when the
    /// fingers move apart.
    fn zoom_delta(&self, previous: f64, current: f64, screen_width: f64) -> Option<f64> {
        if screen_width <= 0.0 {
            return None;
        }
        Some((current - previous) / screen_width * self.config.zoom_sensitivity)
    }

    #[cfg(test)]
    pub(crate) fn timer(&self) -> &T {
        &self.timer
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::synth::tests::RecordingSink;
    use crate::synth::{Button, IntentKind};
    use crate::touch::TouchPoint;

    /// Timer that never fires on its own; tests fire it by hand.
    #[derive(Default)]
    pub(crate) struct FakeTimer {
        pub armed: Vec<(u32, Ticket)>,
        pub disarmed: Vec<Ticket>,
    }

    impl FakeTimer {
        pub fn live(&self) -> Vec<Ticket> {
            self.armed
                .iter()
                .map(|(_, t)| *t)
                .filter(|t| !self.disarmed.contains(t))
                .collect()
        }
    }

    impl LongPressTimer for FakeTimer {
        type Handle = Ticket;

        fn arm(&mut self, after_ms: u32, ticket: Ticket) -> Ticket {
            self.armed.push((after_ms, ticket));
            ticket
        }

        fn disarm(&mut self, handle: Ticket) {
            self.disarmed.push(handle);
        }
    }

    fn one(x: f64, y: f64) -> TouchFrame {
        TouchFrame::new([TouchPoint::at(0, x, y)])
    }

    fn two(a: (f64, f64), b: (f64, f64)) -> TouchFrame {
        TouchFrame::new([TouchPoint::at(0, a.0, a.1), TouchPoint::at(1, b.0, b.1)])
    }

    fn classifier() -> Classifier<FakeTimer> {
        Classifier::new(GestureConfig::default(), FakeTimer::default())
    }

    /// Fire the most recently armed timer if it is still live.
    fn fire(c: &mut Classifier<FakeTimer>, sink: &mut RecordingSink) {
        if let Some(ticket) = c.timer().live().last().copied() {
            c.long_press_elapsed(ticket, sink);
        }
    }

    #[test]
    fn start_arms_one_timer_for_the_configured_timeout() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(5.0, 5.0), &mut sink);
        assert_eq!(c.mode(), GestureMode::PendingRotate);
        assert_eq!(c.timer().armed.len(), 1);
        assert_eq!(c.timer().armed[0].0, 1000);
        assert!(c.long_press_armed());
        assert!(sink.events.is_empty());

        c.touch_start(&two((0.0, 0.0), (10.0, 0.0)), &mut sink);
        assert_eq!(c.mode(), GestureMode::PendingPinch);
        assert_eq!(c.timer().live().len(), 1);
    }

    #[test]
    fn quick_tap_is_move_down_up_with_primary_button() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(40.0, 60.0), &mut sink);
        c.touch_end(&one(40.0, 60.0), &mut sink);
        assert_eq!(
            sink.kinds(),
            vec![
                (IntentKind::Move, Button::Primary),
                (IntentKind::Down, Button::Primary),
                (IntentKind::Up, Button::Primary),
            ]
        );
        assert!(sink.events.iter().all(|e| e.coords.client_x == 40.0));
        assert_eq!(sink.events[0].buttons, 0);
        assert_eq!(c.mode(), GestureMode::Idle);
        assert!(c.timer().live().is_empty());
    }

    #[test]
    fn long_press_clicks_secondary_at_the_start_point() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(100.0, 100.0), &mut sink);
        fire(&mut c, &mut sink);
        assert_eq!(
            sink.kinds(),
            vec![(IntentKind::Down, Button::Secondary), (IntentKind::Up, Button::Secondary)]
        );
        for e in &sink.events {
            assert_eq!((e.coords.screen_x, e.coords.screen_y), (100.0, 100.0));
        }
        assert_eq!(c.mode(), GestureMode::Idle);

        // a late end after the long press produces nothing
        c.touch_end(&one(100.0, 100.0), &mut sink);
        assert_eq!(sink.events.len(), 2);
    }

    #[test]
    fn two_finger_long_press_is_still_a_secondary_click() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&two((0.0, 0.0), (100.0, 0.0)), &mut sink);
        fire(&mut c, &mut sink);
        assert_eq!(
            sink.kinds(),
            vec![(IntentKind::Down, Button::Secondary), (IntentKind::Up, Button::Secondary)]
        );
        assert_eq!(sink.events[0].coords.client_x, 50.0);
    }

    #[test]
    fn one_finger_drag_is_a_secondary_drag() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(0.0, 0.0), &mut sink);
        c.touch_move(&one(1.0, 0.0), &mut sink);
        assert_eq!(c.mode(), GestureMode::Rotating);
        // the first move disarmed the timer for good
        assert!(c.timer().live().is_empty());
        c.touch_move(&one(2.0, 0.0), &mut sink);
        c.touch_move(&one(3.0, 0.0), &mut sink);
        c.touch_end(&one(3.0, 0.0), &mut sink);
        assert_eq!(
            sink.kinds(),
            vec![
                (IntentKind::Down, Button::Secondary),
                (IntentKind::Move, Button::Secondary),
                (IntentKind::Move, Button::Secondary),
                (IntentKind::Up, Button::Secondary),
            ]
        );
        assert_eq!(sink.events[1].buttons, 2);
        assert_eq!(c.mode(), GestureMode::Idle);
    }

    #[test]
    fn stale_ticket_after_move_synthesizes_nothing() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(0.0, 0.0), &mut sink);
        let ticket = c.timer().armed[0].1;
        c.touch_move(&one(1.0, 1.0), &mut sink);
        let before = sink.events.len();
        c.long_press_elapsed(ticket, &mut sink);
        assert_eq!(sink.events.len(), before);
        assert_eq!(c.mode(), GestureMode::Rotating);
    }

    #[test]
    fn pinch_emits_auxiliary_down_then_move_and_wheel() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&two((0.0, 0.0), (100.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (100.0, 0.0)), &mut sink);
        assert_eq!(sink.kinds(), vec![(IntentKind::Down, Button::Auxiliary)]);
        assert_eq!(sink.events[0].buttons, 4);

        c.touch_move(&two((0.0, 0.0), (80.0, 0.0)), &mut sink);
        assert_eq!(sink.events.len(), 3);
        assert_eq!(sink.kinds()[1], (IntentKind::Move, Button::Secondary));
        let wheel = sink.events[2];
        assert_eq!(wheel.kind, IntentKind::Wheel);
        // (80 - 100) / 1000 * 10000
        assert!((wheel.delta_y - -200.0).abs() < 1e-9);
        assert_eq!(wheel.coords.client_x, 40.0);

        c.touch_move(&two((0.0, 0.0), (120.0, 0.0)), &mut sink);
        assert!(sink.events[4].delta_y > 0.0);

        c.touch_end(&one(0.0, 0.0), &mut sink);
        assert_eq!(sink.kinds().last(), Some(&(IntentKind::Up, Button::Auxiliary)));
        assert_eq!(c.mode(), GestureMode::Idle);
    }

    #[test]
    fn first_pinch_move_only_presses_the_middle_button() {
        // start at distance 100, first move at 80: the committing move has no
        // previous pinch distance, so the 80 - 100 change is not a wheel
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&two((0.0, 0.0), (100.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (80.0, 0.0)), &mut sink);
        assert_eq!(sink.kinds(), vec![(IntentKind::Down, Button::Auxiliary)]);
        assert_eq!(c.mode(), GestureMode::Pinching);

        // the wheel is measured from the committing move onward
        c.touch_move(&two((0.0, 0.0), (60.0, 0.0)), &mut sink);
        assert_eq!(
            sink.kinds(),
            vec![
                (IntentKind::Down, Button::Auxiliary),
                (IntentKind::Move, Button::Secondary),
                (IntentKind::Wheel, Button::None),
            ]
        );
        assert!((sink.events[2].delta_y - -200.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_distance_does_not_leak_into_the_next_pinch() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&two((0.0, 0.0), (300.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (300.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (310.0, 0.0)), &mut sink);
        c.touch_end(&TouchFrame::empty(), &mut sink);
        sink.events.clear();

        c.touch_start(&two((0.0, 0.0), (50.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (60.0, 0.0)), &mut sink);
        // first move of a fresh pinch: down only, no wheel against 310
        assert_eq!(sink.kinds(), vec![(IntentKind::Down, Button::Auxiliary)]);
        c.touch_move(&two((0.0, 0.0), (70.0, 0.0)), &mut sink);
        assert!((sink.events[2].delta_y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_move_with_one_point_ends_the_pinch() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&two((0.0, 0.0), (10.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (20.0, 0.0)), &mut sink);
        c.touch_move(&one(0.0, 0.0), &mut sink);
        assert_eq!(sink.kinds().last(), Some(&(IntentKind::Up, Button::Auxiliary)));
        assert_eq!(c.mode(), GestureMode::Idle);
        // the leftover finger keeps moving: nothing happens
        c.touch_move(&one(5.0, 0.0), &mut sink);
        assert_eq!(sink.events.len(), 2);
    }

    #[test]
    fn two_finger_tap_is_a_no_op() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&two((0.0, 0.0), (10.0, 0.0)), &mut sink);
        c.touch_end(&one(0.0, 0.0), &mut sink);
        assert!(sink.events.is_empty());
        assert_eq!(c.mode(), GestureMode::Idle);
        assert!(c.timer().live().is_empty());
    }

    #[test]
    fn second_finger_during_drag_releases_the_drag() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(0.0, 0.0), &mut sink);
        c.touch_move(&one(5.0, 0.0), &mut sink);
        c.touch_start(&two((5.0, 0.0), (50.0, 0.0)), &mut sink);
        assert_eq!(sink.kinds().last(), Some(&(IntentKind::Up, Button::Secondary)));
        assert_eq!(c.mode(), GestureMode::PendingPinch);
        assert_eq!(c.timer().live().len(), 1);
    }

    #[test]
    fn cancel_releases_drags_and_drops_pending_taps() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(0.0, 0.0), &mut sink);
        c.touch_cancel(&one(0.0, 0.0), &mut sink);
        assert!(sink.events.is_empty());
        assert_eq!(c.mode(), GestureMode::Idle);
        assert!(c.timer().live().is_empty());

        c.touch_start(&one(0.0, 0.0), &mut sink);
        c.touch_move(&one(1.0, 0.0), &mut sink);
        c.touch_cancel(&one(1.0, 0.0), &mut sink);
        assert_eq!(sink.kinds().last(), Some(&(IntentKind::Up, Button::Secondary)));
        assert_eq!(c.mode(), GestureMode::Idle);
    }

    #[test]
    fn zero_screen_width_skips_the_wheel() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(0.0);
        c.touch_start(&two((0.0, 0.0), (10.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (10.0, 0.0)), &mut sink);
        c.touch_move(&two((0.0, 0.0), (30.0, 0.0)), &mut sink);
        assert!(sink.events.iter().all(|e| e.kind != IntentKind::Wheel));
    }

    #[test]
    fn fresh_gesture_behaves_the_same_after_any_history() {
        let run = |c: &mut Classifier<FakeTimer>| {
            let mut sink = RecordingSink::with_width(1000.0);
            c.touch_start(&one(10.0, 10.0), &mut sink);
            c.touch_end(&one(10.0, 10.0), &mut sink);
            sink.events
        };
        let mut fresh = classifier();
        let expected = run(&mut fresh);

        let mut used = classifier();
        let mut scratch = RecordingSink::with_width(1000.0);
        used.touch_start(&two((0.0, 0.0), (40.0, 0.0)), &mut scratch);
        used.touch_move(&two((0.0, 0.0), (45.0, 0.0)), &mut scratch);
        used.touch_move(&two((0.0, 0.0), (50.0, 0.0)), &mut scratch);
        used.touch_end(&TouchFrame::empty(), &mut scratch);
        used.touch_start(&one(0.0, 0.0), &mut scratch);
        fire(&mut used, &mut scratch);
        assert_eq!(run(&mut used), expected);
    }

    #[test]
    fn reset_disarms_and_returns_to_idle() {
        let mut c = classifier();
        let mut sink = RecordingSink::with_width(1000.0);
        c.touch_start(&one(0.0, 0.0), &mut sink);
        c.reset();
        assert_eq!(c.mode(), GestureMode::Idle);
        assert!(c.timer().live().is_empty());
    }
}
