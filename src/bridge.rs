//! Gate → Classifier → Synthesizer pipeline for one canvas.

use crate::config::BridgeConfig;
use crate::gate::{Gate, TouchNotification, Verdict};
use crate::gesture::{Classifier, GestureMode, LongPressTimer, Ticket};
use crate::synth::PointerSink;
use crate::touch::TouchPhase;

pub struct Bridge<T: LongPressTimer, S: PointerSink> {
    gate: Gate,
    classifier: Classifier<T>,
    sink: S,
}

impl<T: LongPressTimer, S: PointerSink> Bridge<T, S> {
    pub fn new(config: &BridgeConfig, timer: T, sink: S) -> Self {
        Self {
            gate: Gate::new(config.canvas_id.clone()),
            classifier: Classifier::new(config.gesture, timer),
            sink,
        }
    }

    pub fn mode(&self) -> GestureMode {
        self.classifier.mode()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Feed one platform notification through the pipeline. Returns `false`
    /// when the gate passed it through to the platform.
    pub fn on_touch<N: TouchNotification + ?Sized>(
        &mut self,
        phase: TouchPhase,
        notification: &N,
    ) -> bool {
        let frame = match self.gate.check(notification) {
            Verdict::Accept(frame) => frame,
            Verdict::PassThrough => return false,
        };
        // any activity before the timer fires rules out a long press
        self.classifier.disarm();
        match phase {
            TouchPhase::Start => self.classifier.touch_start(&frame, &mut self.sink),
            TouchPhase::Move => self.classifier.touch_move(&frame, &mut self.sink),
            TouchPhase::End => self.classifier.touch_end(&frame, &mut self.sink),
            TouchPhase::Cancel => self.classifier.touch_cancel(&frame, &mut self.sink),
        }
        true
    }

    pub fn long_press_elapsed(&mut self, ticket: Ticket) {
        self.classifier.long_press_elapsed(ticket, &mut self.sink);
    }

    #[cfg(test)]
    pub(crate) fn classifier(&self) -> &Classifier<T> {
        &self.classifier
    }
}
