//! Demo host state: what the mouse-only viewer has seen and shows.

use std::rc::Rc;
use yew::Reducible;

use super::event_log::{EventLog, LoggedEvent};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostState {
    pub log: EventLog,
    pub selected: bool,
    /// Client position of the open context menu.
    pub menu: Option<(f64, f64)>,
}

pub enum HostAction {
    Received(LoggedEvent),
    Select,
    ToggleSelect,
    OpenMenu { x: f64, y: f64 },
    CloseMenu,
    ClearLog,
}

impl Reducible for HostState {
    type Action = HostAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            HostAction::Received(ev) => next.log.push(ev),
            HostAction::Select => {
                next.selected = true;
                next.menu = None;
            }
            HostAction::ToggleSelect => {
                next.selected = !next.selected;
                next.menu = None;
            }
            HostAction::OpenMenu { x, y } => next.menu = Some((x, y)),
            HostAction::CloseMenu => next.menu = None,
            HostAction::ClearLog => {
                next.log = EventLog::default();
                next.menu = None;
            }
        }
        Rc::new(next)
    }
}
