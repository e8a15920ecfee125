use super::{context_menu::ContextMenu, event_log_panel::EventLogPanel, viewer::Viewer};
use crate::state::{HostAction, HostState};
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let host = use_reducer(HostState::default);

    let on_action = {
        let dispatcher = host.dispatcher();
        Callback::from(move |action: HostAction| dispatcher.dispatch(action))
    };
    let send = |make: fn() -> HostAction| {
        let dispatcher = host.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(make()))
    };

    html! {
        <div id="root">
            <Viewer selected={host.selected} on_action={on_action} />
            <EventLogPanel log={host.log.clone()} on_clear={send(|| HostAction::ClearLog)} />
            <ContextMenu
                at={host.menu}
                selected={host.selected}
                on_toggle_select={send(|| HostAction::ToggleSelect)}
                on_clear_log={send(|| HostAction::ClearLog)}
                on_close={send(|| HostAction::CloseMenu)}
            />
        </div>
    }
}
