use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ContextMenuProps {
    /// Client position to open at; nothing renders while `None`.
    pub at: Option<(f64, f64)>,
    pub selected: bool,
    pub on_toggle_select: Callback<()>,
    pub on_clear_log: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn ContextMenu(props: &ContextMenuProps) -> Html {
    let Some((x, y)) = props.at else {
        return html! {};
    };
    let toggle = {
        let cb = props.on_toggle_select.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let clear = {
        let cb = props.on_clear_log.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let close = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let label = if props.selected { "Deselect" } else { "Select" };
    html! {
        <div style={format!("position:absolute; left:{x}px; top:{y}px; background:rgba(0,0,0,0.85); border:1px solid #30363d; border-radius:8px; padding:6px; display:flex; flex-direction:column; gap:4px; min-width:140px;")}>
            <button onclick={toggle}>{ label }</button>
            <button onclick={clear}>{"Clear event log"}</button>
            <button onclick={close}>{"Close"}</button>
        </div>
    }
}
