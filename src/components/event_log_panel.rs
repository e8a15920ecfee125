use yew::prelude::*;

use crate::state::EventLog;

#[derive(Properties, PartialEq, Clone)]
pub struct EventLogPanelProps {
    pub log: EventLog,
    pub on_clear: Callback<()>,
}

fn kind_color(kind: &str) -> &'static str {
    match kind {
        "mousedown" => "#3fb950",
        "mouseup" => "#f85149",
        "wheel" => "#d4af37",
        _ => "#8b949e",
    }
}

#[function_component]
pub fn EventLogPanel(props: &EventLogPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;";
    let value_style = "min-width:56px; text-align:right; font-variant-numeric:tabular-nums;";
    let clear = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:300px; display:flex; flex-direction:column; gap:4px; font-size:12px; font-family:monospace;">
            <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:4px;">
                <span style="font-weight:600; font-family:sans-serif;">{"Received events"}</span>
                <button onclick={clear}>{"Clear"}</button>
            </div>
            { for props.log.entries().map(|e| html! {
                <div style={row_style}>
                    <span style={format!("flex:1; color:{};", kind_color(&e.kind))}>{ e.kind.clone() }</span>
                    <span style={value_style}>{ format!("b{} m{}", e.button, e.buttons) }</span>
                    <span style={value_style}>{ format!("{:.0},{:.0}", e.x, e.y) }</span>
                    <span style={value_style}>{ if e.kind == "wheel" { format!("{:+.1}", e.delta_y) } else { String::new() } }</span>
                </div>
            }) }
        </div>
    }
}
