use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};
use yew::prelude::*;

use super::camera_controls::CameraControls;
use crate::state::{Camera, Drag, HostAction, LoggedEvent};
use touch_mouse_bridge::config::CANVAS_ID;

/// Right-button releases closer than this to the press open the context menu.
const CLICK_SLOP_PX: f64 = 4.0;

const CUBE: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];
const EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

#[derive(Properties, PartialEq, Clone)]
pub struct ViewerProps {
    pub selected: bool,
    pub on_action: Callback<HostAction>,
}

fn logged(e: &MouseEvent, kind: &str, delta_y: f64) -> LoggedEvent {
    LoggedEvent {
        kind: kind.to_string(),
        button: e.button(),
        buttons: e.buttons(),
        x: e.client_x() as f64,
        y: e.client_y() as f64,
        delta_y,
    }
}

/// Mouse-only canvas viewer. It never listens to touch events; on touch
/// devices everything it sees comes from the bridge.
#[function_component(Viewer)]
pub fn viewer(props: &ViewerProps) -> Html {
    let canvas_ref = use_node_ref();
    let camera = use_mut_ref(Camera::default);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let selected_flag = use_mut_ref(|| false);

    // Redraw when selection toggles
    {
        let draw_ref = draw_ref.clone();
        let flag = props.selected;
        let selected_flag = selected_flag.clone();
        use_effect_with(flag, move |_| {
            *selected_flag.borrow_mut() = flag;
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let camera = camera.clone();
        let draw_ref_setup = draw_ref.clone();
        let on_action = props.on_action.clone();

        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");

            let fit_canvas = {
                let canvas = canvas.clone();
                let window = window.clone();
                move || {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width(width.max(0.0) as u32);
                    canvas.set_height(height.max(0.0) as u32);
                }
            };
            fit_canvas();

            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let camera = camera.clone();
                let selected_flag = selected_flag.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    {
                        Some(c) => c,
                        None => return,
                    };
                    let w = canvas.width() as f64;
                    let h = canvas.height() as f64;
                    let cam = camera.borrow();
                    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
                    ctx.set_fill_style_str("#0e1116");
                    ctx.fill_rect(0.0, 0.0, w, h);

                    // background grid moves with pan, spacing with zoom
                    let step = (48.0 * cam.zoom).max(8.0);
                    ctx.set_stroke_style_str("#1f252e");
                    ctx.set_line_width(1.0);
                    let mut x = cam.offset_x.rem_euclid(step);
                    while x < w {
                        ctx.begin_path();
                        ctx.move_to(x, 0.0);
                        ctx.line_to(x, h);
                        ctx.stroke();
                        x += step;
                    }
                    let mut y = cam.offset_y.rem_euclid(step);
                    while y < h {
                        ctx.begin_path();
                        ctx.move_to(0.0, y);
                        ctx.line_to(w, y);
                        ctx.stroke();
                        y += step;
                    }

                    let selected = *selected_flag.borrow();
                    ctx.set_stroke_style_str(if selected { "#d4af37" } else { "#58a6ff" });
                    ctx.set_line_width(if selected { 3.0 } else { 2.0 });
                    let scale = w.min(h) * 0.18;
                    for (a, b) in EDGES {
                        let (ax, ay) = cam.project(CUBE[a], w * 0.5, h * 0.5, scale);
                        let (bx, by) = cam.project(CUBE[b], w * 0.5, h * 0.5, scale);
                        ctx.begin_path();
                        ctx.move_to(ax, ay);
                        ctx.line_to(bx, by);
                        ctx.stroke();
                    }
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();

            // where the current right-button press started
            let press: Rc<Cell<Option<(f64, f64)>>> = Rc::new(Cell::new(None));

            // Mouse down: left selects, middle pans, right orbits
            let mousedown_cb = {
                let camera = camera.clone();
                let on_action = on_action.clone();
                let press = press.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    on_action.emit(HostAction::Received(logged(&e, "mousedown", 0.0)));
                    let x = e.client_x() as f64;
                    let y = e.client_y() as f64;
                    match e.button() {
                        0 => on_action.emit(HostAction::Select),
                        1 => camera.borrow_mut().begin(Drag::Pan, x, y),
                        2 => {
                            camera.borrow_mut().begin(Drag::Orbit, x, y);
                            press.set(Some((x, y)));
                        }
                        _ => {}
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let mousemove_cb = {
                let camera = camera.clone();
                let draw_ref = draw_ref_setup.clone();
                let on_action = on_action.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let mut cam = camera.borrow_mut();
                    if cam.drag.is_none() {
                        return;
                    }
                    on_action.emit(HostAction::Received(logged(&e, "mousemove", 0.0)));
                    cam.drag_to(e.client_x() as f64, e.client_y() as f64);
                    drop(cam);
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let mouseup_cb = {
                let camera = camera.clone();
                let on_action = on_action.clone();
                let press = press.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    on_action.emit(HostAction::Received(logged(&e, "mouseup", 0.0)));
                    camera.borrow_mut().end();
                    if e.button() == 2 {
                        let x = e.client_x() as f64;
                        let y = e.client_y() as f64;
                        if let Some((px, py)) = press.take() {
                            if (x - px).hypot(y - py) <= CLICK_SLOP_PX {
                                on_action.emit(HostAction::OpenMenu { x, y });
                            }
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .ok();

            let wheel_cb = {
                let camera = camera.clone();
                let draw_ref = draw_ref_setup.clone();
                let on_action = on_action.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    on_action.emit(HostAction::Received(logged(&e, "wheel", e.delta_y())));
                    camera.borrow_mut().zoom_by(e.delta_y());
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .ok();

            // the menu opens from mouseup; keep the browser's own menu away
            let contextmenu_cb = Closure::wrap(Box::new(move |e: web_sys::Event| {
                e.prevent_default();
            }) as Box<dyn FnMut(_)>);
            canvas
                .add_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                )
                .ok();

            let resize_cb = {
                let draw_ref = draw_ref_setup.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    fit_canvas();
                    if let Some(f) = &*draw_ref.borrow() {
                        f();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .ok();

            // Cleanup
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "contextmenu",
                    contextmenu_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                *draw_ref_setup.borrow_mut() = None;
            }
        });
    }

    let redraw = {
        let draw_ref = draw_ref.clone();
        move || {
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
        }
    };
    let zoom_cb = |delta: f64| {
        let camera = camera.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: ()| {
            camera.borrow_mut().zoom_by(delta);
            redraw();
        })
    };
    let reset_cb = {
        let camera = camera.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: ()| {
            *camera.borrow_mut() = Camera::default();
            redraw();
        })
    };

    html! {<div style="position:relative; width:100vw; height:100vh;">
        <canvas ref={canvas_ref} id={CANVAS_ID} style="display:block; width:100%; height:100%; touch-action:none;"></canvas>
        <CameraControls on_zoom_in={zoom_cb(200.0)} on_zoom_out={zoom_cb(-200.0)} on_reset={reset_cb} />
    </div>}
}
