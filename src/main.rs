use log::{error, info};
use touch_mouse_bridge::util::init_logging;
use touch_mouse_bridge::BridgeConfig;

mod components;
mod state;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();

    let config = BridgeConfig::from_page();
    init_logging(config.level_filter());
    if let Ok(json) = serde_json::to_string(&config) {
        info!("touch bridge config {}", json);
    }

    // the bridge has to own touch input before the app registers anything
    match touch_mouse_bridge::install(config) {
        Ok(installation) => installation.persist(),
        Err(e) => error!("touch bridge not installed: {}", e),
    }

    yew::Renderer::<App>::new().render();
}
