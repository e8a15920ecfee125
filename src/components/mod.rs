pub mod app;
pub mod camera_controls;
pub mod context_menu;
pub mod event_log_panel;
pub mod viewer;
