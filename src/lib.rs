pub mod event_source;
pub mod inputs;
pub mod main_app;
pub mod panic_handler;
pub mod pdf;
pub mod settings;
pub mod strip;
pub mod theme;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use main_app::{App, run_app_with_event_source};
