pub mod canvas;
pub mod hud_message;
pub mod outline_panel;
pub mod status_bar;

pub use canvas::HalfblockCanvas;
pub use hud_message::{HudMessage, HudMode};
pub use outline_panel::OutlinePanel;
pub use status_bar::{render_status_bar, status_line};
