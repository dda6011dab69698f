//! Dashboard UI: typed messages, handlers split by feature, viewport
//! canvas, and drawer cards

pub mod app;
pub mod handlers;
pub mod message;
pub mod side_panel;
pub mod state;
pub mod theme;
pub mod viewport;

pub use app::StrataApp;
pub use message::Message;
