mod action;
mod app_key;
mod assistant;
mod event;
mod loading;
mod message;
mod role;
mod session;
mod slash_commands;
mod store;
mod textarea;

pub use action::*;
pub use app_key::*;
pub use assistant::*;
pub use event::*;
pub use loading::*;
pub use message::*;
pub use role::*;
pub use session::*;
pub use slash_commands::*;
pub use store::*;
pub use textarea::*;
