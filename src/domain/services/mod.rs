pub mod actions;
mod app_state;
mod chat_state;
mod connect_dialog;
mod connections;
pub mod events;
mod scroll;
#[cfg(test)]
pub mod test_support;
mod title;
mod transcript;

pub use app_state::*;
pub use chat_state::*;
pub use connect_dialog::*;
pub use connections::*;
pub use scroll::*;
pub use title::*;
pub use transcript::*;
