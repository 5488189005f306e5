pub mod assistants;
pub mod stores;
