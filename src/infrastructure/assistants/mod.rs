pub mod solendir;

use std::sync::Arc;

use crate::domain::models::AssistantBox;

pub struct AssistantManager {}

impl AssistantManager {
    pub fn get() -> AssistantBox {
        return Arc::<solendir::Solendir>::default();
    }
}
