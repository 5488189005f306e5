use super::Message;

pub struct AssistantPrompt {
    /// Session the reply is appended to, whichever session is active by then.
    pub session_id: String,
    pub text: String,
}

pub struct TitlePrompt {
    pub session_id: String,
    pub exchange: Vec<Message>,
}

pub enum Action {
    AssistantRequest(AssistantPrompt),
    PushCredential(String),
    TitleRequest(TitlePrompt),
}
