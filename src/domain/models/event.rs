use tui_textarea::Input;

use super::AssistantError;

#[derive(Debug)]
pub struct AssistantResponse {
    pub session_id: String,
    pub result: Result<String, AssistantError>,
}

#[derive(Debug)]
pub struct TitleResponse {
    pub session_id: String,
    /// `None` when the title request failed.
    pub title: Option<String>,
}

pub enum Event {
    AssistantResponse(AssistantResponse),
    TitleResponse(TitleResponse),
    KeyboardAltDown(),
    KeyboardAltUp(),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardCTRLO(),
    KeyboardCTRLX(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
