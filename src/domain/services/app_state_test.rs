use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use ratatui::prelude::Rect;
use test_utils::sessions_fixture;
use tokio::sync::mpsc;

use super::AppState;
use super::APOLOGY;
use crate::domain::models::Action;
use crate::domain::models::AppKey;
use crate::domain::models::AssistantError;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::Store;
use crate::domain::models::StoreBox;
use crate::domain::models::TitlePrompt;
use crate::domain::models::TitleResponse;
use crate::domain::models::NOTION_TOKEN_KEY;
use crate::domain::models::SEED_GREETING;
use crate::domain::models::SESSIONS_KEY;
use crate::domain::services::DialogOutcome;
use crate::domain::services::test_support::ScriptedAssistant;
use crate::infrastructure::stores::memory::MemoryStore;

fn app_state() -> Result<(AppState, mpsc::UnboundedReceiver<Action>, StoreBox)> {
    let store: StoreBox = Arc::<MemoryStore>::default();
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new(store.clone(), tx)?;
    app_state.set_rect(Rect::new(0, 0, 100, 40));
    return Ok((app_state, rx, store));
}

fn to_assistant_prompt(action: Option<Action>) -> Result<AssistantPrompt> {
    match action {
        Some(Action::AssistantRequest(prompt)) => return Ok(prompt),
        _ => bail!("Wrong action"),
    }
}

fn to_title_prompt(action: Option<Action>) -> Result<TitlePrompt> {
    match action {
        Some(Action::TitleRequest(prompt)) => return Ok(prompt),
        _ => bail!("Wrong action"),
    }
}

fn reply(session_id: &str, text: &str) -> AssistantResponse {
    return AssistantResponse {
        session_id: session_id.to_string(),
        result: Ok(text.to_string()),
    };
}

fn command(text: &str) -> Result<SlashCommand> {
    match SlashCommand::parse(text) {
        Some(command) => return Ok(command),
        None => bail!("Not a command: {text}"),
    }
}

mod send_message {
    use super::*;

    #[test]
    fn it_sends_the_first_message() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        let session_id = app_state.chats.active().id.to_string();

        app_state.submit("Hello")?;

        assert!(app_state.loading);
        let session = app_state.chats.active();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].role, Role::User);
        assert!(session.messages[1].time.is_some());
        assert_eq!(session.name, "Hello");

        let prompt = to_assistant_prompt(rx.try_recv().ok())?;
        assert_eq!(prompt.session_id, session_id);
        assert_eq!(prompt.text, "Hello");
        return Ok(());
    }

    #[test]
    fn it_ignores_blank_input() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;

        app_state.submit("   \n ")?;

        assert!(!app_state.loading);
        assert_eq!(app_state.chats.active().messages.len(), 1);
        assert!(rx.try_recv().is_err());
        return Ok(());
    }

    #[test]
    fn it_blocks_sends_while_loading() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let _ = rx.try_recv();

        app_state.submit("Anyone there?")?;

        assert_eq!(app_state.chats.active().messages.len(), 2);
        assert!(rx.try_recv().is_err());
        return Ok(());
    }

    #[test]
    fn it_appends_the_reply_and_requests_a_title() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;

        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi! How can I help?"))?;

        assert!(!app_state.loading);
        let session = app_state.chats.active();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[0].content, SEED_GREETING);
        assert_eq!(session.messages[1].content, "Hello");
        assert_eq!(session.messages[2].content, "Hi! How can I help?");
        assert_eq!(session.messages[2].role, Role::Assistant);
        assert_eq!(session.name, "Hello");
        assert!(app_state.pending_titles.contains(&prompt.session_id));

        let title_prompt = to_title_prompt(rx.try_recv().ok())?;
        assert_eq!(title_prompt.session_id, prompt.session_id);
        assert_eq!(title_prompt.exchange, session.messages);
        return Ok(());
    }

    #[test]
    fn it_apologizes_when_the_backend_fails() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("test")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;

        app_state.handle_assistant_response(AssistantResponse {
            session_id: prompt.session_id.to_string(),
            result: Err(AssistantError::Communication("connection refused".to_string())),
        })?;

        assert!(!app_state.loading);
        let session = app_state.chats.active();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[2].content, APOLOGY);
        assert_eq!(session.name, "test");
        assert!(app_state.pending_titles.is_empty());
        assert!(rx.try_recv().is_err());
        return Ok(());
    }

    #[test]
    fn it_only_requests_a_title_after_the_first_exchange() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;
        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi!"))?;
        let _ = to_title_prompt(rx.try_recv().ok())?;

        app_state.submit("Second question")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;
        app_state.handle_assistant_response(reply(&prompt.session_id, "Second answer"))?;

        assert_eq!(app_state.chats.active().messages.len(), 5);
        assert!(rx.try_recv().is_err());
        return Ok(());
    }

    #[test]
    fn it_sends_while_a_title_is_pending() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;
        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi!"))?;
        let _ = to_title_prompt(rx.try_recv().ok())?;

        app_state.submit("Follow up")?;

        assert!(app_state.loading);
        assert!(app_state.pending_titles.contains(&prompt.session_id));
        assert_eq!(to_assistant_prompt(rx.try_recv().ok())?.text, "Follow up");
        return Ok(());
    }

    #[test]
    fn it_routes_replies_to_the_originating_session() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;

        app_state.create_session();
        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi!"))?;

        assert_eq!(app_state.chats.active().messages.len(), 1);
        let origin = app_state.chats.get(1).map(|e| return e.messages.len());
        assert_eq!(origin, Some(3));
        return Ok(());
    }

    #[test]
    fn it_drops_replies_for_deleted_sessions() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.create_session();
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;

        app_state.delete_session(0);
        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi!"))?;

        assert!(!app_state.loading);
        assert_eq!(app_state.chats.len(), 1);
        assert_eq!(app_state.chats.active().messages.len(), 1);
        assert!(app_state.chats.position(&prompt.session_id).is_none());
        assert!(rx.try_recv().is_err());
        return Ok(());
    }
}

mod titles {
    use super::*;

    #[test]
    fn it_applies_titles_by_identity() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;
        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi!"))?;

        app_state.create_session();
        app_state.create_session();
        app_state.handle_title_response(TitleResponse {
            session_id: prompt.session_id.to_string(),
            title: Some("Friendly greeting".to_string()),
        });

        assert!(app_state.pending_titles.is_empty());
        assert_eq!(app_state.chats.active().name, "New Chat");
        let renamed = app_state.chats.get(2).map(|e| return e.name.to_string());
        assert_eq!(renamed, Some("Friendly greeting".to_string()));
        return Ok(());
    }

    #[test]
    fn it_keeps_the_placeholder_when_titling_fails() -> Result<()> {
        let (mut app_state, mut rx, _store) = app_state()?;
        app_state.submit("Hello")?;
        let prompt = to_assistant_prompt(rx.try_recv().ok())?;
        app_state.handle_assistant_response(reply(&prompt.session_id, "Hi!"))?;

        app_state.handle_title_response(TitleResponse {
            session_id: prompt.session_id.to_string(),
            title: None,
        });

        assert!(app_state.pending_titles.is_empty());
        assert_eq!(app_state.chats.active().name, "Hello");
        return Ok(());
    }

    #[test]
    fn it_ignores_titles_for_deleted_sessions() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;
        app_state.pending_titles.insert("gone".to_string());

        app_state.handle_title_response(TitleResponse {
            session_id: "gone".to_string(),
            title: Some("Lost".to_string()),
        });

        assert!(app_state.pending_titles.is_empty());
        assert!(app_state.chats.sessions().iter().all(|e| return e.name != "Lost"));
        return Ok(());
    }
}

mod sessions {
    use super::*;

    fn seeded() -> Result<(AppState, mpsc::UnboundedReceiver<Action>)> {
        let store: StoreBox = Arc::<MemoryStore>::default();
        store.set(SESSIONS_KEY, sessions_fixture())?;
        let (tx, rx) = mpsc::unbounded_channel::<Action>();
        return Ok((AppState::new(store, tx)?, rx));
    }

    #[test]
    fn it_creates_a_session_at_the_top() -> Result<()> {
        let (mut app_state, _rx) = seeded()?;
        assert_eq!(app_state.chats.len(), 2);

        app_state.create_session();

        assert_eq!(app_state.chats.len(), 3);
        assert_eq!(app_state.chats.active_index(), 0);
        assert_eq!(app_state.chats.active().name, "New Chat");
        return Ok(());
    }

    #[test]
    fn it_moves_between_sessions() -> Result<()> {
        let (mut app_state, _rx) = seeded()?;

        app_state.previous_session();
        assert_eq!(app_state.chats.active_index(), 0);

        app_state.next_session();
        assert_eq!(app_state.chats.active_index(), 1);

        app_state.next_session();
        assert_eq!(app_state.chats.active_index(), 1);
        return Ok(());
    }

    #[test]
    fn it_keeps_the_last_session() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;

        app_state.delete_session(0);

        assert_eq!(app_state.chats.len(), 1);
        assert_eq!(
            app_state.status,
            Some("The last chat can't be deleted.".to_string())
        );
        return Ok(());
    }

    #[test]
    fn it_reports_unknown_sessions_in_the_status_line() -> Result<()> {
        let (mut app_state, _rx) = seeded()?;

        app_state.select_session(5);
        assert_eq!(app_state.chats.active_index(), 0);
        assert_eq!(
            app_state.status,
            Some("Session 6 does not exist, there are 2 sessions".to_string())
        );

        app_state.delete_session(5);
        assert_eq!(app_state.chats.len(), 2);
        assert_eq!(app_state.status, Some("Chat 6 does not exist.".to_string()));
        return Ok(());
    }

    #[test]
    fn it_renders_the_active_session() -> Result<()> {
        let (mut app_state, _rx) = seeded()?;
        app_state.set_rect(Rect::new(0, 0, 100, 40));
        let first = app_state.transcript.len();

        app_state.select_session(1);

        assert!(app_state.transcript.len() < first);
        assert_eq!(
            app_state.transcript.as_strings()[1],
            SEED_GREETING.to_string()
        );
        return Ok(());
    }
}

mod commands {
    use super::*;

    #[test]
    fn it_quits() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;
        assert!(app_state.run_command(&command("/quit")?)?);
        assert!(app_state.run_command(&command("/q")?)?);
        assert!(!app_state.run_command(&command("/help")?)?);
        assert!(app_state.show_help);
        return Ok(());
    }

    #[test]
    fn it_manages_sessions() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;

        app_state.run_command(&command("/new")?)?;
        app_state.run_command(&command("/n")?)?;
        assert_eq!(app_state.chats.len(), 3);

        app_state.run_command(&command("/select 3")?)?;
        assert_eq!(app_state.chats.active_index(), 2);

        app_state.run_command(&command("/delete")?)?;
        assert_eq!(app_state.chats.len(), 2);
        assert_eq!(app_state.chats.active_index(), 0);

        app_state.run_command(&command("/d 2")?)?;
        assert_eq!(app_state.chats.len(), 1);
        return Ok(());
    }

    #[test]
    fn it_reports_invalid_arguments() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;

        app_state.run_command(&command("/select")?)?;
        assert_eq!(app_state.status, Some("Usage: /select CHAT_NUMBER".to_string()));

        app_state.run_command(&command("/delete zero")?)?;
        assert_eq!(app_state.status, Some("Usage: /delete [CHAT_NUMBER]".to_string()));

        app_state.run_command(&command("/connect slack abc")?)?;
        assert_eq!(
            app_state.status,
            Some("Usage: /connect APP CREDENTIAL. APP must be one of notion, gmail or trello.".to_string())
        );

        assert_eq!(app_state.chats.active().messages.len(), 1);
        return Ok(());
    }

    #[test]
    fn it_connects_and_disconnects_apps() -> Result<()> {
        let (mut app_state, mut rx, store) = app_state()?;

        app_state.run_command(&command("/connect Notion tok123")?)?;
        assert_eq!(app_state.connections.get(AppKey::Notion), Some("tok123"));
        assert_eq!(store.get(NOTION_TOKEN_KEY)?, Some("tok123".to_string()));
        match rx.try_recv() {
            Ok(Action::PushCredential(token)) => assert_eq!(token, "tok123"),
            _ => bail!("Wrong action"),
        }

        app_state.run_command(&command("/disconnect notion")?)?;
        assert!(!app_state.connections.is_connected(AppKey::Notion));
        assert_eq!(store.get(NOTION_TOKEN_KEY)?, None);
        return Ok(());
    }

    #[test]
    fn it_requires_a_credential() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;

        app_state.run_command(&command("/connect trello")?)?;

        assert!(!app_state.connections.is_connected(AppKey::Trello));
        assert_eq!(
            app_state.status,
            Some("A credential is required to connect Trello.".to_string())
        );
        return Ok(());
    }

    #[test]
    fn it_opens_and_closes_the_apps_dialog() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;

        app_state.run_command(&command("/apps")?)?;
        assert!(app_state.dialog.is_some());

        app_state.handle_dialog_outcome(DialogOutcome::Close)?;
        assert!(app_state.dialog.is_none());
        return Ok(());
    }
}

mod connections {
    use super::*;

    #[test]
    fn it_reconnects_notion_on_restart() -> Result<()> {
        let store: StoreBox = Arc::<MemoryStore>::default();
        {
            let (tx, _rx) = mpsc::unbounded_channel::<Action>();
            let mut app_state = AppState::new(store.clone(), tx)?;
            app_state.handle_dialog_outcome(DialogOutcome::Connect(
                AppKey::Notion,
                "tok123".to_string(),
            ))?;
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let app_state = AppState::new(store, tx)?;

        assert_eq!(app_state.connections.get(AppKey::Notion), Some("tok123"));
        match rx.try_recv() {
            Ok(Action::PushCredential(token)) => assert_eq!(token, "tok123"),
            _ => bail!("Wrong action"),
        }
        return Ok(());
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn it_leaves_the_status_empty_when_healthy() -> Result<()> {
        let (mut app_state, _rx, _store) = app_state()?;
        let assistant = ScriptedAssistant::default();

        app_state.check_backend(&assistant).await;

        assert_eq!(app_state.status, None);
        return Ok(());
    }
}
