#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::TitleGenerator;
use crate::domain::models::Action;
use crate::domain::models::AssistantBox;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Event;
use crate::domain::models::TitlePrompt;
use crate::domain::models::TitleResponse;

async fn assistant_request(
    assistant: AssistantBox,
    prompt: AssistantPrompt,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::debug!(session_id = %prompt.session_id, "Asking assistant");
    let result = assistant.ask(&prompt.text).await;

    tx.send(Event::AssistantResponse(AssistantResponse {
        session_id: prompt.session_id,
        result,
    }))?;

    return Ok(());
}

async fn title_request(
    assistant: AssistantBox,
    prompt: TitlePrompt,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::debug!(session_id = %prompt.session_id, "Requesting title");
    let title = match TitleGenerator::summarize(assistant.as_ref(), &prompt.exchange).await {
        Ok(title) => Some(title),
        Err(err) => {
            tracing::warn!(session_id = %prompt.session_id, error = %err, "Title request failed");
            None
        }
    };

    tx.send(Event::TitleResponse(TitleResponse {
        session_id: prompt.session_id,
        title,
    }))?;

    return Ok(());
}

async fn push_credential(assistant: AssistantBox, token: String) -> Result<()> {
    if let Err(err) = assistant.configure_notion(&token).await {
        tracing::warn!(error = ?err, "Failed to push Notion credential to the backend");
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs network work for actions sent by the UI until the action channel
    /// closes, then waits for in-flight workers. Results come back as events.
    pub async fn start(
        assistant: AssistantBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut workers: JoinSet<Result<()>> = JoinSet::new();

        loop {
            tokio::select! {
                action = rx.recv() => {
                    let action = match action {
                        Some(action) => action,
                        None => break,
                    };
                    ActionsService::spawn(&mut workers, &assistant, &tx, action);
                },
                Some(res) = workers.join_next(), if !workers.is_empty() => {
                    ActionsService::reap(res);
                }
            }
        }

        while let Some(res) = workers.join_next().await {
            ActionsService::reap(res);
        }

        return Ok(());
    }

    fn spawn(
        workers: &mut JoinSet<Result<()>>,
        assistant: &AssistantBox,
        tx: &mpsc::UnboundedSender<Event>,
        action: Action,
    ) {
        let assistant = assistant.clone();
        let worker_tx = tx.clone();

        match action {
            Action::AssistantRequest(prompt) => {
                workers.spawn(assistant_request(assistant, prompt, worker_tx));
            }
            Action::TitleRequest(prompt) => {
                workers.spawn(title_request(assistant, prompt, worker_tx));
            }
            Action::PushCredential(token) => {
                workers.spawn(push_credential(assistant, token));
            }
        }
    }

    fn reap(res: Result<Result<()>, tokio::task::JoinError>) {
        match res {
            Ok(Ok(())) => (),
            Ok(Err(err)) => tracing::debug!(error = ?err, "Worker finished without a listener"),
            Err(err) => tracing::error!(error = ?err, "Worker panicked"),
        }
    }
}
