#[cfg(test)]
#[path = "connect_dialog_test.rs"]
mod tests;

use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use strum::IntoEnumIterator;
use tui_textarea::Input;
use tui_textarea::Key;

use super::Connections;
use crate::domain::models::AppKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogStage {
    Picking,
    Entering(AppKey),
    Viewing(AppKey),
}

#[derive(Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    Close,
    Connect(AppKey, String),
    Disconnect(AppKey),
    Pending,
}

/// The apps dialog: pick an app, then either enter a credential for it or
/// review and drop the one already held.
pub struct ConnectDialog {
    pub stage: DialogStage,
    pub selected: usize,
    pub input: String,
}

impl Default for ConnectDialog {
    fn default() -> ConnectDialog {
        return ConnectDialog {
            stage: DialogStage::Picking,
            selected: 0,
            input: "".to_string(),
        };
    }
}

impl ConnectDialog {
    fn apps() -> Vec<AppKey> {
        return AppKey::iter().collect();
    }

    pub fn selected_app(&self) -> AppKey {
        let apps = ConnectDialog::apps();
        return apps[self.selected.min(apps.len() - 1)];
    }

    pub fn up(&mut self) {
        if self.stage == DialogStage::Picking {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    pub fn down(&mut self) {
        if self.stage == DialogStage::Picking {
            self.selected = (self.selected + 1).min(ConnectDialog::apps().len() - 1);
        }
    }

    pub fn enter(&mut self, connections: &Connections) -> DialogOutcome {
        match self.stage {
            DialogStage::Picking => {
                let app = self.selected_app();
                self.input = "".to_string();
                if connections.is_connected(app) {
                    self.stage = DialogStage::Viewing(app);
                } else {
                    self.stage = DialogStage::Entering(app);
                }
                return DialogOutcome::Pending;
            }
            DialogStage::Entering(app) => {
                let credential = self.input.trim().to_string();
                if credential.is_empty() {
                    return DialogOutcome::Pending;
                }

                self.input = "".to_string();
                self.stage = DialogStage::Viewing(app);
                return DialogOutcome::Connect(app, credential);
            }
            DialogStage::Viewing(_) => return DialogOutcome::Pending,
        }
    }

    /// Steps back one stage, closing the dialog from the app list.
    pub fn back(&mut self) -> DialogOutcome {
        if self.stage == DialogStage::Picking {
            return DialogOutcome::Close;
        }

        self.input = "".to_string();
        self.stage = DialogStage::Picking;
        return DialogOutcome::Pending;
    }

    pub fn key(&mut self, input: Input) -> DialogOutcome {
        match (self.stage, input) {
            (
                DialogStage::Viewing(app),
                Input {
                    key: Key::Char('d'),
                    ctrl: false,
                    alt: false,
                },
            ) => {
                self.stage = DialogStage::Picking;
                return DialogOutcome::Disconnect(app);
            }
            (
                DialogStage::Entering(_),
                Input {
                    key: Key::Char(c),
                    ctrl: false,
                    alt: false,
                },
            ) => {
                self.input.push(c);
            }
            (
                DialogStage::Entering(_),
                Input {
                    key: Key::Backspace,
                    ..
                },
            ) => {
                self.input.pop();
            }
            _ => (),
        }

        return DialogOutcome::Pending;
    }

    pub fn paste(&mut self, text: &str) {
        if let DialogStage::Entering(_) = self.stage {
            self.input.push_str(text.trim());
        }
    }

    fn area(rect: Rect) -> Rect {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Percentage(30),
                Constraint::Length(9),
                Constraint::Min(0),
            ])
            .split(rect);

        return Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .split(vertical[1])[1];
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, connections: &Connections) {
        let area = ConnectDialog::area(rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .padding(Padding::new(1, 1, 0, 0));

        frame.render_widget(Clear, area);

        match self.stage {
            DialogStage::Picking => {
                let items = ConnectDialog::apps()
                    .into_iter()
                    .map(|app| {
                        let mut state = "not connected";
                        if connections.is_connected(app) {
                            state = "connected";
                        }
                        return ListItem::new(format!("{} ({state})", app.display_name()));
                    })
                    .collect::<Vec<ListItem>>();

                let mut list_state = ListState::default();
                list_state.select(Some(self.selected));
                frame.render_stateful_widget(
                    List::new(items)
                        .block(block.title("Apps (Enter to open, Esc to close)"))
                        .highlight_symbol("> ")
                        .highlight_style(Style::default().add_modifier(Modifier::BOLD)),
                    area,
                    &mut list_state,
                );
            }
            DialogStage::Entering(app) => {
                let text = format!(
                    "Paste your {} credential and press Enter.\n\n{}",
                    app.display_name(),
                    self.input
                );
                frame.render_widget(
                    Paragraph::new(text)
                        .block(block.title(format!("Connect {}", app.display_name())))
                        .wrap(Wrap { trim: false }),
                    area,
                );
            }
            DialogStage::Viewing(app) => {
                let credential = connections.get(app).unwrap_or_default();
                let text = format!("Credential: {credential}\n\nPress d to disconnect, Esc to go back.");
                frame.render_widget(
                    Paragraph::new(text)
                        .block(block.title(format!("{} is connected", app.display_name())))
                        .wrap(Wrap { trim: false }),
                    area,
                );
            }
        }
    }
}
