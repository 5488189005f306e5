use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
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
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::AppKey;
use crate::domain::models::AssistantBox;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::SlashCommand;
use crate::domain::models::StoreBox;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::help_text;
use crate::domain::services::AppState;

/// Width of the session sidebar, in columns.
const SIDEBAR_WIDTH: u16 = 30;

fn render_sidebar<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let items = app_state
        .chats
        .sessions()
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let mut name = session.name.to_string();
            if app_state.pending_titles.contains(&session.id) {
                name = format!("{name} *");
            }
            return ListItem::new(format!("{}. {name}", idx + 1));
        })
        .collect::<Vec<ListItem>>();

    let mut list_state = ListState::default();
    list_state.select(Some(app_state.chats.active_index()));

    frame.render_stateful_widget(
        List::new(items)
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .title("Chats")
                    .padding(Padding::new(1, 1, 0, 0)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        rect,
        &mut list_state,
    );
}

fn render_status<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let connected = AppKey::iter()
        .filter(|app| return app_state.connections.is_connected(*app))
        .map(|app| return app.display_name())
        .collect::<Vec<&str>>();

    let mut text = format!("Solendir · {}", app_state.chats.active().name);
    if !connected.is_empty() {
        text = format!("{text} · Connected: {}", connected.join(", "));
    }

    let mut style = Style::default().add_modifier(Modifier::BOLD);
    if let Some(status) = &app_state.status {
        text = status.to_string();
        style = style.fg(Color::Yellow);
    }

    frame.render_widget(Paragraph::new(text).style(style), rect);
}

fn render_help<B: Backend>(frame: &mut Frame<B>, rect: Rect) {
    let area = rect.inner(&Margin {
        vertical: 2,
        horizontal: 4,
    });

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(help_text())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .title("Help (Esc to close)")
                    .padding(Padding::new(1, 1, 0, 0)),
            )
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn paste(textarea: &mut tui_textarea::TextArea, text: &str) {
    for char in text.chars() {
        let mut key = Key::Char(char);
        if char == '\n' {
            key = Key::Enter;
        }
        textarea.input(Input {
            key,
            ctrl: false,
            alt: false,
        });
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let loading = Loading::default();

    #[cfg(feature = "dev")]
    paste(
        &mut textarea,
        "Summarize what you can do for me in three bullet points.",
    );

    loop {
        terminal.draw(|frame| {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(frame.size());

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Max(4),
                ])
                .split(columns[1]);

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            render_sidebar(frame, columns[0], app_state);
            render_status(frame, layout[0], app_state);

            app_state
                .transcript
                .render(frame, layout[1], app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[1].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );

            if app_state.loading {
                loading.render(frame, layout[2]);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }

            let area = frame.size();
            if let Some(dialog) = &app_state.dialog {
                dialog.render(frame, area, &app_state.connections);
            } else if app_state.show_help {
                render_help(frame, area);
            }
        })?;

        let event = events.next().await?;

        if let Some(dialog) = app_state.dialog.as_mut() {
            let outcome = match event {
                Event::KeyboardCTRLC() => break,
                Event::KeyboardEsc() => dialog.back(),
                Event::KeyboardEnter() => dialog.enter(&app_state.connections),
                Event::UIScrollUp() => {
                    dialog.up();
                    continue;
                }
                Event::UIScrollDown() => {
                    dialog.down();
                    continue;
                }
                Event::KeyboardCharInput(input) => dialog.key(input),
                Event::KeyboardPaste(text) => {
                    dialog.paste(&text);
                    continue;
                }
                Event::AssistantResponse(response) => {
                    app_state.handle_assistant_response(response)?;
                    continue;
                }
                Event::TitleResponse(response) => {
                    app_state.handle_title_response(response);
                    continue;
                }
                _ => continue,
            };

            app_state.handle_dialog_outcome(outcome)?;
            continue;
        }

        match event {
            Event::AssistantResponse(response) => {
                app_state.handle_assistant_response(response)?;
            }
            Event::TitleResponse(response) => {
                app_state.handle_title_response(response);
            }
            Event::KeyboardAltUp() => {
                app_state.previous_session();
            }
            Event::KeyboardAltDown() => {
                app_state.next_session();
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLN() => {
                app_state.create_session();
            }
            Event::KeyboardCTRLO() => {
                app_state.open_dialog();
            }
            Event::KeyboardCTRLX() => {
                app_state.delete_session(app_state.chats.active_index());
            }
            Event::KeyboardEsc() => {
                app_state.show_help = false;
                app_state.status = None;
            }
            Event::KeyboardEnter() => {
                if app_state.loading {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() {
                    continue;
                }

                textarea = TextArea::default();
                app_state.status = None;

                if let Some(command) = SlashCommand::parse(&input_str) {
                    if app_state.run_command(&command)? {
                        break;
                    }
                    continue;
                }

                app_state.submit(&input_str)?;
            }
            Event::KeyboardCharInput(input) => {
                if !app_state.loading {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                if !app_state.loading {
                    paste(&mut textarea, &text);
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    store: StoreBox,
    assistant: AssistantBox,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(store, tx)?;
    app_state.check_backend(assistant.as_ref()).await;

    let session_id = Config::get(ConfigKey::SessionID);
    if !session_id.is_empty() {
        if let Some(idx) = app_state.chats.position(&session_id) {
            app_state.select_session(idx);
        }
    }

    let mut events = EventsService::new(rx);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, &mut events).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
