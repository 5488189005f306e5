#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::domain::models::Message;
use crate::domain::models::Role;

/// Share of the transcript width a single message may take.
const MESSAGE_WIDTH_PERCENTAGE: f32 = 0.8;

/// Rendered lines of the active session. Assistant messages hug the left
/// edge, user messages the right.
#[derive(Default)]
pub struct Transcript {
    lines: Vec<Line<'static>>,
}

fn pad_for(alignment_width: usize, text: &str) -> String {
    return " ".repeat(alignment_width.saturating_sub(text.chars().count()));
}

impl Transcript {
    fn header(message: &Message) -> String {
        let time = message.time_label();
        if time.is_empty() {
            return message.role.display_name();
        }

        return format!("{} · {time}", message.role.display_name());
    }

    fn message_lines(message: &Message, line_width: usize) -> Vec<Line<'static>> {
        let max_width = ((line_width as f32) * MESSAGE_WIDTH_PERCENTAGE).floor() as usize;
        let header = Transcript::header(message);
        let body = message.as_string_lines(max_width.max(1));

        let mut header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        if message.role == Role::User {
            header_style = header_style.fg(Color::Green);
        }

        if message.role == Role::Assistant {
            let mut lines = vec![Line::from(Span::styled(header, header_style))];
            lines.extend(body.into_iter().map(|e| return Line::from(e)));
            return lines;
        }

        let mut lines = vec![Line::from(vec![
            Span::from(pad_for(line_width, &header)),
            Span::styled(header, header_style),
        ])];
        lines.extend(body.into_iter().map(|e| {
            return Line::from(format!("{}{e}", pad_for(line_width, &e)));
        }));
        return lines;
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        self.lines = messages
            .iter()
            .enumerate()
            .flat_map(|(idx, message)| {
                let mut lines = Transcript::message_lines(message, line_width);
                if idx < messages.len() - 1 {
                    lines.push(Line::from(""));
                }
                return lines;
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    /// Plain text of each rendered line.
    #[cfg(test)]
    pub fn as_strings(&self) -> Vec<String> {
        return self
            .lines
            .iter()
            .map(|line| {
                return line
                    .spans
                    .iter()
                    .map(|span| return span.content.to_string())
                    .collect::<String>();
            })
            .collect();
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        frame.render_widget(
            Paragraph::new(self.lines.clone())
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
