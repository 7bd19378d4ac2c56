//! Frame rendering.
//!
//! Everything drawn here is a function of the controller's observable
//! state (transcript, request state, capability mode) plus the UI-owned
//! input line and scroll position. Nothing in this module writes back into
//! the controller.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::dispatch::Mode;
use crate::core::message::TranscriptRole;
use crate::core::turn::RequestState;
use crate::ui::chat_loop::App;

/// Rows taken by the bordered input box at the bottom of the screen.
pub const INPUT_AREA_HEIGHT: u16 = 3;

/// Rows of the transcript viewport for a terminal of the given height
/// (input box plus the one-row title).
pub fn transcript_viewport_height(terminal_height: u16) -> u16 {
    terminal_height
        .saturating_sub(INPUT_AREA_HEIGHT)
        .saturating_sub(1)
}

pub fn max_scroll_offset(total_lines: u16, viewport_height: u16) -> u16 {
    total_lines.saturating_sub(viewport_height)
}

fn waiting_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Text => "Waiting for reply...",
        Mode::Image => "Generating image...",
    }
}

fn input_title(mode: Mode) -> String {
    format!(
        "Type your message ({} mode; Enter to send, Ctrl+G to switch, Ctrl+C to quit)",
        mode.label()
    )
}

pub fn build_display_lines(app: &App) -> Vec<Line<'_>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    for entry in app.controller.entries() {
        match entry.role {
            TranscriptRole::System => {
                lines.push(Line::from(Span::styled(
                    entry.content.as_str(),
                    theme.system_text_style,
                )));
                lines.push(Line::from(""));
            }
            TranscriptRole::User => {
                lines.push(Line::from(vec![
                    Span::styled("You: ", theme.user_prefix_style),
                    Span::styled(entry.content.as_str(), theme.user_text_style),
                ]));
                lines.push(Line::from(""));
            }
            TranscriptRole::Assistant => {
                for content_line in entry.content.lines() {
                    if content_line.trim().is_empty() {
                        lines.push(Line::from(""));
                    } else {
                        lines.push(Line::from(Span::styled(
                            content_line,
                            theme.assistant_text_style,
                        )));
                    }
                }
                if let Some(url) = &entry.image_url {
                    lines.push(Line::from(Span::styled(
                        url.as_str(),
                        theme.image_url_style,
                    )));
                }
                lines.push(Line::from(""));
            }
        }
    }

    match app.controller.state() {
        RequestState::InFlight => {
            lines.push(Line::from(Span::styled(
                waiting_label(app.controller.mode()),
                theme.waiting_indicator_style,
            )));
        }
        RequestState::Failed(message) => {
            lines.push(Line::from(Span::styled(
                format!("Error: {message}"),
                theme.error_text_style,
            )));
        }
        RequestState::Idle => {}
    }

    lines
}

pub fn ui(f: &mut Frame, app: &App) {
    let theme = &app.theme;

    f.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(theme.background_color)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(INPUT_AREA_HEIGHT)])
        .split(f.area());

    let lines = build_display_lines(app);
    let viewport_height = chunks[0].height.saturating_sub(1);
    let max_offset = max_scroll_offset(lines.len() as u16, viewport_height);
    let scroll_offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(Span::styled("Chat - Atelier", theme.title_style)))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, chunks[0]);

    let input = Paragraph::new(app.input.as_str())
        .style(theme.input_text_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style)
                .title(Span::styled(
                    input_title(app.controller.mode()),
                    theme.input_title_style,
                )),
        );
    f.render_widget(input, chunks[1]);

    let cursor_x = chunks[1].x + 1 + app.input.width() as u16;
    f.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::dispatch::RoutingConfig;
    use crate::core::message::Message;
    use crate::core::turn::TurnController;
    use crate::ui::theme::Theme;

    fn test_app() -> App {
        App {
            controller: TurnController::new(
                RoutingConfig {
                    base_url: "https://api.example.test/v1".to_string(),
                    chat_model: "gpt-4".to_string(),
                    image_model: "dall-e-3".to_string(),
                },
                "You are a helpful assistant.",
            ),
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            theme: Theme::dark_default(),
            theme_name: "dark".to_string(),
            config: Config::default(),
        }
    }

    fn rendered_text(app: &App) -> Vec<String> {
        build_display_lines(app)
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn user_entries_carry_a_prefix_and_system_prompt_leads() {
        let mut app = test_app();
        app.controller.submit("hello").unwrap();
        app.controller.finish_turn(Message::assistant("hi"));

        let text = rendered_text(&app);
        assert_eq!(text[0], "You are a helpful assistant.");
        assert!(text.contains(&"You: hello".to_string()));
        assert!(text.contains(&"hi".to_string()));
    }

    #[test]
    fn image_entries_render_their_url_on_its_own_line() {
        let mut app = test_app();
        app.controller.toggle_mode();
        app.controller.submit("a cat").unwrap();
        app.controller
            .finish_turn(Message::assistant_image("a cat", "https://x/img.png"));

        let text = rendered_text(&app);
        assert!(text.contains(&"a cat".to_string()));
        assert!(text.contains(&"https://x/img.png".to_string()));
    }

    #[test]
    fn in_flight_state_shows_a_waiting_line() {
        let mut app = test_app();
        app.controller.submit("hello").unwrap();

        let text = rendered_text(&app);
        assert_eq!(text.last().unwrap(), "Waiting for reply...");
    }

    #[test]
    fn failure_is_rendered_adjacent_to_the_transcript() {
        let mut app = test_app();
        app.controller.submit("hello").unwrap();
        app.controller
            .fail_turn("request failed with status 500".to_string());

        let text = rendered_text(&app);
        assert_eq!(
            text.last().unwrap(),
            "Error: request failed with status 500"
        );
        // The dangling user entry is still on screen.
        assert!(text.contains(&"You: hello".to_string()));
    }

    #[test]
    fn scroll_math_clamps_at_the_bottom() {
        assert_eq!(max_scroll_offset(10, 4), 6);
        assert_eq!(max_scroll_offset(3, 4), 0);
        assert_eq!(transcript_viewport_height(24), 20);
    }
}
