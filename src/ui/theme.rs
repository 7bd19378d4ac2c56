use ratatui::style::{Color, Modifier, Style};

/// Style bundle for everything the chat screen draws. Two built-in
/// palettes; the active one is chosen by name from config or from the OS
/// appearance hint.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,

    // Chat message styles
    pub system_text_style: Style,
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub image_url_style: Style,

    // Status lines
    pub waiting_indicator_style: Style,
    pub error_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            system_text_style: Style::default().fg(Color::DarkGray),
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            image_url_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),
            waiting_indicator_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            error_text_style: Style::default().fg(Color::Red),
            title_style: Style::default().fg(Color::Gray),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            system_text_style: Style::default().fg(Color::Gray),
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            image_url_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::UNDERLINED),
            waiting_indicator_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            error_text_style: Style::default().fg(Color::Red),
            title_style: Style::default().fg(Color::DarkGray),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
        }
    }

    /// Unknown names fall back to the dark palette.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("light") {
            Theme::light()
        } else {
            Theme::dark_default()
        }
    }
}
