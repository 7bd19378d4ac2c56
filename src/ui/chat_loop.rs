//! Main chat event loop.
//!
//! Terminal setup and teardown, keyboard and mouse handling, and the drain
//! of turn outcomes back into the controller. The loop polls for input,
//! redraws, and never blocks on the network: in-flight requests live on
//! their own task and report back over the turn service channel.

use std::{error::Error, io, sync::Arc, time::Duration};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::client::{HttpTransport, Transport};
use crate::auth::{self, Credentials};
use crate::cli::resolve_models;
use crate::core::config::Config;
use crate::core::constants::DEFAULT_SYSTEM_PROMPT;
use crate::core::dispatch::RoutingConfig;
use crate::core::turn::TurnController;
use crate::core::turn_service::{TurnOutcome, TurnParams, TurnService};
use crate::ui::appearance::{detect_preferred_appearance, Appearance};
use crate::ui::renderer::{
    build_display_lines, max_scroll_offset, transcript_viewport_height, ui,
};
use crate::ui::theme::Theme;
use crate::utils::input::sanitize_line;

pub struct ChatOptions {
    pub model: Option<String>,
    pub image_model: Option<String>,
    pub start_in_image_mode: bool,
}

/// Everything the render layer observes: the controller plus UI-owned
/// bookkeeping (input line, scroll position, theme).
pub struct App {
    pub controller: TurnController,
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub theme: Theme,
    pub theme_name: String,
    pub config: Config,
}

fn resolve_theme_name(config: &Config) -> String {
    config.theme.clone().unwrap_or_else(|| {
        match detect_preferred_appearance() {
            Some(Appearance::Light) => "light",
            _ => "dark",
        }
        .to_string()
    })
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    // Resolve credentials before touching the terminal so a missing key
    // prints a readable error instead of flashing the alternate screen.
    let env_session = auth::resolve_env()?;

    let (chat_model, image_model) = resolve_models(options.model, options.image_model, &config);
    let routing = RoutingConfig {
        base_url: env_session.base_url,
        chat_model,
        image_model,
    };

    let mut controller = TurnController::new(routing, DEFAULT_SYSTEM_PROMPT);
    if options.start_in_image_mode {
        controller.toggle_mode();
    }

    let theme_name = resolve_theme_name(&config);
    let mut app = App {
        controller,
        input: String::new(),
        scroll_offset: 0,
        auto_scroll: true,
        theme: Theme::from_name(&theme_name),
        theme_name,
        config,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (service, outcome_rx) = TurnService::new();
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &service,
        outcome_rx,
        transport,
        env_session.credentials,
    )
    .await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    service: &TurnService,
    mut outcome_rx: mpsc::UnboundedReceiver<(TurnOutcome, u64)>,
    transport: Arc<dyn Transport>,
    credentials: Credentials,
) -> Result<(), Box<dyn Error>> {
    let mut turn_seq: u64 = 0;

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                    match key.code {
                        KeyCode::Char('c') if ctrl => return Ok(()),
                        KeyCode::Char('g') if ctrl => {
                            app.controller.toggle_mode();
                        }
                        KeyCode::Char('t') if ctrl => toggle_theme(app),
                        KeyCode::Enter => {
                            submit_input(app, service, &transport, &credentials, &mut turn_seq);
                        }
                        KeyCode::Backspace => {
                            app.input.pop();
                        }
                        KeyCode::Char(c) if !ctrl => {
                            if !c.is_control() {
                                app.input.push(c);
                            }
                        }
                        KeyCode::Up => scroll_by(app, terminal, -1),
                        KeyCode::Down => scroll_by(app, terminal, 1),
                        KeyCode::PageUp => {
                            let page = current_viewport_height(terminal) as i32;
                            scroll_by(app, terminal, -page);
                        }
                        KeyCode::PageDown => {
                            let page = current_viewport_height(terminal) as i32;
                            scroll_by(app, terminal, page);
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll_by(app, terminal, -3),
                    MouseEventKind::ScrollDown => scroll_by(app, terminal, 3),
                    _ => {}
                },
                _ => {}
            }
        }

        while let Ok((outcome, turn_id)) = outcome_rx.try_recv() {
            if turn_id != turn_seq {
                debug!(turn_id, "dropping outcome for superseded turn");
                continue;
            }
            match outcome {
                TurnOutcome::Completed(entry) => app.controller.finish_turn(entry),
                TurnOutcome::Failed(message) => app.controller.fail_turn(message),
            }
            app.auto_scroll = true;
        }
    }
}

fn submit_input(
    app: &mut App,
    service: &TurnService,
    transport: &Arc<dyn Transport>,
    credentials: &Credentials,
    turn_seq: &mut u64,
) {
    let text = sanitize_line(&app.input);
    let Some(descriptor) = app.controller.submit(&text) else {
        // Rejected submissions (blank input, request already in flight)
        // leave the input line untouched.
        return;
    };

    app.input.clear();
    app.auto_scroll = true;
    *turn_seq += 1;
    service.spawn_turn(TurnParams {
        transport: Arc::clone(transport),
        credentials: credentials.clone(),
        descriptor,
        turn_id: *turn_seq,
    });
}

fn toggle_theme(app: &mut App) {
    let next = if app.theme_name.eq_ignore_ascii_case("light") {
        "dark"
    } else {
        "light"
    };
    app.theme_name = next.to_string();
    app.theme = Theme::from_name(next);

    app.config.theme = Some(next.to_string());
    if let Err(e) = app.config.save() {
        warn!("could not persist theme preference: {e}");
    }
}

fn current_viewport_height(terminal: &Terminal<CrosstermBackend<io::Stdout>>) -> u16 {
    let height = terminal.size().map(|size| size.height).unwrap_or_default();
    transcript_viewport_height(height)
}

/// Manual scrolling. Scrolling up detaches from the live bottom; reaching
/// the bottom again re-engages auto-scroll.
fn scroll_by(app: &mut App, terminal: &Terminal<CrosstermBackend<io::Stdout>>, delta: i32) {
    let viewport_height = current_viewport_height(terminal);
    let total_lines = build_display_lines(app).len() as u16;
    let max_offset = max_scroll_offset(total_lines, viewport_height);

    let current = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let next = (i32::from(current) + delta).clamp(0, i32::from(max_offset)) as u16;
    app.scroll_offset = next;
    app.auto_scroll = next >= max_offset;
}
