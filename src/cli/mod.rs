//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands.

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::core::constants::{DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL};
use crate::ui::chat_loop::{run_chat, ChatOptions};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "A terminal chat interface with text and image generation modes")]
#[command(
    long_about = "Atelier is a full-screen terminal chat interface that connects to \
OpenAI-style APIs. Each message is answered either by the chat-completion endpoint or, \
in image mode, by the image-generation endpoint.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    Your API key (required)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\
  ATELIER_LOG       Append diagnostic logging to this file (optional)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Ctrl+G            Switch between text and image mode\n\
  Ctrl+T            Switch between dark and light theme\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat model to use
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Image generation model to use
    #[arg(long, global = true, value_name = "MODEL")]
    pub image_model: Option<String>,

    /// Start in image generation mode
    #[arg(long, global = true)]
    pub image: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: String,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

/// Pick the session's models from CLI flags, config defaults, and the
/// built-in fallbacks, in that order.
pub fn resolve_models(
    cli_model: Option<String>,
    cli_image_model: Option<String>,
    config: &Config,
) -> (String, String) {
    let chat_model = cli_model
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
    let image_model = cli_image_model
        .or_else(|| config.default_image_model.clone())
        .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
    (chat_model, image_model)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            run_chat(ChatOptions {
                model: args.model,
                image_model: args.image_model,
                start_in_image_mode: args.image,
            })
            .await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "default-model" => config.default_model = Some(value.clone()),
                "default-image-model" => config.default_image_model = Some(value.clone()),
                "theme" => config.theme = Some(value.clone()),
                _ => {
                    eprintln!("Unknown config key: {key}");
                    std::process::exit(1);
                }
            }
            config.save()?;
            println!("Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "default-model" => config.default_model = None,
                "default-image-model" => config.default_image_model = None,
                "theme" => config.theme = None,
                _ => {
                    eprintln!("Unknown config key: {key}");
                    std::process::exit(1);
                }
            }
            config.save()?;
            println!("Unset {key}");
            Ok(())
        }
    }
}

/// Diagnostic logging goes to a file, never to the terminal the UI owns.
/// Enabled only when `ATELIER_LOG` names a path; `RUST_LOG` filters as
/// usual.
fn init_tracing() {
    let Ok(path) = std::env::var("ATELIER_LOG") else {
        return;
    };

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            eprintln!("Warning: could not open log file {path}: {e}");
        }
    }
}
