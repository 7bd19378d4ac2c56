//! Atelier is a terminal-first chat client for OpenAI-style generation APIs.
//!
//! Each user turn is dispatched to one of two remote capabilities, chat
//! completion or image generation, and the result is merged back into a
//! single append-only transcript. The crate is organized around a small set
//! of collaborating layers:
//! - [`core`] owns the transcript, the capability router, and the turn
//!   controller state machine that manages the single in-flight request.
//! - [`api`] defines the wire payloads for both endpoints and the transport
//!   boundary that executes a routed request.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that forwards user intents (submit, toggle mode) into the core.
//! - [`auth`] resolves the opaque API credential from the environment.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`]
//! for interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
