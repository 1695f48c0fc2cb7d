//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `command_handler`: Handles the `/start` command
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `web_app_handler`: Handles data sent back by the word lookup mini-app
//! - `ui_builder`: Creates keyboards and formats messages
//! - `outbox`: Outbound Telegram operations behind a trait

pub mod callback_handler;
pub mod command_handler;
pub mod outbox;
pub mod ui_builder;
pub mod web_app_handler;

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::analysis::WordAnalyzer;
use crate::config::BotConfig;
use crate::greeting::GreetingSender;

// Re-export the dispatcher endpoints
pub use callback_handler::callback_handler;
pub use command_handler::start_handler;
pub use web_app_handler::web_app_handler;

/// Everything a handler needs, passed explicitly through the dispatcher
pub struct BotContext {
    pub config: Arc<BotConfig>,
    pub greeter: GreetingSender,
    pub analyzer: WordAnalyzer,
}

impl BotContext {
    pub fn new(config: Arc<BotConfig>, greeter: GreetingSender, analyzer: WordAnalyzer) -> Self {
        Self {
            config,
            greeter,
            analyzer,
        }
    }
}

/// Messages routed to the `/start` flow
pub fn is_start_message(msg: &Message) -> bool {
    msg.text().is_some_and(command_handler::is_start_command)
}

/// Messages carrying data sent back by the mini-app
pub fn is_web_app_message(msg: &Message) -> bool {
    msg.web_app_data().is_some()
}

/// Update routing: `/start`, mini-app data, and button presses
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let start = Update::filter_message()
        .filter(|msg: Message| is_start_message(&msg))
        .endpoint(start_handler);

    let web_app = Update::filter_message()
        .filter(|msg: Message| is_web_app_message(&msg))
        .endpoint(web_app_handler);

    let callbacks = Update::filter_callback_query().endpoint(callback_handler);

    dptree::entry()
        .branch(start)
        .branch(web_app)
        .branch(callbacks)
}
