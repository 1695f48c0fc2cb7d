//! # Hebrew Tutor Telegram Bot
//!
//! A Telegram bot that greets learners with a spoken Hebrew greeting and
//! explains words picked in its mini-app using a language model.

pub mod analysis;
pub mod bot;
pub mod config;
pub mod errors;
pub mod greeting;
pub mod localization;
pub mod speech;
