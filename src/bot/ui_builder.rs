//! UI Builder module for creating keyboards and formatting messages

use reqwest::Url;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};
use teloxide::utils::html;

use crate::analysis::WordAnalysis;
use crate::localization::{t_args_lang, t_lang};

/// Callback data of the help button
pub const HELP_CALLBACK: &str = "help";
/// Callback data of the back button on the help screen
pub const BACK_TO_MAIN_CALLBACK: &str = "back_to_main";

/// Longest message text Telegram accepts, in characters
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

const ELLIPSIS: char = '…';

/// Button actions the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Help,
    BackToMain,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            HELP_CALLBACK => Some(CallbackAction::Help),
            BACK_TO_MAIN_CALLBACK => Some(CallbackAction::BackToMain),
            _ => None,
        }
    }
}

/// Main menu keyboard: help callback and the word lookup mini-app
pub fn create_main_menu_keyboard(webapp_url: &Url, language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(t_lang("button-help", language_code), HELP_CALLBACK),
        InlineKeyboardButton::web_app(
            t_lang("button-word-lookup", language_code),
            WebAppInfo {
                url: webapp_url.clone(),
            },
        ),
    ]])
}

/// Single back button shown under the help text
pub fn create_back_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        t_lang("button-back", language_code),
        BACK_TO_MAIN_CALLBACK,
    )]])
}

/// Format a word analysis as an HTML message.
///
/// The result always fits in [`TELEGRAM_MESSAGE_LIMIT`]: when it would not,
/// the escaped explanation is shortened first, then the word, then the
/// translation and transcription.
pub fn format_analysis_message(
    word: &str,
    analysis: &WordAnalysis,
    language_code: Option<&str>,
) -> String {
    let mut values = [
        word,
        analysis.transcription.as_str(),
        analysis.translation.as_str(),
        analysis.explanation.as_str(),
    ]
    .map(html::escape);

    let render = |[word, transcription, translation, explanation]: &[String; 4]| {
        let line = |key: &str, value: &str| t_args_lang(key, &[("value", value)], language_code);
        format!(
            "{}\n\n{}\n{}\n{}",
            t_args_lang("analysis-title", &[("word", word.as_str())], language_code),
            line("analysis-transcription", transcription.as_str()),
            line("analysis-translation", translation.as_str()),
            line("analysis-explanation", explanation.as_str()),
        )
    };

    let mut message = render(&values);
    for index in [3, 0, 2, 1] {
        let overflow = message.chars().count().saturating_sub(TELEGRAM_MESSAGE_LIMIT);
        if overflow == 0 {
            break;
        }
        // One extra character makes room for the ellipsis
        let keep = values[index].chars().count().saturating_sub(overflow + 1);
        values[index] = shorten_escaped(&values[index], keep);
        message = render(&values);
    }
    message
}

/// Keep at most `keep` characters of HTML-escaped text, never splitting an
/// entity, and mark the cut with an ellipsis
fn shorten_escaped(text: &str, keep: usize) -> String {
    let mut cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    if let Some(amp) = text[..cut].rfind('&') {
        if !text[amp..cut].contains(';') {
            cut = amp;
        }
    }
    format!("{}{ELLIPSIS}", &text[..cut])
}
