//! Scripted conversation copy and the fixed-id bubbles it produces.

use crate::message::{AccountMode, Message, MessageBody, SearchResult};

pub const GET_STARTED: &str = "Get Started";
pub const GREETING_PROMPT: &str = "Let's set up your account. Choose an option:";
pub const ACCOUNT_CREATED: &str = "✅ Account created — welcome!";
pub const PHOTOS_PROMPT: &str = "Now let me access your photos to get started.";
pub const START_SEARCHING: &str = "Start Searching →";
pub const SEARCH_GREETING: &str = "Your photos are ready! What would you like to search for?";
pub const UPLOAD_FAILED: &str = "⚠️ Upload failed. Your selection is kept — try again.";

/// The session-start user bubble.
pub fn initial_message() -> Message {
    Message::with_id("initial-1", MessageBody::User {
        text: GET_STARTED.to_string(),
    })
}

pub fn greeting_prompt() -> Message {
    Message::with_id("assistant-2", MessageBody::Assistant {
        text: GREETING_PROMPT.to_string(),
    })
}

pub fn account_choice() -> Message {
    Message::with_id("choice-3", MessageBody::AccountChoice)
}

/// User echo for the picked account mode.
pub fn choice_echo(mode: AccountMode) -> Message {
    let text = match mode {
        AccountMode::Create => "Create Account",
        AccountMode::Login => "Log In",
    };
    Message::with_id("user-choice-4", MessageBody::User {
        text: text.to_string(),
    })
}

pub fn account_form(mode: AccountMode) -> Message {
    Message::with_id("form-5", MessageBody::AccountForm { mode })
}

/// User echo for a submitted account form.
pub fn form_echo(email: &str) -> Message {
    Message::with_id("user-form-6", MessageBody::User {
        text: format!("Account created with {email}"),
    })
}

pub fn account_created() -> Message {
    Message::with_id("assistant-8", MessageBody::Assistant {
        text: ACCOUNT_CREATED.to_string(),
    })
}

pub fn photos_prompt() -> Message {
    Message::with_id("assistant-9", MessageBody::Assistant {
        text: PHOTOS_PROMPT.to_string(),
    })
}

pub fn thumbnails() -> Message {
    Message::with_id("thumbnails-10", MessageBody::Thumbnails)
}

pub fn progress(upload_total: u32) -> Message {
    Message::with_id("progress-11", MessageBody::Progress { upload_total })
}

/// Post-upload summary, e.g. "Uploaded 12 photos • saved 27.6 MB. 👍🏼".
pub fn upload_summary(total_files: u32, total_size_mb: f64) -> Message {
    Message::with_id("assistant-12", MessageBody::Assistant {
        text: format!("Uploaded {total_files} photos • saved {total_size_mb:.1} MB. 👍🏼"),
    })
}

pub fn start_searching_button() -> Message {
    Message::with_id("action-13", MessageBody::ActionButton {
        text: START_SEARCHING.to_string(),
    })
}

pub fn search_greeting() -> Message {
    Message::with_id("search-1", MessageBody::Assistant {
        text: SEARCH_GREETING.to_string(),
    })
}

pub fn upload_failed() -> Message {
    Message::assistant(UPLOAD_FAILED)
}

pub fn results(results: Vec<SearchResult>) -> Message {
    Message::new(MessageBody::Results { results })
}
