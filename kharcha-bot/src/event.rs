//! The chat-platform boundary, decoupled from any specific SDK.
//!
//! Inbound events arrive either as structured slash commands with named
//! parameters or as plain one-to-one messages. Outbound replies are plain
//! text or a titled card; logging confirmations and errors are marked
//! ephemeral (visible only to the requester).

/// A structured command with named parameters, as registered on the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    /// `/ex amount item category`
    Log {
        amount: f64,
        item: String,
        category: String,
    },
    /// `/summary`
    SummaryToday,
    /// `/summary_week`
    SummaryWeek,
    /// `/summary_month`
    SummaryMonth,
    /// Fallback branch for anything the dispatch table doesn't know.
    Unknown(String),
}

/// One inbound chat event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Slash(SlashCommand),
    /// Plain message in a direct conversation (free-text logging mode).
    Direct { text: String },
}

/// One outbound reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text { body: String, ephemeral: bool },
    Card {
        title: String,
        body: String,
        footer: String,
    },
}

impl Reply {
    /// Confirmation or error visible only to the requester.
    pub fn ephemeral(body: impl Into<String>) -> Self {
        Reply::Text {
            body: body.into(),
            ephemeral: true,
        }
    }
}
