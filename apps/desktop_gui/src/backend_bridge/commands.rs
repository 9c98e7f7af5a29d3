//! Backend commands queued from UI to backend worker.

use client_core::ClientError;
use shared::protocol::{AddTextRequest, QueryRequest};

use crate::controller::events::UiEvent;

pub enum BackendCommand {
    CheckBackend,
    AddText(AddTextRequest),
    QueryAi(QueryRequest),
}

impl BackendCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            BackendCommand::CheckBackend => CommandKind::CheckBackend,
            BackendCommand::AddText(_) => CommandKind::AddText,
            BackendCommand::QueryAi(_) => CommandKind::QueryAi,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Which flow a command belongs to, kept after the command itself has been
/// moved into its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    CheckBackend,
    AddText,
    QueryAi,
}

impl CommandKind {
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::CheckBackend => "check_backend",
            CommandKind::AddText => "add_text",
            CommandKind::QueryAi => "query_ai",
        }
    }

    /// The event that settles this flow when its task never produced one.
    pub fn abandoned(self, reason: String) -> UiEvent {
        match self {
            CommandKind::CheckBackend => UiEvent::BackendUnreachable(reason),
            CommandKind::AddText => UiEvent::AddTextSettled(Err(ClientError::Unavailable(reason))),
            CommandKind::QueryAi => UiEvent::QuerySettled(Err(ClientError::Unavailable(reason))),
        }
    }
}
