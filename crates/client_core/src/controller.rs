//! Form state for the add-text and query flows, and how backend replies are
//! reconciled into what the user sees.
//!
//! Skins own one `FormController` each. Event-driven skins call the
//! `begin_*`/`finish_*` pairs around their own dispatch; straight-line callers
//! use `submit_add_text`/`submit_query`.

use std::{fmt, str::FromStr};

use shared::protocol::{AddTextRequest, AddTextResponse, QueryRequest, QueryResponse};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{AssistantApi, ClientError};

pub const ADDED_MESSAGE: &str = "Text added successfully!";
pub const DUPLICATE_MESSAGE: &str = "Title already exists!";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add text.";
pub const QUERY_FAILED_MESSAGE: &str = "An error occurred. Please try again.";

/// Text shown when the backend answers a query with nothing usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerFallback {
    #[default]
    NoData,
    NoResponse,
}

impl AnswerFallback {
    pub fn text(self) -> &'static str {
        match self {
            Self::NoData => "I don't have data for that.",
            Self::NoResponse => "No response.",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown answer fallback '{0}' (expected no-data or no-response)")]
pub struct UnknownAnswerFallback(String);

impl FromStr for AnswerFallback {
    type Err = UnknownAnswerFallback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "no-data" | "nodata" => Ok(Self::NoData),
            "no-response" | "noresponse" => Ok(Self::NoResponse),
            _ => Err(UnknownAnswerFallback(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTextEntry {
    pub title: String,
    pub content: String,
}

impl NewTextEntry {
    fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub query: String,
    pub answer: String,
}

/// Outcome of the latest add-text attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Empty,
    Added,
    Duplicate,
    Failed,
}

impl SubmissionStatus {
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Added => Some(ADDED_MESSAGE),
            Self::Duplicate => Some(DUPLICATE_MESSAGE),
            Self::Failed => Some(ADD_FAILED_MESSAGE),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct FormController {
    entry: NewTextEntry,
    query: QueryState,
    status: SubmissionStatus,
    fallback: AnswerFallback,
    add_text_in_flight: bool,
    query_in_flight: bool,
}

impl FormController {
    pub fn new(fallback: AnswerFallback) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    pub fn entry(&self) -> &NewTextEntry {
        &self.entry
    }

    pub fn title(&self) -> &str {
        &self.entry.title
    }

    pub fn content(&self) -> &str {
        &self.entry.content
    }

    pub fn query(&self) -> &str {
        &self.query.query
    }

    /// The latest answer, or `None` before the first query settles.
    pub fn answer(&self) -> Option<&str> {
        Some(self.query.answer.as_str()).filter(|answer| !answer.is_empty())
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn fallback(&self) -> AnswerFallback {
        self.fallback
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.entry.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.entry.content = content.into();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query.query = query.into();
    }

    pub fn is_add_text_in_flight(&self) -> bool {
        self.add_text_in_flight
    }

    pub fn is_query_in_flight(&self) -> bool {
        self.query_in_flight
    }

    /// Snapshot the entry fields for sending. Returns `None` while an earlier
    /// add-text request is still unresolved.
    pub fn begin_add_text(&mut self) -> Option<AddTextRequest> {
        if self.add_text_in_flight {
            debug!("add_text already in flight; ignoring resubmit");
            return None;
        }
        self.add_text_in_flight = true;
        Some(AddTextRequest {
            title: self.entry.title.clone(),
            content: self.entry.content.clone(),
        })
    }

    pub fn finish_add_text(
        &mut self,
        result: Result<AddTextResponse, ClientError>,
    ) -> SubmissionStatus {
        self.add_text_in_flight = false;
        self.status = match result {
            Ok(response) => {
                if let Some(error) = response.error.as_deref() {
                    warn!(error = %error, "add_text succeeded with an error field in the reply");
                }
                if let Some(message) = response.message.as_deref() {
                    debug!(message = %message, "add_text reply");
                }
                self.entry.clear();
                if response.is_duplicate() {
                    info!("add_text rejected a duplicate title");
                    SubmissionStatus::Duplicate
                } else {
                    SubmissionStatus::Added
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to add text");
                SubmissionStatus::Failed
            }
        };
        self.status
    }

    /// Snapshot the query for sending. The query field itself is left as is.
    pub fn begin_query(&mut self) -> Option<QueryRequest> {
        if self.query_in_flight {
            debug!("query already in flight; ignoring resubmit");
            return None;
        }
        self.query_in_flight = true;
        Some(QueryRequest {
            query: self.query.query.clone(),
        })
    }

    pub fn finish_query(&mut self, result: Result<QueryResponse, ClientError>) -> &str {
        self.query_in_flight = false;
        self.query.answer = match result {
            Ok(response) => match response.usable_answer() {
                Some(answer) => answer.to_string(),
                None => {
                    if let Some(error) = response.error.as_deref() {
                        warn!(
                            error = %error,
                            "query_ai replied with an error instead of an answer"
                        );
                    }
                    self.fallback.text().to_string()
                }
            },
            Err(err) => {
                warn!(error = %err, "failed to get AI response");
                QUERY_FAILED_MESSAGE.to_string()
            }
        };
        &self.query.answer
    }

    pub async fn submit_add_text<A>(&mut self, api: &A) -> SubmissionStatus
    where
        A: AssistantApi + ?Sized,
    {
        let Some(request) = self.begin_add_text() else {
            return self.status;
        };
        let result = api.add_text(&request).await;
        self.finish_add_text(result)
    }

    pub async fn submit_query<A>(&mut self, api: &A) -> &str
    where
        A: AssistantApi + ?Sized,
    {
        let Some(request) = self.begin_query() else {
            return &self.query.answer;
        };
        let result = api.query_ai(&request).await;
        self.finish_query(result)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
