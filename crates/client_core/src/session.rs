//! Per-user conversation session: turn-taking between typed input, suggestion
//! shortcuts and the [`Responder`].

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use shared::domain::{SessionId, Turn};
use tracing::{debug, info};

use crate::{responder::Responder, suggestions::SuggestionCatalog, transcript::Transcript};

/// When suggestion shortcuts are offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionVisibility {
    /// Offered regardless of transcript state.
    #[default]
    Always,
    /// Offered only while the transcript is empty and the visibility flag is set.
    UntilFirstTurn,
}

impl FromStr for SuggestionVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "always" => Ok(Self::Always),
            "until_first_turn" => Ok(Self::UntilFirstTurn),
            other => Err(format!(
                "unknown suggestion visibility '{other}' (expected 'always' or 'until-first-turn')"
            )),
        }
    }
}

impl fmt::Display for SuggestionVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::UntilFirstTurn => f.write_str("until-first-turn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Active,
}

/// Result of handling one UI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SubmitOutcome {
    /// Input was rejected; nothing changed.
    Ignored,
    /// The transcript changed; the front-end must redraw it from scratch.
    Rerender,
}

#[derive(Debug)]
struct ConversationState {
    transcript: Transcript,
    suggestions_visible: bool,
}

impl ConversationState {
    fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            suggestions_visible: true,
        }
    }
}

pub struct Session {
    id: SessionId,
    responder: Arc<dyn Responder>,
    catalog: SuggestionCatalog,
    visibility: SuggestionVisibility,
    state: Option<ConversationState>,
}

impl Session {
    pub fn new(
        responder: Arc<dyn Responder>,
        catalog: SuggestionCatalog,
        visibility: SuggestionVisibility,
    ) -> Self {
        Self {
            id: SessionId::new(),
            responder,
            catalog,
            visibility,
            state: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Creates the empty transcript on first call; later calls change nothing.
    pub fn initialise(&mut self) {
        if self.state.is_none() {
            debug!(session_id = %self.id, "initialising conversation state");
            self.state = Some(ConversationState::new());
        }
    }

    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }

        let state = self.state.get_or_insert_with(ConversationState::new);
        state.transcript.append(Turn::user(text));
        state.suggestions_visible = false;

        let reply = self.responder.ask(text).await;
        state.transcript.append(reply);

        info!(
            session_id = %self.id,
            turns = state.transcript.len(),
            "question answered"
        );
        SubmitOutcome::Rerender
    }

    pub async fn handle_suggestion_click(&mut self, suggestion_text: &str) -> SubmitOutcome {
        self.submit(suggestion_text).await
    }

    /// Submits the catalog suggestion with the given 1-based number, if any.
    pub async fn handle_suggestion_number(&mut self, number: usize) -> SubmitOutcome {
        let Some(suggestion) = self.catalog.get(number).cloned() else {
            debug!(session_id = %self.id, number, "no suggestion with that number");
            return SubmitOutcome::Ignored;
        };
        self.handle_suggestion_click(suggestion.text()).await
    }

    pub fn transcript(&self) -> &[Turn] {
        self.state
            .as_ref()
            .map(|state| state.transcript.all())
            .unwrap_or_default()
    }

    pub fn suggestions_visible(&self) -> bool {
        self.state
            .as_ref()
            .map_or(true, |state| state.suggestions_visible)
    }

    /// Whether the front-end should render suggestion shortcuts right now.
    pub fn suggestions_offered(&self) -> bool {
        match self.visibility {
            SuggestionVisibility::Always => true,
            SuggestionVisibility::UntilFirstTurn => {
                self.suggestions_visible() && self.transcript().is_empty()
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.transcript().is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Active
        }
    }

    pub fn catalog(&self) -> &SuggestionCatalog {
        &self.catalog
    }

    pub fn visibility(&self) -> SuggestionVisibility {
        self.visibility
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
