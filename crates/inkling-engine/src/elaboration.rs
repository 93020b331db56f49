//! Elaboration rounds: coached suggestions and free-form listening.
//!
//! Both tasks run against one session checked out from the store, with
//! the session lock held across the provider round-trip. State only
//! mutates after the provider reply has been parsed and verified, so a
//! failed round leaves the session exactly as it found it.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use inkling_core::{
    ElaborationReply, ElaborationTask, Error, GenerationBackend, Interaction, Result, Suggestion,
};
use inkling_inference::prompts::{
    ask_user_message, coach_system_prompt, elaborate_user_message, parse_suggestion,
    LISTENER_SYSTEM_PROMPT,
};

use crate::document::split_paragraphs;
use crate::session::{Session, SessionStore};

/// Drives elaboration sessions against a generation backend.
pub struct ElaborationService {
    generator: Arc<dyn GenerationBackend>,
    sessions: Arc<SessionStore>,
}

impl ElaborationService {
    pub fn new(generator: Arc<dyn GenerationBackend>, sessions: Arc<SessionStore>) -> Self {
        Self {
            generator,
            sessions,
        }
    }

    /// The store this service checks sessions out of.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Run one task in the given session.
    ///
    /// Tasks against the same session serialize on the session lock;
    /// tasks against different sessions run independently.
    #[instrument(skip(self, task), fields(
        subsystem = "engine",
        component = "elaboration",
        op = "handle",
        session_id = %session_id
    ))]
    pub async fn handle(&self, session_id: &str, task: ElaborationTask) -> Result<ElaborationReply> {
        let handle = self.sessions.checkout(session_id).await;
        let mut session = handle.lock().await;

        match task {
            ElaborationTask::Elaborate { journal_text } => {
                self.elaborate(&mut session, journal_text).await
            }
            ElaborationTask::Ask {
                journal_text,
                prompt,
            } => self.ask(&mut session, journal_text, prompt).await,
        }
    }

    /// One coached round: ask for a suggestion targeting a paragraph not
    /// yet discussed, verify the highlight contract, then commit.
    async fn elaborate(
        &self,
        session: &mut Session,
        journal_text: String,
    ) -> Result<ElaborationReply> {
        let paragraphs = split_paragraphs(&journal_text);
        if paragraphs.is_empty() {
            return Err(Error::Validation(
                "EmptyJournal: the journal text has no paragraphs to elaborate on".to_string(),
            ));
        }

        let system = coach_system_prompt(session.excluded_highlights());
        let history = session.render_history();
        let input = elaborate_user_message(&journal_text);

        debug!(
            session_id = %session.id(),
            paragraph_count = paragraphs.len(),
            history_len = session.history().len(),
            excluded_count = session.excluded_highlights().len(),
            "elaboration: requesting suggestion"
        );

        let raw = self
            .generator
            .generate_chat_json(Some(&system), &history, &input)
            .await?;

        let suggestion = match parse_suggestion(&raw) {
            Ok(suggestion) => suggestion,
            Err(e) => {
                warn!(
                    session_id = %session.id(),
                    error = %e,
                    "elaboration: coach reply unusable"
                );
                return Err(Error::NotFound("NoFurtherParagraphs".to_string()));
            }
        };

        if let Suggestion::Proposal(proposal) = &suggestion {
            let target = paragraphs
                .get(proposal.paragraph_index - 1)
                .copied()
                .ok_or_else(|| {
                    Error::Upstream(format!(
                        "coach targeted paragraph {} but the entry has {}",
                        proposal.paragraph_index,
                        paragraphs.len()
                    ))
                })?;
            if !target.contains(proposal.highlight_text.as_str()) {
                return Err(Error::Upstream(format!(
                    "coach highlight {:?} is not a quote from paragraph {}",
                    proposal.highlight_text, proposal.paragraph_index
                )));
            }
            // Exclusion first, then history; a proposal is never replayed
            // as context without also being excluded.
            session.exclude(proposal.highlight_text.clone());
        }

        session.record(Interaction::Elaborate {
            journal_text,
            suggestion: suggestion.clone(),
        });

        debug!(
            session_id = %session.id(),
            history_len = session.history().len(),
            excluded_count = session.excluded_highlights().len(),
            complete = matches!(suggestion, Suggestion::Completion),
            "elaboration: round committed"
        );

        Ok(ElaborationReply::Suggestion(suggestion))
    }

    /// One listening round: free-form follow-up grounded in the session
    /// history. Provider failures surface to the caller unretried.
    async fn ask(
        &self,
        session: &mut Session,
        journal_text: String,
        prompt: String,
    ) -> Result<ElaborationReply> {
        if prompt.trim().is_empty() {
            return Err(Error::Validation(
                "EmptyPrompt: the prompt must not be empty".to_string(),
            ));
        }

        let history = session.render_history();
        let input = ask_user_message(&journal_text, &prompt);

        debug!(
            session_id = %session.id(),
            history_len = session.history().len(),
            prompt_len = prompt.len(),
            "elaboration: listening round"
        );

        let response = self
            .generator
            .generate_chat(Some(LISTENER_SYSTEM_PROMPT), &history, &input)
            .await?;

        session.record(Interaction::Ask {
            journal_text,
            prompt,
            response: response.clone(),
        });

        Ok(ElaborationReply::Response(response))
    }
}
