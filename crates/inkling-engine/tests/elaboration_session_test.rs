//! Integration tests for elaboration sessions.
//!
//! This suite validates:
//! - A suggestion round appends history and grows the exclusion set
//! - A completion round appends history without touching exclusions
//! - Validation failures reject before any provider call
//! - Unusable or contract-violating coach replies leave the session
//!   exactly as the round found it
//! - Provider failures surface unretried
//! - Rounds against one session serialize; distinct sessions stay
//!   independent

use std::sync::Arc;

use inkling_engine::{
    CoachingStrategy, ElaborationReply, ElaborationService, ElaborationTask, Error, Interaction,
    SessionStore, Suggestion,
};
use inkling_inference::mock::MockInferenceBackend;

// ============================================================================
// HELPERS
// ============================================================================

const JOURNAL: &str =
    "I walked to the harbor before sunrise.\n\nThe quiet morning walk cleared my head.";

fn service(backend: &MockInferenceBackend) -> ElaborationService {
    ElaborationService::new(Arc::new(backend.clone()), Arc::new(SessionStore::new()))
}

fn elaborate_task() -> ElaborationTask {
    ElaborationTask::Elaborate {
        journal_text: JOURNAL.to_string(),
    }
}

fn ask_task(prompt: &str) -> ElaborationTask {
    ElaborationTask::Ask {
        journal_text: JOURNAL.to_string(),
        prompt: prompt.to_string(),
    }
}

fn proposal_json(index: usize, highlight: &str) -> String {
    serde_json::json!({
        "status": "suggestion",
        "paragraph_index": index,
        "strategy": "sensory_deepening",
        "suggestion_text": "What did that moment feel like?",
        "highlight_text": highlight,
    })
    .to_string()
}

fn completion_json() -> String {
    serde_json::json!({ "status": "complete" }).to_string()
}

/// Snapshot `(history length, excluded highlights)` for one session.
async fn session_state(service: &ElaborationService, id: &str) -> (usize, Vec<String>) {
    let handle = service.sessions().checkout(id).await;
    let session = handle.lock().await;
    (
        session.history().len(),
        session.excluded_highlights().iter().cloned().collect(),
    )
}

// ============================================================================
// SUGGESTION ROUNDS
// ============================================================================

#[tokio::test]
async fn test_suggestion_round_commits_exclusion_and_history() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(2, "quiet morning walk"));
    let service = service(&backend);

    let reply = service.handle("s1", elaborate_task()).await.unwrap();

    match reply {
        ElaborationReply::Suggestion(Suggestion::Proposal(proposal)) => {
            assert_eq!(proposal.paragraph_index, 2);
            assert_eq!(proposal.strategy, CoachingStrategy::SensoryDeepening);
            assert_eq!(proposal.highlight_text, "quiet morning walk");
        }
        other => panic!("expected a proposal, got {:?}", other),
    }

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 1);
    assert_eq!(excluded, vec!["quiet morning walk".to_string()]);
    assert_eq!(backend.call_count("generate_chat_json"), 1);
}

#[tokio::test]
async fn test_completion_round_commits_history_only() {
    let backend = MockInferenceBackend::new().with_queued_response(completion_json());
    let service = service(&backend);

    let reply = service.handle("s1", elaborate_task()).await.unwrap();
    assert_eq!(reply, ElaborationReply::Suggestion(Suggestion::Completion));

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 1);
    assert!(excluded.is_empty());
}

#[tokio::test]
async fn test_exclusions_accumulate_across_rounds() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(1, "walked to the harbor"))
        .with_queued_response(proposal_json(2, "cleared my head"));
    let service = service(&backend);

    service.handle("s1", elaborate_task()).await.unwrap();
    service.handle("s1", elaborate_task()).await.unwrap();

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 2);
    assert_eq!(
        excluded,
        vec![
            "cleared my head".to_string(),
            "walked to the harbor".to_string(),
        ]
    );
}

// ============================================================================
// VALIDATION
// ============================================================================

#[tokio::test]
async fn test_empty_journal_rejected_before_any_call() {
    let backend = MockInferenceBackend::new();
    let service = service(&backend);

    let err = service
        .handle(
            "s1",
            ElaborationTask::Elaborate {
                journal_text: "   \n\n  ".to_string(),
            },
        )
        .await
        .unwrap_err();

    match err {
        Error::Validation(msg) => assert!(msg.starts_with("EmptyJournal")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(backend.generate_call_count(), 0);

    let (history_len, _) = session_state(&service, "s1").await;
    assert_eq!(history_len, 0);
}

#[tokio::test]
async fn test_blank_ask_prompt_rejected_before_any_call() {
    let backend = MockInferenceBackend::new();
    let service = service(&backend);

    let err = service.handle("s1", ask_task("   ")).await.unwrap_err();

    match err {
        Error::Validation(msg) => assert!(msg.starts_with("EmptyPrompt")),
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(backend.generate_call_count(), 0);
}

// ============================================================================
// FAILED ROUNDS LEAVE NO TRACE
// ============================================================================

#[tokio::test]
async fn test_unusable_reply_maps_to_no_further_paragraphs() {
    let backend =
        MockInferenceBackend::new().with_queued_response("I suggest the second paragraph.");
    let service = service(&backend);

    let err = service.handle("s1", elaborate_task()).await.unwrap_err();

    match err {
        Error::NotFound(msg) => assert_eq!(msg, "NoFurtherParagraphs"),
        other => panic!("expected not-found, got {:?}", other),
    }

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 0);
    assert!(excluded.is_empty());
}

#[tokio::test]
async fn test_out_of_range_paragraph_leaves_session_untouched() {
    let backend =
        MockInferenceBackend::new().with_queued_response(proposal_json(9, "harbor"));
    let service = service(&backend);

    let err = service.handle("s1", elaborate_task()).await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 0);
    assert!(excluded.is_empty());
}

#[tokio::test]
async fn test_highlight_contract_violation_leaves_session_untouched() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(1, "not a quote from the entry"));
    let service = service(&backend);

    let err = service.handle("s1", elaborate_task()).await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 0);
    assert!(excluded.is_empty());
}

#[tokio::test]
async fn test_provider_failure_surfaces_unretried() {
    let backend = MockInferenceBackend::new().with_failure_rate(1.0);
    let service = service(&backend);

    let err = service.handle("s1", elaborate_task()).await.unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));
    // One call, no retries: a replayed coach round could double-commit.
    assert_eq!(backend.generate_call_count(), 1);

    let (history_len, _) = session_state(&service, "s1").await;
    assert_eq!(history_len, 0);
}

#[tokio::test]
async fn test_failed_round_between_successes_is_not_recorded() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(1, "walked to the harbor"))
        .with_queued_response("not json at all")
        .with_queued_response(completion_json());
    let service = service(&backend);

    service.handle("s1", elaborate_task()).await.unwrap();
    service.handle("s1", elaborate_task()).await.unwrap_err();
    service.handle("s1", elaborate_task()).await.unwrap();

    let (history_len, excluded) = session_state(&service, "s1").await;
    assert_eq!(history_len, 2);
    assert_eq!(excluded, vec!["walked to the harbor".to_string()]);
}

// ============================================================================
// LISTENING ROUNDS
// ============================================================================

#[tokio::test]
async fn test_ask_round_appends_interaction() {
    let backend = MockInferenceBackend::new()
        .with_queued_response("That calm often comes from giving a feeling room to settle.");
    let service = service(&backend);

    let reply = service
        .handle("s1", ask_task("Why did the walk help?"))
        .await
        .unwrap();

    assert_eq!(
        reply,
        ElaborationReply::Response(
            "That calm often comes from giving a feeling room to settle.".to_string()
        )
    );
    assert_eq!(backend.call_count("generate_chat"), 1);

    let handle = service.sessions().checkout("s1").await;
    let session = handle.lock().await;
    assert_eq!(session.history().len(), 1);
    match &session.history()[0] {
        Interaction::Ask {
            prompt, response, ..
        } => {
            assert_eq!(prompt, "Why did the walk help?");
            assert!(response.contains("room to settle"));
        }
        other => panic!("expected an ask interaction, got {:?}", other),
    }
}

#[tokio::test]
async fn test_elaborate_then_ask_interleaves_history() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(2, "quiet morning"))
        .with_queued_response("Walks slow the mind down enough to notice things.");
    let service = service(&backend);

    service.handle("s1", elaborate_task()).await.unwrap();
    service
        .handle("s1", ask_task("Why do walks help me think?"))
        .await
        .unwrap();

    let handle = service.sessions().checkout("s1").await;
    let session = handle.lock().await;
    assert_eq!(session.history().len(), 2);
    assert!(matches!(
        session.history()[0],
        Interaction::Elaborate { .. }
    ));
    assert!(matches!(session.history()[1], Interaction::Ask { .. }));
    // Each interaction renders as a (user, assistant) pair.
    assert_eq!(session.render_history().len(), 4);
}

// ============================================================================
// SESSION ISOLATION AND SERIALIZATION
// ============================================================================

#[tokio::test]
async fn test_sessions_are_independent() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(1, "before sunrise"))
        .with_queued_response(completion_json());
    let service = service(&backend);

    service.handle("alpha", elaborate_task()).await.unwrap();
    service.handle("beta", elaborate_task()).await.unwrap();

    let (alpha_len, alpha_excluded) = session_state(&service, "alpha").await;
    let (beta_len, beta_excluded) = session_state(&service, "beta").await;

    assert_eq!(alpha_len, 1);
    assert_eq!(alpha_excluded, vec!["before sunrise".to_string()]);
    assert_eq!(beta_len, 1);
    assert!(beta_excluded.is_empty());
    assert_eq!(service.sessions().len().await, 2);
}

#[tokio::test]
async fn test_concurrent_rounds_on_one_session_both_commit() {
    let backend = MockInferenceBackend::new()
        .with_queued_response(proposal_json(1, "walked to the harbor"))
        .with_queued_response(proposal_json(2, "cleared my head"));
    let service = Arc::new(service(&backend));

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.handle("shared", elaborate_task()).await }
    });
    let second = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.handle("shared", elaborate_task()).await }
    });

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Whichever round ran first, both committed against the same session.
    let (history_len, excluded) = session_state(&service, "shared").await;
    assert_eq!(history_len, 2);
    assert_eq!(
        excluded,
        vec![
            "cleared my head".to_string(),
            "walked to the harbor".to_string(),
        ]
    );
}
