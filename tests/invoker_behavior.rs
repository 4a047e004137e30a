//! Behavior-driven tests for credential chain invocation
//!
//! These tests verify HOW the chain walks its credentials: strict priority
//! order, single attempt per credential, fallback bookkeeping, and the
//! exhaustion contract.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use agrilens_core::{
    invoke_chain, Credential, CredentialChain, SourceError, SourceErrorKind, TextGenerator,
    ValidationError,
};

struct Scripted {
    outcomes: Vec<(String, Result<String, SourceError>)>,
    calls: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(outcomes: Vec<(&str, Result<String, SourceError>)>) -> Self {
        Self {
            outcomes: outcomes
                .into_iter()
                .map(|(label, outcome)| (label.to_owned(), outcome))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl TextGenerator for Scripted {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
        credential: &'a Credential,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls
                .lock()
                .expect("calls lock")
                .push(credential.label().to_owned());
            self.outcomes
                .iter()
                .find(|(label, _)| label == credential.label())
                .map(|(_, outcome)| outcome.clone())
                .unwrap_or_else(|| Err(SourceError::unavailable("unscripted".to_owned())))
        })
    }
}

fn chain(labels: &[&str]) -> CredentialChain {
    let credentials = labels
        .iter()
        .map(|label| Credential::new(*label, "key").expect("valid credential"))
        .collect();
    CredentialChain::new("data", credentials).expect("valid chain")
}

#[tokio::test]
async fn when_the_primary_succeeds_the_secondary_is_never_tried() {
    let generator = Scripted::new(vec![
        ("primary", Ok(String::from("answer"))),
        ("secondary", Ok(String::from("unused"))),
    ]);
    let chain = chain(&["primary", "secondary"]);

    let success = invoke_chain(&generator, &chain, "prompt")
        .await
        .expect("primary succeeds");

    assert_eq!(success.text, "answer");
    assert_eq!(success.selected_label, "primary");
    assert!(success.warnings.is_empty());
    assert!(success.errors.is_empty());
    assert_eq!(generator.calls(), vec!["primary"]);
}

#[tokio::test]
async fn fallback_success_records_the_failed_attempt_and_a_warning() {
    let generator = Scripted::new(vec![
        (
            "primary",
            Err(SourceError::unavailable("quota exceeded".to_owned())),
        ),
        ("secondary", Ok(String::from("answer"))),
    ]);
    let chain = chain(&["primary", "secondary"]);

    let success = invoke_chain(&generator, &chain, "prompt")
        .await
        .expect("secondary succeeds");

    assert_eq!(success.selected_label, "secondary");
    assert_eq!(success.errors.len(), 1);
    assert_eq!(success.errors[0].label, "primary");
    assert_eq!(success.warnings.len(), 1);
    assert!(success.warnings[0].contains("secondary"));
    assert_eq!(generator.calls(), vec!["primary", "secondary"]);
}

#[tokio::test]
async fn non_retryable_failures_still_advance_to_the_next_credential() {
    // One attempt per credential regardless of retryability: retryable
    // only matters to callers above the chain, never inside it.
    let generator = Scripted::new(vec![
        (
            "primary",
            Err(SourceError::invalid_payload("malformed answer".to_owned())),
        ),
        ("secondary", Ok(String::from("answer"))),
    ]);
    let chain = chain(&["primary", "secondary"]);

    let success = invoke_chain(&generator, &chain, "prompt")
        .await
        .expect("secondary succeeds");
    assert_eq!(success.selected_label, "secondary");
}

#[tokio::test]
async fn exhaustion_carries_every_attempt_in_order() {
    let generator = Scripted::new(vec![
        ("primary", Err(SourceError::unavailable("down".to_owned()))),
        (
            "secondary",
            Err(SourceError::unavailable("also down".to_owned())),
        ),
    ]);
    let chain = chain(&["primary", "secondary"]);

    let failure = invoke_chain(&generator, &chain, "prompt")
        .await
        .expect_err("both credentials fail");

    assert_eq!(failure.chain, "data");
    assert_eq!(
        failure
            .errors
            .iter()
            .map(|e| e.label.as_str())
            .collect::<Vec<_>>(),
        vec!["primary", "secondary"]
    );
    let source_error = failure.to_source_error();
    assert_eq!(source_error.kind(), SourceErrorKind::Exhausted);
    assert!(!source_error.retryable());
}

#[tokio::test]
async fn each_credential_gets_exactly_one_attempt() {
    let generator = Scripted::new(vec![
        ("primary", Err(SourceError::unavailable("down".to_owned()))),
        (
            "secondary",
            Err(SourceError::unavailable("down too".to_owned())),
        ),
    ]);
    let chain = chain(&["primary", "secondary"]);

    let _ = invoke_chain(&generator, &chain, "prompt").await;

    assert_eq!(generator.calls(), vec!["primary", "secondary"]);
}

#[test]
fn empty_chains_are_rejected_at_construction() {
    let error = CredentialChain::new("data", Vec::new()).expect_err("empty chain");
    assert!(matches!(
        error,
        ValidationError::EmptyCredentialChain { .. }
    ));
}

#[test]
fn blank_credentials_are_rejected_at_construction() {
    assert!(matches!(
        Credential::new(" ", "key"),
        Err(ValidationError::EmptyCredentialLabel)
    ));
    assert!(matches!(
        Credential::new("primary", ""),
        Err(ValidationError::EmptyCredentialKey)
    ));
}
