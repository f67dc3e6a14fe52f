//! Service tests for context bucket seeding, upserts, and resolution.

use super::support::{Harness, slug};
use crate::task::{
    domain::{ContextEntry, DevType, EntryKind, PipelineAction, TaskDomainError},
    services::{AddContextEntryRequest, ContextIndexError, WorkflowErrorKind},
};
use rstest::{fixture, rstest};

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

fn paths(entries: &[ContextEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.file().as_str()).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn init_defaults_seeds_backend_buckets(harness: Harness) {
    harness.create("login-fix").await;

    harness
        .context
        .init_defaults(&slug("login-fix"), "backend")
        .await
        .expect("seeding should succeed");

    let implement = harness
        .context
        .resolve(&slug("login-fix"), PipelineAction::Implement)
        .await
        .expect("resolve should succeed");
    let check = harness
        .context
        .resolve(&slug("login-fix"), PipelineAction::Check)
        .await
        .expect("resolve should succeed");

    assert_eq!(
        paths(&implement),
        vec![".taskflow/workflow.md", ".taskflow/spec/backend"]
    );
    assert_eq!(
        paths(&check),
        vec![".taskflow/spec/backend/quality-guidelines.md"]
    );
    assert!(
        implement
            .iter()
            .chain(check.iter())
            .all(|entry| !entry.file().as_str().contains("frontend"))
    );

    let task = harness
        .lifecycle
        .get(&slug("login-fix"))
        .await
        .expect("lookup should succeed");
    assert_eq!(task.dev_type(), Some(DevType::Backend));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn init_defaults_is_idempotent(harness: Harness) {
    harness.create("t1").await;

    let first = harness
        .context
        .init_defaults(&slug("t1"), "fullstack")
        .await
        .expect("first seeding should succeed");
    let second = harness
        .context
        .init_defaults(&slug("t1"), "fullstack")
        .await
        .expect("second seeding should succeed");

    assert_eq!(first, second);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn init_defaults_rejects_unknown_dev_type(harness: Harness) {
    harness.create("t1").await;

    let error = harness
        .context
        .init_defaults(&slug("t1"), "mobile")
        .await
        .expect_err("unknown dev type should fail");

    assert_eq!(error.kind(), WorkflowErrorKind::InvalidDevType);
    let buckets = harness
        .context
        .buckets(&slug("t1"))
        .await
        .expect("listing should succeed");
    assert!(buckets.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_entry_updates_reason_in_place(harness: Harness) {
    harness.create("t1").await;
    for (path, reason) in [("docs/a.md", "first"), ("docs/b.md", "second")] {
        harness
            .context
            .add_entry(AddContextEntryRequest::new(slug("t1"), "debug", path, reason))
            .await
            .expect("add should succeed");
    }

    let bucket = harness
        .context
        .add_entry(
            AddContextEntryRequest::new(slug("t1"), "debug", "docs/a.md", "updated")
                .with_kind("file"),
        )
        .await
        .expect("update should succeed");

    assert_eq!(paths(bucket.entries()), vec!["docs/a.md", "docs/b.md"]);
    let first = bucket.entries().first().expect("bucket has entries");
    assert_eq!(first.reason(), "updated");
    assert_eq!(first.kind(), Some(EntryKind::File));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_entry_rejects_unknown_action(harness: Harness) {
    harness.create("t1").await;

    let error = harness
        .context
        .add_entry(AddContextEntryRequest::new(
            slug("t1"),
            "deploy",
            "docs/a.md",
            "reason",
        ))
        .await
        .expect_err("unknown action should fail");

    assert_eq!(error.kind(), WorkflowErrorKind::UnknownAction);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_entry_rejects_unknown_kind(harness: Harness) {
    harness.create("t1").await;

    let result = harness
        .context
        .add_entry(
            AddContextEntryRequest::new(slug("t1"), "check", "docs/a.md", "reason")
                .with_kind("symlink"),
        )
        .await;

    assert!(matches!(
        result,
        Err(ContextIndexError::Domain(TaskDomainError::InvalidEntryKind(_)))
    ));
}

#[rstest]
#[case("../outside.md")]
#[case("/etc/hosts")]
#[tokio::test(flavor = "multi_thread")]
async fn add_entry_rejects_paths_outside_the_project(harness: Harness, #[case] path: &str) {
    harness.create("t1").await;

    let result = harness
        .context
        .add_entry(AddContextEntryRequest::new(slug("t1"), "implement", path, "reason"))
        .await;

    assert!(matches!(
        result,
        Err(ContextIndexError::Domain(TaskDomainError::ContextPathOutsideProject(_)))
    ));
    let entries = harness
        .context
        .resolve(&slug("t1"), PipelineAction::Implement)
        .await
        .expect("resolve should succeed");
    assert!(entries.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_entry_requires_known_task(harness: Harness) {
    let error = harness
        .context
        .add_entry(AddContextEntryRequest::new(
            slug("ghost"),
            "check",
            "docs/a.md",
            "reason",
        ))
        .await
        .expect_err("unknown task should fail");

    assert_eq!(error.kind(), WorkflowErrorKind::TaskNotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolve_unwritten_bucket_is_empty(harness: Harness) {
    harness.create("t1").await;

    let entries = harness
        .context
        .resolve(&slug("t1"), PipelineAction::CreatePr)
        .await
        .expect("resolve should succeed");

    assert!(entries.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn buckets_follow_action_order(harness: Harness) {
    harness.create("t1").await;
    for action in ["finish", "implement"] {
        harness
            .context
            .add_entry(AddContextEntryRequest::new(
                slug("t1"),
                action,
                "docs/a.md",
                "reason",
            ))
            .await
            .expect("add should succeed");
    }

    let buckets = harness
        .context
        .buckets(&slug("t1"))
        .await
        .expect("listing should succeed");

    let actions: Vec<PipelineAction> = buckets.iter().map(|bucket| bucket.action()).collect();
    assert_eq!(
        actions,
        vec![PipelineAction::Implement, PipelineAction::Finish]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_task_context_is_frozen(harness: Harness) {
    harness.create("t1").await;
    harness
        .context
        .init_defaults(&slug("t1"), "docs")
        .await
        .expect("seeding should succeed");
    harness
        .lifecycle
        .start(crate::task::services::StartTaskRequest::new(slug("t1")))
        .await
        .expect("start should succeed");
    harness
        .lifecycle
        .complete(&slug("t1"))
        .await
        .expect("complete should succeed");
    harness
        .lifecycle
        .archive(&slug("t1"))
        .await
        .expect("archive should succeed");

    let resolve = harness
        .context
        .resolve(&slug("t1"), PipelineAction::Implement)
        .await
        .expect_err("archived context cannot be resolved");
    let add = harness
        .context
        .add_entry(AddContextEntryRequest::new(
            slug("t1"),
            "implement",
            "docs/a.md",
            "late",
        ))
        .await
        .expect_err("archived context cannot change");

    assert_eq!(resolve.kind(), WorkflowErrorKind::TaskArchived);
    assert_eq!(add.kind(), WorkflowErrorKind::TaskArchived);
}
