//! Behavioural tests for the in-memory directory adapter.

use crate::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{
        AssigneeId, AssigneeRole, AssigneeSummary, CustomerId, CustomerSummary, NoVisitReasonId,
    },
    ports::DirectoryLookup,
};
use rstest::{fixture, rstest};

#[fixture]
fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customer_summaries_returns_only_known_ids(directory: InMemoryDirectory) {
    let known = CustomerSummary::new(CustomerId::new(), "Harbour Mart").expect("valid customer");
    directory
        .upsert_customer(known.clone())
        .expect("seeding should succeed");
    let unknown = CustomerId::new();

    let found = directory
        .customer_summaries(&[known.id, unknown])
        .await
        .expect("lookup should succeed");

    assert_eq!(found.len(), 1);
    assert_eq!(found.get(&known.id), Some(&known));
    assert!(!found.contains_key(&unknown));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_summaries_round_trips_role(directory: InMemoryDirectory) {
    let assignee = AssigneeSummary::new(AssigneeId::new(), "Dana", AssigneeRole::Merchandiser)
        .expect("valid assignee");
    directory
        .upsert_assignee(assignee.clone())
        .expect("seeding should succeed");

    let found = directory
        .assignee_summaries(&[assignee.id])
        .await
        .expect("lookup should succeed");

    assert_eq!(found.get(&assignee.id), Some(&assignee));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn no_visit_reason_labels_skips_missing_entries(directory: InMemoryDirectory) {
    let reason = NoVisitReasonId::new();
    directory
        .upsert_no_visit_reason(reason, "Point of sale closed")
        .expect("seeding should succeed");

    let labels = directory
        .no_visit_reason_labels(&[reason, NoVisitReasonId::new()])
        .await
        .expect("lookup should succeed");

    assert_eq!(labels.len(), 1);
    assert_eq!(labels.get(&reason).map(String::as_str), Some("Point of sale closed"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_id_slice_yields_empty_map(directory: InMemoryDirectory) {
    let found = directory
        .customer_summaries(&[])
        .await
        .expect("lookup should succeed");
    assert!(found.is_empty());
}
