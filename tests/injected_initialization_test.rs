//! # Shared Manager Initialization With Injected Actions
//!
//! Runs in its own test binary so the process-wide manager starts empty.

mod common;

use common::stub_table;
use std::sync::Arc;
use submission_workflow::{WorkflowManager, WorkflowQueueMessage, WorkflowStage};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_injected_initialization_wins_over_later_default() {
    let (stubs, table) = stub_table();
    let first = WorkflowManager::initialize_with_actions(table);

    let (later_stubs, later_table) = stub_table();
    let second = WorkflowManager::initialize_with_actions(later_table);
    let third = WorkflowManager::initialize();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));

    let cancel = CancellationToken::new();
    let mut message = WorkflowManager::first_stage("abc123");
    while !message.is_terminal() {
        message = third
            .execute_actions_to_next_stage(&message, &cancel)
            .await
            .unwrap();
    }

    assert_eq!(message, WorkflowQueueMessage::new("abc123", WorkflowStage::Finished));
    assert!(stubs.iter().all(|s| s.calls() == 1));
    assert!(later_stubs.iter().all(|s| s.calls() == 0));
    assert!(third.describe_slots().iter().all(|b| b.action_name == "stub_action"));
}
