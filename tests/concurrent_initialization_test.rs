//! # Concurrent Shared Manager Initialization
//!
//! Many callers race to initialize the process-wide manager; exactly one table
//! may be adopted and every caller must observe the same instance.

mod common;

use common::{slot, StubAction};
use std::sync::{Arc, Barrier};
use submission_workflow::{WorkflowManager, WorkflowStage};
use tokio_util::sync::CancellationToken;

const CALLERS: usize = 16;

#[test]
fn test_racing_initializers_observe_one_instance() {
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                let analyze = StubAction::advancing(WorkflowStage::Analyze);
                barrier.wait();
                let manager = if i % 2 == 0 {
                    WorkflowManager::initialize_with_actions(vec![slot(&analyze)])
                } else {
                    WorkflowManager::initialize()
                };
                (manager, analyze)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let shared = results[0].0.clone();
    assert!(results.iter().all(|(m, _)| Arc::ptr_eq(m, &shared)));

    // Exactly one analyze action is reachable through the shared manager:
    // either a single adopted stub, or the built-in one and no stub at all.
    tokio_test::block_on(async {
        shared
            .execute_actions_to_next_stage(
                &WorkflowManager::first_stage("abc123"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
    });
    let stub_calls: usize = results.iter().map(|(_, stub)| stub.calls()).sum();
    let adopted_builtin = shared.describe_slots().len() == 3;
    assert_eq!(stub_calls, usize::from(!adopted_builtin));
}
