//! # Messaging
//!
//! Message formats exchanged with the queue that drives the workflow.

pub mod message;

pub use message::WorkflowQueueMessage;
