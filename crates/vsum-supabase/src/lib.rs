//! Supabase (PostgREST) client.
//!
//! This crate provides:
//! - A REST client with tuned connection pooling and timeouts
//! - Exponential backoff with jitter for transient failures
//! - Observability (tracing spans, metrics)
//! - Typed repositories for summaries, conversations and messages

pub mod client;
pub mod error;
pub mod metrics;
pub mod query;
pub mod repos;
pub mod retry;

#[cfg(test)]
mod client_tests;

pub use client::{SupabaseClient, SupabaseConfig};
pub use error::{SupabaseError, SupabaseResult};
pub use query::Query;
pub use repos::{ConversationRepository, MessageRepository, SummaryRepository};
pub use retry::RetryConfig;
