//! Pod lister error types.

use thiserror::Error;

/// Errors a [`PodLister`](crate::PodLister) may report for one namespace.
#[derive(Debug, Error)]
pub enum ListerError {
    #[error("namespace {namespace} could not be retrieved: {reason}")]
    Namespace { namespace: String, reason: String },

    #[error("failed to list pods in namespace {namespace}: {reason}")]
    List { namespace: String, reason: String },
}

pub type ListerResult<T> = Result<T, ListerError>;
