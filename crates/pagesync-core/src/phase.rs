//! Sync phase state machine
//!
//! The synchronizer's single-flight guard is an explicit state machine
//! rather than scattered boolean flags. Every operation begins by moving
//! out of [`SyncPhase::Idle`]; operations requested in any other phase are
//! rejected by the caller as no-ops.

/// Phase of the collection synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    /// No fetch in flight
    Idle,
    /// First-page load in flight (accumulated state is being replaced)
    FetchingFirst,
    /// Continuation fetch in flight (items will be appended)
    FetchingMore,
    /// Full materialization loop in flight
    Draining,
}

impl SyncPhase {
    /// Check if no operation is in flight
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, SyncPhase::Idle)
    }

    /// Check if any fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.is_idle()
    }
}

/// Illegal phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal sync phase transition: {from:?} -> {to:?}")]
pub struct PhaseError {
    /// Phase the machine was in
    pub from: SyncPhase,
    /// Phase that was requested
    pub to: SyncPhase,
}

/// Validates a phase transition.
pub fn validate_transition(from: SyncPhase, to: SyncPhase) -> Result<(), PhaseError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(PhaseError { from, to })
    }
}

/// Phases reachable from `from` in one transition.
pub fn allowed_transitions(from: SyncPhase) -> Vec<SyncPhase> {
    use SyncPhase::*;
    match from {
        Idle => vec![FetchingFirst, FetchingMore, Draining],
        FetchingFirst | FetchingMore | Draining => vec![Idle],
    }
}

fn allowed(from: SyncPhase, to: SyncPhase) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
