//! User-facing command outcomes and the sinks that display them.

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Error,
}

/// A terminal notification for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub message: String,
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

/// Receives outcomes for display. Fire-and-forget.
pub trait OutcomeSink {
    fn notify(&self, outcome: Outcome);
}

/// Writes outcomes to the `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl OutcomeSink for TracingSink {
    fn notify(&self, outcome: Outcome) {
        match outcome.kind {
            OutcomeKind::Success => info!(target: "records_client::outcome", "{}", outcome.message),
            OutcomeKind::Error => warn!(target: "records_client::outcome", "{}", outcome.message),
        }
    }
}

/// Forwards outcomes to a UI task. A closed receiver drops the outcome.
impl OutcomeSink for UnboundedSender<Outcome> {
    fn notify(&self, outcome: Outcome) {
        if self.send(outcome).is_err() {
            warn!("outcome receiver closed; notification dropped");
        }
    }
}
