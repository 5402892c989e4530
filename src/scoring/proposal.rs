use serde::{Deserialize, Serialize};

/// A computed, not-yet-applied recommendation.
///
/// The engine only ever produces proposals; applying one is the caller's
/// explicit responsibility through a domain mutation sink, after confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ActionProposal<P> {
    Permitted { parameters: P },
    Declined { reason: String },
}

impl<P> ActionProposal<P> {
    pub fn declined(reason: impl Into<String>) -> Self {
        Self::Declined {
            reason: reason.into(),
        }
    }

    pub fn allowed(&self) -> bool {
        matches!(self, Self::Permitted { .. })
    }

    pub fn parameters(&self) -> Option<&P> {
        match self {
            Self::Permitted { parameters } => Some(parameters),
            Self::Declined { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Permitted { .. } => None,
            Self::Declined { reason } => Some(reason),
        }
    }
}
