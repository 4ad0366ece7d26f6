// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

const FALLBACK_ACTION_ERROR: &str = "action failed";

/// The entity a confirmation dialog is asking about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmTarget {
    pub id: i64,
    pub label: String,
}

impl ConfirmTarget {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    Confirm,
    Dismiss,
}

/// Terminal outcome of one workflow. Exactly one of these is produced
/// per [`ConfirmWorkflow`]; the type system enforces it because
/// resolving consumes the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Confirmed and the action succeeded.
    Success,
    /// Confirmed but the action failed; carries the most specific
    /// message available (server message, then transport error text,
    /// then a fixed fallback).
    Failure(String),
    /// Dismissed; the action was never invoked.
    Dismissed,
}

/// Confirmation workflow for a destructive row action.
///
/// The machine has one live state (open, awaiting a decision) and two
/// terminal ones. Callers hold at most one open workflow per target;
/// opening a second for the same target while one is open is a caller
/// error, though it cannot corrupt list state since the workflow owns
/// nothing but its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmWorkflow {
    target: ConfirmTarget,
}

impl ConfirmWorkflow {
    pub fn open(target: ConfirmTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &ConfirmTarget {
        &self.target
    }

    /// Resolve the workflow. On confirm the action runs exactly once
    /// with the target id; on dismiss it never runs. Failures are
    /// reported through the returned outcome, never by propagating the
    /// error to the caller.
    pub fn resolve<A>(self, decision: ConfirmDecision, action: A) -> ConfirmOutcome
    where
        A: FnOnce(i64) -> Result<()>,
    {
        match decision {
            ConfirmDecision::Dismiss => ConfirmOutcome::Dismissed,
            ConfirmDecision::Confirm => match action(self.target.id) {
                Ok(()) => ConfirmOutcome::Success,
                Err(error) => ConfirmOutcome::Failure(action_error_message(&error)),
            },
        }
    }
}

fn action_error_message(error: &anyhow::Error) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        FALLBACK_ACTION_ERROR.to_owned()
    } else {
        message
    }
}
