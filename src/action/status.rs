use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Apply,
    Save,
    ProfileSave,
    PasswordChange,
    PostProject,
}

impl ActionKind {
    #[cfg(test)]
    pub const ALL: [ActionKind; 5] = [
        Self::Apply,
        Self::Save,
        Self::ProfileSave,
        Self::PasswordChange,
        Self::PostProject,
    ];

    /// Stand-in latency for operations that have no backend table behind them.
    pub fn simulated_latency(self) -> Duration {
        match self {
            Self::Apply => Duration::from_millis(1500),
            Self::Save | Self::ProfileSave | Self::PasswordChange | Self::PostProject => {
                Duration::from_millis(800)
            }
        }
    }

    /// How long a settled status stays visible before reverting to idle.
    pub fn revert_after(self, phase: Phase) -> Duration {
        match (self, phase) {
            (Self::Apply, Phase::Succeeded) => Duration::from_millis(5000),
            _ => Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InProgress,
    Succeeded,
    Failed,
}

/// Visible status of one action kind. `Idle` never carries a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionStatus {
    subject: Option<String>,
    phase: Phase,
    message: String,
}

static IDLE: ActionStatus = ActionStatus::idle();

impl ActionStatus {
    pub const fn idle() -> Self {
        Self {
            subject: None,
            phase: Phase::Idle,
            message: String::new(),
        }
    }

    #[cfg(test)]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_in_progress_for(&self, subject: &str) -> bool {
        self.phase == Phase::InProgress && self.subject.as_deref() == Some(subject)
    }
}

/// Monotonic per-kind counter; a settle or expiry carrying an older value is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

#[derive(Debug)]
struct Slot {
    status: ActionStatus,
    generation: Generation,
}

#[derive(Debug, Default)]
pub struct StatusBoard {
    slots: HashMap<ActionKind, Slot>,
}

impl StatusBoard {
    pub fn status(&self, kind: ActionKind) -> &ActionStatus {
        self.slots
            .get(&kind)
            .map(|slot| &slot.status)
            .unwrap_or(&IDLE)
    }

    fn advance(&mut self, kind: ActionKind, status: ActionStatus) -> Generation {
        let slot = self.slots.entry(kind).or_insert(Slot {
            status: ActionStatus::idle(),
            generation: Generation(0),
        });
        slot.generation = Generation(slot.generation.0 + 1);
        slot.status = status;
        slot.generation
    }

    /// Overwrites whatever is showing for `kind`; there is no queue.
    pub fn begin(
        &mut self,
        kind: ActionKind,
        subject: Option<String>,
        message: impl Into<String>,
    ) -> Generation {
        self.advance(
            kind,
            ActionStatus {
                subject,
                phase: Phase::InProgress,
                message: message.into(),
            },
        )
    }

    /// Failure that never reached the backend, e.g. form validation.
    pub fn fail_now(
        &mut self,
        kind: ActionKind,
        subject: Option<String>,
        message: impl Into<String>,
    ) -> Generation {
        self.advance(
            kind,
            ActionStatus {
                subject,
                phase: Phase::Failed,
                message: message.into(),
            },
        )
    }

    /// Applies a completion. Returns the settled phase, or `None` when the
    /// completion belongs to a superseded action.
    pub fn settle(
        &mut self,
        kind: ActionKind,
        generation: Generation,
        outcome: Result<String, String>,
    ) -> Option<Phase> {
        let slot = self.slots.get_mut(&kind)?;
        if slot.generation != generation || slot.status.phase != Phase::InProgress {
            return None;
        }
        let (phase, message) = match outcome {
            Ok(message) => (Phase::Succeeded, message),
            Err(message) => (Phase::Failed, message),
        };
        slot.status.phase = phase;
        slot.status.message = message;
        Some(phase)
    }

    /// Reverts a settled status to idle unless something newer replaced it.
    pub fn expire(&mut self, kind: ActionKind, generation: Generation) -> bool {
        let Some(slot) = self.slots.get_mut(&kind) else {
            return false;
        };
        let settled = matches!(slot.status.phase, Phase::Succeeded | Phase::Failed);
        if slot.generation != generation || !settled {
            return false;
        }
        slot.status = ActionStatus::idle();
        true
    }
}
