use super::status::{ActionStatus, Generation, Phase, StatusBoard};
use super::{ActionIntent, ActionKind, ActionOutput, GENERIC_FAILURE};
use crate::error::{BackendError, BackendResult};
use crate::event::{ActionEvent, AppEvent, EventSender, OwnerToken};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A spawned task that is aborted when this handle is dropped.
#[derive(Debug)]
pub struct DelayedTask {
    handle: JoinHandle<()>,
}

impl DelayedTask {
    pub fn spawn(runtime: &Handle, task: impl Future<Output = ()> + Send + 'static) -> Self {
        Self {
            handle: runtime.spawn(task),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A completed operation as seen by the page that started it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub intent: ActionIntent,
    pub outcome: BackendResult<ActionOutput>,
    /// False when a newer action of the same kind already owns the status.
    pub current: bool,
}

/// Runs mutations for one page and drives their status lifecycle.
///
/// Operations and revert timers are spawned on the tokio runtime and report
/// back as `AppEvent::Action` addressed to this executor's owner token.
/// Dropping the executor aborts everything it spawned.
pub struct ActionExecutor {
    owner: OwnerToken,
    runtime: Handle,
    events: EventSender,
    timeout: Duration,
    board: StatusBoard,
    reverts: HashMap<ActionKind, DelayedTask>,
    in_flight: Vec<DelayedTask>,
}

impl ActionExecutor {
    pub fn new(owner: OwnerToken, runtime: Handle, events: EventSender, timeout: Duration) -> Self {
        Self {
            owner,
            runtime,
            events,
            timeout,
            board: StatusBoard::default(),
            reverts: HashMap::new(),
            in_flight: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn status(&self, kind: ActionKind) -> &ActionStatus {
        self.board.status(kind)
    }

    pub fn is_busy(&self, kind: ActionKind) -> bool {
        self.board.status(kind).phase() == Phase::InProgress
    }

    pub fn start<F>(&mut self, intent: ActionIntent, operation: F) -> Generation
    where
        F: Future<Output = BackendResult<ActionOutput>> + Send + 'static,
    {
        let kind = intent.kind();
        self.reverts.remove(&kind);
        let generation = self
            .board
            .begin(kind, intent.subject(), intent.pending_message());
        self.in_flight.retain(|task| !task.is_finished());
        debug!(?kind, ?generation, subject = ?intent.subject(), "action started");

        let owner = self.owner;
        let events = self.events.clone();
        let timeout = self.timeout;
        let task = async move {
            let outcome = match tokio::time::timeout(timeout, operation).await {
                Ok(outcome) => outcome,
                Err(_) => Err(BackendError::Timeout),
            };
            events.send(AppEvent::Action {
                owner,
                event: ActionEvent::Settled {
                    generation,
                    intent,
                    outcome,
                },
            });
        };
        self.in_flight.push(DelayedTask::spawn(&self.runtime, task));
        generation
    }

    /// Shows a failure without running anything, e.g. a form that did not validate.
    pub fn fail_now(&mut self, kind: ActionKind, message: impl Into<String>) {
        self.reverts.remove(&kind);
        let generation = self.board.fail_now(kind, None, message);
        self.schedule_revert(kind, generation, Phase::Failed);
    }

    pub fn handle(&mut self, event: ActionEvent) -> Option<Completion> {
        match event {
            ActionEvent::Settled {
                generation,
                intent,
                outcome,
            } => {
                let kind = intent.kind();
                let message = match &outcome {
                    Ok(output) => Ok(intent.message_for(output)),
                    Err(err) => {
                        warn!(?kind, error = %err, "action failed");
                        Err(GENERIC_FAILURE.to_string())
                    }
                };
                let current = match self.board.settle(kind, generation, message) {
                    Some(phase) => {
                        self.schedule_revert(kind, generation, phase);
                        true
                    }
                    None => {
                        debug!(?kind, ?generation, "superseded action settled");
                        false
                    }
                };
                Some(Completion {
                    intent,
                    outcome,
                    current,
                })
            }
            ActionEvent::Expired { kind, generation } => {
                if self.board.expire(kind, generation) {
                    self.reverts.remove(&kind);
                } else {
                    debug!(?kind, ?generation, "ignoring stale revert");
                }
                None
            }
        }
    }

    fn schedule_revert(&mut self, kind: ActionKind, generation: Generation, phase: Phase) {
        let delay = kind.revert_after(phase);
        let owner = self.owner;
        let events = self.events.clone();
        let task = async move {
            tokio::time::sleep(delay).await;
            events.send(AppEvent::Action {
                owner,
                event: ActionEvent::Expired { kind, generation },
            });
        };
        self.reverts
            .insert(kind, DelayedTask::spawn(&self.runtime, task));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::action::ActionIntent;
    use std::sync::mpsc::{self, Receiver};

    pub(crate) fn executor() -> (ActionExecutor, Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let executor = ActionExecutor::new(
            OwnerToken::next(),
            Handle::current(),
            EventSender::new(tx),
            Duration::from_secs(10),
        );
        (executor, rx)
    }

    /// Feeds every queued event for this executor back into it.
    fn pump(executor: &mut ActionExecutor, rx: &Receiver<AppEvent>) -> Vec<Completion> {
        let mut completions = Vec::new();
        for event in rx.try_iter() {
            if let AppEvent::Action { owner, event } = event {
                if owner == executor.owner() {
                    completions.extend(executor.handle(event));
                }
            }
        }
        completions
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn profile_save_runs_full_lifecycle() {
        let (mut executor, rx) = executor();
        executor.start(ActionIntent::ProfileSave, async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(ActionOutput::Done)
        });
        assert_eq!(
            executor.status(ActionKind::ProfileSave).message(),
            "Saving profile..."
        );

        sleep_ms(150).await;
        let completions = pump(&mut executor, &rx);
        assert_eq!(completions.len(), 1);
        assert!(completions[0].current);
        assert_eq!(
            executor.status(ActionKind::ProfileSave).phase(),
            Phase::Succeeded
        );

        sleep_ms(2_900).await;
        pump(&mut executor, &rx);
        assert_eq!(
            executor.status(ActionKind::ProfileSave).phase(),
            Phase::Succeeded
        );

        sleep_ms(200).await;
        pump(&mut executor, &rx);
        assert!(executor.status(ActionKind::ProfileSave).is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operations_time_out_as_failures() {
        let (mut executor, rx) = executor();
        executor.start(ActionIntent::PasswordChange, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ActionOutput::Done)
        });

        sleep_ms(10_001).await;
        let completions = pump(&mut executor, &rx);
        assert!(matches!(
            completions[0].outcome,
            Err(BackendError::Timeout)
        ));
        let status = executor.status(ActionKind::PasswordChange);
        assert_eq!(status.phase(), Phase::Failed);
        assert_eq!(status.message(), GENERIC_FAILURE);
    }

    #[tokio::test(start_paused = true)]
    async fn validation_failure_shows_its_message_then_reverts() {
        let (mut executor, rx) = executor();
        executor.fail_now(ActionKind::PasswordChange, "Passwords do not match.");
        assert_eq!(
            executor.status(ActionKind::PasswordChange).message(),
            "Passwords do not match."
        );

        sleep_ms(3_001).await;
        pump(&mut executor, &rx);
        assert!(executor.status(ActionKind::PasswordChange).is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_revert_timer_never_fires() {
        let (mut executor, rx) = executor();
        executor.fail_now(ActionKind::ProfileSave, "first");
        sleep_ms(2_000).await;
        executor.fail_now(ActionKind::ProfileSave, "second");

        // The first timer would have fired at 3000 ms; the second fires at 5000 ms.
        sleep_ms(1_500).await;
        assert!(rx.try_iter().next().is_none());
        assert_eq!(executor.status(ActionKind::ProfileSave).message(), "second");

        sleep_ms(1_600).await;
        pump(&mut executor, &rx);
        assert!(executor.status(ActionKind::ProfileSave).is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_executor_cancels_pending_work() {
        let (mut executor, rx) = executor();
        executor.start(ActionIntent::ProfileSave, async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(ActionOutput::Done)
        });
        executor.fail_now(ActionKind::PasswordChange, "Passwords do not match.");
        drop(executor);

        sleep_ms(10_000).await;
        assert!(rx.try_iter().next().is_none());
    }
}
