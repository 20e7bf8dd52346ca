//! Apply and save/unsave for project cards, shared by the listing and the
//! detail page.

use super::executor::{ActionExecutor, DelayedTask};
use super::membership::MembershipSet;
use super::status::{ActionStatus, Generation};
use super::{ActionIntent, ActionKind, ActionOutput};
use crate::backend::Backend;
use crate::error::BackendResult;
use crate::event::{ActionEvent, OwnerToken};
use crate::models::Project;
use crate::session::AuthSession;
use std::sync::Arc;
use tracing::info;

/// A signed-in session plus the backend to write the application row to.
#[derive(Clone)]
pub struct RemoteApply {
    pub backend: Arc<dyn Backend>,
    pub session: AuthSession,
}

pub struct ProjectActions {
    executor: ActionExecutor,
    applied: MembershipSet,
    saved: MembershipSet,
    /// Ids with a save or unsave still running; their toggle stays disabled.
    saving: MembershipSet,
    /// Lookup of the user's existing applications; apply waits for it.
    applied_load: Option<DelayedTask>,
}

async fn simulated(kind: ActionKind) -> BackendResult<ActionOutput> {
    tokio::time::sleep(kind.simulated_latency()).await;
    Ok(ActionOutput::Done)
}

impl ProjectActions {
    pub fn new(executor: ActionExecutor) -> Self {
        Self {
            executor,
            applied: MembershipSet::default(),
            saved: MembershipSet::default(),
            saving: MembershipSet::default(),
            applied_load: None,
        }
    }

    /// Keeps apply disabled until [`ProjectActions::restore_applied`] runs.
    /// Dropping the actions aborts `load`.
    pub fn awaiting_applied(mut self, load: DelayedTask) -> Self {
        self.applied_load = Some(load);
        self
    }

    /// Seeds the applied set with applications that already exist server-side.
    pub fn restore_applied(&mut self, project_ids: impl IntoIterator<Item = String>) {
        for project_id in project_ids {
            self.applied.insert(project_id);
        }
        self.applied_load = None;
    }

    #[cfg(test)]
    pub fn owner(&self) -> OwnerToken {
        self.executor.owner()
    }

    pub fn status(&self, kind: ActionKind) -> &ActionStatus {
        self.executor.status(kind)
    }

    pub fn is_applied(&self, project_id: &str) -> bool {
        self.applied.contains(project_id)
    }

    pub fn is_saved(&self, project_id: &str) -> bool {
        self.saved.contains(project_id)
    }

    pub fn is_saving(&self, project_id: &str) -> bool {
        self.saving.contains(project_id)
    }

    pub fn is_checking_applied(&self) -> bool {
        self.applied_load.is_some()
    }

    pub fn can_apply(&self, project_id: &str) -> bool {
        !self.is_checking_applied()
            && !self.applied.contains(project_id)
            && !self.executor.is_busy(ActionKind::Apply)
    }

    pub fn can_toggle_save(&self, project_id: &str) -> bool {
        !self.is_saving(project_id)
    }

    /// Projects the user can still apply to.
    pub fn eligible<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        projects
            .iter()
            .filter(|project| !self.applied.contains(&project.id))
            .collect()
    }

    /// Writes an `applications` row when `remote` is given, otherwise stands
    /// in with a delay. Returns `None` when applying is not allowed right now.
    pub fn apply(&mut self, project: &Project, remote: Option<RemoteApply>) -> Option<Generation> {
        if !self.can_apply(&project.id) {
            return None;
        }
        let intent = ActionIntent::Apply {
            project_id: project.id.clone(),
            title: project.title.clone(),
        };
        let project_id = project.id.clone();
        let generation = match remote {
            Some(RemoteApply { backend, session }) => self.executor.start(intent, async move {
                backend
                    .insert_application(&session, &project_id)
                    .await
                    .map(|()| ActionOutput::Done)
            }),
            None => self
                .executor
                .start(intent, simulated(ActionKind::Apply)),
        };
        Some(generation)
    }

    /// Flips saved membership once the (simulated) write completes.
    pub fn toggle_save(&mut self, project: &Project) -> Option<Generation> {
        if !self.can_toggle_save(&project.id) {
            return None;
        }
        let project_id = project.id.clone();
        let title = project.title.clone();
        self.saving.insert(project_id.as_str());
        let intent = if self.saved.contains(&project.id) {
            ActionIntent::Unsave { project_id, title }
        } else {
            ActionIntent::Save { project_id, title }
        };
        Some(self.executor.start(intent, simulated(ActionKind::Save)))
    }

    /// Membership follows every successful completion, even one whose status
    /// was already replaced by a newer action.
    pub fn handle(&mut self, event: ActionEvent) {
        let Some(completion) = self.executor.handle(event) else {
            return;
        };
        if let ActionIntent::Save { project_id, .. } | ActionIntent::Unsave { project_id, .. } =
            &completion.intent
        {
            self.saving.remove(project_id);
        }
        if completion.outcome.is_err() {
            return;
        }
        match completion.intent {
            ActionIntent::Apply { project_id, .. } => {
                info!(project_id = %project_id, "applied to project");
                self.applied.insert(project_id);
            }
            ActionIntent::Save { project_id, .. } => {
                self.saved.insert(project_id);
            }
            ActionIntent::Unsave { project_id, .. } => {
                self.saved.remove(&project_id);
            }
            ActionIntent::ProfileSave
            | ActionIntent::PasswordChange
            | ActionIntent::PostProject { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::executor::tests::executor;
    use crate::action::Phase;
    use crate::backend::fake::{session_for, FakeBackend, FakeCall};
    use crate::event::AppEvent;
    use crate::samples;
    use std::sync::mpsc::Receiver;
    use std::time::Duration;

    fn actions() -> (ProjectActions, Receiver<AppEvent>) {
        let (executor, rx) = executor();
        (ProjectActions::new(executor), rx)
    }

    fn pump(actions: &mut ProjectActions, rx: &Receiver<AppEvent>) {
        for event in rx.try_iter() {
            if let AppEvent::Action { owner, event } = event {
                if owner == actions.owner() {
                    actions.handle(event);
                }
            }
        }
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn project(id: &str) -> Project {
        samples::project(id).expect("sample project exists")
    }

    #[tokio::test(start_paused = true)]
    async fn apply_marks_project_applied_and_reverts_after_five_seconds() {
        let (mut actions, rx) = actions();
        let projects = samples::projects();
        let target = project("3");
        assert!(actions.status(ActionKind::Apply).is_idle());

        assert!(actions.apply(&target, None).is_some());
        let status = actions.status(ActionKind::Apply);
        assert!(status.is_in_progress_for("3"));
        assert_eq!(status.message(), "Submitting your application...");
        assert!(!actions.can_apply("4"));

        advance(1_600).await;
        pump(&mut actions, &rx);
        assert!(actions.is_applied("3"));
        assert!(!actions.can_apply("3"));
        assert_eq!(actions.status(ActionKind::Apply).phase(), Phase::Succeeded);
        assert!(actions
            .status(ActionKind::Apply)
            .message()
            .contains(&target.title));
        assert_eq!(actions.eligible(&projects).len(), projects.len() - 1);
        assert!(actions.eligible(&projects).iter().all(|p| p.id != "3"));

        advance(4_900).await;
        pump(&mut actions, &rx);
        assert_eq!(actions.status(ActionKind::Apply).phase(), Phase::Succeeded);

        advance(200).await;
        pump(&mut actions, &rx);
        assert!(actions.status(ActionKind::Apply).is_idle());
        assert_eq!(actions.status(ActionKind::Apply).subject(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn applying_twice_is_refused() {
        let (mut actions, rx) = actions();
        let target = project("1");
        actions.apply(&target, None);
        assert!(actions.apply(&target, None).is_none());

        advance(1_600).await;
        pump(&mut actions, &rx);
        assert!(actions.apply(&target, None).is_none());
        assert!(actions.is_applied("1"));
        assert!(!actions.is_applied("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn save_then_unsave_restores_the_saved_set() {
        let (mut actions, rx) = actions();
        let target = project("2");
        actions.saved.insert("5");
        let before = actions.saved.clone();

        actions.toggle_save(&target);
        assert_eq!(actions.status(ActionKind::Save).message(), "Saving project...");
        assert!(!actions.can_toggle_save("2"));
        assert!(actions.toggle_save(&target).is_none());
        advance(850).await;
        pump(&mut actions, &rx);
        assert!(actions.is_saved("2"));

        actions.toggle_save(&target);
        assert_eq!(
            actions.status(ActionKind::Save).message(),
            "Removing from saved projects..."
        );
        advance(850).await;
        pump(&mut actions, &rx);
        assert_eq!(actions.saved, before);
        assert_eq!(actions.status(ActionKind::Save).phase(), Phase::Succeeded);

        advance(3_001).await;
        pump(&mut actions, &rx);
        assert!(actions.status(ActionKind::Save).is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_saves_keep_both_memberships_and_one_status() {
        let (mut actions, rx) = actions();
        actions.toggle_save(&project("1"));
        advance(400).await;
        actions.toggle_save(&project("2"));
        assert!(actions.status(ActionKind::Save).is_in_progress_for("2"));

        // First completion is stale for display but still saves project 1.
        advance(500).await;
        pump(&mut actions, &rx);
        assert!(actions.is_saved("1"));
        assert!(actions.status(ActionKind::Save).is_in_progress_for("2"));

        advance(400).await;
        pump(&mut actions, &rx);
        assert!(actions.is_saved("2"));
        assert_eq!(actions.status(ActionKind::Save).phase(), Phase::Succeeded);

        advance(3_001).await;
        pump(&mut actions, &rx);
        assert!(actions.status(ActionKind::Save).is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn save_toggle_stays_disabled_while_its_own_save_runs() {
        let (mut actions, rx) = actions();
        actions.toggle_save(&project("1"));
        advance(100).await;
        actions.toggle_save(&project("2"));
        assert!(actions.status(ActionKind::Save).is_in_progress_for("2"));

        assert!(!actions.can_toggle_save("1"));
        assert!(actions.toggle_save(&project("1")).is_none());

        advance(800).await;
        pump(&mut actions, &rx);
        assert!(actions.is_saved("1"));
        assert!(actions.is_saved("2"));
        assert!(actions.can_toggle_save("1"));
        assert!(actions.can_toggle_save("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn apply_waits_for_existing_applications() {
        let (executor, _rx) = executor();
        let load = DelayedTask::spawn(&tokio::runtime::Handle::current(), std::future::pending());
        let mut actions = ProjectActions::new(executor).awaiting_applied(load);
        assert!(actions.is_checking_applied());
        assert!(!actions.can_apply("6"));
        assert!(actions.apply(&project("6"), None).is_none());

        actions.restore_applied(vec!["6".to_string()]);
        assert!(!actions.is_checking_applied());
        assert!(actions.is_applied("6"));
        assert!(!actions.can_apply("6"));
        assert!(actions.can_apply("1"));
    }

    #[tokio::test(start_paused = true)]
    async fn live_projects_write_an_application_row() {
        let (mut actions, rx) = actions();
        let backend = Arc::new(FakeBackend::default());
        let remote = RemoteApply {
            backend: backend.clone(),
            session: session_for("user-1", "ada@example.com"),
        };

        actions.apply(&project("6"), Some(remote));
        advance(10).await;
        pump(&mut actions, &rx);

        assert!(actions.is_applied("6"));
        assert_eq!(
            backend.calls(),
            vec![FakeCall::InsertApplication("6".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn events_for_another_owner_are_ignored() {
        let (mut first, first_rx) = actions();
        let (mut second, _second_rx) = actions();
        first.apply(&project("1"), None);

        advance(1_600).await;
        for event in first_rx.try_iter() {
            if let AppEvent::Action { owner, event } = event {
                if owner == second.owner() {
                    second.handle(event);
                }
            }
        }
        assert!(!second.is_applied("1"));
        assert!(!first.is_applied("1"));
    }
}
