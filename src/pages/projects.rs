use super::widgets::{self, CardClick};
use super::{Load, PageCtx, Services};
use crate::action::{ActionKind, ProjectActions};
use crate::data::{self, Fetched};
use crate::event::{ActionEvent, OwnerToken, PagePayload};
use crate::filter::{DurationBucket, ProjectFilter, SKILL_OPTIONS};
use crate::models::{Project, ProjectType};
use crate::router::Route;
use crate::session::AuthState;
use eframe::egui::{self, RichText};

pub struct ProjectsPage {
    owner: OwnerToken,
    projects: Load<Fetched<Vec<Project>>>,
    actions: ProjectActions,
    filter: ProjectFilter,
}

impl ProjectsPage {
    pub fn new(services: &Services, auth: &AuthState) -> Self {
        let owner = OwnerToken::next();
        let backend = services.backend.clone();
        let session = auth.session().cloned();
        let projects = Load::start(services, owner, async move {
            PagePayload::Projects(data::load_projects(backend.as_ref(), session.as_ref(), None).await)
        });
        Self {
            owner,
            projects,
            actions: services.project_actions(owner, auth),
            filter: ProjectFilter::default(),
        }
    }

    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    pub fn on_payload(&mut self, payload: PagePayload) {
        match payload {
            PagePayload::Projects(projects) => self.projects.finish(projects),
            PagePayload::AppliedProjects(ids) => self.actions.restore_applied(ids),
            _ => {}
        }
    }

    pub fn on_action(&mut self, event: ActionEvent) {
        self.actions.handle(event);
    }

    fn filter_panel(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Filters").strong());
        ui.separator();

        ui.label("Skills");
        for skill in SKILL_OPTIONS {
            let mut on = self.filter.skills.contains(skill);
            if ui.checkbox(&mut on, skill).changed() {
                self.filter.toggle_skill(skill);
            }
        }
        ui.separator();

        ui.label("Duration");
        for bucket in DurationBucket::ALL {
            let mut on = self.filter.durations.contains(&bucket);
            if ui.checkbox(&mut on, bucket.label()).changed() {
                self.filter.toggle_duration(bucket);
            }
        }
        ui.separator();

        ui.label("Project Type");
        for project_type in ProjectType::ALL {
            let mut on = self.filter.types.contains(&project_type);
            if ui.checkbox(&mut on, project_type.label()).changed() {
                self.filter.toggle_type(project_type);
            }
        }

        if self.filter.has_category_filters() || !self.filter.query.is_empty() {
            ui.separator();
            if ui.button("Clear all filters").clicked() {
                self.filter.clear();
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, ctx: &mut PageCtx<'_>) {
        let theme = ctx.theme;
        egui::SidePanel::left("project_filters")
            .resizable(false)
            .default_width(200.0)
            .show_inside(ui, |ui| self.filter_panel(ui));

        widgets::page_header(
            ui,
            theme,
            "Browse Projects",
            "Find micro-internships that match your skills and interests.",
        );
        ui.add(
            egui::TextEdit::singleline(&mut self.filter.query)
                .hint_text("Search projects, organizations or skills...")
                .desired_width(f32::INFINITY),
        );

        let Some(projects) = self.projects.ready() else {
            widgets::loading(ui, "Loading projects...");
            return;
        };
        widgets::fallback_note(ui, theme, projects);
        widgets::status_banner(ui, theme, self.actions.status(ActionKind::Apply));
        widgets::status_banner(ui, theme, self.actions.status(ActionKind::Save));

        let mode = ctx.services.config.duration_matching;
        let visible = self.filter.apply(projects.data(), mode);
        let open = self.actions.eligible(projects.data()).len();
        ui.label(
            RichText::new(format!("{} projects found • {open} open to apply", visible.len()))
                .color(theme.text_muted),
        );

        let mut clicked: Option<(CardClick, Project)> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if visible.is_empty() {
                ui.label("No projects match your filters.");
            }
            for project in visible {
                if let Some(click) = widgets::project_card(ui, theme, project, Some(&self.actions)) {
                    clicked = Some((click, project.clone()));
                }
            }
        });

        let live = projects.is_live();
        match clicked {
            Some((CardClick::Apply, project)) => {
                let remote = ctx.services.remote_apply(ctx.auth, live);
                self.actions.apply(&project, remote);
            }
            Some((CardClick::ToggleSave, project)) => {
                self.actions.toggle_save(&project);
            }
            Some((CardClick::Details, project)) => {
                ctx.navigate(Route::ProjectDetail(project.id));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{session_for, FakeBackend, FakeCall};
    use crate::event::AppEvent;
    use crate::models::Role;
    use crate::pages::tests::services;
    use crate::samples;
    use std::sync::mpsc::Receiver;
    use std::sync::Arc;
    use std::time::Duration;

    async fn settle(page: &mut ProjectsPage, rx: &Receiver<AppEvent>) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        for event in rx.try_iter() {
            match event {
                AppEvent::Page { owner, payload } if owner == page.owner() => {
                    page.on_payload(payload)
                }
                AppEvent::Action { owner, event } if owner == page.owner() => page.on_action(event),
                _ => {}
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn remounted_page_refuses_a_second_application() {
        let backend = Arc::new(FakeBackend::default());
        backend.set_projects(Ok(samples::projects()));
        let (services, rx) = services(backend.clone());
        let auth = AuthState::Authenticated {
            session: session_for("user-1", "ada@example.com"),
            role: Some(Role::Student),
        };
        let target = samples::project("6").expect("sample project exists");

        let mut page = ProjectsPage::new(&services, &auth);
        assert!(!page.actions.can_apply("6"));
        settle(&mut page, &rx).await;
        assert!(page.projects.ready().is_some_and(|projects| projects.is_live()));
        assert!(page.actions.can_apply("6"));
        assert!(page
            .actions
            .apply(&target, services.remote_apply(&auth, true))
            .is_some());
        settle(&mut page, &rx).await;
        assert!(page.actions.is_applied("6"));
        drop(page);

        let mut page = ProjectsPage::new(&services, &auth);
        settle(&mut page, &rx).await;
        assert!(page.actions.is_applied("6"));
        assert!(page
            .actions
            .apply(&target, services.remote_apply(&auth, true))
            .is_none());
        let inserts = backend
            .calls()
            .into_iter()
            .filter(|call| matches!(call, FakeCall::InsertApplication(_)))
            .count();
        assert_eq!(inserts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn signed_out_visitors_can_apply_right_away() {
        let (services, _rx) = services(Arc::new(FakeBackend::default()));
        let page = ProjectsPage::new(&services, &AuthState::Unauthenticated);
        assert!(!page.actions.is_checking_applied());
        assert!(page.actions.can_apply("1"));
    }
}
