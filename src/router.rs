use crate::models::Role;
use crate::session::AuthState;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Signup,
    Dashboard,
    OrgDashboard,
    Projects,
    ProjectDetail(String),
    Applications,
    Messages,
    Mentors,
    Mentor(u32),
    Leaderboard,
    Settings,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Login => "Sign In",
            Self::Signup => "Sign Up",
            Self::Dashboard => "Dashboard",
            Self::OrgDashboard => "Organization Dashboard",
            Self::Projects => "Browse Projects",
            Self::ProjectDetail(_) => "Project",
            Self::Applications => "My Applications",
            Self::Messages => "Messages",
            Self::Mentors => "Mentors",
            Self::Mentor(_) => "Mentor",
            Self::Leaderboard => "Leaderboard",
            Self::Settings => "Settings",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::OrgDashboard | Self::Settings | Self::Applications | Self::Messages
        )
    }

    /// Pages rendered next to the signed-in sidebar.
    pub fn has_sidebar(&self) -> bool {
        self.requires_auth()
    }

    pub fn home_for(role: Option<Role>) -> Self {
        match role {
            Some(Role::Organization) => Self::OrgDashboard,
            _ => Self::Dashboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Auth is still being restored; show the full-window spinner.
    Pending,
    Show(Route),
}

/// Where a navigation request actually lands given the current auth state.
pub fn resolve(route: &Route, auth: &AuthState) -> Resolved {
    if auth.is_loading() {
        return Resolved::Pending;
    }

    let signed_in = auth.is_authenticated();
    let role = auth.role();
    let target = match route {
        Route::Login | Route::Signup if signed_in => Route::home_for(role),
        route if route.requires_auth() && !signed_in => Route::Login,
        Route::Dashboard if role == Some(Role::Organization) => Route::OrgDashboard,
        Route::OrgDashboard if role == Some(Role::Student) => Route::Dashboard,
        route => route.clone(),
    };
    Resolved::Show(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::session_for;

    fn signed_in(role: Option<Role>) -> AuthState {
        AuthState::Authenticated {
            session: session_for("user-1", "ada@example.com"),
            role,
        }
    }

    #[test]
    fn loading_always_shows_the_spinner() {
        for route in [Route::Landing, Route::Projects, Route::Settings] {
            assert_eq!(resolve(&route, &AuthState::Loading), Resolved::Pending);
        }
    }

    #[test]
    fn protected_routes_send_guests_to_login() {
        let guest = AuthState::Unauthenticated;
        for route in [
            Route::Dashboard,
            Route::OrgDashboard,
            Route::Settings,
            Route::Applications,
            Route::Messages,
        ] {
            assert_eq!(resolve(&route, &guest), Resolved::Show(Route::Login));
        }
    }

    #[test]
    fn public_routes_stay_public() {
        let guest = AuthState::Unauthenticated;
        for route in [
            Route::Landing,
            Route::Projects,
            Route::ProjectDetail("3".to_string()),
            Route::Leaderboard,
            Route::Mentors,
            Route::Mentor(2),
            Route::Login,
        ] {
            assert_eq!(resolve(&route, &guest), Resolved::Show(route.clone()));
        }
    }

    #[test]
    fn auth_pages_redirect_home_once_signed_in() {
        assert_eq!(
            resolve(&Route::Login, &signed_in(Some(Role::Organization))),
            Resolved::Show(Route::OrgDashboard)
        );
        assert_eq!(
            resolve(&Route::Signup, &signed_in(Some(Role::Student))),
            Resolved::Show(Route::Dashboard)
        );
        assert_eq!(
            resolve(&Route::Login, &signed_in(None)),
            Resolved::Show(Route::Dashboard)
        );
    }

    #[test]
    fn dashboards_follow_the_role() {
        assert_eq!(
            resolve(&Route::Dashboard, &signed_in(Some(Role::Organization))),
            Resolved::Show(Route::OrgDashboard)
        );
        assert_eq!(
            resolve(&Route::OrgDashboard, &signed_in(Some(Role::Student))),
            Resolved::Show(Route::Dashboard)
        );
        assert_eq!(
            resolve(&Route::OrgDashboard, &signed_in(None)),
            Resolved::Show(Route::OrgDashboard)
        );
    }
}
