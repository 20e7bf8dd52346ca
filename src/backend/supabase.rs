use super::rows::{self, ApplicantRow, ApplicationRow, Endpoint};
use super::{Applicant, Backend, NewProject, SignUpResponse};
use crate::config::AppConfig;
use crate::error::{BackendError, BackendResult};
use crate::models::{Application, Project};
use crate::profile::{NewProfile, ProfileChanges, ProfileRow};
use crate::session::{AuthSession, AuthUser, UserAttributes, UserMetadata};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// GoTrue + PostgREST over HTTPS.
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> BackendResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn headers(&self, session: Option<&AuthSession>) -> HeaderMap {
        let bearer = session
            .map(|session| session.access_token.as_str())
            .unwrap_or(self.anon_key.as_str());
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.anon_key).unwrap_or_else(|_| HeaderValue::from_static("")),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {bearer}"))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn send(&self, endpoint: Endpoint, request: RequestBuilder) -> BackendResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            debug!(status = status.as_u16(), body = %body, "backend request failed");
            Err(rows::error_from_response(endpoint, status.as_u16(), &body))
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> BackendResult<T> {
        let body = self.send(endpoint, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        session: Option<&AuthSession>,
        table: &str,
        query: &[(&str, String)],
    ) -> BackendResult<Vec<T>> {
        let request = self
            .http
            .get(self.rest_url(table))
            .headers(self.headers(session))
            .query(query);
        self.send_json(Endpoint::Rest, request).await
    }

    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        session: Option<&AuthSession>,
        table: &str,
        body: &B,
    ) -> BackendResult<Vec<T>> {
        let request = self
            .http
            .post(self.rest_url(table))
            .headers(self.headers(session))
            .header("Prefer", "return=representation")
            .json(body);
        self.send_json(Endpoint::Rest, request).await
    }

    async fn update<B: Serialize + ?Sized>(
        &self,
        session: &AuthSession,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> BackendResult<()> {
        let request = self
            .http
            .patch(self.rest_url(table))
            .headers(self.headers(Some(session)))
            .header("Prefer", "return=minimal")
            .query(filters)
            .json(body);
        self.send(Endpoint::Rest, request).await.map(|_| ())
    }
}

fn limit_param(query: &mut Vec<(&str, String)>, limit: Option<usize>) {
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthSession> {
        let request = self
            .http
            .post(self.auth_url("/token"))
            .query(&[("grant_type", "password")])
            .headers(self.headers(None))
            .json(&json!({ "email": email, "password": password }));
        let body: Value = self.send_json(Endpoint::Auth, request).await?;
        rows::parse_session(body)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &UserMetadata,
    ) -> BackendResult<SignUpResponse> {
        let request = self
            .http
            .post(self.auth_url("/signup"))
            .headers(self.headers(None))
            .json(&json!({ "email": email, "password": password, "data": metadata }));
        let body: Value = self.send_json(Endpoint::Auth, request).await?;
        let (user, session) = rows::parse_sign_up(body)?;
        Ok(SignUpResponse { user, session })
    }

    async fn sign_out(&self, session: &AuthSession) -> BackendResult<()> {
        let request = self
            .http
            .post(self.auth_url("/logout"))
            .headers(self.headers(Some(session)));
        self.send(Endpoint::Auth, request).await.map(|_| ())
    }

    async fn refresh_session(&self, refresh_token: &str) -> BackendResult<AuthSession> {
        let request = self
            .http
            .post(self.auth_url("/token"))
            .query(&[("grant_type", "refresh_token")])
            .headers(self.headers(None))
            .json(&json!({ "refresh_token": refresh_token }));
        let body: Value = self.send_json(Endpoint::Auth, request).await?;
        rows::parse_session(body)
    }

    async fn update_user(
        &self,
        session: &AuthSession,
        attributes: &UserAttributes,
    ) -> BackendResult<AuthUser> {
        let request = self
            .http
            .put(self.auth_url("/user"))
            .headers(self.headers(Some(session)))
            .json(attributes);
        self.send_json(Endpoint::Auth, request).await
    }

    async fn fetch_profile(&self, session: &AuthSession) -> BackendResult<Option<ProfileRow>> {
        let query = [
            ("select", "*".to_string()),
            ("id", format!("eq.{}", session.user.id)),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<ProfileRow> = self.select(Some(session), "profiles", &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_profile(
        &self,
        session: Option<&AuthSession>,
        profile: &NewProfile,
    ) -> BackendResult<()> {
        let _: Vec<Value> = self.insert(session, "profiles", profile).await?;
        Ok(())
    }

    async fn update_profile(
        &self,
        session: &AuthSession,
        changes: &ProfileChanges,
    ) -> BackendResult<()> {
        let filters = [("id", format!("eq.{}", session.user.id))];
        self.update(session, "profiles", &filters, changes).await
    }

    async fn list_projects(
        &self,
        session: Option<&AuthSession>,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Project>> {
        let mut query = vec![("select", "*".to_string())];
        limit_param(&mut query, limit);
        self.select(session, "projects", &query).await
    }

    async fn fetch_project(
        &self,
        session: Option<&AuthSession>,
        id: &str,
    ) -> BackendResult<Option<Project>> {
        let query = [
            ("select", "*".to_string()),
            ("id", format!("eq.{id}")),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<Project> = self.select(session, "projects", &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_project(
        &self,
        session: &AuthSession,
        project: &NewProject,
    ) -> BackendResult<Project> {
        let mut body = serde_json::to_value(project)?;
        if let Some(object) = body.as_object_mut() {
            object.insert(
                "postedDate".to_string(),
                Value::String(chrono::Utc::now().format("%Y-%m-%d").to_string()),
            );
        }
        let rows: Vec<Project> = self.insert(Some(session), "projects", &body).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("insert returned no project row".to_string()))
    }

    async fn list_applications(
        &self,
        session: &AuthSession,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Application>> {
        let mut query = vec![
            ("select", "*,projects(*)".to_string()),
            ("student_id", format!("eq.{}", session.user.id)),
            ("order", "applied_date.desc".to_string()),
        ];
        limit_param(&mut query, limit);
        let rows: Vec<ApplicationRow> = self.select(Some(session), "applications", &query).await?;
        Ok(rows
            .into_iter()
            .map(ApplicationRow::into_application)
            .collect())
    }

    async fn list_applicants(
        &self,
        session: &AuthSession,
        limit: Option<usize>,
    ) -> BackendResult<Vec<Applicant>> {
        let mut query = vec![("select", "*,profiles(*),projects(*)".to_string())];
        limit_param(&mut query, limit);
        let rows: Vec<ApplicantRow> = self.select(Some(session), "applications", &query).await?;
        Ok(rows.into_iter().map(ApplicantRow::into_applicant).collect())
    }

    async fn insert_application(
        &self,
        session: &AuthSession,
        project_id: &str,
    ) -> BackendResult<()> {
        let body = json!({
            "student_id": session.user.id,
            "project_id": project_id,
            "status": "Under Review",
            "applied_date": chrono::Utc::now().to_rfc3339(),
        });
        let _: Vec<Value> = self.insert(Some(session), "applications", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DurationMatching;
    use std::path::PathBuf;
    use std::time::Duration;

    fn client() -> SupabaseClient {
        let config = AppConfig {
            supabase_url: "https://demo.supabase.co/".to_string(),
            supabase_anon_key: "anon-key".to_string(),
            request_timeout: Duration::from_secs(1),
            duration_matching: DurationMatching::Legacy,
            session_dir: PathBuf::from("/tmp"),
        };
        SupabaseClient::new(&config).expect("client should build")
    }

    #[test]
    fn urls_are_rooted_at_the_project() {
        let client = client();
        assert_eq!(
            client.auth_url("/token"),
            "https://demo.supabase.co/auth/v1/token"
        );
        assert_eq!(
            client.rest_url("profiles"),
            "https://demo.supabase.co/rest/v1/profiles"
        );
    }

    #[test]
    fn anon_requests_use_the_anon_key_as_bearer() {
        let headers = client().headers(None);
        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
            Some("Bearer anon-key")
        );
        assert_eq!(
            headers.get("apikey").and_then(|value| value.to_str().ok()),
            Some("anon-key")
        );
    }

    #[test]
    fn session_requests_use_the_access_token() {
        let session = AuthSession {
            access_token: "user-token".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: None,
            user: AuthUser {
                id: "user-1".to_string(),
                email: None,
                metadata: UserMetadata::default(),
            },
        };
        let headers = client().headers(Some(&session));
        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
            Some("Bearer user-token")
        );
    }
}
