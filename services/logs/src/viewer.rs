//! Log viewer: service selector, query form and result output

use common::{ClientError, Outcome, PanelClient, StatusMessage, Upstream};
use serde::Deserialize;
use tracing::{error, info};

use crate::query::{LogQuery, QueryForm, today_iso};

pub const SERVICES_PATH: &str = "/api/dlogs/services";
pub const VIEW_PATH: &str = "/api/dlogs/view";

pub const NO_SERVICES: &str = "(no services)";
/// Notice shown while a query is in flight
pub const LOADING: &str = "Loading…";

/// Response of the services endpoint; a missing or null list is empty
#[derive(Debug, Deserialize)]
pub struct ServicesResponse {
    pub services: Option<Vec<String>>,
}

/// Response of the view endpoint; a missing or null list is empty
#[derive(Debug, Deserialize)]
pub struct LinesResponse {
    pub lines: Option<Vec<String>>,
}

/// One entry of the service selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOption {
    pub value: String,
    pub label: String,
}

/// What the logs page currently shows
#[derive(Debug, Clone, Default)]
pub struct LogsView {
    pub services: Vec<ServiceOption>,
    pub form: QueryForm,
    pub output: String,
    pub message: StatusMessage,
}

/// Log viewer page
pub struct LogViewer {
    client: PanelClient,
    view: LogsView,
}

impl LogViewer {
    pub fn new(client: PanelClient) -> Self {
        Self {
            client,
            view: LogsView::default(),
        }
    }

    pub fn view(&self) -> &LogsView {
        &self.view
    }

    pub fn form_mut(&mut self) -> &mut QueryForm {
        &mut self.view.form
    }

    /// Page initialisation: today's date in the form, then the service list
    pub async fn load(&mut self) -> Outcome {
        self.view.form.date = today_iso();
        self.load_services().await
    }

    /// Fill the service selector; the first option ends up selected
    pub async fn load_services(&mut self) -> Outcome {
        let outcome = match self
            .client
            .get_json_body::<ServicesResponse>(Upstream::Api, SERVICES_PATH)
            .await
        {
            Ok(response) => {
                let services = response.services.unwrap_or_default();
                info!("Loaded {} log services", services.len());
                self.view.services = if services.is_empty() {
                    vec![ServiceOption {
                        value: String::new(),
                        label: NO_SERVICES.to_string(),
                    }]
                } else {
                    services
                        .into_iter()
                        .map(|s| ServiceOption {
                            value: s.clone(),
                            label: s,
                        })
                        .collect()
                };
                self.view.form.service = self
                    .view
                    .services
                    .first()
                    .map(|opt| opt.value.clone())
                    .unwrap_or_default();
                Outcome::default()
            }
            Err(e) => failure(e),
        };

        self.finish(outcome)
    }

    /// Run the query described by the form
    pub async fn run_query(&mut self) -> Outcome {
        self.view.message = StatusMessage::cleared();
        self.view.output.clear();

        let query = match LogQuery::from_form(&self.view.form, &today_iso()) {
            Ok(query) => query,
            Err(msg) => return self.finish(Outcome::stay(StatusMessage::error(msg))),
        };

        info!(
            "Querying logs of {} on {} (limit {})",
            query.service, query.date, query.limit
        );

        let path = format!("{}?{}", VIEW_PATH, query.to_query_string());
        let outcome = match self
            .client
            .get_json_body::<LinesResponse>(Upstream::Api, &path)
            .await
        {
            Ok(response) => {
                let lines = response.lines.unwrap_or_default();
                let count = lines.len();
                self.view.output = lines.join("\n");
                Outcome::stay(StatusMessage::info(format!("Results: {}", count)))
            }
            Err(e) => failure(e),
        };

        self.finish(outcome)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.view.message = outcome.message.clone();
        outcome
    }
}

fn failure(err: ClientError) -> Outcome {
    match err {
        ClientError::Unauthorized => Outcome::session_lost(),
        e => {
            error!("Log viewer request failed: {}", e);
            Outcome::stay(StatusMessage::error(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use common::test_support::Fixture;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::query::{DEFAULT_LIMIT, SELECT_SERVICE};

    type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    async fn view(State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>) -> Response {
        seen.lock().await.push(params.clone());
        match params.get("service").map(String::as_str) {
            Some("api") => Json(json!({ "lines": ["a ERROR 1", "b ERROR 2"] })).into_response(),
            Some("quiet") => Json(json!({})).into_response(),
            Some("null") => Json(json!({ "lines": null })).into_response(),
            Some("plain") => r#"{"lines":["plain 1"]}"#.into_response(),
            _ => (StatusCode::NOT_FOUND, "service not found").into_response(),
        }
    }

    async fn setup(services: serde_json::Value) -> (LogViewer, Fixture, Seen) {
        let seen: Seen = Arc::default();
        let router = Router::new()
            .route(
                SERVICES_PATH,
                get(move || {
                    let services = services.clone();
                    async move { Json(services) }
                }),
            )
            .route(VIEW_PATH, get(view))
            .with_state(seen.clone());

        let fixture = Fixture::new(router).await.logged_in("tok");
        (LogViewer::new(fixture.client.clone()), fixture, seen)
    }

    #[tokio::test]
    async fn test_load_populates_services_and_date() {
        let (mut viewer, _fixture, _seen) = setup(json!({ "services": ["api", "bot"] })).await;

        let outcome = viewer.load().await;

        assert!(!outcome.message.is_error());
        assert_eq!(viewer.view().form.date, today_iso());
        let labels: Vec<&str> = viewer
            .view()
            .services
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, ["api", "bot"]);
        assert_eq!(viewer.view().form.service, "api");
    }

    #[tokio::test]
    async fn test_empty_service_list_shows_placeholder() {
        let (mut viewer, _fixture, seen) = setup(json!({ "services": [] })).await;

        viewer.load().await;

        assert_eq!(
            viewer.view().services,
            [ServiceOption {
                value: String::new(),
                label: NO_SERVICES.to_string()
            }]
        );

        // The placeholder selects nothing, so querying is refused locally
        let outcome = viewer.run_query().await;
        assert_eq!(outcome.message, StatusMessage::error(SELECT_SERVICE));
        assert_eq!(viewer.view().output, "");
        assert!(seen.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_query_renders_lines() {
        let (mut viewer, _fixture, seen) = setup(json!({ "services": ["api"] })).await;
        viewer.load().await;
        {
            let form = viewer.form_mut();
            form.pattern = "ERROR".to_string();
            form.limit = "-5".to_string();
            form.date.clear();
        }

        let outcome = viewer.run_query().await;

        assert_eq!(outcome.message, StatusMessage::info("Results: 2"));
        assert_eq!(viewer.view().output, "a ERROR 1\nb ERROR 2");

        let seen = seen.lock().await;
        let params = &seen[0];
        assert_eq!(params["service"], "api");
        assert_eq!(params["pattern"], "ERROR");
        assert_eq!(params["limit"], DEFAULT_LIMIT.to_string());
        assert_eq!(params["date"], today_iso());
    }

    #[tokio::test]
    async fn test_query_without_pattern_omits_key() {
        let (mut viewer, _fixture, seen) = setup(json!({ "services": ["quiet"] })).await;
        viewer.load().await;
        viewer.form_mut().limit = "50".to_string();

        let outcome = viewer.run_query().await;

        assert_eq!(outcome.message, StatusMessage::info("Results: 0"));
        let seen = seen.lock().await;
        assert!(!seen[0].contains_key("pattern"));
        assert_eq!(seen[0]["limit"], "50");
    }

    #[tokio::test]
    async fn test_query_error_clears_output() {
        let (mut viewer, _fixture, _seen) = setup(json!({ "services": ["gone"] })).await;
        viewer.load().await;

        let outcome = viewer.run_query().await;

        assert_eq!(outcome.message, StatusMessage::error("404: service not found"));
        assert_eq!(viewer.view().output, "");
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let router = Router::new().route(
            SERVICES_PATH,
            get(|| async { (StatusCode::UNAUTHORIZED, "missing/invalid X-Auth") }),
        );
        let fixture = Fixture::new(router).await.logged_in("stale");
        let mut viewer = LogViewer::new(fixture.client.clone());

        let outcome = viewer.load().await;

        assert!(outcome.is_login_redirect());
        assert_eq!(fixture.token(), None);
    }

    #[tokio::test]
    async fn test_null_lists_are_empty() {
        let (mut viewer, _fixture, _seen) = setup(json!({ "services": null })).await;

        let outcome = viewer.load().await;

        assert!(!outcome.message.is_error());
        assert_eq!(viewer.view().services[0].label, NO_SERVICES);

        viewer.form_mut().service = "null".to_string();
        let outcome = viewer.run_query().await;

        assert_eq!(outcome.message, StatusMessage::info("Results: 0"));
        assert_eq!(viewer.view().output, "");
    }

    #[tokio::test]
    async fn test_json_served_as_text_is_parsed() {
        let router = Router::new()
            .route(
                SERVICES_PATH,
                get(|| async { r#"{"services":["plain"]}"# }),
            )
            .route(VIEW_PATH, get(view))
            .with_state(Seen::default());
        let fixture = Fixture::new(router).await.logged_in("tok");
        let mut viewer = LogViewer::new(fixture.client.clone());

        let outcome = viewer.load().await;
        assert!(!outcome.message.is_error());
        assert_eq!(viewer.view().form.service, "plain");

        let outcome = viewer.run_query().await;
        assert_eq!(outcome.message, StatusMessage::info("Results: 1"));
        assert_eq!(viewer.view().output, "plain 1");
    }

    #[tokio::test]
    async fn test_query_clears_previous_output() {
        let (mut viewer, _fixture, _seen) = setup(json!({ "services": ["api"] })).await;
        viewer.load().await;
        viewer.run_query().await;
        assert!(!viewer.view().output.is_empty());

        viewer.form_mut().service = "gone".to_string();
        viewer.run_query().await;

        assert_eq!(viewer.view().output, "");
    }
}
