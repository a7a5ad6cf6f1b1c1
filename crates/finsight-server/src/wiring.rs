use axum::{
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::analysis::{self, AnalysisProxy};

pub fn build_app(state: api::AppState, proxy: AnalysisProxy) -> Router {
    api::app(state)
        .merge(static_routes())
        .merge(analysis::routes(proxy))
        .route("/health", get(healthcheck))
}

fn static_routes() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(app_js))
}

async fn healthcheck() -> &'static str {
    "ok"
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], ui::styles_css())
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ui::app_js(),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use sim_core::SimConfig;
    use tower::ServiceExt;

    use crate::analysis::AnalysisProxy;

    fn test_app() -> axum::Router {
        super::build_app(
            api::AppState::with_seed(SimConfig::default(), 7, 0),
            AnalysisProxy::new("http://127.0.0.1:1"),
        )
    }

    #[tokio::test]
    async fn server_healthcheck_responds_ok() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn root_serves_the_dashboard_shell() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Virtual Wallet"));
    }

    #[tokio::test]
    async fn stylesheet_is_served_as_css() {
        let response = test_app()
            .oneshot(
                Request::get("/static/styles.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );
    }

    #[tokio::test]
    async fn simulator_routes_are_reachable_through_the_merged_app() {
        let response = test_app()
            .oneshot(
                Request::get("/simulator/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
