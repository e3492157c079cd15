use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::models::Ack;
use crate::services::{scheduler, Analyzer};

pub async fn serve(config: &Config, analyzer: Arc<Analyzer>, port: u16) -> anyhow::Result<()> {
    scheduler::spawn(analyzer.clone(), config.schedule, config.startup_delay);

    let app = create_router().with_state(analyzer);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Scoreless Scout listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router() -> Router<Arc<Analyzer>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/run", get(run_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn health_check() -> Json<Ack> {
    Json(Ack::ok("Scoreless Scout is running"))
}

// GET /run - run the daily analysis now; always acknowledges.
// The run lives in its own task, so a client that hangs up does not cut it short.
async fn run_handler(State(analyzer): State<Arc<Analyzer>>) -> Json<Ack> {
    scheduler::run_guarded(&analyzer, "Manual").await;
    Json(Ack::ok("Daily analysis executed manually. Check Telegram."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::task::Poll;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::ScanPolicy;
    use crate::services::analyzer::ScanSettings;
    use crate::services::api_football::FootballSource;
    use crate::services::fakes::{fixture, FakeNotifier, FakeSource, PanickingSource};
    use crate::services::selector::PriorityLeagues;

    fn app(source: Arc<dyn FootballSource>) -> Router {
        let settings = ScanSettings {
            policy: ScanPolicy::Global { exploratory_cap: 50 },
            priority: PriorityLeagues::new(&[39]),
            season_override: None,
            timezone: "UTC".to_string(),
        };
        let analyzer = Arc::new(Analyzer::new(source, Arc::new(FakeNotifier::default()), settings));
        create_router().with_state(analyzer)
    }

    #[tokio::test]
    async fn test_run_endpoint_acknowledges() {
        let source = Arc::new(FakeSource::default());
        let response = app(source.clone())
            .oneshot(Request::builder().uri("/run").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(source.calls(), vec!["fixtures"]);
    }

    #[tokio::test]
    async fn test_run_endpoint_acknowledges_a_panicking_run() {
        let response = app(Arc::new(PanickingSource))
            .oneshot(Request::builder().uri("/run").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_survives_client_disconnect() {
        let fixtures = (0..20)
            .map(|i| fixture(i, 39, "NS", Some(2023), (100 + i as u32, "Home"), (200 + i as u32, "Away")))
            .collect();
        let source = Arc::new(FakeSource::default().with_fixtures(fixtures));

        let mut request = Box::pin(
            app(source.clone()).oneshot(Request::builder().uri("/run").body(Body::empty()).unwrap()),
        );
        for _ in 0..3 {
            let pending = std::future::poll_fn(|cx| Poll::Ready(request.as_mut().poll(cx).is_pending())).await;
            assert!(pending);
            tokio::task::yield_now().await;
        }
        drop(request);
        assert!(source.calls().len() < 41);

        tokio::time::sleep(Duration::from_secs(5)).await;
        // One fixtures query, then a lookback for each side of each fixture.
        assert_eq!(source.calls().len(), 41);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(FakeSource::default()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
