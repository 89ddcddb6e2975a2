use std::sync::Arc;

use api_adapters::{router, AppState, Metrics};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use domains::{
    AuthError, Donation, Donor, GenerationError, GenerationParams, MockSessionVerifier,
    MockTextGenerator, Session,
};
use serde_json::Value;
use services::{OutreachService, ReportService};
use storage_adapters::InMemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

const TOKEN: &str = "valid-token";

fn sessions() -> MockSessionVerifier {
    let mut sessions = MockSessionVerifier::new();
    sessions.expect_verify().returning(|token| {
        if token == TOKEN {
            Ok(Session {
                user_id: Uuid::nil(),
                organization_id: None,
            })
        } else {
            Err(AuthError::Invalid("bad signature".into()))
        }
    });
    sessions
}

fn donor(first: &str, total: f64, tags: &[&str]) -> Donor {
    Donor {
        id: Uuid::new_v4(),
        organization_id: Uuid::nil(),
        first_name: first.into(),
        last_name: "Doe".into(),
        email: None,
        phone: None,
        donor_type: "individual".into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        total_donated: total,
        donation_count: 2,
        first_donation_date: None,
        last_donation_date: None,
        created_at: Utc::now(),
    }
}

fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.insert_donor(donor("Ada", 5000.0, &["major_donor"]));
    store.insert_donor(donor("Bo", 120.0, &["monthly"]));
    store.insert_donation(Donation {
        id: Uuid::new_v4(),
        donor_id: Uuid::new_v4(),
        campaign_id: None,
        amount: 100.0,
        donation_date: Utc::now() - Duration::days(3),
        payment_method: "card".into(),
    });
    store
}

fn app(store: Arc<InMemoryStore>, generator: MockTextGenerator) -> (Router, Arc<Metrics>) {
    let generator = Arc::new(generator);
    let metrics = Arc::new(Metrics::new());
    let state = AppState {
        reports: Arc::new(ReportService::new(
            store.clone(),
            store.clone(),
            generator.clone(),
            GenerationParams::default(),
            Uuid::nil(),
        )),
        outreach: Arc::new(OutreachService::new(
            store.clone(),
            generator,
            GenerationParams::default(),
        )),
        store,
        sessions: Arc::new(sessions()),
        metrics: metrics.clone(),
    };
    (router(state), metrics)
}

fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn generate_report_returns_and_saves_report() {
    let store = seeded_store();
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_, _| Ok("A strong week.".into()));
    let (app, metrics) = app(store.clone(), generator);

    let response = app
        .oneshot(request("POST", "/api/ai/generate-report", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["report"]["content"], "A strong week.");
    assert_eq!(body["report"]["stats"]["weekTotal"], 100.0);
    assert!(body["report"]["id"].is_string());
    assert_eq!(store.report_count(), 1);
    assert!(metrics
        .render()
        .unwrap()
        .contains("ripple_reports_generated_total 1"));
}

#[tokio::test]
async fn generate_report_without_token_is_unauthorized() {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(0);
    let (app, _) = app(seeded_store(), generator);

    let response = app
        .oneshot(request("POST", "/api/ai/generate-report", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn bad_token_is_unauthorized() {
    let (app, _) = app(seeded_store(), MockTextGenerator::new());
    let response = app
        .oneshot(request("GET", "/api/donors", Some("forged")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let (app, _) = app(seeded_store(), MockTextGenerator::new());
    let request = Request::builder()
        .uri("/api/donors")
        .header(header::AUTHORIZATION, format!("bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upstream_failure_is_500_with_message() {
    let store = seeded_store();
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().returning(|_, _| {
        Err(GenerationError::Upstream {
            status: 429,
            body: "Rate limit reached".into(),
        })
    });
    let (app, metrics) = app(store.clone(), generator);

    let response = app
        .oneshot(request("POST", "/api/ai/generate-report", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("429"));
    assert!(message.contains("Rate limit reached"));
    assert_eq!(store.report_count(), 0);
    assert!(metrics
        .render()
        .unwrap()
        .contains("ripple_report_failures_total{kind=\"upstream\"} 1"));
}

#[tokio::test]
async fn missing_credential_is_500() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .returning(|_, _| Err(GenerationError::MissingCredential));
    let (app, _) = app(seeded_store(), generator);

    let response = app
        .oneshot(request("POST", "/api/ai/generate-report", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await["error"],
        "Hugging Face API key not configured"
    );
}

#[tokio::test]
async fn donors_come_back_sorted_with_summary() {
    let (app, _) = app(seeded_store(), MockTextGenerator::new());
    let response = app
        .oneshot(request("GET", "/api/donors", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["donors"][0]["first_name"], "Ada");
    assert_eq!(body["summary"]["totalDonors"], 2);
    assert_eq!(body["summary"]["majorDonors"], 1);
    assert_eq!(body["summary"]["monthlyDonors"], 1);
}

#[tokio::test]
async fn dashboard_counts_donors_and_recent_gifts() {
    let (app, _) = app(seeded_store(), MockTextGenerator::new());
    let response = app
        .oneshot(request("GET", "/api/dashboard", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["totalDonors"], 2);
    assert_eq!(body["totalRaised"], 100.0);
    assert_eq!(body["recentDonations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn outreach_for_unknown_donor_is_404() {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(0);
    let (app, _) = app(seeded_store(), generator);

    let uri = format!("/api/ai/donor-outreach/{}?tone=urgent", Uuid::new_v4());
    let response = app.oneshot(request("POST", &uri, Some(TOKEN))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn outreach_returns_parsed_draft() {
    let store = seeded_store();
    let target = donor("Cy", 900.0, &[]);
    let target_id = target.id;
    store.insert_donor(target);

    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .withf(|prompt, _| prompt.contains("professional"))
        .returning(|_, _| {
            Ok("Sure!\n```json\n{\"subject\": \"Thank you\", \"body\": \"Dear Cy\"}\n```".into())
        });
    let (app, _) = app(store, generator);

    let uri = format!("/api/ai/donor-outreach/{target_id}?tone=professional");
    let response = app.oneshot(request("POST", &uri, Some(TOKEN))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["subject"], "Thank you");
    assert_eq!(body["body"], "Dear Cy");
}

#[tokio::test]
async fn reports_list_after_generation() {
    let store = seeded_store();
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().returning(|_, _| Ok("Done.".into()));
    let (app, _) = app(store, generator);

    let response = app
        .clone()
        .oneshot(request("POST", "/api/ai/generate-report", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", "/api/reports", Some(TOKEN)))
        .await
        .unwrap();
    let body = json_body(response).await;
    let reports = body["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["content"], "Done.");
}

#[tokio::test]
async fn health_and_metrics_need_no_session() {
    let (app, _) = app(seeded_store(), MockTextGenerator::new());

    let response = app
        .clone()
        .oneshot(request("GET", "/healthz", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(request("GET", "/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
