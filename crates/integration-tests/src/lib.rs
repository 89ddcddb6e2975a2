//! Shared fixtures for the cross-crate tests: seeded stores, a fake
//! inference upstream and a fully wired router.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use api_adapters::{router, AppState, Metrics};
use async_trait::async_trait;
use auth_adapters::JwtAuth;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use domains::{
    Campaign, Donation, Donor, FundraisingStore, GenerationParams, NewReport, ReportRepository,
    Session, StoreError, StoredReport, TextGenerator,
};
use inference_adapters::{HuggingFaceClient, HuggingFaceConfig};
use secrecy::SecretString;
use services::{OutreachService, ReportService};
use storage_adapters::InMemoryStore;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-secret";
pub const HF_KEY: &str = "hf_integration";

pub fn donor(first: &str, last: &str) -> Donor {
    Donor {
        id: Uuid::new_v4(),
        organization_id: Uuid::nil(),
        first_name: first.into(),
        last_name: last.into(),
        email: Some(format!("{}@example.org", first.to_lowercase())),
        phone: None,
        donor_type: "individual".into(),
        tags: vec![],
        total_donated: 0.0,
        donation_count: 0,
        first_donation_date: None,
        last_donation_date: None,
        created_at: Utc::now(),
    }
}

pub fn lapsed_donor(first: &str, last_gift: NaiveDate, count: i32, total: f64) -> Donor {
    Donor {
        last_donation_date: Some(last_gift),
        first_donation_date: Some(last_gift),
        donation_count: count,
        total_donated: total,
        ..donor(first, "Lapsed")
    }
}

pub fn donation(amount: f64, at: DateTime<Utc>) -> Donation {
    Donation {
        id: Uuid::new_v4(),
        donor_id: Uuid::new_v4(),
        campaign_id: None,
        amount,
        donation_date: at,
        payment_method: "card".into(),
    }
}

pub fn campaign(name: &str, raised: f64, goal: Option<f64>) -> Campaign {
    Campaign {
        id: Uuid::new_v4(),
        name: name.into(),
        goal_amount: goal,
        total_raised: raised,
        is_active: true,
    }
}

/// Gifts of 100 three days ago and 50 forty days ago.
pub fn two_gift_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();
    store.insert_donation(donation(100.0, now - Duration::days(3)));
    store.insert_donation(donation(50.0, now - Duration::days(40)));
    store
}

/// A report table that refuses every write.
pub struct BrokenReports;

#[async_trait]
impl ReportRepository for BrokenReports {
    async fn insert_report(&self, _report: NewReport) -> Result<StoredReport, StoreError> {
        Err(StoreError::Unavailable("relation \"ai_reports\" does not exist".into()))
    }

    async fn list_reports(
        &self,
        _report_type: &str,
        _limit: usize,
    ) -> Result<Vec<StoredReport>, StoreError> {
        Ok(vec![])
    }
}

/// What the fake upstream saw and how it answers.
#[derive(Clone)]
pub struct FakeUpstream {
    status: StatusCode,
    body: String,
    hits: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok()?.last().cloned()
    }
}

async fn answer(
    State(up): State<FakeUpstream>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, String) {
    up.hits.fetch_add(1, Ordering::SeqCst);
    if let (Ok(mut prompts), Some(inputs)) = (up.prompts.lock(), payload["inputs"].as_str()) {
        prompts.push(inputs.to_string());
    }
    (up.status, up.body.clone())
}

/// Serves the inference route on an ephemeral port and returns its base url.
pub async fn spawn_upstream(status: StatusCode, body: impl Into<String>) -> (String, FakeUpstream) {
    let up = FakeUpstream {
        status,
        body: body.into(),
        hits: Arc::new(AtomicUsize::new(0)),
        prompts: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/models/{*model}", post(answer))
        .with_state(up.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("fake upstream addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/models"), up)
}

pub fn hugging_face(base_url: String, api_key: Option<&str>) -> Arc<dyn TextGenerator> {
    let client = HuggingFaceClient::new(HuggingFaceConfig {
        api_key: api_key.map(|k| SecretString::from(k.to_string())),
        base_url,
        model: "mistralai/Mistral-7B-Instruct-v0.3".into(),
        timeout: StdDuration::from_secs(5),
    })
    .expect("http client");
    Arc::new(client)
}

pub fn jwt() -> JwtAuth {
    JwtAuth::new(&SecretString::from(JWT_SECRET.to_string()))
}

pub fn bearer(session: &Session) -> String {
    let token = jwt()
        .issue(session, Duration::hours(1))
        .expect("issue token");
    format!("Bearer {token}")
}

/// Router over the given store, report table and generator, with real JWT sessions.
pub fn app(
    store: Arc<dyn FundraisingStore>,
    reports: Arc<dyn ReportRepository>,
    generator: Arc<dyn TextGenerator>,
) -> Router {
    let params = GenerationParams {
        max_new_tokens: 800,
        ..GenerationParams::default()
    };
    let state = AppState {
        reports: Arc::new(ReportService::new(
            store.clone(),
            reports,
            generator.clone(),
            params.clone(),
            Uuid::nil(),
        )),
        outreach: Arc::new(OutreachService::new(store.clone(), generator, params)),
        store,
        sessions: Arc::new(jwt()),
        metrics: Arc::new(Metrics::new()),
    };
    router(state)
}
