#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::{json, Value};

use smart_credit::config::AppConfig;
use smart_credit::session::{KeyValueStore, MemoryStore};
use smart_credit::AppContext;

pub const API_KEY: &str = "test-api-key";
/// Accounts with this email get ID tokens that are already expired
pub const SHORT_LIVED_EMAIL: &str = "short@example.com";

#[derive(Clone)]
struct Account {
    password: String,
    local_id: String,
    display_name: Option<String>,
}

/// Everything the fake backend saw, plus knobs for what it returns
#[derive(Default)]
pub struct BackendState {
    pub catalog: Mutex<Option<Value>>,
    pub catalog_hits: AtomicUsize,
    pub home_feed: Mutex<Value>,
    pub added_cards: Mutex<Vec<String>>,
    pub nearby_payloads: Mutex<Vec<Value>>,
    pub exchanged_id_tokens: Mutex<Vec<String>>,
    pub bearer_tokens: Mutex<Vec<String>>,
    pub requests_without_tunnel_header: AtomicUsize,
    pub identity_calls: AtomicUsize,
    pub token_refreshes: AtomicUsize,
    accounts: Mutex<HashMap<String, Account>>,
}

impl BackendState {
    pub fn add_account(&self, email: &str, password: &str, display_name: Option<&str>) {
        let local_id = format!("uid-{}", self.accounts.lock().unwrap().len() + 1);
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                local_id,
                display_name: display_name.map(str::to_string),
            },
        );
    }

    pub fn catalog_hits(&self) -> usize {
        self.catalog_hits.load(Ordering::SeqCst)
    }

    pub fn identity_calls(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    fn check_tunnel_header(&self, headers: &HeaderMap) {
        let ok = headers
            .get("ngrok-skip-browser-warning")
            .and_then(|v| v.to_str().ok())
            == Some("69420");
        if !ok {
            self.requests_without_tunnel_header.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Bearer token if it is one the token exchange handed out
    fn authorized(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?
            .to_string();
        self.bearer_tokens.lock().unwrap().push(token.clone());
        token.starts_with("access-for-").then_some(token)
    }
}

pub fn default_catalog() -> Value {
    json!([
        {
            "cardIssuer": "American Express",
            "card": [
                {"cardKey": "amex-gold", "cardName": "American Express® Gold"},
                {"cardKey": "amex-platinum", "cardName": "The Platinum Card®"}
            ]
        },
        {
            "cardIssuer": "Chase",
            "card": [{"cardKey": "chase-sapphire-preferred", "cardName": "Chase Sapphire Preferred®"}]
        },
        {
            "card": [{"cardKey": "orphan", "cardName": "Orphan Gold"}]
        },
        {
            "cardIssuer": "Discover",
            "card": "unavailable"
        }
    ])
}

pub fn default_home_feed() -> Value {
    json!([
        {
            "cardName": "amex-gold",
            "spendBonusCategories": [
                {"spendBonusCategoryName": "Dining", "spendBonusDesc": "4x at restaurants worldwide"},
                {"spendBonusCategoryName": "Groceries", "spendBonusDesc": "4x on groceries at U.S. supermarkets"}
            ]
        },
        {
            "cardName": "retired-card",
            "spendBonusCategories": [{"spendBonusDesc": "1% cash back on all other purchases"}]
        },
        "not-an-item"
    ])
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

fn identity_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": 400, "message": message}})),
    )
        .into_response()
}

fn auth_body(email: &str, account: &Account) -> Value {
    let expires_in = if email == SHORT_LIVED_EMAIL { "0" } else { "3600" };
    json!({
        "localId": account.local_id,
        "email": email,
        "displayName": account.display_name.clone().unwrap_or_default(),
        "idToken": format!("id-{}", account.local_id),
        "refreshToken": format!("fb-refresh-{}", account.local_id),
        "expiresIn": expires_in,
    })
}

async fn catalog(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.check_tunnel_header(&headers);
    state.catalog_hits.fetch_add(1, Ordering::SeqCst);
    // Slow enough that concurrent loads overlap
    tokio::time::sleep(Duration::from_millis(20)).await;

    let body = state.catalog.lock().unwrap().clone();
    match body {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "catalog unavailable").into_response(),
    }
}

async fn token_exchange(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.check_tunnel_header(&headers);
    let Some(id_token) = body.get("firebase_id_token").and_then(Value::as_str) else {
        let body = json!({"detail": "firebase_id_token is required"});
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    };
    state.exchanged_id_tokens.lock().unwrap().push(id_token.to_string());

    if !id_token.starts_with("id-") {
        let body = json!({"detail": "Invalid Firebase token"});
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    Json(json!({
        "access": format!("access-for-{}", id_token),
        "refresh": format!("refresh-for-{}", id_token),
    }))
    .into_response()
}

async fn add_card(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.check_tunnel_header(&headers);
    if state.authorized(&headers).is_none() {
        return unauthorized();
    }
    let company = body
        .get("company_name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    state.added_cards.lock().unwrap().push(company.clone());
    (StatusCode::CREATED, Json(json!({"status": "added", "company_name": company}))).into_response()
}

async fn home_feed(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.check_tunnel_header(&headers);
    if state.authorized(&headers).is_none() {
        return unauthorized();
    }
    let feed = state.home_feed.lock().unwrap().clone();
    Json(feed).into_response()
}

async fn nearby(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.check_tunnel_header(&headers);
    if state.authorized(&headers).is_none() {
        return unauthorized();
    }
    state.nearby_payloads.lock().unwrap().push(body);
    Json(json!([
        {"merchant": "Corner Bistro", "cardName": "American Express® Gold", "spendBonusDesc": "4x at restaurants worldwide"}
    ]))
    .into_response()
}

async fn identity(
    State(state): State<Arc<BackendState>>,
    Path(rest): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    state.identity_calls.fetch_add(1, Ordering::SeqCst);
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return identity_error("API_KEY_INVALID");
    }

    let email = body.get("email").and_then(Value::as_str).unwrap_or_default().to_string();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default().to_string();

    match rest.trim_start_matches('/') {
        "v1/accounts:signInWithPassword" => {
            let accounts = state.accounts.lock().unwrap();
            match accounts.get(&email) {
                Some(account) if account.password == password => {
                    Json(auth_body(&email, account)).into_response()
                }
                Some(_) => identity_error("INVALID_PASSWORD"),
                None => identity_error("EMAIL_NOT_FOUND"),
            }
        }
        "v1/accounts:signUp" => {
            if state.accounts.lock().unwrap().contains_key(&email) {
                return identity_error("EMAIL_EXISTS");
            }
            state.add_account(&email, &password, None);
            let account = state.accounts.lock().unwrap()[&email].clone();
            Json(auth_body(&email, &account)).into_response()
        }
        "v1/accounts:update" => {
            let id_token = body.get("idToken").and_then(Value::as_str).unwrap_or_default();
            let display_name = body.get("displayName").and_then(Value::as_str).unwrap_or_default();
            let mut accounts = state.accounts.lock().unwrap();
            let Some((email, account)) = accounts
                .iter_mut()
                .find(|(_, a)| id_token.starts_with(&format!("id-{}", a.local_id)))
            else {
                return identity_error("INVALID_ID_TOKEN");
            };
            account.display_name = Some(display_name.to_string());
            let body = json!({
                "localId": account.local_id,
                "email": email,
                "displayName": display_name,
            });
            Json(body).into_response()
        }
        other => {
            (StatusCode::NOT_FOUND, format!("unknown identity path {}", other)).into_response()
        }
    }
}

async fn secure_token(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<HashMap<String, String>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return identity_error("API_KEY_INVALID");
    }
    if form.get("grant_type").map(String::as_str) != Some("refresh_token") {
        return identity_error("INVALID_GRANT_TYPE");
    }
    let Some(local_id) = form
        .get("refresh_token")
        .and_then(|t| t.strip_prefix("fb-refresh-"))
    else {
        return identity_error("INVALID_REFRESH_TOKEN");
    };

    let count = state.token_refreshes.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "id_token": format!("id-{}-refreshed-{}", local_id, count),
        "refresh_token": format!("fb-refresh-{}", local_id),
        "expires_in": "3600",
        "token_type": "Bearer",
        "user_id": local_id,
    }))
    .into_response()
}

pub struct TestBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl TestBackend {
    pub async fn spawn() -> Result<Self> {
        let state = Arc::new(BackendState::default());
        *state.catalog.lock().unwrap() = Some(default_catalog());
        *state.home_feed.lock().unwrap() = default_home_feed();

        let app = Router::new()
            .route("/api/credit-cards", get(catalog))
            .route("/playground/login/", post(token_exchange))
            .route("/playground/card/", post(add_card))
            .route("/homeviewapi/", get(home_feed))
            .route("/nearbyapi/", post(nearby))
            .route("/identity/*rest", post(identity))
            .route("/securetoken/v1/token", post(secure_token))
            .with_state(Arc::clone(&state));

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind fake backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let backend = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        };
        backend.wait_ready(Duration::from_secs(5)).await?;
        Ok(backend)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if tokio::net::TcpStream::connect(self.base_url.trim_start_matches("http://"))
                .await
                .is_ok()
            {
                return Ok(());
            }
            if Instant::now() > deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!("fake backend did not come up on {} within {:?}", self.base_url, timeout)
    }

    pub fn config(&self) -> Result<AppConfig> {
        let vars: HashMap<&str, String> = HashMap::from([
            ("SMART_CREDIT_API_URL", self.base_url.clone()),
            ("SMART_CREDIT_IDENTITY_URL", format!("{}/identity", self.base_url)),
            ("SMART_CREDIT_SECURE_TOKEN_URL", format!("{}/securetoken", self.base_url)),
            ("SMART_CREDIT_FIREBASE_API_KEY", API_KEY.to_string()),
        ]);
        Ok(AppConfig::from_lookup(|key| vars.get(key).cloned())?)
    }

    /// Context over a fresh in-memory store
    pub fn context(&self) -> Result<(AppContext, Arc<MemoryStore>)> {
        let store = Arc::new(MemoryStore::new());
        let ctx = self.context_with_store(store.clone())?;
        Ok((ctx, store))
    }

    pub fn context_with_store(&self, store: Arc<dyn KeyValueStore>) -> Result<AppContext> {
        Ok(AppContext::new(self.config()?, store)?)
    }
}

/// Backend with one registered user, and a context already logged in as them
pub async fn logged_in() -> Result<(TestBackend, AppContext, Arc<MemoryStore>)> {
    let backend = TestBackend::spawn().await?;
    backend.state.add_account("ada@example.com", "hunter22", Some("Ada"));
    let (ctx, store) = backend.context()?;
    ctx.auth().login("ada@example.com", "hunter22").await?;
    Ok((backend, ctx, store))
}
