use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollOption {
    pub id: i64,
    pub text: String,
    pub vote_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreatePoll {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Deserialize)]
pub struct CastVote {
    pub option_id: i64,
}

#[derive(Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

struct StoredPoll {
    owner: String,
    poll: Poll,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, (i64, String)>,
    tokens: HashMap<String, String>,
    polls: BTreeMap<i64, StoredPoll>,
    next_poll_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

type Reply<T> = Result<T, (StatusCode, Json<Detail>)>;

fn reject(status: StatusCode, detail: &str) -> (StatusCode, Json<Detail>) {
    (
        status,
        Json(Detail {
            detail: detail.to_string(),
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/polls", get(list_polls).post(create_poll))
        .route("/polls/{id}", get(get_poll).delete(delete_poll))
        .route("/polls/{id}/vote", post(cast_vote))
        .route("/polls/{id}/results", get(poll_results))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Resolve the bearer token in `Authorization` to a username.
fn authenticate(store: &Store, headers: &HeaderMap) -> Reply<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| store.tokens.get(token))
        .cloned()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

async fn register(State(db): State<Db>, Json(input): Json<Credentials>) -> Reply<Json<User>> {
    let mut store = db.write().await;
    if store.users.contains_key(&input.username) {
        return Err(reject(StatusCode::BAD_REQUEST, "Username already registered"));
    }
    let id = store.users.len() as i64 + 1;
    store
        .users
        .insert(input.username.clone(), (id, input.password));
    tracing::info!(username = %input.username, "registered user");
    Ok(Json(User {
        id,
        username: input.username,
    }))
}

async fn login(State(db): State<Db>, Form(input): Form<Credentials>) -> Reply<Json<Token>> {
    let mut store = db.write().await;
    match store.users.get(&input.username) {
        Some((_, password)) if *password == input.password => {}
        _ => {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "Incorrect username or password",
            ))
        }
    }
    let access_token = Uuid::new_v4().simple().to_string();
    store
        .tokens
        .insert(access_token.clone(), input.username);
    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

async fn list_polls(State(db): State<Db>, Query(page): Query<Page>) -> Json<Vec<Poll>> {
    let store = db.read().await;
    Json(
        store
            .polls
            .values()
            .skip(page.skip)
            .take(page.limit)
            .map(|stored| stored.poll.clone())
            .collect(),
    )
}

async fn create_poll(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreatePoll>,
) -> Reply<Json<Poll>> {
    let mut store = db.write().await;
    let owner = authenticate(&store, &headers)?;
    store.next_poll_id += 1;
    let poll = Poll {
        id: store.next_poll_id,
        question: input.question,
        options: input
            .options
            .into_iter()
            .zip(1..)
            .map(|(text, id)| PollOption {
                id,
                text,
                vote_count: 0,
            })
            .collect(),
    };
    store.polls.insert(
        poll.id,
        StoredPoll {
            owner,
            poll: poll.clone(),
        },
    );
    Ok(Json(poll))
}

async fn get_poll(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Json<Poll>> {
    let store = db.read().await;
    store
        .polls
        .get(&id)
        .map(|stored| Json(stored.poll.clone()))
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Poll not found"))
}

async fn poll_results(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Json<Poll>> {
    get_poll(State(db), Path(id)).await
}

async fn cast_vote(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<CastVote>,
) -> Reply<Json<Poll>> {
    let mut store = db.write().await;
    authenticate(&store, &headers)?;
    let stored = store
        .polls
        .get_mut(&id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Poll not found"))?;
    let option = stored
        .poll
        .options
        .iter_mut()
        .find(|o| o.id == input.option_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Option not found"))?;
    option.vote_count += 1;
    Ok(Json(stored.poll.clone()))
}

async fn delete_poll(
    State(db): State<Db>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Reply<StatusCode> {
    let mut store = db.write().await;
    let user = authenticate(&store, &headers)?;
    let owned = store.polls.get(&id).is_some_and(|stored| stored.owner == user);
    if !owned {
        return Err(reject(
            StatusCode::NOT_FOUND,
            "Poll not found or not authorized to delete",
        ));
    }
    store.polls.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
