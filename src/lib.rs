pub mod core;
pub mod pages;
pub mod session;

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::auth::AdminGate;
use crate::core::catalog::models::{WebsiteFields, DEFAULT_CATEGORY, DEFAULT_STYLE};
use crate::core::catalog::CatalogService;
use crate::core::config::{AppConfig, ConfigError};
use crate::core::store::{DocumentStore, StoreError};
use crate::core::view::admin::{AdminView, EditTarget};
use crate::core::view::listing::ListingView;
use crate::session::{
    expired_session_cookie, session_cookie, session_token, SessionStore, SharedView,
};

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct AppState<S> {
    catalog: CatalogService<S>,
    gate: AdminGate,
    sessions: SessionStore,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(catalog: CatalogService<S>, gate: AdminGate) -> Self {
        Self {
            catalog,
            gate,
            sessions: SessionStore::default(),
        }
    }

    /// Replaces the session store, e.g. to use a different idle timeout.
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn catalog(&self) -> &CatalogService<S> {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListingQuery {
    q: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginForm {
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct EntryForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    order: String,
    is_new: Option<String>,
    #[serde(default)]
    style: String,
}

impl EntryForm {
    fn into_fields(self) -> WebsiteFields {
        let category = self.category.trim();
        let style = self.style.trim();
        WebsiteFields {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            url: self.url.trim().to_string(),
            icon: self.icon.trim().to_string(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            order: self.order.trim().parse().unwrap_or(0),
            is_new: self.is_new.is_some(),
            style: if style.is_empty() {
                DEFAULT_STYLE.to_string()
            } else {
                style.to_string()
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DeleteForm {
    confirm: Option<String>,
}

pub fn router<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + Clone + 'static,
{
    Router::new()
        .route("/", get(listing_page::<S>))
        .route("/admin", get(admin_page::<S>))
        .route("/admin/login", post(admin_login::<S>))
        .route("/admin/logout", post(admin_logout::<S>))
        .route("/admin/form/new", post(form_new::<S>))
        .route("/admin/form/edit/{id}", post(form_edit::<S>))
        .route("/admin/form/cancel", post(form_cancel::<S>))
        .route("/admin/entries", post(submit_entry::<S>))
        .route("/admin/entries/{id}/delete", post(delete_entry::<S>))
        .with_state(state)
}

async fn listing_page<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ListingQuery>,
) -> Html<String> {
    let mut view = ListingView::new();
    view.set_search_text(query.q.unwrap_or_default());
    view.set_category(query.category.unwrap_or_default());
    view.load(&state.catalog).await;
    Html(pages::render_listing(&view))
}

async fn admin_page<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Html<String> {
    let Some(view) = current_session(&state, &headers).await else {
        return Html(pages::render_login(None));
    };
    refresh(&state.catalog, &view).await;
    let mut view = view.lock().await;
    let notice = view.take_notice();
    Html(pages::render_dashboard(&view, notice.as_ref()))
}

async fn admin_login<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut view = AdminView::new();
    if !view.login(&state.gate, &form.password) {
        let notice = view.take_notice();
        return (
            StatusCode::UNAUTHORIZED,
            Html(pages::render_login(notice.as_ref())),
        )
            .into_response();
    }
    let token = state.sessions.open(view).await;
    ([(SET_COOKIE, session_cookie(&token))], Redirect::to("/admin")).into_response()
}

async fn admin_logout<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Some(view) = state.sessions.close(&token).await {
            view.lock().await.logout();
            info!("admin session closed");
        }
    }
    (
        [(SET_COOKIE, expired_session_cookie())],
        Redirect::to("/admin"),
    )
        .into_response()
}

async fn form_new<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Redirect {
    if let Some(view) = current_session(&state, &headers).await {
        view.lock().await.start_add();
    }
    Redirect::to("/admin")
}

async fn form_edit<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Redirect {
    if let Some(view) = current_session(&state, &headers).await {
        view.lock().await.start_edit(&id);
    }
    Redirect::to("/admin")
}

async fn form_cancel<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Redirect {
    if let Some(view) = current_session(&state, &headers).await {
        view.lock().await.cancel_edit();
    }
    Redirect::to("/admin")
}

async fn submit_entry<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Form(form): Form<EntryForm>,
) -> Redirect {
    let Some(view) = current_session(&state, &headers).await else {
        return Redirect::to("/admin");
    };
    let pending = {
        let mut view = view.lock().await;
        if !view.set_draft(form.into_fields()) {
            return Redirect::to("/admin");
        }
        view.pending_submission()
    };
    let Some((target, fields)) = pending else {
        return Redirect::to("/admin");
    };

    let result = match &target {
        EditTarget::New => state.catalog.create_entry(&fields).await.map(|_| ()),
        EditTarget::Existing(id) => state.catalog.update_entry(id, &fields).await,
    };
    let saved = view.lock().await.finish_submit(&target, result);
    if saved {
        refresh(&state.catalog, &view).await;
    }
    Redirect::to("/admin")
}

async fn delete_entry<S: DocumentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let Some(view) = current_session(&state, &headers).await else {
        return Redirect::to("/admin").into_response();
    };

    if form.confirm.as_deref() != Some("yes") {
        let view = view.lock().await;
        return match view.entries().iter().find(|entry| entry.id == id) {
            Some(entry) => Html(pages::render_delete_confirmation(entry)).into_response(),
            None => Redirect::to("/admin").into_response(),
        };
    }

    let result = state.catalog.delete_entry(&id).await;
    let deleted = view.lock().await.finish_delete(result);
    if deleted {
        refresh(&state.catalog, &view).await;
    }
    Redirect::to("/admin").into_response()
}

async fn current_session<S>(state: &AppState<S>, headers: &HeaderMap) -> Option<SharedView> {
    let token = session_token(headers)?;
    let view = state.sessions.get(&token).await?;
    if view.lock().await.is_unlocked() {
        Some(view)
    } else {
        None
    }
}

/// Reloads the session's list without holding its lock across the store call.
async fn refresh<S: DocumentStore>(catalog: &CatalogService<S>, view: &SharedView) {
    let ticket = view.lock().await.begin_load();
    let result = catalog.list_entries().await;
    view.lock().await.finish_load(ticket, result);
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run(config: AppConfig) -> Result<(), ServeError> {
    let backend = crate::core::connect_backend(&config).await?;
    info!(backend = backend.name(), "catalog store ready");

    let state = AppState::new(
        CatalogService::new(backend),
        AdminGate::new(&config.admin_password),
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "portal listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
