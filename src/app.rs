use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::store::{ProjectStore, TenantStore};
use crate::handlers::{public, scoped};
use crate::middleware::resolve_tenant_middleware;
use crate::services::ProjectService;
use crate::tenant::{TenantResolver, ORG_SLUG_HEADER};

/// Shared handler state. Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub tenants: Arc<dyn TenantStore>,
    pub resolver: TenantResolver,
    pub projects: ProjectService,
}

impl AppState {
    pub fn new(tenants: Arc<dyn TenantStore>, projects: Arc<dyn ProjectStore>) -> Self {
        Self {
            resolver: TenantResolver::new(tenants.clone()),
            tenants,
            projects: ProjectService::new(projects),
        }
    }
}

pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Organization-scoped API
        .nest("/api", api_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }

    router
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/organization", get(scoped::organization_show))
        .route(
            "/projects",
            get(scoped::project_list).post(scoped::project_create),
        )
        .route(
            "/projects/:id",
            get(scoped::project_show).patch(scoped::project_update),
        )
        .route("/projects/:id/stats", get(scoped::project_stats))
        .route(
            "/projects/:id/tasks",
            get(scoped::task_list).post(scoped::task_create),
        )
        .route(
            "/tasks/:id",
            get(scoped::task_show)
                .patch(scoped::task_update)
                .delete(scoped::task_delete),
        )
        .route(
            "/tasks/:id/comments",
            get(scoped::comment_list).post(scoped::comment_create),
        )
        // Only matched routes resolve the tenant; unknown paths stay 404
        .route_layer(middleware::from_fn_with_state(
            state,
            resolve_tenant_middleware,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([HeaderName::from_static(ORG_SLUG_HEADER), header::CONTENT_TYPE]);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}
