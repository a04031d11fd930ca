pub mod admin;
pub mod auth;
pub mod contests;
pub mod entries;
pub mod home;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::auth::auth_middleware;
use crate::middleware::role::require_admin;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        auth::register,
        auth::login,
        auth::refresh,
        auth::logout,
        auth::me,
        auth::update_profile,
        auth::change_password,
        contests::get_contest,
        contests::gallery,
        contests::create_contest,
        entries::submit_entry,
        entries::withdraw_photo,
        entries::my_photos,
        admin::list_entries,
        admin::update_status,
        admin::vote,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            home::RootResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RefreshRequest,
            auth::RefreshResponse,
            auth::LogoutRequest,
            auth::LogoutResponse,
            auth::UserProfile,
            auth::UpdateProfileRequest,
            auth::ChangePasswordRequest,
            auth::PasswordChangedResponse,
            contests::CreateContestRequest,
            contests::ContestResponse,
            entries::EntryResponse,
            entries::SubmissionForm,
            admin::UpdateStatusRequest,
            admin::VoteRequest,
            admin::VoteResponse,
            crate::services::entries::ScoredEntry,
            crate::services::entries::GalleryItem,
            crate::services::entries::OwnedPhoto,
            crate::models::submission::EntryDetails,
            crate::entities::contest_entry::EntryStatus,
            crate::entities::user::Role,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Authentication", description = "Accounts, profiles and tokens"),
        (name = "Contests", description = "Public contest pages and galleries"),
        (name = "Entries", description = "Participant submissions and withdrawals"),
        (name = "Administration", description = "Contest setup and moderation (administrator access required)")
    ),
    info(
        title = "Photo Contest API",
        version = "0.1.0",
        description = "Photo contest submissions, derivatives and moderation",
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me).patch(auth::update_profile))
        .route("/auth/password", put(auth::change_password))
        .route("/photos", get(entries::my_photos))
        .route("/photos/{id}/withdraw", post(entries::withdraw_photo))
        .route("/contests/{id}/entries", post(entries::submit_entry))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/admin/contests", post(contests::create_contest))
        .route("/admin/contests/{id}/entries", get(admin::list_entries))
        .route("/admin/entries/{id}/status", patch(admin::update_status))
        .route("/admin/entries/{id}/vote", put(admin::vote))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let media_dir = state.config.media_dir.clone();
    let body_limit = state.config.max_upload_bytes;

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/contests/{id}", get(contests::get_contest))
        .route("/contests/{id}/gallery", get(contests::gallery))
        .merge(protected_routes)
        .merge(admin_routes)
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
