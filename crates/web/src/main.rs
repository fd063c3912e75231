use anyhow::Context;
use axum::{Router, http::HeaderValue};
use storage::Database;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use middleware::auth::AuthState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::me::handlers::get_me,
        features::athletes::handlers::list_athletes,
        features::athletes::handlers::get_athlete,
        features::athletes::handlers::create_athlete,
        features::athletes::handlers::update_athlete,
        features::metrics::handlers::list_metrics,
        features::metrics::handlers::create_metric,
        features::metrics::handlers::delete_metric,
        features::metrics::handlers::verify_metric,
        features::goals::handlers::list_goals,
        features::goals::handlers::create_goal,
        features::goals::handlers::get_goal,
        features::goals::handlers::update_goal,
        features::goals::handlers::delete_goal,
        features::goals::handlers::record_progress,
        features::goals::handlers::add_milestone,
        features::goals::handlers::add_feedback,
        features::analytics::handlers::athlete_analytics,
        features::analytics::handlers::team_analytics,
        features::reports::handlers::athlete_report,
        features::reports::handlers::team_report,
        features::admin::handlers::refresh_overdue,
    ),
    components(
        schemas(
            storage::dto::athlete::CreateAthleteRequest,
            storage::dto::athlete::UpdateAthleteRequest,
            storage::dto::athlete::AthleteResponse,
            storage::dto::athlete::AthleteDetailResponse,
            storage::dto::metric::CreateMetricRequest,
            storage::dto::metric::MetricRecordResponse,
            storage::dto::common::PageMeta,
            storage::dto::goal::CreateGoalRequest,
            storage::dto::goal::UpdateGoalRequest,
            storage::dto::goal::TargetMetricInput,
            storage::dto::goal::MilestoneInput,
            storage::dto::goal::ProgressUpdateRequest,
            storage::dto::goal::FeedbackRequest,
            storage::dto::goal::GoalProgressRollup,
            storage::dto::goal::OverdueSweepResponse,
            storage::dto::analytics::ReportPeriod,
            storage::dto::analytics::AnalyticsSummary,
            storage::dto::analytics::SportBreakdown,
            storage::dto::analytics::BasketballBreakdown,
            storage::dto::analytics::SoccerBreakdown,
            storage::dto::analytics::FootballBreakdown,
            storage::dto::analytics::BestGame,
            storage::dto::analytics::TrendPoint,
            storage::dto::analytics::AthleteAnalytics,
            storage::dto::analytics::AthleteAnalyticsResponse,
            storage::dto::analytics::TeamAnalyticsSummary,
            storage::dto::analytics::TeamBreakdown,
            storage::dto::analytics::TeamBasketballBreakdown,
            storage::dto::analytics::TeamAnalyticsResponse,
            storage::dto::report::AthleteIdentity,
            storage::dto::report::Report,
            storage::models::User,
            storage::models::Role,
            storage::models::Team,
            storage::models::Athlete,
            storage::models::Sport,
            storage::models::SessionType,
            storage::models::SportStats,
            storage::models::BasketballStats,
            storage::models::SoccerStats,
            storage::models::FootballStats,
            storage::models::BaseballStats,
            storage::models::VolleyballStats,
            storage::models::MetricRecord,
            storage::models::Goal,
            storage::models::GoalStatus,
            storage::models::GoalPriority,
            storage::models::GoalCategory,
            storage::models::GoalProgress,
            storage::models::TargetMetric,
            storage::models::Direction,
            storage::models::Milestone,
            storage::models::ProgressUpdate,
            storage::models::CoachFeedback,
        )
    ),
    tags(
        (name = "users", description = "Authenticated user"),
        (name = "athletes", description = "Athlete profiles"),
        (name = "metrics", description = "Per-session performance records"),
        (name = "goals", description = "Goals, progress and coach feedback"),
        (name = "analytics", description = "Athlete and team summaries"),
        (name = "reports", description = "Structured reports for rendering"),
        (name = "admin", description = "Maintenance endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(cors.allow_origin(origins))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting athlete performance API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let auth = AuthState::new(db.clone(), &config.jwt_secret);
    let cors = cors_layer(&config.cors_allowed_origins)?;

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", features::routes(auth))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
