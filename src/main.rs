use anyhow::Context;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use gallery_ingest::config::{Config, LogFormat, StorageConfig};
use gallery_ingest::handlers::{
    AdminResponse, AssetResponse, AuthResponse, CollectionDetailResponse, CollectionListResponse,
    CollectionResponse, CreateLabelRequest, LabelListResponse, LabelResponse, LoginRequest,
    UploadForm, UploadResponse,
};
use gallery_ingest::state::AppState;
use gallery_ingest::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::label::create_label,
        handlers::label::list_labels,
        handlers::collection::list_collections,
        handlers::collection::get_collection,
        handlers::upload::upload_collection,
    ),
    components(schemas(
        LoginRequest,
        AuthResponse,
        AdminResponse,
        CreateLabelRequest,
        LabelResponse,
        LabelListResponse,
        CollectionResponse,
        CollectionListResponse,
        CollectionDetailResponse,
        AssetResponse,
        UploadForm,
        UploadResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Admin authentication"),
        (name = "Labels", description = "Label management"),
        (name = "Collections", description = "Archive upload and collection browsing")
    )
)]
struct ApiDoc;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gallery_ingest=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    let addr = config.server_addr();
    let local_root = match &config.storage {
        StorageConfig::Local { root, .. } => Some(root.clone()),
        StorageConfig::S3 { .. } => None,
    };

    // Initialize application state (database and object store)
    tracing::info!("Connecting to database and object storage...");
    let state = AppState::new(config)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!("Backends ready");

    let mut app = build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The local backend's public URLs point back at this server
    if let Some(root) = local_root {
        app = app.nest_service("/objects", ServeDir::new(root));
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
