use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::source::{load_or_empty, ReferenceSource};
use crate::catalog::store::ReferenceIndex;
use crate::cli::ServeArgs;
use crate::core::annotation::AnnotationRecord;
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::matching::report::{filter_by_activities, list_activities, ActivitySummary};
use crate::parsing::queries::{detect_query_format, parse_query_text, ParseError};
use crate::utils::validation::{validate_query_batch, validate_upload, ValidationError};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_FILE_FIELD_SIZE: usize = 16 * 1024 * 1024; // 16MB
pub const MAX_TEXT_FIELD_SIZE: usize = 1024 * 1024; // 1MB

/// Shared application state
pub struct AppState {
    pub index: ReferenceIndex,
    /// Where the index came from, for `/api/references`
    pub source: String,
    pub config: MatchingConfig,
}

impl AppState {
    #[must_use]
    pub fn new(index: ReferenceIndex, source: impl Into<String>) -> Self {
        Self {
            index,
            source: source.into(),
            config: MatchingConfig::default(),
        }
    }

    /// Load the index from `source`; an unavailable source gives an empty index
    #[must_use]
    pub fn from_source(source: &dyn ReferenceSource) -> Self {
        Self::new(load_or_empty(source), source.describe())
    }
}

/// Body of `/api/analyze` and `/api/summary`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub sequences: Vec<String>,
    /// Keep only these activities; empty keeps all
    #[serde(default)]
    pub activities: Vec<String>,
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_reply(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(error)).into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
///
/// Per-IP rate limiting needs the peer address, so it is added by the server
/// loop rather than here.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/activities", get(activities_handler))
        .route("/api/references", get(references_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/summary", post(summary_handler))
        .route("/api/upload", post(upload_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                // Limit request body size (accommodate largest file + multipart overhead)
                .layer(DefaultBodyLimit::max(20 * 1024 * 1024)), // 20MB limit
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let source = args.reference.source();
    let state = Arc::new(AppState::from_source(source.as_ref()));
    let entries = state.index.len();

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?;

    let app = create_router(state).layer(GovernorLayer {
        config: Arc::new(governor_conf),
    });

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting biopep-annotator at http://{addr} ({entries} reference entries)");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/activities"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Activity catalog of the loaded references
async fn activities_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(list_activities(&state.index))
}

/// Describe the loaded reference index
async fn references_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "count": state.index.len(),
        "matchable": state.index.matchable().count(),
        "fingerprint": state.index.fingerprint(),
        "source": state.source,
    }))
}

/// Validate the request body and run the matcher over it
fn annotate_request(
    state: &AppState,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Vec<AnnotationRecord>, Response> {
    let Json(request) = payload.map_err(|rejection| {
        error_reply(
            rejection.status(),
            create_safe_error_response(
                "invalid_request",
                "Request body must be JSON with a \"sequences\" array",
                Some(&rejection.body_text()),
            ),
        )
    })?;

    if let Err(e) = validate_query_batch(&request.sequences) {
        let error_type = match &e {
            ValidationError::TooManyQueries(_) => "too_many_queries",
            ValidationError::PeptideTooLong(_) => "peptide_too_long",
            _ => "validation_failed",
        };
        return Err(error_reply(
            StatusCode::BAD_REQUEST,
            create_safe_error_response(error_type, &e.to_string(), None),
        ));
    }

    let engine = MatchingEngine::with_config(&state.index, state.config);
    let records = engine.analyze_batch(&request.sequences);
    Ok(filter_by_activities(records, &request.activities))
}

/// Run [`annotate_request`] on the blocking pool so large batches do not
/// stall the async workers
async fn annotate_blocking(
    state: Arc<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Vec<AnnotationRecord>, Response> {
    tokio::task::spawn_blocking(move || annotate_request(&state, payload))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Annotation task failed: {e}");
            Err(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                create_safe_error_response("internal_error", "Annotation failed", None),
            ))
        })
}

/// Annotate a batch of peptides
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    match annotate_blocking(state, payload).await {
        Ok(records) => Json(records).into_response(),
        Err(response) => response,
    }
}

/// Per-activity counts for a batch of peptides
async fn summary_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    match annotate_blocking(state, payload).await {
        Ok(records) => Json(ActivitySummary::from_records(&records)).into_response(),
        Err(response) => response,
    }
}

/// Extract query peptides from an uploaded file (`file`) or pasted text
/// (`text`). Contents are parsed in memory and never written to disk.
async fn upload_handler(mut multipart: Multipart) -> Response {
    let mut fields_received = 0usize;
    let mut had_parse_error = false;
    let mut upload: Option<(Option<String>, String)> = None;

    loop {
        // Check field count limit before processing
        if fields_received >= MAX_MULTIPART_FIELDS {
            return error_reply(
                StatusCode::BAD_REQUEST,
                create_safe_error_response("field_limit_exceeded", "Too many form fields", None),
            );
        }

        match multipart.next_field().await {
            Ok(Some(field)) => {
                fields_received += 1;
                let name = field.name().unwrap_or_default().to_string();

                match name.as_str() {
                    "file" => {}
                    "text" => {
                        let Ok(text) = field.text().await else {
                            had_parse_error = true;
                            continue;
                        };
                        if text.len() > MAX_TEXT_FIELD_SIZE {
                            return error_reply(
                                StatusCode::PAYLOAD_TOO_LARGE,
                                create_safe_error_response(
                                    "text_too_large",
                                    "Text field size exceeds limit",
                                    None,
                                ),
                            );
                        }
                        // An uploaded file takes precedence over pasted text
                        if upload.is_none() && !text.trim().is_empty() {
                            upload = Some((None, text));
                        }
                        continue;
                    }
                    _ => continue, // Ignore unknown fields
                }

                let filename = field.file_name().map(ToString::to_string);
                let Ok(bytes) = field.bytes().await else {
                    had_parse_error = true;
                    continue;
                };

                if bytes.len() > MAX_FILE_FIELD_SIZE {
                    return error_reply(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        create_safe_error_response("file_too_large", "File size exceeds limit", None),
                    );
                }

                match validate_upload(filename.as_deref(), &bytes) {
                    Ok(validated) => {
                        upload = Some((validated, String::from_utf8_lossy(&bytes).into_owned()));
                    }
                    Err(e) => return validation_error_reply(&e),
                }
            }
            Ok(None) => break, // No more fields
            Err(_) => {
                had_parse_error = true;
                break;
            }
        }
    }

    let Some((filename, text)) = upload else {
        let error_msg = if had_parse_error {
            "Failed to parse upload. Please check the file format."
        } else {
            "No input received. Upload a CSV, TSV, TXT or FASTA file or paste peptides."
        };
        return error_reply(
            StatusCode::BAD_REQUEST,
            create_safe_error_response("missing_input", error_msg, None),
        );
    };

    let format = detect_query_format(filename.as_deref(), &text);
    match parse_query_text(&text, format) {
        Ok(sequences) => {
            tracing::debug!(
                "Extracted {} sequences from {} upload",
                sequences.len(),
                format.display_name()
            );
            Json(serde_json::json!({
                "sequences": sequences,
                "format": format.display_name(),
            }))
            .into_response()
        }
        Err(ParseError::TooManyQueries(count)) => error_reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            create_safe_error_response(
                "too_many_queries",
                "File contains too many sequences",
                Some(&format!("{count} sequences read before limit")),
            ),
        ),
        Err(e) => error_reply(
            StatusCode::BAD_REQUEST,
            create_safe_error_response(
                "parse_error",
                &format!("Could not read sequences from {} file", format.display_name()),
                Some(&e.to_string()),
            ),
        ),
    }
}

fn validation_error_reply(error: &ValidationError) -> Response {
    let (error_type, message) = match error {
        ValidationError::FilenameTooLong => {
            ("filename_too_long", "Filename exceeds maximum length limit")
        }
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => (
            "invalid_filename",
            "Filename contains invalid or dangerous characters",
        ),
        ValidationError::InvalidFileContent => (
            "invalid_content",
            "File content appears malformed or is not text",
        ),
        ValidationError::UnsupportedFileType(_) => (
            "unsupported_file_type",
            "Unsupported file type; upload CSV, TSV, TXT or FASTA",
        ),
        ValidationError::TooManyQueries(_) | ValidationError::PeptideTooLong(_) => {
            ("validation_failed", "File validation failed")
        }
    };

    error_reply(
        StatusCode::BAD_REQUEST,
        create_safe_error_response(error_type, message, Some(&error.to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::{DemoSource, FileSource};

    #[test]
    fn test_error_response_hides_details() {
        let response = create_safe_error_response("parse_error", "Bad file", Some("line 3: oops"));
        assert_eq!(response.error, "Bad file");
        assert_eq!(response.error_type, "parse_error");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_app_state_from_unavailable_source_is_empty() {
        let state = AppState::from_source(&FileSource::new("/nonexistent/biopep.fasta"));
        assert!(state.index.is_empty());
        assert_eq!(state.source, "file:/nonexistent/biopep.fasta");
    }

    #[test]
    fn test_annotate_request_filters_activities() {
        let state = AppState::from_source(&DemoSource);
        let request = AnalyzeRequest {
            sequences: vec!["FFMPGF".to_string()],
            activities: vec!["ACE inhibitor".to_string()],
        };

        let Ok(records) = annotate_request(&state, Ok(Json(request))) else {
            panic!("request should succeed");
        };
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.activity == "ACE inhibitor"));
    }

    #[tokio::test]
    async fn test_annotate_blocking_matches_inline() {
        let state = Arc::new(AppState::from_source(&DemoSource));
        let request = AnalyzeRequest {
            sequences: vec!["FFMPGF".to_string(), "DFPFW".to_string()],
            activities: Vec::new(),
        };

        let Ok(records) = annotate_blocking(Arc::clone(&state), Ok(Json(request))).await else {
            panic!("request should succeed");
        };
        let fragments: Vec<&str> = records.iter().map(|r| r.active_fragment.as_str()).collect();
        assert_eq!(fragments, vec!["FF", "PG", "GF", "DF", "PF", "FW"]);
    }
}
