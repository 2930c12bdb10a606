use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use directory::{
    Compensation, CompensationStore, DirectoryError, Employee, EmployeeStore,
    ReportingStructure, ReportingStructureBuilder, StoreError,
};
use platform_db::DbPool;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeStore>,
    pub compensations: Arc<dyn CompensationStore>,
    pub builder: Arc<ReportingStructureBuilder>,
    pub db: Option<DbPool>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        compensations: Arc<dyn CompensationStore>,
        db: Option<DbPool>,
        config: Arc<AppConfig>,
    ) -> Self {
        let builder = Arc::new(ReportingStructureBuilder::new(employees.clone()));
        Self {
            employees,
            compensations,
            builder,
            db,
            config,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "staffdir server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employee", post(create_employee))
        .route("/employee/{id}", get(read_employee).put(update_employee))
        .route("/reporting-structure/{id}", get(reporting_structure))
        .route("/compensation", post(create_compensation))
        .route("/compensation/{id}", get(read_compensation))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn create_employee(
    State(state): State<AppState>,
    Json(mut employee): Json<Employee>,
) -> HttpResult<(StatusCode, Json<Employee>)> {
    if employee.employee_id.is_empty() {
        employee.employee_id = Uuid::new_v4().to_string();
    }
    let stored = state.employees.save(employee).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn read_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<Employee>> {
    let employee = state
        .employees
        .read(&id)
        .await?
        .ok_or_else(|| HttpError::not_found("employee not found"))?;
    Ok(Json(employee))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut employee): Json<Employee>,
) -> HttpResult<Json<Employee>> {
    state
        .employees
        .read(&id)
        .await?
        .ok_or_else(|| HttpError::not_found("employee not found"))?;
    // The path id wins; ids are immutable.
    employee.employee_id = id;
    let stored = state.employees.save(employee).await?;
    Ok(Json(stored))
}

async fn reporting_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<ReportingStructure>> {
    let structure = state.builder.build(&id).await?;
    Ok(Json(structure))
}

async fn create_compensation(
    State(state): State<AppState>,
    Json(compensation): Json<Compensation>,
) -> HttpResult<(StatusCode, Json<Compensation>)> {
    if compensation.employee.employee_id.is_empty() {
        return Err(HttpError::invalid_input(
            "compensation requires an employee with an employeeId",
        ));
    }
    if compensation.salary < 0 {
        return Err(HttpError::invalid_input("salary must be non-negative"));
    }
    let stored = state.compensations.save(compensation).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn read_compensation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HttpResult<Json<Compensation>> {
    let compensation = state
        .compensations
        .read(&id)
        .await?
        .ok_or_else(|| HttpError::not_found("compensation not found"))?;
    Ok(Json(compensation))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = match &state.db {
        Some(pool) => pool
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                "SELECT 1".to_string(),
            ))
            .await
            .is_ok(),
        None => true,
    };
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl HttpError {
    fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND",
            message: msg.to_string(),
        }
    }

    fn invalid_input(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_INPUT",
            message: msg.to_string(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL",
            message: "internal server error".to_string(),
        }
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(id) => {
                Self::invalid_input(&format!("invalid employee id: {id}"))
            }
            StoreError::Backend(err) => {
                tracing::error!(error = %err, "store backend failure");
                Self::internal()
            }
        }
    }
}

impl From<DirectoryError> for HttpError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(id) => {
                Self::not_found(&format!("unknown employee id: {id}"))
            }
            DirectoryError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message, "code": self.code }));
        (self.status, body).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
