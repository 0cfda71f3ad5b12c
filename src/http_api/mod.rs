use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    CalendarConfig, CustodyTable, LoadError, MonthKey, RowColorizer, StyledTable, TableCache,
    TableSource, colorize::legend, month::MonthKeyError, render::PageContext,
    render::render_html_page,
};

#[derive(Clone)]
pub struct AppState {
    cache: Arc<TableCache>,
    source: TableSource,
    today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(cache: Arc<TableCache>, source: TableSource) -> Self {
        Self {
            cache,
            source,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn config(&self) -> &CalendarConfig {
        self.cache.config()
    }

    /// Loads through the cache on the blocking pool; remote sources use a
    /// blocking client.
    async fn table(&self) -> Result<Arc<CustodyTable>, ApiError> {
        let cache = self.cache.clone();
        let source = self.source.clone();
        tokio::task::spawn_blocking(move || cache.get_or_load(&source))
            .await
            .map_err(|err| ApiError::internal(err.to_string()))?
            .map_err(ApiError::from)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<LoadError> for ApiError {
    fn from(value: LoadError) -> Self {
        tracing::error!(error = %value, "calendar load failed");
        ApiError::Internal(value.to_string())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<MonthKeyError> for ApiError {
    fn from(value: MonthKeyError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct MonthEntry {
    code: String,
    label: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/months", get(list_months))
        .route("/calendar", get(month_calendar))
        .route("/calendar/today", get(today_window))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_months(State(state): State<AppState>) -> Result<Json<Vec<MonthEntry>>, ApiError> {
    let table = state.table().await?;
    let language = state.config().language;
    let months = table
        .months()?
        .into_iter()
        .map(|month| MonthEntry {
            code: month.code(),
            label: month.label(language),
        })
        .collect();
    Ok(Json(months))
}

/// The requested month, or the default month for today.
fn selected_month(
    query: &MonthQuery,
    table: &CustodyTable,
    today: NaiveDate,
) -> Result<Option<MonthKey>, ApiError> {
    match query.month.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => Ok(Some(code.parse::<MonthKey>()?)),
        _ => Ok(table.default_month(today)?),
    }
}

/// Styles `table` with the same-day highlight on `today`.
fn styled(
    state: &AppState,
    table: &CustodyTable,
    today: NaiveDate,
) -> Result<StyledTable, ApiError> {
    let config = state.config();
    let colorizer = RowColorizer::anchored(config, today);
    Ok(StyledTable::build(
        table,
        &colorizer,
        &config.palette,
        config.language,
    )?)
}

async fn month_calendar(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<StyledTable>, ApiError> {
    let table = state.table().await?;
    let filtered = match selected_month(&query, &table, state.today())? {
        Some(month) => table.filter_month(month)?,
        None => table.as_ref().clone(),
    };
    Ok(Json(styled(&state, &filtered, state.today())?))
}

async fn today_window(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<StyledTable>, ApiError> {
    let anchor = match query.date.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::invalid(format!("invalid date '{raw}' (expected YYYY-MM-DD)")))?,
        None => state.today(),
    };
    let table = state.table().await?;
    let window = state.config().window;
    let slice = table.window_around(anchor, window.before, window.after)?;
    Ok(Json(styled(&state, &slice, anchor)?))
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Html<String>, ApiError> {
    let table = state.table().await?;
    let config = state.config();
    let months = table.months()?;
    let selected = selected_month(&query, &table, state.today())?;
    let filtered = match selected {
        Some(month) => table.filter_month(month)?,
        None => table.as_ref().clone(),
    };
    let styled = styled(&state, &filtered, state.today())?;
    let legend = legend(config);
    let page = render_html_page(
        &styled,
        &PageContext {
            title: &config.title,
            language: config.language,
            months: &months,
            selected,
            legend: &legend,
        },
    );
    Ok(Html(page))
}
