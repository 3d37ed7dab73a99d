use crate::errors::{AppError, StoreError};
use crate::models::{
    ActionResponse, AddProductRequest, CatalogResponse, DayQuery, DayView, SaveStatRequest,
    SelectProductRequest, StatsQuery, StatsSummary,
};
use crate::notify::{Toast, ToastKind};
use crate::selection::selection_after_removal;
use crate::state::AppState;
use crate::stats::{
    date_key, day_view, historical_products, parse_date, summarize, DateRange, ProductFilter,
};
use crate::store::OrderStore;
use crate::ui::render_index;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::{error, warn};

pub async fn index<S: OrderStore>(State(state): State<AppState<S>>) -> Html<String> {
    let date = today();
    let catalog = state.live.catalog();
    let selected = state.selection().await;
    let view = state
        .live
        .with_records(|records| day_view(records, date, selected.as_deref()));
    Html(render_index(&view, &catalog))
}

pub async fn get_products<S: OrderStore>(
    State(state): State<AppState<S>>,
) -> Json<CatalogResponse> {
    let selected = state.selection().await;
    Json(CatalogResponse {
        products: state.live.catalog(),
        selected,
    })
}

pub async fn add_product<S: OrderStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<AddProductRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let payload = json_body(&state, payload).await?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(reject(&state, "product name is empty").await);
    }
    if state.live.has_product(name) {
        return Err(reject(&state, format!("product \"{name}\" already exists")).await);
    }

    if let Err(err) = state.store.add_product(name).await {
        return Err(fail(&state, err, "failed to add product").await);
    }

    Ok(Json(done(&state, ToastKind::Success, format!("added \"{name}\"")).await))
}

pub async fn delete_product<S: OrderStore>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    let catalog = state.live.catalog();
    let current = state.selection().await;
    let next = selection_after_removal(current.as_deref(), &name, &catalog);

    if let Err(err) = state.store.remove_product(&name).await {
        return Err(fail(&state, err, "failed to remove product").await);
    }
    state.select(next).await;

    Ok(Json(done(&state, ToastKind::Info, format!("removed \"{name}\"")).await))
}

pub async fn select_product<S: OrderStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<SelectProductRequest>, JsonRejection>,
) -> Result<Json<CatalogResponse>, AppError> {
    let payload = json_body(&state, payload).await?;
    if !state.live.has_product(&payload.product) {
        return Err(reject(&state, format!("unknown product \"{}\"", payload.product)).await);
    }
    state.select(Some(payload.product)).await;
    Ok(get_products(State(state)).await)
}

pub async fn get_day<S: OrderStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayView>, AppError> {
    let date = match non_empty(query.date) {
        Some(value) => require_date(&state, &value).await?,
        None => today(),
    };
    let product = match non_empty(query.product) {
        Some(product) => Some(product),
        None => state.selection().await,
    };

    Ok(Json(state.live.with_records(|records| {
        day_view(records, date, product.as_deref())
    })))
}

pub async fn save_day<S: OrderStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<SaveStatRequest>, JsonRejection>,
) -> Result<Json<DayView>, AppError> {
    let payload = json_body(&state, payload).await?;
    let date = require_date(&state, &payload.date).await?;
    let product = match non_empty(payload.product) {
        Some(product) => product,
        None => match state.selection().await {
            Some(product) => product,
            None => return Err(reject(&state, "select a product first").await),
        },
    };

    if let Err(err) = state
        .store
        .save_product_stat(&date_key(date), &product, payload.stat)
        .await
    {
        return Err(fail(&state, err, "failed to save stats").await);
    }
    state.notify(ToastKind::Success, "stats saved").await;

    Ok(Json(state.live.with_records(|records| {
        day_view(records, date, Some(product.as_str()))
    })))
}

pub async fn get_stats<S: OrderStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsSummary>, AppError> {
    let filter = ProductFilter::parse(query.product.as_deref());
    let start = optional_date(&state, query.start).await?;
    let end = optional_date(&state, query.end).await?;
    let range = DateRange::new(start, end);

    Ok(Json(
        state
            .live
            .with_records(|records| summarize(records, &filter, &range)),
    ))
}

pub async fn get_historical_products<S: OrderStore>(
    State(state): State<AppState<S>>,
) -> Json<Vec<String>> {
    Json(state.live.with_records(historical_products))
}

pub async fn reset_stats<S: OrderStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<ActionResponse>, AppError> {
    if let Err(err) = state.store.delete_all_daily_records().await {
        return Err(fail(&state, err, "failed to reset statistics").await);
    }
    Ok(Json(done(&state, ToastKind::Success, "all statistics deleted").await))
}

pub async fn get_notifications<S: OrderStore>(
    State(state): State<AppState<S>>,
) -> Json<Vec<Toast>> {
    Json(state.active_notifications().await)
}

async fn done<S: OrderStore>(
    state: &AppState<S>,
    kind: ToastKind,
    message: impl Into<String>,
) -> ActionResponse {
    let message = message.into();
    state.notify(kind, message.clone()).await;
    ActionResponse { ok: true, message }
}

async fn reject<S: OrderStore>(state: &AppState<S>, message: impl Into<String>) -> AppError {
    let message = message.into();
    warn!("rejected request: {message}");
    state.notify(ToastKind::Warning, message.clone()).await;
    AppError::bad_request(message)
}

async fn fail<S: OrderStore>(state: &AppState<S>, err: StoreError, message: &str) -> AppError {
    error!("{message}: {err}");
    state.notify(ToastKind::Error, message).await;
    AppError::from(err)
}

async fn json_body<S: OrderStore, T: Send>(
    state: &AppState<S>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(reject(state, rejection.body_text()).await),
    }
}

async fn require_date<S: OrderStore>(state: &AppState<S>, value: &str) -> Result<NaiveDate, AppError> {
    match parse_date(value) {
        Some(date) => Ok(date),
        None => Err(reject(state, format!("invalid date \"{value}\", expected YYYY-MM-DD")).await),
    }
}

async fn optional_date<S: OrderStore>(
    state: &AppState<S>,
    value: Option<String>,
) -> Result<Option<String>, AppError> {
    match non_empty(value) {
        Some(value) => Ok(Some(date_key(require_date(state, &value).await?))),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
