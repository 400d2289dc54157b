use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::application::{
    GetMarginUseCase, GetOrdersUseCase, GetPositionsUseCase, InitializeBotCommand,
    InitializeBotUseCase, LaunchConfig, TableSet, UploadBotCommand, UploadBotUseCase,
};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// GET /bot_manager/healthcheck
pub async fn healthcheck() -> Json<Data<&'static str>> {
    Json(Data::new("OK"))
}

/// POST /bot_manager/management/upload
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Data<UploadResponse>>, ApiError> {
    let req: UploadRequest = serde_json::from_value(body)
        .map_err(|err| ApiError::validation(format!("invalid upload payload: {err}")))?;

    let use_case = UploadBotUseCase::new(Arc::clone(&state.store), &state.config.strategies_dir);
    let bot_id = req.bot_id.clone();
    use_case
        .execute(UploadBotCommand {
            bot_id: req.bot_id,
            strategy: req.strategy,
            api_key_id: req.api_key_id,
            api_key_secret: req.api_key_secret,
            exchange: req.exchange,
            port_number: req.port_number,
            pair: req.pair,
        })
        .await?;

    Ok(Json(Data::new(UploadResponse {
        bot_id,
        upload: "OK",
    })))
}

/// POST /bot_manager/management/initiliaze
///
/// The route keeps the producers' historical spelling; clients depend on it.
pub async fn initialize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Data<InitializeResponse>>, ApiError> {
    let req: InitializeRequest = serde_json::from_value(body)
        .map_err(|err| ApiError::validation(format!("invalid payload: {err}")))?;

    let use_case = InitializeBotUseCase::new(
        Arc::clone(&state.store),
        Arc::clone(&state.runtime),
        LaunchConfig {
            image: state.config.docker.image.clone(),
            network: state.config.docker.network.clone(),
            strategies_dir: state.config.strategies_dir.clone(),
        },
    );

    let bot_id = req.bot_id.clone();
    let status = use_case.execute(InitializeBotCommand { bot_id: req.bot_id }).await?;

    Ok(Json(Data::new(InitializeResponse { bot_id, status })))
}

/// GET /bot_manager/margin
pub async fn margin(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Data<MarginResponse>>, ApiError> {
    let use_case = GetMarginUseCase::new(Arc::clone(&state.store), Arc::clone(&state.source));
    let view = use_case.execute(Utc::now().date_naive()).await?;

    Ok(Json(Data::new(MarginResponse {
        margin_response_object: view,
    })))
}

/// GET /bot_manager/orders/get
pub async fn orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Data<Vec<OrdersEntry>>>, ApiError> {
    let use_case = GetOrdersUseCase::new(Arc::clone(&state.store), Arc::clone(&state.source));
    let books = use_case.execute(Utc::now().date_naive()).await?;

    Ok(Json(Data::new(
        books.into_iter().map(OrdersEntry::from).collect(),
    )))
}

/// GET /bot_manager/positions?type=
pub async fn positions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PositionsQuery>,
) -> Result<Json<Data<Vec<PositionsEntry>>>, ApiError> {
    let set = match query.table.as_deref() {
        Some("paperTrade") => TableSet::Paper,
        _ => TableSet::Live,
    };

    let use_case = GetPositionsUseCase::new(Arc::clone(&state.store));
    let books = use_case.execute(set).await?;

    Ok(Json(Data::new(
        books.into_iter().map(PositionsEntry::from).collect(),
    )))
}
