use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sim_runtime::RunLogEventKind;

use crate::quantity::sanitize_quantity;
use crate::state::{AppState, FeedEvent, FillBody, OrderSide, PercentilesBody, SnapshotBody};
use crate::ws;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/simulator/state", get(simulator_state))
        .route("/simulator/trades", post(submit_trade))
        .route("/simulator/metrics", get(simulator_metrics))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TradeRequest {
    side: OrderSide,
    #[serde(default)]
    quantity: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct TradeResponse {
    fill: FillBody,
    state: SnapshotBody,
}

#[derive(Debug, Serialize)]
struct TradeRejection {
    reason: String,
}

async fn simulator_state(State(state): State<AppState>) -> Json<SnapshotBody> {
    let snapshot = state.session().lock().await.snapshot();
    Json(snapshot.into())
}

async fn submit_trade(
    State(state): State<AppState>,
    Json(request): Json<TradeRequest>,
) -> impl IntoResponse {
    let qty = sanitize_quantity(&request.quantity);

    let mut session = state.session().lock().await;
    let result = match request.side {
        OrderSide::Buy => session.buy(qty),
        OrderSide::Sell => session.sell(qty),
    };
    let snapshot = session.snapshot();
    drop(session);

    match result {
        Ok(fill) => {
            let fill: FillBody = fill.into();
            let _ = state.publish_event(FeedEvent::TradeAccepted {
                side: fill.side,
                qty: fill.qty,
                price: fill.price,
                notional: fill.notional,
            });
            state.log_trade(snapshot.tick, RunLogEventKind::TradeAccepted, None);

            (
                StatusCode::OK,
                Json(TradeResponse {
                    fill,
                    state: snapshot.into(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            let reason = err.to_string();
            let _ = state.publish_event(FeedEvent::TradeRejected {
                side: request.side,
                requested_qty: qty,
                reason: reason.clone(),
            });
            state.log_trade(
                snapshot.tick,
                RunLogEventKind::TradeRejected,
                Some(reason.clone()),
            );

            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(TradeRejection { reason }),
            )
                .into_response()
        }
    }
}

async fn simulator_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.tick_percentiles() {
        Some(report) => {
            let body: PercentilesBody = report.into();
            (StatusCode::OK, Json(body)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
