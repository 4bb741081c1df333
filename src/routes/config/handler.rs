use axum::{Json, extract::State};

use super::model::ServerInfo;
use crate::AppState;

pub async fn get_config(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(ServerInfo::from_config(&state.config))
}
