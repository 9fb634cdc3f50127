use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use sme_screener_core::saved_lists::{NewSavedList, SavedList, SavedListUpdate};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct AddCompaniesBody {
    orgnrs: Vec<String>,
}

async fn list_saved_lists(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SavedList>>> {
    Ok(Json(state.saved_list_service.list()?))
}

async fn create_saved_list(
    State(state): State<Arc<AppState>>,
    Json(new_list): Json<NewSavedList>,
) -> ApiResult<(StatusCode, Json<SavedList>)> {
    let list = state.saved_list_service.create(new_list).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

async fn get_saved_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SavedList>> {
    Ok(Json(state.saved_list_service.get(&id)?))
}

async fn update_saved_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut update): Json<SavedListUpdate>,
) -> ApiResult<Json<SavedList>> {
    if !update.id.is_empty() && update.id != id {
        return Err(ApiError::BadRequest(
            "Body id does not match the path".to_string(),
        ));
    }
    update.id = id;
    Ok(Json(state.saved_list_service.update(update).await?))
}

async fn delete_saved_list(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.saved_list_service.delete(id.clone()).await? == 0 {
        return Err(ApiError::NotFound(format!("Saved list {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn add_companies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AddCompaniesBody>,
) -> ApiResult<Json<SavedList>> {
    let list = state
        .saved_list_service
        .add_companies(id, body.orgnrs)
        .await?;
    Ok(Json(list))
}

async fn remove_company(
    State(state): State<Arc<AppState>>,
    Path((id, orgnr)): Path<(String, String)>,
) -> ApiResult<Json<SavedList>> {
    let list = state.saved_list_service.remove_company(id, orgnr).await?;
    Ok(Json(list))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/saved-lists", get(list_saved_lists).post(create_saved_list))
        .route(
            "/saved-lists/{id}",
            get(get_saved_list)
                .put(update_saved_list)
                .delete(delete_saved_list),
        )
        .route("/saved-lists/{id}/companies", post(add_companies))
        .route("/saved-lists/{id}/companies/{orgnr}", delete(remove_company))
}
