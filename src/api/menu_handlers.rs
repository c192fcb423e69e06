use crate::api::handlers::{require_json, AppState, ErrorResponse};
use crate::model::{MenuItem, MenuItemUpdate, NewMenuItem};
use crate::store::traits::Store;
use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};

/// GET /users/{userId}/menu
/// All menu items of a user, ordered by name
pub async fn list_menu<S: Store>(
    Path(user_id): Path<String>,
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<MenuItem>>, (StatusCode, Json<ErrorResponse>)> {
    match store.list_menu_for_user(&user_id).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// POST /users/{userId}/menu
/// Insert a menu item, or replace it wholesale when it already exists.
/// A replace overwrites every field, so a body without `description`
/// clears any stored one.
pub async fn upsert_menu_item<S: Store>(
    Path(user_id): Path<String>,
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<NewMenuItem>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuItem>), (StatusCode, Json<ErrorResponse>)> {
    let new_item = require_json(payload)?;

    let Some(item) = new_item.into_menu_item(user_id.clone()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Incomplete menu item data")),
        ));
    };

    match store.get_user(&user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("User not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    let status = match store.get_menu_item(&user_id, &item.name).await {
        Ok(Some(_)) => StatusCode::OK,
        Ok(None) => StatusCode::CREATED,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    match store.upsert_menu_item(item.clone()).await {
        Ok(()) => Ok((status, Json(item))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// PUT /users/{userId}/menu/{name}
/// Update a menu item; fields left out of the body keep their value
pub async fn update_menu_item<S: Store>(
    Path((user_id, name)): Path<(String, String)>,
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<MenuItemUpdate>, JsonRejection>,
) -> Result<Json<MenuItem>, (StatusCode, Json<ErrorResponse>)> {
    let update = require_json(payload)?;

    let mut item = match store.get_menu_item(&user_id, &name).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Menu item not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    update.apply_to(&mut item);

    match store.upsert_menu_item(item.clone()).await {
        Ok(()) => Ok(Json(item)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// DELETE /users/{userId}/menu/{name}
/// Remove a menu item and its order entries
pub async fn delete_menu_item<S: Store>(
    Path((user_id, name)): Path<(String, String)>,
    State(store): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match store.delete_menu_item(&user_id, &name).await {
        Ok(true) => Ok(Json(serde_json::json!({
            "message": "Menu item successfully deleted"
        }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Menu item not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}
