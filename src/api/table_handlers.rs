use crate::api::handlers::{require_json, AppState, ErrorResponse};
use crate::model::{NewTable, Table, TableUpdate};
use crate::store::traits::Store;
use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};

/// GET /users/{userId}/tables
/// All tables of a user, ordered by name
pub async fn list_tables<S: Store>(
    Path(user_id): Path<String>,
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<Table>>, (StatusCode, Json<ErrorResponse>)> {
    match store.list_tables_for_user(&user_id).await {
        Ok(tables) => Ok(Json(tables)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// POST /users/{userId}/tables
/// Insert a new table for the user
pub async fn create_table<S: Store>(
    Path(user_id): Path<String>,
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<NewTable>, JsonRejection>,
) -> Result<(StatusCode, Json<Table>), (StatusCode, Json<ErrorResponse>)> {
    let new_table = require_json(payload)?;

    let Some(table) = new_table.into_table(user_id.clone()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Incomplete table data")),
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

    match store.get_table(&user_id, &table.name).await {
        Ok(Some(_)) => {
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse::new("The table already exists for this user")),
            ))
        }
        Ok(None) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    match store.insert_table(table.clone()).await {
        Ok(()) => Ok((StatusCode::CREATED, Json(table))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// PUT /users/{userId}/tables/{name}
/// Update a table's geometry; fields left out of the body keep their value
pub async fn update_table<S: Store>(
    Path((user_id, name)): Path<(String, String)>,
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<TableUpdate>, JsonRejection>,
) -> Result<Json<Table>, (StatusCode, Json<ErrorResponse>)> {
    let update = require_json(payload)?;

    let mut table = match store.get_table(&user_id, &name).await {
        Ok(Some(table)) => table,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Table not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    update.apply_to(&mut table);

    match store.update_table(&table).await {
        Ok(()) => Ok(Json(table)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// DELETE /users/{userId}/tables/{name}
/// Remove a table and its order entries
pub async fn delete_table<S: Store>(
    Path((user_id, name)): Path<(String, String)>,
    State(store): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match store.delete_table(&user_id, &name).await {
        Ok(true) => Ok(Json(serde_json::json!({
            "message": "Table successfully cleared"
        }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Table not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}
