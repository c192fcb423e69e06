use crate::api::handlers::{require_json, AppState, ErrorResponse};
use crate::model::{NewOrderEntry, OrderEntry};
use crate::store::traits::Store;
use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use itertools::Itertools;

/// GET /users/{userId}/orders
/// All order entries of a user, ordered by table then menu item name
pub async fn list_orders<S: Store>(
    Path(user_id): Path<String>,
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<OrderEntry>>, (StatusCode, Json<ErrorResponse>)> {
    match store.list_order_entries_for_user(&user_id).await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// POST /users/{userId}/orders
/// Submit a batch of orders. The whole batch is validated first; the first
/// incomplete entry or missing reference aborts with nothing written. Entries
/// landing on an existing (table, menu item) key add to its quantity. Responds
/// with the current entries of every table named in the batch.
pub async fn submit_orders<S: Store>(
    Path(user_id): Path<String>,
    State(store): State<AppState<S>>,
    payload: Result<RequestJson<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<OrderEntry>>), (StatusCode, Json<ErrorResponse>)> {
    let body = require_json(payload)?;

    let Some(items) = body.as_array() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "The body of the request must be a list of orders",
            )),
        ));
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let entry = serde_json::from_value::<NewOrderEntry>(item.clone())
            .ok()
            .and_then(|new_entry| new_entry.into_entry(user_id.clone()));
        let Some(entry) = entry else {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Incomplete order data")),
            ));
        };
        entries.push(entry);
    }

    for entry in &entries {
        match store.get_table(&user_id, &entry.table_name).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err((
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse::new(&format!(
                        "Table '{}' not found for user '{}'",
                        entry.table_name, user_id
                    ))),
                ))
            }
            Err(e) => {
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&e.to_string())),
                ))
            }
        }

        match store.get_menu_item(&user_id, &entry.menu_item_name).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err((
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse::new(&format!(
                        "Menu item '{}' not found for user '{}'",
                        entry.menu_item_name, user_id
                    ))),
                ))
            }
            Err(e) => {
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&e.to_string())),
                ))
            }
        }
    }

    let batch_tables: Vec<String> = entries
        .iter()
        .map(|entry| entry.table_name.clone())
        .unique()
        .sorted()
        .collect();

    if let Err(e) = store.insert_order_entries(entries).await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        ));
    }

    let mut updated = Vec::new();
    for table_name in &batch_tables {
        match store.list_order_entries_for_table(&user_id, table_name).await {
            Ok(entries) => updated.extend(entries),
            Err(e) => {
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(&e.to_string())),
                ))
            }
        }
    }

    Ok((StatusCode::CREATED, Json(updated)))
}
