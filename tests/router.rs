use std::sync::Arc;

use arrangement_server::api::routes::create_router;
use arrangement_server::store::SqliteStore;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_router() -> Router {
    let store = SqliteStore::in_memory().await.unwrap();
    store.migrate().await.unwrap();
    create_router().with_state(Arc::new(store))
}

/// Drive one request through the router without binding a socket
async fn send(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(router: &Router, email: &str, password: &str) {
    let (status, _) = send(
        router,
        "POST",
        "/users/register",
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let router = test_router().await;
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_user_registration() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        "POST",
        "/users/register",
        Some(json!({"email": "a@b.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"email": "a@b.com", "password": "pw"}));

    // Second registration with the same email
    let (status, body) = send(
        &router,
        "POST",
        "/users/register",
        Some(json!({"email": "a@b.com", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "The email already exists");

    // Missing or empty fields
    for payload in [
        json!({"email": "b@c.com"}),
        json!({"password": "pw"}),
        json!({"email": "", "password": "pw"}),
        json!({}),
    ] {
        let (status, body) = send(&router, "POST", "/users/register", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email and password are required");
    }
}

#[tokio::test]
async fn test_user_login() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;

    let (status, body) = send(
        &router,
        "POST",
        "/users/login",
        Some(json!({"email": "a@b.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"], json!({"email": "a@b.com", "password": "pw"}));

    let (status, body) = send(
        &router,
        "POST",
        "/users/login",
        Some(json!({"email": "a@b.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, body) = send(
        &router,
        "POST",
        "/users/login",
        Some(json!({"email": "nobody@b.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = send(
        &router,
        "POST",
        "/users/login",
        Some(json!({"email": "a@b.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_table_crud() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;

    // Creating a table for a user that does not exist
    let (status, body) = send(
        &router,
        "POST",
        "/users/ghost@b.com/tables",
        Some(json!({"name": "T1", "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    // Incomplete payload
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/tables",
        Some(json!({"name": "T1", "x_coordinate": 0, "y_coordinate": 0, "width": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Incomplete table data");

    // Zero coordinates are a valid position
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/tables",
        Some(json!({"name": "T1", "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "T1");
    assert_eq!(body["x_coordinate"], 0.0);
    assert_eq!(body["id_user"], "a@b.com");

    // Duplicate name for the same user
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/tables",
        Some(json!({"name": "T1", "x_coordinate": 5, "y_coordinate": 5, "width": 4, "height": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "The table already exists for this user");

    // Listing is ordered by name
    let (status, _) = send(
        &router,
        "POST",
        "/users/a@b.com/tables",
        Some(json!({"name": "A9", "x_coordinate": 1, "y_coordinate": 1, "width": 2, "height": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, "GET", "/users/a@b.com/tables", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A9", "T1"]);

    // Partial update keeps the untouched fields
    let (status, body) = send(
        &router,
        "PUT",
        "/users/a@b.com/tables/T1",
        Some(json!({"width": 3.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["width"], 3.5);
    assert_eq!(body["x_coordinate"], 0.0);
    assert_eq!(body["height"], 10.0);

    let (status, body) = send(
        &router,
        "PUT",
        "/users/a@b.com/tables/T9",
        Some(json!({"width": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Table not found");

    // Delete, then delete again
    let (status, body) = send(&router, "DELETE", "/users/a@b.com/tables/T1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Table successfully cleared");

    let (status, _) = send(&router, "DELETE", "/users/a@b.com/tables/T1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&router, "GET", "/users/a@b.com/tables", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_crud() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;

    // Incomplete payload
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Pizza", "price": 9.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Incomplete menu item data");

    // Unknown user
    let (status, body) = send(
        &router,
        "POST",
        "/users/ghost@b.com/menu",
        Some(json!({"name": "Pizza", "price": 9.5, "quantity": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    // First insert creates
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Pizza", "price": 9.5, "quantity": 100, "description": "stone oven"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["description"], "stone oven");

    // Posting the same name replaces the whole item; the omitted
    // description is cleared, not kept
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Pizza", "price": 11.0, "quantity": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 11.0);
    assert_eq!(body["description"], Value::Null);

    // PUT only touches the supplied fields
    let (status, body) = send(
        &router,
        "PUT",
        "/users/a@b.com/menu/Pizza",
        Some(json!({"quantity": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 42);
    assert_eq!(body["price"], 11.0);

    let (status, body) = send(
        &router,
        "PUT",
        "/users/a@b.com/menu/Sushi",
        Some(json!({"quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Menu item not found");

    // Listing is ordered by name
    let (status, _) = send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Cola", "price": 2.5, "quantity": 200})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&router, "GET", "/users/a@b.com/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cola", "Pizza"]);

    // Delete, then delete again
    let (status, body) = send(&router, "DELETE", "/users/a@b.com/menu/Pizza", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Menu item successfully deleted");

    let (status, _) = send(&router, "DELETE", "/users/a@b.com/menu/Pizza", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_submission_accumulates() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;
    send(
        &router,
        "POST",
        "/users/a@b.com/tables",
        Some(json!({"name": "T1", "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
    )
    .await;
    send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Pizza", "price": 9.5, "quantity": 100})),
    )
    .await;

    let order = json!([{"table_name": "T1", "menu_item_name": "Pizza", "quantity": 2}]);

    let (status, body) = send(&router, "POST", "/users/a@b.com/orders", Some(order.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!([{"table_name": "T1", "menu_item_name": "Pizza", "id_user": "a@b.com", "quantity": 2}])
    );

    // The same submission again adds onto the existing entry
    let (status, body) = send(&router, "POST", "/users/a@b.com/orders", Some(order)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body[0]["quantity"], 4);

    let (status, body) = send(&router, "GET", "/users/a@b.com/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["quantity"], 4);
}

#[tokio::test]
async fn test_order_submission_validates_batch() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;
    send(
        &router,
        "POST",
        "/users/a@b.com/tables",
        Some(json!({"name": "T1", "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
    )
    .await;
    send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Pizza", "price": 9.5, "quantity": 100})),
    )
    .await;

    // Not a list
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/orders",
        Some(json!({"table_name": "T1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The body of the request must be a list of orders");

    // An incomplete entry anywhere in the batch
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/orders",
        Some(json!([
            {"table_name": "T1", "menu_item_name": "Pizza", "quantity": 1},
            {"table_name": "T1", "menu_item_name": "Pizza"}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Incomplete order data");

    // References to rows the user does not have
    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/orders",
        Some(json!([
            {"table_name": "T1", "menu_item_name": "Pizza", "quantity": 1},
            {"table_name": "T9", "menu_item_name": "Pizza", "quantity": 1}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Table 'T9' not found for user 'a@b.com'");

    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/orders",
        Some(json!([
            {"table_name": "T1", "menu_item_name": "Sushi", "quantity": 1}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Menu item 'Sushi' not found for user 'a@b.com'");

    // None of the rejected batches wrote anything
    let (status, body) = send(&router, "GET", "/users/a@b.com/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_order_batch_spanning_tables() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;
    for name in ["T1", "T2"] {
        send(
            &router,
            "POST",
            "/users/a@b.com/tables",
            Some(json!({"name": name, "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
        )
        .await;
    }
    for (name, price) in [("Pizza", 9.5), ("Cola", 2.5)] {
        send(
            &router,
            "POST",
            "/users/a@b.com/menu",
            Some(json!({"name": name, "price": price, "quantity": 100})),
        )
        .await;
    }

    let (status, body) = send(
        &router,
        "POST",
        "/users/a@b.com/orders",
        Some(json!([
            {"table_name": "T2", "menu_item_name": "Cola", "quantity": 1},
            {"table_name": "T1", "menu_item_name": "Pizza", "quantity": 2},
            {"table_name": "T1", "menu_item_name": "Cola", "quantity": 3},
            {"table_name": "T1", "menu_item_name": "Cola", "quantity": 1}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The response carries the current entries of every table in the batch,
    // ordered by table then menu item name; the duplicate Cola lines on T1
    // collapsed into one entry
    assert_eq!(
        body,
        json!([
            {"table_name": "T1", "menu_item_name": "Cola", "id_user": "a@b.com", "quantity": 4},
            {"table_name": "T1", "menu_item_name": "Pizza", "id_user": "a@b.com", "quantity": 2},
            {"table_name": "T2", "menu_item_name": "Cola", "id_user": "a@b.com", "quantity": 1}
        ])
    );
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;
    register(&router, "b@c.com", "pw").await;

    for user in ["a@b.com", "b@c.com"] {
        send(
            &router,
            "POST",
            &format!("/users/{user}/tables"),
            Some(json!({"name": "T1", "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
        )
        .await;
        send(
            &router,
            "POST",
            &format!("/users/{user}/menu"),
            Some(json!({"name": "Pizza", "price": 9.5, "quantity": 100})),
        )
        .await;
        send(
            &router,
            "POST",
            &format!("/users/{user}/orders"),
            Some(json!([{"table_name": "T1", "menu_item_name": "Pizza", "quantity": 2}])),
        )
        .await;
    }

    let (status, body) = send(&router, "DELETE", "/users/a@b.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User successfully deleted");

    let (status, _) = send(&router, "DELETE", "/users/a@b.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for path in [
        "/users/a@b.com/tables",
        "/users/a@b.com/menu",
        "/users/a@b.com/orders",
    ] {
        let (status, body) = send(&router, "GET", path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    // The other user is untouched
    let (_, body) = send(&router, "GET", "/users/b@c.com/orders", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_table_removes_its_orders() {
    let router = test_router().await;
    register(&router, "a@b.com", "pw").await;
    for name in ["T1", "T2"] {
        send(
            &router,
            "POST",
            "/users/a@b.com/tables",
            Some(json!({"name": name, "x_coordinate": 0, "y_coordinate": 0, "width": 10, "height": 10})),
        )
        .await;
    }
    send(
        &router,
        "POST",
        "/users/a@b.com/menu",
        Some(json!({"name": "Pizza", "price": 9.5, "quantity": 100})),
    )
    .await;
    send(
        &router,
        "POST",
        "/users/a@b.com/orders",
        Some(json!([
            {"table_name": "T1", "menu_item_name": "Pizza", "quantity": 1},
            {"table_name": "T2", "menu_item_name": "Pizza", "quantity": 1}
        ])),
    )
    .await;

    let (status, _) = send(&router, "DELETE", "/users/a@b.com/tables/T1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, "GET", "/users/a@b.com/orders", None).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["table_name"], "T2");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let router = test_router().await;

    let request = Request::builder()
        .method("POST")
        .uri("/users/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}
