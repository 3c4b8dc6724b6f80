//! `HttpShopApi` against a local axum server.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::time::Duration;
use storefront::api::{self, ApiRequest, ApiResponse, HttpShopApi, ShopApi};
use storefront::domain::{Category, OrderRequest, PaymentMethod};
use storefront::StorefrontError;

async fn products() -> Json<Value> {
    Json(json!({
        "total": 2,
        "items": [
            {
                "id": "854cef69-976d-4c2a-a18c-2aa45046c390",
                "description": "Если планируете решать задачи в тренажёре, берите два.",
                "image": "/5_Dots.svg",
                "title": "+1 час в сутках",
                "category": "софт-скил",
                "price": 750
            },
            {
                "id": "b06cde61-912f-4663-9751-09956c0eed67",
                "description": "Будет стоять над душой и не давать прокрастинировать.",
                "image": "/Asterisk_2.svg",
                "title": "Мамка-таймер",
                "category": "другое",
                "price": null
            }
        ]
    }))
}

async fn order(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match body["total"].as_u64() {
        Some(0) | None => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Неверная сумма заказа" })),
        )),
        Some(total) => Ok(Json(json!({
            "id": "28c57cb4-3002-4445-8aa1-2a06a5055ae5",
            "total": total
        }))),
    }
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "oops")
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn shop() -> HttpShopApi {
    let app = Router::new()
        .route("/product", get(products))
        .route("/order", post(order));
    HttpShopApi::new(serve(app).await, Duration::from_secs(5)).unwrap()
}

fn order_request(total: u64) -> OrderRequest {
    OrderRequest {
        payment: PaymentMethod::Online,
        address: "Moscow".into(),
        email: "buyer@example.com".into(),
        phone: "+7 900".into(),
        total,
        items: vec!["854cef69-976d-4c2a-a18c-2aa45046c390".into()],
    }
}

#[tokio::test]
async fn fetches_and_decodes_catalog() {
    let api = shop().await;

    let list = api.get_products().await.unwrap();

    assert_eq!(list.total, 2);
    assert_eq!(list.items[0].category, Category::SoftSkill);
    assert_eq!(list.items[0].price, Some(750));
    assert_eq!(list.items[1].category, Category::Other);
    assert_eq!(list.items[1].price, None);
}

#[tokio::test]
async fn places_order() {
    let api = shop().await;

    let result = api.create_order(&order_request(750)).await.unwrap();

    assert_eq!(result.total, 750);
    assert!(result.error.is_none());
    assert!(!result.id.is_empty());
}

#[tokio::test]
async fn error_body_becomes_api_error() {
    let api = shop().await;

    let err = api.create_order(&order_request(0)).await.unwrap_err();

    match err {
        StorefrontError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Неверная сумма заказа");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn refused_order_is_reported_as_rejection() {
    let api = shop().await;

    let response = api::execute(&api, ApiRequest::CreateOrder(order_request(0))).await;

    assert_eq!(
        response,
        ApiResponse::OrderRejected {
            message: "Неверная сумма заказа".into()
        }
    );
}

#[tokio::test]
async fn status_without_error_body_uses_reason_phrase() {
    let app = Router::new().route("/product", get(broken));
    let api = HttpShopApi::new(serve(app).await, Duration::from_secs(5)).unwrap();

    let err = api.get_products().await.unwrap_err();

    assert!(matches!(
        err,
        StorefrontError::Api { status: 500, ref message } if message == "Internal Server Error"
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_failed_order() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = HttpShopApi::new(format!("http://{addr}/"), Duration::from_secs(2)).unwrap();

    let response = api::execute(&api, ApiRequest::CreateOrder(order_request(750))).await;

    assert!(matches!(response, ApiResponse::OrderFailed { .. }));
}
