use std::io::Cursor;
use std::path::PathBuf;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use uuid::Uuid;

use closet_api::api::{create_router, AppState};
use closet_api::middleware::USER_ID_HEADER;

fn upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("closet-api-test-{}", Uuid::new_v4()))
}

fn create_test_server() -> TestServer {
    let state = AppState::in_memory(upload_dir());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn user_header(user_id: Uuid) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(USER_ID_HEADER),
        HeaderValue::from_str(&user_id.to_string()).unwrap(),
    )
}

/// Server that sends the given user id on every request
fn server_as(user_id: Uuid) -> TestServer {
    let mut server = create_test_server();
    let (name, value) = user_header(user_id);
    server.add_header(name, value);
    server
}

async fn add_item(server: &TestServer, category: &str, color: &str, hex: &str) -> Value {
    let response = server
        .post("/api/closet")
        .json(&json!({
            "category": category,
            "color": color,
            "color_hex": hex
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let raster = RgbImage::from_pixel(width, height, Rgb(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(raster)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_requires_user_header() {
    let server = create_test_server();

    let response = server.get("/api/closet").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/closet")
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_list_and_delete_items() {
    let server = server_as(Uuid::new_v4());

    let top = add_item(&server, "top", "white", "#FFFFFF").await;
    add_item(&server, "bottom", "black", "#000000").await;
    assert_eq!(top["wear_count"], 0);

    let response = server.get("/api/closet").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 2);

    let response = server.get("/api/closet").add_query_param("category", "top").await;
    let tops: Vec<Value> = response.json();
    assert_eq!(tops.len(), 1);
    assert_eq!(tops[0]["color"], "white");

    let id = top["id"].as_str().unwrap();
    server
        .delete(&format!("/api/closet/{}", id))
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/closet/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let items: Vec<Value> = server.get("/api/closet").await.json();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_closets_are_private() {
    let server = create_test_server();
    let owner = user_header(Uuid::new_v4());
    let stranger = user_header(Uuid::new_v4());

    let response = server
        .post("/api/closet")
        .add_header(owner.0.clone(), owner.1.clone())
        .json(&json!({ "category": "top", "color": "white" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let item: Value = response.json();

    let items: Vec<Value> = server
        .get("/api/closet")
        .add_header(stranger.0.clone(), stranger.1.clone())
        .await
        .json();
    assert!(items.is_empty());

    server
        .delete(&format!("/api/closet/{}", item["id"].as_str().unwrap()))
        .add_header(stranger.0, stranger.1)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let items: Vec<Value> = server
        .get("/api/closet")
        .add_header(owner.0, owner.1)
        .await
        .json();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_rejects_malformed_hex() {
    let server = server_as(Uuid::new_v4());
    let response = server
        .post("/api/closet")
        .json(&json!({ "category": "top", "color": "red", "color_hex": "red" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/closet")
        .json(&json!({ "category": "top", "color": "red", "color_hex": "FF0000" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hex_surrounding_whitespace_is_trimmed() {
    let server = server_as(Uuid::new_v4());
    let item = add_item(&server, "top", "red", " #A1B2C3 ").await;
    assert_eq!(item["color_hex"], "#A1B2C3");
}

#[tokio::test]
async fn test_record_wear() {
    let server = server_as(Uuid::new_v4());
    let item = add_item(&server, "top", "white", "#FFFFFF").await;

    let response = server
        .post(&format!("/api/closet/{}/wear", item["id"].as_str().unwrap()))
        .await;
    response.assert_status_ok();
    let worn: Value = response.json();
    assert_eq!(worn["wear_count"], 1);
    assert!(!worn["last_worn"].is_null());
}

#[tokio::test]
async fn test_daily_outfit_from_neutral_pair() {
    let server = server_as(Uuid::new_v4());
    add_item(&server, "top", "white", "#FFFFFF").await;
    add_item(&server, "bottom", "black", "#000000").await;

    let response = server.get("/api/outfits/daily").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let outfits = body["outfits"].as_array().unwrap();
    assert_eq!(outfits.len(), 1);
    assert_eq!(outfits[0]["type"], "top_bottom_outfit");
    assert_eq!(outfits[0]["confidence"], 0.9);
    assert_eq!(outfits[0]["weather_suitable"], true);
    assert_eq!(outfits[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["weather"], "moderate");
    assert_eq!(body["occasion"], "casual");
}

#[tokio::test]
async fn test_daily_outfits_empty_wardrobe() {
    let server = server_as(Uuid::new_v4());
    let response = server.get("/api/outfits/daily").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["outfits"].as_array().unwrap().is_empty());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_daily_outfits_respects_limit() {
    let server = server_as(Uuid::new_v4());
    for _ in 0..3 {
        add_item(&server, "dress", "black", "#000000").await;
    }
    add_item(&server, "shoes", "black", "#000000").await;

    let body: Value = server
        .get("/api/outfits/daily")
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(body["outfits"].as_array().unwrap().len(), 1);
    assert_eq!(body["outfits"][0]["type"], "dress_outfit");
}

#[tokio::test]
async fn test_save_and_list_outfits() {
    let server = server_as(Uuid::new_v4());
    let top = add_item(&server, "top", "white", "#FFFFFF").await;
    let bottom = add_item(&server, "bottom", "black", "#000000").await;

    let response = server
        .post("/api/outfits/save")
        .json(&json!({
            "name": "Monday",
            "item_ids": [top["id"], bottom["id"]],
            "occasion": "work"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/outfits/save")
        .json(&json!({ "item_ids": [Uuid::new_v4()] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let outfits: Vec<Value> = server.get("/api/outfits").await.json();
    assert_eq!(outfits.len(), 1);
    assert_eq!(outfits[0]["name"], "Monday");
    assert_eq!(outfits[0]["item_ids"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_shopping_recommendations_for_empty_wardrobe() {
    let server = server_as(Uuid::new_v4());
    let response = server.get("/api/shopping/recommendations").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 5);
    assert!(recommendations.iter().all(|r| r["priority"] == "alta"));
    assert_eq!(body["total_items"], 0);
}

#[tokio::test]
async fn test_shopping_skips_owned_basics() {
    let server = server_as(Uuid::new_v4());
    add_item(&server, "top", "white", "#FFFFFF").await;

    let body: Value = server.get("/api/shopping/recommendations").await.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 4);
    assert!(recommendations.iter().all(|r| r["item"] != "White shirt"));
}

#[tokio::test]
async fn test_color_season_analysis() {
    let user_id = Uuid::new_v4();
    let server = server_as(user_id);
    let response = server
        .post("/api/colors/analyze")
        .json(&json!({
            "skin_tone": "olive",
            "eye_color": "brown",
            "hair_color": "black"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["analysis"]["season"], "autumn");
    assert!(!body["analysis"]["recommended_palette"]
        .as_array()
        .unwrap()
        .is_empty());
    assert_eq!(body["user_id"], user_id.to_string());
}

#[tokio::test]
async fn test_color_compatibility() {
    let server = create_test_server();

    let response = server
        .post("/api/colors/compatibility")
        .json(&json!({ "color_a": "#FF0000", "color_b": "#00FFFF" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["compatible"], true);
    assert_eq!(body["score"], 0.8);

    let response = server
        .post("/api/colors/compatibility")
        .json(&json!({ "color_a": "#FF0000", "color_b": "#zzzzzz" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_classifies_photo() {
    let server = server_as(Uuid::new_v4());

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(png(1, 2, [200, 30, 30]))
            .file_name("dress.png")
            .mime_type("image/png"),
    );
    let response = server.post("/api/closet/upload").multipart(form).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["analysis"]["category"], "dress");
    assert_eq!(body["analysis"]["color_hex"], "#c81e1e");
    assert_eq!(body["item"]["category"], "dress");
    assert!(body["item"]["image_url"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/"));
}

#[tokio::test]
async fn test_upload_form_fields_override_guess() {
    let server = server_as(Uuid::new_v4());

    let form = MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(png(1, 2, [10, 10, 10]))
                .file_name("skirt.png")
                .mime_type("image/png"),
        )
        .add_text("category", "bottom")
        .add_text("color", "black");
    let response = server.post("/api/closet/upload").multipart(form).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["item"]["category"], "bottom");
    assert_eq!(body["item"]["color"], "black");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let server = server_as(Uuid::new_v4());
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"hello".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );
    let response = server.post("/api/closet/upload").multipart(form).await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_chat_round_trip() {
    let server = server_as(Uuid::new_v4());

    let response = server
        .post("/api/chat/message")
        .json(&json!({ "content": "What should I wear?" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user_message"]["is_user"], true);
    assert_eq!(body["ai_response"]["is_user"], false);
    assert_eq!(body["ai_response"]["ai_response"]["options"][0], "build_outfit");

    server
        .post("/api/chat/message")
        .json(&json!({ "content": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let history: Vec<Value> = server.get("/api/chat/messages").await.json();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["content"], "What should I wear?");
}

#[tokio::test]
async fn test_stats() {
    let server = server_as(Uuid::new_v4());
    add_item(&server, "top", "white", "#FFFFFF").await;
    add_item(&server, "top", "blue", "#0000FF").await;
    add_item(&server, "bottom", "black", "#000000").await;

    let body: Value = server.get("/api/stats").await.json();
    assert_eq!(body["total_items"], 3);
    assert_eq!(body["categories"]["top"], 2);
    assert_eq!(body["categories"]["bottom"], 1);
    assert_eq!(body["saved_outfits"], 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header(HeaderName::from_static("x-request-id"));
    assert!(Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
