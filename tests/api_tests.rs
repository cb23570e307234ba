//! API integration tests
//!
//! These run against a live server with the default slot set provisioned.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn create_booking(client: &Client, slot: &str, minutes: i64) -> Value {
    let from = Utc::now();
    let until = from + Duration::minutes(minutes);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "slot_number": slot,
            "vehicle_number": "MH12AB1234",
            "owner_name": "Test Owner",
            "phone_number": "9800011122",
            "booked_from": from.to_rfc3339(),
            "booked_until": until.to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse create response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_slots() {
    let client = Client::new();

    let response = client
        .get(format!("{}/slots", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let slots = body.as_array().expect("Expected slot array");
    assert!(!slots.is_empty());
    assert!(slots[0]["slot_number"].is_string());
    assert!(slots[0]["sensor_id"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_create_and_cancel_booking() {
    let client = Client::new();

    let body = create_booking(&client, "A04", 120).await;
    let bill_number = body["booking"]["bill_number"].as_str().expect("No bill number");
    assert_eq!(body["booking"]["status"], "reserved");
    assert_eq!(body["booking"]["total_amount"], "20.00");

    // Fetch it back with breakdown and payment data
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, bill_number))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let details: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(details["breakdown"].as_array().unwrap().len(), 2);
    assert!(details["payment"]["payment_url"]
        .as_str()
        .unwrap()
        .starts_with("upi://pay?"));

    // Cancel and verify the slot frees up
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, bill_number))
        .json(&json!({ "cancellation_reason": "test" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Second cancel is a state conflict
    let response = client
        .post(format!("{}/bookings/{}/cancel", BASE_URL, bill_number))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_short_booking_rejected() {
    let client = Client::new();
    let from = Utc::now();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "slot_number": "A04",
            "vehicle_number": "MH12AB1234",
            "owner_name": "Test Owner",
            "phone_number": "9800011122",
            "booked_from": from.to_rfc3339(),
            "booked_until": (from + Duration::minutes(30)).to_rfc3339()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "invalid_duration");
}

#[tokio::test]
#[ignore]
async fn test_sensor_lifecycle() {
    let client = Client::new();

    let body = create_booking(&client, "A03", 120).await;
    let bill_number = body["booking"]["bill_number"].as_str().unwrap().to_string();

    // Vehicle arrives
    let response = client
        .post(format!("{}/sensor-data", BASE_URL))
        .json(&json!({ "sensor_id": "SENSOR_003", "is_occupied": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let event: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(event["bill_number"], bill_number.as_str());
    assert_eq!(event["booking_status"], "active");

    // Vehicle leaves
    let response = client
        .post(format!("{}/sensor-data", BASE_URL))
        .json(&json!({ "sensor_id": "SENSOR_003", "is_occupied": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let event: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(event["booking_status"], "completed");

    // Payment moves the completed booking to paid
    let response = client
        .post(format!("{}/bookings/{}/confirm-payment", BASE_URL, bill_number))
        .json(&json!({ "payment_method": "upi" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["booking"]["status"], "paid");
    assert_eq!(body["booking"]["is_paid"], true);
}

#[tokio::test]
#[ignore]
async fn test_unknown_sensor() {
    let client = Client::new();

    let response = client
        .post(format!("{}/sensor-data", BASE_URL))
        .json(&json!({ "sensor_id": "SENSOR_999", "is_occupied": true }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "unknown_sensor");
}
