//! API Integration Tests
//!
//! Full request/response cycle against `create_router` with latency off.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pairagent_payments::x402::{
    PaymentPayload, PaymentRequired, SettlementResponse, PAYMENT_HEADER, PAYMENT_RESPONSE_HEADER,
};
use pairagent_registry::{AgentRegistry, DeviceProfile};
use pairagent_server::config::PaymentSettings;
use pairagent_server::{create_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PAY_TO: &str = "0x000000000000000000000000000000000000dEaD";
const PAYER: &str = "0xabababababababababababababababababababab";

fn test_state() -> AppState {
    AppState::new(Arc::new(AgentRegistry::default_fleet()), DeviceProfile::default())
        .with_latency(false)
}

fn create_test_router() -> Router {
    create_router(Arc::new(test_state()))
}

fn gated_router() -> Router {
    let payments = PaymentSettings {
        require_payment: true,
        ..Default::default()
    };
    create_router(Arc::new(test_state().with_payments(payments, PAY_TO)))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    let body = match body {
        Some(json_body) => Body::from(serde_json::to_vec(&json_body).unwrap()),
        None => Body::empty(),
    };

    let (status, _, value) = send(router, request.body(body).unwrap()).await;
    (status, value)
}

// =============================================================================
// Health & registry
// =============================================================================

#[tokio::test]
async fn test_health() {
    let router = create_test_router();
    let (status, body) = json_request(&router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["agents"], 4);
    assert_eq!(body["llmPlanning"], false);
    assert_eq!(body["paymentRequired"], false);
}

#[tokio::test]
async fn test_registry_listing() {
    let router = create_test_router();
    let (status, body) = json_request(&router, "GET", "/api/registry", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["device"]["deviceId"], "PP-EV-X402-DEMO");

    let ids: Vec<&str> = body["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["pricing-agent", "routing-agent", "weather-agent", "slot-agent"]);
}

#[tokio::test]
async fn test_registry_single_agent() {
    let router = create_test_router();

    let (status, body) = json_request(&router, "GET", "/api/registry/slot-agent", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "SlotNegotiator");
    assert_eq!(body["pricePerCall"], "0.003");

    let (status, body) = json_request(&router, "GET", "/api/registry/teleport-agent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], -4001);
    assert!(body["msg"].as_str().unwrap().contains("teleport-agent"));
}

// =============================================================================
// Agents
// =============================================================================

#[tokio::test]
async fn test_agents_answer_without_body() {
    let router = create_test_router();
    let expected = [
        ("/api/agents/pricing", "pricing-agent", "0.002"),
        ("/api/agents/routing", "routing-agent", "0.005"),
        ("/api/agents/slot", "slot-agent", "0.003"),
        ("/api/agents/weather", "weather-agent", "0.001"),
    ];

    for (uri, agent_id, price) in expected {
        let (status, body) = json_request(&router, "POST", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["agentId"], agent_id);
        assert_eq!(body["_price"], price);
        assert!(body["recommendation"].is_string());
        assert!(body["metadata"].is_object());
    }
}

#[tokio::test]
async fn test_agent_tolerates_malformed_body() {
    let router = create_test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/agents/pricing")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);

    assert!(body["recommendation"].is_string());
    assert_eq!(body["query"]["radius"], "8km");
}

#[tokio::test]
async fn test_pricing_ranking() {
    let router = create_test_router();
    let (_, body) = json_request(
        &router,
        "POST",
        "/api/agents/pricing",
        Some(json!({"radius": 5, "batteryLevel": 12})),
    )
    .await;

    let stations = body["stations"].as_array().unwrap();
    assert_eq!(stations[0]["priceRank"], 1);
    let rates: Vec<f64> = stations.iter().map(|s| s["rate"].as_f64().unwrap()).collect();
    assert!(rates.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_weather_echoes_location() {
    let router = create_test_router();
    let (_, body) = json_request(
        &router,
        "POST",
        "/api/agents/weather",
        Some(json!({"lat": 40.7, "lng": -74.0})),
    )
    .await;

    assert_eq!(body["location"]["lat"], 40.7);
    assert_eq!(body["location"]["lng"], -74.0);
}

// =============================================================================
// Orchestrator
// =============================================================================

#[tokio::test]
async fn test_orchestrate_empty_body_is_charge() {
    let router = create_test_router();
    let (status, body) = json_request(&router, "POST", "/api/orchestrate", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orchestrator"], "PairAgent EV Brain");
    assert_eq!(body["deviceId"], "PP-EV-X402-DEMO");
    assert_eq!(body["metadata"]["planningMethod"], "rule-based");
    assert_eq!(body["metadata"]["erc8004AgentId"], "8004");

    let plan = &body["plan"];
    assert_eq!(plan["estimatedCost"], "$0.0110");
    let ids: Vec<&str> = plan["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["agentId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["weather-agent", "pricing-agent", "routing-agent", "slot-agent"]);
}

#[tokio::test]
async fn test_orchestrate_scenarios() {
    let router = create_test_router();

    for (scenario, first) in [
        ("maintenance", "weather-agent"),
        ("fleet", "pricing-agent"),
        ("teleport", "weather-agent"),
    ] {
        let (status, body) = json_request(
            &router,
            "POST",
            "/api/orchestrate",
            Some(json!({"batteryLevel": 45, "scenario": scenario})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plan"]["steps"][0]["agentId"], first, "{}", scenario);
        assert_eq!(body["plan"]["estimatedCost"], "$0.0110");
    }
}

#[tokio::test]
async fn test_orchestrate_keeps_fields_around_a_mistyped_one() {
    let router = create_test_router();
    let (status, body) = json_request(
        &router,
        "POST",
        "/api/orchestrate",
        Some(json!({"batteryLevel": 12, "scenario": "fleet", "walletBalance": "1.5"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["steps"][0]["agentId"], "pricing-agent");
    assert_eq!(body["plan"]["steps"][1]["params"]["batteryLevel"], 12.0);

    let (_, body) = json_request(
        &router,
        "POST",
        "/api/orchestrate",
        Some(json!({"batteryLevel": 12, "scenario": 3, "location": "downtown"})),
    )
    .await;
    let trigger = body["plan"]["trigger"].as_str().unwrap();
    assert!(trigger.starts_with("Battery at 12%"), "{}", trigger);
    assert_eq!(body["plan"]["steps"][3]["params"]["priority"], true);
}

#[tokio::test]
async fn test_plan_steps_feed_their_agents() {
    let router = create_test_router();
    let registry = AgentRegistry::default_fleet();

    for (scenario, radius, duration) in [
        ("charge", "8km", "45 min"),
        ("maintenance", "5km", "30 min"),
        ("fleet", "10km", "45 min"),
    ] {
        let (_, body) = json_request(
            &router,
            "POST",
            "/api/orchestrate",
            Some(json!({
                "batteryLevel": 12,
                "location": {"lat": 40.7, "lng": -74.0},
                "scenario": scenario
            })),
        )
        .await;

        let steps = body["plan"]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 4, "{}", scenario);

        for step in steps {
            let agent_id = step["agentId"].as_str().unwrap();
            let endpoint = &registry.get(agent_id).unwrap().endpoint;
            let (status, doc) =
                json_request(&router, "POST", endpoint, Some(step["params"].clone())).await;

            assert_eq!(status, StatusCode::OK, "{} {}", scenario, agent_id);
            assert_eq!(doc["agentId"], agent_id);
            match agent_id {
                "routing-agent" => {
                    assert_eq!(doc["energyAnalysis"]["currentBattery"], "12%", "{}", scenario);
                    assert_eq!(doc["energyAnalysis"]["estimatedArrivalBattery"], "8.9%");
                }
                "weather-agent" => {
                    assert_eq!(doc["location"]["lat"], 40.7, "{}", scenario);
                    assert_eq!(doc["location"]["lng"], -74.0);
                }
                "pricing-agent" => assert_eq!(doc["query"]["radius"], radius),
                "slot-agent" => assert_eq!(doc["booking"]["duration"], duration),
                other => panic!("unexpected agent {}", other),
            }
        }
    }
}

#[tokio::test]
async fn test_slot_with_huge_duration() {
    let router = create_test_router();
    let (status, body) = json_request(
        &router,
        "POST",
        "/api/agents/slot",
        Some(json!({"duration": 1_000_000_000_000i64, "stationId": "gc9"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["duration"], "1440 min");
    assert_eq!(body["booking"]["stationId"], "gc9");
}

// =============================================================================
// x402 gate
// =============================================================================

#[tokio::test]
async fn test_gate_open_by_default() {
    let router = create_test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/agents/routing")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(PAYMENT_RESPONSE_HEADER).is_none());
}

#[tokio::test]
async fn test_gate_requires_payment() {
    let router = gated_router();
    let (status, body) = json_request(&router, "POST", "/api/agents/pricing", Some(json!({}))).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    let challenge: PaymentRequired = serde_json::from_value(body).unwrap();
    assert_eq!(challenge.x402_version, 1);
    assert_eq!(challenge.accepts.len(), 1);
    assert_eq!(challenge.accepts[0].max_amount_required, "2000");
    assert_eq!(challenge.accepts[0].pay_to, PAY_TO);
    assert_eq!(challenge.accepts[0].resource, "/api/agents/pricing");
}

#[tokio::test]
async fn test_gate_accepts_valid_payment() {
    let router = gated_router();

    let (_, challenge) = json_request(&router, "POST", "/api/agents/slot", None).await;
    let challenge: PaymentRequired = serde_json::from_value(challenge).unwrap();
    let header = PaymentPayload::authorize(PAYER, &challenge.accepts[0])
        .encode()
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/agents/slot")
        .header(PAYMENT_HEADER, header)
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agentId"], "slot-agent");

    let settlement = headers
        .get(PAYMENT_RESPONSE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(SettlementResponse::from_header)
        .unwrap();
    assert!(settlement.success);
    assert_eq!(settlement.tx_hash.len(), 66);
    assert_eq!(settlement.payer.as_deref(), Some(PAYER));
}

#[tokio::test]
async fn test_gate_rejects_bad_payment() {
    let router = gated_router();

    let request = Request::builder()
        .method("POST")
        .uri("/api/agents/weather")
        .header(PAYMENT_HEADER, "definitely-not-base64!")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert!(body["error"].as_str().unwrap().contains("Malformed"));

    let (_, challenge) = json_request(&router, "POST", "/api/agents/routing", None).await;
    let challenge: PaymentRequired = serde_json::from_value(challenge).unwrap();
    let mut payload = PaymentPayload::authorize(PAYER, &challenge.accepts[0]);
    payload.authorization.value = "1".to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/agents/routing")
        .header(PAYMENT_HEADER, payload.encode().unwrap())
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert!(headers.get(PAYMENT_RESPONSE_HEADER).is_none());
    assert!(body["error"].as_str().unwrap().contains("insufficient"));
}

#[tokio::test]
async fn test_gate_leaves_other_routes_alone() {
    let router = gated_router();
    let (status, _) = json_request(&router, "POST", "/api/orchestrate", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = json_request(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
