// [tests/mirror/apps/gateway/status_uplink.test.rs]
/**
 * =================================================================
 * APARATO: STATUS UPLINK TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L4-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DEL BUS DE EVENTOS EN EL CICLO HTTP
 * =================================================================
 */

use axum::{http::StatusCode, routing::post, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pulse_domain_licensing::LicensingPolicy;
use pulse_infra_issuer::IssuerClientConfig;
use pulse_license_gateway::prelude::*;
use pulse_license_gateway::routes::create_gateway_router;

async fn handle_nominal_burst(
    Json(_request_body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "success": true, "activationId": "act_A", "duration": "1m" })),
    )
}

async fn spawn_gateway_with_stub(workspace: &tempfile::TempDir) -> (SocketAddr, AppState) {
    // Emisor de utilería
    let issuer_router = Router::new().route("/", post(handle_nominal_burst));
    let issuer_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let issuer_address = issuer_listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(issuer_listener, issuer_router).await.unwrap();
    });

    // Gateway completo
    let settings = Arc::new(GatewaySettings {
        listening_port: 0,
        issuer: IssuerClientConfig {
            base_url: format!("http://{issuer_address}/"),
            per_attempt_timeout: Duration::from_secs(2),
            total_deadline: Duration::from_secs(6),
            pinned_roots_pem: None,
        },
        policy: LicensingPolicy::default(),
        entitlement_path: workspace.path().join("entitlement.bin"),
        attempt_ledger_path: workspace.path().join("attempts.json"),
        revalidation_interval: Duration::from_secs(3600),
    });

    let kernel = GatewayKernel::ignite(settings).expect("L4_IGNITION_FAULT");
    let application_state = kernel.application_shared_state.clone();
    let router = create_gateway_router(application_state.clone());

    let gateway_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gateway_address = gateway_listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            gateway_listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (gateway_address, application_state)
}

#[tokio::test]
async fn certify_activation_emits_status_envelope() {
    println!("\n📡 [PROVING_GROUNDS]: Auditing status envelope emission...");

    // 1. SETUP: Suscriptor del bus ANTES de la ráfaga de activación
    let workspace = tempfile::tempdir().unwrap();
    let (gateway_address, application_state) = spawn_gateway_with_stub(&workspace).await;
    let mut bus_subscriber = application_state.event_bus.subscribe();

    // 2. EXECUTION: Activación vía fachada HTTP
    let activation_response = reqwest::Client::new()
        .post(format!("http://{gateway_address}/api/license/activate"))
        .json(&serde_json::json!({ "license_key": "ISX-1234-5678-90AB-CDEF" }))
        .send()
        .await
        .unwrap();
    assert_eq!(activation_response.status(), 200);

    // 3. VALIDATION: El sobre {type, data, timestamp} llega al enlace
    let envelope = tokio::time::timeout(Duration::from_secs(2), bus_subscriber.recv())
        .await
        .expect("L4_TIMEOUT_FAULT: Envelope never arrived.")
        .expect("L4_CHANNEL_FAULT: Bus collapsed.");

    assert_eq!(envelope.event_type, "license_status");
    assert_eq!(envelope.data["license_status"], "active");
    assert!(envelope.data["days_left"].as_i64().unwrap() > 0);

    println!("   ✅ [SUCCESS]: Real-time semaphore levelized.");
}

#[tokio::test]
async fn certify_deactivation_emits_band_change() {
    let workspace = tempfile::tempdir().unwrap();
    let (gateway_address, application_state) = spawn_gateway_with_stub(&workspace).await;
    let http_probe = reqwest::Client::new();

    let mut bus_subscriber = application_state.event_bus.subscribe();

    http_probe
        .post(format!("http://{gateway_address}/api/license/activate"))
        .json(&serde_json::json!({ "license_key": "ISX-1234-5678-90AB-CDEF" }))
        .send()
        .await
        .unwrap();

    // El emisor de utilería reconoce la liberación; la purga local
    // transiciona la banda del semáforo.
    http_probe
        .post(format!("http://{gateway_address}/api/license/deactivate"))
        .send()
        .await
        .unwrap();

    // Primer sobre: active; segundo sobre: not_activated
    let first_envelope = tokio::time::timeout(Duration::from_secs(2), bus_subscriber.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first_envelope.data["license_status"], "active");

    let second_envelope = tokio::time::timeout(Duration::from_secs(2), bus_subscriber.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second_envelope.data["license_status"], "not_activated");
}
