// [tests/mirror/apps/gateway/route_topology.test.rs]
/**
 * =================================================================
 * APARATO: ROUTE TOPOLOGY TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L4-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE TOPOLOGÍA, RASTRO Y MANTENIMIENTO
 * =================================================================
 */

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pulse_domain_licensing::LicensingPolicy;
use pulse_infra_issuer::IssuerClientConfig;
use pulse_license_gateway::prelude::*;
use pulse_license_gateway::routes::create_gateway_router;

/// Forja un gateway completo sobre un puerto efímero.
async fn spawn_gateway(workspace: &tempfile::TempDir) -> (SocketAddr, AppState) {
    let settings = Arc::new(GatewaySettings {
        listening_port: 0,
        issuer: IssuerClientConfig {
            // Emisor deliberadamente inalcanzable: estas rutas no lo tocan
            base_url: "http://127.0.0.1:1/".to_string(),
            per_attempt_timeout: Duration::from_millis(200),
            total_deadline: Duration::from_millis(600),
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

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let bind_address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (bind_address, application_state)
}

#[tokio::test]
async fn certify_liveness_and_status_topology() {
    println!("\n🗺️ [PROVING_GROUNDS]: Auditing sovereign route topology...");

    let workspace = tempfile::tempdir().unwrap();
    let (bind_address, _state) = spawn_gateway(&workspace).await;
    let http_probe = reqwest::Client::new();

    // Liveness nominal
    let liveness = http_probe
        .get(format!("http://{bind_address}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(liveness.status(), 200);
    assert_eq!(liveness.text().await.unwrap(), "STATUS_OK");

    // Semáforo de un host virgen: not_activated sin tocar al emisor
    let status_response = http_probe
        .get(format!("http://{bind_address}/api/license/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(status_response.status(), 200);

    let trace_header = status_response
        .headers()
        .get("x-trace-id")
        .expect("L4_TRACE_FAULT: Every transit must echo a trace id.")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!trace_header.is_empty());

    let status_body: serde_json::Value = status_response.json().await.unwrap();
    assert_eq!(status_body["license_status"], "not_activated");

    // Ruta desconocida
    let lost_probe = http_probe
        .get(format!("http://{bind_address}/api/license/unknown"))
        .send()
        .await
        .unwrap();
    assert_eq!(lost_probe.status(), 404);

    println!("   ✅ [SUCCESS]: Topology levelized.");
}

#[tokio::test]
async fn certify_inbound_trace_id_is_honored() {
    let workspace = tempfile::tempdir().unwrap();
    let (bind_address, _state) = spawn_gateway(&workspace).await;

    let response = reqwest::Client::new()
        .get(format!("http://{bind_address}/api/license/renewal"))
        .header("x-trace-id", "upstream-trace-77")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-trace-id").unwrap().to_str().unwrap(),
        "upstream-trace-77",
        "L4_TRACE_FAULT: Inbound trace identity must be preserved."
    );
}

#[tokio::test]
async fn certify_maintenance_shield_intercepts_license_strata() {
    let workspace = tempfile::tempdir().unwrap();
    let (bind_address, application_state) = spawn_gateway(&workspace).await;
    let http_probe = reqwest::Client::new();

    application_state.set_mode(SystemMode::Maintenance("strata reseal".to_string()));

    let intercepted = http_probe
        .get(format!("http://{bind_address}/api/license/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(intercepted.status(), 503, "L4_SHIELD_FAULT: Maintenance must intercept.");

    let shield_body: serde_json::Value = intercepted.json().await.unwrap();
    assert_eq!(shield_body["error"], "MAINTENANCE_ACTIVE");

    // La liveness externa al estrato de licencia sobrevive
    let liveness = http_probe
        .get(format!("http://{bind_address}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(liveness.status(), 200);

    application_state.set_mode(SystemMode::Operational);
    let recovered = http_probe
        .get(format!("http://{bind_address}/api/license/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(recovered.status(), 200);
}
