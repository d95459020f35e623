// [tests/mirror/libs/domain/licensing/manager_scenarios.test.rs]
/**
 * =================================================================
 * APARATO: MANAGER SCENARIOS TEST (V4.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE FLUJOS DE ACTIVACIÓN DE PUNTA A PUNTA
 * =================================================================
 */

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use pulse_core_vault::EntitlementVault;
use pulse_domain_licensing::{ActivationOutcome, LicenseManager, LicensingPolicy};
use pulse_domain_models::{EventEnvelope, LicenseFault, LicenseState};
use pulse_infra_issuer::{IssuerClient, IssuerClientConfig};

type StubScript = Arc<dyn Fn(usize) -> (u16, serde_json::Value) + Send + Sync>;

#[derive(Clone)]
struct StubIssuerState {
    burst_counter: Arc<AtomicUsize>,
    script: StubScript,
}

async fn handle_stub_burst(
    State(stub_state): State<StubIssuerState>,
    Json(_request_body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    let burst_ordinal = stub_state.burst_counter.fetch_add(1, Ordering::SeqCst);
    let (status_code, response_body) = (stub_state.script)(burst_ordinal);
    (StatusCode::from_u16(status_code).unwrap(), Json(response_body))
}

async fn spawn_stub_issuer(script: StubScript) -> (SocketAddr, Arc<AtomicUsize>) {
    let stub_state = StubIssuerState {
        burst_counter: Arc::new(AtomicUsize::new(0)),
        script,
    };
    let burst_counter = Arc::clone(&stub_state.burst_counter);

    let router = Router::new()
        .route("/", post(handle_stub_burst))
        .with_state(stub_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let bind_address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (bind_address, burst_counter)
}

/// Forja el corazón completo contra el emisor de utilería.
fn forge_manager(
    bind_address: SocketAddr,
    vault_directory: &tempfile::TempDir,
    policy: LicensingPolicy,
) -> (LicenseManager, broadcast::Receiver<EventEnvelope>) {
    let fingerprint = pulse_core_fingerprint::host_fingerprint().unwrap();
    let vault = EntitlementVault::new(
        vault_directory.path().join("entitlement.bin"),
        fingerprint.primary_hash,
    );

    let issuer = Arc::new(
        IssuerClient::ignite(&IssuerClientConfig {
            base_url: format!("http://{bind_address}/"),
            per_attempt_timeout: Duration::from_secs(2),
            total_deadline: Duration::from_secs(6),
            pinned_roots_pem: None,
        })
        .unwrap(),
    );

    let (event_sender, event_receiver) = broadcast::channel(32);
    (
        LicenseManager::new(vault, issuer, policy, event_sender),
        event_receiver,
    )
}

fn nominal_grant_body() -> serde_json::Value {
    serde_json::json!({ "success": true, "activationId": "act_A", "duration": "1m" })
}

#[tokio::test]
async fn certify_fresh_scratch_activation() {
    println!("\n🎫 [PROVING_GROUNDS]: Auditing fresh scratch activation...");

    // 1. SETUP: Emisor nominal y corazón limpio
    let (bind_address, burst_counter) =
        spawn_stub_issuer(Arc::new(|_ordinal| (200, nominal_grant_body()))).await;
    let workspace = tempfile::tempdir().unwrap();
    let (manager, mut event_receiver) =
        forge_manager(bind_address, &workspace, LicensingPolicy::default());

    // 2. EXECUTION: Activación de la Scratch Card
    let receipt = manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .expect("L2_ACTIVATION_FAULT: Nominal flow collapsed.");

    // 3. VALIDATION: Otorgamiento de 1m + día de gracia = 31 días
    assert_eq!(receipt.outcome, ActivationOutcome::Activated);
    assert_eq!(
        receipt.expiry_date - receipt.activated_at,
        ChronoDuration::days(31),
        "L2_SLACK_FAULT: 1m grant must span 30 days plus the grace day."
    );

    // El semáforo queda caliente: validar dentro del TTL NO toca al emisor
    let bursts_after_activation = burst_counter.load(Ordering::SeqCst);
    let status = manager.validate().await;
    assert_eq!(status.license_status, LicenseState::Active);
    assert_eq!(
        burst_counter.load(Ordering::SeqCst),
        bursts_after_activation,
        "L2_CACHE_FAULT: Validation within TTL must be issuer-silent."
    );

    // El bus difundió el sobre de cambio de banda
    let envelope = event_receiver.try_recv().expect("L2_EVENT_FAULT: Envelope lost.");
    assert_eq!(envelope.event_type, "license_status");
    assert_eq!(envelope.data["license_status"], "active");

    println!("   ✅ [SUCCESS]: Fresh activation levelized.");
}

#[tokio::test]
async fn certify_same_device_rerun_is_idempotent() {
    let (bind_address, _bursts) = spawn_stub_issuer(Arc::new(|burst_ordinal| {
        if burst_ordinal == 0 {
            (200, nominal_grant_body())
        } else {
            (
                200,
                serde_json::json!({ "success": true, "resultCode": "ALREADY_ACTIVATED_SAME_DEVICE" }),
            )
        }
    }))
    .await;
    let workspace = tempfile::tempdir().unwrap();
    let (manager, _events) = forge_manager(bind_address, &workspace, LicensingPolicy::default());

    let first_receipt = manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .unwrap();
    let second_receipt = manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .unwrap();

    assert_eq!(first_receipt.outcome, ActivationOutcome::Activated);
    assert_eq!(second_receipt.outcome, ActivationOutcome::AlreadyBoundHere);
    assert_eq!(second_receipt.expiry_date, first_receipt.expiry_date);

    // El crédito de reactivación permanece virgen
    let detailed = manager.detailed_status().await.unwrap();
    assert_eq!(detailed.license_info.unwrap().reactivation_count, 0);
}

#[tokio::test]
async fn certify_different_device_denial_preserves_prior_entitlement() {
    let (bind_address, _bursts) = spawn_stub_issuer(Arc::new(|burst_ordinal| {
        if burst_ordinal == 0 {
            (200, nominal_grant_body())
        } else {
            (
                409,
                serde_json::json!({
                    "success": false,
                    "resultCode": "ALREADY_ACTIVATED_DIFFERENT_DEVICE",
                    "similarity": 0.40,
                    "remainingAttempts": 2
                }),
            )
        }
    }))
    .await;
    let workspace = tempfile::tempdir().unwrap();
    let (manager, _events) = forge_manager(bind_address, &workspace, LicensingPolicy::default());

    manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .unwrap();

    // Una segunda clave rebota como vinculada a otra máquina
    let fault = manager
        .activate("ISX1M02LYE1F9QJHR9D", "client-a", None)
        .await
        .unwrap_err();
    match fault {
        LicenseFault::AlreadyActivatedDifferentDevice {
            similarity_score,
            remaining_attempts,
        } => {
            assert_eq!(similarity_score, Some(0.40));
            assert_eq!(remaining_attempts, Some(2));
        }
        other => panic!("L2_DENIAL_FAULT: {other:?}"),
    }

    // El derecho previo permanece intacto byte a byte
    let detailed = manager.detailed_status().await.unwrap();
    let info = detailed.license_info.unwrap();
    assert_eq!(info.activation_id, "act_A");
    assert_eq!(info.reactivation_count, 0);
}

#[tokio::test]
async fn certify_reactivation_consumes_one_credit() {
    let (bind_address, _bursts) = spawn_stub_issuer(Arc::new(|burst_ordinal| {
        if burst_ordinal == 0 {
            (200, nominal_grant_body())
        } else {
            (
                200,
                serde_json::json!({
                    "success": true,
                    "resultCode": "REACTIVATION_SUCCESS",
                    "activationId": "act_B",
                    "duration": "1m",
                    "reactivationCount": 1,
                    "reactivationLimit": 3
                }),
            )
        }
    }))
    .await;
    let workspace = tempfile::tempdir().unwrap();
    let (manager, _events) = forge_manager(bind_address, &workspace, LicensingPolicy::default());

    manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .unwrap();

    let receipt = manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .unwrap();
    assert_eq!(
        receipt.outcome,
        ActivationOutcome::Reactivated { reactivation_count: 1 },
        "L2_CREDIT_FAULT: One credit must be consumed."
    );

    // La instantánea local refleja el nuevo otorgamiento y el conteo
    let detailed = manager.detailed_status().await.unwrap();
    let info = detailed.license_info.unwrap();
    assert_eq!(info.activation_id, "act_B");
    assert_eq!(info.reactivation_count, 1);
    assert_eq!(info.reactivation_limit, 3);
}

#[tokio::test]
async fn certify_local_reactivation_cap_wins_over_issuer() {
    // El emisor concede crédito 3 con tope remoto 5; el tope local (3)
    // es más estricto: tercera reactivación del conteo 3 se veta... el
    // conteo 3 bajo tope 3 procede; conteo 4 rebota.
    let (bind_address, _bursts) = spawn_stub_issuer(Arc::new(|_ordinal| {
        (
            200,
            serde_json::json!({
                "success": true,
                "resultCode": "REACTIVATION_SUCCESS",
                "activationId": "act_Z",
                "duration": "1m",
                "reactivationCount": 4,
                "reactivationLimit": 5
            }),
        )
    }))
    .await;
    let workspace = tempfile::tempdir().unwrap();
    let (manager, _events) = forge_manager(bind_address, &workspace, LicensingPolicy::default());

    let fault = manager
        .activate("ISX-1234-5678-90AB-CDEF", "client-a", None)
        .await
        .unwrap_err();
    assert_eq!(
        fault,
        LicenseFault::ReactivationLimitExceeded {
            reactivation_count: 4,
            reactivation_limit: 3
        },
        "L2_DEFENSE_FAULT: The stricter cap must prevail."
    );
}

#[tokio::test]
async fn certify_client_wide_rate_limit_shield() {
    // Emisor que rechaza todo como clave desconocida
    let (bind_address, burst_counter) = spawn_stub_issuer(Arc::new(|_ordinal| {
        (200, serde_json::json!({ "success": false, "resultCode": "INVALID_KEY" }))
    }))
    .await;
    let workspace = tempfile::tempdir().unwrap();
    let policy = LicensingPolicy {
        rate_limit_window_seconds: 300,
        rate_limit_max_attempts: 10,
        ..LicensingPolicy::default()
    };
    let (manager, _events) = forge_manager(bind_address, &workspace, policy);

    // Ráfaga de 10 claves distintas (válidas en sintaxis) de un cliente
    for key_ordinal in 0..10u32 {
        let distinct_key = format!("ISX1M{key_ordinal:014}");
        let fault = manager
            .activate(&distinct_key, "client-burst", None)
            .await
            .unwrap_err();
        assert_eq!(fault, LicenseFault::InvalidKey, "L2_SHIELD_FAULT: Attempt {key_ordinal}.");
    }

    // El 11° rebota ANTES de tocar al emisor
    let eleventh = manager
        .activate("ISX1M99999999999999", "client-burst", None)
        .await
        .unwrap_err();
    let now = Utc::now();
    match eleventh {
        LicenseFault::RateLimited { reset_at } => {
            assert!(reset_at > now, "L2_RESET_FAULT: reset_at must be in the future.");
        }
        other => panic!("L2_SHIELD_FAULT: Expected RateLimited, got {other:?}"),
    }
    assert!(
        burst_counter.load(Ordering::SeqCst) <= 10,
        "L2_SHIELD_FAULT: Issuer must observe at most 10 bursts."
    );
}
