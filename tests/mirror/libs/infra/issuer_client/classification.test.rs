// [tests/mirror/libs/infra/issuer_client/classification.test.rs]
/**
 * =================================================================
 * APARATO: WIRE CLASSIFICATION TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L3-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DEL MAPEO CERRADO WIRE -> TAXONOMÍA
 * =================================================================
 */

use chrono::{TimeZone, Utc};
use pulse_domain_models::{DurationCode, LicenseFault};
use pulse_infra_issuer::protocol::{classify_deactivation, classify_uniqueness};
use pulse_infra_issuer::{classify_activation, IssuerVerdict, IssuerWireResponse};

fn received_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn wire(raw: &str) -> IssuerWireResponse {
    serde_json::from_str(raw).expect("L3_FIXTURE_FAULT: fixture must deserialize")
}

#[test]
fn certify_success_verdict_matrix() {
    println!("\n📡 [PROVING_GROUNDS]: Auditing success classification matrix...");

    // Activación nominal con eco de issuedAt dentro de la tolerancia
    let nominal = wire(
        r#"{"success":true,"activationId":"act_A","duration":"1m","issuedAt":"2025-01-01T00:02:00Z","features":["reports"]}"#,
    );
    match classify_activation(&nominal, received_at()).unwrap() {
        IssuerVerdict::Activated(grant) => {
            assert_eq!(grant.activation_id, "act_A");
            assert_eq!(grant.duration, Some(DurationCode::OneMonth));
            assert_eq!(grant.features, vec!["reports".to_string()]);
            assert_eq!(
                grant.issued_at,
                Utc.with_ymd_and_hms(2025, 1, 1, 0, 2, 0).unwrap(),
                "L3_SKEW_FAULT: In-tolerance stamp must be honored."
            );
        }
        other => panic!("L3_VERDICT_FAULT: {other:?}"),
    }

    // Re-ejecución idempotente
    let same_device = wire(r#"{"success":true,"resultCode":"ALREADY_ACTIVATED_SAME_DEVICE"}"#);
    assert_eq!(
        classify_activation(&same_device, received_at()).unwrap(),
        IssuerVerdict::AlreadyActivatedSameDevice
    );

    // Reactivación con crédito consumido
    let reactivated = wire(
        r#"{"success":true,"resultCode":"REACTIVATION_SUCCESS","activationId":"act_R","duration":"1m","reactivationCount":1,"reactivationLimit":3}"#,
    );
    match classify_activation(&reactivated, received_at()).unwrap() {
        IssuerVerdict::Reactivated {
            grant,
            reactivation_count,
            reactivation_limit,
        } => {
            assert_eq!(grant.activation_id, "act_R");
            assert_eq!(reactivation_count, 1);
            assert_eq!(reactivation_limit, Some(3));
        }
        other => panic!("L3_VERDICT_FAULT: {other:?}"),
    }

    println!("   ✅ [SUCCESS]: Success matrix levelized.");
}

#[test]
fn certify_denial_taxonomy_matrix() {
    let samples: Vec<(&str, LicenseFault)> = vec![
        (
            r#"{"success":false,"resultCode":"INVALID_KEY"}"#,
            LicenseFault::InvalidKey,
        ),
        (
            r#"{"success":false,"resultCode":"EXPIRED"}"#,
            LicenseFault::Expired,
        ),
        (
            r#"{"success":false,"resultCode":"ALREADY_ACTIVATED_DIFFERENT_DEVICE","similarity":0.4,"remainingAttempts":2}"#,
            LicenseFault::AlreadyActivatedDifferentDevice {
                similarity_score: Some(0.4),
                remaining_attempts: Some(2),
            },
        ),
        (
            r#"{"success":false,"resultCode":"REACTIVATION_LIMIT_EXCEEDED","reactivationCount":3,"reactivationLimit":3}"#,
            LicenseFault::ReactivationLimitExceeded {
                reactivation_count: 3,
                reactivation_limit: 3,
            },
        ),
    ];

    for (fixture, expected_fault) in samples {
        let observed = classify_activation(&wire(fixture), received_at()).unwrap_err();
        assert_eq!(observed, expected_fault, "L3_DENIAL_FAULT: {fixture}");
    }
}

#[test]
fn certify_fail_closed_on_protocol_drift() {
    let drifted_samples = [
        r#"{}"#,
        r#"{"success":true}"#,
        r#"{"success":true,"resultCode":"QUANTUM_GRANT"}"#,
        r#"{"success":true,"activationId":"","duration":"1m"}"#,
        r#"{"success":true,"activationId":"act_X","duration":"42m"}"#,
        r#"{"success":false}"#,
        r#"{"success":false,"resultCode":"UNDOCUMENTED_DENIAL"}"#,
        r#"{"success":true,"resultCode":"REACTIVATION_SUCCESS","activationId":"act_R","duration":"1m"}"#,
    ];

    for fixture in drifted_samples {
        let observed = classify_activation(&wire(fixture), received_at()).unwrap_err();
        assert!(
            matches!(observed, LicenseFault::Network { .. }),
            "L3_FAIL_CLOSED_FAULT: '{fixture}' must classify as network-class drift, got {observed:?}."
        );
    }
}

#[test]
fn certify_deactivation_and_uniqueness_mapping() {
    assert!(classify_deactivation(&wire(r#"{"success":true}"#)).is_ok());
    assert_eq!(
        classify_deactivation(&wire(r#"{"success":false,"resultCode":"NOT_FOUND"}"#)).unwrap_err(),
        LicenseFault::InvalidKey
    );
    assert!(matches!(
        classify_deactivation(&wire(r#"{"success":false,"resultCode":"BOUND_ELSEWHERE"}"#))
            .unwrap_err(),
        LicenseFault::AlreadyActivatedDifferentDevice { .. }
    ));

    let duplicates = classify_uniqueness(&wire(
        r#"{"success":true,"duplicates":["ISX1M02LYE1F9QJHR9D"]}"#,
    ))
    .unwrap();
    assert_eq!(duplicates, vec!["ISX1M02LYE1F9QJHR9D".to_string()]);

    assert!(classify_uniqueness(&wire(r#"{"success":true}"#)).unwrap().is_empty());
    assert!(classify_uniqueness(&wire(r#"{"success":false}"#)).is_err());
}
