// [libs/domain/models-rs/src/tests_contracts.rs]
/**
 * =================================================================
 * APARATO: MODELS INTEGRITY TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE PARIDAD JSON CON EL DASHBOARD
 * =================================================================
 */

use chrono::{TimeZone, Utc};
use pulse_domain_models::{
    DeviceComponents, DurationCode, Entitlement, EventEnvelope, LicenseState, LicenseStatus,
};

#[test]
fn certify_license_state_wire_labels() {
    println!("\n🎫 [PROVING_GROUNDS]: Auditing LicenseState wire labels...");

    let serialized = serde_json::to_string(&LicenseState::NotActivated).unwrap();
    assert_eq!(serialized, "\"not_activated\"", "L2_LABEL_FAULT: snake_case contract broken.");

    for (state, label) in [
        (LicenseState::Active, "active"),
        (LicenseState::Warning, "warning"),
        (LicenseState::Critical, "critical"),
        (LicenseState::Expired, "expired"),
        (LicenseState::Invalid, "invalid"),
        (LicenseState::Error, "error"),
    ] {
        assert_eq!(serde_json::to_string(&state).unwrap(), format!("\"{label}\""));
        assert_eq!(state.as_label(), label);
    }

    println!("   ✅ [SUCCESS]: Semaphore labels levelized with the Dashboard.");
}

#[test]
fn certify_duration_wire_forms_round_trip() {
    for code in [
        DurationCode::OneMonth,
        DurationCode::ThreeMonths,
        DurationCode::SixMonths,
        DurationCode::OneYear,
        DurationCode::Scratch,
    ] {
        let wire = code.as_wire();
        assert_eq!(DurationCode::from_wire(wire), Some(code), "L2_WIRE_FAULT: {wire}");
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, format!("\"{wire}\""), "L2_SERDE_FAULT: {wire}");
    }
}

#[test]
fn certify_entitlement_serde_round_trip() {
    let entitlement = Entitlement {
        license_key: "ISX-1234-5678-90AB-CDEF".to_string(),
        key_identity: "ISX1234567890ABCDEF".to_string(),
        activation_id: "act_A".to_string(),
        device_primary_hash: "ab".repeat(32),
        device_components_snapshot: DeviceComponents {
            os_identity: "linux-6.8".to_string(),
            cpu_model: "Ryzen 7".to_string(),
            ..DeviceComponents::default()
        },
        issued_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        expires_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        duration_code: DurationCode::OneMonth,
        features: vec!["reports".to_string(), "exports".to_string()],
        reactivation_count: 1,
        last_validated_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
        last_known_status: LicenseState::Active,
    };

    entitlement.assert_invariants().expect("L2_INVARIANT_FAULT: nominal record rejected");

    let json = serde_json::to_string(&entitlement).unwrap();
    let recovered: Entitlement = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, entitlement, "L2_ROUNDTRIP_FAULT: persisted form diverged.");
}

#[test]
fn certify_inverted_timeline_is_rejected() {
    let mut entitlement = Entitlement {
        license_key: "ISX1M02LYE1F9QJHR9D".to_string(),
        key_identity: "ISX1M02LYE1F9QJHR9D".to_string(),
        activation_id: "act_B".to_string(),
        device_primary_hash: "cd".repeat(32),
        device_components_snapshot: DeviceComponents::default(),
        issued_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        expires_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
        duration_code: DurationCode::OneMonth,
        features: Vec::new(),
        reactivation_count: 0,
        last_validated_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        last_known_status: LicenseState::Active,
    };

    assert!(entitlement.assert_invariants().is_err());

    entitlement.expires_at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    assert!(entitlement.assert_invariants().is_ok());
}

#[test]
fn certify_event_envelope_shape() {
    let status = LicenseStatus::not_activated();
    let stamp = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    let envelope = EventEnvelope::license_status(&status, stamp);

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["type"], "license_status", "L2_ENVELOPE_FAULT: type field mismatch.");
    assert_eq!(json["data"]["license_status"], "not_activated");
    assert!(json["timestamp"].is_string());
}
