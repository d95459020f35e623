// [tests/mirror/libs/core/fingerprint_engine/collector_determinism.test.rs]
/**
 * =================================================================
 * APARATO: COLLECTOR DETERMINISM TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L1-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE HUELLA ESTABLE DENTRO DEL BOOT
 * =================================================================
 */

use pulse_core_fingerprint::host_fingerprint;

#[test]
fn certify_boot_scoped_idempotence() {
    println!("\n🧬 [PROVING_GROUNDS]: Auditing fingerprint memoization...");

    // 1. EXECUTION: Dos lecturas dentro del mismo boot de proceso
    let first_reading = host_fingerprint().expect("L1_SENSOR_FAULT: Host enumeration collapsed.");
    let second_reading = host_fingerprint().expect("L1_SENSOR_FAULT: Host enumeration collapsed.");

    // 2. VALIDATION: Instantánea bit-perfecta (memoización OnceCell)
    assert_eq!(
        first_reading, second_reading,
        "L1_DETERMINISM_FAULT: Fingerprint must be idempotent within a boot."
    );
    assert_eq!(
        first_reading.first_seen, second_reading.first_seen,
        "L1_MEMO_FAULT: first_seen must not advance between readings."
    );

    println!("   ✅ [SUCCESS]: Boot-scoped snapshot levelized.");
}

#[test]
fn certify_primary_digest_shape() {
    let fingerprint = host_fingerprint().expect("L1_SENSOR_FAULT: Host enumeration collapsed.");

    // Digesto SHA-256 en hex minúscula: 64 caracteres del alfabeto hex
    assert_eq!(fingerprint.primary_hash.len(), 64, "L1_DIGEST_FAULT: Not a SHA-256 hex digest.");
    assert!(
        fingerprint
            .primary_hash
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
        "L1_DIGEST_FAULT: Digest must be lowercase hex."
    );
}

#[test]
fn certify_component_coverage() {
    let fingerprint = host_fingerprint().expect("L1_SENSOR_FAULT: Host enumeration collapsed.");
    let components = &fingerprint.components;

    // La identidad del OS y la cubeta de memoria siempre se materializan
    assert!(!components.os_identity.is_empty(), "L1_COVERAGE_FAULT: os_identity void.");
    assert!(
        components.memory_bucket.ends_with("GB"),
        "L1_COVERAGE_FAULT: memory bucket '{}' malformed.",
        components.memory_bucket
    );
    assert!(!components.timezone.is_empty(), "L1_COVERAGE_FAULT: timezone void.");

    // El resumen jamás expone la huella completa
    let summary = fingerprint.summary();
    assert!(!summary.contains(&fingerprint.primary_hash), "L1_PRIVACY_FAULT: Full digest leaked.");
}
