// [tests/mirror/libs/domain/models_rs/license_key_normalization.test.rs]
/**
 * =================================================================
 * APARATO: LICENSE KEY NORMALIZATION TEST (V3.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L2-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DE IDENTIDAD CANÓNICA DUAL-FORMA
 * =================================================================
 */

use proptest::prelude::*;
use pulse_domain_models::{DurationCode, KeyFormat, LicenseKey};

#[test]
fn certify_dual_form_identity_convergence() {
    println!("\n🎫 [PROVING_GROUNDS]: Auditing dual-form canonical identity...");

    // 1. SETUP: Las dos formas de entrada de la misma clave física
    let scratch_form = LicenseKey::parse("isx-1m02-lye1-f9qj-hr9d").unwrap();
    let standard_form = LicenseKey::parse("ISX1M02LYE1F9QJHR9D").unwrap();

    // 2. VALIDATION: Identidad única, formas canónicas propias
    assert_eq!(
        scratch_form.identity(),
        standard_form.identity(),
        "L2_IDENTITY_FAULT: Both forms must resolve to one issuer identity."
    );
    assert_eq!(scratch_form.canonical(), "ISX-1M02-LYE1-F9QJ-HR9D");
    assert_eq!(standard_form.canonical(), "ISX1M02LYE1F9QJHR9D");
    assert_eq!(scratch_form.format(), KeyFormat::Scratch);
    assert_eq!(standard_form.format(), KeyFormat::Standard);

    // El marcador embebido viaja en ambas formas
    assert_eq!(scratch_form.duration_hint(), Some(DurationCode::OneMonth));
    assert_eq!(standard_form.duration_hint(), Some(DurationCode::OneMonth));

    println!("   ✅ [SUCCESS]: Canonical identity levelized across forms.");
}

#[test]
fn certify_scratch_card_without_marker() {
    let key = LicenseKey::parse("  isx-1234-5678-90ab-cdef  ").unwrap();
    assert_eq!(key.canonical(), "ISX-1234-5678-90AB-CDEF");
    assert_eq!(key.identity(), "ISX1234567890ABCDEF");
    assert_eq!(key.format(), KeyFormat::Scratch);
    assert_eq!(key.duration_hint(), None, "L2_HINT_FAULT: '12' is not a duration marker.");
}

#[test]
fn certify_standard_separator_stripping() {
    // Un operador pegando con espacios o guiones arbitrarios
    let dirty = LicenseKey::parse("isx 1y 02 LYE1-F9QJ-HR9D77").unwrap();
    let clean = LicenseKey::parse("ISX1Y02LYE1F9QJHR9D77").unwrap();
    assert_eq!(dirty.identity(), clean.identity());
    assert_eq!(dirty.format(), KeyFormat::Standard);
    assert_eq!(dirty.duration_hint(), Some(DurationCode::OneYear));
}

#[test]
fn certify_malformed_material_rejection() {
    let rejected_samples = [
        "",
        "   ",
        "ISX",
        "ISX1M",
        "ISX1MTOOSHORT",
        "ABC-1234-5678-90AB-CDEF",
        "ISX-1234-5678-90AB",
        "ISX-1234-5678-90AB-CDEF-EXTRA",
        "ISX-12!4-5678-90AB-CDEF",
        "ISX9Z02LYE1F9QJHR9D",
    ];

    for sample in rejected_samples {
        assert!(
            LicenseKey::parse(sample).is_err(),
            "L2_SYNTAX_FAULT: '{sample}' must be rejected locally."
        );
    }
}

proptest! {
    /// La normalización es idempotente: re-parsear la forma canónica
    /// reproduce la misma identidad.
    #[test]
    fn certify_normalization_idempotence(
        groups in proptest::collection::vec("[A-Z0-9]{4}", 4),
    ) {
        let raw = format!("ISX-{}-{}-{}-{}", groups[0], groups[1], groups[2], groups[3]);
        let first_pass = LicenseKey::parse(&raw).unwrap();
        let second_pass = LicenseKey::parse(first_pass.canonical()).unwrap();

        prop_assert_eq!(first_pass.identity(), second_pass.identity());
        prop_assert_eq!(first_pass.canonical(), second_pass.canonical());

        // La identidad también resuelve desde la forma limpia
        let from_identity = LicenseKey::parse(first_pass.identity());
        if let Ok(parsed) = from_identity {
            prop_assert_eq!(parsed.identity(), first_pass.identity());
        }
    }

    /// Minúsculas y espacios perimetrales jamás alteran la identidad.
    #[test]
    fn certify_case_and_whitespace_insensitivity(
        groups in proptest::collection::vec("[A-Z0-9]{4}", 4),
        left_pad in 0usize..4,
        right_pad in 0usize..4,
    ) {
        let clean = format!("ISX-{}-{}-{}-{}", groups[0], groups[1], groups[2], groups[3]);
        let dirty = format!(
            "{}{}{}",
            " ".repeat(left_pad),
            clean.to_lowercase(),
            " ".repeat(right_pad)
        );

        let clean_key = LicenseKey::parse(&clean).unwrap();
        let dirty_key = LicenseKey::parse(&dirty).unwrap();
        prop_assert_eq!(clean_key.identity(), dirty_key.identity());
    }
}
