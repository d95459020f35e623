// [tests/mirror/libs/core/flow_control/rate_window.test.rs]
/**
 * =================================================================
 * APARATO: RATE WINDOW TEST (V2.0)
 * CLASIFICACIÓN: TRINITY EVIDENCE // ESTRATO L1-MIRROR
 * RESPONSABILIDAD: CERTIFICACIÓN DEL TOPE 1..CAP Y LA REAPERTURA
 * =================================================================
 */

use chrono::{Duration, TimeZone, Utc};
use pulse_core_flow::{AttemptScope, SlidingWindowRateLimiter};

fn scope() -> AttemptScope {
    AttemptScope {
        key_identity: "ISX1M02LYE1F9QJHR9D".to_string(),
        client_identity: "client-alpha".to_string(),
    }
}

#[test]
fn certify_cap_accepts_ten_and_rejects_eleventh() {
    println!("\n🚦 [PROVING_GROUNDS]: Auditing sliding window cap...");

    // 1. SETUP: Ventana de 5 minutos, tope nominal de 10
    let limiter = SlidingWindowRateLimiter::new(300, 10);
    let ignition = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    // 2. EXECUTION: Intentos 1..10 dentro de 60s
    for attempt_ordinal in 0..10 {
        let stamp = ignition + Duration::seconds(attempt_ordinal * 6);
        assert!(
            limiter.charge_at(scope(), stamp).is_ok(),
            "L1_WINDOW_FAULT: Attempt {} must be accepted.",
            attempt_ordinal + 1
        );
    }

    // 3. VALIDATION: El 11° rebota con coordenada de reapertura
    let eleventh_stamp = ignition + Duration::seconds(60);
    let rejection = limiter
        .charge_at(scope(), eleventh_stamp)
        .expect_err("L1_WINDOW_FAULT: Attempt 11 must be rejected.");

    assert!(
        rejection.reset_at > eleventh_stamp,
        "L1_RESET_FAULT: reset_at must land in the future."
    );
    assert_eq!(
        rejection.reset_at,
        ignition + Duration::seconds(300),
        "L1_RESET_FAULT: Window reopens when the oldest attempt ages out."
    );

    println!("   ✅ [SUCCESS]: Abuse shield levelized.");
}

#[test]
fn certify_window_reopens_after_reset() {
    let limiter = SlidingWindowRateLimiter::new(300, 10);
    let ignition = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    for attempt_ordinal in 0..10 {
        limiter
            .charge_at(scope(), ignition + Duration::seconds(attempt_ordinal))
            .unwrap();
    }

    let rejection = limiter
        .charge_at(scope(), ignition + Duration::seconds(30))
        .expect_err("saturated");

    // En la coordenada exacta de reapertura el intento más viejo caduca
    assert!(
        limiter.charge_at(scope(), rejection.reset_at).is_ok(),
        "L1_REOPEN_FAULT: Attempt at reset_at must be accepted."
    );
}

#[test]
fn certify_expired_attempts_leave_the_window() {
    let limiter = SlidingWindowRateLimiter::new(60, 2);
    let ignition = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    limiter.charge_at(scope(), ignition).unwrap();
    limiter.charge_at(scope(), ignition + Duration::seconds(10)).unwrap();
    assert!(limiter.charge_at(scope(), ignition + Duration::seconds(20)).is_err());

    // 61s después del primero: un cupo libre
    assert!(limiter.charge_at(scope(), ignition + Duration::seconds(61)).is_ok());
}
