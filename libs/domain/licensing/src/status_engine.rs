// INICIO DEL ARCHIVO [libs/domain/licensing/src/status_engine.rs]
/*!
 * =================================================================
 * APARATO: STATUS DERIVATION ENGINE (V3.0 - PURE BANDING)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: DERIVACIÓN PURA DEL SEMÁFORO DE LICENCIA
 *
 * VISION HIPER-HOLÍSTICA:
 * El estado es función pura de (entitlement, t): sin estado oculto,
 * sin reloj implícito. Las bandas del semáforo:
 *   now ≥ expires_at            -> Expired
 *   0 < days_left ≤ 7           -> Critical
 *   7 < days_left ≤ 30          -> Warning
 *   en otro caso                -> Active
 *
 * # Mathematical Proof (Clamped Days):
 * days_left = max(0, floor((expires_at - now) / día)); jamás se
 * reporta un valor negativo a los clientes.
 * =================================================================
 */

use chrono::{DateTime, Duration, Utc};

use pulse_domain_models::{
    DurationCode, Entitlement, LicenseInfo, LicenseState, LicenseStatus, RenewalAssessment,
};

/// Frontera superior (en días) de la banda Critical.
const CRITICAL_BAND_CEILING: i64 = 7;

/// Frontera superior (en días) de la banda Warning.
const WARNING_BAND_CEILING: i64 = 30;

/**
 * Computa la expiración sellada: emisión + duración + día de gracia.
 */
pub fn compute_expiry(
    issued_at: DateTime<Utc>,
    duration: DurationCode,
    slack_days: i64,
) -> DateTime<Utc> {
    issued_at + Duration::days(duration.base_days() + slack_days)
}

/**
 * Deriva la banda del semáforo y los días remanentes saturados en 0.
 */
pub fn derive_state(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> (LicenseState, i64) {
    if now >= expires_at {
        return (LicenseState::Expired, 0);
    }

    let days_left = (expires_at - now).num_days().max(0);
    let state = match days_left {
        d if (1..=CRITICAL_BAND_CEILING).contains(&d) => LicenseState::Critical,
        d if (CRITICAL_BAND_CEILING + 1..=WARNING_BAND_CEILING).contains(&d) => {
            LicenseState::Warning
        }
        _ => LicenseState::Active,
    };

    (state, days_left)
}

/**
 * Deriva la vista completa de estado desde el derecho persistido.
 */
pub fn derive_status(
    entitlement: &Entitlement,
    now: DateTime<Utc>,
    network_degraded: bool,
    reactivation_limit: u32,
) -> LicenseStatus {
    let (state, days_left) = derive_state(entitlement.expires_at, now);

    let message = match state {
        LicenseState::Expired => "License expired; renew to continue privileged operations".to_string(),
        LicenseState::Critical => format!("License expires in {days_left} day(s); renewal urgent"),
        LicenseState::Warning => format!("License expires in {days_left} day(s)"),
        _ => "License active".to_string(),
    };

    LicenseStatus {
        license_status: state,
        days_left,
        expiry_date: Some(entitlement.expires_at),
        message,
        network_degraded,
        license_info: Some(LicenseInfo {
            activation_id: entitlement.activation_id.clone(),
            issued_at: entitlement.issued_at,
            expires_at: entitlement.expires_at,
            device_summary: format!(
                "{} · {}",
                entitlement.device_components_snapshot.os_identity,
                entitlement.device_components_snapshot.cpu_model
            ),
            features: entitlement.features.clone(),
            reactivation_count: entitlement.reactivation_count,
            reactivation_limit,
            last_validated_at: entitlement.last_validated_at,
        }),
    }
}

/**
 * Veredicto de renovación para el Dashboard.
 */
pub fn assess_renewal(status: &LicenseStatus) -> RenewalAssessment {
    let is_expired = status.license_status == LicenseState::Expired;
    let entitled = status.license_info.is_some();
    let days = status.days_left;

    let renewal_urgency = if !entitled {
        "none"
    } else if is_expired || days == 0 {
        "critical"
    } else if days <= CRITICAL_BAND_CEILING {
        "high"
    } else if days <= 14 {
        "medium"
    } else if days <= WARNING_BAND_CEILING {
        "low"
    } else {
        "none"
    };

    RenewalAssessment {
        needs_renewal: entitled && (is_expired || days <= WARNING_BAND_CEILING),
        is_expired,
        days_until_expiry: days,
        renewal_urgency: renewal_urgency.to_string(),
    }
}

// FIN DEL ARCHIVO [libs/domain/licensing/src/status_engine.rs]
