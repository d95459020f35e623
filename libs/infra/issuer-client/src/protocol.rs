// INICIO DEL ARCHIVO [libs/infra/issuer-client/src/protocol.rs]
/*!
 * =================================================================
 * APARATO: ISSUER WIRE PROTOCOL (V3.1 - FAIL CLOSED PARSER)
 * CLASIFICACIÓN: INFRASTRUCTURE PROTOCOL (ESTRATO L3)
 * RESPONSABILIDAD: GRAMÁTICA DE ALAMBRE Y CLASIFICACIÓN PURA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. CASE SENSITIVE CONTRACT: Los campos viajan en camelCase exacto;
 *    la autoridad emisora no perdona desviaciones.
 * 2. FAIL CLOSED: Formas desconocidas en campos requeridos se
 *    clasifican como fallo de clase red (desalineación de protocolo);
 *    los campos opcionales desconocidos se toleran.
 * 3. PURE MAPPING: La clasificación es función pura de (respuesta,
 *    instante de recepción); estable a través de versiones menores
 *    del protocolo del emisor.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use pulse_domain_models::{DeviceComponents, DurationCode, LicenseFault};

// --- ACCIONES DEL PROTOCOLO (CASE-SENSITIVE) ---
pub const ACTION_ACTIVATE: &str = "activateScratchCard";
pub const ACTION_CHECK_UNIQUENESS: &str = "checkUniqueness";
pub const ACTION_DEACTIVATE: &str = "deactivateLicense";

// --- CÓDIGOS DE RESULTADO DOCUMENTADOS DEL EMISOR ---
pub const CODE_ACTIVATED: &str = "ACTIVATED";
pub const CODE_ALREADY_SAME_DEVICE: &str = "ALREADY_ACTIVATED_SAME_DEVICE";
pub const CODE_ALREADY_DIFFERENT_DEVICE: &str = "ALREADY_ACTIVATED_DIFFERENT_DEVICE";
pub const CODE_REACTIVATION_SUCCESS: &str = "REACTIVATION_SUCCESS";
pub const CODE_REACTIVATION_LIMIT: &str = "REACTIVATION_LIMIT_EXCEEDED";
pub const CODE_INVALID_KEY: &str = "INVALID_KEY";
pub const CODE_EXPIRED: &str = "EXPIRED";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_BOUND_ELSEWHERE: &str = "BOUND_ELSEWHERE";

/// Tolerancia de deriva de reloj sobre marcas del emisor (±5 minutos).
const CLOCK_SKEW_TOLERANCE_MINUTES: i64 = 5;

/// Petición de activación hacia la autoridad emisora.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationWireRequest<'a> {
    pub action: &'static str,
    pub license_key: &'a str,
    pub device_fingerprint: &'a str,
    pub components_snapshot: &'a DeviceComponents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_transfer: Option<bool>,
}

/// Petición de auditoría de unicidad de códigos.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniquenessWireRequest<'a> {
    pub action: &'static str,
    pub codes: &'a [String],
}

/// Petición de desactivación del vínculo actual.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivationWireRequest<'a> {
    pub action: &'static str,
    pub license_key: &'a str,
    pub device_fingerprint: &'a str,
}

/// Respuesta cruda del emisor. Todos los campos son opcionales en el
/// alambre; la clasificación decide cuáles son requeridos por veredicto.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssuerWireResponse {
    pub success: Option<bool>,
    pub result_code: Option<String>,
    pub activation_id: Option<String>,
    pub message: Option<String>,
    pub duration: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub features: Option<Vec<String>>,
    pub similarity: Option<f64>,
    pub reactivation_count: Option<u32>,
    pub reactivation_limit: Option<u32>,
    pub remaining_attempts: Option<u32>,
    pub duplicates: Option<Vec<String>>,
}

/// Otorgamiento sellado por el emisor tras una activación nominal.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerGrant {
    pub activation_id: String,
    pub issued_at: DateTime<Utc>,
    /// `None` cuando el emisor no ecoa duración; el dominio resuelve
    /// entonces con la pista embebida en la clave.
    pub duration: Option<DurationCode>,
    pub features: Vec<String>,
}

/// Veredicto tipado de una negociación de activación.
#[derive(Debug, Clone, PartialEq)]
pub enum IssuerVerdict {
    Activated(IssuerGrant),
    /// Re-ejecución idempotente en la misma máquina: NO es un error.
    AlreadyActivatedSameDevice,
    Reactivated {
        grant: IssuerGrant,
        reactivation_count: u32,
        reactivation_limit: Option<u32>,
    },
}

/**
 * Clasifica la respuesta de activación hacia la taxonomía cerrada.
 *
 * # Errors:
 * - Fallos documentados del emisor (clave inválida, vínculo ajeno,
 *   crédito agotado, expiración) con sus metadatos.
 * - `Network` ante cualquier forma no documentada (fail closed).
 */
pub fn classify_activation(
    wire: &IssuerWireResponse,
    received_at: DateTime<Utc>,
) -> Result<IssuerVerdict, LicenseFault> {
    let Some(success) = wire.success else {
        return Err(protocol_mismatch("missing 'success' discriminant"));
    };

    if success {
        let code = wire.result_code.as_deref().unwrap_or(CODE_ACTIVATED);
        return match code {
            CODE_ALREADY_SAME_DEVICE => Ok(IssuerVerdict::AlreadyActivatedSameDevice),
            CODE_REACTIVATION_SUCCESS => {
                let grant = extract_grant(wire, received_at)?;
                let Some(reactivation_count) = wire.reactivation_count else {
                    return Err(protocol_mismatch("reactivation without count echo"));
                };
                Ok(IssuerVerdict::Reactivated {
                    grant,
                    reactivation_count,
                    reactivation_limit: wire.reactivation_limit,
                })
            }
            CODE_ACTIVATED => Ok(IssuerVerdict::Activated(extract_grant(wire, received_at)?)),
            unknown => Err(protocol_mismatch(&format!("unknown success code '{unknown}'"))),
        };
    }

    let Some(code) = wire.result_code.as_deref() else {
        return Err(protocol_mismatch("denial without result code"));
    };

    match code {
        CODE_INVALID_KEY => Err(LicenseFault::InvalidKey),
        CODE_EXPIRED => Err(LicenseFault::Expired),
        CODE_ALREADY_DIFFERENT_DEVICE => Err(LicenseFault::AlreadyActivatedDifferentDevice {
            similarity_score: wire.similarity,
            remaining_attempts: wire.remaining_attempts,
        }),
        CODE_REACTIVATION_LIMIT => Err(LicenseFault::ReactivationLimitExceeded {
            reactivation_count: wire.reactivation_count.unwrap_or(0),
            reactivation_limit: wire.reactivation_limit.unwrap_or(0),
        }),
        unknown => Err(protocol_mismatch(&format!("unknown denial code '{unknown}'"))),
    }
}

/**
 * Clasifica la respuesta de desactivación.
 */
pub fn classify_deactivation(wire: &IssuerWireResponse) -> Result<(), LicenseFault> {
    match (wire.success, wire.result_code.as_deref()) {
        (Some(true), _) => Ok(()),
        (Some(false), Some(CODE_NOT_FOUND)) => Err(LicenseFault::InvalidKey),
        (Some(false), Some(CODE_BOUND_ELSEWHERE)) => {
            Err(LicenseFault::AlreadyActivatedDifferentDevice {
                similarity_score: None,
                remaining_attempts: None,
            })
        }
        _ => Err(protocol_mismatch("undocumented deactivation shape")),
    }
}

/**
 * Clasifica la auditoría de unicidad: entrega los códigos duplicados.
 */
pub fn classify_uniqueness(wire: &IssuerWireResponse) -> Result<Vec<String>, LicenseFault> {
    match wire.success {
        Some(true) => Ok(wire.duplicates.clone().unwrap_or_default()),
        _ => Err(protocol_mismatch("undocumented uniqueness shape")),
    }
}

/// Extrae el otorgamiento; el identificador de activación es requerido.
fn extract_grant(
    wire: &IssuerWireResponse,
    received_at: DateTime<Utc>,
) -> Result<IssuerGrant, LicenseFault> {
    let Some(activation_id) = wire.activation_id.clone().filter(|id| !id.is_empty()) else {
        return Err(protocol_mismatch("grant without activationId echo"));
    };

    let duration = match wire.duration.as_deref() {
        Some(raw_duration) => match DurationCode::from_wire(raw_duration) {
            Some(code) => Some(code),
            None => return Err(protocol_mismatch(&format!("unknown duration '{raw_duration}'"))),
        },
        None => None,
    };

    Ok(IssuerGrant {
        activation_id,
        issued_at: reconcile_issued_at(wire.issued_at, received_at),
        duration,
        features: wire.features.clone().unwrap_or_default(),
    })
}

/**
 * Reconciliación de reloj: marcas del emisor dentro de ±5 minutos se
 * aceptan tal cual; derivas mayores se anclan al instante local.
 */
fn reconcile_issued_at(
    issuer_stamp: Option<DateTime<Utc>>,
    received_at: DateTime<Utc>,
) -> DateTime<Utc> {
    let Some(stamp) = issuer_stamp else {
        return received_at;
    };

    let drift = (stamp - received_at).num_minutes().abs();
    if drift > CLOCK_SKEW_TOLERANCE_MINUTES {
        warn!("🕰️ [CLOCK_DRIFT]: Issuer stamp deviates {drift} minutes; anchoring to local time.");
        return received_at;
    }
    stamp
}

fn protocol_mismatch(detail: &str) -> LicenseFault {
    LicenseFault::Network {
        detail: format!("PROTOCOL_MISMATCH: {detail}"),
    }
}

// FIN DEL ARCHIVO [libs/infra/issuer-client/src/protocol.rs]
