// INICIO DEL ARCHIVO [libs/domain/models-rs/src/taxonomy.rs]
/*!
 * =================================================================
 * APARATO: LICENSE FAULT TAXONOMY (V2.0 - CLOSED SET MASTER)
 * CLASIFICACIÓN: DOMAIN ERRORS (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACIÓN CERRADA DE FALLOS EXTERNAMENTE VISIBLES
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. STABLE CONTRACT: El conjunto de variantes es cerrado y estable a
 *    través de versiones menores del protocolo del emisor. Los clientes
 *    conmutan comportamiento sobre 'kind_label', jamás sobre 'detail'.
 * 2. PAYLOAD ENRICHMENT: Las variantes de activación transportan los
 *    metadatos de similitud y reintentos que el Dashboard renderiza.
 * 3. CLONE DISCIPLINE: Clonable por diseño para que los seguidores de
 *    una operación single-flight reciban el desenlace del ganador.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Conjunto cerrado de fallos del subsistema de licenciamiento.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LicenseFault {
    #[error("INVALID_FORMAT: Key failed local syntax validation: {detail}")]
    InvalidFormat { detail: String },

    #[error("INVALID_KEY: Issuer rejected the key as unknown")]
    InvalidKey,

    #[error("ALREADY_ACTIVATED_DIFFERENT_DEVICE: Key is bound to another machine")]
    AlreadyActivatedDifferentDevice {
        similarity_score: Option<f64>,
        remaining_attempts: Option<u32>,
    },

    #[error("REACTIVATION_LIMIT_EXCEEDED: Similarity allowed but credit exhausted ({reactivation_count}/{reactivation_limit})")]
    ReactivationLimitExceeded {
        reactivation_count: u32,
        reactivation_limit: u32,
    },

    #[error("LICENSE_EXPIRED: Key is valid but past its expiry at the issuer")]
    Expired,

    #[error("NETWORK_FAULT: Transport, timeout or pinning failure: {detail}")]
    Network { detail: String },

    #[error("RATE_LIMITED: Attempt cap reached; window resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("TAMPERED_STORE: Local entitlement failed integrity or binding checks")]
    TamperedStore,

    #[error("INTERNAL_FAULT: {detail}")]
    Internal { detail: String },
}

impl LicenseFault {
    /**
     * Etiqueta estable del fallo para URIs de problema y telemetría.
     * Los clientes conmutan sobre esta etiqueta, nunca sobre el detalle.
     */
    pub fn kind_label(&self) -> &'static str {
        match self {
            LicenseFault::InvalidFormat { .. } => "invalid_format",
            LicenseFault::InvalidKey => "invalid_key",
            LicenseFault::AlreadyActivatedDifferentDevice { .. } => {
                "already_activated_different_device"
            }
            LicenseFault::ReactivationLimitExceeded { .. } => "reactivation_limit_exceeded",
            LicenseFault::Expired => "expired",
            LicenseFault::Network { .. } => "network",
            LicenseFault::RateLimited { .. } => "rate_limited",
            LicenseFault::TamperedStore => "tampered_store",
            LicenseFault::Internal { .. } => "internal",
        }
    }

    /// Indica si el fallo es terminal en el emisor (sin reintentos).
    pub fn is_issuer_final(&self) -> bool {
        !matches!(self, LicenseFault::Network { .. })
    }
}
// FIN DEL ARCHIVO [libs/domain/models-rs/src/taxonomy.rs]
