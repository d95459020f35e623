// INICIO DEL ARCHIVO [libs/domain/models-rs/src/status.rs]
/*!
 * =================================================================
 * APARATO: LICENSE STATUS DTO MATRIX (V3.2 - ZENITH COMPLIANT)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: ESTADO DERIVADO Y CONTRATOS HACIA EL DASHBOARD
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. PURE DERIVATION: El estado es función pura de (entitlement, t);
 *    estas estructuras no transportan estado oculto.
 * 2. TYPESHARE ALIGNMENT: Sincronización absoluta con los esquemas
 *    del Dashboard para la visualización del semáforo de licencia.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Bandas del semáforo de licencia observables por los clientes.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LicenseState {
    NotActivated,
    Active,
    /// 30 días o menos de vida remanente.
    Warning,
    /// 7 días o menos de vida remanente.
    Critical,
    Expired,
    Invalid,
    Error,
}

impl LicenseState {
    pub fn as_label(&self) -> &'static str {
        match self {
            LicenseState::NotActivated => "not_activated",
            LicenseState::Active => "active",
            LicenseState::Warning => "warning",
            LicenseState::Critical => "critical",
            LicenseState::Expired => "expired",
            LicenseState::Invalid => "invalid",
            LicenseState::Error => "error",
        }
    }

    /// Bandas que autorizan operaciones privilegiadas.
    pub fn permits_privileged_operations(&self) -> bool {
        matches!(
            self,
            LicenseState::Active | LicenseState::Warning | LicenseState::Critical
        )
    }
}

/// Metadatos extendidos del derecho de uso (endpoint `/detailed`).
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LicenseInfo {
    pub activation_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Resumen de la máquina vinculada; jamás la huella completa.
    pub device_summary: String,
    pub features: Vec<String>,
    pub reactivation_count: u32,
    pub reactivation_limit: u32,
    pub last_validated_at: DateTime<Utc>,
}

/// Vista derivada, no persistente, del estado de licencia.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LicenseStatus {
    pub license_status: LicenseState,
    /// Días remanentes, saturados en 0 (jamás negativos).
    pub days_left: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub message: String,
    /// Señala que la última revalidación no alcanzó al emisor y el
    /// estado mostrado es el último conocido (sin degradación).
    pub network_degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_info: Option<LicenseInfo>,
}

impl LicenseStatus {
    /**
     * Estado nominal de un host sin derecho de uso registrado.
     */
    pub fn not_activated() -> Self {
        Self {
            license_status: LicenseState::NotActivated,
            days_left: 0,
            expiry_date: None,
            message: "No license activated on this machine".to_string(),
            network_degraded: false,
            license_info: None,
        }
    }
}

/// Veredicto de renovación para el endpoint `/renewal`.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenewalAssessment {
    pub needs_renewal: bool,
    pub is_expired: bool,
    pub days_until_expiry: i64,
    /// `none | low | medium | high | critical`.
    pub renewal_urgency: String,
}
// FIN DEL ARCHIVO [libs/domain/models-rs/src/status.rs]
