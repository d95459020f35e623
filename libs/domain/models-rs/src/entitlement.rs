// INICIO DEL ARCHIVO [libs/domain/models-rs/src/entitlement.rs]
/*!
 * =================================================================
 * APARATO: ENTITLEMENT DOMAIN ENTITY (V3.0 - NODE-LOCK LEDGER)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: REGISTRO LOCAL INMUTABLE DEL DERECHO DE USO
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. SINGLE WRITER: Solo el LicenseManager muta esta entidad; la bóveda
 *    posee su representación en disco; el resto del sistema recibe
 *    vistas de solo lectura.
 * 2. MONOTONIC CREDITS: 'reactivation_count' nunca decrece; una
 *    reactivación fallida no consume ni devuelve crédito.
 * 3. EXPIRY DISCIPLINE: La expiración NO destruye el registro; solo
 *    transiciona el estado derivado.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::device::DeviceComponents;
use crate::license_key::DurationCode;
use crate::status::LicenseState;
use crate::taxonomy::LicenseFault;

/// Derecho de uso persistido: la prueba local de que este host puede
/// operar el sistema hasta `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entitlement {
    /// Clave en forma canónica (guiones preservados en Scratch Cards).
    pub license_key: String,
    /// Identidad limpia sin separadores (moneda de comparación).
    pub key_identity: String,
    /// Identificador opaco emitido por la autoridad de activación.
    pub activation_id: String,
    /// Huella primaria de la máquina vinculada.
    pub device_primary_hash: String,
    /// Instantánea de componentes al momento del último vínculo.
    pub device_components_snapshot: DeviceComponents,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub duration_code: DurationCode,
    pub features: Vec<String>,
    pub reactivation_count: u32,
    pub last_validated_at: DateTime<Utc>,
    pub last_known_status: LicenseState,
}

impl Entitlement {
    /**
     * Sella los invariantes estructurales del registro.
     *
     * # Errors:
     * `LicenseFault::Internal` si `issued_at > expires_at` (un registro
     * así jamás debe cristalizarse en la bóveda).
     */
    pub fn assert_invariants(&self) -> Result<(), LicenseFault> {
        if self.issued_at > self.expires_at {
            return Err(LicenseFault::Internal {
                detail: format!(
                    "ENTITLEMENT_INVARIANT_BREACH: issued_at {} exceeds expires_at {}",
                    self.issued_at, self.expires_at
                ),
            });
        }
        Ok(())
    }

    /// Indica si la huella primaria actual coincide bit a bit.
    pub fn is_primary_match(&self, current_primary_hash: &str) -> bool {
        self.device_primary_hash == current_primary_hash
    }
}
// FIN DEL ARCHIVO [libs/domain/models-rs/src/entitlement.rs]
