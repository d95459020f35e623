// INICIO DEL ARCHIVO [libs/domain/models-rs/src/device.rs]
/*!
 * =================================================================
 * APARATO: DEVICE IDENTITY DOMAIN MODELS (V2.2 - SILICON DTO)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: CONTRATOS DE HUELLA DE MÁQUINA Y COMPONENTES
 *
 * VISION HIPER-HOLÍSTICA:
 * La huella primaria ('primary_hash') es el único valor vinculado a un
 * derecho de uso. Los componentes etiquetados existen para el cálculo
 * de similitud en reactivaciones sobre hardware parcialmente mutado.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// Tupla ordenada de campos etiquetados de la máquina anfitriona.
///
/// Un campo vacío significa "no recolectable en este host"; dos campos
/// vacíos iguales se consideran coincidentes en el cálculo de similitud.
#[typeshare]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceComponents {
    pub os_identity: String,
    pub cpu_model: String,
    pub primary_mac: String,
    pub disk_serial: String,
    pub memory_bucket: String,
    pub timezone: String,
    pub language: String,
}

/// Huella completa de la máquina anfitriona.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceFingerprint {
    /// Digesto estable de 256 bits (hex) sobre identificadores únicos.
    pub primary_hash: String,
    /// Campos etiquetados para el veredicto de similitud.
    pub components: DeviceComponents,
    /// Primera computación de huella en este host (dentro del boot).
    pub first_seen: DateTime<Utc>,
    /// Señala recolección degradada (menos entropía de la nominal).
    pub reduced_entropy: bool,
}

impl DeviceFingerprint {
    /**
     * Resumen apto para el Dashboard: jamás expone la huella completa.
     */
    pub fn summary(&self) -> String {
        let hash_prefix: String = self.primary_hash.chars().take(12).collect();
        format!(
            "{} · {} · {}…",
            self.components.os_identity, self.components.cpu_model, hash_prefix
        )
    }
}
// FIN DEL ARCHIVO [libs/domain/models-rs/src/device.rs]
