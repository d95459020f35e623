// INICIO DEL ARCHIVO [libs/domain/models-rs/src/events.rs]
/*!
 * =================================================================
 * APARATO: REAL-TIME EVENT ENVELOPES (V2.0 - NEURAL PARITY)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: SOBRES JSON PARA EL BUS DE EVENTOS EN TIEMPO REAL
 *
 * VISION HIPER-HOLÍSTICA:
 * Sobres pequeños y autodescriptivos `{type, data, timestamp}` con
 * entrega best-effort, at-most-once. Los clientes se recuperan de
 * pérdidas consultando el estado por HTTP al reconectar.
 * =================================================================
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::status::LicenseStatus;

/// Tipo de evento del semáforo de licencia (único tipo requerido).
pub const LICENSE_STATUS_EVENT_TYPE: &str = "license_status";

/// Sobre de difusión hacia los suscriptores WebSocket.
#[typeshare]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    /**
     * Forja el sobre de cambio de estado de licencia.
     *
     * # Errors:
     * La serialización de `LicenseStatus` es infalible por construcción
     * (tipos propios, sin mapas con claves no-string); un fallo aquí
     * sería un error de programación y se degrada a un objeto vacío.
     */
    pub fn license_status(status: &LicenseStatus, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: LICENSE_STATUS_EVENT_TYPE.to_string(),
            data: serde_json::to_value(status).unwrap_or_else(|_| serde_json::json!({})),
            timestamp,
        }
    }
}
// FIN DEL ARCHIVO [libs/domain/models-rs/src/events.rs]
