// INICIO DEL ARCHIVO [libs/domain/licensing/src/policy.rs]
/*!
 * =================================================================
 * APARATO: LICENSING POLICY MATRIX (V2.0 - DEFENSE IN DEPTH)
 * CLASIFICACIÓN: DOMAIN POLICY (ESTRATO L2)
 * RESPONSABILIDAD: CONSTANTES DE GOBERNANZA DEL CICLO DE LICENCIA
 *
 * VISION HIPER-HOLÍSTICA:
 * La política local convive con la del emisor: jamás anula una
 * negación remota, pero impone sus propios topes (el más estricto
 * gana). Todos los valores son configurables desde el entorno y
 * poseen nominales de fábrica.
 * =================================================================
 */

use std::time::Duration;

/// Gobernanza local del subsistema de licenciamiento.
#[derive(Debug, Clone)]
pub struct LicensingPolicy {
    /// Umbral de elegibilidad de reactivación; el valor exacto cuenta.
    pub similarity_threshold: f64,
    /// Tope local de créditos de reactivación (defensa en profundidad).
    pub reactivation_cap: u32,
    /// Vida del caché de estado antes de una revalidación.
    pub cache_ttl: Duration,
    /// Día de gracia sumado a toda expiración calculada.
    pub expiry_slack_days: i64,
    /// Ventana del limitador de intentos.
    pub rate_limit_window_seconds: i64,
    /// Tope de intentos por (clave, cliente) dentro de la ventana.
    pub rate_limit_max_attempts: usize,
    /// Deadline de punta a punta de una activación.
    pub activate_deadline: Duration,
    /// Deadline de una validación (toque al emisor incluido).
    pub validate_deadline: Duration,
    /// Deadline del aviso de desactivación al emisor.
    pub deactivate_deadline: Duration,
}

impl Default for LicensingPolicy {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            reactivation_cap: 3,
            cache_ttl: Duration::from_secs(300),
            expiry_slack_days: 1,
            rate_limit_window_seconds: 300,
            rate_limit_max_attempts: 10,
            activate_deadline: Duration::from_secs(20),
            validate_deadline: Duration::from_secs(10),
            deactivate_deadline: Duration::from_secs(10),
        }
    }
}
// FIN DEL ARCHIVO [libs/domain/licensing/src/policy.rs]
