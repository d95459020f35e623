// INICIO DEL ARCHIVO [libs/core/fingerprint-engine/src/lib.rs]
/*!
 * =================================================================
 * APARATO: FINGERPRINT ENGINE BARREL (V2.1 - SILICON IDENTITY)
 * CLASIFICACIÓN: CORE LIB (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DE RECOLECTOR Y SIMILITUD
 * =================================================================
 */

pub mod collector;
pub mod similarity;

pub use collector::{host_fingerprint, FingerprintFault, HostCollector};
pub use similarity::{similarity_score, SIMILARITY_WEIGHTS};
// FIN DEL ARCHIVO [libs/core/fingerprint-engine/src/lib.rs]
