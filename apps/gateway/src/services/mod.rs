// [apps/gateway/src/services/mod.rs]
/**
 * =================================================================
 * APARATO: SERVICE ORCHESTRATION HUB (V4.0 - DAEMON MATRIX)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE DAEMONS Y MOTORES
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. MODULARIDAD: Cada servicio opera como unidad atómica aislada.
 * 2. PULL DISCIPLINE: El subsistema consulta al emisor en su propio
 *    calendario; jamás recibe push de revocación.
 * =================================================================
 */

pub mod event_bus;
pub mod ledger_flush;
pub mod revalidation;

// --- RE-EXPORTACIONES SOBERANAS (NOMINAL ACCESS) ---

pub use event_bus::EventBus;
pub use ledger_flush::spawn_ledger_flush_daemon;
pub use revalidation::spawn_revalidation_daemon;
