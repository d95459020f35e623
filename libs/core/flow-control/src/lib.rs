// INICIO DEL ARCHIVO [libs/core/flow-control/src/lib.rs]
/*!
 * =================================================================
 * APARATO: FLOW CONTROL BARREL (V2.0 - DISCIPLINE STRATA)
 * CLASIFICACIÓN: CORE LIB (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DE PRIMITIVAS DE FLUJO
 * =================================================================
 */

pub mod ledger;
pub mod rate_limiter;
pub mod retry;
pub mod single_flight;

pub use ledger::AttemptLedgerArchive;
pub use rate_limiter::{AttemptRecord, AttemptScope, RateLimitRejection, SlidingWindowRateLimiter};
pub use retry::{execute_with_retry, RetryPolicy, RetryVerdict};
pub use single_flight::KeyedSingleFlight;
// FIN DEL ARCHIVO [libs/core/flow-control/src/lib.rs]
