// INICIO DEL ARCHIVO [libs/core/flow-control/src/retry.rs]
/*!
 * =================================================================
 * APARATO: RETRY COMBINATOR ENGINE (V2.0 - DEADLINE SOVEREIGN)
 * CLASIFICACIÓN: CORE FLOW (ESTRATO L1)
 * RESPONSABILIDAD: REINTENTOS PARAMETRIZADOS CON DEADLINE TOTAL
 *
 * VISION HIPER-HOLÍSTICA:
 * Un único combinador gobierna todos los reintentos del sistema:
 * (max_attempts, per_attempt_timeout, total_deadline, classify).
 * El clasificador decide por tipo de fallo; el combinador jamás
 * reintenta un fallo clasificado como terminal.
 * =================================================================
 */

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, warn};

/// Parametrización completa de una campaña de reintentos.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub per_attempt_timeout: Duration,
    pub total_deadline: Duration,
}

/// Veredicto del clasificador de fallos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryVerdict {
    Retry,
    Fail,
}

/// Base del backoff lineal entre intentos.
const BACKOFF_BASE_MILLISECONDS: u64 = 150;

/**
 * Ejecuta `operation` bajo la política dada.
 *
 * # Logic:
 * 1. Cada intento recibe el mínimo entre su timeout propio y el
 *    presupuesto remanente del deadline total.
 * 2. Un timeout de intento se materializa vía `on_timeout` y pasa por
 *    el clasificador como cualquier otro fallo.
 * 3. Solo los fallos con veredicto `Retry` consumen otro intento.
 *
 * # Errors:
 * El último fallo observado cuando la campaña se agota.
 */
pub async fn execute_with_retry<T, E, MakeAttempt, Attempt, Classify, OnTimeout>(
    policy: &RetryPolicy,
    mut operation: MakeAttempt,
    classify: Classify,
    on_timeout: OnTimeout,
) -> Result<T, E>
where
    MakeAttempt: FnMut(u32) -> Attempt,
    Attempt: Future<Output = Result<T, E>>,
    Classify: Fn(&E) -> RetryVerdict,
    OnTimeout: Fn() -> E,
{
    let campaign_ignition = Instant::now();
    let mut attempt_ordinal: u32 = 1;

    loop {
        let consumed = campaign_ignition.elapsed();
        let Some(remaining_budget) = policy.total_deadline.checked_sub(consumed) else {
            warn!("⏱️ [RETRY_DEADLINE]: Total budget exhausted before attempt {attempt_ordinal}.");
            return Err(on_timeout());
        };
        if remaining_budget.is_zero() {
            return Err(on_timeout());
        }

        let attempt_budget = remaining_budget.min(policy.per_attempt_timeout);

        let failure = match timeout(attempt_budget, operation(attempt_ordinal)).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(operation_failure)) => operation_failure,
            Err(_elapsed) => {
                debug!("⏱️ [RETRY_TIMEOUT]: Attempt {attempt_ordinal} exceeded its budget.");
                on_timeout()
            }
        };

        if attempt_ordinal >= policy.max_attempts {
            return Err(failure);
        }
        if classify(&failure) == RetryVerdict::Fail {
            return Err(failure);
        }

        attempt_ordinal += 1;
        sleep(Duration::from_millis(
            BACKOFF_BASE_MILLISECONDS * u64::from(attempt_ordinal),
        ))
        .await;
    }
}

// FIN DEL ARCHIVO [libs/core/flow-control/src/retry.rs]
