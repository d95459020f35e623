// [apps/gateway/src/services/ledger_flush.rs]
/*!
 * =================================================================
 * APARATO: ATTEMPT LEDGER FLUSH DAEMON (V2.0 - WRITE BEHIND)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE SERVICE (ESTRATO L4)
 * RESPONSABILIDAD: CRISTALIZACIÓN PERIÓDICA DEL LIBRO DE INTENTOS
 *
 * VISION HIPER-HOLÍSTICA:
 * Un reinicio del gateway no debe amnistiar a un cliente abusivo: el
 * libro de intentos vivo se archiva en ráfagas diferidas (write-behind)
 * y se re-hidrata en la ignición del Kernel. Toda falla es no-fatal.
 * =================================================================
 */

use chrono::Utc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument};

use pulse_core_flow::AttemptLedgerArchive;

use crate::state::AppState;

/// Intervalo nominal de sincronización del archivo (30 segundos).
const LEDGER_SYNC_INTERVAL_SECONDS: u64 = 30;

/**
 * Lanza el servicio de archivo diferido en el reactor de Tokio.
 */
#[instrument(skip(application_state))]
pub async fn spawn_ledger_flush_daemon(application_state: AppState) {
    let mut synchronization_timer = interval(Duration::from_secs(LEDGER_SYNC_INTERVAL_SECONDS));
    synchronization_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let archive_engine =
        AttemptLedgerArchive::new(application_state.settings.attempt_ledger_path.clone());

    tokio::spawn(async move {
        info!("💾 [LEDGER_DAEMON]: Attempt archive engine operational.");

        loop {
            synchronization_timer.tick().await;

            // --- FASE 1: DRENAJE (MEMORY STRATA) ---
            let live_attempt_records = application_state
                .license_manager
                .attempt_ledger_snapshot(Utc::now());

            if live_attempt_records.is_empty() {
                continue;
            }

            // --- FASE 2: CRISTALIZACIÓN (IO STRATA, BEST-EFFORT) ---
            debug!(
                "💾 [LEDGER_FLUSH]: Archiving {} live attempts...",
                live_attempt_records.len()
            );
            archive_engine.persist(&live_attempt_records);
        }
    });
}
