// [apps/gateway/src/services/revalidation.rs]
/*!
 * =================================================================
 * APARATO: REVALIDATION PACEMAKER DAEMON (V2.0 - PULL DISCIPLINE)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE SERVICE (ESTRATO L4)
 * RESPONSABILIDAD: REVALIDACIÓN PERIÓDICA DEL DERECHO DE USO
 *
 * VISION HIPER-HOLÍSTICA:
 * El subsistema consulta en su propio calendario (pull); un cambio de
 * banda detectado aquí fluye al Dashboard por el bus de eventos sin
 * intervención del operador. La pérdida del emisor degrada suave.
 * =================================================================
 */

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, instrument};

use crate::state::AppState;

/**
 * Lanza el marcapasos de revalidación en el reactor de Tokio.
 *
 * El primer tick es inmediato: el caché de estado queda caliente antes
 * de que la primera ráfaga HTTP lo consulte.
 */
#[instrument(skip(application_state))]
pub async fn spawn_revalidation_daemon(application_state: AppState) {
    let cadence = application_state.settings.revalidation_interval;
    let mut revalidation_timer = interval(cadence);

    // Ticks perdidos por congestión se descartan: la frescura del
    // estado importa más que la cantidad de ejecuciones.
    revalidation_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::spawn(async move {
        info!(
            "🫀 [REVALIDATION_DAEMON]: Pacemaker operational (cadence {}s).",
            cadence.as_secs()
        );

        loop {
            revalidation_timer.tick().await;

            let status = application_state.license_manager.validate().await;
            debug!(
                "🫀 [REVALIDATION_PULSE]: Band '{}' (degraded={}).",
                status.license_status.as_label(),
                status.network_degraded
            );
        }
    });
}
