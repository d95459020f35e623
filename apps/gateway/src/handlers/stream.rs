// [apps/gateway/src/handlers/stream.rs]
/**
 * =================================================================
 * APARATO: STATUS UPLINK SOCKET (V4.1 - ZENITH GOLD MASTER)
 * CLASIFICACIÓN: API HANDLER (ESTRATO L4)
 * RESPONSABILIDAD: TÚNEL DE CAMBIOS DE ESTADO SERVIDOR -> DASHBOARD
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. ONE-WAY DISCIPLINE: Solo el flujo servidor->cliente es contrato;
 *    el flujo ascendente se drena y descarta (salvo el cierre).
 * 2. LAG EVICTION: Un suscriptor congestionado acumula strikes por
 *    tramas perdidas; agotada la gracia, el enlace se corta y el
 *    cliente se recupera consultando el estado por HTTP.
 * 3. KEEPALIVE: Pings periódicos sostienen el enlace a través de
 *    proxies de capa 7.
 * =================================================================
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::time::{interval, Duration};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Intervalo de latido (Keep-Alive): 25s.
/// Sintonizado para prevenir cierres por inactividad en proxies L7.
const KEEPALIVE_INTERVAL_SECONDS: u64 = 25;

/// Strikes de congestión tolerados antes de cortar el enlace.
const LAG_STRIKE_GRACE: u32 = 3;

/**
 * Punto de entrada para la negociación del túnel de estado.
 * Transición de protocolo HTTP a WebSocket (RFC 6455).
 */
#[instrument(skip(websocket_upgrade, application_state))]
pub async fn establish_status_uplink(
    websocket_upgrade: WebSocketUpgrade,
    State(application_state): State<AppState>,
) -> impl IntoResponse {
    debug!("🔌 [SOCKET_UPGRADE]: Negotiating protocol transition for status uplink...");
    websocket_upgrade.on_upgrade(move |socket| handle_active_status_link(socket, application_state))
}

/**
 * Orquestador de la sesión WebSocket: Downstream + Upstream.
 */
async fn handle_active_status_link(socket: WebSocket, application_state: AppState) {
    let (mut socket_sender, mut socket_receiver) = socket.split();
    let mut event_bus_subscriber = application_state.event_bus.subscribe();

    let session_identifier = Uuid::new_v4().to_string();
    let session_identifier_reference = session_identifier.clone();

    info!("⚡ [UPLINK_OPEN]: Status link session {} established.", session_identifier);

    // --- TAREA 1: DOWNSTREAM (Server -> Dashboard) ---
    let session_id_downstream_context = session_identifier.clone();
    let mut sender_transmission_task = tokio::spawn(async move {
        let mut keepalive_timer = interval(Duration::from_secs(KEEPALIVE_INTERVAL_SECONDS));
        let mut lag_strike_count: u32 = 0;

        loop {
            tokio::select! {
                // Brazo 1: Pulso de vida físico (Ping-Pong)
                _ = keepalive_timer.tick() => {
                    if socket_sender.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                },

                // Brazo 2: Sifón del Bus de Eventos
                bus_reception_result = event_bus_subscriber.recv() => {
                    match bus_reception_result {
                        Ok(event_envelope) => {
                            let frame_payload = match serde_json::to_string(&event_envelope) {
                                Ok(payload) => payload,
                                Err(encode_fault) => {
                                    warn!("📦 [FRAME_SKIP]: Envelope serialization failed: {encode_fault}");
                                    continue;
                                }
                            };
                            if socket_sender.send(Message::Text(frame_payload)).await.is_err() {
                                warn!("⚠️ [UPLINK_SEVERED]: Session {} lost downstream strata.", session_id_downstream_context);
                                break;
                            }
                        },
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(missed_frames_count)) => {
                            lag_strike_count += 1;
                            warn!(
                                "🐢 [UPLINK_LAG]: Session {} dropped {} frames (strike {}/{}).",
                                session_id_downstream_context, missed_frames_count,
                                lag_strike_count, LAG_STRIKE_GRACE
                            );
                            if lag_strike_count >= LAG_STRIKE_GRACE {
                                warn!("✂️ [UPLINK_EVICTED]: Session {} too slow; link severed.", session_id_downstream_context);
                                break;
                            }
                        },
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            debug!("💀 [BUS_CLOSED]: Event channel gone for session {}.", session_id_downstream_context);
                            break;
                        }
                    }
                },
            }
        }
    });

    // --- TAREA 2: UPSTREAM (Dashboard -> Server, solo cierre) ---
    let session_id_upstream_context = session_identifier.clone();
    let mut receiver_ingestion_task = tokio::spawn(async move {
        while let Some(network_read_result) = socket_receiver.next().await {
            match network_read_result {
                Ok(Message::Close(_)) => {
                    debug!("🔌 [SOCKET_CLOSE]: Termination signal from remote host.");
                    break;
                }
                Err(physical_layer_fault) => {
                    debug!(
                        "❌ [UPLINK_FAULT]: Session {} network error: {}",
                        session_id_upstream_context, physical_layer_fault
                    );
                    break;
                }
                // El contrato es unidireccional: texto, binario y pongs
                // entrantes se drenan sin procesamiento.
                _ => {}
            }
        }
    });

    // --- LIMPIEZA ATÓMICA DE ESTRATO ---
    tokio::select! {
        _ = (&mut sender_transmission_task) => {
            receiver_ingestion_task.abort();
        },
        _ = (&mut receiver_ingestion_task) => {
            sender_transmission_task.abort();
        },
    };

    info!("💀 [UPLINK_TERMINATED]: Session {} resources released.", session_identifier_reference);
}
