// [apps/gateway/src/handlers/status.rs]
/*!
 * =================================================================
 * APARATO: STATUS STRATUM HANDLER (V4.0 - SEMAPHORE GATEWAY)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN DEL SEMÁFORO DE LICENCIA AL DASHBOARD
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. CACHE-FIRST: Las consultas dentro del TTL se sirven del caché
 *    del Manager sin tocar al emisor (latencia < 1ms).
 * 2. PRIVACY SHIELD: Una brecha de integridad se presenta como
 *    'not_activated' en consultas públicas; solo la lectura explícita
 *    `/detailed` expone el documento de problema con URI propio.
 * =================================================================
 */

use axum::{
    extract::State,
    response::{IntoResponse as AxumResponse, Response},
    Extension, Json,
};
use tracing::{debug, instrument};

use crate::middleware::TraceId;
use crate::problem::ProblemDocument;
use crate::state::AppState;

pub struct StatusHandler;

impl StatusHandler {
    /**
     * Endpoint: GET /api/license/status
     *
     * Semáforo de licencia para el HUD del Dashboard.
     */
    #[instrument(skip(application_state))]
    pub async fn handle_get_status(
        State(application_state): State<AppState>,
    ) -> impl AxumResponse {
        let status = application_state.license_manager.public_status().await;
        debug!("🎫 [STATUS_QUERY]: Serving '{}' band.", status.license_status.as_label());
        Json(status)
    }

    /**
     * Endpoint: GET /api/license/detailed
     *
     * Vista extendida con metadatos del derecho de uso.
     */
    #[instrument(skip(application_state, trace))]
    pub async fn handle_get_detailed(
        State(application_state): State<AppState>,
        Extension(trace): Extension<TraceId>,
    ) -> Response {
        match application_state.license_manager.detailed_status().await {
            Ok(status) => Json(status).into_response(),
            Err(fault) => ProblemDocument::from_fault(&fault, &trace.0).into_response(),
        }
    }

    /**
     * Endpoint: GET /api/license/renewal
     *
     * Veredicto de renovación para los avisos del Dashboard.
     */
    #[instrument(skip(application_state))]
    pub async fn handle_get_renewal(
        State(application_state): State<AppState>,
    ) -> impl AxumResponse {
        Json(application_state.license_manager.renewal_assessment().await)
    }
}
