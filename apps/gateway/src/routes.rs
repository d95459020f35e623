// INICIO DEL ARCHIVO [apps/gateway/src/routes.rs]
/*!
 * =================================================================
 * APARATO: SOVEREIGN ROUTING MATRIX (V4.0 - LICENSE GATEWAY)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: TOPOLOGÍA DE RED DEL SUBSISTEMA DE LICENCIA
 *
 * VISION HIPER-HOLÍSTICA:
 * La topología soporta:
 * 1. REST de licenciamiento (semáforo, negociación de vínculos).
 * 2. WebSocket de estado (Real-Time Semaphore).
 * 3. Deadline duro de 30s por petición (cota superior de la fachada).
 * =================================================================
 */

use crate::handlers::{activation::ActivationHandler, status::StatusHandler, stream};
use crate::middleware::{health_guard, trace_shield};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

/// Cota superior dura de la fachada por petición.
const FACADE_DEADLINE_SECONDS: u64 = 30;

pub fn create_gateway_router(application_shared_state: AppState) -> Router {
    // Escudo de Red: CORS para el Dashboard y herramientas de Ops
    let network_security_shield = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    // ESTRATO DE LICENCIAMIENTO: Semáforo y Negociación de Vínculos
    let license_stratum = Router::new()
        // Semáforo de licencia (cache-first)
        .route("/status", get(StatusHandler::handle_get_status))
        // Vista extendida del derecho de uso
        .route("/detailed", get(StatusHandler::handle_get_detailed))
        // Veredicto de renovación
        .route("/renewal", get(StatusHandler::handle_get_renewal))
        // Negociación de activación
        .route("/activate", post(ActivationHandler::handle_activate))
        // Migración de vínculo (similaridad o fuerza)
        .route("/transfer", post(ActivationHandler::handle_transfer))
        // Liberación del vínculo actual
        .route("/deactivate", post(ActivationHandler::handle_deactivate))
        // Auditoría de lotes de Scratch Cards
        .route("/check-uniqueness", post(ActivationHandler::handle_check_uniqueness))
        // Guardia de Salud (Mantenimiento)
        .layer(middleware::from_fn_with_state(
            application_shared_state.clone(),
            health_guard,
        ));

    // COMPOSICIÓN GLOBAL (Root Topology)
    Router::new()
        .route("/health", get(|| async { "STATUS_OK" }))
        .nest("/api/license", license_stratum)
        // Singularidad Activa: Túnel WebSocket de estado
        .route("/ws", get(stream::establish_status_uplink))
        // Rastro soberano por petición
        .layer(middleware::from_fn(trace_shield))
        // Deadline duro de la fachada
        .layer(TimeoutLayer::new(Duration::from_secs(FACADE_DEADLINE_SECONDS)))
        .layer(network_security_shield)
        .with_state(application_shared_state)
}
// FIN DEL ARCHIVO [apps/gateway/src/routes.rs]
