// [apps/gateway/src/middleware.rs]
/*!
 * =================================================================
 * APARATO: PERIMETER GUARD MATRIX (V4.0 - TRACE SOVEREIGN)
 * CLASIFICACIÓN: SECURITY STRATUM (ESTRATO L4)
 * RESPONSABILIDAD: RASTRO POR PETICIÓN Y BLOQUEO DE MANTENIMIENTO
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. TRACE INJECTION: Todo tránsito recibe un identificador de rastro
 *    (entrante honrado, forjado en su ausencia) inyectado en el flujo
 *    asíncrono y devuelto en la cabecera de respuesta.
 * 2. HEALTH SHIELD: El modo mantenimiento intercepta ANTES de tocar
 *    el corazón de licenciamiento.
 * =================================================================
 */

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

/// Cabecera de rastro del ecosistema.
pub const TRACE_HEADER: &str = "x-trace-id";

/// Identificador de rastro inyectado en las extensiones de la petición.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/**
 * Guardia de Rastro: inyecta y ecoa el identificador de tránsito.
 */
pub async fn trace_shield(mut request: Request, next: Next) -> Response {
    let trace_identifier = request
        .headers()
        .get(TRACE_HEADER)
        .and_then(|header_value| header_value.to_str().ok())
        .filter(|candidate| !candidate.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(TraceId(trace_identifier.clone()));

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        TRACE_HEADER,
        HeaderValue::from_str(&trace_identifier)
            .unwrap_or_else(|_| HeaderValue::from_static("untraceable")),
    );
    response
}

/**
 * Guardia de Salud: bloquea el acceso durante mantenimiento.
 */
pub async fn health_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Err(rejection_reason) = state.is_operational() {
        warn!("⛔ [ACCESS_DENIED]: Sector under maintenance: {}", rejection_reason);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "MAINTENANCE_ACTIVE",
                "reason": rejection_reason,
                "retry_after": 60
            })),
        )
            .into_response();
    }
    next.run(request).await
}
