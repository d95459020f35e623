// [apps/gateway/src/problem.rs]
/*!
 * =================================================================
 * APARATO: PROBLEM DOCUMENT FORGE (V3.0 - RFC 7807 MASTER)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L4)
 * RESPONSABILIDAD: MAPEO ESTABLE TAXONOMÍA -> DOCUMENTO DE PROBLEMA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. STABLE TYPE URIS: Los clientes conmutan comportamiento sobre
 *    'type', jamás sobre 'detail'. Las URIs son contrato congelado.
 * 2. TRACE ALWAYS: Todo documento transporta 'trace_id'.
 * 3. ACTIVATION ENRICHMENT: Los fallos de activación adjuntan
 *    similitud, créditos y coordenada de reapertura de ventana.
 * =================================================================
 */

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use pulse_domain_models::LicenseFault;

/// Tipo MIME de los documentos de problema.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Documento de problema RFC 7807 con extensiones de activación.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDocument {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactivation_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactivation_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<DateTime<Utc>>,
}

impl ProblemDocument {
    /**
     * Forja el documento desde la taxonomía cerrada de fallos.
     */
    pub fn from_fault(fault: &LicenseFault, trace_id: &str) -> Self {
        let (status, title) = match fault {
            LicenseFault::InvalidFormat { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid license key format")
            }
            LicenseFault::InvalidKey => (StatusCode::BAD_REQUEST, "Unknown license key"),
            LicenseFault::AlreadyActivatedDifferentDevice { .. } => {
                (StatusCode::CONFLICT, "License bound to a different device")
            }
            LicenseFault::ReactivationLimitExceeded { .. } => {
                (StatusCode::CONFLICT, "Reactivation credit exhausted")
            }
            LicenseFault::Expired => (StatusCode::GONE, "License expired"),
            LicenseFault::Network { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "Issuer unreachable")
            }
            LicenseFault::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "Too many activation attempts")
            }
            LicenseFault::TamperedStore => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Entitlement storage integrity failure")
            }
            LicenseFault::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal licensing failure")
            }
        };

        let mut document = Self {
            type_uri: format!("/problems/{}", Self::type_slug(fault).replace('_', "-")),
            title: title.to_string(),
            status: status.as_u16(),
            detail: fault.to_string(),
            trace_id: trace_id.to_string(),
            similarity_score: None,
            reactivation_count: None,
            reactivation_limit: None,
            remaining_attempts: None,
            reset_at: None,
        };

        // --- ENRIQUECIMIENTO DE FALLOS DE ACTIVACIÓN ---
        match fault {
            LicenseFault::AlreadyActivatedDifferentDevice {
                similarity_score,
                remaining_attempts,
            } => {
                document.similarity_score = *similarity_score;
                document.remaining_attempts = *remaining_attempts;
            }
            LicenseFault::ReactivationLimitExceeded {
                reactivation_count,
                reactivation_limit,
            } => {
                document.reactivation_count = Some(*reactivation_count);
                document.reactivation_limit = Some(*reactivation_limit);
            }
            LicenseFault::RateLimited { reset_at } => {
                document.reset_at = Some(*reset_at);
            }
            _ => {}
        }

        document
    }

    /// Slug estable de la URI de tipo; contrato congelado con la UI.
    fn type_slug(fault: &LicenseFault) -> &'static str {
        match fault {
            // La brecha de integridad expone una URI propia, distinta
            // del fallo interno genérico.
            LicenseFault::TamperedStore => "storage-integrity",
            other => other.kind_label(),
        }
    }
}

impl IntoResponse for ProblemDocument {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}
