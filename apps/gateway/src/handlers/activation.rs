// [apps/gateway/src/handlers/activation.rs]
/*!
 * =================================================================
 * APARATO: ACTIVATION STRATUM HANDLER (V4.2 - BINDING GATEWAY)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L4)
 * RESPONSABILIDAD: NEGOCIACIÓN DE VÍNCULOS DE LICENCIA VÍA HTTP
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. CLIENT IDENTITY: El limitador cobra por (clave, cliente); la
 *    identidad del cliente llega por cabecera o por la dirección de
 *    la capa de transporte.
 * 2. PROBLEM DISCIPLINE: Todo fallo sale como documento RFC 7807 con
 *    URI de tipo estable y rastro.
 * 3. NATIVE FINGERPRINT AUTHORITY: La huella enviada por el cliente
 *    web es advisoria; la vinculante se computa en este host.
 * =================================================================
 */

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{debug, info, instrument};

use pulse_domain_licensing::{ActivationOutcome, ActivationReceipt};

use crate::middleware::TraceId;
use crate::problem::ProblemDocument;
use crate::state::AppState;

/// Cabecera opcional de identidad estable del cliente.
pub const CLIENT_IDENTITY_HEADER: &str = "x-client-id";

/// Cuerpo de una solicitud de activación.
#[derive(Debug, Deserialize)]
pub struct ActivationRequestBody {
    pub license_key: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Huella advisoria del cliente web; la vinculante es la nativa.
    #[serde(default)]
    pub device_fingerprint: Option<String>,
}

/// Cuerpo de una solicitud de transferencia de vínculo.
#[derive(Debug, Deserialize)]
pub struct TransferRequestBody {
    pub license_key: String,
    #[serde(default)]
    pub force: bool,
}

/// Cuerpo de una auditoría de unicidad de códigos.
#[derive(Debug, Deserialize)]
pub struct UniquenessRequestBody {
    pub codes: Vec<String>,
}

/// Respuesta nominal de una negociación de vínculo.
#[derive(Debug, Serialize)]
pub struct ActivationSuccessBody {
    pub success: bool,
    pub message: String,
    pub activated_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactivation_count: Option<u32>,
}

impl ActivationSuccessBody {
    fn from_receipt(receipt: ActivationReceipt) -> Self {
        let reactivation_count = match receipt.outcome {
            ActivationOutcome::Reactivated { reactivation_count } => Some(reactivation_count),
            _ => None,
        };

        Self {
            success: true,
            message: receipt.message,
            activated_at: receipt.activated_at,
            expiry_date: receipt.expiry_date,
            features: receipt.features,
            reactivation_count,
        }
    }
}

pub struct ActivationHandler;

impl ActivationHandler {
    /**
     * Endpoint: POST /api/license/activate
     */
    #[instrument(skip_all, fields(trace = %trace.0))]
    pub async fn handle_activate(
        State(application_state): State<AppState>,
        ConnectInfo(remote_address): ConnectInfo<SocketAddr>,
        Extension(trace): Extension<TraceId>,
        request_headers: HeaderMap,
        Json(request_body): Json<ActivationRequestBody>,
    ) -> Response {
        if request_body.device_fingerprint.is_some() {
            debug!("🧬 [ADVISORY_FINGERPRINT]: Web-side fingerprint received; native binding prevails.");
        }

        let client_identity = resolve_client_identity(&request_headers, &remote_address);

        match application_state
            .license_manager
            .activate(&request_body.license_key, &client_identity, request_body.email)
            .await
        {
            Ok(receipt) => {
                info!("🎫 [FACADE_ACTIVATION]: Binding sealed for client {client_identity}.");
                Json(ActivationSuccessBody::from_receipt(receipt)).into_response()
            }
            Err(fault) => ProblemDocument::from_fault(&fault, &trace.0).into_response(),
        }
    }

    /**
     * Endpoint: POST /api/license/transfer
     */
    #[instrument(skip_all, fields(trace = %trace.0, force = request_body.force))]
    pub async fn handle_transfer(
        State(application_state): State<AppState>,
        ConnectInfo(remote_address): ConnectInfo<SocketAddr>,
        Extension(trace): Extension<TraceId>,
        request_headers: HeaderMap,
        Json(request_body): Json<TransferRequestBody>,
    ) -> Response {
        let client_identity = resolve_client_identity(&request_headers, &remote_address);

        match application_state
            .license_manager
            .transfer(&request_body.license_key, &client_identity, request_body.force)
            .await
        {
            Ok(receipt) => {
                info!("🎫 [FACADE_TRANSFER]: Binding migrated to this machine.");
                Json(ActivationSuccessBody::from_receipt(receipt)).into_response()
            }
            Err(fault) => ProblemDocument::from_fault(&fault, &trace.0).into_response(),
        }
    }

    /**
     * Endpoint: POST /api/license/deactivate
     *
     * La purga local procede aunque el emisor sea inalcanzable; en ese
     * caso el documento 503 registra la discrepancia.
     */
    #[instrument(skip_all, fields(trace = %trace.0))]
    pub async fn handle_deactivate(
        State(application_state): State<AppState>,
        Extension(trace): Extension<TraceId>,
    ) -> Response {
        match application_state.license_manager.deactivate().await {
            Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
            Err(fault) => ProblemDocument::from_fault(&fault, &trace.0).into_response(),
        }
    }

    /**
     * Endpoint: POST /api/license/check-uniqueness
     *
     * Auditoría de lotes de Scratch Cards contra el emisor.
     */
    #[instrument(skip_all, fields(trace = %trace.0, batch = request_body.codes.len()))]
    pub async fn handle_check_uniqueness(
        State(application_state): State<AppState>,
        Extension(trace): Extension<TraceId>,
        Json(request_body): Json<UniquenessRequestBody>,
    ) -> Response {
        match application_state
            .license_manager
            .check_uniqueness(&request_body.codes)
            .await
        {
            Ok(duplicates) => {
                Json(serde_json::json!({ "duplicates": duplicates })).into_response()
            }
            Err(fault) => ProblemDocument::from_fault(&fault, &trace.0).into_response(),
        }
    }
}

/// Identidad estable del cliente: cabecera dedicada o IP de transporte.
fn resolve_client_identity(headers: &HeaderMap, remote_address: &SocketAddr) -> String {
    headers
        .get(CLIENT_IDENTITY_HEADER)
        .and_then(|header_value| header_value.to_str().ok())
        .filter(|candidate| !candidate.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| remote_address.ip().to_string())
}
