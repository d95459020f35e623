// INICIO DEL ARCHIVO [libs/infra/issuer-client/src/client.rs]
/*!
 * =================================================================
 * APARATO: ISSUER AUTHORITY UPLINK (V3.3 - PINNED TRANSPORT)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: NEGOCIACIÓN TIPADA CONTRA LA AUTORIDAD EMISORA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. DEADLINE SOVEREIGNTY: Cada llamada opera bajo un timeout por
 *    intento (5s nominal) y un deadline total (15s nominal).
 * 2. IDEMPOTENT RETRIES: Solo los fallos de clase red reintentan; la
 *    autoridad garantiza idempotencia mediante el eco de activationId.
 * 3. ROOT PINNING: Con raíces ancladas configuradas, el handshake TLS
 *    rechaza toda hoja que no encadene al anclaje.
 * =================================================================
 */

use chrono::Utc;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use pulse_core_flow::{execute_with_retry, RetryPolicy, RetryVerdict};
use pulse_domain_models::{DeviceComponents, LicenseFault};

use crate::protocol::{
    classify_activation, classify_deactivation, classify_uniqueness, ActivationWireRequest,
    DeactivationWireRequest, IssuerVerdict, IssuerWireResponse, UniquenessWireRequest,
    ACTION_ACTIVATE, ACTION_CHECK_UNIQUENESS, ACTION_DEACTIVATE,
};

/// Intentos máximos de una campaña de red contra el emisor.
const MAX_NETWORK_ATTEMPTS: u32 = 3;

/// Coordenadas y presupuestos del enlace con la autoridad emisora.
#[derive(Debug, Clone)]
pub struct IssuerClientConfig {
    pub base_url: String,
    pub per_attempt_timeout: Duration,
    pub total_deadline: Duration,
    /// Ruta a un bundle PEM de raíces ancladas; `None` usa las del sistema.
    pub pinned_roots_pem: Option<PathBuf>,
}

impl Default for IssuerClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://issuer.isx-pulse.example/api/license".to_string(),
            per_attempt_timeout: Duration::from_secs(5),
            total_deadline: Duration::from_secs(15),
            pinned_roots_pem: None,
        }
    }
}

/// Material de una negociación de activación o transferencia.
#[derive(Debug, Clone)]
pub struct ActivationCall {
    pub license_key_identity: String,
    pub device_primary_hash: String,
    pub components_snapshot: DeviceComponents,
    pub email: Option<String>,
    pub force_transfer: bool,
}

/**
 * Cliente tipado de la autoridad emisora.
 */
pub struct IssuerClient {
    network_session_client: reqwest::Client,
    issuer_endpoint: Url,
    retry_policy: RetryPolicy,
}

impl IssuerClient {
    /**
     * Forja el cliente con transporte rustls y anclaje opcional.
     *
     * # Errors:
     * `LicenseFault::Internal` ante URL malformada o bundle PEM ilegible;
     * ambas son fallas de configuración, no de red.
     */
    pub fn ignite(config: &IssuerClientConfig) -> Result<Self, LicenseFault> {
        let issuer_endpoint = Url::parse(&config.base_url).map_err(|parse_fault| {
            LicenseFault::Internal {
                detail: format!("ISSUER_URL_FAULT: {parse_fault}"),
            }
        })?;

        let mut client_builder = reqwest::Client::builder()
            .timeout(config.per_attempt_timeout)
            .use_rustls_tls();

        // --- ANCLAJE DE RAÍCES (CERTIFICATE PINNING) ---
        if let Some(pem_path) = &config.pinned_roots_pem {
            let pem_material = std::fs::read(pem_path).map_err(|io_fault| {
                LicenseFault::Internal {
                    detail: format!("PINNED_ROOTS_UNREADABLE: {io_fault}"),
                }
            })?;

            let pinned_roots =
                reqwest::Certificate::from_pem_bundle(&pem_material).map_err(|pem_fault| {
                    LicenseFault::Internal {
                        detail: format!("PINNED_ROOTS_MALFORMED: {pem_fault}"),
                    }
                })?;

            client_builder = client_builder.tls_built_in_root_certs(false);
            let anchored_count = pinned_roots.len();
            for root_certificate in pinned_roots {
                client_builder = client_builder.add_root_certificate(root_certificate);
            }
            info!("📌 [TLS_ANCHOR]: {anchored_count} pinned roots loaded; system roots disabled.");
        }

        let network_session_client = client_builder.build().map_err(|build_fault| {
            LicenseFault::Internal {
                detail: format!("HTTP_ENGINE_FAULT: {build_fault}"),
            }
        })?;

        Ok(Self {
            network_session_client,
            issuer_endpoint,
            retry_policy: RetryPolicy {
                max_attempts: MAX_NETWORK_ATTEMPTS,
                per_attempt_timeout: config.per_attempt_timeout,
                total_deadline: config.total_deadline,
            },
        })
    }

    /**
     * Negocia una activación (o transferencia con `force_transfer`).
     *
     * # Errors:
     * Fallos documentados del emisor ya clasificados, o `Network` ante
     * transporte, timeout o desalineación de protocolo.
     */
    #[instrument(skip(self, call), fields(force = call.force_transfer))]
    pub async fn activate(&self, call: &ActivationCall) -> Result<IssuerVerdict, LicenseFault> {
        let wire_request = ActivationWireRequest {
            action: ACTION_ACTIVATE,
            license_key: &call.license_key_identity,
            device_fingerprint: &call.device_primary_hash,
            components_snapshot: &call.components_snapshot,
            email: call.email.as_deref(),
            force_transfer: call.force_transfer.then_some(true),
        };
        let request_body = serde_json::to_value(&wire_request).map_err(|encode_fault| {
            LicenseFault::Internal {
                detail: format!("WIRE_ENCODE_FAULT: {encode_fault}"),
            }
        })?;

        let wire_response = self.dispatch_with_retry(request_body).await?;
        classify_activation(&wire_response, Utc::now())
    }

    /**
     * Audita un lote de códigos; entrega los duplicados detectados.
     */
    #[instrument(skip(self, codes), fields(batch = codes.len()))]
    pub async fn check_uniqueness(&self, codes: &[String]) -> Result<Vec<String>, LicenseFault> {
        let wire_request = UniquenessWireRequest {
            action: ACTION_CHECK_UNIQUENESS,
            codes,
        };
        let request_body = serde_json::to_value(&wire_request).map_err(|encode_fault| {
            LicenseFault::Internal {
                detail: format!("WIRE_ENCODE_FAULT: {encode_fault}"),
            }
        })?;

        let wire_response = self.dispatch_with_retry(request_body).await?;
        classify_uniqueness(&wire_response)
    }

    /**
     * Solicita la liberación del vínculo actual. Un solo intento: el
     * llamador trata esta operación como best-effort.
     */
    #[instrument(skip(self, device_primary_hash))]
    pub async fn deactivate(
        &self,
        license_key_identity: &str,
        device_primary_hash: &str,
    ) -> Result<(), LicenseFault> {
        let wire_request = DeactivationWireRequest {
            action: ACTION_DEACTIVATE,
            license_key: license_key_identity,
            device_fingerprint: device_primary_hash,
        };
        let request_body = serde_json::to_value(&wire_request).map_err(|encode_fault| {
            LicenseFault::Internal {
                detail: format!("WIRE_ENCODE_FAULT: {encode_fault}"),
            }
        })?;

        let wire_response = self.dispatch_once(request_body).await?;
        classify_deactivation(&wire_response)
    }

    /// Campaña de red con reintentos exclusivos de clase red.
    async fn dispatch_with_retry(
        &self,
        request_body: serde_json::Value,
    ) -> Result<IssuerWireResponse, LicenseFault> {
        execute_with_retry(
            &self.retry_policy,
            |attempt_ordinal| {
                debug!("📡 [ISSUER_DISPATCH]: Attempt {attempt_ordinal} towards authority.");
                self.dispatch_once(request_body.clone())
            },
            |failure| {
                if matches!(failure, LicenseFault::Network { .. }) {
                    RetryVerdict::Retry
                } else {
                    RetryVerdict::Fail
                }
            },
            || LicenseFault::Network {
                detail: "ISSUER_DEADLINE_EXCEEDED: Authority unreachable within budget".to_string(),
            },
        )
        .await
    }

    /// Ráfaga única POST JSON contra el endpoint de la autoridad.
    async fn dispatch_once(
        &self,
        request_body: serde_json::Value,
    ) -> Result<IssuerWireResponse, LicenseFault> {
        let http_response = self
            .network_session_client
            .post(self.issuer_endpoint.clone())
            .json(&request_body)
            .send()
            .await
            .map_err(|transport_fault| LicenseFault::Network {
                detail: format!("TRANSPORT_FAULT: {transport_fault}"),
            })?;

        let status = http_response.status();
        let raw_body = http_response
            .text()
            .await
            .map_err(|read_fault| LicenseFault::Network {
                detail: format!("BODY_READ_FAULT: {read_fault}"),
            })?;

        if !status.is_success() {
            // Un no-2xx solo escapa de la clase red si transporta la
            // estructura de error documentada del emisor.
            if let Ok(documented) = serde_json::from_str::<IssuerWireResponse>(&raw_body) {
                if documented.success == Some(false) && documented.result_code.is_some() {
                    return Ok(documented);
                }
            }
            warn!("📡 [ISSUER_REJECTION]: Undocumented status {status} from authority.");
            return Err(LicenseFault::Network {
                detail: format!("ISSUER_STATUS_{}", status.as_u16()),
            });
        }

        serde_json::from_str::<IssuerWireResponse>(&raw_body).map_err(|decode_fault| {
            LicenseFault::Network {
                detail: format!("PROTOCOL_DECODE_FAULT: {decode_fault}"),
            }
        })
    }
}
// FIN DEL ARCHIVO [libs/infra/issuer-client/src/client.rs]
