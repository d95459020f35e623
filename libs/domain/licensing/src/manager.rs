// INICIO DEL ARCHIVO [libs/domain/licensing/src/manager.rs]
/*!
 * =================================================================
 * APARATO: LICENSE MANAGER STATE MACHINE (V4.2 - SINGULARITY)
 * CLASIFICACIÓN: DOMAIN ORCHESTRATOR (ESTRATO L2)
 * RESPONSABILIDAD: ORQUESTACIÓN DE ACTIVACIÓN, VALIDACIÓN Y LIBERACIÓN
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. SINGLE WRITER: Este aparato es el único escritor del derecho de
 *    uso en memoria y del caché de estado; los llamadores reciben
 *    vistas clonadas de solo lectura.
 * 2. DETACHED COMMIT: Una activación negociada con el emisor sella su
 *    persistencia local aunque el llamador HTTP abandone; el estado
 *    del emisor es autoritativo y no se huérfana.
 * 3. DEFENSE IN DEPTH: El tope de reactivación rige en ambos lados;
 *    el más estricto gana. Jamás se anula una negación del emisor.
 * 4. SOFT DEGRADATION: La pérdida del emisor durante una revalidación
 *    NO demote un estado Activo; se señala 'network_degraded'.
 *
 * # Mathematical Proof (Preserved Prior State):
 * Todo fallo de negociación retorna ANTES de cualquier escritura de
 * bóveda; el derecho previo (si existe) permanece intacto byte a byte.
 * =================================================================
 */

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use pulse_core_fingerprint::{host_fingerprint, similarity_score};
use pulse_core_flow::{AttemptRecord, AttemptScope, KeyedSingleFlight, SlidingWindowRateLimiter};
use pulse_core_vault::{EntitlementVault, VaultFault};
use pulse_domain_models::{
    DurationCode, Entitlement, EventEnvelope, LicenseFault, LicenseKey, LicenseState,
    LicenseStatus, RenewalAssessment,
};
use pulse_infra_issuer::{ActivationCall, IssuerClient, IssuerGrant, IssuerVerdict};

use crate::policy::LicensingPolicy;
use crate::status_engine::{assess_renewal, compute_expiry, derive_state, derive_status};

/// Desenlace tipado de una negociación de activación o transferencia.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationOutcome {
    /// Activación fresca sellada en esta máquina.
    Activated,
    /// Re-ejecución idempotente: el vínculo ya apuntaba aquí.
    AlreadyBoundHere,
    /// Máquina suficientemente similar; un crédito de reactivación consumido.
    Reactivated { reactivation_count: u32 },
}

/// Recibo clonable de activación; los seguidores de un vuelo único
/// reciben una copia del recibo del ganador.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationReceipt {
    pub outcome: ActivationOutcome,
    pub message: String,
    pub activated_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub features: Vec<String>,
}

/// Célula del caché de estado: un único derecho por instalación.
#[derive(Default)]
struct StatusCacheCell {
    snapshot: Option<LicenseStatus>,
    refreshed_at: Option<DateTime<Utc>>,
    /// La última lectura de bóveda falló verificación de integridad.
    integrity_breached: bool,
}

/// Clave de vuelo para liberaciones sin derecho local registrado.
const UNBOUND_FLIGHT_KEY: &str = "__unbound__";

/// Ámbito comodín del tope por cliente (independiente de la clave).
const CLIENT_WIDE_KEY_SCOPE: &str = "*";

/**
 * Máquina de estados soberana del ciclo de vida de licencia.
 */
pub struct LicenseManager {
    core: Arc<ManagerCore>,
    rate_limiter: SlidingWindowRateLimiter,
    activation_flights: KeyedSingleFlight<Result<ActivationReceipt, LicenseFault>>,
    deactivation_flights: KeyedSingleFlight<Result<(), LicenseFault>>,
}

/// Colaboradores compartidos con las tareas de compromiso desacoplado.
struct ManagerCore {
    vault: EntitlementVault,
    issuer: Arc<IssuerClient>,
    policy: LicensingPolicy,
    status_cache: RwLock<StatusCacheCell>,
    event_sender: broadcast::Sender<EventEnvelope>,
}

impl LicenseManager {
    /**
     * Forja el Manager inyectando sus colaboradores (sin singletons).
     */
    pub fn new(
        vault: EntitlementVault,
        issuer: Arc<IssuerClient>,
        policy: LicensingPolicy,
        event_sender: broadcast::Sender<EventEnvelope>,
    ) -> Self {
        let rate_limiter = SlidingWindowRateLimiter::new(
            policy.rate_limit_window_seconds,
            policy.rate_limit_max_attempts,
        );

        Self {
            core: Arc::new(ManagerCore {
                vault,
                issuer,
                policy,
                status_cache: RwLock::new(StatusCacheCell::default()),
                event_sender,
            }),
            rate_limiter,
            activation_flights: KeyedSingleFlight::new(),
            deactivation_flights: KeyedSingleFlight::new(),
        }
    }

    pub fn policy(&self) -> &LicensingPolicy {
        &self.core.policy
    }

    /**
     * Activa una clave sobre esta máquina.
     *
     * # Logic:
     * normalización -> sintaxis -> limitador -> vuelo único ->
     * huella -> emisor -> clasificación -> bóveda -> caché -> evento.
     *
     * # Errors:
     * Taxonomía cerrada completa; ante cualquier fallo el derecho
     * previo permanece intacto.
     */
    #[instrument(skip(self, raw_key, email))]
    pub async fn activate(
        &self,
        raw_key: &str,
        client_identity: &str,
        email: Option<String>,
    ) -> Result<ActivationReceipt, LicenseFault> {
        self.run_binding_pipeline(raw_key, client_identity, email, false)
            .await
    }

    /**
     * Transfiere el vínculo de una clave hacia esta máquina.
     * Sin `force`, el emisor solo concede ante elegibilidad de
     * reactivación; con `force`, el emisor es autoritativo.
     */
    #[instrument(skip(self, raw_key))]
    pub async fn transfer(
        &self,
        raw_key: &str,
        client_identity: &str,
        force: bool,
    ) -> Result<ActivationReceipt, LicenseFault> {
        self.run_binding_pipeline(raw_key, client_identity, None, force)
            .await
    }

    async fn run_binding_pipeline(
        &self,
        raw_key: &str,
        client_identity: &str,
        email: Option<String>,
        force_transfer: bool,
    ) -> Result<ActivationReceipt, LicenseFault> {
        // --- 1. SINTAXIS LOCAL (JAMÁS TOCA LA RED) ---
        let key = LicenseKey::parse(raw_key)?;

        // --- 2. ESCUDO DE ABUSO (TOPE POR CLIENTE Y POR CLAVE) ---
        // El comodín cubre ráfagas de claves distintas desde un mismo
        // cliente; el ámbito exacto cubre el martilleo de una clave.
        self.rate_limiter
            .charge(AttemptScope {
                key_identity: CLIENT_WIDE_KEY_SCOPE.to_string(),
                client_identity: client_identity.to_string(),
            })
            .and_then(|()| {
                self.rate_limiter.charge(AttemptScope {
                    key_identity: key.identity().to_string(),
                    client_identity: client_identity.to_string(),
                })
            })
            .map_err(|rejection| LicenseFault::RateLimited {
                reset_at: rejection.reset_at,
            })?;

        // --- 3. VUELO ÚNICO CON COMPROMISO DESACOPLADO ---
        let core_reference = Arc::clone(&self.core);
        let key_for_flight = key.clone();
        let flight_key = key.identity().to_string();

        let shared_outcome = self.activation_flights.run(&flight_key, move || async move {
            core_reference
                .negotiate_and_commit(key_for_flight, email, force_transfer)
                .await
        });

        match timeout(self.core.policy.activate_deadline, shared_outcome).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Err(LicenseFault::Internal {
                detail: "FLIGHT_COLLAPSE: Winner task vanished before announcing".to_string(),
            }),
            Err(_deadline) => Err(LicenseFault::Network {
                detail: "ACTIVATION_DEADLINE_EXCEEDED: Commit continues in background".to_string(),
            }),
        }
    }

    /**
     * Deriva el estado vigente; revalida solo si el caché caducó.
     *
     * Tras una activación nominal, las validaciones dentro del TTL se
     * sirven del caché sin tocar de nuevo al emisor.
     */
    #[instrument(skip(self))]
    pub async fn validate(&self) -> LicenseStatus {
        let now = Utc::now();

        {
            let cache_guard = self.core.status_cache.read().await;
            if let (Some(snapshot), Some(refreshed_at)) =
                (cache_guard.snapshot.as_ref(), cache_guard.refreshed_at)
            {
                let ttl = ChronoDuration::seconds(self.core.policy.cache_ttl.as_secs() as i64);
                if now.signed_duration_since(refreshed_at) < ttl {
                    debug!("🗄️ [STATUS_CACHE]: Serving snapshot within TTL.");
                    return snapshot.clone();
                }
            }
        }

        self.core.revalidate(now).await
    }

    /**
     * Estado para consultas públicas: una brecha de integridad se
     * presenta como 'not_activated' sin revelar detalles del blindaje.
     */
    pub async fn public_status(&self) -> LicenseStatus {
        let status = self.validate().await;
        if self.core.status_cache.read().await.integrity_breached {
            return LicenseStatus::not_activated();
        }
        status
    }

    /**
     * Estado para lecturas explícitas (endpoint `/detailed`).
     *
     * # Errors:
     * `TamperedStore` cuando la bóveda falló verificación; la façade
     * lo mapea a un documento de problema con URI propio.
     */
    pub async fn detailed_status(&self) -> Result<LicenseStatus, LicenseFault> {
        let status = self.validate().await;
        if self.core.status_cache.read().await.integrity_breached {
            return Err(LicenseFault::TamperedStore);
        }
        Ok(status)
    }

    /// Veredicto de renovación derivado del estado vigente.
    pub async fn renewal_assessment(&self) -> RenewalAssessment {
        assess_renewal(&self.validate().await)
    }

    /**
     * Libera el vínculo: aviso best-effort al emisor y purga local
     * incondicional en la ruta de éxito local.
     *
     * # Errors:
     * `Network` cuando el emisor no fue alcanzado (la purga local YA
     * procedió; la discrepancia queda registrada). `Internal` solo si
     * la purga local misma falló.
     */
    #[instrument(skip(self))]
    pub async fn deactivate(&self) -> Result<(), LicenseFault> {
        let flight_key = match self.core.vault.load() {
            Ok(entitlement) => entitlement.key_identity,
            Err(_) => UNBOUND_FLIGHT_KEY.to_string(),
        };

        let core_reference = Arc::clone(&self.core);
        let shared_outcome = self
            .deactivation_flights
            .run(&flight_key, move || async move {
                core_reference.release_binding().await
            })
            .await;

        shared_outcome.unwrap_or_else(|| {
            Err(LicenseFault::Internal {
                detail: "FLIGHT_COLLAPSE: Release task vanished before announcing".to_string(),
            })
        })
    }

    /**
     * Audita un lote de códigos contra el emisor (duplicados).
     *
     * # Errors:
     * `InvalidFormat` ante cualquier código malformado del lote;
     * la auditoría jamás viaja con material sin normalizar.
     */
    pub async fn check_uniqueness(&self, raw_codes: &[String]) -> Result<Vec<String>, LicenseFault> {
        let mut identities = Vec::with_capacity(raw_codes.len());
        for raw_code in raw_codes {
            identities.push(LicenseKey::parse(raw_code)?.identity().to_string());
        }
        self.core.issuer.check_uniqueness(&identities).await
    }

    /// Exporta los intentos vivos para el daemon de archivo.
    pub fn attempt_ledger_snapshot(&self, now: DateTime<Utc>) -> Vec<AttemptRecord> {
        self.rate_limiter.export_records(now)
    }

    /// Re-hidrata el libro de intentos desde un archivo previo.
    pub fn seed_attempt_ledger(&self, records: Vec<AttemptRecord>) {
        self.rate_limiter.import_records(records, Utc::now());
    }

    /// Receptor del bus de eventos (consumido por el túnel WebSocket).
    pub fn subscribe_events(&self) -> broadcast::Receiver<EventEnvelope> {
        self.core.event_sender.subscribe()
    }
}

impl ManagerCore {
    /**
     * Fase en vuelo de una activación: huella -> emisor -> compromiso.
     * Corre en tarea desacoplada; una desconexión del llamador no la
     * aborta (el estado del emisor es autoritativo).
     */
    async fn negotiate_and_commit(
        &self,
        key: LicenseKey,
        email: Option<String>,
        force_transfer: bool,
    ) -> Result<ActivationReceipt, LicenseFault> {
        // --- 1. HUELLA DE SILICIO ---
        let fingerprint = host_fingerprint().map_err(|sensor_fault| LicenseFault::Internal {
            detail: format!("FINGERPRINT_FAULT: {sensor_fault}"),
        })?;

        // --- 2. NEGOCIACIÓN CON LA AUTORIDAD ---
        let activation_call = ActivationCall {
            license_key_identity: key.identity().to_string(),
            device_primary_hash: fingerprint.primary_hash.clone(),
            components_snapshot: fingerprint.components.clone(),
            email,
            force_transfer,
        };

        let verdict = self.issuer.activate(&activation_call).await?;
        let now = Utc::now();

        // --- 3. CLASIFICACIÓN Y COMPROMISO ---
        match verdict {
            IssuerVerdict::Activated(grant) => {
                let entitlement = self.forge_entitlement(&key, &grant, 0, now)?;
                self.commit_entitlement(&entitlement)?;

                let status = derive_status(&entitlement, now, false, self.policy.reactivation_cap);
                self.store_status(status, now, false).await;

                info!("🎫 [ACTIVATION_SEALED]: Grant {} bound to this machine.", grant.activation_id);
                Ok(ActivationReceipt {
                    outcome: ActivationOutcome::Activated,
                    message: "License activated and bound to this machine".to_string(),
                    activated_at: entitlement.issued_at,
                    expiry_date: entitlement.expires_at,
                    features: entitlement.features,
                })
            }

            IssuerVerdict::AlreadyActivatedSameDevice => {
                // Re-ejecución idempotente: NO es un error y el crédito
                // de reactivación permanece intacto.
                match self.vault.load() {
                    Ok(mut existing) => {
                        existing.last_validated_at = now;
                        let status =
                            derive_status(&existing, now, false, self.policy.reactivation_cap);
                        existing.last_known_status = status.license_status;

                        if let Err(refresh_fault) = self.vault.save(&existing) {
                            warn!("🗄️ [TOUCH_SKIPPED]: Validation stamp not persisted: {refresh_fault}");
                        }
                        self.store_status(status, now, false).await;

                        Ok(ActivationReceipt {
                            outcome: ActivationOutcome::AlreadyBoundHere,
                            message: "License already active on this machine".to_string(),
                            activated_at: existing.issued_at,
                            expiry_date: existing.expires_at,
                            features: existing.features,
                        })
                    }
                    Err(vault_fault) => Err(LicenseFault::Internal {
                        detail: format!(
                            "SERVER_ACTIVE_LOCAL_VOID: Issuer reports this device bound but local entitlement is unreadable ({vault_fault}); rerun activation"
                        ),
                    }),
                }
            }

            IssuerVerdict::Reactivated {
                grant,
                reactivation_count,
                reactivation_limit,
            } => {
                self.commit_reactivation(&key, grant, reactivation_count, reactivation_limit, now)
                    .await
            }
        }
    }

    /**
     * Compromiso de una reactivación: el conteo más estricto gana y el
     * tope local rige aunque el emisor hubiese concedido más crédito.
     */
    async fn commit_reactivation(
        &self,
        key: &LicenseKey,
        grant: IssuerGrant,
        issuer_count: u32,
        issuer_limit: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ActivationReceipt, LicenseFault> {
        let prior_local_count = self
            .vault
            .load()
            .ok()
            .map(|existing| existing.reactivation_count)
            .unwrap_or(0);

        let effective_count = issuer_count.max(prior_local_count.saturating_add(1));
        let effective_limit = issuer_limit
            .map(|remote_limit| remote_limit.min(self.policy.reactivation_cap))
            .unwrap_or(self.policy.reactivation_cap);

        if effective_count > effective_limit {
            warn!(
                "🎫 [REACTIVATION_VETO]: Local cap enforced ({effective_count}/{effective_limit})."
            );
            return Err(LicenseFault::ReactivationLimitExceeded {
                reactivation_count: effective_count,
                reactivation_limit: effective_limit,
            });
        }

        let entitlement = self.forge_entitlement(key, &grant, effective_count, now)?;
        self.commit_entitlement(&entitlement)?;

        let status = derive_status(&entitlement, now, false, self.policy.reactivation_cap);
        self.store_status(status, now, false).await;

        info!(
            "🎫 [REACTIVATION_SEALED]: Credit {effective_count}/{effective_limit} consumed; new snapshot bound."
        );
        Ok(ActivationReceipt {
            outcome: ActivationOutcome::Reactivated {
                reactivation_count: effective_count,
            },
            message: format!(
                "License reactivated on similar hardware (credit {effective_count} of {effective_limit} used)"
            ),
            activated_at: entitlement.issued_at,
            expiry_date: entitlement.expires_at,
            features: entitlement.features,
        })
    }

    /// Forja el derecho de uso desde el otorgamiento del emisor.
    fn forge_entitlement(
        &self,
        key: &LicenseKey,
        grant: &IssuerGrant,
        reactivation_count: u32,
        now: DateTime<Utc>,
    ) -> Result<Entitlement, LicenseFault> {
        let fingerprint = host_fingerprint().map_err(|sensor_fault| LicenseFault::Internal {
            detail: format!("FINGERPRINT_FAULT: {sensor_fault}"),
        })?;

        let duration = grant
            .duration
            .or_else(|| key.duration_hint())
            .unwrap_or(DurationCode::Scratch);

        let expires_at = compute_expiry(grant.issued_at, duration, self.policy.expiry_slack_days);
        let (state, _) = derive_state(expires_at, now);

        let entitlement = Entitlement {
            license_key: key.canonical().to_string(),
            key_identity: key.identity().to_string(),
            activation_id: grant.activation_id.clone(),
            device_primary_hash: fingerprint.primary_hash,
            device_components_snapshot: fingerprint.components,
            issued_at: grant.issued_at,
            expires_at,
            duration_code: duration,
            features: grant.features.clone(),
            reactivation_count,
            last_validated_at: now,
            last_known_status: state,
        };

        entitlement.assert_invariants()?;
        Ok(entitlement)
    }

    /**
     * Cristaliza el derecho con UN reintento local; el segundo fallo
     * retorna el marcador de persistencia (el emisor YA activó).
     */
    fn commit_entitlement(&self, entitlement: &Entitlement) -> Result<(), LicenseFault> {
        if let Err(first_fault) = self.vault.save(entitlement) {
            warn!("🗄️ [PERSIST_RETRY]: Vault write failed once ({first_fault}); retrying.");
            if let Err(second_fault) = self.vault.save(entitlement) {
                return Err(LicenseFault::Internal {
                    detail: format!(
                        "SERVER_ACTIVATED_LOCAL_PERSIST_FAILED: {second_fault}; subsequent validation may recover by re-pulling"
                    ),
                });
            }
        }
        Ok(())
    }

    /**
     * Revalidación completa: bóveda -> vínculo -> bandas -> toque
     * oportunista al emisor (la activación es el punto de verdad).
     */
    async fn revalidate(&self, now: DateTime<Utc>) -> LicenseStatus {
        // --- 1. LECTURA DE BÓVEDA ---
        let entitlement = match self.vault.load() {
            Ok(entitlement) => entitlement,
            Err(VaultFault::Missing) => {
                let status = LicenseStatus::not_activated();
                self.store_status(status.clone(), now, false).await;
                return status;
            }
            Err(VaultFault::Tampered) | Err(VaultFault::Corrupt { .. }) => {
                warn!("🛡️ [INTEGRITY_BREACH]: Vault failed verification during validation.");
                let status = LicenseStatus {
                    license_status: LicenseState::Invalid,
                    days_left: 0,
                    expiry_date: None,
                    message: "Local entitlement failed integrity verification".to_string(),
                    network_degraded: false,
                    license_info: None,
                };
                self.store_status(status.clone(), now, true).await;
                return status;
            }
            Err(io_class_fault) => {
                let status = LicenseStatus {
                    license_status: LicenseState::Error,
                    days_left: 0,
                    expiry_date: None,
                    message: format!("Entitlement storage unreachable: {io_class_fault}"),
                    network_degraded: false,
                    license_info: None,
                };
                self.store_status(status.clone(), now, false).await;
                return status;
            }
        };

        // --- 2. VÍNCULO DE DISPOSITIVO (PRIMARIO O SIMILITUD) ---
        let fingerprint = match host_fingerprint() {
            Ok(fingerprint) => fingerprint,
            Err(sensor_fault) => {
                let status = LicenseStatus {
                    license_status: LicenseState::Error,
                    days_left: 0,
                    expiry_date: Some(entitlement.expires_at),
                    message: format!("Host identity sensors collapsed: {sensor_fault}"),
                    network_degraded: false,
                    license_info: None,
                };
                self.store_status(status.clone(), now, false).await;
                return status;
            }
        };

        let similarity = similarity_score(
            &entitlement.device_components_snapshot,
            &fingerprint.components,
        );
        let binding_nominal = entitlement.is_primary_match(&fingerprint.primary_hash)
            || (similarity >= self.policy.similarity_threshold
                && entitlement.reactivation_count < self.policy.reactivation_cap);

        if !binding_nominal {
            warn!(
                "🛡️ [BINDING_BREACH]: Similarity {similarity:.2} below threshold {:.2}; entitlement not bound here.",
                self.policy.similarity_threshold
            );
            let status = LicenseStatus {
                license_status: LicenseState::Invalid,
                days_left: 0,
                expiry_date: Some(entitlement.expires_at),
                message: "Entitlement is bound to a different machine".to_string(),
                network_degraded: false,
                license_info: None,
            };
            self.store_status(status.clone(), now, false).await;
            return status;
        }

        // --- 3. BANDAS DERIVADAS (FUENTE DE VERDAD LOCAL) ---
        let mut status = derive_status(&entitlement, now, false, self.policy.reactivation_cap);

        // --- 4. TOQUE OPORTUNISTA AL EMISOR ---
        let revalidation_call = ActivationCall {
            license_key_identity: entitlement.key_identity.clone(),
            device_primary_hash: fingerprint.primary_hash.clone(),
            components_snapshot: fingerprint.components.clone(),
            email: None,
            force_transfer: false,
        };

        match timeout(
            self.policy.validate_deadline,
            self.issuer.activate(&revalidation_call),
        )
        .await
        {
            Ok(Ok(_issuer_verdict)) => {
                let mut refreshed = entitlement.clone();
                refreshed.last_validated_at = now;
                refreshed.last_known_status = status.license_status;
                if let Err(touch_fault) = self.vault.save(&refreshed) {
                    warn!("🗄️ [TOUCH_SKIPPED]: Validation stamp not persisted: {touch_fault}");
                }
                if let Some(info) = status.license_info.as_mut() {
                    info.last_validated_at = now;
                }
            }
            Ok(Err(LicenseFault::Expired)) => {
                // El emisor es autoritativo sobre la expiración.
                status.license_status = LicenseState::Expired;
                status.days_left = 0;
                status.message =
                    "License expired; renew to continue privileged operations".to_string();
            }
            Ok(Err(
                definitive @ (LicenseFault::InvalidKey
                | LicenseFault::AlreadyActivatedDifferentDevice { .. }
                | LicenseFault::ReactivationLimitExceeded { .. }),
            )) => {
                warn!("🎫 [REVALIDATION_DENIAL]: Issuer revoked standing: {definitive}");
                status.license_status = LicenseState::Invalid;
                status.days_left = 0;
                status.message = "Issuer no longer recognizes this binding".to_string();
            }
            Ok(Err(soft_fault)) => {
                // Degradación suave: sin democión del último estado bueno.
                debug!("📡 [REVALIDATION_SOFT]: Issuer untouched ({soft_fault}); serving last known state.");
                status.network_degraded = true;
            }
            Err(_deadline) => {
                debug!("📡 [REVALIDATION_SOFT]: Validation deadline elapsed; serving last known state.");
                status.network_degraded = true;
            }
        }

        self.store_status(status.clone(), now, false).await;
        status
    }

    /**
     * Única escritura del caché; difunde el sobre SOLO ante cambio de
     * banda del semáforo (entrega best-effort, at-most-once).
     */
    async fn store_status(
        &self,
        status: LicenseStatus,
        refreshed_at: DateTime<Utc>,
        integrity_breached: bool,
    ) {
        let state_changed = {
            let mut cache_guard = self.status_cache.write().await;
            let changed = cache_guard
                .snapshot
                .as_ref()
                .map(|previous| previous.license_status != status.license_status)
                .unwrap_or(true);

            cache_guard.snapshot = Some(status.clone());
            cache_guard.refreshed_at = Some(refreshed_at);
            cache_guard.integrity_breached = integrity_breached;
            changed
        };

        if state_changed {
            match self
                .event_sender
                .send(EventEnvelope::license_status(&status, refreshed_at))
            {
                Ok(subscriber_count) => {
                    debug!("📢 [STATUS_BROADCAST]: {} links notified of '{}'.",
                        subscriber_count, status.license_status.as_label());
                }
                Err(_no_subscribers) => {
                    debug!("💤 [STATUS_BROADCAST]: No active links; signal discarded.");
                }
            }
        }
    }

    /**
     * Liberación del vínculo: aviso best-effort y purga incondicional.
     */
    async fn release_binding(&self) -> Result<(), LicenseFault> {
        let now = Utc::now();
        let stored = self.vault.load();
        let mut network_discrepancy: Option<LicenseFault> = None;

        if let Ok(entitlement) = &stored {
            match timeout(
                self.policy.deactivate_deadline,
                self.issuer
                    .deactivate(&entitlement.key_identity, &entitlement.device_primary_hash),
            )
            .await
            {
                Ok(Ok(())) => {
                    info!("🎫 [RELEASE_CONFIRMED]: Issuer acknowledged the unbinding.");
                }
                Ok(Err(LicenseFault::Network { detail })) => {
                    warn!(
                        "📡 [RELEASE_DISCREPANCY]: Issuer unreachable ({detail}); local purge proceeds."
                    );
                    network_discrepancy = Some(LicenseFault::Network { detail });
                }
                Ok(Err(issuer_denial)) => {
                    // NOT_FOUND / BOUND_ELSEWHERE: el estado remoto ya es
                    // consistente con la liberación; la purga local procede.
                    warn!("🎫 [RELEASE_TOLERATED]: Issuer denial absorbed: {issuer_denial}");
                }
                Err(_deadline) => {
                    warn!("📡 [RELEASE_DISCREPANCY]: Deadline elapsed; local purge proceeds.");
                    network_discrepancy = Some(LicenseFault::Network {
                        detail: "DEACTIVATION_DEADLINE_EXCEEDED".to_string(),
                    });
                }
            }
        }

        self.vault.delete().map_err(|purge_fault| LicenseFault::Internal {
            detail: format!("LOCAL_RELEASE_FAULT: {purge_fault}"),
        })?;

        self.store_status(LicenseStatus::not_activated(), now, false).await;

        match network_discrepancy {
            Some(discrepancy) => Err(discrepancy),
            None => Ok(()),
        }
    }
}
// FIN DEL ARCHIVO [libs/domain/licensing/src/manager.rs]
