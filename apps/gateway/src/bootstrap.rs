// [apps/gateway/src/bootstrap.rs]
/*!
 * =================================================================
 * APARATO: ENVIRONMENT BOOTSTRAP ENGINE (V2.1 - DEFAULTED MATRIX)
 * CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
 * RESPONSABILIDAD: ADQUISICIÓN DE CONFIGURACIÓN CON NOMINALES
 *
 * VISION HIPER-HOLÍSTICA:
 * Toda opción reconocida posee un nominal de fábrica; el gateway
 * arranca sin un solo ajuste de entorno. Las desviaciones se
 * registran para el rastro forense del operador.
 * =================================================================
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use pulse_domain_licensing::LicensingPolicy;
use pulse_infra_issuer::IssuerClientConfig;

/// Configuración completa del gateway, congelada tras el arranque.
#[derive(Debug)]
pub struct GatewaySettings {
    pub listening_port: u16,
    pub issuer: IssuerClientConfig,
    pub policy: LicensingPolicy,
    pub entitlement_path: PathBuf,
    pub attempt_ledger_path: PathBuf,
    pub revalidation_interval: Duration,
}

impl GatewaySettings {
    /**
     * Hidrata la configuración desde el entorno del proceso.
     */
    pub fn acquire_from_environment() -> Arc<Self> {
        let policy_defaults = LicensingPolicy::default();
        let issuer_defaults = IssuerClientConfig::default();

        let policy = LicensingPolicy {
            similarity_threshold: read_f64(
                "REACTIVATION_SIMILARITY_THRESHOLD",
                policy_defaults.similarity_threshold,
            ),
            reactivation_cap: read_u64("REACTIVATION_CAP", u64::from(policy_defaults.reactivation_cap))
                as u32,
            cache_ttl: Duration::from_secs(read_u64(
                "CACHE_TTL_SECONDS",
                policy_defaults.cache_ttl.as_secs(),
            )),
            rate_limit_window_seconds: read_u64(
                "RATE_LIMIT_WINDOW_SECONDS",
                policy_defaults.rate_limit_window_seconds as u64,
            ) as i64,
            rate_limit_max_attempts: read_u64(
                "RATE_LIMIT_MAX_ATTEMPTS",
                policy_defaults.rate_limit_max_attempts as u64,
            ) as usize,
            ..policy_defaults
        };

        let issuer = IssuerClientConfig {
            base_url: std::env::var("ISSUER_BASE_URL").unwrap_or(issuer_defaults.base_url),
            per_attempt_timeout: Duration::from_secs(read_u64(
                "ISSUER_TIMEOUT_PER_ATTEMPT_SECONDS",
                issuer_defaults.per_attempt_timeout.as_secs(),
            )),
            total_deadline: Duration::from_secs(read_u64(
                "ISSUER_TOTAL_DEADLINE_SECONDS",
                issuer_defaults.total_deadline.as_secs(),
            )),
            pinned_roots_pem: std::env::var("ISSUER_PINNED_ROOTS_PEM").ok().map(PathBuf::from),
        };

        let data_directory = default_data_directory();
        let settings = Self {
            listening_port: read_u64("PORT", 3000) as u16,
            issuer,
            policy,
            entitlement_path: std::env::var("ENTITLEMENT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_directory.join("entitlement.bin")),
            attempt_ledger_path: std::env::var("ATTEMPT_LEDGER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_directory.join("attempts.json")),
            revalidation_interval: Duration::from_secs(read_u64(
                "REVALIDATION_INTERVAL_SECONDS",
                3600,
            )),
        };

        info!(
            "⚙️ [BOOTSTRAP]: Settings crystallized (port={}, issuer={}, vault={}).",
            settings.listening_port,
            settings.issuer.base_url,
            settings.entitlement_path.display()
        );
        Arc::new(settings)
    }
}

/// Ruta de datos apropiada al sistema operativo del host.
fn default_data_directory() -> PathBuf {
    if let Ok(home_directory) = std::env::var("HOME") {
        return PathBuf::from(home_directory).join(".local/share/isx-pulse");
    }
    if let Ok(roaming_directory) = std::env::var("APPDATA") {
        return PathBuf::from(roaming_directory).join("isx-pulse");
    }
    PathBuf::from("./isx-pulse-data")
}

fn read_u64(variable_name: &str, nominal: u64) -> u64 {
    match std::env::var(variable_name) {
        Ok(raw_value) => raw_value.parse().unwrap_or_else(|_| {
            warn!("⚙️ [BOOTSTRAP_DRIFT]: {variable_name}='{raw_value}' unparseable; nominal {nominal} applied.");
            nominal
        }),
        Err(_) => nominal,
    }
}

fn read_f64(variable_name: &str, nominal: f64) -> f64 {
    match std::env::var(variable_name) {
        Ok(raw_value) => raw_value.parse().unwrap_or_else(|_| {
            warn!("⚙️ [BOOTSTRAP_DRIFT]: {variable_name}='{raw_value}' unparseable; nominal {nominal} applied.");
            nominal
        }),
        Err(_) => nominal,
    }
}
