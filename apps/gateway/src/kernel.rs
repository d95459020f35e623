// INICIO DEL ARCHIVO [apps/gateway/src/kernel.rs]
/**
 * =================================================================
 * APARATO: GATEWAY SOVEREIGN KERNEL (V4.2 - GUARD ACTIVE)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * VISION HIPER-HOLÍSTICA:
 * Actúa como la placa base donde se conectan todos los servicios:
 * huella -> bóveda -> emisor -> corazón -> bus -> fachada. La huella
 * se computa ANTES de forjar la bóveda: la llave AEAD depende de ella.
 * =================================================================
 */

use crate::bootstrap::GatewaySettings;
use crate::routes::create_gateway_router;
use crate::services::{spawn_ledger_flush_daemon, spawn_revalidation_daemon, EventBus};
use crate::state::AppState;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info, instrument};

use pulse_core_fingerprint::host_fingerprint;
use pulse_core_flow::AttemptLedgerArchive;
use pulse_core_vault::EntitlementVault;
use pulse_domain_licensing::LicenseManager;
use pulse_infra_issuer::IssuerClient;

pub struct GatewayKernel {
    pub server_network_port: u16,
    pub application_shared_state: AppState,
}

impl GatewayKernel {
    /**
     * Realiza la ignición de la huella, la bóveda y el corazón.
     *
     * # Errors:
     * Colapso de sensores de huella o configuración de emisor
     * malformada abortan la ignición: sin huella no hay vínculo.
     */
    #[instrument(skip(settings))]
    pub fn ignite(settings: Arc<GatewaySettings>) -> anyhow::Result<Self> {
        // --- 1. HUELLA DE SILICIO (PRIMERO: ANCLA DE LA BÓVEDA) ---
        let fingerprint = host_fingerprint()?;
        if fingerprint.reduced_entropy {
            info!("🧬 [KERNEL_NOTICE]: Fingerprint operating with reduced sensor coverage.");
        }

        // --- 2. BÓVEDA ANCLADA A ESTA MÁQUINA ---
        let vault = EntitlementVault::new(
            settings.entitlement_path.clone(),
            fingerprint.primary_hash.clone(),
        );

        // --- 3. ENLACE CON LA AUTORIDAD EMISORA ---
        let issuer_client = Arc::new(IssuerClient::ignite(&settings.issuer)?);

        // --- 4. BUS DE EVENTOS Y CORAZÓN DE LICENCIAMIENTO ---
        let event_bus = Arc::new(EventBus::new());
        let license_manager = Arc::new(LicenseManager::new(
            vault,
            issuer_client,
            settings.policy.clone(),
            event_bus.sender(),
        ));

        // --- 5. RE-HIDRATACIÓN DEL LIBRO DE INTENTOS ---
        let ledger_archive = AttemptLedgerArchive::new(settings.attempt_ledger_path.clone());
        license_manager.seed_attempt_ledger(ledger_archive.restore());

        Ok(Self {
            server_network_port: settings.listening_port,
            application_shared_state: AppState::new(license_manager, event_bus, settings),
        })
    }

    /**
     * Lanza los daemons de fondo y el servidor HTTP principal.
     */
    pub async fn launch_gateway_operations(self) {
        let shared_application_state = self.application_shared_state.clone();

        // --- 1. DAEMONS DE MANTENIMIENTO TÁCTICO ---

        // A. Marcapasos de revalidación (calendario propio, pull)
        spawn_revalidation_daemon(shared_application_state.clone()).await;

        // B. Archivo diferido del libro de intentos (write-behind)
        spawn_ledger_flush_daemon(shared_application_state.clone()).await;

        // --- 2. IGNICIÓN DEL TRANSPORTE HTTP (AXUM) ---
        let gateway_router = create_gateway_router(shared_application_state);

        let bind_address = SocketAddr::new(
            "0.0.0.0".parse::<IpAddr>().expect("CRITICAL: Static bind address malformed."),
            self.server_network_port,
        );

        info!("🚀 [KERNEL_ONLINE]: License Gateway listening at {}", bind_address);

        let tcp_listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .expect("CRITICAL_FAULT: Failed to bind network port.");

        if let Err(server_error) = axum::serve(
            tcp_listener,
            gateway_router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            error!("💀 [KERNEL_COLLAPSE]: Runtime failure: {}", server_error);
            std::process::exit(1);
        }
    }
}
// FIN DEL ARCHIVO [apps/gateway/src/kernel.rs]
