// [apps/gateway/src/main.rs]
/*!
 * =================================================================
 * APARATO: GATEWAY MAIN ENTRY POINT (V4.0 - GOLD MASTER)
 * CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * # Mathematical Proof (Deterministic Ignition):
 * La huella de silicio y la bóveda se forjan ANTES de la apertura del
 * socket TCP, previniendo estados de carrera donde una ráfaga HTTP
 * consulte un corazón aún no cristalizado.
 * =================================================================
 */

use pulse_license_gateway::prelude::*;

use dotenvy::dotenv;
use pulse_shared_lamassu::init_tracing;
use tracing::{error, info};

/**
 * Punto de ignición supremo del binario del License Gateway.
 */
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. CARGA DE ENTORNO SOBERANO
    // Hidrata las variables de .env en el espacio de nombres del proceso.
    dotenv().ok();

    // 2. INICIALIZACIÓN DE OBSERVABILIDAD (LAMASSU)
    init_tracing("pulse_license_gateway");

    // 3. CONFIGURACIÓN DEL RUNTIME SOBERANO
    let runtime_gateway = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime_gateway.block_on(async {
        info!("🛰️  [LICENSE_GATEWAY]: Global ignition sequence starting...");

        // 4. ADQUISICIÓN DE COORDENADAS TÁCTICAS
        let settings = GatewaySettings::acquire_from_environment();

        // 5. CONSTRUCCIÓN DEL KERNEL SOBERANO
        let kernel_instance = match GatewayKernel::ignite(settings) {
            Ok(kernel) => kernel,
            Err(ignition_fault) => {
                error!("❌ [IGNITION_FAILED]: Kernel construction collapsed: {ignition_fault}");
                std::process::exit(1);
            }
        };

        // 6. IGNICIÓN DE OPERACIONES
        info!(
            "🚀 [GATEWAY_ONLINE]: System fully operational on port {}.",
            kernel_instance.server_network_port
        );
        kernel_instance.launch_gateway_operations().await;

        Ok(())
    })
}
