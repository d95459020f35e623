// [apps/gateway/src/lib.rs]
/*!
 * =================================================================
 * APARATO: GATEWAY LIBRARY ROOT (V4.0 - SOVEREIGN AUTHORITY)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN SUPREMA DEL ÁRBOL DE MÓDULOS
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. MODULE HIERARCHY: Autoridad única de módulos; 'crate::' resuelve
 *    de forma determinista en la librería y en el binario.
 * 2. PUBLIC INTERFACE: Expone 'prelude' para la ignición mínima del
 *    Kernel desde 'main.rs' y desde el Proving Grounds.
 * =================================================================
 */

// --- ESTRATO DE INFRAESTRUCTURA Y ARRANQUE ---
/// Adquisición de configuración desde el entorno con nominales de fábrica.
pub mod bootstrap;
/// Núcleo de mando para la ignición de servicios y el servidor HTTP.
pub mod kernel;

// --- ESTRATO DE DATOS Y ESTADO ---
/// Gestor del estado compartido del gateway.
pub mod state;

// --- ESTRATO DE TRANSPORTE Y ACCIÓN ---
/// Adaptadores de entrada para ráfagas HTTP y WebSockets.
pub mod handlers;
/// Topología de rutas del túnel de mando.
pub mod routes;

// --- ESTRATO DE SEGURIDAD Y SOPORTE ---
/// Guardianes perimetrales de salud y rastro.
pub mod middleware;
/// Documentos de problema RFC 7807 con URIs de tipo estables.
pub mod problem;
/// Daemons de fondo y bus de eventos en tiempo real.
pub mod services;

/**
 * PRELUDIO DEL GATEWAY
 *
 * Re-exportación estratégica de los componentes de ignición mínima.
 */
pub mod prelude {
    pub use crate::bootstrap::GatewaySettings;
    pub use crate::kernel::GatewayKernel;
    pub use crate::state::{AppState, SystemMode};
}
