// [apps/gateway/src/handlers/mod.rs]
/*!
 * =================================================================
 * APARATO: HANDLER ORCHESTRATION HUB (V4.0 - COMPLETE MATRIX)
 * CLASIFICACIÓN: APPLICATION ADAPTERS (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE PUNTOS DE ENTRADA
 *
 * # Topología de Módulos:
 * - activation: Activación, transferencia, liberación y unicidad.
 * - status:     Semáforo, vista detallada y veredicto de renovación.
 * - stream:     Túnel de tiempo real (WebSocket).
 * =================================================================
 */

pub mod activation;
pub mod status;
pub mod stream;
