// [apps/gateway/src/services/event_bus.rs]
/*!
 * =================================================================
 * APARATO: LICENSE EVENT BUS SERVICE (V3.0 - NEURAL BROADCASTER)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: DIFUSIÓN SOBERANA DE CAMBIOS DE ESTADO DE LICENCIA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. AT-MOST-ONCE: Entrega best-effort; los clientes se recuperan de
 *    pérdidas consultando `/api/license/status` al reconectar.
 * 2. BOUNDED BACKPRESSURE: Cola acotada por suscriptor; los enlaces
 *    lentos observan descartes y son desconectados tras la gracia.
 *
 * # Mathematical Proof (Signal Propagation):
 * El despacho es O(1) respecto al número de receptores; la pérdida de
 * un suscriptor no afecta el determinismo del reactor principal.
 * =================================================================
 */

use tokio::sync::broadcast;
use tracing::debug;

use pulse_domain_models::EventEnvelope;

/// Cola acotada por suscriptor: 32 tramas antes del descarte.
pub const SUBSCRIBER_QUEUE_CAPACITY: usize = 32;

/**
 * Orquestador central de señales de licencia en tiempo real.
 */
#[derive(Debug)]
pub struct EventBus {
    internal_transmission_channel: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_QUEUE_CAPACITY);
        Self {
            internal_transmission_channel: sender,
        }
    }

    /// Emisor inyectado al LicenseManager en la ignición del Kernel.
    pub fn sender(&self) -> broadcast::Sender<EventEnvelope> {
        self.internal_transmission_channel.clone()
    }

    /**
     * Genera un nuevo receptor para el túnel WebSocket.
     *
     * # Performance:
     * El coste de suscripción es despreciable; el motor de Tokio
     * rutea punteros evitando copias de datos pesados.
     */
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        debug!("📡 [EVENT_BUS]: New neural link subscribed.");
        self.internal_transmission_channel.subscribe()
    }

    /// Enlaces activos en este instante (telemetría de diagnóstico).
    pub fn active_link_count(&self) -> usize {
        self.internal_transmission_channel.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
