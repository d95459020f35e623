// INICIO DEL ARCHIVO [libs/core/flow-control/src/single_flight.rs]
/*!
 * =================================================================
 * APARATO: KEYED SINGLE FLIGHT ENGINE (V2.2 - DETACHED COMMIT)
 * CLASIFICACIÓN: CORE FLOW (ESTRATO L1)
 * RESPONSABILIDAD: UNA EJECUCIÓN EN VUELO POR CLAVE, DESENLACE COMPARTIDO
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. WINNER TAKES FLIGHT: El primer llamador de una clave ejecuta la
 *    operación; los seguidores esperan y reciben un clon del desenlace
 *    sin disparar trabajo duplicado.
 * 2. DETACHED COMMIT: El ganador corre en una tarea desacoplada del
 *    llamador; si el llamador abandona (desconexión HTTP), el trabajo
 *    en vuelo concluye y sella su resultado de todas formas.
 * 3. FRESH FLIGHT GUARANTEE: La entrada se retira del registro ANTES
 *    de anunciar el desenlace; un llamador tardío inicia vuelo nuevo
 *    en lugar de colgarse de un canal ya drenado.
 *
 * # Mathematical Proof (Deduplication):
 * Para N llegadas concurrentes de la misma clave, el registro admite
 * exactamente una inserción bajo el cerrojo; las N-1 restantes solo
 * se suscriben. El colaborador remoto observa UNA llamada.
 * =================================================================
 */

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, error};

/**
 * Mutex de nivel de clave con difusión del desenlace del ganador.
 */
pub struct KeyedSingleFlight<T: Clone + Send + 'static> {
    in_flight_registry: Arc<Mutex<HashMap<String, broadcast::Sender<T>>>>,
}

impl<T: Clone + Send + 'static> Default for KeyedSingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> KeyedSingleFlight<T> {
    pub fn new() -> Self {
        Self {
            in_flight_registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /**
     * Ejecuta `operation` si no existe vuelo activo para `key`; en caso
     * contrario espera el desenlace del ganador.
     *
     * # Errors:
     * `None` únicamente si la tarea ganadora colapsó (pánico) antes de
     * anunciar; el llamador debe tratarlo como fallo interno.
     */
    pub async fn run<MakeFlight, Flight>(&self, key: &str, operation: MakeFlight) -> Option<T>
    where
        MakeFlight: FnOnce() -> Flight,
        Flight: Future<Output = T> + Send + 'static,
    {
        let mut outcome_receiver = {
            let mut registry_guard = self
                .in_flight_registry
                .lock()
                .expect("FLIGHT_REGISTRY_POISONED");

            if let Some(active_flight) = registry_guard.get(key) {
                debug!("🛫 [SINGLE_FLIGHT]: Follower joined active flight for key scope.");
                active_flight.subscribe()
            } else {
                let (outcome_sender, outcome_receiver) = broadcast::channel::<T>(1);
                registry_guard.insert(key.to_string(), outcome_sender.clone());

                let registry_reference = Arc::clone(&self.in_flight_registry);
                let key_owned = key.to_string();
                let flight = operation();

                // El vuelo se desacopla del llamador: una desconexión del
                // cliente HTTP no aborta el trabajo ya negociado.
                tokio::spawn(async move {
                    let outcome = flight.await;

                    // Retiro ANTES del anuncio: un llamador tardío abre
                    // vuelo fresco en lugar de perder el valor.
                    registry_reference
                        .lock()
                        .expect("FLIGHT_REGISTRY_POISONED")
                        .remove(&key_owned);

                    let _ = outcome_sender.send(outcome);
                });

                outcome_receiver
            }
        };

        match outcome_receiver.recv().await {
            Ok(outcome) => Some(outcome),
            Err(_channel_collapse) => {
                error!("💀 [SINGLE_FLIGHT_FAULT]: Winner task collapsed before announcing outcome.");
                None
            }
        }
    }
}
// FIN DEL ARCHIVO [libs/core/flow-control/src/single_flight.rs]
