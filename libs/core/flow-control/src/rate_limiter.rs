// INICIO DEL ARCHIVO [libs/core/flow-control/src/rate_limiter.rs]
/*!
 * =================================================================
 * APARATO: SLIDING WINDOW RATE LIMITER (V2.1 - ABUSE SHIELD)
 * CLASIFICACIÓN: CORE FLOW (ESTRATO L1)
 * RESPONSABILIDAD: TOPE DE INTENTOS POR (CLAVE, CLIENTE) EN VENTANA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. PRECONDITION SHIELD: El cargo ocurre ANTES de tocar al emisor;
 *    un rechazo transporta 'reset_at' para el contador regresivo de UI.
 * 2. NO REFUNDS: Los intentos son el recurso escaso; un fallo del
 *    emisor no devuelve el cargo.
 * 3. EXPORT DISCIPLINE: El libro interno se exporta/importa para la
 *    persistencia best-effort entre reinicios.
 * =================================================================
 */

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Ámbito de cargo del limitador: una clave vista por un cliente.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptScope {
    pub key_identity: String,
    pub client_identity: String,
}

/// Registro exportable de un intento para el archivo best-effort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttemptRecord {
    pub key_identity: String,
    pub client_identity: String,
    pub timestamp: DateTime<Utc>,
}

/// Rechazo del limitador con la coordenada de reapertura de ventana.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitRejection {
    pub reset_at: DateTime<Utc>,
}

/**
 * Contador de ventana deslizante sincronizado internamente.
 */
pub struct SlidingWindowRateLimiter {
    window: Duration,
    attempt_cap: usize,
    ledger: Mutex<HashMap<AttemptScope, VecDeque<DateTime<Utc>>>>,
}

impl SlidingWindowRateLimiter {
    /**
     * Forja el limitador con ventana y tope configurables.
     * Nominal de fábrica: 10 intentos por (clave, cliente) cada 5 minutos.
     */
    pub fn new(window_seconds: i64, attempt_cap: usize) -> Self {
        Self {
            window: Duration::seconds(window_seconds.max(1)),
            attempt_cap: attempt_cap.max(1),
            ledger: Mutex::new(HashMap::new()),
        }
    }

    /**
     * Cobra un intento en el instante actual.
     */
    pub fn charge(&self, scope: AttemptScope) -> Result<(), RateLimitRejection> {
        self.charge_at(scope, Utc::now())
    }

    /**
     * Cobra un intento en un instante explícito (determinismo de pruebas).
     *
     * # Errors:
     * `RateLimitRejection` cuando la ventana ya contiene 'attempt_cap'
     * intentos vivos; transporta el instante exacto de reapertura.
     */
    pub fn charge_at(
        &self,
        scope: AttemptScope,
        now: DateTime<Utc>,
    ) -> Result<(), RateLimitRejection> {
        let mut ledger_guard = self.ledger.lock().expect("RATE_LEDGER_POISONED");
        let window_floor = now - self.window;

        let attempt_trail = ledger_guard.entry(scope.clone()).or_default();

        // Purga de intentos fuera de la ventana viva.
        while let Some(oldest) = attempt_trail.front() {
            if *oldest <= window_floor {
                attempt_trail.pop_front();
            } else {
                break;
            }
        }

        if attempt_trail.len() >= self.attempt_cap {
            let reset_at = attempt_trail
                .front()
                .map(|oldest| *oldest + self.window)
                .unwrap_or(now);

            warn!(
                "🚦 [RATE_SHIELD]: Scope ({}, {}) saturated. Window reopens at {}.",
                scope.key_identity, scope.client_identity, reset_at
            );
            return Err(RateLimitRejection { reset_at });
        }

        attempt_trail.push_back(now);
        debug!(
            "🚦 [RATE_CHARGE]: Attempt {}/{} for scope ({}, {}).",
            attempt_trail.len(),
            self.attempt_cap,
            scope.key_identity,
            scope.client_identity
        );
        Ok(())
    }

    /**
     * Exporta los intentos vivos para el archivo best-effort.
     * Los ámbitos ya drenados se retiran del mapa en el mismo paso.
     */
    pub fn export_records(&self, now: DateTime<Utc>) -> Vec<AttemptRecord> {
        let mut ledger_guard = self.ledger.lock().expect("RATE_LEDGER_POISONED");
        let window_floor = now - self.window;

        let mut records = Vec::new();
        ledger_guard.retain(|scope, attempt_trail| {
            attempt_trail.retain(|stamp| *stamp > window_floor);
            for stamp in attempt_trail.iter() {
                records.push(AttemptRecord {
                    key_identity: scope.key_identity.clone(),
                    client_identity: scope.client_identity.clone(),
                    timestamp: *stamp,
                });
            }
            !attempt_trail.is_empty()
        });

        records
    }

    /**
     * Re-hidrata el libro desde un archivo previo, descartando lo caduco.
     */
    pub fn import_records(&self, records: Vec<AttemptRecord>, now: DateTime<Utc>) {
        let mut ledger_guard = self.ledger.lock().expect("RATE_LEDGER_POISONED");
        let window_floor = now - self.window;

        let mut imported_count = 0usize;
        for record in records {
            if record.timestamp <= window_floor {
                continue;
            }
            let scope = AttemptScope {
                key_identity: record.key_identity,
                client_identity: record.client_identity,
            };
            let attempt_trail = ledger_guard.entry(scope).or_default();
            // Inserción ordenada: el archivo puede llegar desordenado.
            let position = attempt_trail.partition_point(|stamp| *stamp <= record.timestamp);
            attempt_trail.insert(position, record.timestamp);
            imported_count += 1;
        }

        if imported_count > 0 {
            debug!("🚦 [RATE_RESTORE]: {} live attempts re-hydrated.", imported_count);
        }
    }
}

// FIN DEL ARCHIVO [libs/core/flow-control/src/rate_limiter.rs]
