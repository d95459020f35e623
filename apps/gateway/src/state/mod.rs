// [apps/gateway/src/state/mod.rs]
/*!
 * =================================================================
 * APARATO: GATEWAY STATE ORCHESTRATOR (V4.1 - SINGULARITY)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L1-APP)
 * RESPONSABILIDAD: ORQUESTACIÓN DE MANAGER, BUS Y MODO OPERATIVO
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. COMPOSITION ROOT: La placa base donde se conectan el corazón de
 *    licenciamiento, el bus de eventos y la configuración congelada.
 * 2. NO SINGLETONS: Una instancia por proceso, creada en el arranque
 *    y derribada con el proceso; todo colaborador llega inyectado.
 * =================================================================
 */

use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

use pulse_domain_licensing::LicenseManager;

use crate::bootstrap::GatewaySettings;
use crate::services::event_bus::EventBus;

/// Modos de salud del sistema para la interceptación perimetral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMode {
    /// El gateway procesa ráfagas de licenciamiento de forma nominal.
    Operational,
    /// Despacho suspendido por mantenimiento o mando del operador.
    Maintenance(String),
}

/**
 * Contenedor de estado compartido (Thread-Safe) del gateway.
 */
#[derive(Clone)]
pub struct AppState {
    /// Corazón del subsistema: máquina de estados de licenciamiento.
    pub license_manager: Arc<LicenseManager>,
    /// Bus de difusión de cambios de estado hacia el Dashboard.
    pub event_bus: Arc<EventBus>,
    /// Estado de liveness para guardias perimetrales de la API.
    pub current_system_mode: Arc<RwLock<SystemMode>>,
    /// Configuración congelada del arranque.
    pub settings: Arc<GatewaySettings>,
}

impl AppState {
    pub fn new(
        license_manager: Arc<LicenseManager>,
        event_bus: Arc<EventBus>,
        settings: Arc<GatewaySettings>,
    ) -> Self {
        Self {
            license_manager,
            event_bus,
            current_system_mode: Arc::new(RwLock::new(SystemMode::Operational)),
            settings,
        }
    }

    /**
     * Sincroniza el modo operativo para el control de acceso.
     */
    pub fn set_mode(&self, target_system_mode: SystemMode) {
        match self.current_system_mode.write() {
            Ok(mut mode_guard) => {
                info!("🔄 [STATE_SHIFT]: Gateway transitioning to mode: {:?}", target_system_mode);
                *mode_guard = target_system_mode;
            }
            Err(lock_poison_fault) => {
                error!("💀 [KERNEL_CRASH]: System mode lock poisoned: {}", lock_poison_fault);
            }
        }
    }

    /**
     * Evalúa la capacidad operativa ante ráfagas HTTP entrantes.
     */
    pub fn is_operational(&self) -> Result<(), String> {
        let mode_guard = self
            .current_system_mode
            .read()
            .map_err(|poison_fault| format!("LOCK_POISON_FAULT: {poison_fault}"))?;

        match &*mode_guard {
            SystemMode::Operational => Ok(()),
            SystemMode::Maintenance(rejection_reason) => {
                warn!("⛔ [ACCESS_DENIED]: Maintenance active: {}", rejection_reason);
                Err(rejection_reason.clone())
            }
        }
    }
}
