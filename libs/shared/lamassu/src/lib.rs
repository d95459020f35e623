// [libs/shared/lamassu/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LAMASSU THRESHOLD OBSERVER (V2.1 - GOLD MASTER)
 * CLASIFICACIÓN: SHARED UTILITY (ESTRATO L4/L6)
 * RESPONSABILIDAD: GESTIÓN DE TELEMETRÍA, TRAZADO Y CAPTURA DE PÁNICOS
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. DUAL MODE: Logs interactivos de alta legibilidad en desarrollo;
 *    tramas JSON planas en producción para la ingesta del Panóptico.
 * 2. THRESHOLD SHIELD: Hook de pánico global con coordenadas de
 *    estrato y volcado forense del payload.
 * 3. NOISE CONTROL: Silenciamiento nominal de infraestructura
 *    (Tower, Hyper) priorizando los logs del dominio.
 * =================================================================
 */

use std::panic;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/**
 * Inicializa el sistema de trazas con blindaje de pánicos soberano.
 *
 * # Comportamiento:
 * - Desarrollo: logs compactos con resaltado para el Arquitecto.
 * - Producción: estructura JSON plana para la ingesta del Panóptico.
 *
 * # Errors:
 * Pánico si otro suscriptor global ya fue inicializado en el runtime.
 */
pub fn init_tracing(service_nominal_identifier: &str) {
    // 1. CONFIGURACIÓN DEL FILTRO DINÁMICO
    // Priorizamos los logs del dominio y silenciamos ruido de infraestructura.
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{}={level},tower_http=warn,hyper=warn,rustls=warn",
            service_nominal_identifier,
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    let is_production_strata = !cfg!(debug_assertions);

    // 2. CONSTRUCCIÓN DE LA ARQUITECTURA DE SUSCRIPCIÓN (Dual Mode)
    if is_production_strata {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    }

    // 3. ESCUDO DEL UMBRAL (Global Panic Hook)
    // Garantiza que cualquier colapso en hilos secundarios sea capturado
    // y registrado antes de la defunción del proceso.
    let service_id_snapshot = service_nominal_identifier.to_string();

    panic::set_hook(Box::new(move |panic_metadata| {
        let panic_location = panic_metadata
            .location()
            .map(|location| format!("{}:{}:{}", location.file(), location.line(), location.column()))
            .unwrap_or_else(|| "UNKNOWN_STRATA_COORDINATES".to_string());

        let panic_payload_message = panic_metadata
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_metadata
                    .payload()
                    .downcast_ref::<String>()
                    .map(|owned| owned.as_str())
            })
            .unwrap_or("UNDEFINED_KERNEL_COLLAPSE_PAYLOAD");

        error!(
            target: "panic_monitor",
            service = %service_id_snapshot,
            estrato = %panic_location,
            "🔥 [CRITICAL_PANIC]: Thread terminated abruptly. Analysis: {}",
            panic_payload_message
        );
    }));

    info!(
        "🦁 [LAMASSU_ONLINE]: Observability strata levelized for [{}]. Threshold Shield ACTIVE.",
        service_nominal_identifier
    );
}
