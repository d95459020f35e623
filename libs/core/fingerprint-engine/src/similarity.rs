// INICIO DEL ARCHIVO [libs/core/fingerprint-engine/src/similarity.rs]
/*!
 * =================================================================
 * APARATO: WEIGHTED SIMILARITY VERDICT (V2.0 - JACCARD PONDERADO)
 * CLASIFICACIÓN: CORE MATH (ESTRATO L1)
 * RESPONSABILIDAD: PUNTUACIÓN DE AFINIDAD ENTRE DOS HUELLAS
 *
 * VISION HIPER-HOLÍSTICA:
 * Un cambio de dock o de disco no debe expulsar a un operador
 * legítimo; una sustitución total de máquina sí. Cada campo aporta su
 * peso cuando coincide exactamente y cero cuando difiere; el resultado
 * se normaliza a [0, 1].
 *
 * # Mathematical Proof (Score Bounds):
 * Σ pesos = 1.0 por construcción (aserción en tests). La suma de
 * aportes está por tanto acotada en [0, 1] sin normalización adicional.
 * =================================================================
 */

use pulse_domain_models::DeviceComponents;

/// Matriz de pesos por campo (etiqueta, peso). El orden es estable.
pub const SIMILARITY_WEIGHTS: [(&str, f64); 7] = [
    ("os_identity", 0.25),
    ("cpu_model", 0.20),
    ("primary_mac", 0.20),
    ("disk_serial", 0.15),
    ("memory_bucket", 0.10),
    ("timezone", 0.05),
    ("language", 0.05),
];

/**
 * Puntúa la afinidad entre la instantánea almacenada y la actual.
 *
 * Dos campos vacíos se consideran coincidentes: un sensor ausente en
 * ambas lecturas no es evidencia de sustitución de máquina.
 */
pub fn similarity_score(stored: &DeviceComponents, current: &DeviceComponents) -> f64 {
    let field_pairs: [(&str, &str, f64); 7] = [
        (&stored.os_identity, &current.os_identity, SIMILARITY_WEIGHTS[0].1),
        (&stored.cpu_model, &current.cpu_model, SIMILARITY_WEIGHTS[1].1),
        (&stored.primary_mac, &current.primary_mac, SIMILARITY_WEIGHTS[2].1),
        (&stored.disk_serial, &current.disk_serial, SIMILARITY_WEIGHTS[3].1),
        (&stored.memory_bucket, &current.memory_bucket, SIMILARITY_WEIGHTS[4].1),
        (&stored.timezone, &current.timezone, SIMILARITY_WEIGHTS[5].1),
        (&stored.language, &current.language, SIMILARITY_WEIGHTS[6].1),
    ];

    let accumulated: f64 = field_pairs
        .iter()
        .filter(|(stored_field, current_field, _)| stored_field == current_field)
        .map(|(_, _, weight)| weight)
        .sum();

    accumulated.clamp(0.0, 1.0)
}

// FIN DEL ARCHIVO [libs/core/fingerprint-engine/src/similarity.rs]
