// INICIO DEL ARCHIVO [libs/domain/models-rs/src/license_key.rs]
/*!
 * =================================================================
 * APARATO: LICENSE KEY DOMAIN MODEL (V3.1 - DUAL FORMAT MASTER)
 * CLASIFICACIÓN: DOMAIN ENTITIES (ESTRATO L2)
 * RESPONSABILIDAD: NORMALIZACIÓN Y VALIDACIÓN SINTÁCTICA DE CLAVES
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. DUAL CITIZENSHIP: Soporta la forma Estándar (ISX + marcador de
 *    duración + cola alfanumérica) y la forma Scratch Card
 *    (ISX-XXXX-XXXX-XXXX-XXXX) bajo una identidad canónica única.
 * 2. FAIL FAST: Toda clave malformada es rechazada localmente sin
 *    tocar jamás la red del emisor.
 * 3. NOMINAL PURITY: La identidad (forma limpia sin separadores) es
 *    la única moneda de comparación en todo el ecosistema.
 *
 * # Mathematical Proof (Canonical Identity):
 * normalize("isx-1m02-lye1-f9qj-hr9d") y normalize("ISX1M02LYE1F9QJHR9D")
 * convergen a la misma identidad, garantizando que el emisor observe
 * una sola clave sin importar la forma de entrada del operador.
 * =================================================================
 */

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::taxonomy::LicenseFault;

/// Prefijo soberano de todas las claves del ecosistema.
const KEY_PREFIX: &str = "ISX";

/// Longitud mínima de la cola alfanumérica de una clave Estándar.
const STANDARD_TAIL_MINIMUM_LENGTH: usize = 14;

/// Cantidad de grupos de una Scratch Card (prefijo incluido).
const SCRATCH_GROUP_COUNT: usize = 5;

/// Longitud exacta de cada grupo alfanumérico de una Scratch Card.
const SCRATCH_GROUP_LENGTH: usize = 4;

/// Forma sintáctica detectada de una clave de licencia.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// `ISX` + marcador de duración + 14 o más alfanuméricos.
    Standard,
    /// `ISX-XXXX-XXXX-XXXX-XXXX` (tarjeta rascable).
    Scratch,
}

/// Código de duración de un otorgamiento de licencia.
#[typeshare]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DurationCode {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    /// Tarjeta rascable sin marcador reconocible; la duración definitiva
    /// la sella el emisor en el eco de activación.
    Scratch,
}

impl DurationCode {
    /**
     * Resuelve los días base del otorgamiento (sin el día de gracia).
     */
    pub fn base_days(&self) -> i64 {
        match self {
            DurationCode::OneMonth => 30,
            DurationCode::ThreeMonths => 90,
            DurationCode::SixMonths => 180,
            DurationCode::OneYear => 365,
            // Las Scratch sin marcador heredan el ciclo mínimo comercial.
            DurationCode::Scratch => 30,
        }
    }

    /**
     * Decodifica el marcador embebido en la clave (`1M`, `3M`, `6M`, `1Y`).
     */
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "1M" => Some(DurationCode::OneMonth),
            "3M" => Some(DurationCode::ThreeMonths),
            "6M" => Some(DurationCode::SixMonths),
            "1Y" => Some(DurationCode::OneYear),
            _ => None,
        }
    }

    /**
     * Decodifica la forma de alambre del emisor (`1m`, `3m`, `6m`, `1y`).
     */
    pub fn from_wire(wire: &str) -> Option<Self> {
        match wire {
            "1m" => Some(DurationCode::OneMonth),
            "3m" => Some(DurationCode::ThreeMonths),
            "6m" => Some(DurationCode::SixMonths),
            "1y" => Some(DurationCode::OneYear),
            "scratch" => Some(DurationCode::Scratch),
            _ => None,
        }
    }

    /// Forma de alambre estable hacia el emisor y el Dashboard.
    pub fn as_wire(&self) -> &'static str {
        match self {
            DurationCode::OneMonth => "1m",
            DurationCode::ThreeMonths => "3m",
            DurationCode::SixMonths => "6m",
            DurationCode::OneYear => "1y",
            DurationCode::Scratch => "scratch",
        }
    }
}

/**
 * Clave de licencia validada y normalizada.
 *
 * Inmutable tras el parseo. La forma canónica preserva los guiones en
 * las Scratch Cards (legibilidad del operador); la identidad es siempre
 * la forma limpia sin separadores.
 */
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LicenseKey {
    canonical: String,
    identity: String,
    format: KeyFormat,
    duration_hint: Option<DurationCode>,
}

impl LicenseKey {
    /**
     * Normaliza y valida una clave cruda introducida por el operador.
     *
     * # Logic:
     * 1. Recorte de espacios y elevación a mayúsculas.
     * 2. Detección Scratch: cinco grupos separados por guion, prefijo ISX,
     *    cuatro alfanuméricos por grupo.
     * 3. En otro caso: remoción de separadores y validación Estándar
     *    (prefijo + marcador de duración + cola de 14+).
     *
     * # Errors:
     * `LicenseFault::InvalidFormat` ante cualquier desviación sintáctica.
     * Este fallo jamás alcanza la red del emisor.
     */
    pub fn parse(raw: &str) -> Result<Self, LicenseFault> {
        let elevated = raw.trim().to_uppercase();

        if elevated.is_empty() {
            return Err(LicenseFault::InvalidFormat {
                detail: "EMPTY_KEY_MATERIAL: No key characters supplied".to_string(),
            });
        }

        // --- ESCENARIO ALFA: FORMA SCRATCH CARD ---
        let groups: Vec<&str> = elevated.split('-').collect();
        if groups.len() == SCRATCH_GROUP_COUNT && groups[0] == KEY_PREFIX {
            let body_is_nominal = groups[1..].iter().all(|group| {
                group.len() == SCRATCH_GROUP_LENGTH
                    && group.chars().all(is_uppercase_alphanumeric)
            });

            if !body_is_nominal {
                return Err(LicenseFault::InvalidFormat {
                    detail: "SCRATCH_GROUP_FAULT: Each group must be 4 uppercase alphanumerics"
                        .to_string(),
                });
            }

            let identity = groups.concat();
            let duration_hint = DurationCode::from_marker(&groups[1][..2]);

            return Ok(Self {
                canonical: groups.join("-"),
                identity,
                format: KeyFormat::Scratch,
                duration_hint,
            });
        }

        // --- ESCENARIO BETA: FORMA ESTÁNDAR (SEPARADORES REMOVIDOS) ---
        let stripped: String = elevated
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let Some(after_prefix) = stripped.strip_prefix(KEY_PREFIX) else {
            return Err(LicenseFault::InvalidFormat {
                detail: "PREFIX_FAULT: Key must start with the ISX sovereign prefix".to_string(),
            });
        };

        if after_prefix.len() < 2 {
            return Err(LicenseFault::InvalidFormat {
                detail: "TRUNCATED_KEY: Duration marker missing after prefix".to_string(),
            });
        }

        let (marker, tail) = after_prefix.split_at(2);
        let Some(duration) = DurationCode::from_marker(marker) else {
            return Err(LicenseFault::InvalidFormat {
                detail: format!("DURATION_MARKER_FAULT: Unknown marker '{marker}'"),
            });
        };

        if tail.len() < STANDARD_TAIL_MINIMUM_LENGTH {
            return Err(LicenseFault::InvalidFormat {
                detail: format!(
                    "TAIL_LENGTH_FAULT: Standard keys require {STANDARD_TAIL_MINIMUM_LENGTH}+ trailing alphanumerics"
                ),
            });
        }

        Ok(Self {
            canonical: stripped.clone(),
            identity: stripped,
            format: KeyFormat::Standard,
            duration_hint: Some(duration),
        })
    }

    /// Forma canónica (con guiones en Scratch Cards).
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Identidad limpia sin separadores; moneda única de comparación.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn format(&self) -> KeyFormat {
        self.format
    }

    /**
     * Pista de duración extraída de la propia clave.
     * `None` en Scratch Cards sin marcador; el emisor decide entonces.
     */
    pub fn duration_hint(&self) -> Option<DurationCode> {
        self.duration_hint
    }
}

/// Alfabeto nominal de una clave: dígitos y mayúsculas ASCII.
fn is_uppercase_alphanumeric(character: char) -> bool {
    character.is_ascii_digit() || character.is_ascii_uppercase()
}

// FIN DEL ARCHIVO [libs/domain/models-rs/src/license_key.rs]
