// INICIO DEL ARCHIVO [libs/core/flow-control/src/ledger.rs]
//! =================================================================
//! APARATO: ATTEMPT LEDGER ARCHIVE (V1.2 - BEST EFFORT)
//! CLASIFICACIÓN: CORE FLOW (ESTRATO L1)
//! RESPONSABILIDAD: PERSISTENCIA BEST-EFFORT DEL LIBRO DE INTENTOS
//! =================================================================

use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::rate_limiter::AttemptRecord;

/// Sufijo de la ruta temporal del reemplazo del archivo.
const TEMP_SUFFIX: &str = ".staging";

/**
 * Archivo JSON del libro de intentos. Toda falla es no-fatal: el
 * limitador funciona íntegro en RAM; el archivo solo evita que un
 * reinicio del proceso borre los contadores de abuso.
 */
pub struct AttemptLedgerArchive {
    archive_path: PathBuf,
}

impl AttemptLedgerArchive {
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
        }
    }

    /**
     * Cristaliza los intentos vivos. Best-effort: el fallo se registra
     * y se descarta, jamás se propaga al flujo de activación.
     */
    pub fn persist(&self, records: &[AttemptRecord]) {
        let serialized = match serde_json::to_vec(records) {
            Ok(bytes) => bytes,
            Err(encode_fault) => {
                warn!("📒 [LEDGER_SKIP]: Attempt trail serialization failed: {encode_fault}");
                return;
            }
        };

        let staging_path = {
            let mut staging = self.archive_path.as_os_str().to_owned();
            staging.push(TEMP_SUFFIX);
            PathBuf::from(staging)
        };

        let write_outcome = fs::write(&staging_path, &serialized)
            .and_then(|()| fs::rename(&staging_path, &self.archive_path));

        match write_outcome {
            Ok(()) => debug!("📒 [LEDGER_FLUSH]: {} live attempts archived.", records.len()),
            Err(io_fault) => {
                warn!("📒 [LEDGER_SKIP]: Archive write failed: {io_fault}. Counters remain in RAM.");
            }
        }
    }

    /**
     * Recupera el archivo previo. Cualquier anomalía entrega un libro
     * vacío: arrancar sin memoria de abuso es preferible a no arrancar.
     */
    pub fn restore(&self) -> Vec<AttemptRecord> {
        match fs::read(&self.archive_path) {
            Ok(raw) => match serde_json::from_slice::<Vec<AttemptRecord>>(&raw) {
                Ok(records) => {
                    debug!("📒 [LEDGER_RESTORE]: {} archived attempts recovered.", records.len());
                    records
                }
                Err(decode_fault) => {
                    warn!("📒 [LEDGER_RESET]: Archive undecodable ({decode_fault}); starting clean.");
                    Vec::new()
                }
            },
            Err(io_fault) if io_fault.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(io_fault) => {
                warn!("📒 [LEDGER_RESET]: Archive unreadable ({io_fault}); starting clean.");
                Vec::new()
            }
        }
    }
}

// FIN DEL ARCHIVO [libs/core/flow-control/src/ledger.rs]
