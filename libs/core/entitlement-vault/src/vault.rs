// INICIO DEL ARCHIVO [libs/core/entitlement-vault/src/vault.rs]
/*!
 * =================================================================
 * APARATO: ENTITLEMENT VAULT ENGINE (V3.2 - ATOMIC REPLACE MASTER)
 * CLASIFICACIÓN: CORE SECURITY (ESTRATO L1)
 * RESPONSABILIDAD: PERSISTENCIA CIFRADA Y VINCULADA DEL DERECHO DE USO
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. MACHINE BINDING: La llave AEAD se deriva de la huella primaria
 *    del host; esta capa es el primer cinturón de vinculación, por
 *    debajo del LicenseManager.
 * 2. ATOMIC REPLACE: Escritura a ruta temporal + fsync + rename. Los
 *    lectores concurrentes observan la versión previa hasta el rename.
 * 3. FAIL CLOSED: Leer en una máquina ajena produce Tampered, jamás
 *    texto plano obsoleto.
 *
 * # Mathematical Proof (Load ∘ Save):
 * Para todo derecho 'e' sellado en esta máquina, Load(Save(e)) = e;
 * en cualquier otra máquina, Load falla con Tampered porque la llave
 * derivada diverge y el tag GCM no verifica.
 * =================================================================
 */

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use pulse_domain_models::Entitlement;

use crate::framing::{compose_frame, decode_frame, NONCE_LENGTH, VAULT_SCHEMA_VERSION};

/// Iteraciones PBKDF2-HMAC-SHA256 de la derivación de llave.
const KEY_DERIVATION_ITERATIONS: u32 = 150_000;

/// Longitud de la llave AES-256 derivada.
const KEY_LENGTH_BYTES: usize = 32;

/// Sal estática de dominio; versionada junto al esquema del archivo.
const KEY_DERIVATION_SALT: &str = "isx_pulse_entitlement_v1";

/// Sufijo de la ruta temporal del protocolo de reemplazo atómico.
const TEMP_SUFFIX: &str = ".staging";

#[derive(Error, Debug)]
pub enum VaultFault {
    #[error("VAULT_MISSING: No entitlement artifact on disk")]
    Missing,

    #[error("VAULT_CORRUPTION: {detail}")]
    Corrupt { detail: String },

    #[error("VAULT_TAMPERED: Integrity verification failed or foreign machine binding")]
    Tampered,

    #[error("IO_VAULT_FAULT: Disk access denied or full: {0}")]
    Io(#[from] std::io::Error),

    #[error("ENCRYPTION_MALFUNCTION: AEAD seal could not be produced")]
    EncryptFailure,
}

/**
 * Motor de bóveda: un archivo, un derecho de uso, una máquina.
 */
pub struct EntitlementVault {
    vault_file_path: PathBuf,
    machine_primary_hash: String,
}

impl EntitlementVault {
    /**
     * Forja la bóveda anclada a una ruta y a la huella de esta máquina.
     */
    pub fn new(vault_file_path: impl Into<PathBuf>, machine_primary_hash: impl Into<String>) -> Self {
        Self {
            vault_file_path: vault_file_path.into(),
            machine_primary_hash: machine_primary_hash.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.vault_file_path
    }

    /**
     * Recupera y verifica el derecho de uso sellado en esta máquina.
     *
     * # Errors:
     * - `Missing`: sin artefacto en disco (host jamás activado).
     * - `Corrupt`: gramática binaria rota o payload indescifrable.
     * - `Tampered`: tag GCM inválido (mutación de bytes o máquina ajena).
     * - `Io`: fallo físico de lectura.
     */
    pub fn load(&self) -> Result<Entitlement, VaultFault> {
        let raw_frame = match fs::read(&self.vault_file_path) {
            Ok(bytes) => bytes,
            Err(io_fault) if io_fault.kind() == std::io::ErrorKind::NotFound => {
                return Err(VaultFault::Missing);
            }
            Err(io_fault) => return Err(VaultFault::Io(io_fault)),
        };

        let frame = decode_frame(&raw_frame)?;

        // --- TÚNEL AEAD: LLAVE ANCLADA A LA HUELLA DEL HOST ---
        let cipher_engine = self.build_cipher_engine();
        let nonce = Nonce::from_slice(frame.nonce);

        let plaintext = cipher_engine
            .decrypt(
                nonce,
                Payload {
                    msg: frame.ciphertext,
                    aad: &[VAULT_SCHEMA_VERSION],
                },
            )
            .map_err(|_| {
                warn!("🛡️ [VAULT_SHIELD]: AEAD verification failed. Foreign machine or mutated bytes.");
                VaultFault::Tampered
            })?;

        let entitlement: Entitlement = serde_json::from_slice(&plaintext).map_err(|decode_fault| {
            VaultFault::Corrupt {
                detail: format!("PAYLOAD_DECODE_FAULT: {decode_fault}"),
            }
        })?;

        debug!("🔓 [VAULT_OPEN]: Entitlement {} recovered from disk.", entitlement.activation_id);
        Ok(entitlement)
    }

    /**
     * Sella el derecho de uso con reemplazo atómico.
     *
     * # Logic:
     * 1. Serialización JSON del derecho.
     * 2. Cifrado AEAD con nonce fresco y AAD de versión de esquema.
     * 3. Escritura a ruta temporal + fsync + rename sobre la final.
     *
     * # Errors:
     * `EncryptFailure` si el sello AEAD colapsa; `Io` ante fallo físico.
     */
    pub fn save(&self, entitlement: &Entitlement) -> Result<(), VaultFault> {
        let plaintext = serde_json::to_vec(entitlement).map_err(|_| VaultFault::EncryptFailure)?;

        let mut nonce_material = [0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce_material);
        let nonce = Nonce::from_slice(&nonce_material);

        let cipher_engine = self.build_cipher_engine();
        let ciphertext = cipher_engine
            .encrypt(
                nonce,
                Payload {
                    msg: &plaintext,
                    aad: &[VAULT_SCHEMA_VERSION],
                },
            )
            .map_err(|_| VaultFault::EncryptFailure)?;

        let frame_bytes = compose_frame(&nonce_material, &ciphertext);

        // --- PROTOCOLO DE REEMPLAZO ATÓMICO ---
        if let Some(parent_directory) = self.vault_file_path.parent() {
            if !parent_directory.as_os_str().is_empty() {
                fs::create_dir_all(parent_directory)?;
            }
        }

        let staging_path = self.staging_path();
        {
            let mut staging_file = fs::File::create(&staging_path)?;
            staging_file.write_all(&frame_bytes)?;
            staging_file.sync_all()?;
        }

        Self::restrict_permissions(&staging_path)?;
        fs::rename(&staging_path, &self.vault_file_path)?;

        info!(
            "🔐 [VAULT_SEALED]: Entitlement {} crystallized at {}.",
            entitlement.activation_id,
            self.vault_file_path.display()
        );
        Ok(())
    }

    /**
     * Destruye el artefacto local. La ausencia previa no es un fallo.
     */
    pub fn delete(&self) -> Result<(), VaultFault> {
        match fs::remove_file(&self.vault_file_path) {
            Ok(()) => {
                info!("🗑️ [VAULT_PURGED]: Entitlement artifact removed from disk.");
                Ok(())
            }
            Err(io_fault) if io_fault.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(io_fault) => Err(VaultFault::Io(io_fault)),
        }
    }

    /// Deriva el motor AES-256-GCM desde la huella primaria del host.
    fn build_cipher_engine(&self) -> Aes256Gcm {
        let mut derived_key_buffer = [0u8; KEY_LENGTH_BYTES];
        pbkdf2_hmac::<Sha256>(
            self.machine_primary_hash.as_bytes(),
            KEY_DERIVATION_SALT.as_bytes(),
            KEY_DERIVATION_ITERATIONS,
            &mut derived_key_buffer,
        );

        let key = Key::<Aes256Gcm>::from_slice(&derived_key_buffer);
        Aes256Gcm::new(key)
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.vault_file_path.as_os_str().to_owned();
        staging.push(TEMP_SUFFIX);
        PathBuf::from(staging)
    }

    /// Modo 0600: solo el dueño del proceso lee el artefacto.
    #[cfg(unix)]
    fn restrict_permissions(path: &Path) -> Result<(), VaultFault> {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions)?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &Path) -> Result<(), VaultFault> {
        Ok(())
    }
}
// FIN DEL ARCHIVO [libs/core/entitlement-vault/src/vault.rs]
