// INICIO DEL ARCHIVO [libs/core/entitlement-vault/src/framing.rs]
//! =================================================================
//! APARATO: VAULT BINARY FRAMING (V1.1 - WIRE DISCIPLINE)
//! CLASIFICACIÓN: CORE SECURITY (ESTRATO L1)
//! RESPONSABILIDAD: GRAMÁTICA BINARIA DEL ARCHIVO DE BÓVEDA
//! =================================================================

use crate::vault::VaultFault;

/// Firma mágica del archivo de bóveda (4 bytes).
pub const VAULT_MAGIC: [u8; 4] = *b"ISXE";

/// Versión del esquema; participa como AAD del túnel AEAD.
pub const VAULT_SCHEMA_VERSION: u8 = 1;

/// Longitud del nonce AES-GCM (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// Cabecera mínima: magic + versión + nonce.
pub const HEADER_LENGTH: usize = 4 + 1 + NONCE_LENGTH;

/// Frame decodificado: nonce y material cifrado (tag incluido).
pub struct VaultFrame<'a> {
    pub nonce: &'a [u8],
    pub ciphertext: &'a [u8],
}

/**
 * Compone el frame binario `magic | version | nonce | ciphertext+tag`.
 */
pub fn compose_frame(nonce: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LENGTH + ciphertext.len());
    frame.extend_from_slice(&VAULT_MAGIC);
    frame.push(VAULT_SCHEMA_VERSION);
    frame.extend_from_slice(nonce);
    frame.extend_from_slice(ciphertext);
    frame
}

/**
 * Decodifica y valida la gramática binaria del archivo.
 *
 * # Errors:
 * `VaultFault::Corrupt` ante truncamiento, firma mágica ajena o
 * versión de esquema desconocida. La integridad criptográfica del
 * cuerpo se verifica después, en el túnel AEAD.
 */
pub fn decode_frame(raw: &[u8]) -> Result<VaultFrame<'_>, VaultFault> {
    if raw.len() <= HEADER_LENGTH {
        return Err(VaultFault::Corrupt {
            detail: format!("TRUNCATED_FRAME: {} bytes on disk", raw.len()),
        });
    }

    if raw[..4] != VAULT_MAGIC {
        return Err(VaultFault::Corrupt {
            detail: "MAGIC_MISMATCH: File is not a vault artifact".to_string(),
        });
    }

    let schema_version = raw[4];
    if schema_version != VAULT_SCHEMA_VERSION {
        return Err(VaultFault::Corrupt {
            detail: format!("SCHEMA_DRIFT: Unknown vault version {schema_version}"),
        });
    }

    Ok(VaultFrame {
        nonce: &raw[5..HEADER_LENGTH],
        ciphertext: &raw[HEADER_LENGTH..],
    })
}

// FIN DEL ARCHIVO [libs/core/entitlement-vault/src/framing.rs]
