// INICIO DEL ARCHIVO [libs/core/entitlement-vault/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ENTITLEMENT VAULT BARREL (V3.0 - NODE-LOCK STORAGE)
 * CLASIFICACIÓN: CORE SECURITY (ESTRATO L1)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL MOTOR DE BÓVEDA
 * =================================================================
 */

pub mod framing;
pub mod vault;

pub use framing::{VAULT_MAGIC, VAULT_SCHEMA_VERSION};
pub use vault::{EntitlementVault, VaultFault};
// FIN DEL ARCHIVO [libs/core/entitlement-vault/src/lib.rs]
