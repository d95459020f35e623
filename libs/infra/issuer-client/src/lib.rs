// INICIO DEL ARCHIVO [libs/infra/issuer-client/src/lib.rs]
/*!
 * =================================================================
 * APARATO: ISSUER CLIENT LIBRARY BARREL (V3.0 - AUTHORITY UPLINK)
 * CLASIFICACIÓN: INFRASTRUCTURE LIB (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DE CLIENTE Y PROTOCOLO
 * =================================================================
 */

pub mod client;
pub mod protocol;

pub use client::{ActivationCall, IssuerClient, IssuerClientConfig};
pub use protocol::{classify_activation, IssuerGrant, IssuerVerdict, IssuerWireResponse};
// FIN DEL ARCHIVO [libs/infra/issuer-client/src/lib.rs]
