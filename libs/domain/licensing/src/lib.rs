// INICIO DEL ARCHIVO [libs/domain/licensing/src/lib.rs]
/*!
 * =================================================================
 * APARATO: LICENSING DOMAIN BARREL (V4.0 - STATE MACHINE MASTER)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL CORAZÓN DE LICENCIAMIENTO
 * =================================================================
 */

pub mod manager;
pub mod policy;
pub mod status_engine;

pub use manager::{ActivationOutcome, ActivationReceipt, LicenseManager};
pub use policy::LicensingPolicy;
pub use status_engine::{assess_renewal, compute_expiry, derive_state, derive_status};
// FIN DEL ARCHIVO [libs/domain/licensing/src/lib.rs]
