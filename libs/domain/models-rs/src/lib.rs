// [libs/domain/models-rs/src/lib.rs]

pub mod device;
pub mod entitlement;
pub mod events;
pub mod license_key;
pub mod status;
pub mod taxonomy;

pub use device::{DeviceComponents, DeviceFingerprint};
pub use entitlement::Entitlement;
pub use events::EventEnvelope;
pub use license_key::{DurationCode, KeyFormat, LicenseKey};
pub use status::{LicenseInfo, LicenseState, LicenseStatus, RenewalAssessment};
pub use taxonomy::LicenseFault;
