// INICIO DEL ARCHIVO [libs/core/fingerprint-engine/src/collector.rs]
/*!
 * =================================================================
 * APARATO: SILICON IDENTITY COLLECTOR (V2.3 - BOOT MEMOIZED)
 * CLASIFICACIÓN: CORE SENSORS (ESTRATO L1)
 * RESPONSABILIDAD: RECOLECCIÓN DE IDENTIFICADORES ESTABLES DEL HOST
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. PURE OF NETWORK: La recolección es función del host local; jamás
 *    toca la red. Idempotente dentro de un boot (memoización OnceCell).
 * 2. GRACEFUL DEGRADATION: Un sensor ausente no colapsa la huella;
 *    marca 'reduced_entropy' y continúa con el material disponible.
 * 3. CATASTROPHIC GUARD: Solo la ausencia total de material de
 *    identidad produce un fallo duro.
 *
 * # Mathematical Proof (Digest Stability):
 * El digesto primario se computa sobre los identificadores ordenados y
 * unidos con un separador fijo; el orden de enumeración del sistema
 * operativo no altera el resultado.
 * =================================================================
 */

use chrono::Utc;
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use sysinfo::System;
use thiserror::Error;
use tracing::{debug, warn};

use pulse_domain_models::{DeviceComponents, DeviceFingerprint};

/// Separador fijo del material de digesto (inmutable entre versiones).
const DIGEST_FIELD_SEPARATOR: &str = "|";

/// Instantánea memoizada: una única computación por boot del proceso.
static BOOT_FINGERPRINT: OnceCell<Result<DeviceFingerprint, FingerprintFault>> = OnceCell::new();

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FingerprintFault {
    #[error("SENSOR_COLLAPSE: Host enumeration yielded no identity material at all")]
    CollectionCollapse,
}

/**
 * Punto de acceso soberano a la huella del host.
 *
 * # Performance:
 * La primera invocación enumera sensores (decenas de ms); las
 * subsecuentes clonan la instantánea memoizada en O(1).
 */
pub fn host_fingerprint() -> Result<DeviceFingerprint, FingerprintFault> {
    BOOT_FINGERPRINT
        .get_or_init(HostCollector::collect)
        .clone()
}

pub struct HostCollector;

impl HostCollector {
    /**
     * Enumera los sensores del host y forja la huella completa.
     *
     * # Errors:
     * `FingerprintFault::CollectionCollapse` únicamente cuando ningún
     * sensor entrega material (instalación rota o sandbox hermético).
     */
    pub fn collect() -> Result<DeviceFingerprint, FingerprintFault> {
        let mut system_probe = System::new_all();
        system_probe.refresh_all();

        // --- 1. ADQUISICIÓN DE SENSORES INDIVIDUALES ---
        let os_install_id = Self::read_os_install_id();
        let mac_catalog = Self::read_mac_catalog();
        let cpu_model = Self::read_cpu_model(&system_probe);
        let disk_serial = Self::read_disk_serial();
        let memory_bucket = Self::bucket_memory(system_probe.total_memory());
        let timezone = Self::read_timezone();
        let language = Self::read_language();

        let os_identity = format!(
            "{}-{}",
            System::name().unwrap_or_else(|| "unknown-os".to_string()),
            System::os_version().unwrap_or_else(|| "0".to_string()),
        );

        // --- 2. GUARDIA CATASTRÓFICA ---
        let identity_material_present =
            !os_install_id.is_empty() || !mac_catalog.is_empty() || !cpu_model.is_empty();
        if !identity_material_present {
            return Err(FingerprintFault::CollectionCollapse);
        }

        // --- 3. VEREDICTO DE ENTROPÍA ---
        let reduced_entropy =
            os_install_id.is_empty() || mac_catalog.is_empty() || disk_serial.is_empty();
        if reduced_entropy {
            warn!(
                "🧬 [FINGERPRINT_DEGRADED]: Partial sensor coverage (machine_id={}, macs={}, disk={}).",
                !os_install_id.is_empty(),
                mac_catalog.len(),
                !disk_serial.is_empty()
            );
        }

        // --- 4. DIGESTO PRIMARIO (SHA-256 SOBRE MATERIAL ORDENADO) ---
        let primary_hash = Self::derive_primary_hash(
            &mac_catalog,
            &cpu_model,
            &os_install_id,
            &disk_serial,
        );

        let components = DeviceComponents {
            os_identity,
            cpu_model,
            primary_mac: mac_catalog.first().cloned().unwrap_or_default(),
            disk_serial,
            memory_bucket,
            timezone,
            language,
        };

        debug!("🧬 [FINGERPRINT_READY]: Primary digest {}…", &primary_hash[..12]);

        Ok(DeviceFingerprint {
            primary_hash,
            components,
            first_seen: Utc::now(),
            reduced_entropy,
        })
    }

    /**
     * Digesto SHA-256 (hex) sobre los identificadores únicos ordenados.
     */
    fn derive_primary_hash(
        mac_catalog: &[String],
        cpu_model: &str,
        os_install_id: &str,
        disk_serial: &str,
    ) -> String {
        let mut digest_engine = Sha256::new();
        digest_engine.update(mac_catalog.join(",").as_bytes());
        digest_engine.update(DIGEST_FIELD_SEPARATOR.as_bytes());
        digest_engine.update(cpu_model.as_bytes());
        digest_engine.update(DIGEST_FIELD_SEPARATOR.as_bytes());
        digest_engine.update(os_install_id.as_bytes());
        digest_engine.update(DIGEST_FIELD_SEPARATOR.as_bytes());
        digest_engine.update(disk_serial.as_bytes());
        hex::encode(digest_engine.finalize())
    }

    /// Identificador de instalación del sistema operativo (best-effort).
    fn read_os_install_id() -> String {
        machine_uid::get().unwrap_or_default()
    }

    /**
     * Catálogo ordenado de direcciones MAC físicas (loopback excluido).
     * En plataformas sin /sys se degrada al adaptador primario.
     */
    fn read_mac_catalog() -> Vec<String> {
        let mut catalog: Vec<String> = Vec::new();

        #[cfg(target_os = "linux")]
        if let Ok(interface_entries) = std::fs::read_dir("/sys/class/net") {
            for entry in interface_entries.flatten() {
                let interface_name = entry.file_name().to_string_lossy().to_string();
                if interface_name == "lo" {
                    continue;
                }
                if let Ok(raw_address) = std::fs::read_to_string(entry.path().join("address")) {
                    let address = raw_address.trim().to_lowercase();
                    if !address.is_empty() && address != "00:00:00:00:00:00" {
                        catalog.push(address);
                    }
                }
            }
        }

        if catalog.is_empty() {
            if let Ok(Some(primary)) = mac_address::get_mac_address() {
                catalog.push(primary.to_string().to_lowercase());
            }
        }

        catalog.sort();
        catalog.dedup();
        catalog
    }

    fn read_cpu_model(system_probe: &System) -> String {
        system_probe
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default()
    }

    /// Serial del disco primario vía /sys (best-effort, linux).
    fn read_disk_serial() -> String {
        #[cfg(target_os = "linux")]
        {
            for block_device in ["nvme0n1", "sda", "vda", "mmcblk0"] {
                let serial_path = format!("/sys/block/{block_device}/device/serial");
                if let Ok(raw_serial) = std::fs::read_to_string(serial_path) {
                    let serial = raw_serial.trim().to_string();
                    if !serial.is_empty() {
                        return serial;
                    }
                }
            }
        }
        String::new()
    }

    /**
     * Cubeta de memoria en GiB redondeada; absorbe la varianza de
     * reserva del kernel entre boots de la misma máquina.
     */
    fn bucket_memory(total_memory_bytes: u64) -> String {
        let gibibytes = (total_memory_bytes as f64 / (1024.0 * 1024.0 * 1024.0)).round() as u64;
        format!("{gibibytes}GB")
    }

    fn read_timezone() -> String {
        if let Ok(explicit_zone) = std::env::var("TZ") {
            if !explicit_zone.is_empty() {
                return explicit_zone;
            }
        }
        std::fs::read_to_string("/etc/timezone")
            .map(|content| content.trim().to_string())
            .unwrap_or_else(|_| "UTC".to_string())
    }

    fn read_language() -> String {
        std::env::var("LANG")
            .or_else(|_| std::env::var("LC_ALL"))
            .ok()
            .and_then(|locale| locale.split('.').next().map(str::to_string))
            .filter(|locale| !locale.is_empty())
            .unwrap_or_else(|| "en_US".to_string())
    }
}

// FIN DEL ARCHIVO [libs/core/fingerprint-engine/src/collector.rs]
