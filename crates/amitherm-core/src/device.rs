//! Device metadata for the PLC and its two logical sub-systems.

pub const MANUFACTURER: &str = "AMiT";
pub const PLC_MODEL: &str = "AMiNi4W2";

/// The three devices a bridge exposes: the PLC itself plus one logical
/// device per polled sub-system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Plc,
    Heating,
    Ventilation,
}

/// Presentation metadata for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub kind: DeviceKind,
    pub name: &'static str,
    pub model: &'static str,
    pub manufacturer: &'static str,
}

impl DeviceInfo {
    pub fn for_kind(kind: DeviceKind) -> Self {
        let (name, model) = match kind {
            DeviceKind::Plc => ("AMiT PLC", PLC_MODEL),
            DeviceKind::Heating => ("Heating", "Heating circuit"),
            DeviceKind::Ventilation => ("Ventilation", "Air handling unit"),
        };
        Self {
            kind,
            name,
            model,
            manufacturer: MANUFACTURER,
        }
    }
}
