// ── Overview sensors ──
//
// Description-table driven read-only projections of the overview data.
// A sensor whose reading is absent or zero in the first known result is
// considered not installed and never created.

use amitherm_api::OverviewResult;

use crate::coordinator::Snapshot;
use crate::device::DeviceKind;
use crate::error::CoreError;
use crate::source::OverviewCoordinator;

/// Static description of one overview sensor.
pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub device: DeviceKind,
    pub value_fn: fn(&OverviewResult) -> Option<f64>,
}

/// Every sensor the overview can surface.
pub const SENSORS: &[SensorDescription] = &[
    SensorDescription {
        key: "temperature",
        name: "Temperature",
        unit: "°C",
        device: DeviceKind::Heating,
        value_fn: |data| data.temperature,
    },
    SensorDescription {
        key: "air_temperature",
        name: "Air temperature",
        unit: "°C",
        device: DeviceKind::Ventilation,
        value_fn: |data| data.air_temperature,
    },
    SensorDescription {
        key: "co2",
        name: "CO2",
        unit: "ppm",
        device: DeviceKind::Ventilation,
        value_fn: |data| data.co2,
    },
];

/// One live sensor. Values are read through the coordinator cache, so
/// a `Sensor` is always as fresh as the last completed refresh.
pub struct Sensor {
    coordinator: OverviewCoordinator,
    description: &'static SensorDescription,
}

impl Sensor {
    /// Create the sensor if its reading exists on this installation.
    ///
    /// Requires a populated cache: call after the coordinator's first
    /// refresh, otherwise this is [`CoreError::NotYetFetched`]. Returns
    /// `Ok(None)` when the hardware does not report this reading.
    pub fn try_new(
        coordinator: &OverviewCoordinator,
        description: &'static SensorDescription,
    ) -> Result<Option<Self>, CoreError> {
        let snapshot = coordinator.snapshot();
        let data = snapshot.require()?;
        let exists = (description.value_fn)(data).is_some_and(|v| v != 0.0);
        if !exists {
            return Ok(None);
        }
        Ok(Some(Self {
            coordinator: coordinator.clone(),
            description,
        }))
    }

    pub fn description(&self) -> &'static SensorDescription {
        self.description
    }

    pub fn value(&self) -> Option<f64> {
        self.read(|snapshot| {
            snapshot
                .data
                .as_deref()
                .and_then(self.description.value_fn)
        })
    }

    pub fn available(&self) -> bool {
        self.read(|snapshot| snapshot.available)
    }

    fn read<T>(&self, project: impl FnOnce(&Snapshot<OverviewResult>) -> T) -> T {
        project(&self.coordinator.snapshot())
    }
}
