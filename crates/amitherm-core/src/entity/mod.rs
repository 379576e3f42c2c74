//! Observer entities: presented projections of coordinator snapshots
//! plus the command surface that mutates them.

pub mod climate;
pub mod fan;
pub mod number;
pub mod sensor;

pub use climate::{HeatingClimate, HeatingClimateState, VentilationClimate, VentilationClimateState};
pub use fan::{FanPreset, FanState, VentilationFan};
pub use number::{Number, NumberDescription, NUMBERS};
pub use sensor::{Sensor, SensorDescription, SENSORS};
