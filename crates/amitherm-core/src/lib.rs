//! Reactive core for the AMiT HVAC bridge.
//!
//! Wraps the [`amitherm_api`] client facade in polling coordinators
//! with shared caches, fans refreshes out to registered listeners, and
//! exposes the plant as fan/climate/sensor/number entities with a
//! unified command dispatch path.

pub mod command;
pub mod convert;
pub mod coordinator;
pub mod device;
pub mod entity;
pub mod error;
pub mod hub;
pub mod source;

pub use command::{Command, Dispatcher};
pub use convert::HvacMode;
pub use coordinator::{Coordinator, RefreshOutcome, Snapshot, SubscriptionHandle, UpdateSource};
pub use device::{DeviceInfo, DeviceKind};
pub use error::CoreError;
pub use hub::{Hub, DEFAULT_UPDATE_INTERVAL};
pub use source::{
    HeatingCoordinator, HeatingSource, OverviewCoordinator, OverviewSource,
    VentilationCoordinator, VentilationSnapshot, VentilationSource,
};
