use crate::{params::ParameterDefinition, Error, Result};
use std::{
    collections::HashMap,
    ops::RangeInclusive,
    sync::{Arc, Mutex},
};

/// Reads and writes the controls of a camera device.
///
/// Controls are identified by a device-specific ID, and hold integer values.
pub trait DeviceControl: Send + Sync {
    fn get_value(&self, device_id: u32) -> Result<i64>;

    /// Writes a control value.
    ///
    /// The device may adjust the value (for example, clamping it to its
    /// supported range), so it needs to be read back afterwards.
    fn set_value(&self, device_id: u32, value: i64) -> Result;
}

#[derive(Debug, Default)]
struct Controls {
    values: HashMap<u32, i64>,
    ranges: HashMap<u32, RangeInclusive<i64>>,
}

/// A [DeviceControl] which keeps control values in memory.
///
/// Clones share the same controls.
#[derive(Debug, Default, Clone)]
pub struct MemoryDeviceControl {
    controls: Arc<Mutex<Controls>>,
}

impl MemoryDeviceControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes controls for each definition, set to its default value (or 0).
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a ParameterDefinition>,
    ) -> Self {
        let values = definitions
            .into_iter()
            .map(|d| (d.device_id, d.default.unwrap_or_default()))
            .collect();
        Self {
            controls: Arc::new(Mutex::new(Controls {
                values,
                ranges: HashMap::new(),
            })),
        }
    }

    /// Limits the values of a control; writes outside of `range` are clamped.
    pub fn with_range(self, device_id: u32, range: RangeInclusive<i64>) -> Result<Self> {
        self.lock()?.ranges.insert(device_id, range);
        Ok(self)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Controls>> {
        self.controls.lock().map_err(|_| {
            error!("device control lock poisoned");
            Error::Internal
        })
    }
}

impl DeviceControl for MemoryDeviceControl {
    fn get_value(&self, device_id: u32) -> Result<i64> {
        self.lock()?
            .values
            .get(&device_id)
            .copied()
            .ok_or_else(|| Error::Device(format!("no control {device_id:#x}")))
    }

    fn set_value(&self, device_id: u32, value: i64) -> Result {
        let mut controls = self.lock()?;
        let value = match controls.ranges.get(&device_id) {
            Some(range) => value.clamp(*range.start(), *range.end()),
            None => value,
        };
        trace!("control {device_id:#x} = {value}");
        controls.values.insert(device_id, value);
        Ok(())
    }
}
