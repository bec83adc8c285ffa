use std::collections::HashMap;

use crate::schemas::device::Device;

/// Every device seen so far, keyed by canonical name, in order of first sighting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    devices: Vec<Device>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Device> {
        self.by_name.get(name).map(|&i| &self.devices[i])
    }

    /// Look up a device by name, creating it if this is the first sighting.
    /// The flag is `true` when the device was just created.
    pub fn upsert(&mut self, name: &str) -> (&mut Device, bool) {
        match self.by_name.get(name).copied() {
            Some(i) => (&mut self.devices[i], false),
            None => {
                let i = self.devices.len();
                self.devices.push(Device::new(name));
                self.by_name.insert(name.to_string(), i);
                (&mut self.devices[i], true)
            }
        }
    }

    /// Devices in order of first sighting.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub(crate) fn devices_mut(&mut self) -> &mut [Device] {
        &mut self.devices
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;

    #[test]
    fn test_upsert_merges_by_name() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        let (device, created) = registry.upsert("Nokia 1");
        assert!(created);
        device.chip = Some("MT6737M".to_string());

        registry.upsert("Honor 10");

        let (device, created) = registry.upsert("Nokia 1");
        assert!(!created);
        device.capacity = Some("2150 mAh".to_string());

        assert_eq!(registry.len(), 2);
        let nokia = registry.get("Nokia 1").unwrap();
        assert_eq!(nokia.chip.as_deref(), Some("MT6737M"));
        assert_eq!(nokia.capacity.as_deref(), Some("2150 mAh"));
        assert!(registry.get("Nokia 2").is_none());

        let names: Vec<&str> = registry.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Nokia 1", "Honor 10"]);
    }
}
