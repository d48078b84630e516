//! Device-discovery records: the udev aspect of a link.
//!
//! The device-discovery source reports devices with kernel uevents, the
//! same text-based messages udev consumes for hotplugging. A parsed event
//! becomes an immutable [`DeviceRecord`] that a link object owns as its
//! udev aspect.
//!
//! Records are shared by handle (`Rc<DeviceRecord>`), and the udev aspect
//! compares by handle identity: two records are the same aspect value only
//! if they are the same allocation. A re-discovered device produces a new
//! record and therefore a visible aspect change, even when every field
//! happens to match.

use std::collections::HashMap;
use std::fmt;

use super::error::{Error, Result};

/// One parsed device-discovery event, frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceRecord {
    /// Action type: "add", "remove", "change", "move", "bind", "unbind".
    pub action: String,
    /// Device path in sysfs (e.g. "/devices/virtual/net/veth0").
    pub devpath: String,
    /// Subsystem name; network interfaces report "net".
    pub subsystem: String,
    /// All environment variables as key-value pairs.
    pub properties: HashMap<String, String>,
}

impl DeviceRecord {
    /// Parse a record from the raw uevent wire format:
    /// `action@devpath\0KEY=VALUE\0KEY=VALUE\0...`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let first_null = data
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::Parse("uevent without header terminator".into()))?;
        let header = std::str::from_utf8(&data[..first_null])
            .map_err(|_| Error::Parse("uevent header is not UTF-8".into()))?;

        let at_pos = header
            .find('@')
            .ok_or_else(|| Error::Parse(format!("uevent header without '@': {header:?}")))?;
        let action = header[..at_pos].to_string();
        let devpath = header[at_pos + 1..].to_string();

        let mut properties = HashMap::new();
        let mut subsystem = String::new();

        let mut offset = first_null + 1;
        while offset < data.len() {
            let end = data[offset..]
                .iter()
                .position(|&b| b == 0)
                .map_or(data.len(), |p| offset + p);

            if end > offset
                && let Ok(kv) = std::str::from_utf8(&data[offset..end])
                && let Some(eq_pos) = kv.find('=')
            {
                let key = &kv[..eq_pos];
                let value = &kv[eq_pos + 1..];
                if key == "SUBSYSTEM" {
                    subsystem = value.to_string();
                }
                properties.insert(key.to_string(), value.to_string());
            }

            offset = end + 1;
        }

        Ok(Self {
            action,
            devpath,
            subsystem,
            properties,
        })
    }

    /// Build a minimal record by hand, for sources that discover devices
    /// without a uevent payload (e.g. an initial sysfs enumeration).
    pub fn synthetic(devpath: impl Into<String>, subsystem: impl Into<String>) -> Self {
        Self {
            action: "add".to_string(),
            devpath: devpath.into(),
            subsystem: subsystem.into(),
            properties: HashMap::new(),
        }
    }

    /// Get the device name if available (e.g. "eth0").
    pub fn devname(&self) -> Option<&str> {
        self.properties.get("DEVNAME").map(String::as_str)
    }

    /// Get the interface name for "net" devices (INTERFACE key).
    pub fn interface(&self) -> Option<&str> {
        self.properties.get("INTERFACE").map(String::as_str)
    }

    /// Get the interface index for "net" devices (IFINDEX key).
    pub fn ifindex(&self) -> Option<i32> {
        self.properties.get("IFINDEX").and_then(|s| s.parse().ok())
    }

    /// Get the driver name if available.
    pub fn driver(&self) -> Option<&str> {
        self.properties.get("DRIVER").map(String::as_str)
    }

    /// Get the event sequence number.
    pub fn seqnum(&self) -> Option<u64> {
        self.properties.get("SEQNUM").and_then(|s| s.parse().ok())
    }

    /// Whether this record describes a network interface.
    pub fn is_net(&self) -> bool {
        self.subsystem == "net"
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.action, self.devpath, self.subsystem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_net_uevent() {
        let msg = b"add@/devices/virtual/net/veth0\0ACTION=add\0DEVPATH=/devices/virtual/net/veth0\0SUBSYSTEM=net\0INTERFACE=veth0\0IFINDEX=7\0SEQNUM=4711\0";

        let record = DeviceRecord::parse(msg).unwrap();
        assert_eq!(record.action, "add");
        assert_eq!(record.devpath, "/devices/virtual/net/veth0");
        assert!(record.is_net());
        assert_eq!(record.interface(), Some("veth0"));
        assert_eq!(record.ifindex(), Some(7));
        assert_eq!(record.seqnum(), Some(4711));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(DeviceRecord::parse(b"no null terminator").is_err());
        assert!(DeviceRecord::parse(b"no-at-sign\0KEY=VALUE\0").is_err());
    }

    #[test]
    fn handle_identity_not_field_equality() {
        use std::rc::Rc;

        let a = Rc::new(DeviceRecord::synthetic("/devices/virtual/net/dummy0", "net"));
        let b = Rc::new(DeviceRecord::synthetic("/devices/virtual/net/dummy0", "net"));

        // field-wise the records match, but they are distinct handles
        assert_eq!(*a, *b);
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
