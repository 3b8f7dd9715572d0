/// Identifies a Bluetooth profile, using the numeric values of `android.bluetooth.BluetoothProfile`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileId {
    Headset = 1,
    A2dp = 2,
    Health = 3,
    InputDevice = 4,
    Pan = 5,
    Pbap = 6,
    Gatt = 7,
    GattServer = 8,
    Map = 9,
    Sap = 10,
    A2dpSink = 11,
    AvrcpController = 12,
    HeadsetClient = 16,
    PbapClient = 17,
    MapClient = 18,
}

impl ProfileId {
    /// Returns the platform's integer value for this profile.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Converts the platform's integer value.
    pub fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            1 => Self::Headset,
            2 => Self::A2dp,
            3 => Self::Health,
            4 => Self::InputDevice,
            5 => Self::Pan,
            6 => Self::Pbap,
            7 => Self::Gatt,
            8 => Self::GattServer,
            9 => Self::Map,
            10 => Self::Sap,
            11 => Self::A2dpSink,
            12 => Self::AvrcpController,
            16 => Self::HeadsetClient,
            17 => Self::PbapClient,
            18 => Self::MapClient,
            _ => return None,
        })
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Connection state of a profile with a remote device.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected = 0,
    Connecting = 1,
    Connected = 2,
    Disconnecting = 3,
}

impl ConnectionState {
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Disconnected),
            1 => Some(Self::Connecting),
            2 => Some(Self::Connected),
            3 => Some(Self::Disconnecting),
            _ => None,
        }
    }
}

/// Connection priority of a device for a profile.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// The device is connected automatically.
    pub const AUTO_CONNECT: Priority = Priority(1000);
    /// Incoming connections are accepted.
    pub const ON: Priority = Priority(100);
    /// Connections are rejected.
    pub const OFF: Priority = Priority(0);
    /// No priority has been set for the device.
    pub const UNDEFINED: Priority = Priority(-1);

    /// Whether the value is one the remote services accept in `set_priority`.
    pub fn is_settable(self) -> bool {
        self == Self::ON || self == Self::OFF
    }
}

/// A reference to a remote Bluetooth device, keyed by its hardware address.
///
/// Constructing a device never fails; operations that take a device check
/// [`BluetoothDevice::is_valid`] before contacting the remote service.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BluetoothDevice {
    address: String,
}

impl BluetoothDevice {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// The hardware address as given at construction.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the address is a well-formed Bluetooth address.
    pub fn is_valid(&self) -> bool {
        Self::check_address(&self.address)
    }

    /// Checks the Bluetooth address grammar: six groups of two hex digits separated
    /// by `:` or `-`, with the same separator used throughout.
    pub fn check_address(address: &str) -> bool {
        let bytes = address.as_bytes();
        if bytes.len() != 17 {
            return false;
        }
        let sep = bytes[2];
        if sep != b':' && sep != b'-' {
            return false;
        }
        bytes.iter().enumerate().all(|(i, &b)| {
            if i % 3 == 2 {
                b == sep
            } else {
                b.is_ascii_hexdigit()
            }
        })
    }
}

impl std::fmt::Display for BluetoothDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.address)
    }
}

/// Settings of a [crate::ProfileProxy].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Issue the first bind right after construction if the adapter is powered.
    /// Otherwise the proxy stays unbound until the next power-on event or `rebind()`.
    pub bind_on_create: bool,
    /// Log every forwarded call at debug level.
    pub verbose: bool,
    /// Capacity of the service event channel. The oldest event is dropped on overflow.
    pub event_capacity: usize,
}

impl ProxyConfig {
    pub fn with_bind_on_create(mut self, bind_on_create: bool) -> Self {
        self.bind_on_create = bind_on_create;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_on_create: true,
            verbose: false,
            event_capacity: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_grammar() {
        assert!(BluetoothDevice::check_address("00:11:22:AA:BB:CC"));
        assert!(BluetoothDevice::check_address("00-11-22-aa-bb-cc"));
        assert!(!BluetoothDevice::check_address("00:11:22:AA:BB"));
        assert!(!BluetoothDevice::check_address("00:11:22:AA:BB:CG"));
        assert!(!BluetoothDevice::check_address("00:11-22:AA:BB:CC"));
        assert!(!BluetoothDevice::check_address("00.11.22.AA.BB.CC"));
        assert!(!BluetoothDevice::check_address("0011:22:AA:BB:CC:"));
        assert!(!BluetoothDevice::check_address(""));
        assert!(BluetoothDevice::new("01:23:45:67:89:AB").is_valid());
    }

    #[test]
    fn raw_values() {
        assert_eq!(ProfileId::from_raw(2), Some(ProfileId::A2dp));
        assert_eq!(ProfileId::from_raw(13), None);
        assert_eq!(ProfileId::Sap.as_raw(), 10);
        assert_eq!(ConnectionState::from_raw(2), Some(ConnectionState::Connected));
        assert_eq!(ConnectionState::from_raw(-1), None);
        assert!(Priority::ON.is_settable());
        assert!(!Priority::AUTO_CONNECT.is_settable());
    }

    #[test]
    fn config_defaults() {
        let config = ProxyConfig::default().with_verbose(true).with_event_capacity(0);
        assert!(config.bind_on_create);
        assert!(config.verbose);
        assert_eq!(config.event_capacity, 1);
    }
}
