//! `Uuid` extensions for Bluetooth UUIDs.
//!
//! Short (16-bit and 32-bit) UUIDs assigned by the Bluetooth SIG are embedded into the
//! 128-bit space as `base + (short << 96)`, i.e. the short value replaces the first
//! 32 bits of the [Bluetooth Base UUID](BLUETOOTH_BASE_UUID). Byte arrays exchanged with
//! the stack (advertising data, SDP records) are little-endian.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{Error, ErrorKind};
use crate::Result;

/// This is the Bluetooth Base UUID `00000000-0000-1000-8000-00805F9B34FB`.
pub const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805f9b34fb;

const BASE_UUID_MSB: u64 = (BLUETOOTH_BASE_UUID >> 64) as u64;
const BASE_UUID_LSB: u64 = BLUETOOTH_BASE_UUID as u64;

/// Length in bytes of a 16-bit UUID.
pub const UUID_BYTES_16_BIT: usize = 2;
/// Length in bytes of a 32-bit UUID.
pub const UUID_BYTES_32_BIT: usize = 4;
/// Length in bytes of a 128-bit UUID.
pub const UUID_BYTES_128_BIT: usize = 16;

/// Const function to create a 16-bit Bluetooth UUID
pub const fn bluetooth_uuid_from_u16(uuid: u16) -> Uuid {
    Uuid::from_u128(((uuid as u128) << 96) | BLUETOOTH_BASE_UUID)
}

/// Const function to create a 32-bit Bluetooth UUID
pub const fn bluetooth_uuid_from_u32(uuid: u32) -> Uuid {
    Uuid::from_u128(((uuid as u128) << 96) | BLUETOOTH_BASE_UUID)
}

/// Extension trait for [uuid::Uuid] with helper methods for dealing with Bluetooth 16-bit and 32-bit UUIDs
pub trait BluetoothUuidExt: private::Sealed + Sized {
    /// Creates a 16-bit Bluetooth UUID
    fn from_u16(uuid: u16) -> Self;

    /// Creates a 32-bit Bluetooth UUID
    fn from_u32(uuid: u32) -> Self;

    /// Parses a little-endian UUID of 2, 4 or 16 bytes.
    ///
    /// Short inputs are expanded with the Bluetooth Base UUID; a 16-byte input is taken
    /// as the whole 128-bit value. Any other length is an [ErrorKind::InvalidLength] error.
    fn from_bluetooth_bytes(bytes: &[u8]) -> Result<Self>;

    /// Returns `true` if self is a 16-bit Bluetooth UUID.
    fn is_u16_uuid(&self) -> bool;

    /// Returns `true` if self is a 32-bit Bluetooth UUID that is not also a 16-bit one.
    fn is_u32_uuid(&self) -> bool;

    /// Extracts bits 96..112 of the UUID. This does not check [BluetoothUuidExt::is_u16_uuid].
    fn service_identifier16(&self) -> u16;

    /// Extracts the first 32 bits of the UUID. This does not check representability.
    fn service_identifier32(&self) -> u32;

    /// Tries to convert self into a 16-bit Bluetooth UUID
    fn try_to_u16(&self) -> Option<u16>;

    /// Tries to convert self into a 32-bit Bluetooth UUID; 16-bit UUIDs are converted too.
    fn try_to_u32(&self) -> Option<u32>;

    /// Returns the shortest little-endian byte form: 2, 4 or 16 bytes.
    fn to_bluetooth_bytes(&self) -> Vec<u8>;
}

impl BluetoothUuidExt for Uuid {
    fn from_u16(uuid: u16) -> Self {
        bluetooth_uuid_from_u16(uuid)
    }

    fn from_u32(uuid: u32) -> Self {
        bluetooth_uuid_from_u32(uuid)
    }

    fn from_bluetooth_bytes(bytes: &[u8]) -> Result<Self> {
        if let Ok(x) = <[u8; UUID_BYTES_16_BIT]>::try_from(bytes) {
            Ok(Self::from_u16(u16::from_le_bytes(x)))
        } else if let Ok(x) = <[u8; UUID_BYTES_32_BIT]>::try_from(bytes) {
            Ok(Self::from_u32(u32::from_le_bytes(x)))
        } else if let Ok(x) = <[u8; UUID_BYTES_128_BIT]>::try_from(bytes) {
            Ok(Self::from_u128(u128::from_le_bytes(x)))
        } else {
            Err(Error::new(
                ErrorKind::InvalidLength,
                None,
                format!("uuid length {} is not 2, 4 or 16 bytes", bytes.len()),
            ))
        }
    }

    fn is_u16_uuid(&self) -> bool {
        let (msb, lsb) = self.as_u64_pair();
        lsb == BASE_UUID_LSB && (msb & 0xFFFF_0000_FFFF_FFFF) == BASE_UUID_MSB
    }

    fn is_u32_uuid(&self) -> bool {
        let (msb, lsb) = self.as_u64_pair();
        lsb == BASE_UUID_LSB && !self.is_u16_uuid() && (msb & 0xFFFF_FFFF) == BASE_UUID_MSB
    }

    fn service_identifier16(&self) -> u16 {
        let (msb, _) = self.as_u64_pair();
        ((msb & 0x0000_FFFF_0000_0000) >> 32) as u16
    }

    fn service_identifier32(&self) -> u32 {
        let (msb, _) = self.as_u64_pair();
        (msb >> 32) as u32
    }

    fn try_to_u16(&self) -> Option<u16> {
        self.is_u16_uuid().then(|| self.service_identifier16())
    }

    fn try_to_u32(&self) -> Option<u32> {
        (self.is_u16_uuid() || self.is_u32_uuid()).then(|| self.service_identifier32())
    }

    fn to_bluetooth_bytes(&self) -> Vec<u8> {
        if self.is_u16_uuid() {
            self.service_identifier16().to_le_bytes().to_vec()
        } else if self.is_u32_uuid() {
            self.service_identifier32().to_le_bytes().to_vec()
        } else {
            self.as_u128().to_le_bytes().to_vec()
        }
    }
}

mod private {
    use uuid::Uuid;

    pub trait Sealed {}

    impl Sealed for Uuid {}
}

/// Returns true if any UUID of `b` is in `a`.
///
/// A missing list is treated as empty. Two empty lists are compatible; otherwise an
/// empty list has nothing in common with the other one.
pub fn contains_any_uuid(a: Option<&[Uuid]>, b: Option<&[Uuid]>) -> bool {
    let (a, b) = (a.unwrap_or_default(), b.unwrap_or_default());
    if a.is_empty() && b.is_empty() {
        return true;
    }
    let set: HashSet<&Uuid> = a.iter().collect();
    b.iter().any(|uuid| set.contains(uuid))
}

/// Returns true if every UUID of `b` is in `a`. An empty or missing `b` is always satisfied.
pub fn contains_all_uuids(a: Option<&[Uuid]>, b: Option<&[Uuid]>) -> bool {
    let (a, b) = (a.unwrap_or_default(), b.unwrap_or_default());
    let set: HashSet<&Uuid> = a.iter().collect();
    b.iter().all(|uuid| set.contains(uuid))
}

/// Returns true if `uuid` is in `uuids`.
pub fn is_uuid_present(uuids: &[Uuid], uuid: &Uuid) -> bool {
    uuids.contains(uuid)
}

/// Service class UUIDs of the Bluetooth profiles.
pub mod services {
    #![allow(missing_docs)]

    use uuid::Uuid;

    use super::bluetooth_uuid_from_u16;

    pub const BNEP: Uuid = bluetooth_uuid_from_u16(0x000F);
    pub const OBEX_OBJECT_PUSH: Uuid = bluetooth_uuid_from_u16(0x1105);
    pub const HSP: Uuid = bluetooth_uuid_from_u16(0x1108);
    pub const AUDIO_SOURCE: Uuid = bluetooth_uuid_from_u16(0x110A);
    pub const AUDIO_SINK: Uuid = bluetooth_uuid_from_u16(0x110B);
    pub const AVRCP_TARGET: Uuid = bluetooth_uuid_from_u16(0x110C);
    pub const ADV_AUDIO_DIST: Uuid = bluetooth_uuid_from_u16(0x110D);
    pub const AVRCP_CONTROLLER: Uuid = bluetooth_uuid_from_u16(0x110E);
    pub const HSP_AG: Uuid = bluetooth_uuid_from_u16(0x1112);
    pub const PANU: Uuid = bluetooth_uuid_from_u16(0x1115);
    pub const NAP: Uuid = bluetooth_uuid_from_u16(0x1116);
    pub const HANDSFREE: Uuid = bluetooth_uuid_from_u16(0x111E);
    pub const HANDSFREE_AG: Uuid = bluetooth_uuid_from_u16(0x111F);
    pub const HID: Uuid = bluetooth_uuid_from_u16(0x1124);
    pub const SAP: Uuid = bluetooth_uuid_from_u16(0x112D);
    pub const PBAP_PCE: Uuid = bluetooth_uuid_from_u16(0x112E);
    pub const PBAP_PSE: Uuid = bluetooth_uuid_from_u16(0x112F);
    pub const MAS: Uuid = bluetooth_uuid_from_u16(0x1132);
    pub const MNS: Uuid = bluetooth_uuid_from_u16(0x1133);
    pub const MAP: Uuid = bluetooth_uuid_from_u16(0x1134);
    pub const HOGP: Uuid = bluetooth_uuid_from_u16(0x1812);
}

pub fn is_audio_source(uuid: &Uuid) -> bool {
    *uuid == services::AUDIO_SOURCE
}

pub fn is_audio_sink(uuid: &Uuid) -> bool {
    *uuid == services::AUDIO_SINK
}

pub fn is_adv_audio_dist(uuid: &Uuid) -> bool {
    *uuid == services::ADV_AUDIO_DIST
}

pub fn is_handsfree(uuid: &Uuid) -> bool {
    *uuid == services::HANDSFREE
}

pub fn is_headset(uuid: &Uuid) -> bool {
    *uuid == services::HSP
}

pub fn is_avrcp_controller(uuid: &Uuid) -> bool {
    *uuid == services::AVRCP_CONTROLLER
}

pub fn is_avrcp_target(uuid: &Uuid) -> bool {
    *uuid == services::AVRCP_TARGET
}

pub fn is_input_device(uuid: &Uuid) -> bool {
    *uuid == services::HID
}

pub fn is_panu(uuid: &Uuid) -> bool {
    *uuid == services::PANU
}

pub fn is_nap(uuid: &Uuid) -> bool {
    *uuid == services::NAP
}

pub fn is_bnep(uuid: &Uuid) -> bool {
    *uuid == services::BNEP
}

pub fn is_map(uuid: &Uuid) -> bool {
    *uuid == services::MAP
}

pub fn is_mns(uuid: &Uuid) -> bool {
    *uuid == services::MNS
}

pub fn is_mas(uuid: &Uuid) -> bool {
    *uuid == services::MAS
}

pub fn is_sap(uuid: &Uuid) -> bool {
    *uuid == services::SAP
}
