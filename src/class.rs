//! Bluetooth Class of Device.
//!
//! The 24-bit class advertised by a remote device only hints at what it can do; the
//! profiles actually supported are found through SDP. [DeviceClass::does_class_match]
//! is the heuristic used when no SDP record is available yet.

/// Service class bits (bits 13..24).
pub mod service {
    pub const BITMASK: u32 = 0xFFE000;

    pub const LIMITED_DISCOVERABILITY: u32 = 0x002000;
    pub const POSITIONING: u32 = 0x010000;
    pub const NETWORKING: u32 = 0x020000;
    pub const RENDER: u32 = 0x040000;
    pub const CAPTURE: u32 = 0x080000;
    pub const OBJECT_TRANSFER: u32 = 0x100000;
    pub const AUDIO: u32 = 0x200000;
    pub const TELEPHONY: u32 = 0x400000;
    pub const INFORMATION: u32 = 0x800000;
}

/// Major device classes (bits 8..13).
pub mod major {
    pub const BITMASK: u32 = 0x1F00;

    pub const MISC: u32 = 0x0000;
    pub const COMPUTER: u32 = 0x0100;
    pub const PHONE: u32 = 0x0200;
    pub const NETWORKING: u32 = 0x0300;
    pub const AUDIO_VIDEO: u32 = 0x0400;
    pub const PERIPHERAL: u32 = 0x0500;
    pub const IMAGING: u32 = 0x0600;
    pub const WEARABLE: u32 = 0x0700;
    pub const TOY: u32 = 0x0800;
    pub const HEALTH: u32 = 0x0900;
    pub const UNCATEGORIZED: u32 = 0x1F00;
}

/// Major and minor device classes combined (bits 2..13).
pub mod device {
    pub const BITMASK: u32 = 0x1FFC;

    pub const COMPUTER_UNCATEGORIZED: u32 = 0x0100;
    pub const COMPUTER_DESKTOP: u32 = 0x0104;
    pub const COMPUTER_SERVER: u32 = 0x0108;
    pub const COMPUTER_LAPTOP: u32 = 0x010C;
    pub const COMPUTER_HANDHELD_PC_PDA: u32 = 0x0110;
    pub const COMPUTER_PALM_SIZE_PC_PDA: u32 = 0x0114;
    pub const COMPUTER_WEARABLE: u32 = 0x0118;

    pub const PHONE_UNCATEGORIZED: u32 = 0x0200;
    pub const PHONE_CELLULAR: u32 = 0x0204;
    pub const PHONE_CORDLESS: u32 = 0x0208;
    pub const PHONE_SMART: u32 = 0x020C;
    pub const PHONE_MODEM_OR_GATEWAY: u32 = 0x0210;
    pub const PHONE_ISDN: u32 = 0x0214;

    pub const AUDIO_VIDEO_UNCATEGORIZED: u32 = 0x0400;
    pub const AUDIO_VIDEO_WEARABLE_HEADSET: u32 = 0x0404;
    pub const AUDIO_VIDEO_HANDSFREE: u32 = 0x0408;
    pub const AUDIO_VIDEO_MICROPHONE: u32 = 0x0410;
    pub const AUDIO_VIDEO_LOUDSPEAKER: u32 = 0x0414;
    pub const AUDIO_VIDEO_HEADPHONES: u32 = 0x0418;
    pub const AUDIO_VIDEO_PORTABLE_AUDIO: u32 = 0x041C;
    pub const AUDIO_VIDEO_CAR_AUDIO: u32 = 0x0420;
    pub const AUDIO_VIDEO_SET_TOP_BOX: u32 = 0x0424;
    pub const AUDIO_VIDEO_HIFI_AUDIO: u32 = 0x0428;
    pub const AUDIO_VIDEO_VCR: u32 = 0x042C;
    pub const AUDIO_VIDEO_VIDEO_CAMERA: u32 = 0x0430;
    pub const AUDIO_VIDEO_CAMCORDER: u32 = 0x0434;
    pub const AUDIO_VIDEO_VIDEO_MONITOR: u32 = 0x0438;
    pub const AUDIO_VIDEO_VIDEO_DISPLAY_AND_LOUDSPEAKER: u32 = 0x043C;
    pub const AUDIO_VIDEO_VIDEO_CONFERENCING: u32 = 0x0440;
    pub const AUDIO_VIDEO_VIDEO_GAMING_TOY: u32 = 0x0448;

    pub const PERIPHERAL_NON_KEYBOARD_NON_POINTING: u32 = 0x0500;
    pub const PERIPHERAL_KEYBOARD: u32 = 0x0540;
    pub const PERIPHERAL_POINTING: u32 = 0x0580;
    pub const PERIPHERAL_KEYBOARD_POINTING: u32 = 0x05C0;
}

/// Profiles that can be guessed from a class of device.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassProfile {
    Headset,
    A2dp,
    Opp,
    Hid,
    Panu,
    Nap,
    A2dpSink,
}

/// A Bluetooth Class of Device value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceClass(u32);

impl DeviceClass {
    pub const fn new(class: u32) -> Self {
        Self(class)
    }

    pub const fn as_raw(self) -> u32 {
        self.0
    }

    /// Whether the given [service] bit is set.
    pub fn has_service(self, service: u32) -> bool {
        (self.0 & service::BITMASK & service) != 0
    }

    /// The [major] device class.
    pub fn major_device_class(self) -> u32 {
        self.0 & major::BITMASK
    }

    /// The combined major and minor [device] class.
    pub fn device_class(self) -> u32 {
        self.0 & device::BITMASK
    }

    /// Guesses whether a device of this class supports `profile`.
    pub fn does_class_match(self, profile: ClassProfile) -> bool {
        use device::*;

        match profile {
            ClassProfile::A2dp => {
                self.has_service(service::RENDER)
                    || matches!(
                        self.device_class(),
                        AUDIO_VIDEO_HIFI_AUDIO
                            | AUDIO_VIDEO_HEADPHONES
                            | AUDIO_VIDEO_LOUDSPEAKER
                            | AUDIO_VIDEO_CAR_AUDIO
                    )
            }
            ClassProfile::A2dpSink => {
                self.has_service(service::CAPTURE)
                    || matches!(
                        self.device_class(),
                        AUDIO_VIDEO_HIFI_AUDIO | AUDIO_VIDEO_SET_TOP_BOX | AUDIO_VIDEO_VCR
                    )
            }
            ClassProfile::Headset => {
                self.has_service(service::RENDER)
                    || matches!(
                        self.device_class(),
                        AUDIO_VIDEO_HANDSFREE
                            | AUDIO_VIDEO_WEARABLE_HEADSET
                            | AUDIO_VIDEO_CAR_AUDIO
                    )
            }
            ClassProfile::Opp => {
                self.has_service(service::OBJECT_TRANSFER)
                    || matches!(
                        self.device_class(),
                        COMPUTER_UNCATEGORIZED
                            | COMPUTER_DESKTOP
                            | COMPUTER_SERVER
                            | COMPUTER_LAPTOP
                            | COMPUTER_HANDHELD_PC_PDA
                            | COMPUTER_PALM_SIZE_PC_PDA
                            | COMPUTER_WEARABLE
                            | PHONE_UNCATEGORIZED
                            | PHONE_CELLULAR
                            | PHONE_CORDLESS
                            | PHONE_SMART
                            | PHONE_MODEM_OR_GATEWAY
                            | PHONE_ISDN
                    )
            }
            // These two compare bit patterns rather than the major class value,
            // so e.g. WEARABLE (0x0700) also matches both.
            ClassProfile::Hid => (self.device_class() & major::PERIPHERAL) == major::PERIPHERAL,
            ClassProfile::Panu | ClassProfile::Nap => {
                self.has_service(service::NETWORKING)
                    || (self.device_class() & major::NETWORKING) == major::NETWORKING
            }
        }
    }
}

impl From<u32> for DeviceClass {
    fn from(class: u32) -> Self {
        Self(class)
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}
