//! Defines error types.
//!
//! Most profile operations never return these errors: unbound proxies, invalid devices
//! and failed remote calls are absorbed and turned into the documented default value.
//! The `try_*` methods of [crate::ProfileProxy] expose the same failures as [Error]s.

use std::fmt::Debug;
use std::num::NonZeroI32;

/// Failure reported by a remote profile service while a call was forwarded to it.
#[derive(Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The process hosting the remote service has died.
    DeadObject,
    /// The IPC transport failed for another reason.
    Transport(String),
    /// The remote service answered with a non-success status code.
    Status(BluetoothStatusCode),
}

impl std::error::Error for RemoteError {}

impl std::fmt::Debug for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeadObject => write!(f, "DeadObject"),
            Self::Transport(msg) => write!(f, "Transport({msg:?})"),
            Self::Status(code) => write!(f, "Status({code:?})"),
        }
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeadObject => write!(f, "the remote service process has died"),
            Self::Transport(msg) => write!(f, "IPC transport failure: {msg}"),
            Self::Status(st) => write!(f, "{st}"),
        }
    }
}

impl From<BluetoothStatusCode> for RemoteError {
    fn from(code: BluetoothStatusCode) -> Self {
        Self::Status(code)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind,
            source: None,
            message: String::new(),
        }
    }
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        use BluetoothStatusCode::*;
        let kind = match &err {
            RemoteError::DeadObject | RemoteError::Transport(_) => ErrorKind::RemoteCommunication,
            RemoteError::Status(code) => match code {
                NotAllowed => ErrorKind::NotAuthorized,
                NotEnabled => ErrorKind::AdapterUnavailable,
                NotBonded => ErrorKind::NotAuthorized,
                MissingBluetoothConnectPermission => ErrorKind::NotAuthorized,
                ProfileServiceNotBound => ErrorKind::NotBound,
                FeatureNotSupported => ErrorKind::NotSupported,
                DeviceNotConnected | Timeout | Unknown | UnknownError(_) => {
                    ErrorKind::RemoteCommunication
                }
            },
        };
        let msg = err.to_string();
        Error::new(kind, Some(err), msg)
    }
}

/// See <https://developer.android.com/reference/android/bluetooth/BluetoothStatusCodes>.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BluetoothStatusCode {
    NotEnabled,
    NotAllowed,
    NotBonded,
    DeviceNotConnected,
    MissingBluetoothConnectPermission,
    ProfileServiceNotBound,
    FeatureNotSupported,
    Timeout,
    Unknown,
    UnknownError(NonZeroI32),
}

impl BluetoothStatusCode {
    pub const ERROR_BLUETOOTH_NOT_ENABLED: i32 = 1;
    pub const ERROR_BLUETOOTH_NOT_ALLOWED: i32 = 2;
    pub const ERROR_DEVICE_NOT_BONDED: i32 = 3;
    pub const ERROR_DEVICE_NOT_CONNECTED: i32 = 4;
    pub const ERROR_MISSING_BLUETOOTH_CONNECT_PERMISSION: i32 = 6;
    pub const ERROR_PROFILE_SERVICE_NOT_BOUND: i32 = 9;
    pub const FEATURE_NOT_SUPPORTED: i32 = 11;
    pub const ERROR_TIMEOUT: i32 = 15;
    pub const ERROR_UNKNOWN: i32 = i32::MAX;

    /// Converts a raw status code returned by a remote call; `0` means success.
    pub fn check(code: i32) -> Result<(), Self> {
        match NonZeroI32::new(code) {
            None => Ok(()),
            Some(code) => Err(Self::from(code)),
        }
    }
}

impl std::fmt::Display for BluetoothStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let err_str = match self {
            Self::NotEnabled =>
                "Error code indicating that Bluetooth is not enabled.",
            Self::NotAllowed =>
                "Error code indicating that the API call was initiated by neither the system nor the active user.",
            Self::NotBonded =>
                "Error code indicating that the Bluetooth Device specified is not bonded.",
            Self::DeviceNotConnected =>
                "Error code indicating that the Bluetooth Device specified is not connected.",
            Self::MissingBluetoothConnectPermission =>
                "Error code indicating that the caller does not have the Manifest.permission.BLUETOOTH_CONNECT permission.",
            Self::ProfileServiceNotBound =>
                "Error code indicating that the profile service is not bound.",
            Self::FeatureNotSupported =>
                "Indicates that the feature is not supported.",
            Self::Timeout =>
                "Indicates that the remote operation timed out.",
            Self::Unknown =>
                "Indicates that an unknown error has occurred.",
            Self::UnknownError(code) => {
                return f.write_str(&format!("Unknown Error with code {code}"));
            }
        };
        f.write_str(err_str)
    }
}

impl From<NonZeroI32> for BluetoothStatusCode {
    fn from(code: NonZeroI32) -> Self {
        match code.get() {
            Self::ERROR_BLUETOOTH_NOT_ENABLED => Self::NotEnabled,
            Self::ERROR_BLUETOOTH_NOT_ALLOWED => Self::NotAllowed,
            Self::ERROR_DEVICE_NOT_BONDED => Self::NotBonded,
            Self::ERROR_DEVICE_NOT_CONNECTED => Self::DeviceNotConnected,
            Self::ERROR_MISSING_BLUETOOTH_CONNECT_PERMISSION => {
                Self::MissingBluetoothConnectPermission
            }
            Self::ERROR_PROFILE_SERVICE_NOT_BOUND => Self::ProfileServiceNotBound,
            Self::FEATURE_NOT_SUPPORTED => Self::FeatureNotSupported,
            Self::ERROR_TIMEOUT => Self::Timeout,
            Self::ERROR_UNKNOWN => Self::Unknown,
            _ => Self::UnknownError(code),
        }
    }
}

/// The error type for Bluetooth profile operations.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<RemoteError>,
    message: String,
}

impl Error {
    pub(crate) fn new<S: ToString>(
        kind: ErrorKind,
        source: Option<RemoteError>,
        message: S,
    ) -> Self {
        Error {
            kind,
            source,
            message: message.to_string(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message for this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.message.is_empty(), &self.source) {
            (true, None) => write!(f, "{}", &self.kind),
            (false, None) => write!(f, "{}: {}", &self.kind, &self.message),
            (_, Some(err)) => write!(f, "{}: {}", &self.kind, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|x| {
            let x: &(dyn std::error::Error + 'static) = x;
            x
        })
    }
}

/// A list of general categories of profile errors.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// the profile proxy is not bound to its remote service
    NotBound,
    /// binding to the remote service failed
    BindFailed,
    /// the Bluetooth adapter is not available
    AdapterUnavailable,
    /// invalid parameter
    InvalidParameter,
    /// communication with the remote service failed
    RemoteCommunication,
    /// invalid UUID byte length
    InvalidLength,
    /// permission denied
    NotAuthorized,
    /// the Bluetooth operation is unsupported
    NotSupported,
    /// error
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotBound => f.write_str("the profile proxy is not bound to its remote service"),
            ErrorKind::BindFailed => f.write_str("binding to the remote service failed"),
            ErrorKind::AdapterUnavailable => f.write_str("the Bluetooth adapter is not available"),
            ErrorKind::InvalidParameter => f.write_str("invalid parameter"),
            ErrorKind::RemoteCommunication => f.write_str("communication with the remote service failed"),
            ErrorKind::InvalidLength => f.write_str("invalid UUID byte length"),
            ErrorKind::NotAuthorized => f.write_str("permission denied"),
            ErrorKind::NotSupported => f.write_str("the Bluetooth operation is unsupported"),
            ErrorKind::Other => f.write_str("error"),
        }
    }
}
