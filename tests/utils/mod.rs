#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use android_bt_profiles::error::RemoteError;
use android_bt_profiles::profiles::{
    A2dpService, A2dpSinkService, AudioConfig, AudioState, AvrcpControllerService,
    HeadsetService, InputDeviceService, KeyState, MapService, PanService, PassThroughKey,
    PbapService, ProtocolMode, SapService, ServerSessionService,
};
use android_bt_profiles::{
    AdapterStateNotifier, AdapterStateObserver, BluetoothDevice, BluetoothProfile,
    ConnectionState, ObserverId, Priority, ProfileId, ProfileService, RemoteResult, Result,
    ServiceBinder, ServiceConnection, ServiceEvent, ServiceListener,
};

pub const PEER: &str = "AA:BB:CC:DD:EE:FF";

/// Binder that records every connection it is handed.
pub struct MockBinder<S: ?Sized + Send + Sync + 'static> {
    service: Arc<S>,
    immediate: AtomicBool,
    connections: Mutex<Vec<ServiceConnection<S>>>,
    unbinds: AtomicUsize,
}

impl<S: ?Sized + Send + Sync + 'static> MockBinder<S> {
    /// With `immediate` set, every bind succeeds before `bind` returns.
    pub fn new(service: Arc<S>, immediate: bool) -> Arc<Self> {
        Arc::new(Self {
            service,
            immediate: AtomicBool::new(immediate),
            connections: Mutex::new(Vec::new()),
            unbinds: AtomicUsize::new(0),
        })
    }

    pub fn set_immediate(&self, immediate: bool) {
        self.immediate.store(immediate, Ordering::SeqCst);
    }

    fn last_connection(&self) -> ServiceConnection<S> {
        self.connections.lock().unwrap().last().cloned().unwrap()
    }

    /// Completes the most recent bind attempt.
    pub fn complete(&self) {
        self.last_connection().on_service_connected(self.service.clone());
    }

    /// Reports that the remote process of the most recent binding died.
    pub fn kill(&self) {
        self.last_connection().on_service_disconnected();
    }

    pub fn binds(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    pub fn unbinds(&self) -> usize {
        self.unbinds.load(Ordering::SeqCst)
    }
}

impl<S: ?Sized + Send + Sync + 'static> ServiceBinder<S> for MockBinder<S> {
    fn bind(&self, _profile: ProfileId, connection: ServiceConnection<S>) -> Result<()> {
        self.connections.lock().unwrap().push(connection.clone());
        if self.immediate.load(Ordering::SeqCst) {
            connection.on_service_connected(self.service.clone());
        }
        Ok(())
    }

    fn unbind(&self, _profile: ProfileId, _connection: &ServiceConnection<S>) {
        self.unbinds.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ServiceEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<ServiceEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ServiceListener for RecordingListener {
    fn on_service_connected(&self, profile: ProfileId, _proxy: Arc<dyn BluetoothProfile>) {
        self.events.lock().unwrap().push(ServiceEvent::Connected(profile));
    }

    fn on_service_disconnected(&self, profile: ProfileId) {
        self.events.lock().unwrap().push(ServiceEvent::Disconnected(profile));
    }
}

/// Shared bookkeeping of the fake services.
#[derive(Default)]
pub struct CallCounter {
    calls: AtomicUsize,
    dead: AtomicBool,
}

impl CallCounter {
    pub fn answer<T>(&self, value: T) -> RemoteResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.dead.load(Ordering::SeqCst) {
            Err(RemoteError::DeadObject)
        } else {
            Ok(value)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_dead(&self, dead: bool) {
        self.dead.store(dead, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeA2dp {
    pub counter: CallCounter,
    playing: AtomicBool,
}

impl FakeA2dp {
    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
    }
}

impl ProfileService for FakeA2dp {
    fn connect(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn disconnect(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn connected_devices(&self) -> RemoteResult<Vec<BluetoothDevice>> {
        self.counter.answer(vec![BluetoothDevice::new(PEER)])
    }

    fn devices_matching_connection_states(
        &self,
        _states: &[ConnectionState],
    ) -> RemoteResult<Vec<BluetoothDevice>> {
        self.counter.answer(vec![BluetoothDevice::new(PEER)])
    }

    fn connection_state(&self, _device: &BluetoothDevice) -> RemoteResult<ConnectionState> {
        self.counter.answer(ConnectionState::Connected)
    }

    fn set_priority(&self, _device: &BluetoothDevice, _priority: Priority) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn priority(&self, _device: &BluetoothDevice) -> RemoteResult<Priority> {
        self.counter.answer(Priority::ON)
    }
}

impl A2dpService for FakeA2dp {
    fn is_a2dp_playing(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(self.playing.load(Ordering::SeqCst))
    }
}

/// MAP server with one connected client. It implements no `connect`.
#[derive(Default)]
pub struct FakeMap {
    pub counter: CallCounter,
}

impl ProfileService for FakeMap {
    fn disconnect(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn connected_devices(&self) -> RemoteResult<Vec<BluetoothDevice>> {
        self.counter.answer(vec![BluetoothDevice::new(PEER)])
    }

    fn devices_matching_connection_states(
        &self,
        _states: &[ConnectionState],
    ) -> RemoteResult<Vec<BluetoothDevice>> {
        self.counter.answer(Vec::new())
    }

    fn connection_state(&self, _device: &BluetoothDevice) -> RemoteResult<ConnectionState> {
        self.counter.answer(ConnectionState::Connected)
    }
}

impl ServerSessionService for FakeMap {
    fn state(&self) -> RemoteResult<ConnectionState> {
        self.counter.answer(ConnectionState::Connected)
    }

    fn client(&self) -> RemoteResult<Option<BluetoothDevice>> {
        self.counter.answer(Some(BluetoothDevice::new(PEER)))
    }

    fn is_connected(&self, device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(device.address() == PEER)
    }
}

impl MapService for FakeMap {}

/// Adapter that reads as powered, but is switched off while that reading is taken.
#[derive(Default)]
pub struct PoweringOffAdapter {
    enabled: AtomicBool,
    observer: Mutex<Option<Weak<dyn AdapterStateObserver>>>,
}

impl PoweringOffAdapter {
    pub fn is_powered(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl AdapterStateNotifier for PoweringOffAdapter {
    fn is_enabled(&self) -> bool {
        let observer = self.observer.lock().unwrap().clone();
        self.enabled.store(false, Ordering::SeqCst);
        if let Some(observer) = observer.and_then(|observer| observer.upgrade()) {
            observer.on_adapter_state_changed(false);
        }
        true
    }

    fn register(&self, _id: ObserverId, observer: Weak<dyn AdapterStateObserver>) {
        *self.observer.lock().unwrap() = Some(observer);
    }

    fn unregister(&self, _id: ObserverId) {
        self.observer.lock().unwrap().take();
    }
}

/// Serves every profile, answering with non-default values.
#[derive(Default)]
pub struct EveryProfile {
    pub counter: CallCounter,
}

pub const SINK_CONFIG: AudioConfig = AudioConfig {
    sample_rate: 44_100,
    channel_config: 12,
    audio_format: 2,
};

impl ProfileService for EveryProfile {
    fn connect(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn disconnect(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn connected_devices(&self) -> RemoteResult<Vec<BluetoothDevice>> {
        self.counter.answer(vec![BluetoothDevice::new(PEER)])
    }

    fn devices_matching_connection_states(
        &self,
        _states: &[ConnectionState],
    ) -> RemoteResult<Vec<BluetoothDevice>> {
        self.counter.answer(vec![BluetoothDevice::new(PEER)])
    }

    fn connection_state(&self, _device: &BluetoothDevice) -> RemoteResult<ConnectionState> {
        self.counter.answer(ConnectionState::Connected)
    }

    fn set_priority(&self, _device: &BluetoothDevice, _priority: Priority) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn priority(&self, _device: &BluetoothDevice) -> RemoteResult<Priority> {
        self.counter.answer(Priority::ON)
    }
}

impl A2dpService for EveryProfile {
    fn is_a2dp_playing(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }
}

impl A2dpSinkService for EveryProfile {
    fn is_a2dp_playing(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn audio_config(&self, _device: &BluetoothDevice) -> RemoteResult<Option<AudioConfig>> {
        self.counter.answer(Some(SINK_CONFIG))
    }
}

impl AvrcpControllerService for EveryProfile {
    fn send_pass_through_cmd(
        &self,
        _device: &BluetoothDevice,
        _key: PassThroughKey,
        _state: KeyState,
    ) -> RemoteResult<()> {
        self.counter.answer(())
    }
}

impl HeadsetService for EveryProfile {
    fn is_audio_connected(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn audio_state(&self, _device: &BluetoothDevice) -> RemoteResult<AudioState> {
        self.counter.answer(AudioState::Connected)
    }

    fn start_voice_recognition(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn stop_voice_recognition(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }
}

impl InputDeviceService for EveryProfile {
    fn virtual_unplug(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn protocol_mode(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }

    fn set_protocol_mode(
        &self,
        _device: &BluetoothDevice,
        _mode: ProtocolMode,
    ) -> RemoteResult<bool> {
        self.counter.answer(true)
    }
}

impl PanService for EveryProfile {
    fn set_bluetooth_tethering(&self, _enabled: bool) -> RemoteResult<()> {
        self.counter.answer(())
    }

    fn is_tethering_on(&self) -> RemoteResult<bool> {
        self.counter.answer(true)
    }
}

impl ServerSessionService for EveryProfile {
    fn state(&self) -> RemoteResult<ConnectionState> {
        self.counter.answer(ConnectionState::Connected)
    }

    fn client(&self) -> RemoteResult<Option<BluetoothDevice>> {
        self.counter.answer(Some(BluetoothDevice::new(PEER)))
    }

    fn is_connected(&self, _device: &BluetoothDevice) -> RemoteResult<bool> {
        self.counter.answer(true)
    }
}

impl MapService for EveryProfile {}
impl PbapService for EveryProfile {}
impl SapService for EveryProfile {}
