mod utils;

use std::sync::Arc;

use android_bt_profiles::profiles::{
    A2dpService, A2dpSinkService, AudioState, AvrcpControllerService, HeadsetService,
    InputDeviceService, KeyState, MapService, PanService, PassThroughKey, PbapService,
    ProtocolMode, SapService, ServerSessionService,
};
use android_bt_profiles::{
    AdapterStateBroadcaster, BluetoothDevice, ConnectionState, Priority, ProfileProxy, ProxyConfig,
    RemoteProfile,
};
use utils::{EveryProfile, MockBinder, PEER, SINK_CONFIG};

/// Runs `defaults` on a proxy that never bound and again after it was bound and closed
/// twice, checking that neither reaches the service. `forwarded` runs while bound.
fn check_profile<S: ?Sized + RemoteProfile>(
    service: Arc<S>,
    fake: &EveryProfile,
    forwarded: impl Fn(&ProfileProxy<S>),
    defaults: impl Fn(&ProfileProxy<S>),
) {
    let adapter = Arc::new(AdapterStateBroadcaster::new(false));
    let binder = MockBinder::new(service, true);
    let proxy = ProfileProxy::<S>::new(
        binder.clone(),
        adapter.clone(),
        None,
        ProxyConfig::default(),
    );

    check_common_defaults(&proxy);
    defaults(&proxy);
    assert_eq!(fake.counter.calls(), 0);

    adapter.set_enabled(true);
    assert!(proxy.is_bound());
    forwarded(&proxy);
    assert!(fake.counter.calls() > 0);

    proxy.close();
    proxy.close();
    assert_eq!(binder.unbinds(), 1);
    let calls = fake.counter.calls();
    check_common_defaults(&proxy);
    defaults(&proxy);
    assert_eq!(fake.counter.calls(), calls);
}

fn check_common_defaults<S: ?Sized + RemoteProfile>(proxy: &ProfileProxy<S>) {
    let peer = BluetoothDevice::new(PEER);
    assert!(!proxy.connect(&peer));
    assert!(!proxy.disconnect(&peer));
    assert!(proxy.connected_devices().is_empty());
    assert!(proxy
        .devices_matching_connection_states(&[ConnectionState::Connected])
        .is_empty());
    assert_eq!(proxy.connection_state(&peer), ConnectionState::Disconnected);
    assert!(!proxy.set_priority(&peer, Priority::ON));
    assert_eq!(proxy.priority(&peer), Priority::OFF);
}

#[test]
fn a2dp_defaults() {
    let fake = Arc::new(EveryProfile::default());
    let peer = BluetoothDevice::new(PEER);
    check_profile::<dyn A2dpService>(
        fake.clone(),
        &fake,
        |a2dp| assert!(a2dp.is_a2dp_playing(&peer)),
        |a2dp| assert!(!a2dp.is_a2dp_playing(&peer)),
    );
}

#[test]
fn a2dp_sink_defaults() {
    let fake = Arc::new(EveryProfile::default());
    let peer = BluetoothDevice::new(PEER);
    check_profile::<dyn A2dpSinkService>(
        fake.clone(),
        &fake,
        |sink| {
            assert!(sink.is_a2dp_playing(&peer));
            assert_eq!(sink.audio_config(&peer), Some(SINK_CONFIG));
        },
        |sink| {
            assert!(!sink.is_a2dp_playing(&peer));
            assert_eq!(sink.audio_config(&peer), None);
        },
    );
}

#[test]
fn avrcp_controller_defaults() {
    let fake = Arc::new(EveryProfile::default());
    let peer = BluetoothDevice::new(PEER);
    check_profile::<dyn AvrcpControllerService>(
        fake.clone(),
        &fake,
        |avrcp| avrcp.send_pass_through_cmd(&peer, PassThroughKey::PLAY, KeyState::Pressed),
        |avrcp| {
            avrcp.send_pass_through_cmd(&peer, PassThroughKey::PLAY, KeyState::Pressed);
            avrcp.send_pass_through_cmd(&peer, PassThroughKey::PLAY, KeyState::Released);
        },
    );
}

#[test]
fn headset_defaults() {
    let fake = Arc::new(EveryProfile::default());
    let peer = BluetoothDevice::new(PEER);
    check_profile::<dyn HeadsetService>(
        fake.clone(),
        &fake,
        |headset| {
            assert!(headset.is_audio_connected(&peer));
            assert_eq!(headset.audio_state(&peer), AudioState::Connected);
            assert!(headset.start_voice_recognition(&peer));
            assert!(headset.stop_voice_recognition(&peer));
        },
        |headset| {
            assert!(!headset.is_audio_connected(&peer));
            assert_eq!(headset.audio_state(&peer), AudioState::Disconnected);
            assert_eq!(headset.audio_state(&peer).as_raw(), 10);
            assert!(!headset.start_voice_recognition(&peer));
            assert!(!headset.stop_voice_recognition(&peer));
        },
    );
}

#[test]
fn input_device_defaults() {
    let fake = Arc::new(EveryProfile::default());
    let peer = BluetoothDevice::new(PEER);
    check_profile::<dyn InputDeviceService>(
        fake.clone(),
        &fake,
        |hid| {
            assert!(hid.virtual_unplug(&peer));
            assert!(hid.protocol_mode(&peer));
            assert!(hid.set_protocol_mode(&peer, ProtocolMode::Boot));
        },
        |hid| {
            assert!(!hid.virtual_unplug(&peer));
            assert!(!hid.protocol_mode(&peer));
            assert!(!hid.set_protocol_mode(&peer, ProtocolMode::Report));
        },
    );
}

#[test]
fn pan_defaults() {
    let fake = Arc::new(EveryProfile::default());
    check_profile::<dyn PanService>(
        fake.clone(),
        &fake,
        |pan| {
            pan.set_bluetooth_tethering(true);
            assert!(pan.is_tethering_on());
        },
        |pan| {
            pan.set_bluetooth_tethering(true);
            assert!(!pan.is_tethering_on());
        },
    );
}

fn check_session_server<S: ?Sized + RemoteProfile + ServerSessionService>(
    service: Arc<S>,
    fake: &EveryProfile,
) {
    let peer = BluetoothDevice::new(PEER);
    check_profile::<S>(
        service,
        fake,
        |server| {
            assert_eq!(server.state(), Some(ConnectionState::Connected));
            assert_eq!(server.client(), Some(peer.clone()));
            assert!(server.is_connected(&peer));
        },
        |server| {
            assert_eq!(server.state(), None);
            assert_eq!(server.client(), None);
            assert!(!server.is_connected(&peer));
        },
    );
}

#[test]
fn map_defaults() {
    let fake = Arc::new(EveryProfile::default());
    check_session_server::<dyn MapService>(fake.clone(), &fake);
}

#[test]
fn pbap_defaults() {
    let fake = Arc::new(EveryProfile::default());
    check_session_server::<dyn PbapService>(fake.clone(), &fake);
}

#[test]
fn sap_defaults() {
    let fake = Arc::new(EveryProfile::default());
    check_session_server::<dyn SapService>(fake.clone(), &fake);
}
