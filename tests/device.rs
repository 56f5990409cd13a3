mod common;

use common::{PinError, RecordingDelay, RecordingPin, SimCodec};
use es8311::{AudioCodec, BusAddress, BusConfig, DeviceError, Error, State};

#[test]
fn begin_applies_board_defaults() {
    let sim = SimCodec::new();
    let pin = RecordingPin::default();
    let mut device =
        AudioCodec::with_amplifier(BusAddress::CeLow, RecordingDelay::default(), pin.clone());
    let handle = sim.clone();

    device.begin(BusConfig::new(15, 14), |_| handle).unwrap();

    assert_eq!(*pin.levels.borrow(), vec![true]);
    assert_eq!(device.state(), State::Configured);
    // 70 % is register 178
    assert_eq!(sim.reg(0x32), 178);
    assert_eq!(device.get_volume().unwrap(), 70);
    assert_eq!(device.settings().bits_per_sample, 16);
    assert_eq!(device.settings().sample_rate_hz, 48_000);
    assert_eq!(device.settings().volume, 70);
}

#[test]
fn amplifier_goes_high_before_the_codec_is_touched() {
    let sim = SimCodec::new();
    let pin = RecordingPin::default();
    let mut device =
        AudioCodec::with_amplifier(BusAddress::CeLow, RecordingDelay::default(), pin.clone());
    let seen = pin.levels.clone();
    let handle = sim.clone();

    device
        .begin(BusConfig::new(15, 14), |_| {
            assert_eq!(*seen.borrow(), vec![true]);
            handle
        })
        .unwrap();
}

#[test]
fn custom_defaults() {
    let sim = SimCodec::new();
    let mut device = AudioCodec::new(BusAddress::CeLow, RecordingDelay::default())
        .with_volume(30)
        .with_bits_per_sample(24);
    let handle = sim.clone();

    device.begin(BusConfig::new(15, 14), |_| handle).unwrap();

    assert_eq!(sim.reg(0x32), 75);
    assert_eq!(sim.reg(0x09), 0);
    assert_eq!(sim.reg(0x0A), 0);
    assert_eq!(device.settings().bits_per_sample, 24);
}

#[test]
fn volume_default_is_clamped() {
    let device: AudioCodec<SimCodec, RecordingDelay> =
        AudioCodec::new(BusAddress::CeLow, RecordingDelay::default()).with_volume(180);
    assert_eq!(device.volume(), 100);
}

#[test]
fn bad_default_bit_depth_is_reported() {
    let sim = SimCodec::new();
    let mut device =
        AudioCodec::new(BusAddress::CeLow, RecordingDelay::default()).with_bits_per_sample(12);
    let handle = sim.clone();

    let result = device.begin(BusConfig::new(15, 14), |_| handle);

    assert_eq!(
        result,
        Err(DeviceError::Codec(Error::UnsupportedWordLength(12)))
    );
    // The codec itself still came up at its own default
    assert_eq!(device.settings().bits_per_sample, 16);
}

#[test]
fn flaky_bring_up_still_applies_defaults() {
    let sim = SimCodec::new();
    let mut device = AudioCodec::new(BusAddress::CeLow, RecordingDelay::default());
    sim.fail_writes_to(0x37);
    let handle = sim.clone();

    let result = device.begin(BusConfig::new(15, 14), |_| handle);

    assert!(matches!(
        result,
        Err(DeviceError::Codec(Error::BusTransactionFailed {
            register: 0x37,
            ..
        }))
    ));
    assert_eq!(device.state(), State::Faulted);
    assert_eq!(sim.reg(0x32), 178);
    assert_eq!(sim.reg(0x09), 0x0C);
    assert_eq!(device.settings().volume, 70);
}

#[test]
fn broken_amplifier_pin_stops_begin() {
    let sim = SimCodec::new();
    let pin = RecordingPin {
        broken: true,
        ..RecordingPin::default()
    };
    let mut device = AudioCodec::with_amplifier(BusAddress::CeLow, RecordingDelay::default(), pin);
    let handle = sim.clone();

    let result = device.begin(BusConfig::new(15, 14), |_| handle);

    assert_eq!(result, Err(DeviceError::Amplifier(PinError)));
    assert_eq!(device.state(), State::Uninitialized);
    assert_eq!(sim.transactions(), 0);
}

#[test]
fn missing_device_is_passed_up() {
    let sim = SimCodec::absent();
    let mut device = AudioCodec::new(BusAddress::CeLow, RecordingDelay::default());
    let handle = sim.clone();
    assert_eq!(
        device.begin(BusConfig::new(15, 14), |_| handle),
        Err(DeviceError::Codec(Error::DeviceNotFound))
    );
}

#[test]
fn pass_through_operations() {
    let sim = SimCodec::new();
    let pin = RecordingPin::default();
    let mut device =
        AudioCodec::with_amplifier(BusAddress::CeLow, RecordingDelay::default(), pin.clone());
    let handle = sim.clone();
    device.begin(BusConfig::new(15, 14), |_| handle).unwrap();

    device.set_volume(50).unwrap();
    assert_eq!(device.volume(), 50);
    assert_eq!(sim.reg(0x32), 127);

    device.set_sample_rate(22_050).unwrap();
    assert_eq!(device.settings().sample_rate_hz, 22_050);
    assert_eq!(
        device.set_sample_rate(12_345),
        Err(Error::UnsupportedRate(12_345))
    );

    device.set_bits_per_sample(20).unwrap();
    assert_eq!(sim.reg(0x09), 1 << 2);

    device.enable_microphone(true).unwrap();
    assert_eq!(sim.reg(0x14), 0x5A);
    device.set_microphone_gain(3).unwrap();
    assert_eq!(device.get_microphone_gain().unwrap(), 3);

    assert_eq!(device.dump_registers().get(0x32), 127);

    device.set_amplifier_enabled(false).unwrap();
    assert_eq!(*pin.levels.borrow(), vec![true, false]);

    let (codec, _pin) = device.release();
    assert_eq!(codec.sample_rate_hz(), 22_050);
}

#[test]
fn errors_can_be_printed() {
    let missing: DeviceError<common::SimError, PinError> = Error::DeviceNotFound.into();
    assert_eq!(missing.to_string(), "codec: ES8311 not found");

    let pin: DeviceError<common::SimError, PinError> = DeviceError::Amplifier(PinError);
    assert_eq!(pin.to_string(), "amplifier pin: PinError");
}
