//! End-to-end tests: config to finished buffers.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use soundtrack_engine::{
    produce, produce_all, resolve_track, AudioBuffer, AudioError, TrackDescriptor, TrackWarning,
};
use soundtrack_spec::{validate_config, SoundtrackConfig, TagValue};

const RATE: u32 = 40;

fn ramp(len: usize, scale: f64) -> Vec<f64> {
    (0..len).map(|i| scale * (i + 1) as f64 / len as f64).collect()
}

fn clips() -> HashMap<String, AudioBuffer> {
    let mut clips = HashMap::new();
    clips.insert(
        "title_intro.wav".to_string(),
        AudioBuffer::mono(RATE, ramp(8, 0.5)).unwrap(),
    );
    clips.insert(
        "title_loop.wav".to_string(),
        AudioBuffer::mono(RATE, ramp(20, 0.5)).unwrap(),
    );
    clips.insert(
        "cave.wav".to_string(),
        AudioBuffer::new(RATE, vec![ramp(30, 0.4), ramp(30, -0.4)]).unwrap(),
    );
    clips.insert(
        "drums.wav".to_string(),
        AudioBuffer::mono(RATE, vec![0.9; 10]).unwrap(),
    );
    clips.insert(
        "jingle.wav".to_string(),
        AudioBuffer::mono(RATE, ramp(12, 0.3)).unwrap(),
    );
    clips
}

const CONFIG: &str = r#"{
    "silence": {"start": 0.25, "end": 0.5},
    "loop": {"count": 2, "fade": {"type": "linear", "duration": 0.25}},
    "metadata": {"tags": {"album": "Game OST", "artist": "Various"}},
    "tracks": [
        {"title": "Title Screen", "track": {"intro": "title_intro.wav", "loop": "title_loop.wav"}},
        {"title": "Cave", "track": {"file": "cave.wav", "loop": 10},
         "metadata": {"artist": "Composer"}, "silence": {"start": 0, "end": 0}},
        {"title": "Boss", "track": [
            {"intro": "title_intro.wav", "loop": "title_loop.wav"},
            {"loop": "drums.wav", "repeat": {"count": 3}}
        ], "loop": {"count": 1}},
        {"title": "Jingle", "track": "jingle.wav", "loop": {"count": 0}}
    ]
}"#;

fn descriptors(config: &SoundtrackConfig) -> Vec<TrackDescriptor> {
    let clips = clips();
    config
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| resolve_track(i, track, config, &clips).unwrap())
        .collect()
}

#[test]
fn test_config_validates() {
    let config = SoundtrackConfig::from_json(CONFIG).unwrap();
    let result = validate_config(&config);
    assert!(result.is_ok(), "errors: {:?}", result.errors);
}

#[test]
fn test_track_lengths() {
    let config = SoundtrackConfig::from_json(CONFIG).unwrap();
    let results = produce_all(descriptors(&config), 2).unwrap();

    let lengths: Vec<usize> = results
        .iter()
        .map(|r| r.result.as_ref().unwrap().buffer.len())
        .collect();

    let lead = 10;
    let trail = 20;
    assert_eq!(
        lengths,
        vec![
            // intro 8 + 2 loops of 20 + fade of 10
            lead + 8 + 40 + 10 + trail,
            // split at 10: intro 10 + 2 loops of 20 + fade of 10, no silence
            10 + 40 + 10,
            // stem 0: 8 + 2 * 20 = 48, stem 1: 4 * 10 = 40
            lead + 48 + trail,
            // played once
            lead + 12 + trail,
        ]
    );
}

#[test]
fn test_silence_is_zero() {
    let config = SoundtrackConfig::from_json(CONFIG).unwrap();
    let descriptor = &descriptors(&config)[3];
    let output = produce(descriptor).unwrap();
    let samples = output.buffer.channel(0).unwrap();

    assert!(samples[..10].iter().all(|&s| s == 0.0));
    assert!(samples[22..].iter().all(|&s| s == 0.0));
    assert_eq!(samples[10], 0.3 / 12.0);
}

#[test]
fn test_fade_ends_at_zero_on_every_channel() {
    let config = SoundtrackConfig::from_json(CONFIG).unwrap();
    let output = produce(&descriptors(&config)[1]).unwrap();

    assert_eq!(output.buffer.channel_count(), 2);
    let left = output.buffer.channel(0).unwrap();
    let right = output.buffer.channel(1).unwrap();
    assert_eq!(left.len(), 60);
    assert_eq!(left[59], 0.0);
    assert_eq!(right[59], 0.0);
    for (l, r) in left.iter().zip(right) {
        assert_eq!(*l, -*r);
    }
}

#[test]
fn test_overlay_clips_and_warns() {
    let config = SoundtrackConfig::from_json(CONFIG).unwrap();
    let output = produce(&descriptors(&config)[2]).unwrap();

    assert!(output.buffer.peak() <= 1.0);
    assert!(matches!(
        output.warnings.as_slice(),
        [TrackWarning::ClippingOccurred { .. }]
    ));
}

#[test]
fn test_tags() {
    let config = SoundtrackConfig::from_json(CONFIG).unwrap();
    let descriptors = descriptors(&config);

    let title = produce(&descriptors[0]).unwrap().tags;
    assert_eq!(title["title"], TagValue::from("Title Screen"));
    assert_eq!(title["track"], TagValue::Integer(1));
    assert_eq!(title["artist"], TagValue::from("Various"));
    assert_eq!(title["album"], TagValue::from("Game OST"));

    let cave = produce(&descriptors[1]).unwrap().tags;
    assert_eq!(cave["artist"], TagValue::from("Composer"));
    assert_eq!(cave["track"], TagValue::Integer(2));
}

#[test]
fn test_one_failing_track_is_isolated() {
    let json = r#"{
        "loop": {"count": 1},
        "tracks": [
            {"title": "Fine", "track": "jingle.wav"},
            {"title": "Broken", "track": ["jingle.wav", {"file": "drums.wav", "loop": 99}]}
        ]
    }"#;
    let config = SoundtrackConfig::from_json(json).unwrap();
    let clips = clips();

    assert!(resolve_track(0, &config.tracks[0], &config, &clips).is_ok());
    let err = resolve_track(1, &config.tracks[1], &config, &clips).unwrap_err();
    assert!(matches!(err, AudioError::InvalidLoopRegion { stem: 1, .. }));
}
