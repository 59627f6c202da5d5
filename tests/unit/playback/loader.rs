use std::time::{Duration, Instant};

use super::*;
use crate::test_codec::{ScriptedCodec, ScriptedHandle, any_source};
use crate::test_gifs::{FrameSpec, GifSpec, assemble};

fn load_scripted(handle: ScriptedHandle, opts: LoadOpts) -> GifResult<LoadedGif> {
    load_with(
        ScriptedCodec::new(vec![Some(handle)]),
        &PremultipliedPreparer,
        any_source(),
        opts,
    )
}

fn three_frames() -> ScriptedHandle {
    ScriptedHandle::healthy(&[Some(0.1), Some(0.2), Some(0.1)])
}

#[test]
fn multi_frame_source_gets_a_timeline() {
    let loaded = load_scripted(three_frames(), LoadOpts::default()).unwrap();

    assert_eq!(loaded.frame_count, 3);
    assert_eq!(loaded.loop_count, LoopCount::Forever);
    assert_eq!(loaded.actual_size, PixelSize::new(2, 3));
    assert_eq!(loaded.reported_size, Some(PixelSize::new(2, 3)));
    assert_eq!(loaded.first_frame.size(), PixelSize::new(2, 3));

    let timeline = loaded.timeline.unwrap();
    assert_eq!(timeline.frame_count(), 3);
    assert_eq!(timeline.repeat_count(), 0);
    let expected = [0.0, 0.25, 0.75, 1.0];
    for (got, want) in timeline.key_times().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }
}

#[test]
fn single_frame_source_has_no_timeline() {
    let loaded = load_scripted(ScriptedHandle::healthy(&[None]), LoadOpts::default()).unwrap();
    assert_eq!(loaded.frame_count, 1);
    assert!(loaded.timeline.is_none());
    assert_eq!(loaded.first_frame.size(), PixelSize::new(2, 3));
}

#[test]
fn first_frame_failure_fails_the_load() {
    let err = load_scripted(three_frames().failing_decode(0), LoadOpts::default()).unwrap_err();
    assert!(matches!(err, GifError::Decode(_)));
}

#[test]
fn failed_frames_drop_out_with_their_delays() {
    let loaded = load_scripted(three_frames().failing_decode(1), LoadOpts::default()).unwrap();
    let timeline = loaded.timeline.unwrap();

    assert_eq!(timeline.frame_count(), 2);
    assert!((timeline.duration_secs() - 0.2).abs() < 1e-12);
    assert_eq!(timeline.key_times(), &[0.0, 0.5, 1.0]);
}

#[test]
fn loop_forever_overrides_finite_loop_count() {
    let handle = three_frames().with_loop_count(Some(3));

    let counted = load_scripted(handle.clone(), LoadOpts::default()).unwrap();
    assert_eq!(counted.timeline.unwrap().repeat_count(), 3);

    let forced = load_scripted(
        handle,
        LoadOpts {
            loop_forever: true,
            ..LoadOpts::default()
        },
    )
    .unwrap();
    assert_eq!(forced.loop_count, LoopCount::Finite(3));
    assert_eq!(forced.timeline.unwrap().repeat_count(), 0);
}

#[test]
fn zero_threads_is_rejected() {
    let err = load_scripted(
        three_frames(),
        LoadOpts {
            threads: Some(0),
            ..LoadOpts::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, GifError::Validation(_)));
}

#[test]
fn unopenable_source_is_not_decodable() {
    let err = load_gif(ImageSource::from_bytes(b"nope".to_vec()), LoadOpts::default()).unwrap_err();
    assert!(matches!(err, GifError::NotDecodable(_)));
}

#[test]
fn opts_deserialize_from_partial_json() {
    let opts: LoadOpts = serde_json::from_str(
        r#"{"loop_forever":true,"reader":{"default_frame_delay_secs":0.2},"threads":2}"#,
    )
    .unwrap();
    assert!(opts.loop_forever);
    assert_eq!(opts.threads, Some(2));
    assert_eq!(opts.reader.default_frame_delay_secs, 0.2);
    assert_eq!(opts.codec, GifCodecOpts::default());
}

#[test]
fn spawned_load_delivers_once() {
    let bytes = assemble(&GifSpec::new(vec![
        FrameSpec::delayed(10),
        FrameSpec::delayed(20).blue(),
    ]));
    let mut pending = spawn_load(ImageSource::from_bytes(bytes), LoadOpts::default());

    let deadline = Instant::now() + Duration::from_secs(10);
    let outcome = loop {
        if let Some(outcome) = pending.try_take() {
            break outcome;
        }
        assert!(Instant::now() < deadline, "load did not finish");
        std::thread::sleep(Duration::from_millis(5));
    };

    let loaded = outcome.unwrap();
    assert_eq!(loaded.frame_count, 2);
    assert!(loaded.timeline.is_some());
    assert!(pending.try_take().is_none());
}

#[test]
fn spawned_load_can_be_awaited() {
    let bytes = assemble(&GifSpec::new(vec![FrameSpec::delayed(10)]));
    let loaded = spawn_load(ImageSource::from_bytes(bytes), LoadOpts::default())
        .wait()
        .unwrap();
    assert!(loaded.timeline.is_none());
    assert_eq!(loaded.actual_size, PixelSize::new(1, 1));
}
