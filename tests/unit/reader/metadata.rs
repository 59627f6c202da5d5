use super::*;
use crate::test_codec::ScriptedHandle;

fn props(delay: Option<f64>, unclamped: Option<f64>) -> FrameProperties {
    FrameProperties {
        pixel_width: Some(4),
        pixel_height: Some(4),
        delay_secs: delay,
        unclamped_delay_secs: unclamped,
    }
}

#[test]
fn unclamped_delay_wins_over_clamped() {
    let opts = ReaderOpts::default();
    assert_eq!(
        normalize_delay(Some(&props(Some(0.1), Some(0.02))), &opts),
        0.02
    );
    assert_eq!(normalize_delay(Some(&props(Some(0.07), None)), &opts), 0.07);
}

#[test]
fn missing_delay_falls_back_to_default() {
    let opts = ReaderOpts::default();
    assert_eq!(normalize_delay(None, &opts), DEFAULT_FRAME_DELAY_SECS);
    assert_eq!(
        normalize_delay(Some(&props(None, None)), &opts),
        DEFAULT_FRAME_DELAY_SECS
    );
}

#[test]
fn sub_threshold_delay_is_replaced_and_threshold_itself_is_kept() {
    let opts = ReaderOpts::default();
    assert_eq!(
        normalize_delay(Some(&props(None, Some(0.0))), &opts),
        DEFAULT_FRAME_DELAY_SECS
    );
    assert_eq!(
        normalize_delay(Some(&props(None, Some(0.005))), &opts),
        DEFAULT_FRAME_DELAY_SECS
    );
    assert_eq!(
        normalize_delay(Some(&props(None, Some(MINIMUM_FRAME_DELAY_SECS))), &opts),
        MINIMUM_FRAME_DELAY_SECS
    );
}

#[test]
fn nan_delay_is_replaced() {
    let opts = ReaderOpts::default();
    assert_eq!(
        normalize_delay(Some(&props(None, Some(f64::NAN))), &opts),
        DEFAULT_FRAME_DELAY_SECS
    );
}

#[test]
fn custom_opts_change_threshold_and_default() {
    let opts = ReaderOpts {
        default_frame_delay_secs: 0.5,
        minimum_frame_delay_secs: 0.05,
    };
    assert_eq!(normalize_delay(Some(&props(None, Some(0.04))), &opts), 0.5);
    assert_eq!(normalize_delay(Some(&props(None, Some(0.05))), &opts), 0.05);
}

#[test]
fn all_frame_delays_covers_every_frame() {
    let handle = ScriptedHandle::healthy(&[Some(0.05), None, Some(0.001), Some(0.2)]);
    let delays = all_frame_delays(&handle, &ReaderOpts::default());
    assert_eq!(delays, vec![0.05, 0.1, 0.1, 0.2]);
}

#[test]
fn loop_count_and_reported_size_read_handle_metadata() {
    let handle = ScriptedHandle::healthy(&[Some(0.1)]);
    assert_eq!(loop_count(&handle), LoopCount::Forever);
    assert_eq!(reported_size(&handle), Some(PixelSize::new(2, 3)));

    let handle = ScriptedHandle::healthy(&[Some(0.1)])
        .with_loop_count(None)
        .with_frame_props(0, None);
    assert_eq!(loop_count(&handle), LoopCount::Undetermined);
    assert_eq!(reported_size(&handle), None);
}

#[test]
fn reported_size_needs_both_dimensions() {
    let handle = ScriptedHandle::healthy(&[Some(0.1)]).with_frame_props(
        0,
        Some(FrameProperties {
            pixel_width: Some(5),
            pixel_height: None,
            delay_secs: None,
            unclamped_delay_secs: None,
        }),
    );
    assert_eq!(reported_size(&handle), None);
}

#[test]
fn are_all_same_and_average() {
    assert!(are_all_same(&[0.1, 0.1, 0.1]));
    assert!(are_all_same(&[0.3]));
    assert!(!are_all_same(&[0.1, 0.2]));
    assert!(!are_all_same(&[]));

    assert_eq!(average(&[]), 0.0);
    assert!((average(&[0.1, 0.2, 0.3]) - 0.2).abs() < 1e-12);
}

#[test]
fn validate_rejects_unusable_opts() {
    assert!(ReaderOpts::default().validate().is_ok());

    let zero_min = ReaderOpts {
        minimum_frame_delay_secs: 0.0,
        ..ReaderOpts::default()
    };
    assert!(matches!(
        zero_min.validate(),
        Err(GifError::Validation(_))
    ));

    let default_below_min = ReaderOpts {
        default_frame_delay_secs: 0.005,
        ..ReaderOpts::default()
    };
    assert!(matches!(
        default_below_min.validate(),
        Err(GifError::Validation(_))
    ));

    let nan_default = ReaderOpts {
        default_frame_delay_secs: f64::NAN,
        ..ReaderOpts::default()
    };
    assert!(nan_default.validate().is_err());
}

#[test]
fn opts_deserialize_with_defaults() {
    let opts: ReaderOpts = serde_json::from_str(r#"{"default_frame_delay_secs":0.2}"#).unwrap();
    assert_eq!(opts.default_frame_delay_secs, 0.2);
    assert_eq!(opts.minimum_frame_delay_secs, MINIMUM_FRAME_DELAY_SECS);
}
