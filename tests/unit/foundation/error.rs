use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GifError::not_decodable("x")
            .to_string()
            .contains("not decodable:")
    );
    assert!(GifError::decode("x").to_string().contains("decode error:"));
    assert!(
        GifError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GifError::EmptyTimeline
            .to_string()
            .contains("timeline error:")
    );
}

#[test]
fn frame_unavailable_names_the_index() {
    let err = GifError::frame_unavailable(7, "status Unknown after recovery");
    let msg = err.to_string();
    assert!(msg.contains("frame 7"));
    assert!(msg.contains("status Unknown"));
}

#[test]
fn timeline_guards_report_their_inputs() {
    let zero = GifError::ZeroDurationTimeline { total_secs: 0.0 };
    assert!(zero.to_string().contains("total duration"));

    let mismatch = GifError::FrameDelayMismatch {
        frames: 3,
        delays: 2,
    };
    assert!(mismatch.to_string().contains("3 frames but 2 delays"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
