/*!
 * Tests for timecode detection and rewriting
 */

use vttzero::timecode::{self, Timecode};

/// Test that a full VTT range has both hour fields zeroed
#[test]
fn test_zero_vtt_hours_withFullRange_shouldZeroBothHourFields() {
    let line = "01:02:03.456 --> 01:02:05.789";
    assert_eq!(
        timecode::zero_vtt_hours(line),
        "00:02:03.456 --> 00:02:05.789"
    );
}

/// Test that text around the range is preserved byte for byte
#[test]
fn test_zero_vtt_hours_withSurroundingText_shouldOnlyTouchHourFields() {
    let line = "cue1 01:02:03.456 --> 11:22:33.444 align:start";
    assert_eq!(
        timecode::zero_vtt_hours(line),
        "cue1 00:02:03.456 --> 00:22:33.444 align:start"
    );
}

/// Test that lines without a range match come back unchanged
#[test]
fn test_zero_vtt_hours_withoutMatch_shouldReturnLineUnchanged() {
    for line in [
        "",
        "Hello world",
        "WEBVTT",
        // missing milliseconds
        "01:02:03 --> 01:02:05",
        // SRT separators are not a VTT range
        "01:02:03,456 --> 01:02:05,789",
        // single timecode without the arrow
        "01:02:03.456",
    ] {
        assert_eq!(timecode::zero_vtt_hours(line), line);
    }
}

/// Test that applying the rewrite twice changes nothing further
#[test]
fn test_zero_vtt_hours_appliedTwice_shouldBeIdempotent() {
    let line = "12:34:56.789 --> 23:45:01.234";
    let once = timecode::zero_vtt_hours(line).into_owned();
    let twice = timecode::zero_vtt_hours(&once).into_owned();
    assert_eq!(once, twice);
}

/// Test that an SRT timecode gets its comma replaced with a period
#[test]
fn test_normalize_srt_punctuation_withSingleTimecode_shouldReplaceComma() {
    assert_eq!(
        timecode::normalize_srt_punctuation("12:34:56,789"),
        "12:34:56.789"
    );
}

/// Test that a full range line has both occurrences rewritten
#[test]
fn test_normalize_srt_punctuation_withFullRange_shouldRewriteBothEndpoints() {
    assert_eq!(
        timecode::normalize_srt_punctuation("00:00:01,000 --> 00:00:02,500"),
        "00:00:01.000 --> 00:00:02.500"
    );
}

/// Test that hour values are left alone by punctuation normalization
#[test]
fn test_normalize_srt_punctuation_withNonzeroHours_shouldPreserveDigits() {
    assert_eq!(
        timecode::normalize_srt_punctuation("10:00:01,000 --> 11:00:02,000"),
        "10:00:01.000 --> 11:00:02.000"
    );
}

/// Test that ordinary commas in cue text are untouched
#[test]
fn test_normalize_srt_punctuation_withPlainText_shouldReturnLineUnchanged() {
    for line in ["", "Hello, world", "1", "12:34:56.789"] {
        assert_eq!(timecode::normalize_srt_punctuation(line), line);
    }
}

/// Test timecode parsing with both separators
#[test]
fn test_timecode_parse_withBothSeparators_shouldYieldSameOffset() {
    let vtt = Timecode::parse("01:23:45.678").unwrap();
    let srt = Timecode::parse("01:23:45,678").unwrap();
    assert_eq!(vtt, srt);
    assert_eq!(vtt.ms, 5_025_678);
}

/// Test that out-of-range components are rejected
#[test]
fn test_timecode_parse_withInvalidComponents_shouldReturnError() {
    assert!(Timecode::parse("00:61:00.000").is_err());
    assert!(Timecode::parse("00:00:61.000").is_err());
    assert!(Timecode::parse("not a timecode").is_err());
}

/// Test formatting in both representations
#[test]
fn test_timecode_format_withKnownOffset_shouldFormatBothStyles() {
    let tc = Timecode::from_ms(5_025_678);
    assert_eq!(tc.format_vtt(), "01:23:45.678");
    assert_eq!(tc.format_srt(), "01:23:45,678");
}

/// Test hour-zeroing on the typed representation
#[test]
fn test_timecode_withZeroedHours_shouldKeepSubHourFields() {
    let tc = Timecode::parse("05:10:20.300").unwrap();
    assert_eq!(tc.with_zeroed_hours().format_vtt(), "00:10:20.300");
}
