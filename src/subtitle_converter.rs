use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use log::debug;

use crate::errors::ConvertError;
use crate::timecode;

// @module: Per-file subtitle conversions

/// WebVTT file header, written before any converted SRT content
const VTT_HEADER: &str = "WEBVTT\n\n";

// @struct: Stateless per-file converter
pub struct SubtitleConverter;

impl SubtitleConverter {
    /// Zero the hour fields of every VTT timecode range in a file.
    ///
    /// Reads `source` line by line, applies the hour-zeroing rewrite to each
    /// line and writes it to `destination` immediately, in order. Lines
    /// without a timecode range pass through unchanged; malformed timecodes
    /// are not an error. The destination is created or truncated, and may be
    /// left with partial output if an I/O error occurs mid-stream.
    pub fn zero_hour_vtt<P1: AsRef<Path>, P2: AsRef<Path>>(
        source: P1,
        destination: P2,
    ) -> Result<(), ConvertError> {
        Self::rewrite_lines(source.as_ref(), destination.as_ref(), None, |line| {
            timecode::zero_vtt_hours(line).into_owned()
        })
    }

    /// Convert an SRT file to WebVTT.
    ///
    /// Writes the `WEBVTT` header followed by a blank line, then each source
    /// line with every SRT timecode occurrence rewritten from comma to
    /// period separator. Sequence numbers, cue text and blank lines pass
    /// through unchanged; hour values are not altered.
    pub fn srt_to_vtt<P1: AsRef<Path>, P2: AsRef<Path>>(
        source: P1,
        destination: P2,
    ) -> Result<(), ConvertError> {
        Self::rewrite_lines(source.as_ref(), destination.as_ref(), Some(VTT_HEADER), |line| {
            timecode::normalize_srt_punctuation(line).into_owned()
        })
    }

    /// Stream `source` to `destination` line by line through `rewrite`,
    /// optionally emitting a header first. Line terminators are preserved,
    /// so the output mirrors the input's structure byte for byte outside
    /// the rewritten timecode fields.
    fn rewrite_lines(
        source: &Path,
        destination: &Path,
        header: Option<&str>,
        rewrite: impl Fn(&str) -> String,
    ) -> Result<(), ConvertError> {
        let read_err = |source_err| ConvertError::SourceUnreadable {
            path: source.to_path_buf(),
            source: source_err,
        };
        let write_err = |source_err| ConvertError::DestinationUnwritable {
            path: destination.to_path_buf(),
            source: source_err,
        };

        let mut reader = BufReader::new(File::open(source).map_err(read_err)?);
        let mut writer = BufWriter::new(File::create(destination).map_err(write_err)?);

        if let Some(header) = header {
            writer.write_all(header.as_bytes()).map_err(write_err)?;
        }

        // read_line keeps the terminator, so the rewrite sees one full line
        // at a time and the timecode patterns never span a line boundary
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).map_err(read_err)?;
            if bytes_read == 0 {
                break;
            }
            writer.write_all(rewrite(&line).as_bytes()).map_err(write_err)?;
        }

        writer.flush().map_err(write_err)?;
        debug!("Converted {:?} -> {:?}", source, destination);

        Ok(())
    }
}
