/*!
 * # vttzero - Batch subtitle timecode processing
 *
 * A Rust library for batch-converting subtitle files: zeroing the hour
 * component of WebVTT timecodes and converting SRT files to WebVTT.
 *
 * ## Features
 *
 * - Zero the hour fields of WebVTT timecode ranges, line by line
 * - Convert SRT subtitle files to WebVTT (header + timecode punctuation)
 * - Batch processing over a directory, sequential or bounded worker pool
 * - Three output-naming policies: sequential numbering, interactive
 *   rename, and default index-suffixed names
 * - Per-file failure accounting with running progress reporting
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timecode`: Timecode pattern detection and rewriting
 * - `subtitle_converter`: Per-file subtitle conversions
 * - `batch_dispatcher`: Batch job dispatch and progress accounting
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod timecode;
pub mod subtitle_converter;
pub mod batch_dispatcher;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, NamingConfig, NamingPolicy, OperationKind};
pub use batch_dispatcher::{
    BatchDispatcher, BatchJob, BatchOutcome, BatchResult, JobState, NullProgressSink,
    NullRenamePrompt, ProgressSink, ProgressUpdate, RenamePrompt,
};
pub use subtitle_converter::SubtitleConverter;
pub use errors::{AppError, ConvertError, DispatchError};
