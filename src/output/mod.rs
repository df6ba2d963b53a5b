//! Output formatters for scan and removal results.
//!
//! - Text for the terminal, matching the classic report layout
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use mediadupe::duplicates::DuplicateFinder;
//! use mediadupe::error::ExitCode;
//! use mediadupe::output::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! output.write_to(&mut std::io::stdout(), true).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError, JsonRemovalOutput};
pub use text::{TextDeleteReporter, TextOutput};
