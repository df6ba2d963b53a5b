//! Plain-text reports for the terminal.
//!
//! Colors come from `yansi` and are only applied when the writer was built
//! with color enabled, so piped output and tests stay plain.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use yansi::{Color, Paint, Style};

use crate::actions::DeleteProgressCallback;
use crate::duplicates::DuplicateGroup;

const HEADER: Style = Style::new().bold();
const KEEPER: Style = Style::new().fg(Color::Green);
const REMOVAL: Style = Style::new().fg(Color::Yellow);
const FAILURE: Style = Style::new().fg(Color::Red);

/// Text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput {
    color: bool,
}

impl TextOutput {
    /// Create a writer; `color` enables ANSI styling.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint<T: Display>(&self, value: T, style: Style) -> String {
        if self.color {
            value.paint(style).to_string()
        } else {
            value.to_string()
        }
    }

    /// Write every duplicate group followed by `Total: <n>`.
    ///
    /// The first path of each group is the one discovered first.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_groups<W: Write>(&self, w: &mut W, groups: &[DuplicateGroup]) -> io::Result<()> {
        writeln!(w)?;
        writeln!(w, "{}", self.paint("Duplicates:", HEADER))?;
        for group in groups {
            let size = group.files.first().map_or(0, |f| f.size);
            writeln!(
                w,
                "{} ({} files, {})",
                self.paint(&group.fingerprint, HEADER),
                group.len(),
                bytesize::ByteSize(size)
            )?;
            for (i, file) in group.files.iter().enumerate() {
                let path = file.path.display();
                if i == 0 {
                    writeln!(w, "  {}", self.paint(path, KEEPER))?;
                } else {
                    writeln!(w, "  {path}")?;
                }
            }
        }
        writeln!(w)?;
        writeln!(w, "Total: {}", groups.len())
    }

    /// Write the removal list, or the nothing-to-do line when it is empty.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_removals<W: Write>(&self, w: &mut W, removals: &[PathBuf]) -> io::Result<()> {
        if removals.is_empty() {
            return writeln!(w, "No duplicates found to remove.");
        }

        writeln!(w)?;
        writeln!(
            w,
            "{}",
            self.paint("Duplicates that would be moved to Trash:", HEADER)
        )?;
        for path in removals {
            writeln!(w, "{}", self.paint(path.display(), REMOVAL))?;
        }
        writeln!(w)?;
        writeln!(w, "Total: {}", removals.len())
    }
}

/// Prints one line per trashed or failed path as deletion proceeds.
pub struct TextDeleteReporter<W: Write + Send> {
    out: Mutex<W>,
    style: TextOutput,
}

impl<W: Write + Send> TextDeleteReporter<W> {
    /// Report to `out`.
    pub fn new(out: W, style: TextOutput) -> Self {
        Self {
            out: Mutex::new(out),
            style,
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn line(&self, text: String) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
        }
    }
}

impl<W: Write + Send> DeleteProgressCallback for TextDeleteReporter<W> {
    fn on_delete_success(&self, path: &Path, _size: u64) {
        self.line(format!("Trashed: {}", path.display()));
    }

    fn on_delete_failure(&self, path: &Path, error: &str) {
        let message = format!("Error trashing {}: {}", path.display(), error);
        self.line(self.style.paint(message, FAILURE));
    }
}
