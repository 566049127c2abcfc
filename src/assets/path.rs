use std::path::{Path, PathBuf};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ScrollseqError, ScrollseqResult};

/// Default zero-padding width for frame numbers (`0007`).
pub const DEFAULT_PAD_WIDTH: usize = 4;

/// Naming convention for an on-disk frame sequence.
///
/// Frame `i` lives at `dir/{prefix}{zero_pad(i + 1, pad_width)}.{extension}`, so frame index 6
/// of `male*.png` resolves to `male0007.png`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FramePathPattern {
    /// Directory holding the frames.
    pub dir: PathBuf,
    /// File name prefix placed before the frame number.
    #[serde(default)]
    pub prefix: String,
    /// Number of digits the 1-based frame number is padded to.
    #[serde(default = "default_pad_width")]
    pub pad_width: usize,
    /// File extension without the leading dot.
    pub extension: String,
}

fn default_pad_width() -> usize {
    DEFAULT_PAD_WIDTH
}

impl FramePathPattern {
    /// Create a pattern with the default pad width.
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            pad_width: DEFAULT_PAD_WIDTH,
            extension: extension.into(),
        }
    }

    /// Reject patterns that cannot produce distinct file names.
    pub fn validate(&self) -> ScrollseqResult<()> {
        if self.pad_width == 0 {
            return Err(ScrollseqError::validation("frames.pad_width must be > 0"));
        }
        let ext = self.extension.trim_start_matches('.');
        if ext.trim().is_empty() {
            return Err(ScrollseqError::validation(
                "frames.extension must be non-empty",
            ));
        }
        if self.prefix.contains(['/', '\\']) || ext.contains(['/', '\\']) {
            return Err(ScrollseqError::validation(
                "frames.prefix and frames.extension must not contain path separators",
            ));
        }
        Ok(())
    }

    /// Resolve a relative `dir` against `root`; absolute directories are kept as-is.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        if self.dir.is_relative() {
            self.dir = root.join(&self.dir);
        }
        self
    }

    /// File name (no directory) for a frame.
    pub fn file_name(&self, index: FrameIndex) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index.number(),
            self.extension.trim_start_matches('.'),
            width = self.pad_width
        )
    }
}

/// Full path of a frame under `pattern`.
///
/// Pure: performs no IO and does not check that the file exists.
pub fn frame_path(pattern: &FramePathPattern, index: FrameIndex) -> PathBuf {
    pattern.dir.join(pattern.file_name(index))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/path.rs"]
mod tests;
