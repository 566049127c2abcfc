use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::path::FramePathPattern,
    eval::scroll::ScrollSpan,
    foundation::core::{FrameCount, Viewport},
    foundation::error::{ScrollseqError, ScrollseqResult},
    render::cpu::SurfaceSettings,
};

/// A scroll-scrubbed frame sequence and the surface it is drawn on.
///
/// Usually loaded from JSON:
///
/// ```json
/// {
///   "frames": { "dir": "CYBERFICTION-IMAGES", "prefix": "male", "extension": "png" },
///   "count": 300,
///   "span": { "viewport_heights": 6 },
///   "viewport": { "width": 1920, "height": 1080 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceConfig {
    /// On-disk naming of the frames.
    pub frames: FramePathPattern,
    /// Number of frames in the sequence.
    pub count: FrameCount,
    /// Scroll distance the whole sequence is scrubbed over.
    #[serde(default)]
    pub span: ScrollSpan,
    /// Initial drawing surface size.
    pub viewport: Viewport,
    /// Straight-alpha RGBA8 background; transparent when absent.
    #[serde(default)]
    pub clear_rgba: Option<[u8; 4]>,
    /// Loader worker threads; rayon's default when absent.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl SequenceConfig {
    /// Read a config file. Relative `frames.dir` resolves against the file's directory.
    pub fn from_json_path(path: &Path) -> ScrollseqResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ScrollseqError::serde(format!("{}: {e}", path.display())))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        let cfg = Self {
            frames: cfg.frames.rooted_at(root),
            ..cfg
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON string without resolving paths.
    pub fn from_json_str(json: &str) -> ScrollseqResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| ScrollseqError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make loading or scrubbing meaningless.
    pub fn validate(&self) -> ScrollseqResult<()> {
        self.frames.validate()?;
        self.span.validate()?;
        if self.viewport.is_empty() {
            return Err(ScrollseqError::validation(
                "viewport width/height must be > 0",
            ));
        }
        if self.threads == Some(0) {
            return Err(ScrollseqError::validation("threads must be > 0"));
        }
        Ok(())
    }

    /// Surface settings derived from this config.
    pub fn surface_settings(&self) -> SurfaceSettings {
        SurfaceSettings {
            clear_rgba: self.clear_rgba,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/model.rs"]
mod tests;
