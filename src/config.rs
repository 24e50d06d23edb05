//! Studio configuration module.
//!
//! Handles loading and validating `studio.toml` — the per-deployment file
//! that describes a framing "studio": the preview surface, the frame
//! template library, caption styling, export settings, and the
//! background-removal collaborator.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [preview]
//! width = 320               # On-screen preview surface, pixels
//! height = 400              # Must match the frame templates' aspect ratio
//!
//! [export]
//! filename = "framed.png"   # Fixed export filename for this deployment
//! background = "transparent" # "transparent" or "#rrggbb"
//!
//! [caption]
//! # font = "fonts/NotoSans-Bold.ttf"  # TTF/OTF face; captions need this
//! size = 40.0               # Caption pixel size on the preview surface
//! color = "#ffffff"
//! default_position = [100.0, 400.0]  # Anchor: center x, baseline y
//!
//! [frames]
//! dir = "frames"            # Scanned for *.png; file stem = template name
//! # default = "gold"        # Template used when none is selected
//!
//! [removal]
//! endpoint = ""             # Background-removal service URL
//! api_key_env = "FRAMELET_API_KEY"   # Env var holding the API key
//! timeout_secs = 30
//!
//! [processing]
//! # max_processes = 4       # Parallel preview renders (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only change the export filename
//! [export]
//! filename = "twibbon.png"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::compose::{Background, CaptionStyle};
use crate::placement::{DEFAULT_CAPTION_POSITION, SurfaceSize};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Studio configuration loaded from `studio.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// On-screen preview surface dimensions.
    pub preview: PreviewConfig,
    /// Export filename and background.
    pub export: ExportConfig,
    /// Caption styling and default anchor.
    pub caption: CaptionConfig,
    /// Frame template library.
    pub frames: FramesConfig,
    /// Background-removal collaborator settings.
    pub removal: RemovalConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl StudioConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(ConfigError::Validation(
                "preview.width and preview.height must be non-zero".into(),
            ));
        }
        if self.export.filename.is_empty() {
            return Err(ConfigError::Validation(
                "export.filename must not be empty".into(),
            ));
        }
        self.export.background()?;
        if self.caption.size <= 0.0 {
            return Err(ConfigError::Validation(
                "caption.size must be positive".into(),
            ));
        }
        parse_hex_color(&self.caption.color)?;
        if self.frames.dir.is_empty() {
            return Err(ConfigError::Validation("frames.dir must not be empty".into()));
        }
        if self.removal.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "removal.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// On-screen preview surface dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
}

impl PreviewConfig {
    #[must_use]
    pub fn surface(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 400,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Export filename, fixed per deployment.
    pub filename: String,
    /// Surface clear color: `"transparent"` or `"#rrggbb"`.
    pub background: String,
}

impl ExportConfig {
    /// Parse the configured background into compositor terms.
    pub fn background(&self) -> Result<Background, ConfigError> {
        match self.background.as_str() {
            "transparent" => Ok(Background::Transparent),
            other => Ok(Background::Solid(parse_hex_color(other)?)),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: "framed.png".to_string(),
            background: "transparent".to_string(),
        }
    }
}

/// Caption styling. The font face decides the weight — ship a bold face for
/// the stock bold look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// Path to a TTF/OTF face, resolved against the studio root. Captions
    /// cannot render without it.
    pub font: Option<PathBuf>,
    /// Caption pixel size on the preview surface.
    pub size: f32,
    /// Caption fill color (`#rrggbb`).
    pub color: String,
    /// Stock caption anchor on the preview surface: center x, baseline y.
    pub default_position: [f64; 2],
}

impl CaptionConfig {
    /// Parse the configured styling into compositor terms.
    pub fn style(&self) -> Result<CaptionStyle, ConfigError> {
        Ok(CaptionStyle::new(self.size, parse_hex_color(&self.color)?))
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font: None,
            size: 40.0,
            color: "#ffffff".to_string(),
            default_position: DEFAULT_CAPTION_POSITION,
        }
    }
}

/// A named frame template discovered in the frames directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTemplate {
    /// Template name (the file stem).
    pub name: String,
    pub path: PathBuf,
}

/// Frame template library settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramesConfig {
    /// Directory scanned for `*.png` templates, relative to the studio root.
    pub dir: String,
    /// Template used when none is selected. Falls back to the first template
    /// in name order.
    pub default: Option<String>,
}

impl FramesConfig {
    /// All templates in the frames directory, sorted by name.
    pub fn list_templates(&self, root: &Path) -> Result<Vec<FrameTemplate>, ConfigError> {
        let dir = root.join(&self.dir);
        if !dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "frames directory not found: {}",
                dir.display()
            )));
        }
        let mut templates = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(2) {
            let entry = entry.map_err(|e| ConfigError::Validation(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if !is_png {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            templates.push(FrameTemplate {
                name: name.to_string(),
                path: path.to_path_buf(),
            });
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    /// Resolve a template selection to a concrete path.
    ///
    /// A selection that is an existing file path wins outright (ad-hoc
    /// templates); otherwise it is looked up by name. With no selection, the
    /// configured default applies, then the first template in name order.
    pub fn resolve(&self, root: &Path, selection: Option<&str>) -> Result<PathBuf, ConfigError> {
        if let Some(sel) = selection {
            let direct = Path::new(sel);
            if direct.is_file() {
                return Ok(direct.to_path_buf());
            }
            let templates = self.list_templates(root)?;
            return templates
                .iter()
                .find(|t| t.name == sel)
                .map(|t| t.path.clone())
                .ok_or_else(|| {
                    ConfigError::Validation(format!("unknown frame template '{sel}'"))
                });
        }
        if let Some(default) = &self.default {
            return self.resolve(root, Some(default));
        }
        let templates = self.list_templates(root)?;
        templates
            .first()
            .map(|t| t.path.clone())
            .ok_or_else(|| ConfigError::Validation("no frame templates available".into()))
    }
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            dir: "frames".to_string(),
            default: None,
        }
    }
}

/// Background-removal collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemovalConfig {
    /// Service URL. Empty means removal is not configured.
    pub endpoint: String,
    /// Name of the environment variable the API key is read from — keys do
    /// not belong in config files.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl RemovalConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }

    /// Read the API key from the configured environment variable.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key_env: "FRAMELET_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel preview renders.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Parse a `#rrggbb` color into an opaque pixel.
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ConfigError> {
    let bad = || ConfigError::Validation(format!("color must be #rrggbb: '{s}'"));
    let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
    if hex.len() != 6 {
        return Err(bad());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| bad())
    };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

/// The stock config file printed by `framelet gen-config`, every option
/// documented with its default.
pub fn stock_config_toml() -> &'static str {
    r##"# framelet studio configuration.
# All options are optional - defaults shown below.

[preview]
width = 320               # On-screen preview surface, pixels
height = 400              # Must match the frame templates' aspect ratio

[export]
filename = "framed.png"   # Fixed export filename for this deployment
background = "transparent" # "transparent" or "#rrggbb"

[caption]
# font = "fonts/NotoSans-Bold.ttf"  # TTF/OTF face; captions need this
size = 40.0               # Caption pixel size on the preview surface
color = "#ffffff"
default_position = [100.0, 400.0]  # Anchor: center x, baseline y

[frames]
dir = "frames"            # Scanned for *.png; file stem = template name
# default = "gold"        # Template used when none is selected

[removal]
endpoint = ""             # Background-removal service URL
api_key_env = "FRAMELET_API_KEY"   # Env var holding the API key
timeout_secs = 30

[processing]
# max_processes = 4       # Parallel preview renders (omit for auto = CPU cores)
"##
}
