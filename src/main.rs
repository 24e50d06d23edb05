use clap::{Parser, Subcommand};
use framelet::compose;
use framelet::config::{self, StudioConfig};
use framelet::export::{self, ExportRequest};
use framelet::output::{self, ComposeReport, TemplateLine};
use framelet::placement::Placement;
use framelet::removal::{BackgroundRemover, HttpRemover, RemovalError};
use framelet::save::FileSaver;
use framelet::session::EditSession;
use framelet::{mapping, save};
use rusttype::Font;
use std::path::{Path, PathBuf};

/// Shared flags for commands that position a photo.
#[derive(clap::Args, Clone)]
struct PlacementArgs {
    /// Horizontal photo offset on the preview surface, pixels
    #[arg(long)]
    offset_x: Option<f64>,

    /// Vertical photo offset on the preview surface, pixels
    #[arg(long)]
    offset_y: Option<f64>,

    /// Uniform zoom factor (clamped to 0.1-5.0)
    #[arg(long)]
    scale: Option<f64>,

    /// Caption text (omit for no caption)
    #[arg(long)]
    caption: Option<String>,

    /// Caption anchor x override, preview-surface pixels
    #[arg(long)]
    caption_x: Option<f64>,

    /// Caption anchor y (baseline) override, preview-surface pixels
    #[arg(long)]
    caption_y: Option<f64>,

    /// Photo color filter: none, grayscale, sepia, invert
    #[arg(long)]
    filter: Option<String>,

    /// Saved edit session (JSON); explicit flags override its values
    #[arg(long)]
    session: Option<PathBuf>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "framelet")]
#[command(about = "Photo-frame composer for campaign frames and avatars")]
#[command(long_about = "\
Photo-frame composer for campaign frames and avatars

Position a photo inside a decorative frame template, add a caption, and
export the composite as a PNG at the template's native resolution. Placement
coordinates are authored against the small preview surface and rescaled on
export, so what you framed is what you get.

Studio layout:

  studio.toml              # Studio config (optional, 'gen-config' prints one)
  frames/                  # PNG templates; the file stem is the template name
  ├── gold.png
  └── silver.png
  fonts/NotoSans-Bold.ttf  # Caption face (configure under [caption])

Typical session:

  framelet frames
  framelet compose --photo me.jpg --frame gold \\
      --offset-x 12 --offset-y -8 --scale 1.3 --caption \"Team 2026\"
  framelet remove-bg --photo me.jpg
  framelet previews --photo me-cutout.png

Run 'framelet gen-config' to generate a documented studio.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Studio configuration file
    #[arg(long, default_value = "studio.toml", global = true)]
    config: PathBuf,

    /// Directory frame templates and fonts are resolved against
    #[arg(long, default_value = ".", global = true)]
    studio_root: PathBuf,

    /// Output directory for exported files
    #[arg(long, default_value = ".", global = true)]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Composite a photo into a frame template and export a PNG
    Compose {
        /// User photo (omit for a frame-only render)
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Frame template name or path (defaults to the configured default)
        #[arg(long)]
        frame: Option<String>,

        #[command(flatten)]
        placement: PlacementArgs,

        /// Output file (defaults to <out-dir>/<export.filename>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render the photo into every frame template
    Previews {
        /// User photo
        #[arg(long)]
        photo: PathBuf,

        #[command(flatten)]
        placement: PlacementArgs,
    },
    /// Strip a photo's background via the configured removal service
    RemoveBg {
        /// User photo
        #[arg(long)]
        photo: PathBuf,

        /// Output file (defaults to <out-dir>/<photo stem>-cutout.png)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List frame templates
    Frames,
    /// Validate configuration and assets without rendering
    Check,
    /// Print a stock studio.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compose {
            ref photo,
            ref frame,
            ref placement,
            ref out,
        } => {
            let cfg = StudioConfig::load_or_default(&cli.config)?;
            let mut session = build_session(&cfg, placement)?;
            if let Some(frame) = frame {
                session.select_frame(frame.clone());
            }

            let frame_path = cfg
                .frames
                .resolve(&cli.studio_root, session.frame.as_deref())?;
            let frame_img = compose::load_frame(&frame_path)?;
            let photo_img = photo.as_deref().map(compose::load_photo).transpose()?;
            let font = load_caption_font(&cfg, &cli.studio_root)?;

            let snapshot = session.snapshot();
            let preview = cfg.preview.surface();
            let request = ExportRequest {
                snapshot: &snapshot,
                photo: photo_img.as_ref(),
                frame: &frame_img,
                font: font.as_ref(),
                preview,
                background: cfg.export.background()?,
                caption_style: cfg.caption.style()?,
            };

            let (dir, filename) = match out {
                Some(path) => (
                    path.parent()
                        .filter(|p| !p.as_os_str().is_empty())
                        .unwrap_or(Path::new("."))
                        .to_path_buf(),
                    path.file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_else(|| cfg.export.filename.clone()),
                ),
                None => (cli.out_dir.clone(), cfg.export.filename.clone()),
            };
            let saver = FileSaver::new(&dir);
            let saved = export::export(&request, &saver, &filename)?;

            let export_surface = request.export_surface();
            let report = ComposeReport {
                frame_name: template_name(&frame_path),
                frame_path: frame_path.clone(),
                export: export_surface,
                photo: photo.clone(),
                placement: mapping::to_export_placement(snapshot.placement, preview, export_surface),
                caption: snapshot
                    .caption
                    .as_ref()
                    .map(|c| mapping::to_export_caption(c, preview, export_surface)),
                aspect_mismatch: (!preview.same_aspect(export_surface))
                    .then(|| (preview.aspect(), export_surface.aspect())),
                saved,
            };
            output::print_compose_output(&report);
        }
        Command::Previews {
            ref photo,
            ref placement,
        } => {
            let cfg = StudioConfig::load_or_default(&cli.config)?;
            let session = build_session(&cfg, placement)?;
            let photo_img = compose::load_photo(photo)?;
            let font = load_caption_font(&cfg, &cli.studio_root)?;
            let templates = cfg.frames.list_templates(&cli.studio_root)?;
            let stem = photo
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());

            init_thread_pool(&cfg.processing);
            let snapshot = session.snapshot();
            let preview = cfg.preview.surface();
            let background = cfg.export.background()?;
            let caption_style = cfg.caption.style()?;
            let saver = FileSaver::new(&cli.out_dir);

            use rayon::prelude::*;
            let results: Vec<(String, Result<PathBuf, String>)> = templates
                .par_iter()
                .map(|template| {
                    let result = compose::load_frame(&template.path)
                        .map_err(|e| e.to_string())
                        .and_then(|frame_img| {
                            let request = ExportRequest {
                                snapshot: &snapshot,
                                photo: Some(&photo_img),
                                frame: &frame_img,
                                font: font.as_ref(),
                                preview,
                                background,
                                caption_style,
                            };
                            let filename = format!("{stem}-{}.png", template.name);
                            export::export(&request, &saver, &filename)
                                .map_err(|e| e.to_string())
                        });
                    (template.name.clone(), result)
                })
                .collect();

            output::print_previews_output(&results);
        }
        Command::RemoveBg { ref photo, ref out } => {
            let cfg = StudioConfig::load_or_default(&cli.config)?;
            if !cfg.removal.is_configured() {
                return Err(Box::new(RemovalError::NotConfigured));
            }
            let api_key = cfg.removal.api_key().ok_or_else(|| {
                format!(
                    "API key env var {} is not set",
                    cfg.removal.api_key_env
                )
            })?;

            let remover = HttpRemover::new(
                cfg.removal.endpoint.clone(),
                api_key,
                std::time::Duration::from_secs(cfg.removal.timeout_secs),
            )?;
            let filename = photo
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());
            let bytes = std::fs::read(photo)?;
            let stripped = remover.remove(&bytes, &filename)?;

            let out_path = out.clone().unwrap_or_else(|| {
                let stem = photo
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "photo".to_string());
                cli.out_dir.join(format!("{stem}-cutout.png"))
            });
            save::save_to(&out_path, &stripped)?;
            output::print_removal_output(photo, &out_path);
        }
        Command::Frames => {
            let cfg = StudioConfig::load_or_default(&cli.config)?;
            let templates = template_lines(&cfg, &cli.studio_root)?;
            output::print_frames_output(&templates);
        }
        Command::Check => {
            let cfg = StudioConfig::load_or_default(&cli.config)?;
            println!("==> Checking {}", cli.config.display());
            let preview = cfg.preview.surface();
            let checked: Vec<(TemplateLine, bool)> = template_lines(&cfg, &cli.studio_root)?
                .into_iter()
                .map(|line| {
                    let aspect_ok = line.size.is_some_and(|s| preview.same_aspect(s));
                    (line, aspect_ok)
                })
                .collect();
            output::print_check_output(
                preview,
                &checked,
                cfg.caption.font.as_deref(),
                cfg.removal.is_configured(),
            );
            println!("==> Studio is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Build the edit session for one command invocation: start from a saved
/// session file (or a fresh one), then let explicit flags override.
fn build_session(
    cfg: &StudioConfig,
    args: &PlacementArgs,
) -> Result<EditSession, Box<dyn std::error::Error>> {
    let mut session = match &args.session {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => EditSession::new(cfg.caption.default_position),
    };

    let current = session.placement;
    session.set_placement(Placement::new(
        args.offset_x.unwrap_or(current.offset_x),
        args.offset_y.unwrap_or(current.offset_y),
        args.scale.unwrap_or(current.scale),
    ));
    if let Some(text) = &args.caption {
        session.set_caption(text.clone());
    }
    if args.caption_x.is_some() || args.caption_y.is_some() {
        let [cx, cy] = session.caption_position;
        session.place_caption(args.caption_x.unwrap_or(cx), args.caption_y.unwrap_or(cy));
    }
    if let Some(filter) = &args.filter {
        session.set_filter(filter.parse::<compose::PhotoFilter>()?);
    }
    Ok(session)
}

/// Load the configured caption font, if any. Captions simply stay disabled
/// when no font is configured; the compositor rejects a caption render
/// without one.
fn load_caption_font(
    cfg: &StudioConfig,
    root: &Path,
) -> Result<Option<Font<'static>>, Box<dyn std::error::Error>> {
    let Some(font_path) = &cfg.caption.font else {
        return Ok(None);
    };
    let path = if font_path.is_absolute() {
        font_path.clone()
    } else {
        root.join(font_path)
    };
    let bytes = std::fs::read(&path)
        .map_err(|e| format!("caption font {}: {e}", path.display()))?;
    Ok(Some(compose::load_font(bytes)?))
}

/// Discover templates and identify their native dimensions.
fn template_lines(
    cfg: &StudioConfig,
    root: &Path,
) -> Result<Vec<TemplateLine>, Box<dyn std::error::Error>> {
    let templates = cfg.frames.list_templates(root)?;
    Ok(templates
        .into_iter()
        .map(|t| TemplateLine {
            size: compose::identify(&t.path).ok(),
            is_default: cfg.frames.default.as_deref() == Some(t.name.as_str()),
            name: t.name,
            path: t.path,
        })
        .collect())
}

fn template_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
