//! CLI output formatting for all commands.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! Entities follow a consistent two-level pattern: a header line with a
//! positional index and the entity's identity, then indented context lines
//! (`Source:`, warnings, per-template results).

use crate::placement::{CaptionPlacement, Placement, SurfaceSize};
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Everything worth reporting about one finished composite.
#[derive(Debug, Clone)]
pub struct ComposeReport {
    pub frame_name: String,
    pub frame_path: PathBuf,
    pub export: SurfaceSize,
    pub photo: Option<PathBuf>,
    /// The export-space placement that actually rendered.
    pub placement: Placement,
    /// The export-space caption, if one rendered.
    pub caption: Option<CaptionPlacement>,
    /// `(preview aspect, export aspect)` when the two drift apart.
    pub aspect_mismatch: Option<(f64, f64)>,
    pub saved: PathBuf,
}

pub fn format_compose_output(report: &ComposeReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} ({}x{})",
        report.frame_name, report.export.width, report.export.height
    ));
    lines.push(format!("{}Source: {}", indent(1), report.frame_path.display()));
    match &report.photo {
        Some(photo) => lines.push(format!("{}Photo: {}", indent(1), photo.display())),
        None => lines.push(format!("{}Photo: none (frame-only render)", indent(1))),
    }
    lines.push(format!(
        "{}Placement: offset ({:.1}, {:.1}), zoom {:.2}x",
        indent(1),
        report.placement.offset_x,
        report.placement.offset_y,
        report.placement.scale
    ));
    if let Some(caption) = &report.caption {
        lines.push(format!(
            "{}Caption: \"{}\" at ({:.0}, {:.0})",
            indent(1),
            caption.text,
            caption.x,
            caption.y
        ));
    }
    if let Some((preview, export)) = report.aspect_mismatch {
        lines.push(format!(
            "{}WARNING: preview aspect {:.2} != frame aspect {:.2} - export will drift from the preview",
            indent(1),
            preview,
            export
        ));
    }
    lines.push(format!("Saved: {}", report.saved.display()));
    lines
}

pub fn print_compose_output(report: &ComposeReport) {
    for line in format_compose_output(report) {
        println!("{line}");
    }
}

/// One frame template as shown by `frames` and `check`.
#[derive(Debug, Clone)]
pub struct TemplateLine {
    pub name: String,
    pub path: PathBuf,
    /// Native dimensions; `None` when the file could not be identified.
    pub size: Option<SurfaceSize>,
    pub is_default: bool,
}

pub fn format_frames_output(templates: &[TemplateLine]) -> Vec<String> {
    let mut lines = vec!["Frames".to_string()];
    if templates.is_empty() {
        lines.push(format!("{}(no templates found)", indent(1)));
        return lines;
    }
    for (i, t) in templates.iter().enumerate() {
        let dims = match t.size {
            Some(s) => format!("{}x{}", s.width, s.height),
            None => "unreadable".to_string(),
        };
        let marker = if t.is_default { " [default]" } else { "" };
        lines.push(format!("{} {} ({dims}){marker}", format_index(i + 1), t.name));
        lines.push(format!("{}Source: {}", indent(1), t.path.display()));
    }
    lines
}

pub fn print_frames_output(templates: &[TemplateLine]) {
    for line in format_frames_output(templates) {
        println!("{line}");
    }
}

pub fn format_previews_output(results: &[(String, Result<PathBuf, String>)]) -> Vec<String> {
    let mut lines = vec![format!("Previews ({} frames)", results.len())];
    for (i, (name, result)) in results.iter().enumerate() {
        let line = match result {
            Ok(path) => format!("{} {} -> {}", format_index(i + 1), name, path.display()),
            Err(message) => format!("{} {} failed: {message}", format_index(i + 1), name),
        };
        lines.push(line);
    }
    let rendered = results.iter().filter(|(_, r)| r.is_ok()).count();
    let failed = results.len() - rendered;
    lines.push(format!("{rendered} rendered, {failed} failed"));
    lines
}

pub fn print_previews_output(results: &[(String, Result<PathBuf, String>)]) {
    for line in format_previews_output(results) {
        println!("{line}");
    }
}

pub fn format_removal_output(source: &Path, saved: &Path) -> Vec<String> {
    vec![
        format!("Background removed: {}", source.display()),
        format!("Saved: {}", saved.display()),
    ]
}

pub fn print_removal_output(source: &Path, saved: &Path) {
    for line in format_removal_output(source, saved) {
        println!("{line}");
    }
}

/// Check results: each template paired with whether its aspect matches the
/// preview surface.
pub fn format_check_output(
    preview: SurfaceSize,
    templates: &[(TemplateLine, bool)],
    caption_font: Option<&Path>,
    removal_configured: bool,
) -> Vec<String> {
    let mut lines = vec![format!("Preview: {}x{}", preview.width, preview.height)];
    for (i, (t, aspect_ok)) in templates.iter().enumerate() {
        let dims = match t.size {
            Some(s) => format!("{}x{}", s.width, s.height),
            None => "unreadable".to_string(),
        };
        lines.push(format!("{} {} ({dims})", format_index(i + 1), t.name));
        if *aspect_ok {
            lines.push(format!("{}aspect OK", indent(1)));
        } else {
            lines.push(format!(
                "{}WARNING: aspect differs from the preview surface - exports will drift",
                indent(1)
            ));
        }
    }
    match caption_font {
        Some(font) => lines.push(format!("Caption font: {}", font.display())),
        None => lines.push("Caption font: not configured (captions disabled)".to_string()),
    }
    if removal_configured {
        lines.push("Removal: endpoint configured".to_string());
    } else {
        lines.push("Removal: endpoint not configured".to_string());
    }
    lines
}

pub fn print_check_output(
    preview: SurfaceSize,
    templates: &[(TemplateLine, bool)],
    caption_font: Option<&Path>,
    removal_configured: bool,
) {
    for line in format_check_output(preview, templates, caption_font, removal_configured) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, size: Option<SurfaceSize>, is_default: bool) -> TemplateLine {
        TemplateLine {
            name: name.to_string(),
            path: PathBuf::from(format!("frames/{name}.png")),
            size,
            is_default,
        }
    }

    #[test]
    fn compose_output_shows_identity_then_context() {
        let report = ComposeReport {
            frame_name: "gold".to_string(),
            frame_path: PathBuf::from("frames/gold.png"),
            export: SurfaceSize::new(1600, 2000),
            photo: Some(PathBuf::from("me.jpg")),
            placement: Placement::new(50.0, -100.0, 1.2),
            caption: CaptionPlacement::new("Team 2026", 500.0, 2000.0),
            aspect_mismatch: None,
            saved: PathBuf::from("out/framed.png"),
        };
        let lines = format_compose_output(&report);
        assert_eq!(lines[0], "gold (1600x2000)");
        assert_eq!(lines[1], "    Source: frames/gold.png");
        assert_eq!(lines[3], "    Placement: offset (50.0, -100.0), zoom 1.20x");
        assert!(lines[4].contains("\"Team 2026\""));
        assert_eq!(lines.last().unwrap(), "Saved: out/framed.png");
    }

    #[test]
    fn compose_output_marks_frame_only_renders() {
        let report = ComposeReport {
            frame_name: "gold".to_string(),
            frame_path: PathBuf::from("frames/gold.png"),
            export: SurfaceSize::new(800, 1000),
            photo: None,
            placement: Placement::default(),
            caption: None,
            aspect_mismatch: Some((0.8, 1.0)),
            saved: PathBuf::from("framed.png"),
        };
        let lines = format_compose_output(&report);
        assert!(lines.iter().any(|l| l.contains("frame-only render")));
        assert!(lines.iter().any(|l| l.starts_with("    WARNING")));
    }

    #[test]
    fn frames_output_numbers_and_marks_the_default() {
        let lines = format_frames_output(&[
            template("gold", Some(SurfaceSize::new(1080, 1350)), true),
            template("silver", None, false),
        ]);
        assert_eq!(lines[0], "Frames");
        assert_eq!(lines[1], "001 gold (1080x1350) [default]");
        assert_eq!(lines[3], "002 silver (unreadable)");
    }

    #[test]
    fn previews_output_counts_outcomes() {
        let lines = format_previews_output(&[
            ("gold".to_string(), Ok(PathBuf::from("out/me-gold.png"))),
            ("silver".to_string(), Err("frame template unavailable".to_string())),
        ]);
        assert_eq!(lines[1], "001 gold -> out/me-gold.png");
        assert!(lines[2].starts_with("002 silver failed:"));
        assert_eq!(lines.last().unwrap(), "1 rendered, 1 failed");
    }
}
