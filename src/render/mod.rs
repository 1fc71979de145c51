//! # Histogram Rendering
//!
//! Draws booked histograms to image files, either one image per histogram or
//! several histograms overlaid on one canvas with a legend.
//!
//! Plots are built as an SVG scene and rasterized to PNG with `resvg` when the
//! `png` feature is enabled (the default). [`ImageFormat::Svg`] writes the
//! scene itself.
//!
//! ## File names
//!
//! | Mode | Files |
//! |------|-------|
//! | [`RenderMode::Skip`] | none |
//! | [`RenderMode::Separate`] | `c_<category>_<variable>.<ext>` per histogram |
//! | [`RenderMode::Together`] | `c_JOIN.<ext>` |
//! | [`RenderMode::Tagged`] | `c_<tag>.<ext>` |

mod axes;
mod canvas;
mod color;
mod config;
mod error;
mod plot;
#[cfg(feature = "png")]
mod png;


use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::histogram::{Beam, Category, Hist1D, Variable};

pub use color::{Color, MarkerShape, Palette};
pub use config::{ImageFormat, RenderConfig, RenderMode, SEPARATE_TAG, TOGETHER_TAG};
pub use error::RenderError;

use plot::{draw_plot, PlotEntry};

/// File stem of the combined overlay.
const JOIN_STEM: &str = "JOIN";

/// Render histograms according to `mode`. Returns the written files in
/// drawing order.
pub fn render_histograms<'a, I>(
    histograms: I,
    mode: &RenderMode,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>, RenderError>
where
    I: IntoIterator<Item = (&'a Category, Variable, &'a Hist1D)>,
{
    if *mode == RenderMode::Skip {
        return Ok(Vec::new());
    }
    if config.width == 0 || config.height == 0 {
        return Err(RenderError::InvalidCanvas {
            width: config.width,
            height: config.height,
        });
    }
    if let RenderMode::Tagged(tag) = mode {
        // The tag becomes the file stem and must stay inside the output directory
        if tag.contains(|c| matches!(c, '/' | '\\' | '\0')) {
            return Err(RenderError::InvalidTag(tag.clone()));
        }
    }
    #[cfg(not(feature = "png"))]
    if config.format == ImageFormat::Png {
        return Err(RenderError::UnsupportedFormat("png"));
    }

    let histograms: Vec<_> = histograms.into_iter().collect();
    let mut written = Vec::new();

    match mode {
        RenderMode::Skip => {}
        RenderMode::Separate => {
            for (category, variable, hist) in histograms {
                let entry = PlotEntry {
                    hist,
                    label: format!("{}_{}", category, variable),
                    color: Color::BLACK,
                    marker: MarkerShape::FullCircle,
                };
                let svg = draw_plot(&[entry], config.width, config.height, Some(category.beam));
                let stem = format!("{}_{}", category, variable);
                written.push(save(&svg, &stem, config)?);
            }
        }
        RenderMode::Together => {
            let entries = overlay_entries(&histograms, config, |_| true, |label| label);
            if let Some(path) = save_overlay(&entries, JOIN_STEM, None, config)? {
                written.push(path);
            }
        }
        RenderMode::Tagged(tag) => {
            let entries = overlay_entries(
                &histograms,
                config,
                |category| category.matches(tag),
                |label| strip_tag(&label, tag),
            );
            if let Some(path) = save_overlay(&entries, tag, Beam::detect(tag), config)? {
                written.push(path);
            }
        }
    }

    Ok(written)
}

fn overlay_entries<'a>(
    histograms: &[(&'a Category, Variable, &'a Hist1D)],
    config: &RenderConfig,
    select: impl Fn(&Category) -> bool,
    relabel: impl Fn(String) -> String,
) -> Vec<PlotEntry<'a>> {
    histograms
        .iter()
        .filter(|(category, _, _)| select(category))
        .enumerate()
        .map(|(index, &(category, variable, hist))| {
            let (color, marker) = config.palette.style(index);
            PlotEntry {
                hist,
                label: relabel(format!("{}_{}", category, variable)),
                color,
                marker,
            }
        })
        .collect()
}

fn save_overlay(
    entries: &[PlotEntry<'_>],
    stem: &str,
    beam: Option<Beam>,
    config: &RenderConfig,
) -> Result<Option<PathBuf>, RenderError> {
    if entries.is_empty() {
        warn!("No histogram matches '{}', nothing drawn", stem);
        return Ok(None);
    }
    let svg = draw_plot(entries, config.width, config.height, beam);
    save(&svg, stem, config).map(Some)
}

/// Legend label with the first `_<tag>`, else `<tag>_`, else `<tag>` removed.
pub(crate) fn strip_tag(label: &str, tag: &str) -> String {
    for pattern in [format!("_{}", tag), format!("{}_", tag), tag.to_string()] {
        if let Some(pos) = label.find(&pattern) {
            let mut out = String::with_capacity(label.len());
            out.push_str(&label[..pos]);
            out.push_str(&label[pos + pattern.len()..]);
            return out;
        }
    }
    label.to_string()
}

fn save(svg: &str, stem: &str, config: &RenderConfig) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(&config.output_dir)?;
    let path = image_path(&config.output_dir, stem, config.format);
    let bytes = encode(svg, config.format)?;
    std::fs::write(&path, bytes)?;
    info!("Saved {}", path.display());
    Ok(path)
}

fn image_path(dir: &Path, stem: &str, format: ImageFormat) -> PathBuf {
    dir.join(format!("c_{}.{}", stem, format.extension()))
}

fn encode(svg: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
    match format {
        ImageFormat::Svg => Ok(svg.as_bytes().to_vec()),
        #[cfg(feature = "png")]
        ImageFormat::Png => png::svg_to_png(svg),
        #[cfg(not(feature = "png"))]
        ImageFormat::Png => Err(RenderError::UnsupportedFormat("png")),
    }
}
