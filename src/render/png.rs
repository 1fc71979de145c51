use super::error::RenderError;

/// Rasterize an SVG document to PNG bytes at its own pixel size.
///
/// Text uses the system fonts; on a host without fonts the labels are
/// dropped and the rest of the plot still renders.
pub(crate) fn svg_to_png(svg: &str) -> Result<Vec<u8>, RenderError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Png(e.to_string()))?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or(
        RenderError::InvalidCanvas {
            width: size.width(),
            height: size.height(),
        },
    )?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| RenderError::Png(e.to_string()))
}
