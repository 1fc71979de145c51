use std::fmt::Write as FmtWrite;

use super::color::{Color, MarkerShape};

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Left aligned
    Start,
    /// Centered
    Middle,
    /// Right aligned
    End,
}

impl Anchor {
    fn as_svg(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Text appearance.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f64,
    pub anchor: Anchor,
    pub bold: bool,
    pub italic: bool,
    pub rotate: Option<f64>,
}

impl TextStyle {
    pub fn new(size: f64, anchor: Anchor) -> Self {
        Self {
            size,
            anchor,
            bold: false,
            italic: false,
            rotate: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn rotated(mut self, angle: f64) -> Self {
        self.rotate = Some(angle);
        self
    }
}

/// Immediate-mode SVG canvas. Coordinates in pixels, origin top-left.
pub struct SvgCanvas {
    pub width: f64,
    pub height: f64,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::with_capacity(16 * 1024),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, stroke: Color, stroke_width: f64) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="none" stroke="{stroke}" stroke-width="{stroke_width:.2}" />"#
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{color}" stroke-width="{width:.2}" />"#
        );
    }

    /// Vertical error bar without caps.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, color: Color, width: f64) {
        self.line(x, y_lo, x, y_hi, color, width);
    }

    /// Text with ROOT-style `_{sub}` and `^{sup}` markup.
    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.text_element(x, y, &latex_to_svg(content), style);
    }

    /// Text drawn verbatim, underscores included.
    pub fn plain_text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        let mut escaped = String::with_capacity(content.len());
        content.chars().for_each(|c| escape(c, &mut escaped));
        self.text_element(x, y, &escaped, style);
    }

    fn text_element(&mut self, x: f64, y: f64, svg_content: &str, style: &TextStyle) {
        let _ = write!(
            self.body,
            r#"<text x="{x:.2}" y="{y:.2}" font-family="sans-serif" font-size="{:.1}" text-anchor="{}""#,
            style.size,
            style.anchor.as_svg()
        );
        if style.bold {
            self.body.push_str(r#" font-weight="bold""#);
        }
        if style.italic {
            self.body.push_str(r#" font-style="italic""#);
        }
        if let Some(angle) = style.rotate {
            let _ = write!(self.body, r#" transform="rotate({angle:.1} {x:.2} {y:.2})""#);
        }
        self.body.push('>');
        self.body.push_str(svg_content);
        self.body.push_str("</text>\n");
    }

    /// Data marker centered on (x, y).
    pub fn marker(&mut self, x: f64, y: f64, size: f64, shape: MarkerShape, color: Color) {
        let fill = if shape.is_filled() {
            color.to_hex()
        } else {
            "none".to_string()
        };
        let r = size / 2.0;
        let element = match shape {
            MarkerShape::FullCircle | MarkerShape::OpenCircle => {
                format!(r#"<circle cx="{x:.2}" cy="{y:.2}" r="{r:.2}""#)
            }
            MarkerShape::OpenSquare => format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{size:.2}" height="{size:.2}""#,
                x - r,
                y - r
            ),
            MarkerShape::FullTriangleUp | MarkerShape::OpenTriangleUp => {
                polygon(&[(x, y - r), (x + r, y + r), (x - r, y + r)])
            }
            MarkerShape::FullTriangleDown => {
                polygon(&[(x - r, y - r), (x + r, y - r), (x, y + r)])
            }
            MarkerShape::OpenDiamond => {
                polygon(&[(x, y - r), (x + 0.6 * r, y), (x, y + r), (x - 0.6 * r, y)])
            }
            MarkerShape::OpenCross => {
                let a = r / 3.0;
                polygon(&[
                    (x - a, y - r),
                    (x + a, y - r),
                    (x + a, y - a),
                    (x + r, y - a),
                    (x + r, y + a),
                    (x + a, y + a),
                    (x + a, y + r),
                    (x - a, y + r),
                    (x - a, y + a),
                    (x - r, y + a),
                    (x - r, y - a),
                    (x - a, y - a),
                ])
            }
        };
        let _ = writeln!(
            self.body,
            r#"{element} fill="{fill}" stroke="{color}" stroke-width="1.5" />"#
        );
    }

    pub fn finish_svg(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        let _ = writeln!(
            out,
            r#"<rect width="{}" height="{}" fill="white" />"#,
            self.width, self.height
        );
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

fn polygon(points: &[(f64, f64)]) -> String {
    let mut out = String::from(r#"<polygon points=""#);
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{x:.2},{y:.2}");
    }
    out.push('"');
    out
}

fn escape(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(c),
    }
}

/// Convert ROOT TLatex markup to SVG text content.
///
/// Handles `_{...}` / `^{...}` (and their single-character forms) and a few
/// `#greek` names; everything else is escaped verbatim.
pub(crate) fn latex_to_svg(text: &str) -> String {
    const GREEK: [(&str, char); 8] = [
        ("#Upsilon", 'Υ'),
        ("#gamma", 'γ'),
        ("#chi", 'χ'),
        ("#psi", 'ψ'),
        ("#eta", 'η'),
        ("#mu", 'μ'),
        ("#pi", 'π'),
        ("#phi", 'φ'),
    ];

    let mut out = String::with_capacity(text.len() + 32);
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == '#' {
            if let Some((name, symbol)) = GREEK.iter().find(|(name, _)| rest.starts_with(name)) {
                out.push(*symbol);
                rest = &rest[name.len()..];
                continue;
            }
        }
        if c == '_' || c == '^' {
            let after = &rest[1..];
            let (script, consumed) = if let Some(inner) = after.strip_prefix('{') {
                match inner.find('}') {
                    Some(end) => (&inner[..end], end + 2),
                    None => (inner, after.len()),
                }
            } else {
                match after.chars().next() {
                    Some(ch) => (&after[..ch.len_utf8()], ch.len_utf8()),
                    None => ("", 0),
                }
            };
            let shift = if c == '_' { "sub" } else { "super" };
            let _ = write!(out, r#"<tspan baseline-shift="{shift}" font-size="70%">"#);
            for ch in script.chars() {
                escape(ch, &mut out);
            }
            out.push_str("</tspan>");
            rest = &after[consumed..];
            continue;
        }
        escape(c, &mut out);
        rest = &rest[c.len_utf8()..];
    }
    out
}
