// Copyright 2025 the QuickPlot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An SVG drawing surface for `quickplot`.
//!
//! [`SvgCanvas`] implements [`Canvas`] by appending SVG elements to a string. Clips become
//! `<clipPath>` definitions plus a clipped `<g>`, closed again by the matching
//! [`Canvas::restore`]. Text is measured with a pluggable [`TextMeasurer`]; the default
//! heuristic matches what a typical sans-serif font produces closely enough for layout.
//!
//! ```
//! use kurbo::Rect;
//! use quickplot::Plot;
//! use quickplot_svg::SvgCanvas;
//!
//! let mut plot = Plot::new();
//! plot.add_scatter(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], None)?;
//! let rect = Rect::new(0.0, 0.0, 640.0, 480.0);
//! let mut canvas = SvgCanvas::new(rect);
//! plot.render(&mut canvas, rect)?;
//! let svg = canvas.finish();
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), quickplot::PlotError>(())
//! ```

use kurbo::{BezPath, Line, Point, Rect};
use peniko::Brush;
use quickplot::{
    Canvas, HeuristicTextMeasurer, StrokeStyle, TextAnchor, TextBaseline, TextMeasurer,
    TextMetrics, TextStyle,
};
use smallvec::SmallVec;

/// A [`Canvas`] that serializes draw calls to an SVG document.
#[derive(Clone, Debug)]
pub struct SvgCanvas<M = HeuristicTextMeasurer> {
    view_box: Rect,
    body: String,
    // Groups opened by clips, one counter per save level. The first entry is the root.
    groups: SmallVec<[usize; 4]>,
    next_clip: usize,
    measurer: M,
}

impl SvgCanvas {
    /// Creates an empty document covering `view_box`.
    pub fn new(view_box: Rect) -> Self {
        Self::with_measurer(view_box, HeuristicTextMeasurer)
    }
}

impl<M: TextMeasurer> SvgCanvas<M> {
    /// Creates an empty document that measures text with `measurer`.
    pub fn with_measurer(view_box: Rect, measurer: M) -> Self {
        let mut groups = SmallVec::new();
        groups.push(0);
        Self {
            view_box: view_box.abs(),
            body: String::new(),
            groups,
            next_clip: 0,
            measurer,
        }
    }

    /// The document area.
    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Number of `save` calls not yet restored.
    pub fn depth(&self) -> usize {
        self.groups.len() - 1
    }

    /// The document so far, with any open groups closed.
    pub fn to_svg_string(&self) -> String {
        let vb = self.view_box;
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            vb.x0,
            vb.y0,
            vb.width(),
            vb.height(),
            vb.width(),
            vb.height()
        ));
        out.push('\n');
        out.push_str(&self.body);
        for _ in 0..self.groups.iter().sum::<usize>() {
            out.push_str("</g>\n");
        }
        out.push_str("</svg>\n");
        out
    }

    /// Consumes the canvas and returns the document.
    pub fn finish(self) -> String {
        if self.depth() > 0 {
            tracing::debug!(depth = self.depth(), "finishing SVG with unrestored saves");
        }
        let svg = self.to_svg_string();
        tracing::trace!(bytes = svg.len(), "finished SVG document");
        svg
    }

    fn push_text(&mut self, text: &str, pos: Point, angle_deg: f64, style: &TextStyle) {
        let baseline = match style.baseline {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Middle => "middle",
            TextBaseline::Hanging => "hanging",
        };
        self.body.push_str(&format!(
            r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
            pos.x, pos.y, style.font_size, baseline
        ));
        if style.is_bold() {
            self.body
                .push_str(&format!(r#" font-weight="{}""#, style.weight.0));
        }
        if angle_deg != 0.0 {
            self.body.push_str(&format!(
                r#" transform="rotate({} {} {})""#,
                angle_deg, pos.x, pos.y
            ));
        }
        self.body.push_str(match style.anchor {
            TextAnchor::Start => r#" text-anchor="start""#,
            TextAnchor::Middle => r#" text-anchor="middle""#,
            TextAnchor::End => r#" text-anchor="end""#,
        });
        write_paint_attr(&mut self.body, "fill", &Brush::Solid(style.color));
        self.body.push('>');
        self.body.push_str(&escape_xml(text));
        self.body.push_str("</text>\n");
    }
}

impl<M: TextMeasurer> TextMeasurer for SvgCanvas<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        self.measurer.measure(text, style)
    }
}

impl<M: TextMeasurer> Canvas for SvgCanvas<M> {
    fn fill_rect(&mut self, rect: Rect, brush: &Brush) {
        let r = rect.abs();
        self.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}""#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
        ));
        write_paint_attr(&mut self.body, "fill", brush);
        self.body.push_str("/>\n");
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) {
        let r = rect.abs();
        self.body.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none""#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
        ));
        write_stroke_attrs(&mut self.body, stroke);
        self.body.push_str("/>\n");
    }

    fn fill_path(&mut self, path: &BezPath, brush: &Brush) {
        let d = path.to_svg();
        self.body.push_str(&format!(r#"<path d="{d}""#));
        write_paint_attr(&mut self.body, "fill", brush);
        self.body.push_str("/>\n");
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        let d = path.to_svg();
        self.body.push_str(&format!(r#"<path d="{d}" fill="none""#));
        write_stroke_attrs(&mut self.body, stroke);
        self.body.push_str("/>\n");
    }

    fn draw_text(&mut self, text: &str, pos: Point, style: &TextStyle) {
        self.push_text(text, pos, 0.0, style);
    }

    fn draw_text_along(&mut self, text: &str, line: Line, style: &TextStyle) {
        let d = line.p1 - line.p0;
        let angle = d.y.atan2(d.x).to_degrees();
        let pos = match style.anchor {
            TextAnchor::Start => line.p0,
            TextAnchor::Middle => line.midpoint(),
            TextAnchor::End => line.p1,
        };
        self.push_text(text, pos, angle, style);
    }

    fn clip_rect(&mut self, rect: Rect) {
        let r = rect.abs();
        let id = self.next_clip;
        self.next_clip += 1;
        self.body.push_str(&format!(
            r#"<clipPath id="clip{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
            r.x0,
            r.y0,
            r.width(),
            r.height(),
        ));
        self.body.push('\n');
        self.body
            .push_str(&format!(r#"<g clip-path="url(#clip{id})">"#));
        self.body.push('\n');
        if let Some(open) = self.groups.last_mut() {
            *open += 1;
        }
    }

    fn save(&mut self) {
        self.groups.push(0);
    }

    fn restore(&mut self) {
        if self.groups.len() <= 1 {
            tracing::debug!("restore without matching save ignored");
            return;
        }
        if let Some(open) = self.groups.pop() {
            for _ in 0..open {
                self.body.push_str("</g>\n");
            }
        }
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn write_stroke_attrs(out: &mut String, stroke: &StrokeStyle) {
    write_paint_attr(out, "stroke", &stroke.brush);
    out.push_str(&format!(r#" stroke-width="{}""#, stroke.stroke_width));
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;
    use quickplot::Plot;

    fn page() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn solid_fills_carry_color_and_opacity() {
        let mut c = SvgCanvas::new(page());
        c.fill_rect(
            Rect::new(10.0, 20.0, 30.0, 60.0),
            &Brush::Solid(Color::from_rgba8(0xff, 0, 0, 0x80)),
        );
        let svg = c.finish();
        assert!(
            svg.contains(r##"<rect x="10" y="20" width="20" height="40" fill="#ff0000" fill-opacity="##),
            "rect element: {svg}"
        );
        assert!(
            svg.contains(r#"viewBox="0 0 200 100""#),
            "view box: {svg}"
        );
    }

    #[test]
    fn text_is_escaped() {
        let mut c = SvgCanvas::new(page());
        c.draw_text("a<b & \"c\"", Point::new(1.0, 2.0), &TextStyle::new(10.0));
        let svg = c.finish();
        assert!(
            svg.contains(">a&lt;b &amp; &quot;c&quot;</text>"),
            "escaped text: {svg}"
        );
    }

    #[test]
    fn text_along_a_rising_line_is_rotated() {
        let mut c = SvgCanvas::new(page());
        let style = TextStyle::new(12.0).with_alignment(TextAnchor::Middle, TextBaseline::Middle);
        c.draw_text_along("Y", Line::new((10.0, 90.0), (10.0, 10.0)), &style);
        let svg = c.finish();
        let start = svg.find("rotate(").expect("rotation") + "rotate(".len();
        let args: Vec<f64> = svg[start..]
            .split(')')
            .next()
            .expect("closing paren")
            .split(' ')
            .map(|a| a.parse().expect("number"))
            .collect();
        assert!((args[0] + 90.0).abs() < 1e-9, "reads bottom to top: {svg}");
        assert_eq!(&args[1..], &[10.0, 50.0], "rotated about the midpoint");
    }

    #[test]
    fn clips_open_and_close_groups() {
        let mut c = SvgCanvas::new(page());
        c.save();
        c.clip_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        c.clip_rect(Rect::new(10.0, 10.0, 40.0, 40.0));
        assert_eq!(c.depth(), 1, "one save");
        c.restore();
        c.restore();
        assert_eq!(c.depth(), 0, "unmatched restore ignored");
        let svg = c.finish();
        assert_eq!(svg.matches("<g ").count(), 2, "two clip groups");
        assert_eq!(svg.matches("</g>").count(), 2, "both closed by restore");
        assert!(svg.contains(r#"id="clip1""#), "clip ids are unique");
    }

    #[test]
    fn unfinished_groups_are_closed_on_output() {
        let mut c = SvgCanvas::new(page());
        c.save();
        c.clip_rect(page());
        let svg = c.to_svg_string();
        assert_eq!(svg.matches("</g>").count(), 1, "open group closed");
        assert!(svg.ends_with("</svg>\n"), "document terminated");
    }

    #[test]
    fn renders_a_plot() {
        let mut plot = Plot::new();
        plot.add_scatter(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], None)
            .expect("valid data");
        let rect = Rect::new(0.0, 0.0, 640.0, 480.0);
        let mut canvas = SvgCanvas::new(rect);
        plot.render(&mut canvas, rect).expect("render");
        let svg = canvas.finish();
        assert!(svg.contains(">Title</text>"), "title drawn");
        assert!(svg.contains(r#"font-weight="700""#), "title is bold");
        assert!(svg.contains(r#"clip-path="url(#clip0)""#), "series clipped");
        assert_eq!(
            svg.matches("<g ").count(),
            svg.matches("</g>").count(),
            "groups balanced"
        );
    }
}
