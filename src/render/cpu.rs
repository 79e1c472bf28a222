use resvg::tiny_skia;

use crate::buffer::pixmap::Raster;
use crate::buffer::vector::{VecCmd, VectorCanvas};
use crate::foundation::core::{PixelFormat, Rgba8};
use crate::foundation::error::{PixmapError, PixmapResult};

/// Drawing state carried across the command stream.
#[derive(Clone, Copy, Debug)]
struct Style {
    fill: bool,
    fill_color: Rgba8,
    stroke_width: i32,
    stroke_color: Rgba8,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: false,
            fill_color: Rgba8::new(0, 0, 0, 255),
            stroke_width: 0,
            stroke_color: Rgba8::new(0, 0, 0, 255),
        }
    }
}

struct Painter {
    target: tiny_skia::Pixmap,
    transform: tiny_skia::Transform,
    path: tiny_skia::PathBuilder,
}

impl Painter {
    fn paint(color: Rgba8) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;
        paint
    }

    /// Draw the pending path with `style` and start a new one.
    fn flush(&mut self, style: &Style) {
        let builder = std::mem::replace(&mut self.path, tiny_skia::PathBuilder::new());
        let Some(path) = builder.finish() else {
            return;
        };
        if style.fill {
            self.target.fill_path(
                &path,
                &Self::paint(style.fill_color),
                tiny_skia::FillRule::Winding,
                self.transform,
                None,
            );
        }
        if style.stroke_width > 0 {
            let stroke = tiny_skia::Stroke {
                width: style.stroke_width as f32,
                ..Default::default()
            };
            self.target.stroke_path(
                &path,
                &Self::paint(style.stroke_color),
                &stroke,
                self.transform,
                None,
            );
        }
    }
}

/// Render a vector canvas into a new `BGR32` raster with `margin` on every edge.
///
/// The pending path is drawn whenever a style instruction follows path
/// instructions, and once more at the end of the stream. Fill is off and the
/// stroke width is 0 until set; both colours start as opaque black.
#[tracing::instrument(level = "debug", skip(canvas), fields(w = canvas.width(), h = canvas.height(), cmds = canvas.commands().len()))]
pub fn rasterize_vector(canvas: &VectorCanvas, margin: u32) -> PixmapResult<Raster> {
    let mut raster = Raster::new(canvas.width(), canvas.height(), PixelFormat::Bgr32, margin)?;
    raster.insert_flags(canvas.flags());
    if canvas.width() == 0 || canvas.height() == 0 {
        return Ok(raster);
    }

    let (fw, fh) = (raster.full_width() as u32, raster.full_height() as u32);
    let target = tiny_skia::Pixmap::new(fw, fh)
        .ok_or_else(|| PixmapError::out_of_memory(format!("vector target {fw} x {fh}")))?;
    let mut painter = Painter {
        target,
        transform: tiny_skia::Transform::from_translate(margin as f32, margin as f32),
        path: tiny_skia::PathBuilder::new(),
    };

    let mut style = Style::default();
    for cmd in canvas.iter() {
        match *cmd {
            VecCmd::MoveTo([x, y]) => painter.path.move_to(x, y),
            VecCmd::LineTo([x, y]) => painter.path.line_to(x, y),
            VecCmd::CubicTo(a, b, c) => painter.path.cubic_to(a[0], a[1], b[0], b[1], c[0], c[1]),
            style_cmd => {
                painter.flush(&style);
                match style_cmd {
                    VecCmd::SetFillEnable(v) => style.fill = v != 0,
                    VecCmd::SetFillColor(c) => style.fill_color = Rgba8::from_packed(c),
                    VecCmd::SetStrokeWidth(w) => style.stroke_width = w,
                    VecCmd::SetStrokeColor(c) => style.stroke_color = Rgba8::from_packed(c),
                    VecCmd::MoveTo(_) | VecCmd::LineTo(_) | VecCmd::CubicTo(..) => {}
                }
            }
        }
    }
    painter.flush(&style);

    let w = fw as usize;
    for (y, src) in painter.target.pixels().chunks_exact(w).enumerate() {
        let row = &mut raster.row_mut(y)[..w * 4];
        for (d, px) in row.chunks_exact_mut(4).zip(src) {
            let c = px.demultiply();
            d.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
    }
    Ok(raster)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
