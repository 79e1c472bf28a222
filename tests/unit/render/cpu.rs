use super::*;
use crate::foundation::core::PixmapFlags;

fn square(c: &mut VectorCanvas, x0: f32, y0: f32, x1: f32, y1: f32) {
    c.move_to(x0, y0).unwrap();
    c.line_to(x1, y0).unwrap();
    c.line_to(x1, y1).unwrap();
    c.line_to(x0, y1).unwrap();
    c.line_to(x0, y0).unwrap();
}

#[test]
fn filled_square_is_opaque_inside_and_clear_outside() {
    let mut c = VectorCanvas::new(12, 12).unwrap();
    c.set_fill_enable(true).unwrap();
    c.set_fill_color(Rgba8::new(255, 0, 0, 255)).unwrap();
    square(&mut c, 2.0, 2.0, 10.0, 10.0);

    let r = rasterize_vector(&c, 0).unwrap();
    assert_eq!(r.format(), PixelFormat::Bgr32);
    assert_eq!((r.width(), r.height()), (12, 12));
    assert_eq!(r.pixel(5, 5), &[255, 0, 0, 255]);
    assert_eq!(r.pixel(0, 0), &[0, 0, 0, 0]);
    assert_eq!(r.pixel(11, 11), &[0, 0, 0, 0]);
    assert!(r.flags().contains(PixmapFlags::COLORIZED));
}

#[test]
fn style_change_flushes_the_pending_path() {
    let mut c = VectorCanvas::new(20, 10).unwrap();
    c.set_fill_enable(true).unwrap();
    c.set_fill_color(Rgba8::new(255, 0, 0, 255)).unwrap();
    square(&mut c, 0.0, 0.0, 10.0, 10.0);
    c.set_fill_color(Rgba8::new(0, 0, 255, 255)).unwrap();
    square(&mut c, 10.0, 0.0, 20.0, 10.0);

    let r = rasterize_vector(&c, 0).unwrap();
    assert_eq!(r.pixel(4, 5), &[255, 0, 0, 255]);
    assert_eq!(r.pixel(15, 5), &[0, 0, 255, 255]);
}

#[test]
fn nothing_is_drawn_without_fill_or_stroke() {
    let mut c = VectorCanvas::new(8, 8).unwrap();
    square(&mut c, 1.0, 1.0, 7.0, 7.0);
    let r = rasterize_vector(&c, 0).unwrap();
    assert!(r.data().iter().all(|&b| b == 0));
}

#[test]
fn stroke_draws_outline_only() {
    let mut c = VectorCanvas::new(16, 16).unwrap();
    c.set_stroke_width(2).unwrap();
    c.set_stroke_color(Rgba8::new(0, 255, 0, 255)).unwrap();
    square(&mut c, 4.0, 4.0, 12.0, 12.0);

    let r = rasterize_vector(&c, 0).unwrap();
    assert_eq!(r.pixel(8, 8)[3], 0);
    let edge = r.pixel(8, 4);
    assert!(edge[3] > 0, "{edge:?}");
    assert_eq!(edge[1], 255);
}

#[test]
fn margin_offsets_the_drawing() {
    let mut c = VectorCanvas::new(6, 6).unwrap();
    c.set_fill_enable(true).unwrap();
    c.set_fill_color(Rgba8::new(10, 20, 30, 255)).unwrap();
    square(&mut c, 0.0, 0.0, 6.0, 6.0);

    let r = rasterize_vector(&c, 3).unwrap();
    assert_eq!(r.pixel(0, 0), &[10, 20, 30, 255]);
    assert_eq!(r.pixel(5, 5), &[10, 20, 30, 255]);
    let row_bytes = r.full_width() * 4;
    assert!(r.row(0)[..row_bytes].iter().all(|&b| b == 0));
}

#[test]
fn cubic_fills_a_lens() {
    let mut c = VectorCanvas::new(20, 20).unwrap();
    c.set_fill_enable(true).unwrap();
    c.set_fill_color(Rgba8::new(255, 255, 255, 255)).unwrap();
    c.move_to(0.0, 10.0).unwrap();
    c.cubic_to([5.0, -3.0], [15.0, -3.0], [20.0, 10.0]).unwrap();
    c.cubic_to([15.0, 23.0], [5.0, 23.0], [0.0, 10.0]).unwrap();

    let r = rasterize_vector(&c, 0).unwrap();
    assert_eq!(r.pixel(10, 10), &[255, 255, 255, 255]);
    assert_eq!(r.pixel(0, 0)[3], 0);
}

#[test]
fn empty_canvas_gives_empty_raster() {
    let c = VectorCanvas::new(0, 5).unwrap();
    let r = rasterize_vector(&c, 0).unwrap();
    assert_eq!((r.width(), r.height()), (0, 5));
}
