use super::*;

fn noise(r: &mut Raster, seed: u32) {
    let mut s = seed;
    for b in r.data_mut() {
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        *b = s as u8;
    }
}

fn solid(w: u32, h: u32, fmt: PixelFormat, value: u8) -> Raster {
    let mut r = Raster::new(w, h, fmt, 0).unwrap();
    r.data_mut().fill(value);
    r
}

fn visible_bytes(r: &Raster) -> Vec<u8> {
    let row_bytes = r.full_width() * r.bytes_per_pixel();
    (0..r.full_height())
        .flat_map(|y| r.row(y)[..row_bytes].to_vec())
        .collect()
}

#[test]
fn zero_box_is_identity() {
    for fmt in [PixelFormat::Ia, PixelFormat::Bgr32] {
        let mut r = Raster::new(13, 7, fmt, 2).unwrap();
        noise(&mut r, 0x9e37_79b9);
        let before = visible_bytes(&r);

        box_blur(&mut r, 0, 0).unwrap();
        assert_eq!(visible_bytes(&r), before, "{fmt:?}");
    }
}

#[test]
fn interior_of_constant_image_stays_within_fixed_point_error() {
    let mut r = solid(9, 9, PixelFormat::Bgr32, 100);
    box_blur(&mut r, 1, 1).unwrap();

    let m = 65536 / 9;
    let expected = ((9 * 100 * m) >> 16) as u8;
    assert_eq!(r.pixel(4, 4), &[expected; 4]);
    assert!(100 - expected <= 1);
}

#[test]
fn truncated_window_keeps_full_divisor() {
    let mut r = solid(9, 9, PixelFormat::Ia, 100);
    box_blur(&mut r, 1, 1).unwrap();

    let m = 65536 / 9;
    let corner = ((4 * 100 * m) >> 16) as u8;
    let edge = ((6 * 100 * m) >> 16) as u8;
    assert_eq!(r.pixel(0, 0), &[corner, corner]);
    assert_eq!(r.pixel(8, 8), &[corner, corner]);
    assert_eq!(r.pixel(4, 0), &[edge, edge]);
    assert_eq!(r.pixel(0, 4), &[edge, edge]);
}

#[test]
fn single_pixel_spreads_over_the_box() {
    let mut r = Raster::new(7, 7, PixelFormat::Ia, 0).unwrap();
    let off = r.pixel_offset(3, 3);
    r.data_mut()[off..off + 2].copy_from_slice(&[255, 255]);

    box_blur(&mut r, 1, 2).unwrap();

    let m = 65536 / 15;
    let v = ((255 * m) >> 16) as u8;
    for y in 0..7 {
        for x in 0..7 {
            let inside = (2..=4).contains(&x) && (1..=5).contains(&y);
            let want = if inside { v } else { 0 };
            assert_eq!(r.pixel(x, y), &[want, want], "({x}, {y})");
        }
    }
}

#[test]
fn channels_blur_independently() {
    let mut r = Raster::new(5, 1, PixelFormat::Bgr32, 0).unwrap();
    for x in 0..5 {
        let off = r.pixel_offset(x, 0);
        r.data_mut()[off..off + 4].copy_from_slice(&[90, 0, 180, 255]);
    }
    box_blur(&mut r, 1, 0).unwrap();

    let m = 65536 / 3;
    let px = r.pixel(2, 0);
    assert_eq!(px[0], ((3 * 90 * m) >> 16) as u8);
    assert_eq!(px[1], 0);
    assert_eq!(px[2], ((3 * 180 * m) >> 16) as u8);
    assert_eq!(px[3], ((3 * 255 * m) >> 16) as u8);
}

#[test]
fn oversized_horizontal_box_is_clamped_to_width() {
    let mut a = Raster::new(4, 3, PixelFormat::Ia, 0).unwrap();
    noise(&mut a, 11);
    let mut b = a.clone();

    box_blur(&mut a, 4, 1).unwrap();
    box_blur(&mut b, 1_000, 1).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn formats_without_two_or_four_channels_are_untouched() {
    for fmt in [PixelFormat::I, PixelFormat::Rgb24] {
        let mut r = Raster::new(6, 6, fmt, 1).unwrap();
        noise(&mut r, 5);
        let before = r.data().to_vec();
        box_blur(&mut r, 2, 2).unwrap();
        assert_eq!(r.data(), before.as_slice());
    }
}

#[test]
fn shadow_lands_below_and_right_of_caster() {
    let mut r = Raster::new(8, 8, PixelFormat::Bgr32, 0).unwrap();
    let off = r.pixel_offset(2, 2);
    r.data_mut()[off..off + 4].copy_from_slice(&[200, 100, 50, 255]);

    drop_shadow(&mut r, 1, 1).unwrap();

    let m = 65536 / 9;
    let s = ((255 * m) >> 16) as u8;

    // Caster is opaque and keeps its colour.
    assert_eq!(r.pixel(2, 2), &[200, 100, 50, 255]);
    // Shifted alpha sits at (3, 3); its blur covers (2..=4, 2..=4).
    for (x, y) in [(3, 3), (4, 4), (2, 4), (4, 2), (3, 2)] {
        assert_eq!(r.pixel(x, y), &[0, 0, 0, s], "({x}, {y})");
    }
    assert_eq!(r.pixel(0, 0), &[0, 0, 0, 0]);
    assert_eq!(r.pixel(5, 5), &[0, 0, 0, 0]);
    assert_eq!(r.pixel(1, 3), &[0, 0, 0, 0]);
}

#[test]
fn shadow_on_intensity_alpha() {
    let mut r = Raster::new(5, 5, PixelFormat::Ia, 0).unwrap();
    let off = r.pixel_offset(1, 1);
    r.data_mut()[off..off + 2].copy_from_slice(&[180, 255]);

    drop_shadow(&mut r, 0, 0).unwrap();

    // Zero box: the shadow is the alpha itself, unblurred, at the same spot.
    assert_eq!(r.pixel(1, 1), &[180, 255]);
    assert_eq!(r.pixel(2, 2), &[0, 0]);
}

#[test]
fn shadow_under_translucent_pixel_darkens_it() {
    let mut r = Raster::new(3, 3, PixelFormat::Ia, 0).unwrap();
    r.data_mut()
        .chunks_exact_mut(2)
        .for_each(|px| px.copy_from_slice(&[240, 128]));

    drop_shadow(&mut r, 0, 0).unwrap();

    let ([i], a) = over([240], 128, [0], 128);
    assert_eq!(r.pixel(1, 1), &[i, a]);
    assert!(a > 128);
    assert!(i < 240);
}

#[test]
fn shadow_ignores_formats_without_alpha() {
    for fmt in [PixelFormat::I, PixelFormat::Rgb24] {
        let mut r = Raster::new(6, 4, fmt, 0).unwrap();
        noise(&mut r, 77);
        let before = r.data().to_vec();
        drop_shadow(&mut r, 3, 3).unwrap();
        assert_eq!(r.data(), before.as_slice());
    }
}
