use super::*;

fn row_mean(r: &Raster, y: usize, c: usize) -> f64 {
    let w = r.width() as usize;
    (0..w).map(|x| f64::from(r.pixel(x, y)[c])).sum::<f64>() / w as f64
}

#[test]
fn flat_colour_is_dithered_within_one_step() {
    let mut r = Raster::new(32, 8, PixelFormat::Rgb24, 0).unwrap();
    horizontal_gradient(&mut r, [10, 0, 255], [10, 0, 255]);
    for y in 0..8 {
        for x in 0..32 {
            let px = r.pixel(x, y);
            assert!(px[0] == 9 || px[0] == 10, "{px:?}");
            assert_eq!(px[1], 0);
            assert!(px[2] == 254 || px[2] == 255, "{px:?}");
        }
    }
}

#[test]
fn black_to_white_ramps_down_the_rows() {
    let mut r = Raster::new(64, 16, PixelFormat::Bgr32, 0).unwrap();
    horizontal_gradient(&mut r, [0, 0, 0], [255, 255, 255]);

    assert!((0..64).all(|x| r.pixel(x, 0) == &[0, 0, 0, 255]));
    let means: Vec<f64> = (0..16).map(|y| row_mean(&r, y, 1)).collect();
    assert!(means.windows(2).all(|w| w[0] < w[1]), "{means:?}");
    assert!(means[15] > 230.0);
    assert!((0..64).all(|x| r.pixel(x, 9)[3] == 255));
}

#[test]
fn dithering_is_reproducible() {
    let mut a = Raster::new(20, 20, PixelFormat::Bgr32, 0).unwrap();
    let mut b = Raster::new(20, 20, PixelFormat::Bgr32, 0).unwrap();
    horizontal_gradient(&mut a, [200, 30, 60], [5, 100, 250]);
    horizontal_gradient(&mut b, [200, 30, 60], [5, 100, 250]);
    assert_eq!(a.data(), b.data());
}

#[test]
fn margin_and_other_formats_are_untouched() {
    let mut r = Raster::new(4, 4, PixelFormat::Bgr32, 2).unwrap();
    horizontal_gradient(&mut r, [255, 255, 255], [255, 255, 255]);
    let row_bytes = r.full_width() * 4;
    assert!(r.row(0)[..row_bytes].iter().all(|&b| b == 0));
    assert!(r.row(2)[..8].iter().all(|&b| b == 0));
    assert_eq!(r.pixel(0, 0)[3], 255);

    for fmt in [PixelFormat::I, PixelFormat::Ia] {
        let mut r = Raster::new(4, 4, fmt, 0).unwrap();
        horizontal_gradient(&mut r, [255, 255, 255], [255, 255, 255]);
        assert!(r.data().iter().all(|&b| b == 0));
    }
}

#[test]
fn parses_two_rgb_stops() {
    let spec: GradientSpec = "255,0,0:0, 0, 255".parse().unwrap();
    assert_eq!(spec.top, [255, 0, 0]);
    assert_eq!(spec.bottom, [0, 0, 255]);
}

#[test]
fn rejects_malformed_stops() {
    for bad in ["", "1,2,3", "1,2:3,4,5", "1,2,3,4:5,6,7", "256,0,0:0,0,0", "a,b,c:1,2,3"] {
        let err = GradientSpec::parse(bad).unwrap_err();
        assert!(matches!(err, PixmapError::Validation(_)), "{bad:?}: {err}");
    }
}

#[test]
fn pixmap_uses_request_size_or_default_edge() {
    let spec = GradientSpec::parse("0,0,0:255,255,255").unwrap();

    let r = gradient_pixmap(spec, &ImageRequest::default()).unwrap();
    assert_eq!((r.width(), r.height()), (128, 128));
    assert_eq!(r.format(), PixelFormat::Bgr32);

    let req = ImageRequest::default().with_size(Some(40), None).with_margin(3);
    let r = gradient_pixmap(spec, &req).unwrap();
    assert_eq!((r.width(), r.height(), r.margin()), (40, 128, 3));
}
