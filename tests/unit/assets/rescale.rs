use super::*;
use crate::assets::decode::Plane;
use crate::foundation::core::Rgba8;

#[test]
fn same_size_conversion_is_exact() {
    let pic = RawPicture::packed(SourcePixelFormat::Rgb24, 2, 1, vec![1, 2, 3, 4, 5, 6]);
    let out = ImageRescaler
        .rescale(&pic, 2, 1, PixelFormat::Bgr32, ResizeFilter::Lanczos3)
        .unwrap();
    assert_eq!(out.format, SourcePixelFormat::Rgba32);
    assert_eq!(out.plane().unwrap().data, vec![1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn constant_gray_stays_constant_when_upscaled() {
    let pic = RawPicture::packed(SourcePixelFormat::Gray8, 3, 3, vec![90; 9]);
    let out = ImageRescaler
        .rescale(&pic, 8, 6, PixelFormat::Rgb24, ResizeFilter::Lanczos3)
        .unwrap();
    assert_eq!((out.width, out.height), (8, 6));
    assert_eq!(out.format, SourcePixelFormat::Rgb24);
    let data = &out.plane().unwrap().data;
    assert_eq!(data.len(), 8 * 6 * 3);
    assert!(data.iter().all(|&b| b.abs_diff(90) <= 1), "{data:?}");
}

#[test]
fn honours_source_stride() {
    let pic = RawPicture {
        format: SourcePixelFormat::GrayA8,
        width: 1,
        height: 2,
        planes: vec![Plane {
            data: vec![10, 20, 0xee, 0xee, 30, 40],
            stride: 4,
        }],
        palette: None,
    };
    let out = ImageRescaler
        .rescale(&pic, 1, 2, PixelFormat::Bgr32, ResizeFilter::Nearest)
        .unwrap();
    assert_eq!(out.plane().unwrap().data, vec![10, 10, 10, 20, 30, 30, 30, 40]);
}

#[test]
fn transparent_palette_entries_become_transparent_black() {
    let pic = RawPicture::packed(SourcePixelFormat::Pal8, 3, 1, vec![0, 1, 9])
        .with_palette(vec![Rgba8::new(200, 100, 50, 255), Rgba8::new(9, 9, 9, 0)]);
    let out = ImageRescaler
        .rescale(&pic, 3, 1, PixelFormat::Bgr32, ResizeFilter::Lanczos3)
        .unwrap();
    assert_eq!(
        out.plane().unwrap().data,
        vec![200, 100, 50, 255, 0, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn rejects_mono_targets_and_empty_sizes() {
    let pic = RawPicture::packed(SourcePixelFormat::Gray8, 1, 1, vec![0]);
    for fmt in [PixelFormat::I, PixelFormat::Ia] {
        let err = ImageRescaler
            .rescale(&pic, 1, 1, fmt, ResizeFilter::Nearest)
            .unwrap_err();
        assert!(matches!(err, PixmapError::Rescale(_)), "{err}");
    }
    assert!(
        ImageRescaler
            .rescale(&pic, 0, 4, PixelFormat::Rgb24, ResizeFilter::Nearest)
            .is_err()
    );
}

#[test]
fn swizzles_every_four_byte_order() {
    let cases = [
        (SourcePixelFormat::Bgra32, [3, 2, 1, 4]),
        (SourcePixelFormat::Argb32, [4, 1, 2, 3]),
        (SourcePixelFormat::Abgr32, [4, 3, 2, 1]),
        (SourcePixelFormat::Rgba32, [1, 2, 3, 4]),
    ];
    for (fmt, bytes) in cases {
        let pic = RawPicture::packed(fmt, 1, 1, bytes.to_vec());
        let out = swizzle_to_rgba(&pic).unwrap();
        assert_eq!(out.format, SourcePixelFormat::Rgba32);
        assert_eq!(out.plane().unwrap().data, vec![1, 2, 3, 4], "{fmt:?}");
    }

    let rgb = RawPicture::packed(SourcePixelFormat::Rgb24, 1, 1, vec![1, 2, 3]);
    assert!(matches!(
        swizzle_to_rgba(&rgb),
        Err(PixmapError::Unsupported(_))
    ));
}

#[test]
fn filter_names_round_trip_through_serde() {
    let f: ResizeFilter = serde_json::from_str("\"catmull_rom\"").unwrap();
    assert_eq!(f, ResizeFilter::CatmullRom);
    assert_eq!(ResizeFilter::default(), ResizeFilter::Lanczos3);
}
