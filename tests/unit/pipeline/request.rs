use super::*;

#[test]
fn empty_object_is_the_default_request() {
    let req = ImageRequest::from_json("{}").unwrap();
    assert_eq!(req, ImageRequest::default());
    assert_eq!(req.request_width, None);
    assert_eq!(req.max_width, 0);
}

#[test]
fn minus_one_means_unspecified() {
    let req = ImageRequest::from_json(
        r#"{"request_width": -1, "request_height": 300, "margin": 4, "mono_allowed": true}"#,
    )
    .unwrap();
    assert_eq!(req.request_width, None);
    assert_eq!(req.request_height, Some(300));
    assert_eq!(req.margin, 4);
    assert!(req.mono_allowed);
    assert!(!req.want_thumbnail);
}

#[test]
fn null_dimension_is_accepted() {
    let req = ImageRequest::from_json(r#"{"request_width": null}"#).unwrap();
    assert_eq!(req.request_width, None);
}

#[test]
fn negative_dimensions_other_than_minus_one_are_rejected() {
    let err = ImageRequest::from_json(r#"{"request_height": -7}"#).unwrap_err();
    assert!(matches!(err, PixmapError::Serde(_)), "{err}");
    assert!(err.to_string().contains("-7"));
}

#[test]
fn unspecified_dimension_serializes_as_minus_one() {
    let req = ImageRequest::default().with_size(Some(640), None);
    let v: serde_json::Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
    assert_eq!(v["request_width"], 640);
    assert_eq!(v["request_height"], -1);
}

#[test]
fn loader_opts_defaults() {
    let opts = LoaderOpts::default();
    assert_eq!(opts.thumbnail_edge, 160);
    assert_eq!(opts.small_source_limit, 64);
    assert_eq!(opts.filter, ResizeFilter::Lanczos3);

    let parsed: LoaderOpts = serde_json::from_str(r#"{"thumbnail_edge": 96}"#).unwrap();
    assert_eq!(parsed.thumbnail_edge, 96);
    assert_eq!(parsed.small_source_limit, 64);
}
