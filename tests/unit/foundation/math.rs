use super::*;

#[test]
fn div255_matches_floor_division_over_blend_range() {
    for x in 0..=(255u32 * 255) {
        assert_eq!(div255(x), x / 255, "x = {x}");
    }
}

#[test]
fn div255_of_full_scale_products_is_identity() {
    for v in 0..=255u32 {
        assert_eq!(div255(v * 255), v);
    }
}

#[test]
fn round_up_to_alignment() {
    assert_eq!(round_up(0, 16), 0);
    assert_eq!(round_up(1, 16), 16);
    assert_eq!(round_up(16, 16), 16);
    assert_eq!(round_up(17, 16), 32);
}

#[test]
fn try_alloc_zero_fills() {
    let v: Vec<u32> = try_alloc(7).unwrap();
    assert_eq!(v, vec![0; 7]);
    assert!(try_alloc::<u64>(usize::MAX / 4).is_err());
}

#[test]
fn checked_area_overflow_is_oom() {
    assert_eq!(checked_area(3, 4).unwrap(), 12);
    assert!(checked_area(usize::MAX, 2).unwrap_err().is_out_of_memory());
}
