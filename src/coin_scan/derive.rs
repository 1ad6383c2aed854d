//! Text regions derived from a detected coin

use super::config::RegionLayout;
use super::error::{ScanError, ScanResult};
use super::region::Rect;

fn contained(region: Rect, slice_size: (u32, u32)) -> ScanResult<Rect> {
    if region.fits_within(slice_size.0, slice_size.1) {
        Ok(region)
    } else {
        Err(ScanError::RegionOutOfBounds {
            region,
            width: slice_size.0,
            height: slice_size.1,
        })
    }
}

/// Strip right of the coin running to the slice's right edge, same top as the coin
pub fn derive_number_region(
    anchor: &Rect,
    slice_size: (u32, u32),
    layout: &RegionLayout,
) -> ScanResult<Rect> {
    let x = anchor.right();
    let region = Rect::new(
        x,
        anchor.y,
        slice_size.0 as i32 - x,
        layout.number_height,
    );
    contained(region, slice_size)
}

/// Fixed-size name box at a constant vertical offset from the coin
pub fn derive_name_region(
    anchor: &Rect,
    slice_size: (u32, u32),
    layout: &RegionLayout,
) -> ScanResult<Rect> {
    let region = Rect::new(
        layout.name_x,
        anchor.y + layout.name_offset_y,
        layout.name_width,
        layout.name_height,
    );
    contained(region, slice_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLICE: (u32, u32) = (900, 600);

    #[test]
    fn test_number_region_right_of_anchor() {
        let anchor = Rect::new(700, 100, 40, 40);
        let number = derive_number_region(&anchor, SLICE, &RegionLayout::default()).unwrap();
        assert_eq!(number, Rect::new(740, 100, 160, 30));
    }

    #[test]
    fn test_anchor_on_right_edge_is_out_of_bounds() {
        let anchor = Rect::new(860, 100, 40, 40);
        let err = derive_number_region(&anchor, SLICE, &RegionLayout::default()).unwrap_err();
        assert!(matches!(err, ScanError::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_number_region_below_slice_bottom() {
        let anchor = Rect::new(700, 580, 40, 20);
        assert!(derive_number_region(&anchor, SLICE, &RegionLayout::default()).is_err());
    }

    #[test]
    fn test_number_region_never_leaves_slice() {
        let layout = RegionLayout::default();
        for x in (0..900).step_by(37) {
            for y in (0..600).step_by(41) {
                let anchor = Rect::new(x, y, 40, 40);
                if let Ok(r) = derive_number_region(&anchor, SLICE, &layout) {
                    assert!(r.x >= 0 && r.y >= 0);
                    assert!(r.right() <= 900 && r.bottom() <= 600);
                    assert!(r.width > 0);
                }
            }
        }
    }

    #[test]
    fn test_name_region_above_top_is_rejected() {
        let anchor = Rect::new(700, 100, 40, 40);
        match derive_name_region(&anchor, SLICE, &RegionLayout::default()) {
            Err(ScanError::RegionOutOfBounds { region, .. }) => {
                assert_eq!(region, Rect::new(0, -25, 260, 30))
            }
            other => panic!("expected out of bounds, got {other:?}"),
        }
    }

    #[test]
    fn test_name_region_offset() {
        let anchor = Rect::new(700, 300, 40, 40);
        let name = derive_name_region(&anchor, SLICE, &RegionLayout::default()).unwrap();
        assert_eq!(name, Rect::new(0, 175, 260, 30));
    }

    #[test]
    fn test_name_region_wider_than_slice() {
        let anchor = Rect::new(100, 300, 40, 40);
        assert!(derive_name_region(&anchor, (200, 600), &RegionLayout::default()).is_err());
    }
}
