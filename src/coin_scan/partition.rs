//! Border cropping and equal-width vertical slicing of screenshots

use super::config::BorderCrop;
use super::error::{ScanError, ScanResult};
use super::region::Rect;
use image::RgbImage;

/// One vertical band of a cropped screenshot. The pixels are an owned copy.
#[derive(Debug, Clone)]
pub struct Slice {
    pub index: usize,
    /// Position of the slice in source image coordinates
    pub origin: Rect,
    pub image: RgbImage,
}

impl Slice {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Lazy iterator over the slices of one screenshot. Each slice is cropped
/// only when requested; [`SliceIter::restart`] rewinds to the first slice.
#[derive(Debug, Clone)]
pub struct SliceIter<'a> {
    source: &'a RgbImage,
    cropped: Rect,
    slice_width: u32,
    count: usize,
    next: usize,
}

impl<'a> SliceIter<'a> {
    /// Width shared by every slice (integer division of the cropped width)
    pub fn slice_width(&self) -> u32 {
        self.slice_width
    }

    /// Pixels on the right of the cropped area that belong to no slice
    pub fn dropped_columns(&self) -> u32 {
        (self.cropped.width as u32).saturating_sub(self.slice_width * self.count as u32)
    }

    pub fn restart(&self) -> Self {
        Self {
            next: 0,
            ..self.clone()
        }
    }

    fn slice_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.cropped.x + (index as u32 * self.slice_width) as i32,
            self.cropped.y,
            self.slice_width as i32,
            self.cropped.height,
        )
    }
}

impl Iterator for SliceIter<'_> {
    type Item = Slice;

    fn next(&mut self) -> Option<Slice> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let origin = self.slice_rect(index);
        let (x, y, w, h) = origin.to_crop();
        let image = image::imageops::crop_imm(self.source, x, y, w, h).to_image();
        Some(Slice {
            index,
            origin,
            image,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SliceIter<'_> {}

/// Crop `crop` off the borders of `source` and split what remains into
/// `slice_count` equal vertical slices.
///
/// Slice width is `cropped_width / slice_count`; remainder columns on the
/// right are not assigned to any slice. Zero slices, or more slices than
/// columns, produce an empty sequence.
pub fn partition<'a>(
    source: &'a RgbImage,
    crop: &BorderCrop,
    slice_count: u32,
) -> ScanResult<SliceIter<'a>> {
    let cropped = crop
        .apply(source.width(), source.height())
        .ok_or(ScanError::CropTooLarge {
            width: source.width(),
            height: source.height(),
        })?;

    let slice_width = if slice_count == 0 {
        0
    } else {
        cropped.width as u32 / slice_count
    };
    let count = if slice_width == 0 {
        0
    } else {
        slice_count as usize
    };

    Ok(SliceIter {
        source,
        cropped,
        slice_width,
        count,
        next: 0,
    })
}
