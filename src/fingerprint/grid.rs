//! Integer grayscale conversion and area-average downscaling.
//!
//! Everything here is integer arithmetic so the same pixels produce the
//! same grid on every platform and every run.

use image::RgbImage;

/// Luminance weights scaled by 1000 (ITU-R BT.601).
const LUMA_R: u32 = 299;
const LUMA_G: u32 = 587;
const LUMA_B: u32 = 114;

/// Grayscale plane with luminance in `0..=255_000`.
pub(crate) struct LumaPlane {
    width: u32,
    height: u32,
    values: Vec<u32>,
}

impl LumaPlane {
    pub(crate) fn from_rgb(img: &RgbImage) -> Self {
        let values = img
            .pixels()
            .map(|p| LUMA_R * u32::from(p[0]) + LUMA_G * u32::from(p[1]) + LUMA_B * u32::from(p[2]))
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            values,
        }
    }

    /// Box-filter the plane down to `cols x rows`, row-major.
    ///
    /// Each cell averages its source rectangle `[c*w/cols, (c+1)*w/cols)`;
    /// a rectangle is never empty, so planes smaller than the grid repeat
    /// source pixels instead of dividing by zero.
    pub(crate) fn downscale(&self, cols: u32, rows: u32) -> Vec<u64> {
        let bounds = |cell: u32, cells: u32, extent: u32| {
            let start = (u64::from(cell) * u64::from(extent) / u64::from(cells)) as u32;
            let start = start.min(extent - 1);
            let end = (u64::from(cell + 1) * u64::from(extent) / u64::from(cells)) as u32;
            (start, end.max(start + 1))
        };

        let mut cells = Vec::with_capacity((cols * rows) as usize);
        for cy in 0..rows {
            let (y0, y1) = bounds(cy, rows, self.height);
            for cx in 0..cols {
                let (x0, x1) = bounds(cx, cols, self.width);
                let mut sum = 0u64;
                for y in y0..y1 {
                    let row = y as usize * self.width as usize;
                    sum += self.values[row + x0 as usize..row + x1 as usize]
                        .iter()
                        .map(|&v| u64::from(v))
                        .sum::<u64>();
                }
                let count = u64::from(y1 - y0) * u64::from(x1 - x0);
                cells.push(sum / count);
            }
        }
        cells
    }
}
