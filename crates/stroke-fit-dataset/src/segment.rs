//! Stroke foreground segmentation: Otsu binarization and largest-region
//! search over the binary mask.

use std::collections::VecDeque;

use stroke_fit_core::GrayRasterView;

/// Pixel-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    /// Expand by `margin` on every side, clamped to an `img_w`×`img_h`
    /// image.
    pub fn expanded(&self, margin: u32, img_w: u32, img_h: u32) -> PixelBox {
        let x0 = self.x.saturating_sub(margin);
        let y0 = self.y.saturating_sub(margin);
        let x1 = (self.x + self.width).saturating_add(margin).min(img_w);
        let y1 = (self.y + self.height).saturating_add(margin).min(img_h);
        PixelBox {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// Otsu threshold over the full image histogram (maximum between-class
/// variance).
pub fn otsu_threshold(img: &GrayRasterView<'_>) -> u8 {
    if img.data.is_empty() {
        return 127;
    }

    let mut hist = [0u32; 256];
    for &v in img.data {
        hist[v as usize] += 1;
    }

    let total = img.data.len() as f64;
    let mut sum_total = 0f64;
    for (i, &h) in hist.iter().enumerate() {
        sum_total += (i as f64) * (h as f64);
    }

    let mut sum_below = 0f64;
    let mut weight_below = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        weight_below += h as f64;
        if weight_below < 1.0 {
            continue;
        }
        let weight_above = total - weight_below;
        if weight_above < 1.0 {
            break;
        }

        sum_below += (t as f64) * (h as f64);
        let mean_below = sum_below / weight_below;
        let mean_above = (sum_total - sum_below) / weight_above;

        let var_between =
            weight_below * weight_above * (mean_below - mean_above) * (mean_below - mean_above);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// Binary mask selecting pixels at or below `threshold` (dark stroke on
/// light paper).
pub fn dark_foreground_mask(img: &GrayRasterView<'_>, threshold: u8) -> Vec<bool> {
    img.data.iter().map(|&v| v <= threshold).collect()
}

/// Bounding box of the largest 4-connected foreground region, or `None` for
/// an empty mask.
pub fn largest_region(mask: &[bool], width: usize, height: usize) -> Option<PixelBox> {
    debug_assert_eq!(mask.len(), width * height);

    let mut visited = vec![false; mask.len()];
    let mut best: Option<(usize, PixelBox)> = None;
    let mut queue = VecDeque::new();

    for start in 0..mask.len() {
        if !mask[start] || visited[start] {
            continue;
        }

        let mut area = 0usize;
        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);

        visited[start] = true;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            let x = idx % width;
            let y = idx / width;
            area += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            if x > 0 && mask[idx - 1] && !visited[idx - 1] {
                visited[idx - 1] = true;
                queue.push_back(idx - 1);
            }
            if x + 1 < width && mask[idx + 1] && !visited[idx + 1] {
                visited[idx + 1] = true;
                queue.push_back(idx + 1);
            }
            if y > 0 && mask[idx - width] && !visited[idx - width] {
                visited[idx - width] = true;
                queue.push_back(idx - width);
            }
            if y + 1 < height && mask[idx + width] && !visited[idx + width] {
                visited[idx + width] = true;
                queue.push_back(idx + width);
            }
        }

        let bbox = PixelBox {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        };
        if best.map(|(a, _)| area > a).unwrap_or(true) {
            best = Some((area, bbox));
        }
    }

    best.map(|(_, bbox)| bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroke_fit_core::GrayRaster;

    #[test]
    fn otsu_splits_a_bimodal_histogram() {
        let mut data = vec![20u8; 32];
        data.extend(vec![200u8; 32]);
        let r = GrayRaster::from_raw(8, 8, data).unwrap();
        let t = otsu_threshold(&r.view());
        assert!((20..200).contains(&t), "threshold {t} outside (20, 200)");
    }

    #[test]
    fn otsu_uniform_image_is_harmless() {
        let r = GrayRaster::from_raw(4, 4, vec![90u8; 16]).unwrap();
        let t = otsu_threshold(&r.view());
        let mask = dark_foreground_mask(&r.view(), t);
        // uniform image: whatever the threshold, the mask must be uniform too
        assert!(mask.iter().all(|&m| m == mask[0]));
    }

    #[test]
    fn largest_region_picks_the_biggest_blob() {
        // 8x4: a 2-pixel blob at the left, a 6-pixel blob at the right
        let mut mask = vec![false; 32];
        mask[0] = true;
        mask[1] = true;
        for y in 1..3 {
            for x in 5..8 {
                mask[y * 8 + x] = true;
            }
        }
        let bbox = largest_region(&mask, 8, 4).unwrap();
        assert_eq!(
            bbox,
            PixelBox {
                x: 5,
                y: 1,
                width: 3,
                height: 2
            }
        );
    }

    #[test]
    fn diagonal_pixels_are_separate_regions() {
        let mut mask = vec![false; 16];
        mask[0] = true; // (0,0)
        mask[5] = true; // (1,1)
        let bbox = largest_region(&mask, 4, 4).unwrap();
        assert_eq!((bbox.width, bbox.height), (1, 1));
    }

    #[test]
    fn empty_mask_has_no_region() {
        assert!(largest_region(&[false; 16], 4, 4).is_none());
    }

    #[test]
    fn expansion_clamps_to_the_image() {
        let bbox = PixelBox {
            x: 2,
            y: 1,
            width: 4,
            height: 3,
        };
        let grown = bbox.expanded(5, 10, 8);
        assert_eq!(
            grown,
            PixelBox {
                x: 0,
                y: 0,
                width: 10,
                height: 8
            }
        );

        let inner = PixelBox {
            x: 20,
            y: 20,
            width: 4,
            height: 4,
        };
        let grown = inner.expanded(5, 100, 100);
        assert_eq!(
            grown,
            PixelBox {
                x: 15,
                y: 15,
                width: 14,
                height: 14
            }
        );
    }
}
