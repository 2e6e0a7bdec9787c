use image::RgbImage;

/// Tight bounding box of non-white content: every pixel whose grayscale
/// value falls below `threshold`. Returns `(x, y, width, height)`, or `None`
/// for an entirely white (or empty) pixmap.
pub fn content_bounds(img: &RgbImage, threshold: u8) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (x, y, px) in img.enumerate_pixels() {
        let [r, g, b] = px.0;
        // Rec. 601 luma
        let luma = ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8;
        if luma < threshold {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if found {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    }
}

/// Crop a rendered figure to its content plus an aesthetic margin.
///
/// An all-white pixmap is returned unchanged: an empty crop would lose the
/// region entirely, which is worse than emitting blank padding.
pub fn trim_whitespace(img: &RgbImage, threshold: u8, margin: u32) -> RgbImage {
    let Some((x, y, w, h)) = content_bounds(img, threshold) else {
        return img.clone();
    };

    let x0 = x.saturating_sub(margin);
    let y0 = y.saturating_sub(margin);
    let x1 = (x + w + margin).min(img.width());
    let y1 = (y + h + margin).min(img.height());

    image::imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image()
}
