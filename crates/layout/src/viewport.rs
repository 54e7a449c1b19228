//! Preview scale: fitting a page into the visible viewport.

use cardpress_types::Size;

/// Lower bound for the preview scale, so pointer deltas can always be divided by it.
pub const MIN_PREVIEW_SCALE: f32 = 0.1;

/// Uniform pixels-per-point factor that fits `page` inside `available`
/// (already net of padding), capped at `scale_cap`.
pub fn fit_scale(available: Size, page: Size, scale_cap: f32) -> f32 {
    if available.is_empty() || page.is_empty() {
        return MIN_PREVIEW_SCALE;
    }
    let scale_x = available.width / page.width;
    let scale_y = available.height / page.height;
    scale_x.min(scale_y).min(scale_cap).max(MIN_PREVIEW_SCALE)
}

/// Shrinks a viewport by `padding` on each axis.
pub fn padded(viewport: Size, padding: f32) -> Size {
    Size::new(
        (viewport.width - padding).max(0.0),
        (viewport.height - padding).max(0.0),
    )
}

/// The scale as a percentage integer (e.g. 100 for 1.0).
pub fn zoom_percent(scale: f32) -> u32 {
    (scale * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_limited_by_height() {
        let scale = fit_scale(Size::new(1000.0, 324.0), Size::new(432.0, 648.0), 1.0);
        assert_eq!(scale, 0.5);
    }

    #[test]
    fn test_fit_is_capped() {
        let scale = fit_scale(Size::new(4000.0, 4000.0), Size::new(432.0, 648.0), 1.2);
        assert_eq!(scale, 1.2);
    }

    #[test]
    fn test_degenerate_viewport_uses_floor() {
        assert_eq!(fit_scale(Size::zero(), Size::new(432.0, 648.0), 1.0), MIN_PREVIEW_SCALE);
        assert_eq!(fit_scale(Size::new(10.0, 10.0), Size::new(432.0, 648.0), 1.0), MIN_PREVIEW_SCALE);
    }

    #[test]
    fn test_padded_and_percent() {
        assert_eq!(padded(Size::new(472.0, 30.0), 40.0), Size::new(432.0, 0.0));
        assert_eq!(zoom_percent(0.756), 76);
    }
}
