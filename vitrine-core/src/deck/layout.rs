use vitrine_config::LayoutSettings;

/// Visible column count for a viewport `width` px wide.
///
/// Non-finite or non-positive widths (unmeasured layout) fall back to the
/// smallest count the layout can produce.
pub fn columns_for_width(width: f32, layout: &LayoutSettings) -> usize {
    if !width.is_finite() || width <= 0.0 {
        return layout.min_columns();
    }

    layout
        .breakpoints
        .iter()
        .find(|bp| width < bp.below_width)
        .map_or(layout.wide_columns, |bp| bp.columns)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_breakpoints() {
        let layout = LayoutSettings::default();
        assert_eq!(columns_for_width(375.0, &layout), 2);
        assert_eq!(columns_for_width(640.0, &layout), 3);
        assert_eq!(columns_for_width(1023.9, &layout), 3);
        assert_eq!(columns_for_width(1280.0, &layout), 4);
        assert_eq!(columns_for_width(1440.0, &layout), 5);
        assert_eq!(columns_for_width(3840.0, &layout), 5);
    }

    #[test]
    fn unmeasured_width_uses_minimum() {
        let layout = LayoutSettings::default();
        assert_eq!(columns_for_width(0.0, &layout), 2);
        assert_eq!(columns_for_width(-10.0, &layout), 2);
        assert_eq!(columns_for_width(f32::NAN, &layout), 2);
    }
}
