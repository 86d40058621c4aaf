/// Unit of a wheel event's delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WheelMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Vertical wheel input as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    pub mode: WheelMode,
    /// Positive scrolls forward through the deck.
    pub delta_y: f64,
}

impl WheelDelta {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            mode: WheelMode::Pixel,
            delta_y,
        }
    }

    pub fn lines(delta_y: f64) -> Self {
        Self {
            mode: WheelMode::Line,
            delta_y,
        }
    }

    pub fn pages(delta_y: f64) -> Self {
        Self {
            mode: WheelMode::Page,
            delta_y,
        }
    }

    /// Delta in pixels. Non-finite input converts to 0.
    pub fn to_pixels(self, line_height: f64, page_height: f64) -> f64 {
        let px = match self.mode {
            WheelMode::Pixel => self.delta_y,
            WheelMode::Line => self.delta_y * line_height,
            WheelMode::Page => self.delta_y * page_height,
        };
        if px.is_finite() { px } else { 0.0 }
    }
}
