use serde::{Deserialize, Serialize};

/// Column count used while the viewport is narrower than `below_width`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ColumnBreakpoint {
    pub below_width: f32,
    pub columns: usize,
}

impl ColumnBreakpoint {
    pub const fn new(below_width: f32, columns: usize) -> Self {
        Self {
            below_width,
            columns,
        }
    }
}

/// Responsive column layout of the feed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Ascending by `below_width`; the first matching breakpoint wins.
    pub breakpoints: Vec<ColumnBreakpoint>,
    /// Column count for viewports wider than every breakpoint.
    pub wide_columns: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                ColumnBreakpoint::new(640.0, 2),
                ColumnBreakpoint::new(1024.0, 3),
                ColumnBreakpoint::new(1440.0, 4),
            ],
            wide_columns: 5,
        }
    }
}

impl LayoutSettings {
    /// Smallest column count any viewport can produce.
    pub fn min_columns(&self) -> usize {
        self.breakpoints
            .iter()
            .map(|bp| bp.columns)
            .chain(std::iter::once(self.wide_columns))
            .min()
            .unwrap_or(1)
            .max(1)
    }
}
