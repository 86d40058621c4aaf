use super::MotionEvent;

/// Forward travel through one deck cycle.
///
/// Travel is net displacement since the cycle started, floored at zero so
/// scrolling back past the start does not bank negative progress. Each
/// milestone fires once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleProgress {
    travel: f64,
    entered_end_zone: bool,
    completed: bool,
}

impl CycleProgress {
    pub fn travel(&self) -> f64 {
        self.travel
    }

    pub fn entered_end_zone(&self) -> bool {
        self.entered_end_zone
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub(super) fn record(&mut self, delta: f64) {
        if self.completed || !delta.is_finite() {
            return;
        }
        self.travel = (self.travel + delta).max(0.0);
    }

    /// Milestones crossed since the last call, in order.
    pub(super) fn milestones(
        &mut self,
        loop_height: f64,
        end_zone_ratio: f64,
    ) -> Vec<MotionEvent> {
        let mut events = Vec::new();
        if loop_height <= 0.0 {
            return events;
        }
        if !self.entered_end_zone
            && self.travel >= loop_height * end_zone_ratio
        {
            self.entered_end_zone = true;
            events.push(MotionEvent::EnteredEndZone);
        }
        if !self.completed && self.travel >= loop_height {
            self.completed = true;
            events.push(MotionEvent::Completed);
        }
        events
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_fire_once_in_order() {
        let mut progress = CycleProgress::default();
        progress.record(80.0);
        assert!(progress.milestones(100.0, 0.85).is_empty());

        progress.record(10.0);
        assert_eq!(
            progress.milestones(100.0, 0.85),
            vec![MotionEvent::EnteredEndZone]
        );
        assert!(progress.milestones(100.0, 0.85).is_empty());

        progress.record(10.0);
        assert_eq!(
            progress.milestones(100.0, 0.85),
            vec![MotionEvent::Completed]
        );
        assert!(progress.milestones(100.0, 0.85).is_empty());
    }

    #[test]
    fn one_big_step_crosses_both_milestones() {
        let mut progress = CycleProgress::default();
        progress.record(250.0);
        assert_eq!(
            progress.milestones(100.0, 0.85),
            vec![MotionEvent::EnteredEndZone, MotionEvent::Completed]
        );
    }

    #[test]
    fn backward_travel_floors_at_zero() {
        let mut progress = CycleProgress::default();
        progress.record(-50.0);
        progress.record(20.0);
        assert_eq!(progress.travel(), 20.0);
    }
}
