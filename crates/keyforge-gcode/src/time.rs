//! Kinematic print-time estimation.

use nalgebra::Vector3;

use crate::command::{CommandKind, GcodeCommand};

/// Default feed rate assumed before the first `F` word, in mm/min.
pub const DEFAULT_FEED_RATE_MM_MIN: f64 = 1000.0;

/// Running time estimator over G-code motion commands.
///
/// Positions start undefined; distance only accumulates once all three
/// axes have a known previous value. Feed-rate words are honored on every
/// line, not just on moves.
#[derive(Debug, Clone)]
pub struct MotionEstimator {
    position: [Option<f64>; 3],
    feed_mm_s: f64,
    seconds: f64,
}

impl MotionEstimator {
    /// New estimator with the default feed rate and no known position.
    pub fn new() -> Self {
        Self {
            position: [None, None, None],
            feed_mm_s: DEFAULT_FEED_RATE_MM_MIN / 60.0,
            seconds: 0.0,
        }
    }

    /// Feed one parsed command into the estimator.
    pub fn feed(&mut self, cmd: &GcodeCommand) {
        if let Some(f) = cmd.f {
            if f >= 0.0 {
                self.feed_mm_s = f / 60.0;
            }
        }

        match cmd.kind {
            CommandKind::Dwell => {
                if let Some(p) = cmd.p {
                    self.seconds += p / 1000.0;
                }
            }
            CommandKind::LinearMove => {
                let [last_x, last_y, last_z] = self.position;
                let x = cmd.x.or(last_x);
                let y = cmd.y.or(last_y);
                let z = cmd.z.or(last_z);

                if let (Some(x0), Some(y0), Some(z0)) = (last_x, last_y, last_z) {
                    // Carried-forward axes are Some whenever the previous
                    // position was fully known.
                    let target = Vector3::new(x.unwrap_or(x0), y.unwrap_or(y0), z.unwrap_or(z0));
                    let distance = (target - Vector3::new(x0, y0, z0)).norm();
                    if self.feed_mm_s > 0.0 {
                        self.seconds += distance / self.feed_mm_s;
                    }
                }

                self.position = [x, y, z];
            }
            _ => {}
        }
    }

    /// Cumulative estimated time in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Cumulative estimated time in hours.
    pub fn hours(&self) -> f64 {
        self.seconds / 3600.0
    }
}

impl Default for MotionEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_line;
    use approx::assert_relative_eq;

    fn run(lines: &[&str]) -> f64 {
        let mut est = MotionEstimator::new();
        for line in lines {
            est.feed(&parse_line(line));
        }
        est.seconds()
    }

    #[test]
    fn test_first_move_establishes_position() {
        // No previous position: the first move contributes no time.
        let secs = run(&["G1 X10 Y0 Z0 F600"]);
        assert_relative_eq!(secs, 0.0);
    }

    #[test]
    fn test_ten_mm_at_600_is_one_second() {
        // 600 mm/min = 10 mm/s, so a 10mm move takes 1s (1/3600 h).
        let secs = run(&["G1 X0 Y0 Z0 F600", "G1 X10"]);
        assert_relative_eq!(secs, 1.0);

        let mut est = MotionEstimator::new();
        for line in ["G1 X0 Y0 Z0 F600", "G1 X10"] {
            est.feed(&parse_line(line));
        }
        assert_relative_eq!(est.hours(), 1.0 / 3600.0);
    }

    #[test]
    fn test_time_scales_with_distance() {
        let once = run(&["G1 X0 Y0 Z0 F600", "G1 X10"]);
        let twice = run(&["G1 X0 Y0 Z0 F600", "G1 X20"]);
        assert_relative_eq!(twice, 2.0 * once);
    }

    #[test]
    fn test_time_inverse_in_feed_rate() {
        let slow = run(&["G1 X0 Y0 Z0 F600", "G1 X10"]);
        let fast = run(&["G1 X0 Y0 Z0 F1200", "G1 X10"]);
        assert_relative_eq!(slow, 2.0 * fast);
    }

    #[test]
    fn test_dwell_adds_milliseconds() {
        let secs = run(&["G4 P2500"]);
        assert_relative_eq!(secs, 2.5);
    }

    #[test]
    fn test_zero_feed_rate_skips_distance() {
        // Time must not divide by zero; position still advances.
        let secs = run(&["G1 X0 Y0 Z0 F0", "G1 X10", "G1 X20 F600"]);
        assert_relative_eq!(secs, 1.0);
    }

    #[test]
    fn test_axes_carry_forward() {
        // Second move omits Y/Z; distance is pure X.
        let secs = run(&["G1 X0 Y5 Z1 F600", "G1 X10"]);
        assert_relative_eq!(secs, 1.0);
    }

    #[test]
    fn test_feed_update_on_non_move_line() {
        let secs = run(&["G1 X0 Y0 Z0", "M204 F600", "G1 X10"]);
        assert_relative_eq!(secs, 1.0);
    }

    #[test]
    fn test_euclidean_distance() {
        let secs = run(&["G1 X0 Y0 Z0 F600", "G1 X3 Y4"]);
        assert_relative_eq!(secs, 0.5);
    }
}
