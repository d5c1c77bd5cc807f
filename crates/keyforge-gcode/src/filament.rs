//! Filament length accumulation.

use crate::command::{CommandKind, GcodeCommand};

/// Running filament-length accumulator.
///
/// Starts in absolute extrusion mode. In absolute mode only positive E
/// deltas count (retractions are ignored); in relative mode the raw signed
/// E value is summed, so retractions subtract.
#[derive(Debug, Clone)]
pub struct ExtrusionTally {
    absolute: bool,
    last_e: f64,
    total_mm: f64,
}

impl ExtrusionTally {
    /// New tally in absolute mode with a zero baseline.
    pub fn new() -> Self {
        Self {
            absolute: true,
            last_e: 0.0,
            total_mm: 0.0,
        }
    }

    /// Feed one parsed command into the tally.
    pub fn feed(&mut self, cmd: &GcodeCommand) {
        match cmd.kind {
            CommandKind::SetAbsoluteExtrusion => {
                self.absolute = true;
                // Reset the baseline so a stale E value cannot be carried
                // across the mode switch and miscounted.
                self.last_e = 0.0;
            }
            CommandKind::SetRelativeExtrusion => {
                self.absolute = false;
            }
            CommandKind::LinearMove => {
                let Some(e) = cmd.e else { return };
                if self.absolute {
                    if e > self.last_e {
                        self.total_mm += e - self.last_e;
                    }
                    self.last_e = e;
                } else {
                    self.total_mm += e;
                }
            }
            _ => {}
        }
    }

    /// Cumulative filament length in millimeters.
    pub fn total_mm(&self) -> f64 {
        self.total_mm
    }
}

impl Default for ExtrusionTally {
    fn default() -> Self {
        Self::new()
    }
}
