#![warn(missing_docs)]

//! Streaming G-code analysis for keyforge.
//!
//! Recovers physical quantities from a G-code instruction stream in a
//! single line-by-line pass with bounded memory:
//!
//! - cumulative filament length (mm), via [`ExtrusionTally`]
//! - estimated print time (s / h), via [`MotionEstimator`]
//!
//! Supported command subset: `G0`, `G1`, `G4`, `M82`, `M83` with optional
//! `X`/`Y`/`Z`/`E`/`F`/`P` words. The parser is deliberately non-strict:
//! malformed or unrecognized lines are skipped, never fatal.
//!
//! # Example
//!
//! ```
//! use keyforge_gcode::analyze_str;
//!
//! let analysis = analyze_str("G1 X0 Y0 Z0 F600\nG1 X10 E5\n");
//! assert!((analysis.filament_mm - 5.0).abs() < 1e-9);
//! assert!((analysis.time_seconds - 1.0).abs() < 1e-9);
//! ```

pub mod command;
pub mod error;
pub mod filament;
pub mod time;

pub use command::{parse_line, CommandKind, GcodeCommand};
pub use error::{GcodeError, Result};
pub use filament::ExtrusionTally;
pub use time::{MotionEstimator, DEFAULT_FEED_RATE_MM_MIN};

use std::io::{BufRead, BufReader};
use std::path::Path;

/// Combined result of one analysis pass over a G-code stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcodeAnalysis {
    /// Total filament consumed, in millimeters.
    pub filament_mm: f64,
    /// Estimated print time, in seconds.
    pub time_seconds: f64,
}

impl GcodeAnalysis {
    /// Estimated print time in hours.
    pub fn time_hours(&self) -> f64 {
        self.time_seconds / 3600.0
    }
}

/// Analyze G-code held in memory.
pub fn analyze_str(text: &str) -> GcodeAnalysis {
    let mut tally = ExtrusionTally::new();
    let mut motion = MotionEstimator::new();

    for line in text.lines() {
        let cmd = parse_line(line);
        tally.feed(&cmd);
        motion.feed(&cmd);
    }

    GcodeAnalysis {
        filament_mm: tally.total_mm(),
        time_seconds: motion.seconds(),
    }
}

/// Analyze a G-code file, streaming it line by line.
///
/// Returns [`GcodeError::NotFound`] if the file does not exist. Lines that
/// are not valid UTF-8 are skipped like any other unrecognized input.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<GcodeAnalysis> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GcodeError::NotFound(path.to_path_buf())
        } else {
            GcodeError::Io(e)
        }
    })?;

    let mut tally = ExtrusionTally::new();
    let mut motion = MotionEstimator::new();
    let mut skipped = 0usize;

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let cmd = parse_line(&line);
        tally.feed(&cmd);
        motion.feed(&cmd);
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} undecodable lines in {}", path.display());
    }

    let analysis = GcodeAnalysis {
        filament_mm: tally.total_mm(),
        time_seconds: motion.seconds(),
    };
    log::info!(
        "analyzed {}: {:.1} mm filament, {:.1} s estimated",
        path.display(),
        analysis.filament_mm,
        analysis.time_seconds
    );
    Ok(analysis)
}
