//! Line-level G-code parsing.
//!
//! Recognizes the subset the analyzers care about: `G0`/`G1` linear moves,
//! `G4` dwells, and the `M82`/`M83` extrusion-mode switches. Everything
//! else parses as [`CommandKind::Other`], keeping any `F` word so feed-rate
//! updates on unrecognized lines are still observed.

/// Kind of a parsed G-code line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// `G0`/`G1` linear move.
    LinearMove,
    /// `G4` dwell (pause).
    Dwell,
    /// `M82` — switch to absolute extrusion.
    SetAbsoluteExtrusion,
    /// `M83` — switch to relative extrusion.
    SetRelativeExtrusion,
    /// Anything else (comments, temperatures, fans, ...).
    Other,
}

/// One parsed G-code line: a kind tag plus optional numeric words.
///
/// Commands are ephemeral — produced per line and consumed immediately by
/// the accumulators, never retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcodeCommand {
    /// Command kind.
    pub kind: CommandKind,
    /// Target X coordinate (mm).
    pub x: Option<f64>,
    /// Target Y coordinate (mm).
    pub y: Option<f64>,
    /// Target Z coordinate (mm).
    pub z: Option<f64>,
    /// Extrusion axis value (mm).
    pub e: Option<f64>,
    /// Feed rate (mm/min).
    pub f: Option<f64>,
    /// Dwell duration (ms).
    pub p: Option<f64>,
}

impl GcodeCommand {
    fn empty(kind: CommandKind) -> Self {
        Self {
            kind,
            x: None,
            y: None,
            z: None,
            e: None,
            f: None,
            p: None,
        }
    }
}

/// Parse a single G-code line. Best-effort: never fails.
///
/// Comments (`;` to end of line) are stripped, unparseable numeric words
/// are treated as absent, and unknown commands come back as `Other`.
pub fn parse_line(line: &str) -> GcodeCommand {
    let code = line.split(';').next().unwrap_or("").trim();

    let mut tokens = code.split_whitespace();
    let kind = match tokens.next() {
        Some("G0") | Some("G1") => CommandKind::LinearMove,
        Some("G4") => CommandKind::Dwell,
        Some("M82") => CommandKind::SetAbsoluteExtrusion,
        Some("M83") => CommandKind::SetRelativeExtrusion,
        _ => CommandKind::Other,
    };

    let mut cmd = GcodeCommand::empty(kind);
    for token in tokens {
        let Some(letter) = token.chars().next() else {
            continue;
        };
        let value: Option<f64> = token[letter.len_utf8()..].parse().ok();
        if value.is_none() {
            continue;
        }
        match letter.to_ascii_uppercase() {
            'X' => cmd.x = value,
            'Y' => cmd.y = value,
            'Z' => cmd.z = value,
            'E' => cmd.e = value,
            'F' => cmd.f = value,
            'P' => cmd.p = value,
            _ => {}
        }
    }

    cmd
}
