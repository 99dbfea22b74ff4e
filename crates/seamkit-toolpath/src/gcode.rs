//! G-code text output.
//!
//! A motion instruction renders as `G1` followed by its present words in
//! `X Y Z E F` order and an optional ` ;tag` comment:
//!
//! ```text
//! G1 X90 Y70 Z0.3 E0.0123 F3000 ;slope
//! ```
//!
//! Literal lines (printer macros, fan commands) pass through untouched.

use crate::motion::MotionInstruction;
use seamkit_core::constants::LINEAR_MOVE;
use seamkit_core::Result;
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Number formatting for G-code words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GcodeFormatter {
    precision: Option<usize>,
}

impl GcodeFormatter {
    /// Shortest round-trip formatting (`12000`, `-0.5`, `0.123456789`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed number of decimal places.
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision: Some(precision),
        }
    }

    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    pub fn format_value(&self, value: f64) -> String {
        let text = match self.precision {
            Some(p) => format!("{:.*}", p, value),
            None => format!("{}", value),
        };
        // Never write "-0" or "-0.000"
        match text.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
            _ => text,
        }
    }

    pub fn format_motion(&self, motion: &MotionInstruction) -> String {
        let mut line = String::from(LINEAR_MOVE);
        let words = [
            ('X', motion.x()),
            ('Y', motion.y()),
            ('Z', motion.z()),
            ('E', motion.e()),
            ('F', motion.feed_rate()),
        ];
        for (letter, value) in words {
            if let Some(value) = value {
                line.push(' ');
                line.push(letter);
                line.push_str(&self.format_value(value));
            }
        }
        if let Some(tag) = motion.tag() {
            line.push_str(" ;");
            line.push_str(tag.as_str());
        }
        line
    }
}

impl fmt::Display for MotionInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&GcodeFormatter::default().format_motion(self))
    }
}

/// One line of the output program.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramLine {
    /// Opaque printer command written verbatim
    Literal(String),
    Motion(MotionInstruction),
}

impl ProgramLine {
    pub fn render(&self, formatter: &GcodeFormatter) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Motion(motion) => formatter.format_motion(motion),
        }
    }
}

/// An ordered G-code program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcodeProgram {
    lines: Vec<ProgramLine>,
}

impl GcodeProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_literal(&mut self, line: impl Into<String>) {
        self.lines.push(ProgramLine::Literal(line.into()));
    }

    pub fn push_motion(&mut self, motion: MotionInstruction) {
        self.lines.push(ProgramLine::Motion(motion));
    }

    pub fn extend_motions(&mut self, motions: impl IntoIterator<Item = MotionInstruction>) {
        self.lines
            .extend(motions.into_iter().map(ProgramLine::Motion));
    }

    pub fn lines(&self) -> &[ProgramLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn motions(&self) -> impl Iterator<Item = &MotionInstruction> {
        self.lines.iter().filter_map(|line| match line {
            ProgramLine::Motion(motion) => Some(motion),
            ProgramLine::Literal(_) => None,
        })
    }

    /// Total filament fed by the program, retractions included (mm).
    pub fn total_extrusion(&self) -> f64 {
        self.motions().filter_map(MotionInstruction::e).sum()
    }

    /// Renders the program, one command per line.
    pub fn render(&self, formatter: &GcodeFormatter) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.render(formatter));
            text.push('\n');
        }
        text
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, formatter: &GcodeFormatter) -> Result<()> {
        for line in &self.lines {
            writeln!(writer, "{}", line.render(formatter))?;
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path, formatter: &GcodeFormatter) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, formatter)?;
        writer.flush()?;
        info!(path = %path.display(), lines = self.len(), "G-code written");
        Ok(())
    }
}
