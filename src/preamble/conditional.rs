// src/preamble/conditional.rs

//! Nested conditional handling
//!
//! Opening a conditional saves the current paragraph and starts a fresh one
//! for the branch body. Closing it flattens the branch into the parent's
//! `conditions` bucket. When the outermost conditional of a block closes, the
//! whole block is moved to the bucket it belongs in:
//!
//! - blocks defining macros or bconds are hoisted early (`bcond_conditions`,
//!   `bconds` or `define`) so later conditionals see the switches they set
//! - everything else becomes an ordinary `build_conditions` entry
//! - the retired ppc64 exclusion idiom (`# bug437293`) is dropped
//!
//! Classification flags live for one top-level block and are reset when it
//! closes.

use super::paragraph::{Category, Group, Paragraph};
use crate::error::{Error, Result};
use tracing::debug;

/// Marker comment of the ppc64 exclusion idiom
const PPC64_MARKER: &str = "# bug437293";

/// How a conditional was opened, which decides what may close it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// `%if` family, closed by `%endif`
    Directive,
    /// `%{lua:` block, closed by a lone `}`
    CodeBlock,
}

/// Bucket a closed top-level block ended up in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hoist {
    /// Moved to the given category
    Moved(Category),
    /// Dropped as dead code
    Pruned,
}

#[derive(Debug)]
struct Frame {
    parent: Paragraph,
    kind: FrameKind,
}

/// Per top-level block classification
#[derive(Debug, Default, Clone, Copy)]
struct BlockFlags {
    /// Some branch declared macros or bconds
    define_bearing: bool,
    /// The condition tests a `%{with ...}` switch
    bcond: bool,
    /// An outermost branch held `%define`/`%global` lines of its own
    outer_defines: bool,
}

/// Stack of saved paragraphs, one per open conditional
#[derive(Debug, Default)]
pub struct ConditionalStack {
    frames: Vec<Frame>,
    flags: BlockFlags,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open conditionals
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Kind of the innermost open conditional
    pub fn innermost(&self) -> Option<FrameKind> {
        self.frames.last().map(|frame| frame.kind)
    }

    /// Seal the opening line into `current` and start a branch paragraph
    pub fn open(&mut self, current: &mut Paragraph, line: &str, kind: FrameKind) {
        current.seal(Category::Conditions, line.to_string());
        if tests_bcond(line) {
            self.flags.bcond = true;
        }
        let parent = std::mem::take(current);
        self.frames.push(Frame { parent, kind });
        debug!("Opened conditional at depth {}: {}", self.depth(), line);
    }

    /// Close the current branch with `%else`/`%elif` and start its sibling
    pub fn alternate(&mut self, current: &mut Paragraph, line: &str, line_no: usize) -> Result<()> {
        let kind = match self.frames.last() {
            Some(frame) => frame.kind,
            None => return Err(unbalanced(line, line_no)),
        };

        current.seal(Category::Conditions, line.to_string());
        self.fold(current);
        if tests_bcond(line) {
            self.flags.bcond = true;
        }
        let parent = std::mem::take(current);
        self.frames.push(Frame { parent, kind });
        Ok(())
    }

    /// Close the innermost conditional
    ///
    /// Returns where the block went when this closed a top-level block.
    pub fn close(
        &mut self,
        current: &mut Paragraph,
        line: &str,
        line_no: usize,
        minimal: bool,
    ) -> Result<Option<Hoist>> {
        if self.frames.is_empty() {
            return Err(unbalanced(line, line_no));
        }

        current.seal(Category::Conditions, line.to_string());
        self.fold(current);
        debug!("Closed conditional, depth now {}", self.depth());

        if self.depth() > 0 {
            return Ok(None);
        }
        let hoist = self.hoist(current, minimal);
        self.flags = BlockFlags::default();
        Ok(Some(hoist))
    }

    /// Fail if any conditional is still open at the end of the section
    pub fn finish(&self) -> Result<()> {
        match self.depth() {
            0 => Ok(()),
            depth => Err(Error::UnterminatedConditional { depth }),
        }
    }

    /// Pop the innermost frame and append the flattened branch to its parent
    fn fold(&mut self, current: &mut Paragraph) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let branch = std::mem::replace(current, frame.parent);

        let defines = branch.count(Category::Define);
        if defines > 0 || branch.count(Category::Bconds) > 0 {
            self.flags.define_bearing = true;
        }
        if self.frames.is_empty() && defines > 0 {
            self.flags.outer_defines = true;
        }

        current.push_block(Category::Conditions, branch.into_lines());
    }

    /// Move the finished top-level block out of `conditions`
    fn hoist(&self, current: &mut Paragraph, minimal: bool) -> Hoist {
        let block = current.take(Category::Conditions);

        if !minimal && is_ppc64_exclusion(&block) {
            debug!("Dropping obsolete ppc64 exclusion block");
            return Hoist::Pruned;
        }

        let target = if !self.flags.define_bearing {
            Category::BuildConditions
        } else if self.flags.bcond {
            Category::BcondConditions
        } else if !self.flags.outer_defines {
            Category::Bconds
        } else {
            Category::Define
        };
        debug!("Hoisting conditional block into {}", target.as_ref());
        current.append(target, block);
        Hoist::Moved(target)
    }
}

/// Whether a condition line tests a `%{with ...}`/`%{without ...}` switch
fn tests_bcond(line: &str) -> bool {
    line.contains("%{with")
}

/// Exactly `%if`, marker comment, a `...64bit` line and `%endif`, with the
/// marker either before or just after the opening line
fn is_ppc64_exclusion(block: &[Group]) -> bool {
    let lines: Vec<&String> = block.iter().flat_map(|group| group.lines()).collect();
    lines.len() == 4
        && (lines[0] == PPC64_MARKER || lines[1] == PPC64_MARKER)
        && lines[2].ends_with("64bit")
}

fn unbalanced(line: &str, line_no: usize) -> Error {
    Error::UnbalancedConditional {
        line: line_no,
        directive: line.split_whitespace().next().unwrap_or(line).to_string(),
    }
}
