//! The managed block of the exclusion list.
//!
//! git-owl owns the lines between [`BEGIN_MARKER`] and [`END_MARKER`] in the
//! exclusion-list file and regenerates them from the manifest on every
//! `add`. Everything else in the file belongs to the user and is written back
//! verbatim.
//!
//! Only the first BEGIN/END pair is recognised. Lines after that END marker
//! are kept and end up *before* the regenerated block on the next write.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use crate::utils::write_atomic;

/// First line of the managed block.
pub const BEGIN_MARKER: &str = "# git-owl BEGIN: DO NOT EDIT!";

/// Last line of the managed block.
pub const END_MARKER: &str = "# git-owl END";

/// User-owned lines of an exclusion-list file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionBlock {
    /// Lines outside the managed block, in file order
    pub preamble: Vec<String>,
}

#[derive(Clone, Copy)]
enum Region {
    Before,
    Managed,
    After,
}

impl ExclusionBlock {
    /// Splits exclusion-list text, dropping the managed block.
    ///
    /// User lines keep a trailing `\r`, so CRLF files are written back with
    /// their own line endings.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let mut preamble = Vec::new();
        let mut region = Region::Before;
        let body = text.strip_suffix('\n').unwrap_or(text);

        for line in body.split('\n') {
            let bare = line.strip_suffix('\r').unwrap_or(line);
            region = match region {
                Region::Before if bare == BEGIN_MARKER => Region::Managed,
                Region::Managed if bare == END_MARKER => Region::After,
                Region::Managed => Region::Managed,
                keep => {
                    preamble.push(line.to_string());
                    keep
                }
            };
        }

        Self { preamble }
    }

    /// Loads `file`; a missing file gives an empty preamble.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(file: &Path) -> Result<Self> {
        if !file.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        Ok(Self::parse(&text))
    }

    /// Preamble followed by a managed block listing `paths` in order.
    pub fn render<'a>(&self, paths: impl IntoIterator<Item = &'a str>) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(BEGIN_MARKER);
        out.push('\n');
        for path in paths {
            out.push_str(path);
            out.push('\n');
        }
        out.push_str(END_MARKER);
        out.push('\n');
        out
    }

    /// Replaces `file` with the rendered block.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write<'a>(&self, file: &Path, paths: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let text = self.render(paths);
        write_atomic(file, text.as_bytes())
            .with_context(|| format!("Failed to write exclusion list {}", file.display()))?;
        debug!(file = %file.display(), "exclusion list regenerated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn block(lines: &[&str]) -> String {
        lines.iter().map(|l| format!("{l}\n")).collect()
    }

    #[test]
    fn test_parse_drops_managed_lines() {
        let text = block(&["target/", BEGIN_MARKER, "old.bin", END_MARKER]);
        let parsed = ExclusionBlock::parse(&text);
        assert_eq!(parsed.preamble, vec!["target/"]);
    }

    #[test]
    fn test_parse_without_block() {
        let parsed = ExclusionBlock::parse("a\n\n# comment\n");
        assert_eq!(parsed.preamble, vec!["a", "", "# comment"]);
    }

    #[test]
    fn test_content_after_end_moves_before_block() {
        let text = block(&["head", BEGIN_MARKER, "old.bin", END_MARKER, "tail"]);
        let rendered = ExclusionBlock::parse(&text).render(["new.bin"]);
        assert_eq!(
            rendered,
            block(&["head", "tail", BEGIN_MARKER, "new.bin", END_MARKER])
        );
    }

    #[test]
    fn test_only_first_block_recognised() {
        let text = block(&[
            BEGIN_MARKER,
            "one",
            END_MARKER,
            BEGIN_MARKER,
            "two",
            END_MARKER,
        ]);
        let parsed = ExclusionBlock::parse(&text);
        assert_eq!(parsed.preamble, vec![BEGIN_MARKER, "two", END_MARKER]);
    }

    #[test]
    fn test_unterminated_block_swallows_rest() {
        let text = block(&["keep", BEGIN_MARKER, "a", "b"]);
        assert_eq!(ExclusionBlock::parse(&text).preamble, vec!["keep"]);
    }

    #[test]
    fn test_crlf_markers() {
        let text = format!("keep\r\n{BEGIN_MARKER}\r\nold\r\n{END_MARKER}\r\n");
        assert_eq!(ExclusionBlock::parse(&text).preamble, vec!["keep\r"]);
    }

    #[test]
    fn test_crlf_preamble_written_back_verbatim() {
        let parsed = ExclusionBlock::parse("target/\r\n*.log\r\n");
        assert_eq!(
            parsed.render(["a.bin"]),
            format!("target/\r\n*.log\r\n{BEGIN_MARKER}\na.bin\n{END_MARKER}\n")
        );
    }

    #[test]
    fn test_parse_empty_and_unterminated_last_line() {
        assert!(ExclusionBlock::parse("").preamble.is_empty());
        assert_eq!(ExclusionBlock::parse("a\nb").preamble, vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing_and_write() -> Result<()> {
        let temp = TempDir::new()?;
        let file = temp.path().join(".gitignore");

        let loaded = ExclusionBlock::load(&file)?;
        assert!(loaded.preamble.is_empty());

        loaded.write(&file, ["data/x.bin"])?;
        assert_eq!(
            std::fs::read_to_string(&file)?,
            block(&[BEGIN_MARKER, "data/x.bin", END_MARKER])
        );

        // regenerating replaces the block and keeps user lines
        std::fs::write(
            &file,
            block(&["*.log", BEGIN_MARKER, "data/x.bin", END_MARKER]),
        )?;
        ExclusionBlock::load(&file)?.write(&file, ["a.bin", "data/x.bin"])?;
        assert_eq!(
            std::fs::read_to_string(&file)?,
            block(&["*.log", BEGIN_MARKER, "a.bin", "data/x.bin", END_MARKER])
        );
        Ok(())
    }
}
