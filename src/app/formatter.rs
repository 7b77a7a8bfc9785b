use crate::app::error::{FlattenError, Result};
use crate::app::models::{ContentBlock, ContentBody, TreeLine};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const STRUCTURE_HEADER: &str = "PROJECT STRUCTURE:\n\n";
const CODE_DIVIDER: &str = "================ CODE =================";
pub const ERROR_PREFIX: &str = "ERROR READING: ";

pub struct DocumentWriter;

impl DocumentWriter {
    pub fn render(tree: &[TreeLine], blocks: &[ContentBlock]) -> String {
        let mut out = String::from(STRUCTURE_HEADER);
        for line in tree {
            out.push_str(&line.to_string());
            out.push('\n');
        }

        out.push('\n');
        out.push_str(CODE_DIVIDER);
        out.push('\n');

        for block in blocks {
            out.push_str(&format!("\n# ==== {} ====\n\n", block.path));
            match &block.body {
                ContentBody::Text(content) => out.push_str(content),
                ContentBody::Error(reason) => {
                    out.push_str(ERROR_PREFIX);
                    out.push_str(reason);
                }
            }
            out.push('\n');
        }

        out
    }

    /// Replaces `destination` with the rendered document.
    ///
    /// The document is written to a sibling temp file first and renamed into
    /// place; on any failure the temp file is removed and the destination is
    /// left untouched.
    pub fn write(destination: &Path, tree: &[TreeLine], blocks: &[ContentBlock]) -> Result<()> {
        let document = Self::render(tree, blocks);

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| FlattenError::Write {
            path: parent.to_path_buf(),
            source,
        })?;

        let write_err = |source: std::io::Error| FlattenError::Write {
            path: destination.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
        tmp.write_all(document.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        tmp.persist(destination)
            .map_err(|source| FlattenError::Persist {
                path: destination.to_path_buf(),
                source,
            })?;

        log::info!(
            "Wrote {} bytes to {}",
            document.len(),
            destination.display()
        );
        Ok(())
    }
}
