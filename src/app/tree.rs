use crate::app::error::Result;
use crate::app::models::{Connector, FileSystemEntry, TreeLine};
use crate::app::scanner::Scanner;

pub struct TreeRenderer<'s, 'a> {
    scanner: &'s Scanner<'a>,
}

impl<'s, 'a> TreeRenderer<'s, 'a> {
    pub fn new(scanner: &'s Scanner<'a>) -> Self {
        Self { scanner }
    }

    /// Renders the filtered structure below the scanner's root, one line per entry.
    ///
    /// Files are listed whatever their extension. Any listing failure aborts
    /// the render.
    pub fn render(&self) -> Result<Vec<TreeLine>> {
        log::debug!("Rendering tree for {}", self.scanner.root().display());
        let entries = self.scanner.entries().collect::<Result<Vec<_>>>()?;
        let lines = layout(&entries);
        log::debug!("Rendered {} tree lines", lines.len());
        Ok(lines)
    }
}

/// Turns a sorted pre-order listing into connector-decorated lines.
fn layout(entries: &[FileSystemEntry]) -> Vec<TreeLine> {
    let connectors = connectors(entries);
    let mut ancestors: Vec<Connector> = Vec::new();
    let mut lines = Vec::with_capacity(entries.len());

    for (entry, connector) in entries.iter().zip(connectors) {
        ancestors.truncate(entry.depth.saturating_sub(1));
        let prefix: String = ancestors.iter().map(|c| c.continuation()).collect();
        lines.push(TreeLine {
            prefix,
            connector,
            name: entry.name.clone(),
        });
        ancestors.push(connector);
    }

    lines
}

/// An entry is the last child when no later sibling follows before its parent's level ends.
fn connectors(entries: &[FileSystemEntry]) -> Vec<Connector> {
    let mut sibling_follows: Vec<bool> = Vec::new();
    let mut result = vec![Connector::Mid; entries.len()];

    for (index, entry) in entries.iter().enumerate().rev() {
        let level = entry.depth;
        if sibling_follows.len() <= level {
            sibling_follows.resize(level + 1, false);
        }
        if !sibling_follows[level] {
            result[index] = Connector::Last;
        }
        sibling_follows[level] = true;
        // deeper state belonged to this entry's subtree
        sibling_follows.truncate(level + 1);
    }

    result
}
