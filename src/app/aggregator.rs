use crate::app::error::Result;
use crate::app::models::{ContentBlock, ContentBody};
use crate::app::scanner::Scanner;
use std::fs;

pub struct ContentAggregator<'s, 'a> {
    scanner: &'s Scanner<'a>,
}

impl<'s, 'a> ContentAggregator<'s, 'a> {
    pub fn new(scanner: &'s Scanner<'a>) -> Self {
        Self { scanner }
    }

    /// Collects one block per included file, in walk order.
    ///
    /// A file that cannot be read still yields a block carrying the failure;
    /// a directory that cannot be listed aborts the collection.
    pub fn collect(&self) -> Result<Vec<ContentBlock>> {
        let filter = self.scanner.filter();
        let mut blocks = Vec::new();

        for entry in self.scanner.entries() {
            let entry = entry?;
            if entry.is_dir || !filter.is_included_extension(&entry.name) {
                continue;
            }

            let body = match fs::read_to_string(&entry.path) {
                Ok(content) => ContentBody::Text(content),
                Err(e) => {
                    log::warn!("Could not read {}: {}", entry.relative_path, e);
                    ContentBody::Error(e.to_string())
                }
            };
            blocks.push(ContentBlock {
                path: entry.relative_path,
                body,
            });
        }

        log::info!("Collected {} files", blocks.len());
        Ok(blocks)
    }
}
