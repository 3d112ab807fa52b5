//! Cross-reference index.
//!
//! Built once from a tab-separated edge list:
//!
//! ```text
//! From Verse	To Verse	Votes	#www.openbible.info CC-BY 2024-01-01
//! Gen.1.1	John.1.1-John.1.3	388
//! ```
//!
//! Building is two-phase: [`CrossRefBuilder`] accumulates edges grouped by
//! source reference, then [`CrossRefBuilder::finish`] sorts every group by
//! votes and freezes the result into a [`CrossRefIndex`].

use crate::models::CrossRefEdge;
use crate::reference::from_dotted;
use crate::store::{read_resource, LoadError};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Lines between spinner updates while parsing.
const PROGRESS_INTERVAL: usize = 10_000;

/// Accumulation phase of the index build
#[derive(Debug, Default)]
pub struct CrossRefBuilder {
    groups: Vec<(String, Vec<CrossRefEdge>)>, // First-seen order of source references
    positions: HashMap<String, usize>,
    edge_count: usize,
    skipped_lines: usize,
}

impl CrossRefBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one data line (`from<TAB>to<TAB>votes[<TAB>...]`).
    /// Returns false if the line was dropped as malformed.
    pub fn push_line(&mut self, line: &str) -> bool {
        let fields: Vec<&str> = line.trim().split('\t').collect();
        if fields.len() < 3 {
            self.skipped_lines += 1;
            return false;
        }

        let votes: i64 = match fields[2].trim().parse() {
            Ok(v) => v,
            Err(_) => {
                self.skipped_lines += 1;
                debug!(line = %line.trim(), "dropping cross-reference line with bad vote count");
                return false;
            }
        };

        self.push_edge(from_dotted(fields[0]), from_dotted(fields[1]), votes);
        true
    }

    /// Record an edge between canonical references.
    pub fn push_edge(&mut self, from: String, to: String, votes: i64) {
        let edge = CrossRefEdge { target: to, votes };
        match self.positions.get(&from) {
            Some(&idx) => self.groups[idx].1.push(edge),
            None => {
                self.positions.insert(from.clone(), self.groups.len());
                self.groups.push((from, vec![edge]));
            }
        }
        self.edge_count += 1;
    }

    /// Sort every group by votes (descending, stable) and freeze.
    pub fn finish(mut self) -> CrossRefIndex {
        for (_, edges) in &mut self.groups {
            edges.sort_by(|a, b| b.votes.cmp(&a.votes));
        }

        CrossRefIndex {
            groups: self.groups,
            positions: self.positions,
            edge_count: self.edge_count,
            skipped_lines: self.skipped_lines,
        }
    }
}

/// Source reference -> edges ranked by votes
#[derive(Debug, Default, Clone)]
pub struct CrossRefIndex {
    groups: Vec<(String, Vec<CrossRefEdge>)>,
    positions: HashMap<String, usize>,
    edge_count: usize,
    skipped_lines: usize,
}

impl CrossRefIndex {
    /// An index with no edges.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the full text of an edge list (first line is a header).
    pub fn parse(text: &str) -> Self {
        parse_with_progress(text, None)
    }

    /// Outgoing edges for a reference, highest votes first. Empty when the
    /// reference has none.
    pub fn outgoing(&self, reference: &str) -> &[CrossRefEdge] {
        self.positions
            .get(reference)
            .map(|&idx| self.groups[idx].1.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of distinct references with at least one outgoing edge.
    pub fn referenced_count(&self) -> usize {
        self.groups.iter().filter(|(_, edges)| !edges.is_empty()).count()
    }

    /// Data lines dropped while parsing.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// (source, edges) in the order sources were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CrossRefEdge])> {
        self.groups
            .iter()
            .map(|(from, edges)| (from.as_str(), edges.as_slice()))
    }
}

fn parse_with_progress(text: &str, progress: Option<&ProgressBar>) -> CrossRefIndex {
    let mut builder = CrossRefBuilder::new();

    for (i, line) in text.lines().skip(1).enumerate() {
        builder.push_line(line);

        if let Some(pb) = progress {
            if i % PROGRESS_INTERVAL == 0 {
                pb.set_message(format!("{} lines", i));
                pb.tick();
            }
        }
    }

    builder.finish()
}

/// Load and build the index from a file.
pub fn try_load_cross_references(
    path: &Path,
    show_progress: bool,
) -> Result<CrossRefIndex, LoadError> {
    let text = read_resource(path)?;

    let progress = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] Parsing cross-references: {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    let index = parse_with_progress(&text, progress.as_ref());

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(index)
}

/// Load the index, degrading to an empty index when the file is missing or
/// unreadable.
pub fn load_cross_references(path: &Path, show_progress: bool) -> CrossRefIndex {
    match try_load_cross_references(path, show_progress) {
        Ok(index) => {
            info!(
                path = %path.display(),
                sources = index.referenced_count(),
                edges = index.edge_count(),
                skipped = index.skipped_lines(),
                "cross-references loaded"
            );
            index
        }
        Err(e) => {
            warn!(error = %e, "cross-references unavailable, continuing without them");
            CrossRefIndex::empty()
        }
    }
}
