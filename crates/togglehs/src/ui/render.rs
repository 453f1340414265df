//! Text and JSON renderings of a candidate ranking.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::app::rank::RankedCandidate;

/// One ranked candidate as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRow {
    pub rank: usize,
    pub path: String,
    pub extension: String,
    pub affinity: usize,
    pub priority: usize,
}

/// Rows in rank order, with paths shown relative to `root` when they live under it.
pub fn rows(ranking: &[RankedCandidate], root: &Path) -> Vec<CandidateRow> {
    ranking
        .iter()
        .enumerate()
        .map(|(index, candidate)| CandidateRow {
            rank: index + 1,
            path: candidate
                .file
                .path
                .strip_prefix(root)
                .unwrap_or(&candidate.file.path)
                .display()
                .to_string(),
            extension: candidate.file.extension.clone(),
            affinity: candidate.affinity,
            priority: candidate.priority,
        })
        .collect()
}

pub fn render_table(rows: &[CandidateRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:>8}  {:>8}  PATH", "RANK", "AFFINITY", "PRIORITY");
    for row in rows {
        let _ = writeln!(
            out,
            "{:>4}  {:>8}  {:>8}  {}",
            row.rank, row.affinity, row.priority, row.path
        );
    }
    out
}

pub fn render_json(rows: &[CandidateRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("failed to serialize candidates")
}
