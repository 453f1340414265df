//! Deterministic ordering of candidate companions.

use crate::app::affinity::affinity;
use crate::domain::extensions::ExtensionSet;
use crate::domain::model::FileRef;

/// Extension slots ordered from most to least preferred for one reference extension.
///
/// The chain starts right after the reference's own extension and wraps around to end
/// at it, so `[A, B, C, D, E]` seen from `B` becomes `[C, D, E, A, B]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityChain {
    slots: Vec<usize>,
}

impl PriorityChain {
    pub fn rotated(len: usize, reference_slot: usize) -> Self {
        let pivot = (reference_slot + 1).min(len);
        let slots = (pivot..len).chain(0..pivot).collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Position of an extension slot in the chain; lower is preferred.
    pub fn position(&self, slot: usize) -> Option<usize> {
        self.slots.iter().position(|candidate| *candidate == slot)
    }
}

/// A candidate with the keys it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCandidate {
    pub file: FileRef,
    pub affinity: usize,
    pub priority: usize,
}

/// Orders candidates against a reference file.
#[derive(Debug, Clone, Copy)]
pub struct Ranker<'a> {
    extensions: &'a ExtensionSet,
}

impl<'a> Ranker<'a> {
    pub fn new(extensions: &'a ExtensionSet) -> Self {
        Self { extensions }
    }

    pub fn priority_chain(&self, reference: &FileRef) -> PriorityChain {
        PriorityChain::rotated(self.extensions.len(), reference.slot)
    }

    /// Sort by affinity (higher first), then by priority chain position (earlier first).
    ///
    /// The sort is stable: remaining ties keep the order the candidates arrived in.
    pub fn rank(&self, reference: &FileRef, candidates: Vec<FileRef>) -> Vec<RankedCandidate> {
        let chain = self.priority_chain(reference);
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|file| RankedCandidate {
                affinity: affinity(reference, &file),
                priority: chain.position(file.slot).unwrap_or(usize::MAX),
                file,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.affinity
                .cmp(&a.affinity)
                .then_with(|| a.priority.cmp(&b.priority))
        });
        ranked
    }
}
