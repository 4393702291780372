//! Change-set input model and batch-update script output model
use crate::errors::ChangesError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A two-level address `(section, item)` for one element of a sectioned
/// collection, ordered lexicographically.
///
/// Section-level records reuse this type with the `item` component ignored,
/// so both resolution levels share one addressing scheme.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        IndexPath { section, item }
    }
}

/// How movement coordinates relate to the other edits in the same script.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum MovementMode {
    /// The batch-update call applies deletions, insertions, updates and
    /// movements as one atomic operation against a single coordinate space;
    /// movement endpoints pass through exactly as the diff produced them.
    #[default]
    Simultaneous,
    /// The batch-update call applies deletions, insertions and updates
    /// first, then performs movements against the intermediate arrangement;
    /// each movement's `from` index is shifted by the accepted insertions
    /// and deletions in its scope.
    Sequential,
}

/// An element present only in the "after" snapshot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Insertion<I> {
    pub identifier: I,
    /// New-space position the element lands at.
    pub position: IndexPath,
}

/// An element present only in the "before" snapshot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Deletion<I> {
    pub identifier: I,
    /// Old-space position the element vacates.
    pub position: IndexPath,
}

/// An element present in both snapshots at different positions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Movement<I> {
    pub identifier: I,
    pub old_position: IndexPath,
    pub new_position: IndexPath,
}

/// An element present in both snapshots at the same position with changed
/// content.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Update<I> {
    pub identifier: I,
    pub position: IndexPath,
}

/// One classified difference set between two snapshots of an ordered,
/// identity-keyed collection, as produced by an external diff engine.
///
/// The same shape serves both levels: instantiated once with the section
/// identifier type and once with the item identifier type. Declaration
/// order inside each vector is meaningful — movements are translated in
/// (reverse) declaration order and the output containers preserve it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet<I> {
    pub deletions: Vec<Deletion<I>>,
    pub insertions: Vec<Insertion<I>>,
    pub movements: Vec<Movement<I>>,
    pub updates: Vec<Update<I>>,
}

impl<I> Default for ChangeSet<I> {
    fn default() -> Self {
        ChangeSet {
            deletions: Vec::new(),
            insertions: Vec::new(),
            movements: Vec::new(),
            updates: Vec::new(),
        }
    }
}

impl<I> ChangeSet<I> {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty()
            && self.insertions.is_empty()
            && self.movements.is_empty()
            && self.updates.is_empty()
    }

    /// Checks the caller contract: each identifier appears at most once per
    /// record kind and in at most one kind.
    ///
    /// A violation is a programming error in the diff supplied by the
    /// caller, never a condition to correct silently or retry.
    pub fn validate(&self) -> Result<(), ChangesError>
    where
        I: Eq + Hash + Debug,
    {
        let mut seen: HashMap<&I, &'static str> = HashMap::new();
        for record in &self.deletions {
            note_identifier(&mut seen, &record.identifier, "deletion")?;
        }
        for record in &self.insertions {
            note_identifier(&mut seen, &record.identifier, "insertion")?;
        }
        for record in &self.movements {
            note_identifier(&mut seen, &record.identifier, "movement")?;
        }
        for record in &self.updates {
            note_identifier(&mut seen, &record.identifier, "update")?;
        }
        Ok(())
    }
}

fn note_identifier<'a, I: Eq + Hash + Debug>(
    seen: &mut HashMap<&'a I, &'static str>,
    identifier: &'a I,
    kind: &'static str,
) -> Result<(), ChangesError> {
    match seen.insert(identifier, kind) {
        None => Ok(()),
        Some(first) if first == kind => Err(ChangesError::DuplicateRecord {
            identifier: format!("{identifier:?}"),
            kind,
        }),
        Some(first) => Err(ChangesError::ConflictingRecords {
            identifier: format!("{identifier:?}"),
            first,
            second: kind,
        }),
    }
}

/// Section-level portion of a batch-update script.
///
/// Deletions are old-space indices, insertions new-space indices, updates
/// reload a section in place, and movements carry `(from, to)` pairs in the
/// coordinate convention selected by [`MovementMode`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SectionScript {
    pub deletions: IndexSet<usize>,
    pub insertions: IndexSet<usize>,
    pub updates: IndexSet<usize>,
    pub movements: Vec<(usize, usize)>,
}

impl SectionScript {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty()
            && self.insertions.is_empty()
            && self.updates.is_empty()
            && self.movements.is_empty()
    }
}

/// Item-level portion of a batch-update script, addressed by [`IndexPath`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ItemScript {
    pub deletions: Vec<IndexPath>,
    pub insertions: Vec<IndexPath>,
    pub updates: Vec<IndexPath>,
    pub movements: Vec<(IndexPath, IndexPath)>,
}

impl ItemScript {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty()
            && self.insertions.is_empty()
            && self.updates.is_empty()
            && self.movements.is_empty()
    }
}

/// The complete conflict-free script for one batch-update call: section
/// operations plus the item operations that survive section coverage.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ViewEditScript {
    pub sections: SectionScript,
    pub items: ItemScript,
}

impl ViewEditScript {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.items.is_empty()
    }
}
