//! Translates identity-based diffs of a sectioned, ordered collection into
//! conflict-free batch-update scripts.
//!
//! An external diff engine classifies each element of a two-level
//! (section → item) collection as inserted, deleted, moved or updated; this
//! crate turns those classifications into a [`ViewEditScript`] that a
//! batch-update API can apply in one call: no duplicate or contradictory
//! operation on the same position, no item operation left dangling into a
//! section that is already removed or reloaded wholesale, and movement
//! coordinates expressed in whichever convention ([`MovementMode`]) the
//! target API requires.
//!
//! ```
//! use view_reconciler::{ChangeSet, IndexPath, MovementMode, Update, ViewEditScript};
//!
//! // The item "c" at (1, 0) changed content in place.
//! let items = ChangeSet {
//!     updates: vec![Update { identifier: "c", position: IndexPath::new(1, 0) }],
//!     ..ChangeSet::default()
//! };
//! let script = ViewEditScript::resolve(items, MovementMode::Simultaneous).unwrap();
//! assert_eq!(script.items.updates, vec![IndexPath::new(1, 0)]);
//! assert!(script.sections.is_empty());
//! ```
mod errors;
mod resolver;
mod types;

pub use errors::ChangesError;
pub use types::{
    ChangeSet, Deletion, IndexPath, Insertion, ItemScript, Movement, MovementMode, SectionScript,
    Update, ViewEditScript,
};

use std::fmt::Debug;
use std::hash::Hash;

impl ViewEditScript {
    /// Resolves an item-level change set on its own; no section is taken to
    /// change.
    pub fn resolve<I>(
        item_changes: ChangeSet<I>,
        mode: MovementMode,
    ) -> Result<ViewEditScript, ChangesError>
    where
        I: Clone + Eq + Hash + Debug,
    {
        item_changes.validate()?;
        let sections = resolver::resolve_sections::<I>(None, mode);
        let items = resolver::resolve_items(item_changes, &sections, mode);
        Ok(ViewEditScript { sections, items })
    }

    /// Resolves a section-level change set first, then the item-level change
    /// set underneath it, suppressing every item operation a section
    /// operation already covers.
    ///
    /// `mode` must match how the caller invokes the underlying batch-update
    /// primitive; it applies to both levels.
    pub fn resolve_with_sections<S, I>(
        section_changes: ChangeSet<S>,
        item_changes: ChangeSet<I>,
        mode: MovementMode,
    ) -> Result<ViewEditScript, ChangesError>
    where
        S: Eq + Hash + Debug,
        I: Clone + Eq + Hash + Debug,
    {
        section_changes.validate()?;
        item_changes.validate()?;
        let sections = resolver::resolve_sections(Some(&section_changes), mode);
        let items = resolver::resolve_items(item_changes, &sections, mode);
        Ok(ViewEditScript { sections, items })
    }
}
