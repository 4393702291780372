//! Two-stage resolution of identity diffs into conflict-free edit scripts
use crate::types::{
    ChangeSet, Deletion, IndexPath, Insertion, ItemScript, MovementMode, SectionScript,
};
use log::{debug, trace};

/// Resolves the section-level change set into the section script.
///
/// `None` yields the empty script: the item resolver then behaves as if no
/// section ever changes.
pub(crate) fn resolve_sections<S>(
    changes: Option<&ChangeSet<S>>,
    mode: MovementMode,
) -> SectionScript {
    let Some(changes) = changes else {
        return SectionScript::default();
    };
    debug!(
        "resolver: sections with {} deletions, {} insertions, {} movements, {} updates ({mode:?})",
        changes.deletions.len(),
        changes.insertions.len(),
        changes.movements.len(),
        changes.updates.len(),
    );

    let mut script = SectionScript::default();
    script.updates = changes
        .updates
        .iter()
        .map(|update| update.position.section)
        .collect();

    // A deletion vacating a slot that an insertion refills addresses the
    // same visual slot; the pair collapses into a reload of that slot. The
    // match is by bare section index, not identity.
    let mut pending_insertions: Vec<&Insertion<S>> = changes.insertions.iter().collect();
    for deletion in &changes.deletions {
        let section = deletion.position.section;
        let refill = pending_insertions
            .iter()
            .position(|insertion| insertion.position.section == section);
        if let Some(index) = refill {
            pending_insertions.remove(index);
            trace!("resolver: section {section} deleted and refilled, folding into update");
            script.updates.insert(section);
        } else {
            script.deletions.insert(section);
        }
    }

    script.insertions = pending_insertions
        .iter()
        .map(|insertion| insertion.position.section)
        .collect();

    for movement in &changes.movements {
        let from = match mode {
            MovementMode::Simultaneous => movement.old_position.section,
            MovementMode::Sequential => translate_index(
                movement.old_position.section,
                script.insertions.iter().copied(),
                script.deletions.iter().copied(),
            ),
        };
        let to = movement.new_position.section;
        // A movement may not land on a slot the same script deletes or
        // reloads; it degrades to a reload of its origin.
        if script.deletions.contains(&to) || script.updates.contains(&to) {
            trace!("resolver: section movement {from} -> {to} collides, folding into update");
            script.updates.insert(from);
            continue;
        }
        script.movements.push((from, to));
    }

    script
}

/// Resolves the item-level change set under an already-resolved section
/// script.
pub(crate) fn resolve_items<I: Clone>(
    changes: ChangeSet<I>,
    sections: &SectionScript,
    mode: MovementMode,
) -> ItemScript {
    debug!(
        "resolver: items with {} deletions, {} insertions, {} movements, {} updates ({mode:?})",
        changes.deletions.len(),
        changes.insertions.len(),
        changes.movements.len(),
        changes.updates.len(),
    );
    let ChangeSet {
        deletions,
        insertions,
        movements,
        updates,
    } = changes;

    let mut pending_deletions = deletions;
    let mut pending_insertions = insertions;

    // A movement across sections cannot be expressed as a move; it
    // decomposes into a deletion in the old section and an insertion in the
    // new one, each suppressed when a section-level operation already covers
    // the whole section. Only same-section movements stay candidates.
    let mut candidates = Vec::with_capacity(movements.len());
    for movement in movements {
        if movement.old_position.section == movement.new_position.section {
            candidates.push(movement);
            continue;
        }
        trace!(
            "resolver: splitting cross-section movement {:?} -> {:?}",
            movement.old_position, movement.new_position,
        );
        let old_section = movement.old_position.section;
        let new_section = movement.new_position.section;
        if !sections.deletions.contains(&old_section) && !sections.updates.contains(&old_section) {
            pending_deletions.push(Deletion {
                identifier: movement.identifier.clone(),
                position: movement.old_position,
            });
        }
        if !sections.insertions.contains(&new_section) && !sections.updates.contains(&new_section) {
            pending_insertions.push(Insertion {
                identifier: movement.identifier,
                position: movement.new_position,
            });
        }
    }

    let mut script = ItemScript::default();

    // An item update inside a wholly deleted, inserted or reloaded section
    // is already implied by the section operation.
    script.updates = updates
        .iter()
        .filter(|update| !section_covered(sections, update.position.section))
        .map(|update| update.position)
        .collect();

    for deletion in &pending_deletions {
        let section = deletion.position.section;
        if sections.deletions.contains(&section) || sections.updates.contains(&section) {
            continue;
        }
        // Exact position coincidence this time: items are scoped to their
        // section, so both components must match for the slot to be the
        // same.
        let refill = pending_insertions
            .iter()
            .position(|insertion| insertion.position == deletion.position);
        if let Some(index) = refill {
            pending_insertions.remove(index);
            trace!(
                "resolver: item {:?} deleted and refilled, folding into update",
                deletion.position,
            );
            script.updates.push(deletion.position);
        } else {
            script.deletions.push(deletion.position);
        }
    }

    script.insertions = pending_insertions
        .iter()
        .filter(|insertion| {
            let section = insertion.position.section;
            !sections.insertions.contains(&section) && !sections.updates.contains(&section)
        })
        .map(|insertion| insertion.position)
        .collect();

    // Reverse declaration order: a later-declared movement must not observe
    // index shifts already applied for an earlier one in the same pass.
    for movement in candidates.iter().rev() {
        let from = match mode {
            MovementMode::Simultaneous => movement.old_position,
            MovementMode::Sequential => {
                let old = movement.old_position;
                let item = translate_index(
                    old.item,
                    script
                        .insertions
                        .iter()
                        .filter(|position| position.section == old.section)
                        .map(|position| position.item),
                    script
                        .deletions
                        .iter()
                        .filter(|position| position.section == old.section)
                        .map(|position| position.item),
                );
                let section = translate_index(
                    old.section,
                    sections.insertions.iter().copied(),
                    sections.deletions.iter().copied(),
                );
                IndexPath::new(section, item)
            }
        };
        let to = movement.new_position;
        if script.deletions.contains(&to) || script.updates.contains(&to) {
            trace!("resolver: item movement {from:?} -> {to:?} collides, folding into update");
            if !script.updates.contains(&from) {
                script.updates.push(from);
            }
            continue;
        }
        script.movements.push((from, to));
    }

    script
}

fn section_covered(sections: &SectionScript, section: usize) -> bool {
    sections.deletions.contains(&section)
        || sections.insertions.contains(&section)
        || sections.updates.contains(&section)
}

/// Shifts an old-space index into the arrangement that exists once the
/// accepted insertions and deletions in the same scope have been applied:
/// one step right per insertion at or before the index, one step left per
/// deletion strictly before it.
fn translate_index(
    index: usize,
    insertions: impl Iterator<Item = usize>,
    deletions: impl Iterator<Item = usize>,
) -> usize {
    let inserted_at_or_before = insertions.filter(|&insertion| insertion <= index).count();
    let deleted_before = deletions.filter(|&deletion| deletion < index).count();
    index + inserted_at_or_before - deleted_before
}
