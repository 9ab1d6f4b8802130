#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-mode system: placement validation, ghost previews, and the
//! translation of pointer input into build, select, and sell commands.

use elemental_defence_core::{
    Archetype, ArchetypeId, CellCoord, Command, CommandError, DefenderId, Event, Path,
    PlacementRule,
};

/// Checks whether `archetype` may be built on `cell`.
///
/// Checks run in a fixed order so the reported reason is stable: bounds,
/// occupancy, path rule, then affordability.
pub fn validate_placement(
    archetype: &Archetype,
    cell: CellCoord,
    path: &Path,
    occupied: bool,
    gold: u64,
) -> Result<(), CommandError> {
    if !cell.in_bounds() {
        return Err(CommandError::OutOfBounds);
    }
    if occupied {
        return Err(CommandError::CellOccupied);
    }
    let rule = archetype.placement();
    let on_path = path.contains_cell(cell);
    let allowed = match rule {
        PlacementRule::OnPath => on_path,
        PlacementRule::OffPath => !on_path,
    };
    if !allowed {
        return Err(CommandError::InvalidPlacement { rule });
    }
    if gold < archetype.cost {
        return Err(CommandError::InsufficientGold {
            required: archetype.cost,
            available: gold,
        });
    }
    Ok(())
}

/// Declarative placement preview describing a potential construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Archetype proposed for placement.
    pub archetype: ArchetypeId,
    /// Cell that would hold the defender.
    pub cell: CellCoord,
    /// Indicates whether the preview represents a valid placement location.
    pub placeable: bool,
    /// Reason the placement would be rejected, if any.
    pub reason: Option<CommandError>,
}

impl PlacementPreview {
    /// Evaluates a preview for `archetype` at `cell`.
    #[must_use]
    pub fn evaluate(
        archetype: &Archetype,
        cell: CellCoord,
        path: &Path,
        occupied: bool,
        gold: u64,
    ) -> Self {
        let reason = validate_placement(archetype, cell, path, occupied, gold).err();
        Self {
            archetype: archetype.id,
            cell,
            placeable: reason.is_none(),
            reason,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player clicked a cell on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player requested a sale on this frame.
    pub sell_action: bool,
    /// Indicates whether the player left build mode on this frame.
    pub cancel_action: bool,
    /// Cell currently under the cursor.
    pub cursor_cell: Option<CellCoord>,
}

/// Build-mode system that translates preview + input into commands.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    armed: Option<ArchetypeId>,
}

impl Builder {
    /// Creates a builder with no archetype armed.
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Enters build mode for the provided archetype.
    pub fn arm(&mut self, archetype: ArchetypeId) {
        self.armed = Some(archetype);
    }

    /// Leaves build mode.
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// Archetype currently armed for construction.
    #[must_use]
    pub const fn armed(&self) -> Option<ArchetypeId> {
        self.armed
    }

    /// Consumes world events and adapter-derived input to emit commands.
    ///
    /// While armed, a click on a placeable preview builds; otherwise a click
    /// selects whatever defender `defender_at` reports for the cell, clearing
    /// the selection on empty cells. A successful build leaves build mode.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        preview: Option<PlacementPreview>,
        input: BuilderInput,
        mut defender_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> Option<DefenderId>,
    {
        for event in events {
            if let Event::DefenderBuilt { archetype, .. } = event {
                if self.armed == Some(*archetype) {
                    self.armed = None;
                }
            }
        }

        if input.cancel_action {
            self.armed = None;
        }

        if input.confirm_action {
            match (self.armed, preview) {
                (Some(armed), Some(preview)) => {
                    if preview.placeable && preview.archetype == armed {
                        out.push(Command::BuildDefender {
                            archetype: preview.archetype,
                            cell: preview.cell,
                        });
                    }
                }
                (Some(_), None) => {}
                (None, _) => {
                    if let Some(cell) = input.cursor_cell {
                        out.push(Command::SelectDefender {
                            defender: defender_at(cell),
                        });
                    }
                }
            }
        }

        if input.sell_action {
            if let Some(defender) = input.cursor_cell.and_then(&mut defender_at) {
                out.push(Command::SellDefender { defender });
            }
        }
    }
}
