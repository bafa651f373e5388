// Monster Battle Schema - Shared reference-data definitions
// This crate holds the read-only tables the battle engine consumes: moves,
// abilities, items and species, plus the closed enums they are expressed in.
// Everything here is plain serde data; no battle logic lives in this crate.

// Re-export the main types
pub use battle_data::*;
pub use conditions::*;
pub use effects::*;
pub use monster_types::*;
pub use move_types::*;
pub use species_data::*;
pub use stat_types::*;

pub mod battle_data;
pub mod conditions;
pub mod effects;
pub mod monster_types;
pub mod move_types;
pub mod species_data;
pub mod stat_types;

/// Identifier of a move in the move table.
pub type MoveId = String;
/// Identifier of an ability in the ability table.
pub type AbilityId = String;
/// Identifier of an item in the item table.
pub type ItemId = String;
/// Identifier of a species in the species table.
pub type SpeciesId = String;
