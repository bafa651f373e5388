use schema::{AbilityId, ItemId, MoveId, SpeciesId};
use thiserror::Error;

/// Main error type for the battle engine.
///
/// Every variant's message is written for the battle log and can be shown to
/// the player as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Illegal move, target or switch choice.
    #[error("{0}")]
    InvalidAction(#[from] ActionError),
    /// Zero PP or a missing bag item.
    #[error("{0}")]
    InsufficientResource(#[from] ResourceError),
    /// Action submitted for a battle or actor that cannot take it.
    #[error("{0}")]
    StateConflict(#[from] StateConflictError),
    /// Reference data is missing an id the battle depends on.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{monster} does not know {move_id}")]
    MoveNotKnown { monster: String, move_id: MoveId },
    #[error("The opponent cannot {action}")]
    NotAllowedForOpponent { action: &'static str },
    #[error("You can't {action} in a trainer battle!")]
    WildBattleOnly { action: &'static str },
    #[error("No monster with id {monster_id} is in the party")]
    UnknownPartyMember { monster_id: String },
    #[error("There is no party member in bench slot {index}")]
    BenchSlotEmpty { index: usize },
    #[error("Cannot switch to fainted monster {name}")]
    SwitchTargetFainted { name: String },
    #[error("{name} is already active")]
    SwitchTargetActive { name: String },
    #[error("{name} is trapped and can't escape!")]
    Trapped { name: String },
    #[error("{item_id} is not a capture device")]
    NotACaptureDevice { item_id: ItemId },
    #[error("{item_id} can only be used to catch a monster")]
    CaptureDeviceMisused { item_id: ItemId },
    #[error("{item_id} needs a target move")]
    MissingTargetMove { item_id: ItemId },
    #[error("{name} cannot learn {move_id}")]
    CannotLearnMove { name: String, move_id: MoveId },
    #[error("{name} already knows {move_id}")]
    AlreadyKnowsMove { name: String, move_id: MoveId },
    #[error("{name} has no free move slot; choose a move to forget")]
    NoFreeMoveSlot { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("There's no PP left for {move_name}!")]
    NoPpRemaining { move_name: String },
    #[error("No {item_id} left in the bag")]
    ItemNotInInventory { item_id: ItemId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateConflictError {
    #[error("The battle has already ended")]
    BattleEnded,
    #[error("The battle has not been initialized")]
    NotInitialized,
    #[error("A fainted monster must be replaced before the next turn")]
    AwaitingReplacement,
    #[error("A turn is already being resolved")]
    TurnInProgress,
    #[error("No replacement is pending")]
    NoReplacementPending,
    #[error("{name} has fainted and cannot act")]
    ActorFainted { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Move '{0}' not found in reference tables")]
    UnknownMove(MoveId),
    #[error("Ability '{0}' not found in reference tables")]
    UnknownAbility(AbilityId),
    #[error("Item '{0}' not found in reference tables")]
    UnknownItem(ItemId),
    #[error("Species '{0}' not found in reference tables")]
    UnknownSpecies(SpeciesId),
}

/// Result type for battle engine operations
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Result type for reference table lookups
pub type LookupResult<T> = Result<T, ConfigurationError>;

impl BattleEngineError {
    /// Short category name, used when logging rejections.
    pub fn kind(&self) -> &'static str {
        match self {
            BattleEngineError::InvalidAction(_) => "invalid_action",
            BattleEngineError::InsufficientResource(_) => "insufficient_resource",
            BattleEngineError::StateConflict(_) => "state_conflict",
            BattleEngineError::Configuration(_) => "configuration",
        }
    }
}
