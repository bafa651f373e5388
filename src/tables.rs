//! Read-only reference data the engine consumes.
//!
//! Tables are handed to the engine fully loaded. They can be built in code or
//! deserialized (RON or JSON) from lists of records keyed by their `id`.

use crate::errors::{ConfigurationError, LookupResult};
use schema::{AbilityData, ItemData, MoveData, SpeciesData};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct TableSource {
    moves: Vec<MoveData>,
    abilities: Vec<AbilityData>,
    items: Vec<ItemData>,
    species: Vec<SpeciesData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "TableSource")]
pub struct ReferenceTables {
    moves: HashMap<String, MoveData>,
    abilities: HashMap<String, AbilityData>,
    items: HashMap<String, ItemData>,
    species: HashMap<String, SpeciesData>,
}

impl From<TableSource> for ReferenceTables {
    fn from(source: TableSource) -> Self {
        let mut tables = ReferenceTables::default();
        source.moves.into_iter().for_each(|m| tables.insert_move(m));
        source
            .abilities
            .into_iter()
            .for_each(|a| tables.insert_ability(a));
        source.items.into_iter().for_each(|i| tables.insert_item(i));
        source
            .species
            .into_iter()
            .for_each(|s| tables.insert_species(s));
        tables
    }
}

impl ReferenceTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn insert_move(&mut self, data: MoveData) {
        self.moves.insert(data.id.clone(), data);
    }

    pub fn insert_ability(&mut self, data: AbilityData) {
        self.abilities.insert(data.id.clone(), data);
    }

    pub fn insert_item(&mut self, data: ItemData) {
        self.items.insert(data.id.clone(), data);
    }

    pub fn insert_species(&mut self, data: SpeciesData) {
        self.species.insert(data.id.clone(), data);
    }

    pub fn with_move(mut self, data: MoveData) -> Self {
        self.insert_move(data);
        self
    }

    pub fn with_ability(mut self, data: AbilityData) -> Self {
        self.insert_ability(data);
        self
    }

    pub fn with_item(mut self, data: ItemData) -> Self {
        self.insert_item(data);
        self
    }

    pub fn with_species(mut self, data: SpeciesData) -> Self {
        self.insert_species(data);
        self
    }

    pub fn move_data(&self, id: &str) -> LookupResult<&MoveData> {
        self.moves
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownMove(id.to_string()))
    }

    pub fn ability(&self, id: &str) -> LookupResult<&AbilityData> {
        self.abilities
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownAbility(id.to_string()))
    }

    pub fn item(&self, id: &str) -> LookupResult<&ItemData> {
        self.items
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownItem(id.to_string()))
    }

    pub fn species(&self, id: &str) -> LookupResult<&SpeciesData> {
        self.species
            .get(id)
            .ok_or_else(|| ConfigurationError::UnknownSpecies(id.to_string()))
    }

    /// Display name of a move, falling back to the id for unknown moves.
    pub fn move_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.moves.get(id).map_or(id, |data| data.name.as_str())
    }
}
