use crate::battle::engine::BattleEngine;
use crate::battle::rng::TurnRng;
use crate::battle::state::{BattleContext, BattleKind, BattleSetup};
use crate::errors::BattleResult;
use crate::monster::{experience_for_level, MonsterInstance, MoveSlot, StatusCondition};
use crate::tables::ReferenceTables;
use schema::{
    AbilityData, AbilityEffect, BaseStats, ItemData, ItemEffect, StatKind, StatusEffect, Weather,
};
use std::collections::BTreeMap;

/// Moves and species every test can rely on.
const FIXTURE_TABLES: &str = r#"(
    moves: [
        (id: "strike", name: "Strike", type: normal, category: physical,
         power: 50, accuracy: Some(100), pp: 20),
        (id: "splash_strike", name: "Splash Strike", type: water, category: physical,
         power: 50, accuracy: Some(100), pp: 20),
        (id: "swift", name: "Swift", type: normal, category: special,
         power: 60, pp: 20),
        (id: "tackle", name: "Tackle", type: normal, category: physical,
         power: 40, accuracy: Some(100), pp: 35),
        (id: "quick_attack", name: "Quick Attack", type: normal, category: physical,
         power: 40, accuracy: Some(100), pp: 30, priority: 1),
        (id: "thunder", name: "Thunder", type: electric, category: special,
         power: 110, accuracy: Some(70), pp: 10),
        (id: "fly", name: "Fly", type: flying, category: physical,
         power: 90, accuracy: Some(95), pp: 15,
         twoTurnMove: Some((
             type: charging,
             semiInvulnerableState: Some(airborne),
             counterMoves: ["thunder"],
             chargeMessage: Some("flew up high!"),
         ))),
        (id: "hyper_beam", name: "Hyper Beam", type: normal, category: special,
         power: 150, accuracy: Some(90), pp: 5,
         twoTurnMove: Some((type: recharging))),
        (id: "sky_cannon", name: "Sky Cannon", type: normal, category: special,
         power: 120, accuracy: Some(100), pp: 10,
         twoTurnMove: Some((type: charging, rechargeRequired: true))),
        (id: "ember", name: "Ember", type: fire, category: special,
         power: 40, accuracy: Some(100), pp: 25,
         effects: [(effect: "burn_chance", chance: 10)]),
        (id: "sleep_powder", name: "Sleep Powder", type: grass, category: status,
         accuracy: Some(75), pp: 15,
         effects: [(effect: "sleep_chance")]),
        (id: "growl", name: "Growl", type: normal, category: status,
         accuracy: Some(100), pp: 40,
         effects: [(effect: "attack_down")]),
        (id: "swords_dance", name: "Swords Dance", type: normal, category: status,
         pp: 20, target: user,
         effects: [(effect: "attack_up_2", target: user)]),
        (id: "rain_dance", name: "Rain Dance", type: water, category: status,
         pp: 5, target: user,
         effects: [(effect: "set_rain")]),
        (id: "wrap", name: "Wrap", type: normal, category: physical,
         power: 15, accuracy: Some(90), pp: 20,
         effects: [(effect: "bind")]),
        (id: "thrash", name: "Thrash", type: normal, category: physical,
         power: 120, accuracy: Some(100), pp: 10,
         effects: [(effect: "rampage")]),
        (id: "take_down", name: "Take Down", type: normal, category: physical,
         power: 90, accuracy: Some(85), pp: 20,
         effects: [(effect: "recoil_quarter")]),
        (id: "giga_drain", name: "Giga Drain", type: grass, category: special,
         power: 75, accuracy: Some(100), pp: 10,
         effects: [(effect: "drain_half")]),
        (id: "recover", name: "Recover", type: normal, category: status,
         pp: 10, target: user,
         effects: [(effect: "heal_half")]),
        (id: "refresh", name: "Refresh", type: normal, category: status,
         pp: 20, target: user,
         effects: [(effect: "cure_status")]),
    ],
    species: [
        (id: "test", name: "Test", types: [normal],
         baseStats: (hp: 50, attack: 50, defense: 50, specialAttack: 50,
                     specialDefense: 50, speed: 50),
         learnset: [
             (level: 1, moveId: "tackle"),
             (level: 1, moveId: "growl"),
             (level: 7, moveId: "ember"),
         ],
         catchRate: 45, baseExp: 64),
        (id: "wisp", name: "Wisp", types: [ghost],
         baseStats: (hp: 40, attack: 40, defense: 40, specialAttack: 60,
                     specialDefense: 60, speed: 60)),
        (id: "fishling", name: "Fishling", types: [water],
         baseStats: (hp: 50, attack: 50, defense: 50, specialAttack: 50,
                     specialDefense: 50, speed: 50)),
        (id: "pebble", name: "Pebble", types: [rock],
         baseStats: (hp: 50, attack: 60, defense: 80, specialAttack: 30,
                     specialDefense: 40, speed: 20)),
    ],
)"#;

/// Reference tables shared by the unit and scenario tests.
pub fn fixture_tables() -> ReferenceTables {
    let tables = match ReferenceTables::from_ron_str(FIXTURE_TABLES) {
        Ok(tables) => tables,
        Err(err) => panic!("Fixture tables failed to parse: {}", err),
    };
    tables
        .with_ability(ability("drizzle", "Drizzle", AbilityEffect::SetWeather { weather: Weather::Rain }))
        .with_ability(ability(
            "intimidate",
            "Intimidate",
            AbilityEffect::LowerOpponentStat {
                stat: StatKind::Attack,
                stages: 1,
            },
        ))
        .with_ability(ability(
            "insomnia",
            "Insomnia",
            AbilityEffect::StatusImmunity {
                status: StatusEffect::Sleep,
            },
        ))
        .with_item(item("potion", "Potion", ItemEffect::HealHp { amount: 20 }))
        .with_item(item("full_heal", "Full Heal", ItemEffect::CureStatus { status: None }))
        .with_item(item(
            "antidote",
            "Antidote",
            ItemEffect::CureStatus {
                status: Some(StatusEffect::Poison),
            },
        ))
        .with_item(item("ether", "Ether", ItemEffect::RestorePp { amount: 10 }))
        .with_item(item(
            "x_attack",
            "X Attack",
            ItemEffect::StatBoost {
                stat: StatKind::Attack,
                stages: 1,
            },
        ))
        .with_item(item("capture_orb", "Capture Orb", ItemEffect::Capture { multiplier: 1.0 }))
        .with_item(item("master_orb", "Master Orb", ItemEffect::Capture { multiplier: 255.0 }))
}

fn ability(id: &str, name: &str, effect: AbilityEffect) -> AbilityData {
    AbilityData {
        id: id.into(),
        name: name.into(),
        effect,
    }
}

fn item(id: &str, name: &str, effect: ItemEffect) -> ItemData {
    ItemData {
        id: id.into(),
        name: name.into(),
        effect,
    }
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A builder for test monsters with flat, predictable stats.
///
/// Defaults: species "test", level 10, 100/100 HP and 50 in every other stat.
/// The display name is the id with its first letter capitalized.
///
/// # Example
/// ```ignore
/// let monster = TestMonsterBuilder::new("sparky")
///     .with_moves(&["tackle"])
///     .with_status(StatusEffect::Paralyze)
///     .build();
/// ```
pub struct TestMonsterBuilder {
    id: String,
    species_id: String,
    level: u8,
    current_hp: u16,
    stats: BaseStats,
    moves: Vec<String>,
    status: Option<StatusEffect>,
    ability_id: Option<String>,
}

impl TestMonsterBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            species_id: "test".to_string(),
            level: 10,
            current_hp: 100,
            stats: BaseStats {
                hp: 100,
                attack: 50,
                defense: 50,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
            },
            moves: Vec::new(),
            status: None,
            ability_id: None,
        }
    }

    pub fn with_hp(mut self, current: u16, max: u16) -> Self {
        self.current_hp = current;
        self.stats.hp = max;
        self
    }

    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.status = Some(status);
        self
    }

    /// Moves at full PP, looked up in [`fixture_tables`].
    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_speed(mut self, speed: u16) -> Self {
        self.stats.speed = speed;
        self
    }

    pub fn with_attack(mut self, attack: u16) -> Self {
        self.stats.attack = attack;
        self
    }

    pub fn with_defense(mut self, defense: u16) -> Self {
        self.stats.defense = defense;
        self
    }

    pub fn with_ability(mut self, ability_id: &str) -> Self {
        self.ability_id = Some(ability_id.to_string());
        self
    }

    pub fn with_species(mut self, species_id: &str) -> Self {
        self.species_id = species_id.to_string();
        self
    }

    pub fn build(self) -> MonsterInstance {
        let tables = fixture_tables();
        let moves = self
            .moves
            .iter()
            .map(|id| match tables.move_data(id) {
                Ok(data) => MoveSlot::new(data),
                Err(err) => panic!("Unknown fixture move: {}", err),
            })
            .collect();

        MonsterInstance {
            name: capitalize(&self.id),
            id: self.id,
            species_id: self.species_id,
            level: self.level,
            current_hp: self.current_hp.min(self.stats.hp),
            max_hp: self.stats.hp,
            stats: self.stats,
            moves,
            ability_id: self.ability_id,
            experience: experience_for_level(self.level),
            status: self.status.map(|effect| match effect {
                StatusEffect::Confusion => StatusCondition::with_duration(effect, 3),
                _ => StatusCondition::new(effect),
            }),
            two_turn_move: None,
            locking_move: None,
            trapped_by: None,
            stat_modifiers: Default::default(),
        }
    }
}

/// Engine over the fixture tables with default rules.
pub fn test_engine() -> BattleEngine {
    BattleEngine::new(fixture_tables())
}

/// A one-on-one wild battle, initialized and waiting for the first turn.
pub fn wild_battle(engine: &BattleEngine, player: MonsterInstance, opponent: MonsterInstance) -> BattleContext {
    start_battle(engine, player, opponent, Vec::new(), BattleKind::Wild, &[])
}

pub fn start_battle(
    engine: &BattleEngine,
    player: MonsterInstance,
    opponent: MonsterInstance,
    bench: Vec<MonsterInstance>,
    kind: BattleKind,
    items: &[(&str, u32)],
) -> BattleContext {
    let setup = BattleSetup {
        player_monster: player,
        opponent_monster: opponent,
        player_bench: bench,
        kind,
        inventory: items
            .iter()
            .map(|(id, count)| (id.to_string(), *count))
            .collect::<BTreeMap<_, _>>(),
    };
    assert_ok(engine.initialize_battle(setup)).battle_context
}

/// A `TurnRng` replaying exactly these outcomes.
pub fn scripted_rng(outcomes: &[u8]) -> TurnRng {
    TurnRng::scripted(outcomes.to_vec())
}

/// A `TurnRng` with a long run of 50s: every attack hits, nothing crits,
/// and no 40% or lower chance fires.
pub fn predictable_rng() -> TurnRng {
    TurnRng::scripted(vec![50; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

/// Route engine tracing to the test output. Set `RUST_LOG=monster_battle=debug`
/// to see turn resolution details.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
