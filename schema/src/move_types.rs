use crate::{EffectKind, MonsterType, MoveId};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveTarget {
    /// The opposing active monster.
    #[default]
    Opponent,
    /// The user itself; such moves never miss and ignore semi-invulnerability.
    User,
}

/// Who a secondary effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    #[default]
    Target,
    User,
}

fn default_chance() -> u8 {
    100
}

/// One entry of a move's `effects` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEffectEntry {
    pub effect: EffectKind,
    /// Percent chance (1..=100) the effect triggers.
    #[serde(default = "default_chance")]
    pub chance: u8,
    #[serde(default)]
    pub target: EffectTarget,
}

impl MoveEffectEntry {
    pub fn new(effect: EffectKind, chance: u8, target: EffectTarget) -> Self {
        Self {
            effect,
            chance,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TwoTurnKind {
    /// Charge first, strike on the following turn.
    Charging,
    /// Strike immediately, then lose the following turn.
    Recharging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SemiInvulnerableState {
    Airborne,
    Underground,
    Underwater,
}

/// Descriptor attached to moves that span more than one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoTurnMove {
    #[serde(rename = "type")]
    pub kind: TwoTurnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_invulnerable_state: Option<SemiInvulnerableState>,
    /// Moves that still connect while the user is semi-invulnerable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counter_moves: Vec<MoveId>,
    #[serde(default)]
    pub recharge_required: bool,
    /// Announcement shown on the charging turn, after the user's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_message: Option<String>,
}

/// Static move definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: MonsterType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u16,
    /// `None` means the move bypasses the accuracy check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u8>,
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<MoveEffectEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_turn_move: Option<TwoTurnMove>,
    #[serde(default)]
    pub target: MoveTarget,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }

    pub fn charges_first(&self) -> bool {
        matches!(
            self.two_turn_move,
            Some(TwoTurnMove {
                kind: TwoTurnKind::Charging,
                ..
            })
        )
    }

    /// Whether the user loses the turn after this move lands.
    pub fn requires_recharge(&self) -> bool {
        self.two_turn_move.as_ref().is_some_and(|two_turn| {
            two_turn.recharge_required || two_turn.kind == TwoTurnKind::Recharging
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusEffect;

    #[test]
    fn test_move_parses_from_ron() {
        let src = r#"(
            id: "fly",
            name: "Fly",
            type: flying,
            category: physical,
            power: 90,
            accuracy: Some(95),
            pp: 15,
            twoTurnMove: Some((
                type: charging,
                semiInvulnerableState: Some(airborne),
                counterMoves: ["thunder"],
                chargeMessage: Some("flew up high!"),
            )),
        )"#;
        let fly: MoveData = ron::from_str(src).unwrap();
        assert_eq!(fly.move_type, MonsterType::Flying);
        assert!(fly.charges_first());
        assert!(!fly.requires_recharge());
        let two_turn = fly.two_turn_move.unwrap();
        assert_eq!(
            two_turn.semi_invulnerable_state,
            Some(SemiInvulnerableState::Airborne)
        );
        assert_eq!(two_turn.counter_moves, vec!["thunder".to_string()]);
        assert_eq!(fly.target, MoveTarget::Opponent);
    }

    #[test]
    fn test_recharging_kind_implies_recharge() {
        let beam: MoveData = ron::from_str(
            r#"(id: "hyper_beam", name: "Hyper Beam", type: normal, category: special,
                power: 150, accuracy: Some(90), pp: 5,
                twoTurnMove: Some((type: recharging)))"#,
        )
        .unwrap();
        assert!(!beam.charges_first());
        assert!(beam.requires_recharge());
    }

    #[test]
    fn test_effect_entries_default_to_certain_target_hit() {
        let json = r#"{
            "id": "ember", "name": "Ember", "type": "fire", "category": "special",
            "power": 40, "accuracy": 100, "pp": 25,
            "effects": [{"effect": "burn_chance", "chance": 10}, {"effect": "attack_up", "target": "user"}]
        }"#;
        let ember: MoveData = serde_json::from_str(json).unwrap();
        assert_eq!(
            ember.effects[0],
            MoveEffectEntry::new(
                EffectKind::InflictStatus(StatusEffect::Burn),
                10,
                EffectTarget::Target
            )
        );
        assert_eq!(ember.effects[1].chance, 100);
        assert_eq!(ember.effects[1].target, EffectTarget::User);
    }
}
