use schema::{ItemId, MoveId};
use serde::{Deserialize, Serialize};

/// An action chosen by either side for the coming turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleAction {
    #[serde(rename_all = "camelCase")]
    Attack { move_id: MoveId },
    #[serde(rename_all = "camelCase")]
    Catch { item_id: ItemId },
    #[serde(rename_all = "camelCase")]
    Item {
        item_id: ItemId,
        /// Party member to use the item on; the active monster when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_id: Option<String>,
        /// Move whose PP is restored, for PP items.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_move_id: Option<MoveId>,
    },
    #[serde(rename_all = "camelCase")]
    Switch { new_monster_id: String },
    Flee,
}

impl BattleAction {
    pub fn attack(move_id: impl Into<MoveId>) -> Self {
        BattleAction::Attack {
            move_id: move_id.into(),
        }
    }

    pub fn item(item_id: impl Into<ItemId>) -> Self {
        BattleAction::Item {
            item_id: item_id.into(),
            target_id: None,
            target_move_id: None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BattleAction::Attack { .. } => "attack",
            BattleAction::Catch { .. } => "catch",
            BattleAction::Item { .. } => "item",
            BattleAction::Switch { .. } => "switch",
            BattleAction::Flee => "flee",
        }
    }
}

/// An action after validation, including actions the engine forces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlannedAction {
    /// `forced` attacks come from a charging or locking move and spend no PP.
    Attack { move_id: MoveId, forced: bool },
    Recharge,
    Catch { item_id: ItemId },
    Item {
        item_id: ItemId,
        /// `None` targets the active monster.
        bench_index: Option<usize>,
        target_move_id: Option<MoveId>,
    },
    Switch { bench_index: usize },
    Flee,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_actions_use_tagged_camel_case_json() {
        let action: BattleAction =
            serde_json::from_str(r#"{"type": "item", "itemId": "ether", "targetMoveId": "ember"}"#).unwrap();
        assert_eq!(
            action,
            BattleAction::Item {
                item_id: "ether".into(),
                target_id: None,
                target_move_id: Some("ember".into()),
            }
        );

        assert_eq!(
            serde_json::to_string(&BattleAction::attack("tackle")).unwrap(),
            r#"{"type":"attack","moveId":"tackle"}"#
        );
        assert_eq!(serde_json::to_string(&BattleAction::Flee).unwrap(), r#"{"type":"flee"}"#);

        let switch: BattleAction =
            serde_json::from_str(r#"{"type": "switch", "newMonsterId": "m2"}"#).unwrap();
        assert_eq!(switch.label(), "switch");
    }
}
