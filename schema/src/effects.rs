use crate::{StatKind, StatusEffect, Weather};
use phf::phf_map;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Closed set of secondary move effects.
///
/// Move tables refer to effects by string id (`"burn_chance"`,
/// `"attack_down_2"`, ...). Ids are resolved once, while the table is
/// deserialized, through [`EFFECT_TABLE`]; battle code only ever matches on
/// the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum EffectKind {
    /// Inflict a status condition on the effect target.
    InflictStatus(StatusEffect),
    /// Shift a stat stage by the given number of stages.
    StatChange(StatKind, i8),
    /// Replace the active weather.
    SetWeather(Weather),
    /// Trap the target: no switching or fleeing, chip damage each turn.
    Bind,
    /// Lock the user into repeating this move, confusing it afterwards.
    Rampage,
    /// User takes this percentage of the damage dealt.
    Recoil(u8),
    /// User heals this percentage of the damage dealt.
    Drain(u8),
    /// Target heals this percentage of its max HP.
    Heal(u8),
    /// Target is cured of its status condition.
    CureStatus,
}

/// Lookup table from effect id to effect.
pub static EFFECT_TABLE: phf::Map<&'static str, EffectKind> = phf_map! {
    "burn_chance" => EffectKind::InflictStatus(StatusEffect::Burn),
    "badly_burn_chance" => EffectKind::InflictStatus(StatusEffect::BadlyBurn),
    "poison_chance" => EffectKind::InflictStatus(StatusEffect::Poison),
    "badly_poison_chance" => EffectKind::InflictStatus(StatusEffect::BadlyPoisoned),
    "paralyze_chance" => EffectKind::InflictStatus(StatusEffect::Paralyze),
    "frostbite_chance" => EffectKind::InflictStatus(StatusEffect::Frostbite),
    "sleep_chance" => EffectKind::InflictStatus(StatusEffect::Sleep),
    "confuse_chance" => EffectKind::InflictStatus(StatusEffect::Confusion),

    "attack_up" => EffectKind::StatChange(StatKind::Attack, 1),
    "attack_up_2" => EffectKind::StatChange(StatKind::Attack, 2),
    "attack_down" => EffectKind::StatChange(StatKind::Attack, -1),
    "attack_down_2" => EffectKind::StatChange(StatKind::Attack, -2),
    "defense_up" => EffectKind::StatChange(StatKind::Defense, 1),
    "defense_up_2" => EffectKind::StatChange(StatKind::Defense, 2),
    "defense_down" => EffectKind::StatChange(StatKind::Defense, -1),
    "defense_down_2" => EffectKind::StatChange(StatKind::Defense, -2),
    "special_attack_up" => EffectKind::StatChange(StatKind::SpecialAttack, 1),
    "special_attack_up_2" => EffectKind::StatChange(StatKind::SpecialAttack, 2),
    "special_attack_down" => EffectKind::StatChange(StatKind::SpecialAttack, -1),
    "special_attack_down_2" => EffectKind::StatChange(StatKind::SpecialAttack, -2),
    "special_defense_up" => EffectKind::StatChange(StatKind::SpecialDefense, 1),
    "special_defense_up_2" => EffectKind::StatChange(StatKind::SpecialDefense, 2),
    "special_defense_down" => EffectKind::StatChange(StatKind::SpecialDefense, -1),
    "special_defense_down_2" => EffectKind::StatChange(StatKind::SpecialDefense, -2),
    "speed_up" => EffectKind::StatChange(StatKind::Speed, 1),
    "speed_up_2" => EffectKind::StatChange(StatKind::Speed, 2),
    "speed_down" => EffectKind::StatChange(StatKind::Speed, -1),
    "speed_down_2" => EffectKind::StatChange(StatKind::Speed, -2),
    "accuracy_down" => EffectKind::StatChange(StatKind::Accuracy, -1),
    "evasion_up" => EffectKind::StatChange(StatKind::Evasion, 1),
    "evasion_down" => EffectKind::StatChange(StatKind::Evasion, -1),

    "set_sun" => EffectKind::SetWeather(Weather::Sun),
    "set_rain" => EffectKind::SetWeather(Weather::Rain),
    "set_sandstorm" => EffectKind::SetWeather(Weather::Sandstorm),
    "set_snow" => EffectKind::SetWeather(Weather::Snow),
    "set_fog" => EffectKind::SetWeather(Weather::Fog),
    "clear_weather" => EffectKind::SetWeather(Weather::Clear),

    "bind" => EffectKind::Bind,
    "rampage" => EffectKind::Rampage,
    "recoil_quarter" => EffectKind::Recoil(25),
    "recoil_third" => EffectKind::Recoil(33),
    "recoil_half" => EffectKind::Recoil(50),
    "drain_half" => EffectKind::Drain(50),
    "heal_half" => EffectKind::Heal(50),
    "cure_status" => EffectKind::CureStatus,
};

/// An effect id that is not present in [`EFFECT_TABLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEffectId(pub String);

impl fmt::Display for UnknownEffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown move effect id '{}'", self.0)
    }
}

impl std::error::Error for UnknownEffectId {}

impl EffectKind {
    pub fn from_id(id: &str) -> Result<Self, UnknownEffectId> {
        EFFECT_TABLE
            .get(id)
            .copied()
            .ok_or_else(|| UnknownEffectId(id.to_string()))
    }

    /// The table id of this effect, if it has one.
    pub fn id(&self) -> Option<&'static str> {
        EFFECT_TABLE
            .entries()
            .find(|(_, kind)| *kind == self)
            .map(|(id, _)| *id)
    }
}

impl TryFrom<String> for EffectKind {
    type Error = UnknownEffectId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_id(&value)
    }
}

impl Serialize for EffectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.id() {
            Some(id) => serializer.serialize_str(id),
            None => Err(serde::ser::Error::custom(format!(
                "effect {:?} has no table id",
                self
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_resolves_parameters() {
        assert_eq!(
            EffectKind::from_id("attack_down_2"),
            Ok(EffectKind::StatChange(StatKind::Attack, -2))
        );
        assert_eq!(
            EffectKind::from_id("set_rain"),
            Ok(EffectKind::SetWeather(Weather::Rain))
        );
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let err = EffectKind::from_id("teleport").unwrap_err();
        assert_eq!(err.to_string(), "unknown move effect id 'teleport'");
    }

    #[test]
    fn test_every_table_entry_maps_back_to_its_id() {
        for (id, kind) in EFFECT_TABLE.entries() {
            assert_eq!(kind.id(), Some(*id));
        }
    }

    #[test]
    fn test_json_uses_string_ids() {
        let kind: EffectKind = serde_json::from_str("\"burn_chance\"").unwrap();
        assert_eq!(kind, EffectKind::InflictStatus(StatusEffect::Burn));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"burn_chance\"");
        assert!(serde_json::from_str::<EffectKind>("\"not_an_effect\"").is_err());
    }
}
