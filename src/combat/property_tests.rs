//! Property tests for combat module
//!
//! Property 1: Boss scaling respects the HP, damage and AC floors
//! Property 2: Every autoplayed encounter ends in a terminal state
//! Property 3: The engine never rests in a transient state
//! Property 4: Player HP never exceeds max and is 0 exactly on defeat

use proptest::prelude::*;

use crate::combat::{autoplay, default_roster, AutoplayPolicy, Boss, BossRush, CombatState};
use crate::config::{CharacterBuild, CombatClass, Difficulty};
use crate::outcome::Outcome;
use crate::stats::{EffectFlags, StatBonuses, MIN_SCALED_AC};

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
    ]
}

fn arb_class() -> impl Strategy<Value = CombatClass> {
    prop_oneof![
        Just(CombatClass::Warrior),
        Just(CombatClass::Mage),
        Just(CombatClass::Rogue),
    ]
}

fn arb_build() -> impl Strategy<Value = CharacterBuild> {
    (
        -5i32..=5,
        -5i32..=5,
        -5i32..=5,
        -5i32..=5,
        -5i32..=5,
        -5i32..=5,
        any::<bool>(),
        arb_difficulty(),
        arb_class(),
    )
        .prop_map(|(str_, wis, cha, sta, agi, int, slayer, difficulty, class)| {
            let bonuses = StatBonuses { str_, wis, cha, sta, agi, int };
            let effects = EffectFlags { giant_slayer: slayer, ..Default::default() };
            CharacterBuild::new(bonuses, effects)
                .with_difficulty(difficulty)
                .with_class(class)
        })
}

// ═══════════════════════════════════════════════════════════════════════════
// Property 1: Scaling floors
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_spawned_bosses_respect_floors(
        difficulty in arb_difficulty(),
        reduction in 0i32..=12,
    ) {
        let settings = difficulty.boss();
        for (index, template) in default_roster().iter().enumerate() {
            let boss = Boss::spawn(template, index, &settings, reduction);
            prop_assert!(boss.combatant.hp >= 1);
            prop_assert!(boss.combatant.damage.sides >= 1);
            prop_assert!(boss.combatant.armor_class >= MIN_SCALED_AC);
            prop_assert_eq!(boss.combatant.hp, boss.combatant.max_hp);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Property 2-4: Encounter invariants
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_autoplay_terminates(build in arb_build(), seed in any::<u64>()) {
        let mut encounter = BossRush::with_seed(build, Some(seed)).unwrap();
        let end = autoplay(&mut encounter, &AutoplayPolicy::default()).unwrap();
        prop_assert!(encounter.is_over());
        prop_assert_ne!(end.outcome, Outcome::Abandoned);
        prop_assert!(end.enemies_defeated as usize <= encounter.boss_count());
        if end.outcome == Outcome::Victory {
            prop_assert_eq!(end.enemies_defeated as usize, encounter.boss_count());
        }
    }

    #[test]
    fn prop_engine_rests_in_stable_states(build in arb_build(), seed in any::<u64>()) {
        let mut encounter = BossRush::with_seed(build, Some(seed)).unwrap();
        let policy = AutoplayPolicy::default();
        for _ in 0..200 {
            if encounter.is_over() {
                break;
            }
            let turn = if encounter.state() == CombatState::BossTurn {
                encounter.boss_turn().unwrap()
            } else {
                encounter.act(policy.choose(&encounter)).unwrap()
            };
            prop_assert!(matches!(
                turn.new_state,
                CombatState::PlayerTurn | CombatState::BossTurn | CombatState::Victory | CombatState::Defeat
            ));
            prop_assert_eq!(turn.new_state, encounter.state());
            prop_assert_eq!(turn.phases.last().copied(), Some(turn.new_state));
        }
    }

    #[test]
    fn prop_player_hp_bounds(build in arb_build(), seed in any::<u64>()) {
        let mut encounter = BossRush::with_seed(build, Some(seed)).unwrap();
        let policy = AutoplayPolicy::default();
        while !encounter.is_over() {
            if encounter.state() == CombatState::BossTurn {
                encounter.boss_turn().unwrap();
            } else {
                encounter.act(policy.choose(&encounter)).unwrap();
            }
            let player = &encounter.player().combatant;
            prop_assert!(player.hp <= player.max_hp);
            if encounter.state() == CombatState::Defeat {
                prop_assert_eq!(player.hp, 0);
            } else {
                prop_assert!(player.hp > 0);
            }
        }
    }
}
