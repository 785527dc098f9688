//! Benchmarks for the engines
//!
//! Target: one autoplayed Boss Rush encounter should complete well under 1ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use site_rpg_core::arcade::{FrameInput, HackSlash, Runner};
use site_rpg_core::combat::{autoplay, default_roster, simulate_boss_rush, AutoplayPolicy, BossRush};
use site_rpg_core::config::{CharacterBuild, CombatClass, EncounterRules};
use site_rpg_core::quest::{builtin_adventures, QuestEngine};
use site_rpg_core::stats::{EffectFlags, StatBonuses};
use std::sync::Arc;

fn test_build() -> CharacterBuild {
    CharacterBuild::new(
        StatBonuses { str_: 2, wis: 1, cha: 1, sta: 2, agi: 1, int: 0 },
        EffectFlags { giant_slayer: true, ..Default::default() },
    )
    .with_class(CombatClass::Warrior)
}

fn benchmark_boss_rush(c: &mut Criterion) {
    let build = test_build();
    let policy = AutoplayPolicy::default();

    let mut seed = 0u64;
    c.bench_function("boss_rush_autoplay", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut encounter = BossRush::with_seed(build.clone(), Some(seed)).unwrap();
            black_box(autoplay(&mut encounter, &policy).unwrap())
        })
    });

    let roster = default_roster();
    c.bench_function("boss_rush_simulate_100", |b| {
        b.iter(|| {
            let report = simulate_boss_rush(
                black_box(&build),
                &roster,
                EncounterRules::default(),
                100,
                42,
                &policy,
            )
            .unwrap();
            black_box(report)
        })
    });
}

fn benchmark_quest(c: &mut Criterion) {
    let adventures = builtin_adventures().unwrap();
    let adventure = Arc::new(adventures.get("cold_storage").unwrap().clone());
    let build = test_build();

    let mut seed = 0u64;
    c.bench_function("quest_first_choice_walk", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut quest = QuestEngine::with_seed(adventure.clone(), build.clone(), Some(seed)).unwrap();
            for _ in 0..50 {
                if quest.is_over() || quest.available_choices().is_empty() {
                    break;
                }
                quest.select_choice(0).unwrap();
            }
            black_box(quest.finish())
        })
    });
}

fn benchmark_arcade(c: &mut Criterion) {
    let build = test_build();

    c.bench_function("hack_slash_600_frames", |b| {
        b.iter(|| {
            let mut game = HackSlash::with_seed(build.clone(), Some(7));
            for frame in 0..600u32 {
                if game.state().is_over() {
                    break;
                }
                let input = if frame % 4 == 0 { FrameInput::attack() } else { FrameInput::idle() };
                let _ = black_box(game.step(input));
            }
            black_box(game.summary())
        })
    });

    c.bench_function("runner_600_frames", |b| {
        b.iter(|| {
            let mut game = Runner::with_seed(build.clone(), Some(7));
            for frame in 0..600u32 {
                if game.state().is_over() {
                    break;
                }
                let input = if frame % 40 == 0 { FrameInput::jump() } else { FrameInput::idle() };
                let _ = black_box(game.step(input));
            }
            black_box(game.summary())
        })
    });
}

criterion_group!(benches, benchmark_boss_rush, benchmark_quest, benchmark_arcade);
criterion_main!(benches);
