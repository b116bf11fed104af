// Seeded soak run: the default three-worm roster forages in the full-size
// arena until every worm transcends (or a generous tick budget runs out),
// with the core invariants checked after every tick.
use rand::SeedableRng;
use worms::canvas::NullCanvas;
use worms::config::SimulationConfig;
use worms::constants::{MIN_IQ, WALL_MARGIN};
use worms::simulation::{SimRng, SimulationState};

const MAX_TICKS: u64 = 200_000;

#[test]
fn three_worm_run_holds_invariants_every_tick() {
    let config = SimulationConfig::new();
    let mut canvas = NullCanvas;
    let mut sim =
        SimulationState::with_rng(config, SimRng::seed_from_u64(0x5EED), &mut canvas).unwrap();

    let mut ticks = 0;
    while sim.step(&mut canvas) {
        ticks += 1;
        for worm in &sim.worms {
            assert!(
                worm.pos.x >= WALL_MARGIN && worm.pos.x <= sim.arena.width - WALL_MARGIN,
                "{} escaped horizontally at tick {}: x={}",
                worm.name,
                ticks,
                worm.pos.x
            );
            assert!(
                worm.pos.y >= sim.arena.score_height
                    && worm.pos.y <= sim.arena.height - WALL_MARGIN,
                "{} escaped vertically at tick {}: y={}",
                worm.name,
                ticks,
                worm.pos.y
            );
            assert!(worm.iq >= MIN_IQ, "{} dropped below the IQ floor", worm.name);
            assert!(
                worm.trail().len() <= worm.track_length,
                "{} grew an overlong trail",
                worm.name
            );
        }
        if ticks >= MAX_TICKS {
            break;
        }
    }

    // Either the run completed (registry drained) or the budget expired with
    // every invariant intact; both are acceptable for an unseeded-by-design
    // simulation driven here by a fixed test seed.
    if ticks < MAX_TICKS {
        assert!(sim.worms.is_empty());
    }
}
