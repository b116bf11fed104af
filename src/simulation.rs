// --- File: simulation.rs ---
use crate::canvas::{Canvas, Color, Rect};
use crate::config::{ConfigError, SimulationConfig, WormConfig};
use crate::constants::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub type SimRng = StdRng;

// --- Core Data Structures ---

/// Playable field. The score strip at the top is out of bounds for worms;
/// food and movement are confined below it.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub score_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallHit {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    Poison,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodItem {
    pub rect: Rect,
    pub color: Color,
}

impl FoodItem {
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    /// Side length of the (square) item.
    pub fn extent(&self) -> f32 {
        self.rect.size.x
    }
}

// --- Food Pool ---

/// Shared collection of consumable items. Poison is identified by extent
/// alone: anything stocked larger than the base food size is a pill.
pub struct FoodPool {
    items: Vec<FoodItem>,
    pub base_size: f32,
    pub base_color: Color,
}

impl FoodPool {
    pub fn new(base_size: f32, base_color: Color) -> Self {
        Self {
            items: Vec::new(),
            base_size,
            base_color,
        }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Classification is recomputed from the extent every time; it is never
    /// stored on the item.
    pub fn kind_of(&self, item: &FoodItem) -> FoodKind {
        if item.extent() > self.base_size {
            FoodKind::Poison
        } else {
            FoodKind::Normal
        }
    }

    /// Stocks `amount - 1` normal items plus one poison pill, drawing each.
    /// The pill takes one of the `amount` slots, so a stocking of 10 yields
    /// 9 normal items.
    pub fn restock(
        &mut self,
        rng: &mut SimRng,
        arena: &Arena,
        canvas: &mut dyn Canvas,
        amount: usize,
        size: f32,
    ) {
        for _ in 0..amount.saturating_sub(1) {
            let item = FoodItem {
                rect: Rect::square(Self::random_pos(rng, arena), size),
                color: self.base_color,
            };
            canvas.fill_rect(item.rect, item.color);
            self.items.push(item);
        }
        let pill = FoodItem {
            rect: Rect::square(Self::random_pos(rng, arena), size + POISON_SIZE_BONUS),
            color: ORANGE,
        };
        canvas.fill_rect(pill.rect, pill.color);
        self.items.push(pill);
        log::debug!("restocked pool to {} items", self.items.len());
    }

    /// Removes and returns the item at `index`; silently a no-op when the
    /// index is stale.
    pub fn remove(&mut self, index: usize) -> Option<FoodItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Repaints every remaining item. Worm trails erase whatever they cross,
    /// so the driver calls this periodically to restore walked-over food.
    pub fn refresh(&self, canvas: &mut dyn Canvas) {
        for item in &self.items {
            let color = match self.kind_of(item) {
                FoodKind::Poison => ORANGE,
                FoodKind::Normal => self.base_color,
            };
            canvas.fill_rect(item.rect, color);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    // Food sits on whole-pixel coordinates inside the arena interior.
    fn random_pos(rng: &mut SimRng, arena: &Arena) -> Vec2 {
        let x = rng.gen_range(FOOD_MARGIN as i32..=(arena.width - FOOD_MARGIN) as i32);
        let y = rng.gen_range(arena.score_height as i32..=(arena.height - FOOD_MARGIN) as i32);
        Vec2::new(x as f32, y as f32)
    }
}

// --- Worm ---

/// What happened during one tick; the wall report is informational only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickReport {
    pub ate: Option<FoodKind>,
    pub wall: Option<WallHit>,
    pub transcended: bool,
}

pub struct Worm {
    pub name: String,
    pub color: Color,
    pub pos: Vec2,
    pub size: f32,
    pub track_length: usize,
    pub iq: i32,
    pub score_anchor: Vec2,
    dx: i32,
    dy: i32,
    trail: VecDeque<Vec2>,
}

impl Worm {
    pub fn new(config: &WormConfig, pos: Vec2) -> Self {
        Self {
            name: config.name.clone(),
            color: config.color,
            pos,
            size: config.size,
            track_length: config.track_length,
            iq: config.iq.max(MIN_IQ),
            score_anchor: config.score_anchor,
            dx: 0,
            dy: 0,
            trail: VecDeque::new(),
        }
    }

    /// Bounding box, centered on the current position.
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Direction bias toward the last seek target, per axis in {-1, 0, +1}.
    pub fn bias(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    /// Recent center positions, most recent first.
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    /// One full step of the seek/eat/move/clamp/draw/trail cycle. Runs to
    /// completion even when the worm transcends mid-tick; the registry
    /// removes it afterwards.
    pub fn tick(
        &mut self,
        food: &mut FoodPool,
        rng: &mut SimRng,
        arena: &Arena,
        canvas: &mut dyn Canvas,
    ) -> TickReport {
        let target = self.seek(food, rng, arena, canvas);

        let mut report = if self.rect().intersects(&food.items()[target].rect) {
            self.eat(target, food, rng, canvas)
        } else {
            TickReport::default()
        };

        let mut step_x = rng.gen_range(-STEP_RANGE..=STEP_RANGE);
        let mut step_y = rng.gen_range(-STEP_RANGE..=STEP_RANGE);
        // Smart enough this tick? Then drift toward the goal as well.
        if rng.gen_range(1..=IQ_ROLL_SIDES) <= self.iq {
            step_x += self.dx;
            step_y += self.dy;
        }
        self.pos += Vec2::new(step_x as f32, step_y as f32);

        report.wall = self.clamp_to(arena);
        canvas.fill_rect(self.rect(), self.color);
        self.record_trail(canvas);
        report
    }

    /// Finds the nearest item (restocking first if the pool ran dry), points
    /// the direction bias at it and returns its index. Equidistant items
    /// resolve to the later one in pool order.
    pub fn seek(
        &mut self,
        food: &mut FoodPool,
        rng: &mut SimRng,
        arena: &Arena,
        canvas: &mut dyn Canvas,
    ) -> usize {
        if food.is_empty() {
            let size = food.base_size;
            food.restock(rng, arena, canvas, FOOD_STOCK_AMOUNT, size);
        }

        let mut target = 0;
        let mut shortest = f32::INFINITY;
        for (i, item) in food.items().iter().enumerate() {
            let distance = self.pos.distance(item.center());
            if distance <= shortest {
                target = i;
                shortest = distance;
            }
        }

        let center = food.items()[target].center();
        self.dx = step_toward(self.pos.x, center.x);
        self.dy = step_toward(self.pos.y, center.y);
        target
    }

    fn eat(
        &mut self,
        target: usize,
        food: &mut FoodPool,
        rng: &mut SimRng,
        canvas: &mut dyn Canvas,
    ) -> TickReport {
        let Some(item) = food.remove(target) else {
            return TickReport::default();
        };
        canvas.fill_rect(item.rect, BACKGROUND_COLOR);

        let kind = food.kind_of(&item);
        self.iq += 1;
        if kind == FoodKind::Poison {
            self.iq += rng.gen_range(POISON_PENALTY_MIN..=POISON_PENALTY_MAX);
            if self.iq < MIN_IQ {
                self.iq = MIN_IQ;
            }
        }
        self.write_score(canvas, &format!("{} IQ= {}", self.name, self.iq));

        let mut report = TickReport {
            ate: Some(kind),
            ..Default::default()
        };
        if self.iq >= TRANSCENDENCE_IQ {
            self.write_score(canvas, &format!("{} reaches transcendence", self.name));
            log::info!("{} reaches transcendence", self.name);
            report.transcended = true;
        }
        report
    }

    fn write_score(&self, canvas: &mut dyn Canvas, text: &str) {
        canvas.fill_rect(
            Rect::new(
                self.score_anchor.x,
                self.score_anchor.y,
                SCORE_TEXT_WIDTH,
                SCORE_TEXT_HEIGHT,
            ),
            BACKGROUND_COLOR,
        );
        canvas.draw_text(text, self.score_anchor, SCORE_FONT_PX, self.color);
    }

    /// Clamps the position into the playable field and reports the wall
    /// struck, if any. A corner hit clamps both axes but reports one wall.
    fn clamp_to(&mut self, arena: &Arena) -> Option<WallHit> {
        let mut hit = None;
        if self.pos.x >= arena.width - WALL_MARGIN {
            self.pos.x = arena.width - WALL_MARGIN;
            hit = Some(WallHit::Right);
        } else if self.pos.x <= WALL_MARGIN {
            self.pos.x = WALL_MARGIN;
            hit = Some(WallHit::Left);
        }
        if self.pos.y <= arena.score_height {
            self.pos.y = arena.score_height;
            hit = hit.or(Some(WallHit::Top));
        } else if self.pos.y >= arena.height - WALL_MARGIN {
            self.pos.y = arena.height - WALL_MARGIN;
            hit = hit.or(Some(WallHit::Bottom));
        }
        hit
    }

    /// Pushes the new center onto the trail; once the trail reaches its
    /// limit, the oldest segment is evicted and erased the same tick.
    fn record_trail(&mut self, canvas: &mut dyn Canvas) {
        self.trail.push_front(self.pos);
        if self.trail.len() >= self.track_length {
            if let Some(oldest) = self.trail.pop_back() {
                canvas.fill_rect(Rect::centered(oldest, self.size), BACKGROUND_COLOR);
            }
        }
    }
}

fn step_toward(from: f32, to: f32) -> i32 {
    if to > from {
        1
    } else if to < from {
        -1
    } else {
        0
    }
}

// --- Explosion ---

/// Scatter of particle positions for a transcendence burst: a fixed number
/// of passes of square-sampled offsets, kept only inside the burst radius.
pub fn explosion_scatter(rng: &mut SimRng, center: Vec2, radius: f32) -> Vec<Vec2> {
    let samples_per_pass = radius.max(1.0) as usize;
    let mut particles = Vec::new();
    for _ in 0..EXPLOSION_PASSES {
        for _ in 0..samples_per_pass {
            let offset = Vec2::new(
                rng.gen_range(-radius..=radius),
                rng.gen_range(-radius..=radius),
            );
            if offset.length() < radius {
                particles.push(center + offset);
            }
        }
    }
    particles
}

/// A burst in progress. Particles are revealed a batch per tick so the
/// effect animates without stalling the loop; debris stays on the canvas.
pub struct Explosion {
    color: Color,
    particles: Vec<Vec2>,
    revealed: usize,
}

impl Explosion {
    pub fn new(rng: &mut SimRng, center: Vec2, radius: f32, color: Color) -> Self {
        Self {
            color,
            particles: explosion_scatter(rng, center, radius),
            revealed: 0,
        }
    }

    pub fn particles(&self) -> &[Vec2] {
        &self.particles
    }

    /// Draws the next batch; returns false once the burst is spent.
    pub fn advance(&mut self, canvas: &mut dyn Canvas) -> bool {
        let next = (self.revealed + EXPLOSION_REVEAL_PER_TICK).min(self.particles.len());
        for particle in &self.particles[self.revealed..next] {
            canvas.fill_rect(
                Rect::centered(*particle, EXPLOSION_PARTICLE_SIZE),
                self.color,
            );
        }
        self.revealed = next;
        self.revealed < self.particles.len()
    }
}

// --- Simulation State ---

/// Registry of live worms plus everything one tick touches: the food pool,
/// the arena bounds, the RNG and any bursts still animating.
pub struct SimulationState {
    pub worms: Vec<Worm>,
    pub food: FoodPool,
    pub arena: Arena,
    rng: SimRng,
    clock: u64,
    explosions: Vec<Explosion>,
    speed_multiplier: f32,
    is_paused: bool,
    config: SimulationConfig,
}

impl SimulationState {
    pub fn new(config: SimulationConfig, canvas: &mut dyn Canvas) -> Result<Self, ConfigError> {
        Self::with_rng(config, SimRng::from_entropy(), canvas)
    }

    /// Seedable constructor so tests can drive a deterministic run.
    pub fn with_rng(
        config: SimulationConfig,
        mut rng: SimRng,
        canvas: &mut dyn Canvas,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = Arena {
            width: config.arena_width,
            height: config.arena_height,
            score_height: config.score_height,
        };
        let worms = Self::spawn_worms(&mut rng, &config, &arena);
        let mut food = FoodPool::new(config.food_base_size, config.food_color);
        food.restock(
            &mut rng,
            &arena,
            canvas,
            config.food_stock_amount,
            config.food_base_size,
        );
        Ok(Self {
            worms,
            food,
            arena,
            rng,
            clock: 0,
            explosions: Vec::new(),
            speed_multiplier: INITIAL_SPEED_MULTIPLIER,
            is_paused: false,
            config,
        })
    }

    fn spawn_worms(rng: &mut SimRng, config: &SimulationConfig, arena: &Arena) -> Vec<Worm> {
        config
            .roster
            .iter()
            .map(|worm_config| {
                let pos = Vec2::new(
                    rng.gen_range(1.0..arena.width - 1.0),
                    rng.gen_range(1.0..arena.height - 1.0),
                );
                Worm::new(worm_config, pos)
            })
            .collect()
    }

    /// Advances one tick. Returns false once the registry is empty and the
    /// last burst has finished animating: normal completion, not an error.
    pub fn step(&mut self, canvas: &mut dyn Canvas) -> bool {
        if self.worms.is_empty() && self.explosions.is_empty() {
            return false;
        }
        self.clock += 1;

        if !self.worms.is_empty() {
            let arena = self.arena;
            // Removal is deferred to after the sweep so a worm retiring
            // mid-traversal cannot disturb the others' ticks.
            let mut retired: Vec<usize> = Vec::new();
            for i in 0..self.worms.len() {
                let report = self.worms[i].tick(&mut self.food, &mut self.rng, &arena, canvas);
                if report.transcended {
                    let (pos, radius, color) = {
                        let worm = &self.worms[i];
                        (worm.pos, worm.track_length as f32, worm.color)
                    };
                    let burst = Explosion::new(&mut self.rng, pos, radius, color);
                    self.explosions.push(burst);
                    retired.push(i);
                }
            }
            for &i in retired.iter().rev() {
                let worm = self.worms.remove(i);
                log::info!("{} retired after {} ticks", worm.name, self.clock);
            }

            if self.clock % FOOD_REFRESH_INTERVAL == 0 {
                self.food.refresh(canvas);
            }
        }

        self.explosions.retain_mut(|burst| burst.advance(canvas));
        true
    }

    pub fn ticks(&self) -> u64 {
        self.clock
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn adjust_speed(&mut self, increase: bool) {
        self.speed_multiplier = if increase {
            (self.speed_multiplier + SPEED_ADJUST_FACTOR).min(MAX_SPEED_MULTIPLIER)
        } else {
            (self.speed_multiplier - SPEED_ADJUST_FACTOR).max(MIN_SPEED_MULTIPLIER)
        };
        println!("Speed Multiplier: {:.2}", self.speed_multiplier);
    }

    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
        println!(
            "Simulation {}",
            if self.is_paused { "Paused" } else { "Resumed" }
        );
    }

    /// Fresh entropy seed, fresh roster, restocked pool. The caller is
    /// expected to clear the canvas first.
    pub fn restart(&mut self, canvas: &mut dyn Canvas) {
        println!("Restarting simulation with new seed...");
        self.rng = SimRng::from_entropy();
        self.clock = 0;
        self.explosions.clear();
        self.worms = Self::spawn_worms(&mut self.rng, &self.config, &self.arena);
        self.food.clear();
        let arena = self.arena;
        self.food.restock(
            &mut self.rng,
            &arena,
            canvas,
            self.config.food_stock_amount,
            self.config.food_base_size,
        );
        self.speed_multiplier = INITIAL_SPEED_MULTIPLIER;
        self.is_paused = false;
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    fn test_arena() -> Arena {
        Arena {
            width: 2100.0,
            height: 1100.0,
            score_height: 30.0,
        }
    }

    fn test_worm(pos: Vec2, iq: i32) -> Worm {
        let config = WormConfig {
            name: "Tester".into(),
            size: 4.0,
            iq,
            ..Default::default()
        };
        Worm::new(&config, pos)
    }

    fn normal_item(center: Vec2) -> FoodItem {
        FoodItem {
            rect: Rect::centered(center, BASE_FOOD_SIZE),
            color: WHITE,
        }
    }

    fn poison_item(center: Vec2) -> FoodItem {
        FoodItem {
            rect: Rect::centered(center, BASE_FOOD_SIZE + POISON_SIZE_BONUS),
            color: ORANGE,
        }
    }

    #[test]
    fn restock_stocks_nine_normal_and_one_poison() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(1);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);

        pool.restock(&mut rng, &arena, &mut canvas, 10, 4.0);

        assert_eq!(pool.len(), 10);
        let normal = pool
            .items()
            .iter()
            .filter(|item| pool.kind_of(item) == FoodKind::Normal)
            .count();
        let poison = pool
            .items()
            .iter()
            .filter(|item| pool.kind_of(item) == FoodKind::Poison)
            .count();
        assert_eq!(normal, 9);
        assert_eq!(poison, 1);
        for item in pool.items() {
            match pool.kind_of(item) {
                FoodKind::Normal => assert_eq!(item.extent(), 4.0),
                FoodKind::Poison => assert_eq!(item.extent(), 8.0),
            }
            assert!(item.rect.pos.x >= FOOD_MARGIN);
            assert!(item.rect.pos.x <= arena.width - FOOD_MARGIN);
            assert!(item.rect.pos.y >= arena.score_height);
            assert!(item.rect.pos.y <= arena.height - FOOD_MARGIN);
        }
        assert_eq!(canvas.rects.len(), 10);
    }

    #[test]
    fn kind_is_derived_from_extent() {
        let pool = FoodPool::new(4.0, WHITE);
        assert_eq!(
            pool.kind_of(&normal_item(Vec2::new(50.0, 50.0))),
            FoodKind::Normal
        );
        assert_eq!(
            pool.kind_of(&poison_item(Vec2::new(50.0, 50.0))),
            FoodKind::Poison
        );
    }

    #[test]
    fn remove_with_stale_index_is_silent() {
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(50.0, 50.0)));
        assert!(pool.remove(5).is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn refresh_repaints_every_item_by_kind() {
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(50.0, 50.0)));
        pool.items.push(poison_item(Vec2::new(90.0, 90.0)));

        let mut canvas = RecordingCanvas::default();
        pool.refresh(&mut canvas);

        assert_eq!(canvas.rects.len(), 2);
        assert_eq!(canvas.rects[0].1, WHITE);
        assert_eq!(canvas.rects[1].1, ORANGE);
    }

    #[test]
    fn seek_targets_nearest_item_and_sets_bias() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(2);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(900.0, 900.0)));
        pool.items.push(normal_item(Vec2::new(120.0, 80.0)));

        let mut worm = test_worm(Vec2::new(100.0, 100.0), 50);
        let target = worm.seek(&mut pool, &mut rng, &arena, &mut canvas);

        assert_eq!(target, 1);
        assert_eq!(worm.bias(), (1, -1));
    }

    #[test]
    fn seek_breaks_distance_ties_toward_the_later_item() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(3);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(90.0, 100.0)));
        pool.items.push(normal_item(Vec2::new(110.0, 100.0)));

        let mut worm = test_worm(Vec2::new(100.0, 100.0), 50);
        let target = worm.seek(&mut pool, &mut rng, &arena, &mut canvas);

        assert_eq!(target, 1);
        assert_eq!(worm.bias(), (1, 0));
    }

    #[test]
    fn seek_restocks_an_empty_pool() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(4);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);

        let mut worm = test_worm(Vec2::new(100.0, 100.0), 50);
        worm.seek(&mut pool, &mut rng, &arena, &mut canvas);

        assert_eq!(pool.len(), FOOD_STOCK_AMOUNT);
    }

    #[test]
    fn eating_normal_food_rewards_one_iq_and_removes_the_item() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(5);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(100.0, 100.0)));

        let mut worm = test_worm(Vec2::new(100.0, 100.0), 50);
        let report = worm.tick(&mut pool, &mut rng, &arena, &mut canvas);

        assert_eq!(report.ate, Some(FoodKind::Normal));
        assert_eq!(worm.iq, 51);
        assert!(pool.is_empty());
        assert!(canvas
            .texts
            .iter()
            .any(|(text, _)| text == "Tester IQ= 51"));
    }

    #[test]
    fn poison_penalty_lands_in_range() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(6);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(poison_item(Vec2::new(100.0, 100.0)));

        let mut worm = test_worm(Vec2::new(100.0, 100.0), 100);
        let report = worm.tick(&mut pool, &mut rng, &arena, &mut canvas);

        assert_eq!(report.ate, Some(FoodKind::Poison));
        // 100 + 1 + delta with delta in [-10, -5]
        assert!((91..=96).contains(&worm.iq), "iq was {}", worm.iq);
    }

    #[test]
    fn poison_never_drives_iq_below_the_floor() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(7);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(poison_item(Vec2::new(100.0, 100.0)));

        let mut worm = test_worm(Vec2::new(100.0, 100.0), 1);
        worm.tick(&mut pool, &mut rng, &arena, &mut canvas);

        assert_eq!(worm.iq, MIN_IQ);
    }

    #[test]
    fn high_iq_drifts_toward_the_food() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(8);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(2000.0, 1000.0)));

        // At the roll ceiling every step is goal-directed, so the worm walks
        // a biased random walk toward the far corner.
        let mut worm = test_worm(Vec2::new(100.0, 100.0), IQ_ROLL_SIDES);
        for _ in 0..200 {
            worm.tick(&mut pool, &mut rng, &arena, &mut canvas);
        }

        assert_eq!(worm.bias(), (1, 1));
        assert!(worm.pos.x > 150.0, "x was {}", worm.pos.x);
        assert!(worm.pos.y > 150.0, "y was {}", worm.pos.y);
    }

    #[test]
    fn clamp_reports_each_wall() {
        let arena = test_arena();

        let mut worm = test_worm(Vec2::new(2200.0, 500.0), 50);
        assert_eq!(worm.clamp_to(&arena), Some(WallHit::Right));
        assert_eq!(worm.pos.x, 2095.0);

        let mut worm = test_worm(Vec2::new(2.0, 500.0), 50);
        assert_eq!(worm.clamp_to(&arena), Some(WallHit::Left));
        assert_eq!(worm.pos.x, 5.0);

        let mut worm = test_worm(Vec2::new(100.0, 10.0), 50);
        assert_eq!(worm.clamp_to(&arena), Some(WallHit::Top));
        assert_eq!(worm.pos.y, 30.0);

        let mut worm = test_worm(Vec2::new(100.0, 1099.0), 50);
        assert_eq!(worm.clamp_to(&arena), Some(WallHit::Bottom));
        assert_eq!(worm.pos.y, 1095.0);

        let mut worm = test_worm(Vec2::new(100.0, 500.0), 50);
        assert_eq!(worm.clamp_to(&arena), None);
    }

    #[test]
    fn corner_hit_clamps_both_axes() {
        let arena = test_arena();
        let mut worm = test_worm(Vec2::new(2200.0, 2000.0), 50);
        assert_eq!(worm.clamp_to(&arena), Some(WallHit::Right));
        assert_eq!(worm.pos, Vec2::new(2095.0, 1095.0));
    }

    #[test]
    fn trail_stays_bounded_and_evicts_with_erase() {
        let mut canvas = RecordingCanvas::default();
        let mut worm = test_worm(Vec2::new(0.0, 50.0), 50);
        worm.track_length = 5;

        for i in 0..10 {
            worm.pos = Vec2::new(i as f32, 50.0);
            worm.record_trail(&mut canvas);
            assert!(worm.trail().len() <= worm.track_length);
        }

        // 10 pushes against a limit of 5: the first eviction fires on push 5,
        // so 6 stale segments were erased and 4 remain.
        assert_eq!(worm.trail().len(), 4);
        assert_eq!(worm.trail()[0], Vec2::new(9.0, 50.0));
        let erased = canvas
            .rects
            .iter()
            .filter(|(_, color)| *color == BACKGROUND_COLOR)
            .count();
        assert_eq!(erased, 6);
    }

    #[test]
    fn explosion_scatter_stays_inside_the_radius() {
        let mut rng = SimRng::seed_from_u64(9);
        let center = Vec2::new(300.0, 300.0);
        let particles = explosion_scatter(&mut rng, center, 50.0);

        assert!(!particles.is_empty());
        assert!(particles.len() <= EXPLOSION_PASSES * 50);
        for particle in &particles {
            assert!(particle.distance(center) < 50.0);
        }
    }

    #[test]
    fn explosion_reveals_in_paced_batches() {
        let mut rng = SimRng::seed_from_u64(10);
        let mut burst = Explosion::new(&mut rng, Vec2::new(300.0, 300.0), 50.0, YELLOW);
        let total = burst.particles().len();

        let mut canvas = RecordingCanvas::default();
        let mut batches = 0;
        while burst.advance(&mut canvas) {
            batches += 1;
            assert!(batches < 1000);
        }

        assert_eq!(canvas.rects.len(), total);
        assert!(batches + 1 >= total.div_ceil(EXPLOSION_REVEAL_PER_TICK));
    }

    #[test]
    fn transcendence_retires_the_worm_exactly_once() {
        let mut config = SimulationConfig::new();
        config.roster.truncate(1);
        let mut canvas = RecordingCanvas::default();
        let mut sim =
            SimulationState::with_rng(config, SimRng::seed_from_u64(11), &mut canvas).unwrap();

        sim.worms[0].iq = 199;
        sim.worms[0].pos = Vec2::new(500.0, 500.0);
        sim.food.items.clear();
        sim.food.items.push(normal_item(Vec2::new(500.0, 500.0)));

        // The transcending tick itself keeps running while the burst drains.
        assert!(sim.step(&mut canvas));
        assert!(sim.worms.is_empty());
        assert_eq!(sim.explosions().len(), 1);
        assert!(canvas
            .texts
            .iter()
            .any(|(text, _)| text.contains("reaches transcendence")));

        let mut guard = 0;
        while sim.step(&mut canvas) {
            guard += 1;
            assert!(guard < 1000);
        }
        assert!(sim.worms.is_empty());
        assert!(sim.explosions().is_empty());
    }

    #[test]
    fn transcending_tick_still_moves_and_tracks() {
        let arena = test_arena();
        let mut rng = SimRng::seed_from_u64(14);
        let mut canvas = RecordingCanvas::default();
        let mut pool = FoodPool::new(4.0, WHITE);
        pool.items.push(normal_item(Vec2::new(500.0, 500.0)));

        let mut worm = test_worm(Vec2::new(500.0, 500.0), 199);
        let report = worm.tick(&mut pool, &mut rng, &arena, &mut canvas);

        assert!(report.transcended);
        assert_eq!(worm.iq, 200);
        assert!(pool.is_empty());
        // The tick ran to completion: the post-move center is on the trail.
        assert_eq!(worm.trail().len(), 1);
        assert_eq!(worm.trail()[0], worm.pos);
    }

    #[test]
    fn two_worms_can_transcend_in_the_same_tick() {
        let mut config = SimulationConfig::new();
        config.roster.truncate(2);
        let mut canvas = RecordingCanvas::default();
        let mut sim =
            SimulationState::with_rng(config, SimRng::seed_from_u64(15), &mut canvas).unwrap();

        sim.worms[0].iq = 199;
        sim.worms[0].pos = Vec2::new(300.0, 300.0);
        sim.worms[1].iq = 199;
        sim.worms[1].pos = Vec2::new(800.0, 800.0);
        sim.food.items.clear();
        sim.food.items.push(normal_item(Vec2::new(300.0, 300.0)));
        sim.food.items.push(normal_item(Vec2::new(800.0, 800.0)));

        assert!(sim.step(&mut canvas));
        assert!(sim.worms.is_empty());
        assert_eq!(sim.explosions().len(), 2);
    }

    #[test]
    fn empty_registry_reports_completion() {
        let mut config = SimulationConfig::new();
        config.roster.truncate(1);
        let mut canvas = RecordingCanvas::default();
        let mut sim =
            SimulationState::with_rng(config, SimRng::seed_from_u64(12), &mut canvas).unwrap();

        sim.worms.clear();
        assert!(!sim.step(&mut canvas));
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn invariants_hold_over_a_seeded_run() {
        let config = SimulationConfig::new();
        let mut canvas = RecordingCanvas::default();
        let mut sim =
            SimulationState::with_rng(config, SimRng::seed_from_u64(13), &mut canvas).unwrap();

        for _ in 0..500 {
            canvas.rects.clear();
            if !sim.step(&mut canvas) {
                break;
            }
            for worm in &sim.worms {
                assert!(worm.pos.x >= WALL_MARGIN);
                assert!(worm.pos.x <= sim.arena.width - WALL_MARGIN);
                assert!(worm.pos.y >= sim.arena.score_height);
                assert!(worm.pos.y <= sim.arena.height - WALL_MARGIN);
                assert!(worm.iq >= MIN_IQ);
                assert!(worm.trail().len() <= worm.track_length);
            }
        }
    }
}
