use log::{debug, error, info};

use super::{
    action::Direction,
    config::{Difficulty, GameConfig},
    error::{GameError, PlacementTarget},
    placer::{Constraint, RandomPlacer},
    state::{CollisionType, GameState, GameStatus, Position, Snake},
};

/// Result of a game step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Food could not be placed again because no free cell was found
    pub board_full: bool,
    /// Whether the game has terminated
    pub terminated: bool,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    placer: RandomPlacer,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let placer = RandomPlacer::new(config.placement_attempts);
        Self { config, placer }
    }

    /// Engine with a seeded placer, for reproducible games
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let placer = RandomPlacer::seeded(seed, config.placement_attempts);
        Self { config, placer }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh game: snake in the centre, then food, then obstacles
    pub fn new_game(&mut self, difficulty: Difficulty) -> Result<GameState, GameError> {
        let width = self.config.grid_width;
        let height = self.config.grid_height;
        let center_x = (width / 2) as i32;
        let center_y = (height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = self.spawn_food(&snake, &[], width, height)?;
        let obstacles = self.spawn_obstacles(&snake, food, difficulty, width, height)?;

        info!(
            "new {} game on {}x{} grid with {} obstacles",
            difficulty,
            width,
            height,
            obstacles.len()
        );

        Ok(GameState::new(snake, food, obstacles, difficulty, width, height))
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if state.status != GameStatus::Running {
            return StepResult {
                terminated: state.is_over(),
                ..Default::default()
            };
        }

        // Update direction (prevent 180° turns)
        if !state.direction.is_opposite(state.pending_direction) {
            state.direction = state.pending_direction;
        }

        let new_head = state.snake.head().moved_in_direction(state.direction);

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.status = GameStatus::Over;
            state.steps += 1;
            debug!("collision {:?} at {:?}", collision_type, new_head);

            return StepResult {
                collision_type: Some(collision_type),
                terminated: true,
                ..Default::default()
            };
        }

        state.snake.push_head(new_head);
        state.steps += 1;

        if new_head != state.food {
            state.snake.drop_tail();
            debug_assert!(!state.snake.overlaps_itself());
            return StepResult::default();
        }

        state.score += self.config.food_reward;

        let (width, height) = (state.grid_width, state.grid_height);
        let board_full = match self.spawn_food(&state.snake, &state.obstacles, width, height) {
            Ok(food) => {
                state.food = food;
                false
            }
            Err(err) => {
                error!("ending game, no room for food: {}", err);
                state.status = GameStatus::Over;
                true
            }
        };

        // The head already added one segment
        state.snake.grow_tail(state.profile.growth_per_food.saturating_sub(1));
        debug_assert!(!state.snake.overlaps_itself());

        StepResult {
            ate_food: true,
            collision_type: None,
            board_full,
            terminated: board_full,
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if state.is_obstacle(pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    /// Spawn food on a cell free of snake and obstacles, scanning the grid
    /// if sampling cannot find one
    fn spawn_food(
        &mut self,
        snake: &Snake,
        obstacles: &[Position],
        width: usize,
        height: usize,
    ) -> Result<Position, GameError> {
        let constraints: Vec<Constraint> = snake
            .segments()
            .chain(obstacles.iter().copied())
            .map(Constraint::Occupied)
            .collect();

        self.placer
            .place_exhaustive(PlacementTarget::Food, width, height, &constraints)
    }

    /// Spawn obstacles away from the starting snake and the first food
    fn spawn_obstacles(
        &mut self,
        snake: &Snake,
        food: Position,
        difficulty: Difficulty,
        width: usize,
        height: usize,
    ) -> Result<Vec<Position>, GameError> {
        let profile = difficulty.profile();
        let mut constraints: Vec<Constraint> = snake
            .segments()
            .chain(std::iter::once(food))
            .map(|from| Constraint::MinDistance {
                from,
                distance: profile.min_distance,
            })
            .collect();

        let mut obstacles = Vec::with_capacity(profile.obstacle_count);
        for _ in 0..profile.obstacle_count {
            let obstacle = self
                .placer
                .place(PlacementTarget::Obstacle, width, height, &constraints)?;
            constraints.push(Constraint::Occupied(obstacle));
            obstacles.push(obstacle);
        }

        Ok(obstacles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 17)
    }

    /// 20x20 board with a right-facing snake at (10,10) and no obstacles
    fn open_state(difficulty: Difficulty) -> GameState {
        GameState::new(
            Snake::from_segments([
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10),
            ]),
            Position::new(2, 2),
            Vec::new(),
            difficulty,
            20,
            20,
        )
    }

    #[test]
    fn test_new_game() {
        let mut engine = engine();
        let state = engine.new_game(Difficulty::Medium).unwrap();

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.obstacles.len(), 5);
    }

    #[test]
    fn test_new_game_placement_invariants() {
        let mut engine = engine();
        for difficulty in Difficulty::ALL {
            for _ in 0..20 {
                let state = engine.new_game(difficulty).unwrap();
                let profile = difficulty.profile();
                let min = i64::from(profile.min_distance).pow(2);

                assert!(!state.snake.contains(state.food));
                assert!(!state.obstacles.contains(&state.food));
                assert_eq!(state.obstacles.len(), profile.obstacle_count);

                for (i, obstacle) in state.obstacles.iter().enumerate() {
                    assert!(state.is_in_bounds(*obstacle));
                    assert!(!state.obstacles[i + 1..].contains(obstacle));
                    assert!(obstacle.distance_squared(state.food) >= min);
                    for segment in state.snake.segments() {
                        assert!(obstacle.distance_squared(segment) >= min);
                    }
                }
            }
        }
    }

    #[test]
    fn test_new_game_exhausted_on_crowded_grid() {
        let config = GameConfig {
            placement_attempts: 200,
            ..GameConfig::new(6, 6)
        };
        let mut engine = GameEngine::with_seed(config, 3);

        let err = engine.new_game(Difficulty::Easy).unwrap_err();
        assert!(matches!(
            err,
            GameError::PlacementExhausted {
                target: PlacementTarget::Obstacle,
                ..
            }
        ));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert!(!result.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert_eq!(state.snake.tail(), Position::new(9, 10));
    }

    #[test]
    fn test_food_consumption_scenario() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        state.food = Position::new(11, 10);

        let result = engine.step(&mut state);

        assert!(result.ate_food);
        assert_eq!(state.score, 10);
        let segments: Vec<_> = state.snake.segments().collect();
        assert_eq!(
            segments,
            vec![
                Position::new(11, 10),
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10),
            ]
        );
        assert!(!state.snake.contains(state.food));
        assert!(!state.is_obstacle(state.food));
    }

    #[test]
    fn test_growth_per_food_on_hard() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Hard);
        state.food = Position::new(11, 10);

        engine.step(&mut state);
        assert_eq!(state.snake.len(), 5);
        assert!(!state.snake.overlaps_itself());

        // The stacked tail unfurls without changing length
        state.food = Position::new(0, 0);
        engine.step(&mut state);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.snake.tail(), Position::new(8, 10));
        engine.step(&mut state);
        assert_eq!(state.snake.tail(), Position::new(9, 10));
    }

    #[test]
    fn test_food_never_on_snake_or_obstacle() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        state.obstacles = vec![Position::new(3, 3), Position::new(4, 4)];

        // Zigzag down and left, eating food placed in front of the head
        let turns = [Direction::Down, Direction::Left, Direction::Down, Direction::Left];
        for i in 0..12 {
            state.queue_direction(turns[(i / 3) % 4]);
            let (dx, dy) = state.pending_direction.delta();
            state.food = state.snake.head().moved_by(dx, dy);
            let result = engine.step(&mut state);
            assert!(result.ate_food, "tick {} did not eat", i);
            assert!(!state.snake.contains(state.food));
            assert!(!state.is_obstacle(state.food));
        }
        assert_eq!(state.score, 120);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        state.snake = Snake::from_segments([
            Position::new(0, 5),
            Position::new(1, 5),
            Position::new(2, 5),
        ]);
        state.direction = Direction::Left;
        state.pending_direction = Direction::Left;
        let before = state.snake.clone();

        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(state.status, GameStatus::Over);
        assert_eq!(result.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.snake, before);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        // Body: (5,5), (4,5), (3,5), (2,5)
        state.snake = Snake::new(Position::new(5, 5), Direction::Right, 4);

        engine.step(&mut state);
        state.queue_direction(Direction::Down);
        engine.step(&mut state);
        state.queue_direction(Direction::Left);
        engine.step(&mut state);
        state.queue_direction(Direction::Up);
        let result = engine.step(&mut state);

        assert!(result.terminated);
        assert_eq!(
            result.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_obstacle_collision() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        state.obstacles = vec![Position::new(11, 10)];

        let result = engine.step(&mut state);

        assert_eq!(result.collision_type, Some(CollisionType::Obstacle));
        assert_eq!(state.status, GameStatus::Over);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);

        // Bypass the input filter to check the tick-time guard
        state.pending_direction = Direction::Left;
        engine.step(&mut state);

        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        state.status = GameStatus::Over;
        let before = state.clone();

        for _ in 0..3 {
            let result = engine.step(&mut state);
            assert!(result.terminated);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_paused_game_no_update() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        state.status = GameStatus::Paused;
        let before = state.clone();

        let result = engine.step(&mut state);

        assert!(!result.terminated);
        assert_eq!(state, before);
    }

    #[test]
    fn test_food_found_on_nearly_full_board() {
        // One sample per placement; the single free cell must still be found
        let config = GameConfig {
            placement_attempts: 1,
            ..GameConfig::new(4, 1)
        };
        let mut engine = GameEngine::with_seed(config, 9);
        let mut state = GameState::new(
            Snake::from_segments([Position::new(1, 0), Position::new(0, 0)]),
            Position::new(2, 0),
            Vec::new(),
            Difficulty::Medium,
            4,
            1,
        );

        let result = engine.step(&mut state);

        assert!(result.ate_food);
        assert!(!result.board_full);
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.food, Position::new(3, 0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic]
    fn test_step_rejects_overlapping_body() {
        let mut engine = engine();
        let mut state = open_state(Difficulty::Medium);
        // (4,5) appears twice away from the tail
        state.snake = Snake::from_segments([
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(4, 6),
            Position::new(4, 5),
            Position::new(3, 5),
        ]);

        engine.step(&mut state);
    }

    #[test]
    fn test_board_full_ends_game() {
        // 3x1 board: eating the last free cell leaves nowhere for food
        let config = GameConfig {
            placement_attempts: 100,
            ..GameConfig::new(3, 1)
        };
        let mut engine = GameEngine::with_seed(config, 9);
        let mut state = GameState::new(
            Snake::from_segments([Position::new(1, 0), Position::new(0, 0)]),
            Position::new(2, 0),
            Vec::new(),
            Difficulty::Medium,
            3,
            1,
        );

        let result = engine.step(&mut state);

        assert!(result.ate_food);
        assert!(result.board_full);
        assert!(result.terminated);
        assert_eq!(state.status, GameStatus::Over);
        assert_eq!(state.score, 10);
    }
}
