//! Rejection-sampling placement of food and obstacles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{GameError, PlacementTarget};
use super::state::Position;

/// A rule a candidate cell must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The cell is taken
    Occupied(Position),
    /// The candidate must be at Euclidean distance >= `distance` from `from`
    MinDistance { from: Position, distance: u32 },
}

impl Constraint {
    /// Returns true if the candidate satisfies this constraint
    pub fn allows(&self, candidate: Position) -> bool {
        match *self {
            Constraint::Occupied(cell) => cell != candidate,
            Constraint::MinDistance { from, distance } => {
                let min = i64::from(distance);
                from.distance_squared(candidate) >= min * min
            }
        }
    }
}

/// Samples grid cells uniformly until one passes every constraint
pub struct RandomPlacer {
    rng: StdRng,
    max_attempts: u32,
}

impl RandomPlacer {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_attempts,
        }
    }

    /// Deterministic placer, used by tests and replays
    pub fn seeded(seed: u64, max_attempts: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts,
        }
    }

    pub fn place(
        &mut self,
        target: PlacementTarget,
        width: usize,
        height: usize,
        constraints: &[Constraint],
    ) -> Result<Position, GameError> {
        let exhausted = GameError::PlacementExhausted {
            target,
            attempts: self.max_attempts,
        };
        if width == 0 || height == 0 {
            return Err(exhausted);
        }

        for _ in 0..self.max_attempts {
            let candidate = Position::new(
                self.rng.gen_range(0..width) as i32,
                self.rng.gen_range(0..height) as i32,
            );
            if constraints.iter().all(|c| c.allows(candidate)) {
                return Ok(candidate);
            }
        }

        Err(exhausted)
    }

    /// Like [`place`](Self::place), but when sampling runs out every cell is
    /// scanned and one of the allowed cells is picked uniformly. Fails only if
    /// no cell satisfies the constraints.
    pub fn place_exhaustive(
        &mut self,
        target: PlacementTarget,
        width: usize,
        height: usize,
        constraints: &[Constraint],
    ) -> Result<Position, GameError> {
        let sampled = self.place(target, width, height, constraints);
        if sampled.is_ok() {
            return sampled;
        }

        let free: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x as i32, y as i32)))
            .filter(|&cell| constraints.iter().all(|c| c.allows(cell)))
            .collect();

        match free.len() {
            0 => sampled,
            n => Ok(free[self.rng.gen_range(0..n)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupied_constraint() {
        let c = Constraint::Occupied(Position::new(2, 3));
        assert!(!c.allows(Position::new(2, 3)));
        assert!(c.allows(Position::new(3, 2)));
    }

    #[test]
    fn test_min_distance_is_inclusive() {
        let c = Constraint::MinDistance {
            from: Position::new(0, 0),
            distance: 5,
        };
        assert!(c.allows(Position::new(3, 4))); // exactly 5
        assert!(!c.allows(Position::new(3, 3))); // ~4.24
        assert!(c.allows(Position::new(0, 5)));
    }

    #[test]
    fn test_place_within_bounds() {
        let mut placer = RandomPlacer::seeded(7, 1000);
        for _ in 0..200 {
            let pos = placer.place(PlacementTarget::Food, 4, 3, &[]).unwrap();
            assert!((0..4).contains(&pos.x));
            assert!((0..3).contains(&pos.y));
        }
    }

    #[test]
    fn test_place_finds_only_free_cell() {
        // 2x2 grid with three cells taken
        let constraints = [
            Constraint::Occupied(Position::new(0, 0)),
            Constraint::Occupied(Position::new(1, 0)),
            Constraint::Occupied(Position::new(0, 1)),
        ];
        let mut placer = RandomPlacer::seeded(42, 10_000);
        let pos = placer
            .place(PlacementTarget::Food, 2, 2, &constraints)
            .unwrap();
        assert_eq!(pos, Position::new(1, 1));
    }

    #[test]
    fn test_place_exhausted() {
        let constraints = [Constraint::MinDistance {
            from: Position::new(1, 1),
            distance: 10,
        }];
        let mut placer = RandomPlacer::seeded(1, 50);
        let err = placer
            .place(PlacementTarget::Obstacle, 3, 3, &constraints)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::PlacementExhausted {
                target: PlacementTarget::Obstacle,
                attempts: 50,
            }
        );
    }

    #[test]
    fn test_exhaustive_finds_last_free_cell() {
        // One free cell out of 900, far more than a single sample can find
        let free = Position::new(23, 11);
        let constraints: Vec<Constraint> = (0..30)
            .flat_map(|y| (0..30).map(move |x| Position::new(x, y)))
            .filter(|&cell| cell != free)
            .map(Constraint::Occupied)
            .collect();

        let mut placer = RandomPlacer::seeded(9, 1);
        let pos = placer
            .place_exhaustive(PlacementTarget::Food, 30, 30, &constraints)
            .unwrap();
        assert_eq!(pos, free);
    }

    #[test]
    fn test_exhaustive_fails_on_full_grid() {
        let constraints = [
            Constraint::Occupied(Position::new(0, 0)),
            Constraint::Occupied(Position::new(1, 0)),
        ];
        let mut placer = RandomPlacer::seeded(4, 10);
        let err = placer
            .place_exhaustive(PlacementTarget::Food, 2, 1, &constraints)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::PlacementExhausted {
                target: PlacementTarget::Food,
                attempts: 10,
            }
        );
    }

    #[test]
    fn test_place_empty_grid() {
        let mut placer = RandomPlacer::seeded(1, 50);
        assert!(placer.place(PlacementTarget::Food, 0, 5, &[]).is_err());
    }
}
