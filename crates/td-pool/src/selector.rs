//! Uniform winner selection

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use td_core::{TdError, TdResult, TicketId};

/// Picks one ticket uniformly from a pool.
///
/// The only place draw randomness comes from; seed it for reproducible runs.
pub struct Selector {
    rng: ChaCha8Rng,
}

impl Selector {
    /// Create a selector with optional seed
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self { rng }
    }

    /// Pick one ticket; an empty pool is an error, never a sentinel
    pub fn pick(&mut self, pool: &[TicketId]) -> TdResult<TicketId> {
        if pool.is_empty() {
            return Err(TdError::EmptyPool);
        }
        Ok(pool[self.rng.random_range(0..pool.len())])
    }

    /// Fresh seed for a dependent generator (e.g. display cycling)
    pub fn derive_seed(&mut self) -> u64 {
        self.rng.random()
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_core::{Color, Variant};

    fn pool(size: u8) -> Vec<TicketId> {
        (1..=size)
            .map(|n| TicketId::new(Color::Yellow, Variant::B, n).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_pool_is_error() {
        let mut selector = Selector::new(Some(1));
        assert!(matches!(selector.pick(&[]), Err(TdError::EmptyPool)));
    }

    #[test]
    fn test_single_ticket_pool() {
        let mut selector = Selector::new(Some(1));
        let pool = pool(1);
        assert_eq!(selector.pick(&pool).unwrap(), pool[0]);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let pool = pool(50);
        let mut a = Selector::new(Some(99));
        let mut b = Selector::new(Some(99));
        for _ in 0..20 {
            assert_eq!(a.pick(&pool).unwrap(), b.pick(&pool).unwrap());
        }
    }

    #[test]
    fn test_selection_is_uniform() {
        const DRAWS: usize = 60_000;
        let pool = pool(6);
        let mut selector = Selector::new(Some(2024));
        let mut hits = [0usize; 6];

        for _ in 0..DRAWS {
            let t = selector.pick(&pool).unwrap();
            hits[(t.number() - 1) as usize] += 1;
        }

        // Expected 10_000 each; allow ±5%
        let expected = DRAWS / pool.len();
        for (i, &h) in hits.iter().enumerate() {
            let deviation = (h as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.05, "ticket {} hit {} times", i + 1, h);
        }
    }
}
