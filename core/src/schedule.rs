//! Delay window and per-message delay planning.
//!
//! The delay plan is the heart of the scheduler: given a batch size, an
//! inclusive `[min, max]` gap window, and an optional start offset, it
//! produces one cumulative delay per message. Both execution modes (locally
//! paced sends and remote queue submissions) consume the same plan.

use crate::error::{Result, SendError};
use rand::Rng;

/// Smallest permitted minimum gap, in seconds.
///
/// Keeps a mistyped window from producing a zero-delay flood.
pub const GAP_FLOOR_SECONDS: u64 = 1;

/// Inclusive range from which inter-message gaps are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    min_seconds: u64,
    max_seconds: u64,
}

impl DelayWindow {
    /// Create a validated delay window.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::InvalidDelayWindow`] when `min` is below
    /// [`GAP_FLOOR_SECONDS`] or greater than `max`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dripsend_core::DelayWindow;
    /// let window = DelayWindow::new(120, 300)?;
    /// assert_eq!(window.min_seconds(), 120);
    /// # Ok::<(), dripsend_core::SendError>(())
    /// ```
    pub const fn new(min_seconds: u64, max_seconds: u64) -> Result<Self> {
        if min_seconds < GAP_FLOOR_SECONDS || min_seconds > max_seconds {
            return Err(SendError::InvalidDelayWindow {
                min: min_seconds,
                max: max_seconds,
            });
        }

        Ok(Self {
            min_seconds,
            max_seconds,
        })
    }

    /// Minimum gap in seconds.
    #[must_use]
    pub const fn min_seconds(&self) -> u64 {
        self.min_seconds
    }

    /// Maximum gap in seconds.
    #[must_use]
    pub const fn max_seconds(&self) -> u64 {
        self.max_seconds
    }

    /// Draw one gap, uniform over the closed interval.
    ///
    /// A degenerate window (`min == max`) yields a constant gap with no
    /// random draw.
    fn draw_gap<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.min_seconds == self.max_seconds {
            return self.min_seconds;
        }

        rng.gen_range(self.min_seconds..=self.max_seconds)
    }
}

/// Cumulative send delays for one batch.
///
/// Message *i* (0-indexed) is sent `delays[i]` seconds after batch start.
/// Delays are non-decreasing; the first equals the start offset exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayPlan {
    delays: Vec<u64>,
}

impl DelayPlan {
    /// Compute the plan for `len` messages.
    ///
    /// The start offset applies as-is to the first message; no random gap is
    /// drawn for it. Every later message adds one draw from the window to the
    /// running total.
    ///
    /// The generator is passed in so callers can pace production traffic with
    /// [`rand::thread_rng`] and tests can replay a seeded [`rand::rngs::StdRng`].
    ///
    /// Accumulation saturates at `u64::MAX`, so an absurd start offset from
    /// the wire cannot overflow and reorder the plan.
    pub fn generate<R: Rng + ?Sized>(
        len: usize,
        window: DelayWindow,
        start_offset_seconds: u64,
        rng: &mut R,
    ) -> Self {
        let mut delays = Vec::with_capacity(len);
        let mut cumulative = start_offset_seconds;

        for index in 0..len {
            if index > 0 {
                cumulative = cumulative.saturating_add(window.draw_gap(rng));
            }
            delays.push(cumulative);
        }

        Self { delays }
    }

    /// Per-message cumulative delays, in batch order.
    #[must_use]
    pub fn delays(&self) -> &[u64] {
        &self.delays
    }

    /// Number of planned messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Whether the plan covers zero messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Iterate over `(index, cumulative_delay)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.delays.iter().copied().enumerate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_window_rejects_min_above_max() {
        assert_eq!(
            DelayWindow::new(300, 120),
            Err(SendError::InvalidDelayWindow { min: 300, max: 120 })
        );
    }

    #[test]
    fn test_window_rejects_zero_min() {
        assert_eq!(
            DelayWindow::new(0, 60),
            Err(SendError::InvalidDelayWindow { min: 0, max: 60 })
        );
    }

    #[test]
    fn test_degenerate_window_is_constant() {
        let window = DelayWindow::new(10, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let plan = DelayPlan::generate(3, window, 0, &mut rng);
        assert_eq!(plan.delays(), &[0, 10, 20]);
    }

    #[test]
    fn test_single_message_uses_offset_only() {
        let window = DelayWindow::new(120, 300).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let plan = DelayPlan::generate(1, window, 300, &mut rng);
        assert_eq!(plan.delays(), &[300]);
    }

    #[test]
    fn test_empty_batch_yields_empty_plan() {
        let window = DelayWindow::new(1, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let plan = DelayPlan::generate(0, window, 60, &mut rng);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_extreme_offset_saturates_without_reordering() {
        let window = DelayWindow::new(10, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let plan = DelayPlan::generate(3, window, u64::MAX - 5, &mut rng);
        assert_eq!(plan.delays(), &[u64::MAX - 5, u64::MAX, u64::MAX]);
        assert!(plan.delays().windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_offset_shifts_whole_batch() {
        let window = DelayWindow::new(10, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let plan = DelayPlan::generate(3, window, 600, &mut rng);
        assert_eq!(plan.delays(), &[600, 610, 620]);
    }

    proptest! {
        #[test]
        fn prop_delays_non_decreasing_and_anchored(
            len in 0usize..64,
            min in 1u64..500,
            span in 0u64..500,
            offset in 0u64..100_000,
            seed in any::<u64>(),
        ) {
            let window = DelayWindow::new(min, min + span).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);

            let plan = DelayPlan::generate(len, window, offset, &mut rng);
            let delays = plan.delays();

            prop_assert_eq!(delays.len(), len);
            if let Some(first) = delays.first() {
                prop_assert_eq!(*first, offset);
            }
            for pair in delays.windows(2) {
                let gap = pair[1] - pair[0];
                prop_assert!(gap >= window.min_seconds());
                prop_assert!(gap <= window.max_seconds());
            }
        }
    }
}
