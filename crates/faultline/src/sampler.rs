// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::OnceCell;
use std::fmt::Debug;

/// Exclusive upper bound of a draw.
pub const DRAW_RANGE: u8 = 100;

/// Source of the random draw used to sample fault percentages.
///
/// The default source is a non-cryptographic RNG, which is all sampling needs. With the
/// `test-util` feature, deterministic sources can be plugged in so that tests of code
/// embedding the injector do not depend on chance.
///
/// The set of sources depends on enabled features, so matches need a wildcard arm:
///
/// ```compile_fail
/// # use faultline::Draw;
/// fn describe(draw: &Draw) -> &'static str {
///     match draw {
///         Draw::Random => "random",
///     }
/// }
/// ```
#[derive(Clone, Default)]
#[non_exhaustive]
pub enum Draw {
    /// Draws uniformly from `[0, 100)`.
    #[default]
    Random,

    /// Draws from a user-provided function. Values are clamped into `[0, 100)`.
    #[cfg(any(feature = "test-util", test))]
    Test(std::sync::Arc<dyn Fn() -> u8 + Send + Sync>),
}

impl Debug for Draw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            #[cfg(any(feature = "test-util", test))]
            Self::Test(_) => write!(f, "Test"),
        }
    }
}

impl Draw {
    /// Creates a source that always draws `value`.
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn fixed(value: u8) -> Self {
        Self::Test(std::sync::Arc::new(move || value))
    }

    /// Creates a source that draws from `f`.
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> u8 + Send + Sync + 'static,
    {
        Self::Test(std::sync::Arc::new(f))
    }

    /// Starts a new sampler for a single decision.
    #[must_use]
    pub fn sampler(&self) -> Sampler<'_> {
        Sampler {
            draw: self,
            value: OnceCell::new(),
        }
    }

    fn next(&self) -> u8 {
        match self {
            Self::Random => fastrand::u8(..DRAW_RANGE),
            #[cfg(any(feature = "test-util", test))]
            Self::Test(generator) => generator().min(DRAW_RANGE - 1),
        }
    }
}

/// Percentage sampler scoped to one decision.
///
/// The first call to [`sample`][Sampler::sample] takes a draw; every later check reuses it.
/// The delay and abort checks of a decision therefore consult the same value: a directive
/// with `D=50;F=50` either delays and aborts, or does neither.
///
/// # Examples
///
/// ```
/// let draw = faultline::Draw::default();
/// let sampler = draw.sampler();
///
/// assert!(sampler.selected(100));
/// assert!(!sampler.selected(0));
/// assert_eq!(sampler.sample(), sampler.sample());
/// ```
#[derive(Debug)]
pub struct Sampler<'a> {
    draw: &'a Draw,
    value: OnceCell<u8>,
}

impl Sampler<'_> {
    /// Returns the draw of this sampler, a value in `[0, 100)`.
    #[must_use]
    pub fn sample(&self) -> u8 {
        *self.value.get_or_init(|| self.draw.next())
    }

    /// Returns `true` when the draw falls below `percentage`.
    #[must_use]
    pub fn selected(&self, percentage: u8) -> bool {
        self.sample() < percentage
    }
}
