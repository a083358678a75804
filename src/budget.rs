// src/budget.rs

//! Token budget shared by the extractors of one run.
//!
//! A [`TokenBudget`] is a single pool of spendable tokens. In pooled mode each
//! category adds its share of the total cap when it starts, so whatever an
//! earlier category leaves unspent carries over to the next one. In flat mode
//! the pool is funded once up front and per-category funding is ignored.

use crate::constants::{DEFAULT_CHAPTER_RATIO, DEFAULT_MAX_TOKENS};
use crate::scoring::FileCategory;
use log::debug;
use std::collections::BTreeMap;

/// Total cap plus the share of it each category contributes to the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenLimits {
    /// Upper bound the ratios are applied to.
    pub max_total: usize,
    /// Fraction of `max_total` added when a category is funded.
    /// Categories without an entry contribute nothing.
    pub ratios: BTreeMap<FileCategory, f64>,
}

impl TokenLimits {
    /// Limits with the default ratios applied to `max_total`.
    pub fn with_max_total(max_total: usize) -> Self {
        Self {
            max_total,
            ..Self::default()
        }
    }

    /// Configured ratio for `category`, or `0.0`.
    pub fn ratio(&self, category: FileCategory) -> f64 {
        self.ratios.get(&category).copied().unwrap_or(0.0)
    }

    /// Tokens `category` adds to the pool: `floor(ratio * max_total)`.
    ///
    /// ```
    /// use sential::budget::TokenLimits;
    /// use sential::scoring::FileCategory;
    ///
    /// let limits = TokenLimits::default();
    /// assert_eq!(limits.allocation(FileCategory::Context), 20_000);
    /// assert_eq!(limits.allocation(FileCategory::Source), 80_000);
    /// assert_eq!(limits.allocation(FileCategory::Unknown), 0);
    /// ```
    pub fn allocation(&self, category: FileCategory) -> usize {
        floor_share(self.max_total, self.ratio(category))
    }
}

impl Default for TokenLimits {
    fn default() -> Self {
        let ratios = BTreeMap::from([
            (FileCategory::Context, 0.10),
            (FileCategory::Manifest, 0.05),
            (FileCategory::Signal, 0.05),
            (FileCategory::Source, 0.40),
        ]);
        Self {
            max_total: DEFAULT_MAX_TOKENS,
            ratios,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pooled,
    Flat,
}

/// Remaining spendable tokens for one run.
///
/// ```
/// use sential::budget::{TokenBudget, TokenLimits};
/// use sential::scoring::FileCategory;
///
/// let mut limits = TokenLimits::with_max_total(1_000);
/// limits.ratios.insert(FileCategory::Context, 0.5);
/// let mut budget = TokenBudget::pooled(&limits);
///
/// budget.fund(FileCategory::Context);
/// assert!(budget.try_spend(300));
/// assert!(!budget.try_spend(300));
/// assert_eq!(budget.remaining(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct TokenBudget {
    limits: TokenLimits,
    mode: Mode,
    pool: usize,
    spent: usize,
}

impl TokenBudget {
    /// An empty pool that grows as categories are funded.
    pub fn pooled(limits: &TokenLimits) -> Self {
        Self {
            limits: limits.clone(),
            mode: Mode::Pooled,
            pool: 0,
            spent: 0,
        }
    }

    /// A pool funded once with `floor(ratio * max_total)` tokens.
    ///
    /// [`fund`](Self::fund) has no effect on a flat budget.
    pub fn flat(max_total: usize, ratio: f64) -> Self {
        Self {
            limits: TokenLimits {
                max_total,
                ratios: BTreeMap::new(),
            },
            mode: Mode::Flat,
            pool: floor_share(max_total, ratio),
            spent: 0,
        }
    }

    /// A flat budget with the default chapter share of `max_total`.
    pub fn chapter(max_total: usize) -> Self {
        Self::flat(max_total, DEFAULT_CHAPTER_RATIO)
    }

    /// Adds `category`'s allocation to the pool and returns the amount added.
    ///
    /// Callers fund each category once, before spending against it.
    pub fn fund(&mut self, category: FileCategory) -> usize {
        if self.mode == Mode::Flat {
            return 0;
        }
        let amount = self.limits.allocation(category);
        self.pool = self.pool.saturating_add(amount);
        debug!(
            "Funded {} with {} tokens (pool now {}).",
            category, amount, self.pool
        );
        amount
    }

    /// Spends `cost` tokens if the pool can afford all of them.
    ///
    /// Returns `false` without touching the pool otherwise.
    pub fn try_spend(&mut self, cost: usize) -> bool {
        if cost > self.pool {
            return false;
        }
        self.pool -= cost;
        self.spent += cost;
        true
    }

    /// Tokens still available.
    pub fn remaining(&self) -> usize {
        self.pool
    }

    /// Tokens spent since creation.
    pub fn spent(&self) -> usize {
        self.spent
    }

    /// Whether this budget ignores per-category funding.
    pub fn is_flat(&self) -> bool {
        self.mode == Mode::Flat
    }
}

fn floor_share(total: usize, ratio: f64) -> usize {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    (total as f64 * ratio).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pool_starts_empty() {
        let budget = TokenBudget::pooled(&TokenLimits::default());
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.spent(), 0);
    }

    #[test]
    fn test_default_allocations() {
        let limits = TokenLimits::default();
        assert_eq!(limits.max_total, 200_000);
        assert_eq!(limits.allocation(FileCategory::Context), 20_000);
        assert_eq!(limits.allocation(FileCategory::Manifest), 10_000);
        assert_eq!(limits.allocation(FileCategory::Signal), 10_000);
        assert_eq!(limits.allocation(FileCategory::Source), 80_000);
    }

    #[test]
    fn test_allocation_is_floored() {
        let limits = TokenLimits::with_max_total(15);
        // 0.1 * 15 = 1.5
        assert_eq!(limits.allocation(FileCategory::Context), 1);
    }

    #[test]
    fn test_failed_spend_leaves_pool_untouched() {
        let mut budget = TokenBudget::flat(100, 1.0);
        assert!(!budget.try_spend(101));
        assert_eq!(budget.remaining(), 100);
        assert!(budget.try_spend(100));
        assert_eq!(budget.remaining(), 0);
        assert!(budget.try_spend(0));
    }

    #[test]
    fn test_surplus_carries_over_to_next_category() {
        let mut limits = TokenLimits::with_max_total(1_000);
        limits.ratios = BTreeMap::from([(FileCategory::Context, 0.1), (FileCategory::Manifest, 0.1)]);
        let mut budget = TokenBudget::pooled(&limits);

        budget.fund(FileCategory::Context);
        assert!(budget.try_spend(40));

        budget.fund(FileCategory::Manifest);
        // 60 left over from Context plus 100 from Manifest.
        assert!(budget.try_spend(160));
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.spent(), 200);
    }

    #[test]
    fn test_unconfigured_category_adds_nothing() {
        let mut budget = TokenBudget::pooled(&TokenLimits::default());
        assert_eq!(budget.fund(FileCategory::Unknown), 0);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_flat_budget_ignores_fund() {
        let mut budget = TokenBudget::chapter(1_000);
        assert!(budget.is_flat());
        assert_eq!(budget.remaining(), 600);
        assert_eq!(budget.fund(FileCategory::Source), 0);
        assert_eq!(budget.remaining(), 600);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Fund(FileCategory),
        Spend(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop_oneof![
                Just(FileCategory::Context),
                Just(FileCategory::Manifest),
                Just(FileCategory::Signal),
                Just(FileCategory::Source),
                Just(FileCategory::Unknown),
            ]
            .prop_map(Op::Fund),
            (0usize..50_000).prop_map(Op::Spend),
        ]
    }

    proptest! {
        #[test]
        fn prop_spend_never_overdraws(ops in proptest::collection::vec(op_strategy(), 0..64)) {
            let mut budget = TokenBudget::pooled(&TokenLimits::default());
            for op in ops {
                match op {
                    Op::Fund(category) => {
                        let before = budget.remaining();
                        let added = budget.fund(category);
                        prop_assert_eq!(budget.remaining(), before + added);
                    }
                    Op::Spend(cost) => {
                        let before = budget.remaining();
                        if budget.try_spend(cost) {
                            prop_assert!(cost <= before);
                            prop_assert_eq!(budget.remaining(), before - cost);
                        } else {
                            prop_assert!(cost > before);
                            prop_assert_eq!(budget.remaining(), before);
                        }
                    }
                }
            }
        }
    }
}
