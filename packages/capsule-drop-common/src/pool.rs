use cosmwasm_schema::cw_serde;

use crate::entropy::shuffle;
use crate::types::{PoolItem, Rarity};

const PHYSICAL_SUBTITLE: &str = "Reserved for you · Ships after event ends";
const DIGITAL_SUBTITLE: &str = "Added to your collection instantly";

/// Largest total a single generation accepts.
pub const MAX_POOL_TOTAL: i64 = 100_000;

/// Number of tickets per rarity tier.
#[cw_serde]
#[derive(Default, Eq)]
pub struct PoolComposition {
    pub ultra_rare: u64,
    pub super_rare: u64,
    pub rare: u64,
    pub digital: u64,
}

impl PoolComposition {
    /// Fixed rarity curve for a requested total.
    ///
    /// ultra ≈ 0.6% (min 1), super ≈ 3% (min 2), rare ≈ 10% (min 10),
    /// digital takes whatever is left and never goes negative. The minimums
    /// win over the total, so totals below 13 still yield 13 tickets.
    pub fn for_total(total: i64) -> Self {
        let ultra_rare = total.saturating_mul(6).div_euclid(1000).max(1);
        let super_rare = total.saturating_mul(3).div_euclid(100).max(2);
        let rare = total.div_euclid(10).max(10);
        let digital = total
            .saturating_sub(ultra_rare + super_rare + rare)
            .max(0);

        PoolComposition {
            ultra_rare: ultra_rare as u64,
            super_rare: super_rare as u64,
            rare: rare as u64,
            digital: digital as u64,
        }
    }

    /// Count what is actually sitting in a pool.
    pub fn of(items: &[PoolItem]) -> Self {
        items
            .iter()
            .fold(PoolComposition::default(), |mut acc, item| {
                match item.rarity {
                    Rarity::UltraRare => acc.ultra_rare += 1,
                    Rarity::SuperRare => acc.super_rare += 1,
                    Rarity::Rare => acc.rare += 1,
                    Rarity::Digital => acc.digital += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> u64 {
        self.ultra_rare + self.super_rare + self.rare + self.digital
    }

    pub fn count(&self, rarity: Rarity) -> u64 {
        match rarity {
            Rarity::UltraRare => self.ultra_rare,
            Rarity::SuperRare => self.super_rare,
            Rarity::Rare => self.rare,
            Rarity::Digital => self.digital,
        }
    }
}

fn ticket_copy(rarity: Rarity) -> (&'static str, &'static str) {
    match rarity {
        Rarity::UltraRare => ("Exclusive Figure Variant", PHYSICAL_SUBTITLE),
        Rarity::SuperRare => ("Premium Merch Bundle", PHYSICAL_SUBTITLE),
        Rarity::Rare => ("Poster + Collectible Pack", PHYSICAL_SUBTITLE),
        Rarity::Digital => ("Digital Capsule Reward", DIGITAL_SUBTITLE),
    }
}

/// Build a shuffled pool for `total` tickets.
///
/// Ids are `{prefix}-{index}-{created_at_ms}`; they are only unique per
/// generation timestamp. Totals above [`MAX_POOL_TOTAL`] are capped.
pub fn generate_pool(total: i64, created_at_ms: u64, seed: &[u8; 32]) -> Vec<PoolItem> {
    let composition = PoolComposition::for_total(total.min(MAX_POOL_TOTAL));
    let mut pool = Vec::with_capacity(composition.total() as usize);

    for rarity in [
        Rarity::UltraRare,
        Rarity::SuperRare,
        Rarity::Rare,
        Rarity::Digital,
    ] {
        let (title, subtitle) = ticket_copy(rarity);
        for i in 0..composition.count(rarity) {
            pool.push(PoolItem {
                id: format!("{}-{}-{}", rarity.id_prefix(), i, created_at_ms),
                rarity,
                title: title.to_string(),
                subtitle: subtitle.to_string(),
            });
        }
    }

    shuffle(&mut pool, seed);
    pool
}

/// Position of the highest-rarity item; the earliest one wins a tie.
pub fn best_index(items: &[PoolItem]) -> Option<usize> {
    items
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, u8)>, (index, item)| {
            let rank = item.rarity.rank();
            match best {
                Some((_, best_rank)) if rank <= best_rank => best,
                _ => Some((index, rank)),
            }
        })
        .map(|(index, _)| index)
}

/// Highest-rarity item; the earliest one wins a tie.
pub fn best_of(items: &[PoolItem]) -> Option<&PoolItem> {
    best_index(items).map(|index| &items[index])
}
