use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;

/// Reward tier of a capsule. Serialized with the display strings used by
/// the stored pool ("ULTRA RARE", ...).
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Rarity {
    #[serde(rename = "DIGITAL")]
    Digital,
    #[serde(rename = "RARE")]
    Rare,
    #[serde(rename = "SUPER RARE")]
    SuperRare,
    #[serde(rename = "ULTRA RARE")]
    UltraRare,
}

impl Rarity {
    /// Total order used to pick the headline reward of a multi-pull.
    pub fn rank(self) -> u8 {
        match self {
            Rarity::Digital => 1,
            Rarity::Rare => 2,
            Rarity::SuperRare => 3,
            Rarity::UltraRare => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Digital => "DIGITAL",
            Rarity::Rare => "RARE",
            Rarity::SuperRare => "SUPER RARE",
            Rarity::UltraRare => "ULTRA RARE",
        }
    }

    /// Prefix of generated ticket ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Rarity::Digital => "D",
            Rarity::Rare => "R",
            Rarity::SuperRare => "SR",
            Rarity::UltraRare => "UR",
        }
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum PrizeType {
    #[serde(rename = "DIGITAL")]
    Digital,
    #[serde(rename = "PHYSICAL")]
    Physical,
}

impl PrizeType {
    /// Everything above DIGITAL ships as a physical item.
    pub fn for_rarity(rarity: Rarity) -> Self {
        match rarity {
            Rarity::Digital => PrizeType::Digital,
            _ => PrizeType::Physical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrizeType::Digital => "DIGITAL",
            PrizeType::Physical => "PHYSICAL",
        }
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum WinStatus {
    #[serde(rename = "Reserved")]
    Reserved,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl WinStatus {
    /// Digital rewards are delivered on the spot, physical ones wait for shipping.
    pub fn for_type(prize_type: PrizeType) -> Self {
        match prize_type {
            PrizeType::Digital => WinStatus::Delivered,
            PrizeType::Physical => WinStatus::Reserved,
        }
    }
}

/// One ticket in the prize pool.
#[cw_serde]
pub struct PoolItem {
    pub id: String,
    pub rarity: Rarity,
    pub title: String,
    pub subtitle: String,
}

/// Sponsor-facing declaration of a prize type. Not linked to the pool.
#[cw_serde]
pub struct ManifestItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub prize_type: PrizeType,
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cw_serde]
#[serde(rename_all = "camelCase")]
pub struct EventHero {
    pub title_top: String,
    pub title_bottom: String,
    pub partner: String,
}

#[cw_serde]
#[serde(rename_all = "camelCase")]
pub struct EventPricing {
    /// Price of a single capsule.
    pub price: Decimal,
    /// Upper bound of the pull amount selector. Not tracked across pulls.
    pub max_per_user: u32,
}

#[cw_serde]
pub struct EventInventory {
    pub total: u32,
    pub remaining: u32,
}

#[cw_serde]
#[serde(rename_all = "camelCase")]
pub struct EventRules {
    pub shipping_note: String,
    pub fairness: String,
}

/// The single active promotional drop.
#[cw_serde]
pub struct DropEvent {
    pub id: String,
    pub name: String,
    pub hero: EventHero,
    pub pricing: EventPricing,
    pub inventory: EventInventory,
    /// CSS color, e.g. `#F5A3C7`.
    pub accent: String,
    pub rules: EventRules,
}

impl DropEvent {
    /// Check the fields the admin editor requires before a save.
    ///
    /// Returns the first offending field as a human readable reason.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.hero.title_top.trim().is_empty() {
            return Err("hero.titleTop must not be empty".to_string());
        }
        if self.hero.title_bottom.trim().is_empty() {
            return Err("hero.titleBottom must not be empty".to_string());
        }
        if self.pricing.price.is_zero() {
            return Err("pricing.price must be positive".to_string());
        }
        if self.pricing.max_per_user == 0 {
            return Err("pricing.maxPerUser must be positive".to_string());
        }
        if self.inventory.total == 0 {
            return Err("inventory.total must be positive".to_string());
        }
        if self.inventory.remaining > self.inventory.total {
            return Err(format!(
                "inventory.remaining {} exceeds inventory.total {}",
                self.inventory.remaining, self.inventory.total
            ));
        }
        Ok(())
    }
}

/// Compiled-in drop used until an admin saves an override.
pub fn current_event() -> DropEvent {
    DropEvent {
        id: "pastel-goddess-drop".to_string(),
        name: "PASTEL GODDESS DROP".to_string(),
        hero: EventHero {
            title_top: "ANIME VAULT CAPSULE".to_string(),
            title_bottom: "FEATURED GODDESS DROP".to_string(),
            partner: "Hosted with Creator / Brand".to_string(),
        },
        pricing: EventPricing {
            // 4.99
            price: Decimal::permille(4_990),
            max_per_user: 20,
        },
        inventory: EventInventory {
            total: 500,
            remaining: 214,
        },
        accent: "#F5A3C7".to_string(),
        rules: EventRules {
            shipping_note: "Physical prizes ship after the event ends".to_string(),
            fairness: "Fixed inventory · Fair capsule rules · Pull limits apply".to_string(),
        },
    }
}

/// A static past drop shown on the sponsor wall next to real archive entries.
#[cw_serde]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseDrop {
    pub id: String,
    pub name: String,
    pub partner: String,
    pub accent: String,
    pub sold_out: bool,
    pub date_label: String,
    pub capsule_count: u32,
    pub highlight: String,
}

pub fn sponsor_wall() -> Vec<ShowcaseDrop> {
    [
        ("drop-001", "Moonlight Idol Drop", "Sponsored by Anime Partner", "#F5A3C7", "Nov 2025", 500, "Ultra rares sealed · Vault Verified"),
        ("drop-002", "Neon Shrine Collab", "Sponsored by Streamer Partner", "#7C4DFF", "Oct 2025", 320, "Limited physical slabs · Tracked fulfillment"),
        ("drop-003", "Cosmic Waifu Festival", "Sponsored by Studio Partner", "#00D4FF", "Sep 2025", 800, "High demand · Sold out fast"),
        ("drop-004", "Midnight Arcana Drop", "Sponsored by Brand Partner", "#FFB020", "Aug 2025", 250, "Premium rarity curve · No rerolls"),
        ("drop-005", "Tokyo Afterglow", "Sponsored by Creator Partner", "#2DE37A", "Jul 2025", 400, "Manifest-backed pool · Fairness caps"),
        ("drop-006", "Cherry Blossom Nights", "Sponsored by Community Partner", "#FF4DA6", "Jun 2025", 600, "High engagement · Strong conversion"),
    ]
    .into_iter()
    .map(
        |(id, name, partner, accent, date_label, capsule_count, highlight)| ShowcaseDrop {
            id: id.to_string(),
            name: name.to_string(),
            partner: partner.to_string(),
            accent: accent.to_string(),
            sold_out: true,
            date_label: date_label.to_string(),
            capsule_count,
            highlight: highlight.to_string(),
        },
    )
    .collect()
}
