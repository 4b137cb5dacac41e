//! Core record types decoded from the SuperHero API.
//!
//! A [`Hero`] is immutable once fetched: nothing in the application mutates
//! a record after it leaves the fetch boundary. Descriptive sub-records
//! (`appearance`, `biography`, `work`, `connections`) may be partially or
//! entirely absent in the remote payload, so every field defaults and the
//! display helpers substitute placeholders.

use serde::{Deserialize, Serialize};

/// Fallback image for card thumbnails when neither `sm` nor `xs` is set.
pub const THUMB_PLACEHOLDER: &str = "https://via.placeholder.com/150?text=NO+IMAGE";

/// Fallback image for the dossier portrait when neither `md` nor `sm` is set.
pub const PORTRAIT_PLACEHOLDER: &str = "https://via.placeholder.com/400x600?text=NO+IMAGE";

/// A single directory entry as served by the remote API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hero {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub powerstats: Powerstats,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub biography: Biography,
    #[serde(default)]
    pub work: Work,
    #[serde(default)]
    pub connections: Connections,
    #[serde(default)]
    pub images: Images,
}

/// The six named attributes, each nominally in `0..=100`. The remote
/// data carries explicit `null` for unknown values; those decode as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Powerstats {
    #[serde(deserialize_with = "int_or_zero")]
    pub intelligence: i64,
    #[serde(deserialize_with = "int_or_zero")]
    pub strength: i64,
    #[serde(deserialize_with = "int_or_zero")]
    pub speed: i64,
    #[serde(deserialize_with = "int_or_zero")]
    pub durability: i64,
    #[serde(deserialize_with = "int_or_zero")]
    pub power: i64,
    #[serde(deserialize_with = "int_or_zero")]
    pub combat: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Appearance {
    pub gender: Option<String>,
    pub race: Option<String>,
    pub height: Vec<String>,
    pub weight: Vec<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Biography {
    /// Civilian identity; the secondary search key for watchlist matches.
    pub full_name: Option<String>,
    pub alter_egos: Option<String>,
    pub aliases: Vec<String>,
    pub place_of_birth: Option<String>,
    pub first_appearance: Option<String>,
    pub publisher: Option<String>,
    /// Open string set ("good", "bad", ...); display-only. `null`
    /// decodes as empty.
    #[serde(deserialize_with = "string_or_empty")]
    pub alignment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Work {
    pub occupation: Option<String>,
    pub base: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Connections {
    pub group_affiliation: Option<String>,
    pub relatives: Option<String>,
}

/// Image URLs by size tag. Any of them may be missing or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Images {
    pub xs: Option<String>,
    pub sm: Option<String>,
    pub md: Option<String>,
    pub lg: Option<String>,
}

impl Powerstats {
    /// All attributes paired with their display labels, in ranking order.
    pub fn as_pairs(&self) -> [(&'static str, i64); 6] {
        [
            ("Intelligence", self.intelligence),
            ("Strength", self.strength),
            ("Speed", self.speed),
            ("Durability", self.durability),
            ("Power", self.power),
            ("Combat", self.combat),
        ]
    }

    /// Label of the strongest attribute. Ties keep the earlier attribute
    /// in the fixed order intelligence, strength, speed, durability,
    /// power, combat.
    pub fn main_power(&self) -> &'static str {
        let pairs = self.as_pairs();
        let mut best = pairs[0];
        for pair in &pairs[1..] {
            if pair.1 > best.1 {
                best = *pair;
            }
        }
        best.0
    }
}

impl Hero {
    /// Civilian identity, if the record carries a non-empty one.
    pub fn secret_identity(&self) -> Option<&str> {
        self.biography
            .full_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Card thumbnail URL: `sm`, then `xs`, then the placeholder.
    pub fn thumb_url(&self) -> &str {
        non_empty(&self.images.sm)
            .or_else(|| non_empty(&self.images.xs))
            .unwrap_or(THUMB_PLACEHOLDER)
    }

    /// Dossier portrait URL: `md`, then `sm`, then the placeholder.
    pub fn portrait_url(&self) -> &str {
        non_empty(&self.images.md)
            .or_else(|| non_empty(&self.images.sm))
            .unwrap_or(PORTRAIT_PLACEHOLDER)
    }

    /// Alignment badge text: the alignment uppercased, or `NEUTRAL` when
    /// the record carries none.
    pub fn alignment_badge(&self) -> String {
        if self.biography.alignment.is_empty() {
            "NEUTRAL".to_string()
        } else {
            self.biography.alignment.to_uppercase()
        }
    }
}

fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.is_empty())
}

fn int_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
