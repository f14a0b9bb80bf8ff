//! Normalized person records.
//!
//! Every record serializes every key: missing scalars as `null`, missing
//! collections as `[]`.

use std::collections::BTreeMap;

use imdb_graphql::{DateComponents, EntityId, ImageVariant};
use serde::Serialize;

/// Popularity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub current_rank: u64,
    /// `UP`, `DOWN` or `FLAT`.
    pub change_direction: Option<String>,
    pub difference: Option<i64>,
}

/// Birth date and place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Birth {
    #[serde(flatten)]
    pub date: DateComponents,
    pub place: Option<String>,
}

/// Death date, place, cause and status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Death {
    #[serde(flatten)]
    pub date: DateComponents,
    pub place: Option<String>,
    pub cause: Option<String>,
    /// `ALIVE`, `DEAD` or `PRESUMED_DEAD`.
    pub status: Option<String>,
}

/// Body height, split from a display string like `6' 2" (1.88 m)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Height {
    pub imperial: String,
    /// Meters, without the unit.
    pub metric: Option<String>,
}

/// One marriage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spouse {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub from: DateComponents,
    pub to: DateComponents,
    /// Display form of the marriage period.
    pub date_text: Option<String>,
    /// Non-child attributes, e.g. `divorced`.
    pub comment: Option<String>,
    pub children: u32,
    pub current: Option<bool>,
}

/// A child, parent or other relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relative {
    /// Only set when the relative has a page of their own.
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub relation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniBio {
    pub text: Option<String>,
    pub author: Option<String>,
}

/// Salary paid for one title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub title_id: Option<EntityId>,
    pub title: Option<String>,
    pub year: Option<i64>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub comments: Vec<String>,
}

/// A book or article about the person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintBiography {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
}

/// A biographical film or episode about the person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmBiography {
    pub title: Option<String>,
    pub title_id: Option<EntityId>,
    pub year: Option<i64>,
    pub series_title: Option<String>,
    pub series_season: Option<String>,
    pub series_episode: Option<String>,
}

/// A title in which the person is portrayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portrayal {
    pub title: Option<String>,
    pub title_id: Option<EntityId>,
    pub year: Option<i64>,
}

/// Work outside film and television.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherWork {
    pub category: Option<String>,
    pub from_date: DateComponents,
    pub to_date: DateComponents,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSite {
    pub label: Option<String>,
    pub url: Option<String>,
    pub languages: Vec<String>,
}

/// External links grouped by category. Review links are never requested.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSites {
    pub official: Vec<ExternalSite>,
    pub video: Vec<ExternalSite>,
    pub photo: Vec<ExternalSite>,
    pub sound: Vec<ExternalSite>,
    /// Also receives links of unknown categories.
    pub misc: Vec<ExternalSite>,
}

impl ExternalSites {
    pub(crate) fn push(&mut self, category: Option<&str>, site: ExternalSite) {
        let bucket = match category {
            Some("official") => &mut self.official,
            Some("video") => &mut self.video,
            Some("photo") => &mut self.photo,
            Some("sound") => &mut self.sound,
            _ => &mut self.misc,
        };
        bucket.push(site);
    }
}

/// Award nomination filter. The default selects every nomination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AwardFilter {
    /// Only nominations that were won.
    pub wins_only: bool,
    /// Restrict to one event, e.g. `ev0000003` for the Academy Awards.
    pub event: Option<String>,
}

impl AwardFilter {
    /// Every nomination.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Only wins.
    #[must_use]
    pub fn wins_only(mut self) -> Self {
        self.wins_only = true;
        self
    }

    /// Only nominations at `event`. Blank ids are ignored.
    #[must_use]
    pub fn event(mut self, event: &str) -> Self {
        let event = event.trim();
        self.event = (!event.is_empty()).then(|| event.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AwardOutcome {
    Winner,
    Nominee,
}

/// A title credited on a nomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardTitle {
    pub title_id: Option<EntityId>,
    pub title_name: Option<String>,
    /// Credit note without surrounding parentheses, e.g. `screenplay`.
    pub title_note: Option<String>,
    #[serde(flatten)]
    pub image: ImageVariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardNomination {
    pub year: Option<i64>,
    pub winner: bool,
    pub category: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub titles: Vec<AwardTitle>,
    pub outcome: AwardOutcome,
}

/// Nominations of one award event, in service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardEvent {
    pub event: Option<String>,
    pub nominations: Vec<AwardNomination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AwardTotal {
    pub win: u32,
    pub nom: u32,
}

/// Nominations grouped by event, most prestigious first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Awards {
    pub events: Vec<AwardEvent>,
    pub total: AwardTotal,
}

impl Awards {
    pub(crate) fn push(&mut self, event: Option<String>, nomination: AwardNomination) {
        if nomination.winner {
            self.total.win += 1;
        } else {
            self.total.nom += 1;
        }
        match self.events.iter_mut().find(|group| group.event == event) {
            Some(group) => group.nominations.push(nomination),
            None => self.events.push(AwardEvent {
                event,
                nominations: vec![nomination],
            }),
        }
    }
}

/// A title the person is best known for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownFor {
    pub title: Option<String>,
    pub title_id: Option<EntityId>,
    pub year: Option<i64>,
    pub end_year: Option<i64>,
    pub characters: Vec<String>,
    #[serde(flatten)]
    pub image: ImageVariant,
}

/// One filmography entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub title_id: Option<EntityId>,
    pub title_name: Option<String>,
    pub title_type: Option<String>,
    pub year: Option<i64>,
    pub end_year: Option<i64>,
    /// Cast credits only.
    pub characters: Vec<String>,
    /// Crew credits only.
    pub jobs: Vec<String>,
    #[serde(flatten)]
    pub image: ImageVariant,
}

/// Credit category ids the service is known to return.
pub const CREDIT_CATEGORIES: &[&str] = &[
    "director",
    "writer",
    "actress",
    "actor",
    "producer",
    "composer",
    "cinematographer",
    "editor",
    "casting_director",
    "production_designer",
    "art_director",
    "set_decorator",
    "costume_designer",
    "make_up_department",
    "production_manager",
    "assistant_director",
    "art_department",
    "sound_department",
    "special_effects",
    "visual_effects",
    "stunts",
    "choreographer",
    "camera_department",
    "animation_department",
    "casting_department",
    "costume_department",
    "editorial_department",
    "electrical_department",
    "location_management",
    "music_department",
    "production_department",
    "script_department",
    "transportation_department",
    "miscellaneous",
    "thanks",
    "executive",
    "legal",
    "soundtrack",
    "manager",
    "assistant",
    "talent_agent",
    "self",
    "publicist",
    "music_artist",
    "podcaster",
    "archive_footage",
    "archive_sound",
    "costume_supervisor",
    "hair_stylist",
    "intimacy_coordinator",
    "make_up_artist",
    "music_supervisor",
    "property_master",
    "script_supervisor",
    "showrunner",
    "stunt_coordinator",
    "accountant",
];

/// Filmography grouped by camelCase category (`castingDirector`, `self`, ...).
///
/// Every known category is present, empty or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Credits(pub BTreeMap<String, Vec<Credit>>);

impl Default for Credits {
    fn default() -> Self {
        Self(
            CREDIT_CATEGORIES
                .iter()
                .map(|id| (category_key(id), Vec::new()))
                .collect(),
        )
    }
}

impl Credits {
    /// Credits in `category` (camelCase key); empty for unknown categories.
    #[must_use]
    pub fn category(&self, category: &str) -> &[Credit] {
        self.0.get(category).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn push(&mut self, category_id: &str, credit: Credit) {
        self.0.entry(category_key(category_id)).or_default().push(credit);
    }
}

/// `casting_director` to `castingDirector`.
#[must_use]
pub fn category_key(category_id: &str) -> String {
    let mut key = String::with_capacity(category_id.len());
    let mut upper = false;
    for ch in category_id.chars() {
        if ch == '_' {
            upper = !key.is_empty();
        } else if upper {
            key.extend(ch.to_uppercase());
            upper = false;
        } else {
            key.push(ch);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_keys_are_camel_case() {
        assert_eq!(category_key("casting_director"), "castingDirector");
        assert_eq!(category_key("self"), "self");
        assert_eq!(category_key("make_up_department"), "makeUpDepartment");
    }

    #[test]
    fn credits_seed_every_known_category() {
        let credits = Credits::default();
        assert_eq!(credits.0.len(), CREDIT_CATEGORIES.len());
        assert!(credits.category("archiveFootage").is_empty());
        assert!(credits.category("nope").is_empty());
    }

    #[test]
    fn awards_group_by_event_and_count_outcomes() {
        let nomination = |winner| AwardNomination {
            year: Some(2000),
            winner,
            category: None,
            name: None,
            notes: None,
            titles: Vec::new(),
            outcome: if winner {
                AwardOutcome::Winner
            } else {
                AwardOutcome::Nominee
            },
        };
        let mut awards = Awards::default();
        awards.push(Some("Oscar".into()), nomination(true));
        awards.push(Some("BAFTA".into()), nomination(false));
        awards.push(Some("Oscar".into()), nomination(false));

        assert_eq!(awards.events.len(), 2);
        assert_eq!(awards.events[0].event.as_deref(), Some("Oscar"));
        assert_eq!(awards.events[0].nominations.len(), 2);
        assert_eq!(awards.total, AwardTotal { win: 1, nom: 2 });
    }

    #[test]
    fn award_filter_ignores_blank_events() {
        assert_eq!(AwardFilter::all().event("  "), AwardFilter::all());
        assert_eq!(
            AwardFilter::all().wins_only().event(" ev0000003 ").event,
            Some("ev0000003".to_string())
        );
    }

    #[test]
    fn records_serialize_every_key() {
        let value = serde_json::to_value(Birth::default()).unwrap();
        assert_eq!(
            value,
            json!({"day": null, "month": null, "monthName": null, "year": null, "place": null})
        );
    }
}
