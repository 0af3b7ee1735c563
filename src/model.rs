use crate::subjects::{parse_rating_key, SubjectGroup};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// The single persisted record behind the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateRecord {
    pub student_name: String,
    pub student_section: String,
    pub student_photo: String,

    pub fav_core: String,
    pub fav_co_core: String,
    pub fav_activity: String,
    pub fav_explanation: String,

    pub challenge1: String,
    pub challenge2: String,
    pub challenge_explanation: String,

    /// `"{group}:{subject}" -> 1..=5`. Keys exist only once rated.
    pub ratings: BTreeMap<String, u8>,

    pub img_core: String,
    pub img_co_core: String,

    pub comments: String,
}

/// Editable text and select fields. Ratings and images have their own events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StudentName,
    StudentSection,
    FavCore,
    FavCoCore,
    FavActivity,
    FavExplanation,
    Challenge1,
    Challenge2,
    ChallengeExplanation,
    Comments,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::StudentName,
        Field::StudentSection,
        Field::FavCore,
        Field::FavCoCore,
        Field::FavActivity,
        Field::FavExplanation,
        Field::Challenge1,
        Field::Challenge2,
        Field::ChallengeExplanation,
        Field::Comments,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == s)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::StudentName => "studentName",
            Self::StudentSection => "studentSection",
            Self::FavCore => "favCore",
            Self::FavCoCore => "favCoCore",
            Self::FavActivity => "favActivity",
            Self::FavExplanation => "favExplanation",
            Self::Challenge1 => "challenge1",
            Self::Challenge2 => "challenge2",
            Self::ChallengeExplanation => "challengeExplanation",
            Self::Comments => "comments",
        }
    }

    /// Select fields only take a member of their subject set (or empty).
    pub fn choices(self) -> Option<SubjectGroup> {
        match self {
            Self::FavCore | Self::Challenge1 | Self::Challenge2 => Some(SubjectGroup::Core),
            Self::FavCoCore => Some(SubjectGroup::CoCore),
            _ => None,
        }
    }

    pub fn accepts(self, value: &str) -> bool {
        match self.choices() {
            Some(group) => value.is_empty() || group.contains(value),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    StudentPhoto,
    Core,
    CoCore,
}

impl ImageSlot {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "studentPhoto" => Some(Self::StudentPhoto),
            "imgCore" => Some(Self::Core),
            "imgCoCore" => Some(Self::CoCore),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::StudentPhoto => "studentPhoto",
            Self::Core => "imgCore",
            Self::CoCore => "imgCoCore",
        }
    }
}

impl StateRecord {
    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::StudentName => &mut self.student_name,
            Field::StudentSection => &mut self.student_section,
            Field::FavCore => &mut self.fav_core,
            Field::FavCoCore => &mut self.fav_co_core,
            Field::FavActivity => &mut self.fav_activity,
            Field::FavExplanation => &mut self.fav_explanation,
            Field::Challenge1 => &mut self.challenge1,
            Field::Challenge2 => &mut self.challenge2,
            Field::ChallengeExplanation => &mut self.challenge_explanation,
            Field::Comments => &mut self.comments,
        }
    }

    pub fn image_mut(&mut self, slot: ImageSlot) -> &mut String {
        match slot {
            ImageSlot::StudentPhoto => &mut self.student_photo,
            ImageSlot::Core => &mut self.img_core,
            ImageSlot::CoCore => &mut self.img_co_core,
        }
    }

    pub fn rating(&self, key: &str) -> Option<u8> {
        self.ratings.get(key).copied()
    }

    /// Builds a record from an arbitrary JSON object by overlaying every
    /// recognised field onto the defaults. Values of the wrong shape keep the
    /// default, so records written by older or newer builds still load.
    pub fn merged_over_defaults(incoming: &Value) -> Self {
        let mut out = Self::default();
        let Some(obj) = incoming.as_object() else {
            return out;
        };

        for field in Field::ALL {
            if let Some(s) = obj.get(field.name()).and_then(|v| v.as_str()) {
                if field.accepts(s) {
                    *out.field_mut(field) = s.to_string();
                } else {
                    warn!(field = field.name(), value = %s, "dropping value outside the subject list");
                }
            }
        }
        for slot in [ImageSlot::StudentPhoto, ImageSlot::Core, ImageSlot::CoCore] {
            if let Some(s) = obj.get(slot.name()).and_then(|v| v.as_str()) {
                *out.image_mut(slot) = s.to_string();
            }
        }

        if let Some(ratings) = obj.get("ratings").and_then(|v| v.as_object()) {
            for (key, v) in ratings {
                if parse_rating_key(key).is_none() {
                    warn!(key = %key, "dropping rating for unknown subject");
                    continue;
                }
                match v.as_u64() {
                    Some(n) if (RATING_MIN as u64..=RATING_MAX as u64).contains(&n) => {
                        out.ratings.insert(key.clone(), n as u8);
                    }
                    _ => warn!(key = %key, value = %v, "dropping out-of-range rating"),
                }
            }
        }

        out.enforce_distinct_challenges(Field::Challenge1);
        out
    }

    /// Clears the challenge that was not just written when both hold the
    /// same subject. `kept` is the field whose value wins.
    pub fn enforce_distinct_challenges(&mut self, kept: Field) {
        if self.challenge1.is_empty() || self.challenge1 != self.challenge2 {
            return;
        }
        match kept {
            Field::Challenge2 => self.challenge1.clear(),
            _ => self.challenge2.clear(),
        }
    }
}
