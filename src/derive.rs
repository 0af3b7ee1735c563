//! Derived text and numbers recomputed from the record after every edit.
//!
//! Everything here is a pure function of `&StateRecord`; callers recompute
//! instead of caching.

use crate::model::{StateRecord, RATING_MAX};
use crate::subjects::{rating_key, SubjectGroup};
use serde::Serialize;

pub const AVERAGE_PLACEHOLDER: &str = "Average: —";
pub const ELLIPSIS: &str = "…";

/// Half-up rounding to one decimal: `floor(10*x + 0.5) / 10`.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// Mean of the rated subjects in `group`, rounded to one decimal. `None` when
/// nothing in the group is rated.
pub fn group_average(record: &StateRecord, group: SubjectGroup) -> Option<f64> {
    let vals: Vec<u8> = group
        .subjects()
        .iter()
        .filter_map(|s| record.rating(&rating_key(group, s)))
        .filter(|n| *n > 0)
        .collect();
    if vals.is_empty() {
        return None;
    }
    let sum: u32 = vals.iter().map(|n| *n as u32).sum();
    Some(round_off_1_decimal(sum as f64 / vals.len() as f64))
}

pub fn average_text(record: &StateRecord, group: SubjectGroup) -> String {
    match group_average(record, group) {
        Some(avg) => format!("Average: {:.1}", avg),
        None => AVERAGE_PLACEHOLDER.to_string(),
    }
}

pub fn favorite_sentence(record: &StateRecord) -> String {
    let mut out = format!("My favorite subject is {}", or_ellipsis(&record.fav_core));
    if !record.fav_co_core.is_empty() {
        out.push_str(", and my favorite co-core subject is ");
        out.push_str(&record.fav_co_core);
    }
    if !record.fav_activity.is_empty() {
        out.push_str(", and my favorite activity is ");
        out.push_str(&record.fav_activity);
    }
    out.push('.');
    out
}

pub fn challenge_sentence(record: &StateRecord) -> String {
    let mut out = format!(
        "One of the most challenging subject is {}",
        or_ellipsis(&record.challenge1)
    );
    if !record.challenge2.is_empty() {
        out.push_str(" and another challenging subject is ");
        out.push_str(&record.challenge2);
    }
    out.push('.');
    out
}

pub fn presenter_name(record: &StateRecord) -> String {
    let name = record.student_name.trim();
    let section = record.student_section.trim();
    match (name.is_empty(), section.is_empty()) {
        (false, false) => format!("Presenter: {} • {}", name, section),
        (false, true) => format!("Presenter: {}", name),
        (true, false) => format!("Student-Led Conference • {}", section),
        (true, true) => "Student-Led Conference".to_string(),
    }
}

/// `"⭐"` repeated per star, or `"—"` when unrated.
pub fn stars_text(record: &StateRecord, group: SubjectGroup, subject: &str) -> String {
    match record.rating(&rating_key(group, subject)) {
        Some(n) if n > 0 => "⭐".repeat(n as usize),
        _ => "—".to_string(),
    }
}

/// On/off state of the five star positions for a rating.
pub fn star_bar(rating: Option<u8>) -> [bool; RATING_MAX as usize] {
    let current = rating.unwrap_or(0);
    let mut bar = [false; RATING_MAX as usize];
    for (i, on) in bar.iter_mut().enumerate() {
        *on = (i as u8) < current;
    }
    bar
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRow {
    pub subject: &'static str,
    pub key: String,
    pub rating: Option<u8>,
    pub stars: [bool; RATING_MAX as usize],
}

pub fn star_rows(record: &StateRecord, group: SubjectGroup) -> Vec<StarRow> {
    group
        .subjects()
        .iter()
        .map(|s| {
            let key = rating_key(group, s);
            let rating = record.rating(&key);
            StarRow {
                subject: *s,
                key,
                rating,
                stars: star_bar(rating),
            }
        })
        .collect()
}

/// Options hidden and disabled in each challenge dropdown because the other
/// dropdown already holds them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOptions {
    pub challenge1_blocked: Option<String>,
    pub challenge2_blocked: Option<String>,
}

pub fn challenge_options(record: &StateRecord) -> ChallengeOptions {
    let blocked = |v: &str| (!v.is_empty()).then(|| v.to_string());
    ChallengeOptions {
        challenge1_blocked: blocked(&record.challenge2),
        challenge2_blocked: blocked(&record.challenge1),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub favorite_sentence: String,
    pub challenge_sentence: String,
    pub average_core: String,
    pub average_co_core: String,
    pub presenter_name: String,
    pub challenge_options: ChallengeOptions,
    pub core_stars: Vec<StarRow>,
    pub co_core_stars: Vec<StarRow>,
}

impl ViewModel {
    pub fn build(record: &StateRecord) -> Self {
        Self {
            favorite_sentence: favorite_sentence(record),
            challenge_sentence: challenge_sentence(record),
            average_core: average_text(record, SubjectGroup::Core),
            average_co_core: average_text(record, SubjectGroup::CoCore),
            presenter_name: presenter_name(record),
            challenge_options: challenge_options(record),
            core_stars: star_rows(record, SubjectGroup::Core),
            co_core_stars: star_rows(record, SubjectGroup::CoCore),
        }
    }
}

fn or_ellipsis(s: &str) -> &str {
    if s.is_empty() {
        ELLIPSIS
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(pairs: &[(&str, u8)]) -> StateRecord {
        let mut rec = StateRecord::default();
        for (k, v) in pairs {
            rec.ratings.insert(k.to_string(), *v);
        }
        rec
    }

    #[test]
    fn round_off_is_half_up() {
        assert_eq!(round_off_1_decimal(2.25), 2.3);
        assert_eq!(round_off_1_decimal(2.75), 2.8);
        assert_eq!(round_off_1_decimal(3.54), 3.5);
        assert_eq!(round_off_1_decimal(4.0), 4.0);
    }

    #[test]
    fn average_placeholder_when_group_unrated() {
        let rec = rated(&[("core:Math", 5)]);
        assert_eq!(average_text(&rec, SubjectGroup::CoCore), "Average: —");
        assert_eq!(group_average(&rec, SubjectGroup::CoCore), None);
    }

    #[test]
    fn average_uses_only_rated_subjects() {
        let rec = rated(&[("cocore:Art", 3), ("cocore:PE", 5)]);
        assert_eq!(average_text(&rec, SubjectGroup::CoCore), "Average: 4.0");

        let rec = rated(&[("core:Math", 2), ("core:English", 2), ("core:Thai", 2), ("core:Science", 3)]);
        assert_eq!(average_text(&rec, SubjectGroup::Core), "Average: 2.3");

        let rec = rated(&[("core:Math", 1), ("core:English", 2), ("core:Thai", 2)]);
        assert_eq!(average_text(&rec, SubjectGroup::Core), "Average: 1.7");
    }

    #[test]
    fn favorite_sentence_skips_empty_clauses() {
        let mut rec = StateRecord::default();
        rec.fav_core = "Math".to_string();
        rec.fav_activity = "Chess".to_string();
        assert_eq!(
            favorite_sentence(&rec),
            "My favorite subject is Math, and my favorite activity is Chess."
        );

        rec.fav_co_core = "Art".to_string();
        assert_eq!(
            favorite_sentence(&rec),
            "My favorite subject is Math, and my favorite co-core subject is Art, and my favorite activity is Chess."
        );

        assert_eq!(
            favorite_sentence(&StateRecord::default()),
            "My favorite subject is ….",
        );
    }

    #[test]
    fn challenge_sentence_appends_second_pick() {
        let mut rec = StateRecord::default();
        assert_eq!(challenge_sentence(&rec), "One of the most challenging subject is ….");
        rec.challenge1 = "Science".to_string();
        rec.challenge2 = "Thai".to_string();
        assert_eq!(
            challenge_sentence(&rec),
            "One of the most challenging subject is Science and another challenging subject is Thai."
        );
    }

    #[test]
    fn presenter_name_variants() {
        let mut rec = StateRecord::default();
        assert_eq!(presenter_name(&rec), "Student-Led Conference");
        rec.student_section = " 5B ".to_string();
        assert_eq!(presenter_name(&rec), "Student-Led Conference • 5B");
        rec.student_name = "Mali".to_string();
        assert_eq!(presenter_name(&rec), "Presenter: Mali • 5B");
        rec.student_section = "   ".to_string();
        assert_eq!(presenter_name(&rec), "Presenter: Mali");
    }

    #[test]
    fn star_bar_lights_positions_up_to_rating() {
        assert_eq!(star_bar(None), [false; 5]);
        assert_eq!(star_bar(Some(3)), [true, true, true, false, false]);
        assert_eq!(star_bar(Some(5)), [true; 5]);
    }

    #[test]
    fn star_rows_follow_declaration_order() {
        let rec = rated(&[("cocore:Music", 4)]);
        let rows = star_rows(&rec, SubjectGroup::CoCore);
        let names: Vec<&str> = rows.iter().map(|r| r.subject).collect();
        assert_eq!(names, vec!["Drama", "Art", "ICT", "Social Studies", "Music", "PE"]);
        assert_eq!(rows[4].rating, Some(4));
        assert_eq!(stars_text(&rec, SubjectGroup::CoCore, "Music"), "⭐⭐⭐⭐");
        assert_eq!(stars_text(&rec, SubjectGroup::CoCore, "PE"), "—");
    }

    #[test]
    fn challenge_options_block_the_other_pick() {
        let mut rec = StateRecord::default();
        rec.challenge1 = "Math".to_string();
        let opts = challenge_options(&rec);
        assert_eq!(opts.challenge2_blocked.as_deref(), Some("Math"));
        assert_eq!(opts.challenge1_blocked, None);
    }
}
