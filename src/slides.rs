//! Slide deck built from the record. Rebuilt in full on every render.

use crate::derive::{challenge_sentence, favorite_sentence, stars_text};
use crate::images::is_image_data_uri;
use crate::model::StateRecord;
use crate::subjects::SubjectGroup;
use serde::Serialize;

pub const DECK_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: &'static str,
    pub body: String,
}

/// Escapes `<`, `>` and `&` so user text can never become live markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Image source usable inside a `src="..."` attribute, or `None` when the
/// stored value is not an image data URI.
fn image_src(data_uri: &str) -> Option<String> {
    if !is_image_data_uri(data_uri) {
        return None;
    }
    Some(escape_html(data_uri).replace('"', "&quot;"))
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

pub fn build_deck(record: &StateRecord) -> Vec<Slide> {
    vec![
        intro_slide(record),
        favorites_slide(record),
        challenges_slide(record),
        stars_slide(record),
        images_slide(record),
        comments_slide(record),
    ]
}

fn intro_slide(record: &StateRecord) -> Slide {
    let name_raw = record.student_name.trim();
    let name = escape_html(if name_raw.is_empty() { "Student" } else { name_raw });
    let section = escape_html(record.student_section.trim());

    let photo = match image_src(&record.student_photo) {
        Some(src) => format!(r#"<div class="photoFrame"><img src="{src}" alt="Student photo"></div>"#),
        None => r#"<div class="photoFrame emoji">🧒</div>"#.to_string(),
    };
    let section_line = if section.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="presenterSection">Section: {section}</div>"#)
    };

    Slide {
        title: "👋 Hello!",
        body: format!(
            r#"<div class="slideGrid two">
  <div class="bigCard presenterCard">
    {photo}
    <div class="presenter">
      <div class="presenterLabel">Presenter</div>
      <div class="presenterName">{name}</div>
      {section_line}
      <div class="chips">
        <span class="chip">🎤 I can speak clearly</span>
        <span class="chip good">🌟 I will share my learning</span>
      </div>
    </div>
  </div>
  <div class="bigCard">
    <div class="bigLine">🚀 Today I will talk about…</div>
    <div class="chips">
      <span class="chip">🌟 Favorites</span>
      <span class="chip warn">🧩 Challenges</span>
      <span class="chip good">⭐ My Stars</span>
      <span class="chip">💬 Comments</span>
    </div>
    <div class="tip">(Tip: Use ⬅ ➡ keys to move slides)</div>
  </div>
</div>"#
        ),
    }
}

fn explanation_or_placeholder(s: &str) -> String {
    if s.is_empty() {
        "<i>(No explanation yet)</i>".to_string()
    } else {
        escape_html(s)
    }
}

fn favorites_slide(record: &StateRecord) -> Slide {
    let sentence = escape_html(&favorite_sentence(record));
    let fav_core = escape_html(or_dash(&record.fav_core));
    let fav_co = escape_html(or_dash(&record.fav_co_core));
    let fav_act = escape_html(or_dash(&record.fav_activity));
    let explain = explanation_or_placeholder(&record.fav_explanation);

    Slide {
        title: "🌟 My Favorite Subjects",
        body: format!(
            r#"<div class="bigCard">
  <div class="bigLine">✨ {sentence}</div>
</div>
<div class="slideGrid two">
  <div class="bigCard">
    <div class="bigLine">My picks</div>
    <div class="chips">
      <span class="chip good">📘 Core: {fav_core}</span>
      <span class="chip">🎨 Co-core: {fav_co}</span>
      <span class="chip warn">🎯 Activity: {fav_act}</span>
    </div>
  </div>
  <div class="bigCard">
    <div class="bigLine">My explanation</div>
    <div class="explain">{explain}</div>
  </div>
</div>"#
        ),
    }
}

fn challenges_slide(record: &StateRecord) -> Slide {
    let sentence = escape_html(&challenge_sentence(record));
    let c1 = escape_html(or_dash(&record.challenge1));
    let c2 = escape_html(or_dash(&record.challenge2));
    let explain = explanation_or_placeholder(&record.challenge_explanation);

    Slide {
        title: "🧩 Challenging Subjects",
        body: format!(
            r#"<div class="bigCard">
  <div class="bigLine">💪 {sentence}</div>
</div>
<div class="slideGrid two">
  <div class="bigCard">
    <div class="bigLine">My challenges</div>
    <div class="chips">
      <span class="chip warn">1️⃣ {c1}</span>
      <span class="chip warn">2️⃣ {c2}</span>
    </div>
    <div class="tip">It’s okay to find something hard — that’s how we grow!</div>
  </div>
  <div class="bigCard">
    <div class="bigLine">How I will improve</div>
    <div class="explain">{explain}</div>
  </div>
</div>"#
        ),
    }
}

fn stars_table(record: &StateRecord, group: SubjectGroup) -> String {
    let mut rows = String::new();
    for subject in group.subjects() {
        rows.push_str(&format!(
            "\n    <tr><td class=\"subject\">{}</td><td class=\"stars\">{}</td></tr>",
            escape_html(subject),
            stars_text(record, group, subject)
        ));
    }
    format!("<table class=\"starsTable\">{rows}\n  </table>")
}

fn stars_slide(record: &StateRecord) -> Slide {
    let core = stars_table(record, SubjectGroup::Core);
    let cocore = stars_table(record, SubjectGroup::CoCore);

    Slide {
        title: "⭐ My Subject Stars",
        body: format!(
            r#"<div class="slideGrid two">
  <div class="bigCard">
    <div class="bigLine">📘 Core Stars</div>
  {core}
  </div>
  <div class="bigCard">
    <div class="bigLine">🎨 Co-core Stars</div>
  {cocore}
  </div>
</div>
<div class="bigCard">
  <div class="bigLine">🌈 What my stars mean</div>
  <div class="chips">
    <span class="chip">⭐ 1 = practice more</span>
    <span class="chip">⭐⭐⭐ 3 = improving</span>
    <span class="chip good">⭐⭐⭐⭐⭐ 5 = confident</span>
  </div>
</div>"#
        ),
    }
}

fn image_card(label: &str, alt: &str, data_uri: &str) -> String {
    match image_src(data_uri) {
        Some(src) => format!(
            r#"<div class="bigCard"><div class="bigLine">{label}</div><img class="favImage" src="{src}" alt="{alt}"></div>"#
        ),
        None => format!(
            r#"<div class="bigCard"><div class="bigLine">{label}</div><div class="placeholder">(No image yet)</div></div>"#
        ),
    }
}

fn images_slide(record: &StateRecord) -> Slide {
    let core = image_card("📘 Core Image", "Favorite core", &record.img_core);
    let cocore = image_card("🎨 Co-core Image", "Favorite co-core", &record.img_co_core);

    Slide {
        title: "🖼️ Favorite Subject Images",
        body: format!(
            r#"<div class="slideGrid two">
  {core}
  {cocore}
</div>
<div class="bigCard">
  <div class="bigLine">🎨 Why I chose these images</div>
  <div class="tip">(You can tell a short story about what you see!)</div>
</div>"#
        ),
    }
}

fn comments_slide(record: &StateRecord) -> Slide {
    let comments = if record.comments.is_empty() {
        "<i>(No comments yet)</i>".to_string()
    } else {
        escape_html(&record.comments).replace('\n', "<br/>")
    };

    Slide {
        title: "💬 Comments",
        body: format!(
            r#"<div class="bigCard">
  <div class="bigLine">🗣️ What I want to share</div>
  <div class="comments">{comments}</div>
</div>
<div class="bigCard">
  <div class="bigLine">🙏 Thank you for listening!</div>
  <div class="chips">
    <span class="chip good">🌟 I will keep trying!</span>
    <span class="chip">📚 I will keep learning!</span>
    <span class="chip warn">😊 I can improve!</span>
  </div>
</div>"#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_has_six_slides_in_fixed_order() {
        let deck = build_deck(&StateRecord::default());
        let titles: Vec<&str> = deck.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "👋 Hello!",
                "🌟 My Favorite Subjects",
                "🧩 Challenging Subjects",
                "⭐ My Subject Stars",
                "🖼️ Favorite Subject Images",
                "💬 Comments",
            ]
        );
        assert_eq!(deck.len(), DECK_LEN);
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn non_image_sources_are_not_embedded() {
        let mut rec = StateRecord::default();
        rec.img_core = "javascript:alert(1)".to_string();
        rec.student_photo = "data:image/png;base64,AA\"onerror=\"x".to_string();
        let deck = build_deck(&rec);
        assert!(!deck[4].body.contains("javascript:"));
        assert!(deck[4].body.contains("(No image yet)"));
        assert!(deck[0].body.contains("AA&quot;onerror=&quot;x"));
    }

    #[test]
    fn comments_keep_line_breaks() {
        let mut rec = StateRecord::default();
        rec.comments = "line one\nline <two>".to_string();
        let deck = build_deck(&rec);
        assert!(deck[5].body.contains("line one<br/>line &lt;two&gt;"));
    }
}
