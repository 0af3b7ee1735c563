use crate::derive::presenter_name;
use crate::model::StateRecord;
use crate::slides::{build_deck, escape_html, Slide};
use serde::Serialize;

/// Presentation mode state. The index is clamped against the deck on every
/// render, so it never goes negative and never wraps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    open: bool,
    slide_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSlide {
    pub index: usize,
    pub total: usize,
    pub title: &'static str,
    pub body: String,
    pub markup: String,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    #[cfg(test)]
    pub fn slide_index(&self) -> usize {
        self.slide_index
    }

    pub fn open(&mut self) {
        self.open = true;
        self.slide_index = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn next(&mut self, deck_len: usize) {
        self.slide_index = self.slide_index.saturating_add(1);
        self.clamp(deck_len);
    }

    pub fn prev(&mut self, deck_len: usize) {
        self.slide_index = self.slide_index.saturating_sub(1);
        self.clamp(deck_len);
    }

    fn clamp(&mut self, deck_len: usize) {
        self.slide_index = self.slide_index.min(deck_len.saturating_sub(1));
    }

    /// Rebuilds the deck from `record` and renders the active slide.
    pub fn render(&mut self, record: &StateRecord) -> RenderedSlide {
        let deck = build_deck(record);
        self.clamp(deck.len());
        render_slide(&deck, self.slide_index)
    }
}

fn render_slide(deck: &[Slide], index: usize) -> RenderedSlide {
    let total = deck.len();
    let slide = &deck[index];
    let dots: String = (0..total)
        .map(|i| {
            if i == index {
                r#"<span class="dot on"></span>"#
            } else {
                r#"<span class="dot"></span>"#
            }
        })
        .collect();

    let markup = format!(
        r#"<div class="slideInner">
  <div class="slideTopBar">
    <h3 class="slideTitle">{title}</h3>
    <div class="slideMeta">
      <span class="slidePill">Slide {pos} / {total}</span>
      <span class="dots" aria-label="progress">{dots}</span>
    </div>
  </div>
  <div>{body}</div>
</div>"#,
        title = slide.title,
        pos = index + 1,
        total = total,
        dots = dots,
        body = slide.body,
    );

    RenderedSlide {
        index,
        total,
        title: slide.title,
        body: slide.body.clone(),
        markup,
    }
}

/// Whole deck as one standalone HTML page, one section per slide, for
/// printing a handout.
pub fn print_document(record: &StateRecord) -> String {
    let deck = build_deck(record);
    let heading = escape_html(&presenter_name(record));
    let mut sections = String::new();
    for i in 0..deck.len() {
        let rendered = render_slide(&deck, i);
        sections.push_str(&format!(
            "<section class=\"printSlide\">\n{}\n</section>\n",
            rendered.markup
        ));
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{heading}</title>
<style>.printSlide {{ page-break-after: always; }}</style>
</head>
<body>
<h1 class="printHeading">{heading}</h1>
{sections}</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::DECK_LEN;

    #[test]
    fn prev_at_first_slide_stays_at_zero() {
        let mut nav = Navigator::new();
        nav.open();
        nav.prev(DECK_LEN);
        assert_eq!(nav.slide_index(), 0);
    }

    #[test]
    fn next_at_last_slide_stays_at_end() {
        let mut nav = Navigator::new();
        nav.open();
        for _ in 0..20 {
            nav.next(DECK_LEN);
        }
        assert_eq!(nav.slide_index(), DECK_LEN - 1);
        nav.next(DECK_LEN);
        assert_eq!(nav.slide_index(), 5);
    }

    #[test]
    fn open_resets_to_first_slide() {
        let mut nav = Navigator::new();
        nav.open();
        nav.next(DECK_LEN);
        nav.next(DECK_LEN);
        nav.close();
        assert!(!nav.is_open());
        nav.open();
        assert_eq!(nav.slide_index(), 0);
    }

    #[test]
    fn render_reports_position_and_dots() {
        let mut nav = Navigator::new();
        nav.open();
        nav.next(DECK_LEN);
        let slide = nav.render(&StateRecord::default());
        assert_eq!(slide.index, 1);
        assert_eq!(slide.total, 6);
        assert_eq!(slide.title, "🌟 My Favorite Subjects");
        assert!(slide.markup.contains("Slide 2 / 6"));
        let lit = slide.markup.matches("<span class=\"dot on\">").count();
        let unlit = slide.markup.matches("<span class=\"dot\">").count();
        assert_eq!(lit, 1);
        assert_eq!(lit + unlit, 6);
        assert_eq!(slide.markup.matches("class=\"dots\"").count(), 1);
    }

    #[test]
    fn print_document_contains_every_slide() {
        let mut rec = StateRecord::default();
        rec.student_name = "<Fon>".to_string();
        let doc = print_document(&rec);
        assert_eq!(doc.matches("<section class=\"printSlide\">").count(), 6);
        assert!(doc.contains("Presenter: &lt;Fon&gt;"));
        assert!(!doc.contains("<Fon>"));
    }
}
