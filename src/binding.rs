//! Form binding layer: applies input-changed notifications to the record and
//! runs the save pipeline.
//!
//! `Session` is the single owner of the `StateRecord`. Every mutation goes
//! through `Session::apply`, which finishes with `save_state`: persist, then
//! recompute the derived view, then rerender the open slide (if any). Callers
//! always get a `ViewUpdate` that matches the record they just changed.

use crate::derive::ViewModel;
use crate::images::is_image_data_uri;
use crate::model::{Field, ImageSlot, StateRecord, RATING_MAX, RATING_MIN};
use crate::present::{Navigator, RenderedSlide};
use crate::slides::DECK_LEN;
use crate::store::Store;
use crate::subjects::{rating_key, SubjectGroup};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged { field: Field, value: String },
    RatingSelected { group: SubjectGroup, subject: String, stars: u8 },
    ImageChanged { slot: ImageSlot, data_uri: String },
    Imported(StateRecord),
}

/// Rejected input. The record is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    NotAChoice { field: &'static str, value: String },
    UnknownSubject { group: &'static str, subject: String },
    StarsOutOfRange(u8),
    NotAnImage,
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAChoice { field, value } => {
                write!(f, "{} does not offer the choice {:?}", field, value)
            }
            Self::UnknownSubject { group, subject } => {
                write!(f, "unknown {} subject: {}", group, subject)
            }
            Self::StarsOutOfRange(n) => {
                write!(f, "stars must be in {}..={}, got {}", RATING_MIN, RATING_MAX, n)
            }
            Self::NotAnImage => f.write_str("image must be a data:image/ URI or empty"),
        }
    }
}

impl std::error::Error for BindingError {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewUpdate {
    pub view: ViewModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide: Option<RenderedSlide>,
}

pub struct Session {
    record: StateRecord,
    store: Store,
    navigator: Navigator,
}

impl Session {
    /// Loads the stored record (defaults on any read problem).
    pub fn open(store: Store) -> Self {
        let record = store.load();
        info!(key = %store.key(), "session opened");
        Self {
            record,
            store,
            navigator: Navigator::new(),
        }
    }

    pub fn record(&self) -> &StateRecord {
        &self.record
    }

    #[cfg(test)]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[cfg(test)]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Derived view for the current record, without persisting.
    pub fn view(&mut self) -> ViewUpdate {
        let slide = self
            .navigator
            .is_open()
            .then(|| self.navigator.render(&self.record));
        ViewUpdate {
            view: ViewModel::build(&self.record),
            slide,
        }
    }

    pub fn apply(&mut self, event: FormEvent) -> anyhow::Result<ViewUpdate> {
        self.validate(&event)?;
        match event {
            FormEvent::FieldChanged { field, value } => {
                debug!(field = field.name(), "field changed");
                *self.record.field_mut(field) = value;
                if matches!(field, Field::Challenge1 | Field::Challenge2) {
                    self.record.enforce_distinct_challenges(field);
                }
            }
            FormEvent::RatingSelected {
                group,
                subject,
                stars,
            } => {
                debug!(group = group.key(), %subject, stars, "rating selected");
                self.record.ratings.insert(rating_key(group, &subject), stars);
            }
            FormEvent::ImageChanged { slot, data_uri } => {
                debug!(slot = slot.name(), bytes = data_uri.len(), "image changed");
                *self.record.image_mut(slot) = data_uri;
            }
            FormEvent::Imported(record) => {
                info!("state replaced by import");
                self.record = record;
            }
        }
        self.save_state()
    }

    /// Clears storage and starts over from defaults. Presentation mode closes;
    /// nothing is written until the next edit.
    pub fn reset(&mut self) -> anyhow::Result<ViewUpdate> {
        self.store.clear()?;
        self.record = StateRecord::default();
        self.navigator.close();
        info!("state reset to defaults");
        Ok(self.view())
    }

    pub fn open_presentation(&mut self) -> RenderedSlide {
        self.navigator.open();
        self.navigator.render(&self.record)
    }

    pub fn close_presentation(&mut self) {
        self.navigator.close();
    }

    /// `None` while presentation mode is closed.
    pub fn next_slide(&mut self) -> Option<RenderedSlide> {
        if !self.navigator.is_open() {
            return None;
        }
        self.navigator.next(DECK_LEN);
        Some(self.navigator.render(&self.record))
    }

    pub fn prev_slide(&mut self) -> Option<RenderedSlide> {
        if !self.navigator.is_open() {
            return None;
        }
        self.navigator.prev(DECK_LEN);
        Some(self.navigator.render(&self.record))
    }

    pub fn current_slide(&mut self) -> Option<RenderedSlide> {
        if !self.navigator.is_open() {
            return None;
        }
        Some(self.navigator.render(&self.record))
    }

    fn validate(&self, event: &FormEvent) -> Result<(), BindingError> {
        match event {
            FormEvent::FieldChanged { field, value } => {
                if !field.accepts(value) {
                    return Err(BindingError::NotAChoice {
                        field: field.name(),
                        value: value.clone(),
                    });
                }
            }
            FormEvent::RatingSelected {
                group,
                subject,
                stars,
            } => {
                if !group.contains(subject) {
                    return Err(BindingError::UnknownSubject {
                        group: group.key(),
                        subject: subject.clone(),
                    });
                }
                if !(RATING_MIN..=RATING_MAX).contains(stars) {
                    return Err(BindingError::StarsOutOfRange(*stars));
                }
            }
            FormEvent::ImageChanged { data_uri, .. } => {
                if !data_uri.is_empty() && !is_image_data_uri(data_uri) {
                    return Err(BindingError::NotAnImage);
                }
            }
            FormEvent::Imported(_) => {}
        }
        Ok(())
    }

    fn save_state(&mut self) -> anyhow::Result<ViewUpdate> {
        self.store.save(&self.record)?;
        Ok(self.view())
    }
}
