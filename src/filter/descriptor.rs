use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::wizard::SelectOption;

/// Filter keys holding the inclusive date bounds.
pub const START_DATE_KEY: &str = "startDate";
pub const END_DATE_KEY: &str = "endDate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Text,
    Select,
    Date,
}

/// One filter control, mirrored 1:1 by a key in [`FilterState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FilterKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl FilterDescriptor {
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FilterKind::Text,
            options: Vec::new(),
        }
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FilterKind::Select,
            options,
        }
    }

    /// The pair of date controls bounding a date range.
    pub fn date_range(start_label: &str, end_label: &str) -> [Self; 2] {
        [
            Self {
                name: START_DATE_KEY.into(),
                label: start_label.into(),
                kind: FilterKind::Date,
                options: Vec::new(),
            },
            Self {
                name: END_DATE_KEY.into(),
                label: end_label.into(),
                kind: FilterKind::Date,
                options: Vec::new(),
            },
        ]
    }
}

/// Current value of every filter control owned by a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub text: BTreeMap<String, String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterState {
    /// Blank state with one text entry per non-date descriptor.
    pub fn from_descriptors(descriptors: &[FilterDescriptor]) -> Self {
        let text = descriptors
            .iter()
            .filter(|descriptor| descriptor.kind != FilterKind::Date)
            .map(|descriptor| (descriptor.name.clone(), String::new()))
            .collect();
        Self {
            text,
            start_date: None,
            end_date: None,
        }
    }

    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.text.insert(name.into(), value.into());
    }

    /// Sets the bound named by `name`; any other name is ignored.
    pub fn set_date(&mut self, name: &str, value: Option<NaiveDate>) {
        match name {
            START_DATE_KEY => self.start_date = value,
            END_DATE_KEY => self.end_date = value,
            _ => {}
        }
    }

    /// Returns every value to blank, keeping the keys.
    pub fn clear(&mut self) {
        self.text.values_mut().for_each(String::clear);
        self.start_date = None;
        self.end_date = None;
    }

    /// Text keys that currently constrain the result.
    pub fn active_terms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_blank(&self) -> bool {
        self.active_terms().next().is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}
