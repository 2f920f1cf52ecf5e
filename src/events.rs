//! Events attached to calendar days.
//!
//! Events are keyed by date strings in either the `YYYY-MM-DD` or the compact
//! `YYYYMMDD` form; lookups try both.
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Colour of the event indicator, in any form accepted by
    /// [`ratatui::style::Color`]'s `FromStr` impl (`"yellow"`, `"#ff8800"`,
    /// …)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Event {
    pub fn on<S: Into<String>>(date: S) -> Event {
        Event {
            date: Some(date.into()),
            ..Event::default()
        }
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Event {
        self.title = Some(title.into());
        self
    }

    pub fn color<S: Into<String>>(mut self, color: S) -> Event {
        self.color = Some(color.into());
        self
    }

    pub fn indicator_color(&self) -> Option<Color> {
        self.color.as_deref().and_then(|c| c.parse().ok())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EventMap(HashMap<String, Event>);

impl EventMap {
    pub fn new() -> EventMap {
        EventMap::default()
    }

    /// Each date gets an empty event
    pub fn from_dates<I, S>(dates: I) -> EventMap
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EventMap(
            dates
                .into_iter()
                .map(|d| (d.into(), Event::default()))
                .collect(),
        )
    }

    /// Events without a date are skipped.  When two events share a date, the
    /// later one wins.
    pub fn from_events<I: IntoIterator<Item = Event>>(events: I) -> EventMap {
        EventMap(
            events
                .into_iter()
                .filter_map(|ev| Some((ev.date.clone()?, ev)))
                .collect(),
        )
    }

    /// Build a map from whichever source the host supplied: a list of event
    /// objects takes precedence over a plain list of dates.
    pub fn prepare(event_dates: &[String], events: Option<&[Event]>) -> EventMap {
        match events {
            Some(events) => EventMap::from_events(events.iter().cloned()),
            None => EventMap::from_dates(event_dates.iter().cloned()),
        }
    }

    pub fn from_json(s: &str) -> Result<EventMap, serde_json::Error> {
        Ok(match serde_json::from_str::<EventsFile>(s)? {
            EventsFile::Dates(dates) => EventMap::from_dates(dates),
            EventsFile::Events(events) => EventMap::from_events(events),
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<EventMap, EventsError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| EventsError::Read {
            path: path.to_owned(),
            source,
        })?;
        let events = EventMap::from_json(&src).map_err(|source| EventsError::Parse {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Loaded {} event(s) from {}", events.len(), path.display());
        Ok(events)
    }

    pub fn get(&self, date: Date) -> Option<&Event> {
        self.0
            .get(&iso_key(date))
            .or_else(|| self.0.get(&compact_key(date)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
enum EventsFile {
    Dates(Vec<String>),
    Events(Vec<Event>),
}

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("failed to read events from {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse events from {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

static ISO_KEY_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

static COMPACT_KEY_FMT: &[FormatItem<'_>] = format_description!("[year][month][day]");

/// `YYYY-MM-DD`
pub fn iso_key(date: Date) -> String {
    date.format(ISO_KEY_FMT).unwrap_or_default()
}

/// `YYYYMMDD`
pub fn compact_key(date: Date) -> String {
    date.format(COMPACT_KEY_FMT).unwrap_or_default()
}
