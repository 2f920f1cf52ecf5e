//! A swipeable month/week calendar widget for [`ratatui`].
//!
//! See [`calendar`] for the widget itself and [`events`] for marking days
//! with events.
pub mod calendar;
pub mod events;
pub mod theme;
