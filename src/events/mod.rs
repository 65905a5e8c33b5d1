//! Event composition and browsing
//!
//! [`payload`] turns user input into the two intake payload shapes (alert
//! and change); [`search`] builds the time-windowed search queries and
//! normalizes the heterogeneous results; [`templates`] carries the
//! prefilled quick-start events.

pub mod payload;
pub mod search;
pub mod templates;

pub use payload::{
    parse_value_or_text, AlertDetails, CategoryDetails, ChangeDetails, ChangedResource,
    EventAttributes, EventCategory, EventPayload, EventStatus, Priority, Severity, INTEGRATION_ID,
};
pub use search::{next_cursor, EventQuery, EventSummary, Lookback, PAGE_LIMIT};
pub use templates::Template;
