//! Core text domain for Posse.
//!
//! This crate contains pure functions and types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the application.
//!
//! - [`truncate`]: THE TRUNCENATOR, word-boundary truncation under a character
//!   budget with fixed-width URL accounting
//! - [`find_urls`] / [`find_urls_raw`]: URL location in free text
//! - [`normalized_len`]: character length with URLs counted at a fixed width
//! - tag strings and `namespace:predicate=value` machine tags
//! - slugs and date rendering

#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod dates;
mod tags;
mod text;
mod truncate;
mod urls;

pub use dates::{DateParseError, atom_date, time_element};
pub use tags::{AuthTags, MachineTag, auth_tags, tagstring_clean, tagstring_to_vec};
pub use text::slugify;
pub use truncate::{DEFAULT_ELLIPSIS, DEFAULT_LENGTH, TruncateError, TruncateOptions, truncate};
pub use urls::{find_urls, find_urls_raw, normalized_len};
