//! HTML handling for syndicated content.
//!
//! Posts are authored as HTML; short-form services want plain text. This crate
//! turns one into the other and resolves author handles from profile links.
//! It also carries a few helpers for parsed microformats2 documents.

mod author;
mod convert;
mod microformats;

pub use author::author_from_uri;
pub use convert::{expand_img, html_to_text};
pub use microformats::{find_h_cards, find_h_entries, inline_h_card, normalise_h_entry_dates};
