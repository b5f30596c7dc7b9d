//! Text and HTML extraction for tenderbot.
//!
//! This crate provides:
//! - [`links`] — finds allow-listed portal links in free-form message text
//! - [`field`] — recovers a labelled value from an inconsistently structured tender table
//! - [`title`] — ordered title strategies (tender form, og:title, `<title>`)
//! - [`text`] — tag stripping, entity decoding, and whitespace cleanup
//!
//! Everything here is pure and synchronous; fetching lives in `tenderbot-resolver`.

pub mod field;
pub mod links;
pub mod text;
pub mod title;

pub use field::{LabeledField, extract_labeled_field};
pub use links::LinkExtractor;
pub use title::{DocumentTitle, OpenGraphTitle, Page, TenderTitle, TitleChain, TitleStrategy};
