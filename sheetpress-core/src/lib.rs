#![doc = "sheetpress-core: core logic library for sheetpress."]

//! This crate holds everything that turns a spreadsheet into a published
//! blog snapshot, independent of how the spreadsheet is reached:
//!
//! - [`base_n`] and [`a1`]: numeral and spreadsheet-coordinate encoding
//! - [`record`]: mapping delimited cell runs onto named records
//! - [`sheet`]: range reads over a pluggable [`sheet::SheetAdapter`]
//! - [`engine`]: a periodic task runner
//! - [`poller`]: change detection across pages, publishing to a [`sink::Sink`]
//! - [`blog`]: the blog's content and user pages
//!
//! # Usage
//! The CLI crate wires a Google Sheets adapter, a [`blog::Blog`], a
//! [`sink::JsonFileSink`] and a [`poller::Poller`] together from [`config::Config`].

pub mod a1;
pub mod base_n;
pub mod blog;
pub mod config;
pub mod engine;
pub mod poller;
pub mod record;
pub mod sheet;
pub mod sink;
