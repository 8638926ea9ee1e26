//! `algebraix-fetch` — batch downloader for the Algebraix web inbox.
//!
//! This crate provides the core library for walking an inbox one message at
//! a time: extracting sender, body, and attachment links from the live
//! page, resolving senders against an identities table, and filing
//! everything into per-student directories with collision-free numbering.

pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod model;
pub mod page;
pub mod resolve;
pub mod roster;
pub mod session;
