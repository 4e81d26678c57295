// Copyright 2026 Postcomb Contributors
// SPDX-License-Identifier: Apache-2.0

//! Postcomb library — expand and extract the comment thread of a LinkedIn post.
//!
//! The binary wires a Chromium session (`browser::chromium`) into the
//! pipeline in `scrape`; everything below the `browser` traits is testable
//! against scripted fakes without a real browser.

pub mod auth;
pub mod browser;
pub mod config;
pub mod expand;
pub mod extract;
pub mod linkedin;
pub mod output;
pub mod scrape;
