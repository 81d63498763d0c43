//! `netiquette` — a netiquette checker for news-style posts.
//!
//! This crate parses a message (headers, empty line, body), runs a fixed
//! pipeline of rules over it and reports every violated guideline.
//!
//! ```
//! use netiquette::check::check;
//! use netiquette::config::RulesConfig;
//!
//! let result = check("Subject: hello\n\nHi", Some("stdin"), &RulesConfig::default()).unwrap();
//! assert!(!result.compliant);
//! ```

pub mod blocks;
pub mod check;
pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod rules;
