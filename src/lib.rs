//! # wp2md
//!
//! A CLI tool that migrates [WordPress](https://wordpress.org) posts from a SQLite
//! export into flat Markdown files for static-site generators such as Hugo.
//!
//! ## What it does
//!
//! Every draft or published post is read together with its author, its HTML body is
//! converted to Markdown, and the result is written as `<slug>.md` with front matter:
//!
//! ```text
//! ---
//! title: Hello%3A World
//! date: 2021-03-04 05:06:07
//! draft: false
//! slug: hello-world
//! ---
//!
//! Hi **there**
//! ```
//!
//! Titles are HTML-escaped and their colons percent-encoded so the unquoted `title:`
//! line stays well-formed. The database is opened **read-only**.
//!
//! The export is not incremental: every run re-reads the database and rewrites every
//! file. A post that fails to convert, render or write is logged and skipped.
//!
//! ## Usage
//!
//! ```sh
//! # Export into ./posts
//! wp2md wordpress.db
//!
//! # Export into a Hugo content directory
//! CONTENT_DIRECTORY=site/content/posts wp2md wordpress.db
//! wp2md wordpress.db --content-dir site/content/posts --table-prefix blog_
//! ```
//!
//! Defaults can be persisted in `~/.config/wp2md/config.toml`.
pub mod converter;
pub mod exporter;
pub mod importer;
pub mod sequential;
pub mod utils;
