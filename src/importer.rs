/// Post records read from a WordPress SQLite export.
///
/// Only the columns needed to render a post are read:
/// ```sql
/// CREATE TABLE wp_posts (
///     ID           INTEGER PRIMARY KEY,
///     post_author  INTEGER NOT NULL,
///     post_date    TEXT NOT NULL,     -- "YYYY-MM-DD HH:MM:SS"
///     post_content TEXT NOT NULL,
///     post_title   TEXT NOT NULL,
///     post_status  TEXT NOT NULL,     -- "publish" | "draft" | "trash" | ...
///     post_name    TEXT NOT NULL
/// );
/// CREATE TABLE wp_users (
///     ID           INTEGER PRIMARY KEY,
///     display_name TEXT NOT NULL
/// );
/// ```
///
/// The `wp_` prefix is configurable, as it is in WordPress itself.
use chrono::NaiveDateTime;
use eyre::{Context, Result, eyre};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;

pub const DEFAULT_TABLE_PREFIX: &str = "wp_";

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub author: String,
    pub title: String,
    /// Slug. Used verbatim as the front-matter `slug` and the file stem.
    pub name: String,
    /// HTML as read; replaced with Markdown before rendering.
    pub content: String,
    pub created: NaiveDateTime,
    pub status: String,
    pub draft: bool,
}

impl Post {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Post {
            author: row.get(0)?,
            title: row.get(1)?,
            name: row.get(2)?,
            content: row.get(3)?,
            created: row.get(4)?,
            status: row.get(5)?,
            draft: row.get(6)?,
        })
    }
}

pub fn open_db(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .wrap_err_with(|| format!("Failed to open database: {}", path.display()))
}

/// Table prefixes are spliced into SQL, so only identifier characters pass.
pub fn validate_table_prefix(prefix: &str) -> Result<()> {
    if prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(eyre!("Invalid table prefix: {:?}", prefix))
    }
}

pub fn posts_query(prefix: &str) -> String {
    format!(
        "SELECT u.display_name,
                p.post_title,
                p.post_name,
                p.post_content,
                p.post_date,
                p.post_status,
                p.post_status = 'draft' AS draft
         FROM {prefix}posts p
         INNER JOIN {prefix}users u ON (p.post_author = u.ID)
         WHERE p.post_status IN ('draft', 'publish')
         ORDER BY p.post_date ASC"
    )
}

/// Run the post query and collect every row before any processing starts.
pub fn read_posts(conn: &Connection, prefix: &str) -> Result<Vec<Post>> {
    validate_table_prefix(prefix)?;
    let mut stmt = conn
        .prepare(&posts_query(prefix))
        .wrap_err("Failed to prepare posts query")?;
    stmt.query_map([], Post::from_row)
        .wrap_err("Failed to query posts")?
        .collect::<Result<_, _>>()
        .wrap_err("Failed to read post rows")
}
