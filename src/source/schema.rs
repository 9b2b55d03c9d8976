//! Items table layout
//!
//! The collector only reads this table. The schema is kept here so fixtures
//! and tooling can create databases the source query understands.

/// SQL schema of the Hacker News items table
pub const ITEMS_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY,
    type TEXT NOT NULL,
    "by" TEXT NOT NULL DEFAULT '',
    time INTEGER,
    url TEXT NOT NULL DEFAULT '',
    title TEXT,
    score INTEGER NOT NULL DEFAULT 0,
    deleted BOOLEAN DEFAULT 0,
    dead BOOLEAN DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_items_type_score ON items(type, score);
"#;

/// Selects story URLs; `?1` is the minimum score, `?2` the row limit (-1 = all)
pub const STORY_URLS_SQL: &str = r#"
SELECT url
FROM items
WHERE type = 'story'
  AND url != ''
  AND "by" != ''
  AND IFNULL(deleted, 0) = 0
  AND IFNULL(dead, 0) = 0
  AND score > ?1
ORDER BY id
LIMIT ?2
"#;

/// Creates the items table on a connection
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(ITEMS_SCHEMA_SQL)
}
