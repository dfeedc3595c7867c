//! Raw rule rows and how they come out of a dictionary file.
//!
//! A loader yields rows; a prepare function turns each row into
//! `(pattern_data, target_data)`. Formats combine the two in a
//! [`LoadDepends`] bundle. Rows are collected eagerly: dictionary load is
//! the only I/O the crate performs, and eager collection keeps file handles
//! and database connections scope-bound with release on every exit path.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// One raw rule row. Plain-text loaders yield a single column; database
/// loaders yield one column per selected field.
pub(crate) type Row = Vec<String>;

/// Turn a raw row into `(pattern_data, target_data)`.
pub(crate) type Prepare = fn(&Row) -> (Vec<String>, Vec<String>);

/// How raw rows are read from a dictionary path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Loader {
    /// Exactly one empty row; the dictionary only binds an external resolver.
    Single,
    /// UTF-8 text, one rule per line, `#` opens a comment.
    Lines,
    /// The file is a JSON configuration pointing at a sqlite database.
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl Loader {
    pub(crate) fn rows(self, path: &Path) -> Result<Vec<Row>> {
        match self {
            Loader::Single => Ok(vec![vec![String::new()]]),
            Loader::Lines => lines_rows(path),
            #[cfg(feature = "sqlite")]
            Loader::Sqlite => sqlite_rows(path),
        }
    }
}

fn lines_rows(path: &Path) -> Result<Vec<Row>> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let mut rows = Vec::new();
    for line in content.lines() {
        let (mut rule, comment) = match line.split_once('#') {
            Some((rule, comment)) => (rule, Some(comment)),
            None => (line, None),
        };
        if comment.is_some() {
            // a rule followed by a comment cannot end in significant whitespace
            rule = rule.trim_end();
        }
        if rule.is_empty() {
            continue;
        }
        rows.push(vec![rule.to_string()]);
    }
    Ok(rows)
}

/// `pattern=target`, split at the first `=`.
pub(crate) fn split_rule_line(row: &Row) -> (Vec<String>, Vec<String>) {
    let line = row.first().map(String::as_str).unwrap_or_default();
    let (pattern, target) = line.split_once('=').unwrap_or((line, ""));
    (vec![pattern.to_string()], vec![target.to_string()])
}

/// External-resolver formats carry no rule data at all.
pub(crate) fn empty_rule(_row: &Row) -> (Vec<String>, Vec<String>) {
    (Vec::new(), Vec::new())
}

/// First column is the pattern, second the target.
#[cfg(feature = "sqlite")]
pub(crate) fn split_rule_row(row: &Row) -> (Vec<String>, Vec<String>) {
    let pattern = row.first().cloned().unwrap_or_default();
    let target = row.get(1).cloned().unwrap_or_default();
    (vec![pattern], vec![target])
}

/// Loader plus row preparation, as declared by a format.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadDepends {
    pub loader: Loader,
    pub prepare: Prepare,
}

// The configuration file stands between the dictionary list and the
// database on purpose: the database stays free to serve several
// dictionaries with different queries.
#[cfg(feature = "sqlite")]
#[derive(Debug, serde::Deserialize)]
struct SqliteConfig {
    db_path: String,
    #[serde(default)]
    connect_options: ConnectOptions,
    query: String,
}

#[cfg(feature = "sqlite")]
#[derive(Debug, Default, serde::Deserialize)]
struct ConnectOptions {
    #[serde(default)]
    read_only: bool,
}

#[cfg(feature = "sqlite")]
fn sqlite_rows(path: &Path) -> Result<Vec<Row>> {
    use rusqlite::{Connection, OpenFlags};

    let raw = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let config: SqliteConfig =
        serde_json::from_str(&raw).map_err(|source| Error::Config { path: path.to_path_buf(), source })?;

    let fail = |source| Error::Sqlite { path: path.to_path_buf(), source };
    let connection = if config.connect_options.read_only {
        Connection::open_with_flags(&config.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
    } else {
        Connection::open(&config.db_path)
    }
    .map_err(fail)?;

    let mut statement = connection.prepare(&config.query).map_err(fail)?;
    let columns = statement.column_count();
    let mut rows = Vec::new();
    let mut results = statement.query([]).map_err(fail)?;
    while let Some(row) = results.next().map_err(fail)? {
        let mut fields = Vec::with_capacity(columns);
        for column in 0..columns {
            fields.push(row.get::<_, String>(column).map_err(fail)?);
        }
        rows.push(fields);
    }
    Ok(rows)
}
