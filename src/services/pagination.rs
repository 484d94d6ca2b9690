//! Keyset pagination over actualities.
//!
//! Rows are ordered by `is_pinned DESC, active_since DESC, id DESC`. A cursor
//! carries the whole sort key of the row it points at, so the next page can be
//! resumed with a single range condition instead of an offset.

use crate::api::error::AppError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, SecondsFormat, Utc};

const CURSOR_PREFIX: &str = "actuality:v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualityCursor {
    pub is_pinned: bool,
    pub active_since: DateTime<Utc>,
    pub id: i32,
}

impl ActualityCursor {
    pub fn new(is_pinned: bool, active_since: DateTime<Utc>, id: i32) -> Self {
        Self {
            is_pinned,
            active_since,
            id,
        }
    }

    pub fn encode(&self) -> String {
        let raw = format!(
            "{}|{}|{}|{}",
            CURSOR_PREFIX,
            u8::from(self.is_pinned),
            self.active_since
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.id
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn decode(token: &str) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidCursor(token.to_string());

        let bytes = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;

        let mut parts = raw.split('|');
        if parts.next() != Some(CURSOR_PREFIX) {
            return Err(invalid());
        }

        let is_pinned = match parts.next() {
            Some("1") => true,
            Some("0") => false,
            _ => return Err(invalid()),
        };
        let active_since = parts
            .next()
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|d| d.with_timezone(&Utc))
            .ok_or_else(invalid)?;
        let id = parts
            .next()
            .and_then(|v| v.parse::<i32>().ok())
            .ok_or_else(invalid)?;

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(is_pinned, active_since, id))
    }
}

/// A validated `first` / `after` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub first: u64,
    pub after: Option<ActualityCursor>,
}

impl PageRequest {
    /// Builds a request from raw connection arguments. A missing `first`
    /// falls back to `default_size`; anything above `max_size` is clamped.
    pub fn from_args(
        first: Option<i32>,
        after: Option<&str>,
        default_size: u64,
        max_size: u64,
    ) -> Result<Self, AppError> {
        let first = match first {
            None => default_size,
            Some(n) if n <= 0 => {
                return Err(AppError::validation(
                    "first",
                    "Page size must be a positive number",
                ));
            }
            Some(n) => n as u64,
        };

        let after = after
            .filter(|c| !c.is_empty())
            .map(ActualityCursor::decode)
            .transpose()?;

        Ok(Self {
            first: first.min(max_size.max(1)),
            after,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PageEdge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub edges: Vec<PageEdge<T>>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            has_next_page: false,
            has_previous_page: false,
        }
    }

    pub fn end_cursor(&self) -> Option<&str> {
        self.edges.last().map(|e| e.cursor.as_str())
    }

    /// Assembles a page from rows fetched with `limit = first + 1`; the extra
    /// row only signals that another page exists.
    pub fn from_rows<F>(mut rows: Vec<T>, request: &PageRequest, cursor_of: F) -> Self
    where
        F: Fn(&T) -> ActualityCursor,
    {
        let has_next_page = rows.len() as u64 > request.first;
        rows.truncate(request.first as usize);

        let edges = rows
            .into_iter()
            .map(|node| PageEdge {
                cursor: cursor_of(&node).encode(),
                node,
            })
            .collect();

        Self {
            edges,
            has_next_page,
            has_previous_page: request.after.is_some(),
        }
    }
}
