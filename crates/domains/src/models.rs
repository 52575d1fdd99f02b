//! # Domain Models
//!
//! These structs represent the core entities of microblog. Field names on the
//! wire follow the account file layout (`Username`, `Password`, `ID`, ...).

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// `MM.DD.YYYY HH:MM:SS`, the format of [`Post::date`].
pub const POST_DATE_FORMAT: &str = "%m.%d.%Y %H:%M:%S";

/// A registered account together with its feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Unique, case-sensitive key. Also the account file name.
    pub username: String,
    /// Stored and compared in plaintext.
    pub password: String,
    /// Advisory sequence number handed out at registration.
    #[serde(rename = "ID")]
    pub id: u64,
    /// Number of posts ever appended through the ledger.
    pub post_count: u64,
    /// Newest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub posts: Vec<Post>,
}

impl User {
    /// A freshly registered user with an empty feed.
    pub fn new(username: impl Into<String>, password: impl Into<String>, id: u64) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            id,
            post_count: 0,
            posts: Vec::new(),
        }
    }
}

/// A single dated entry in a user's feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    pub title: String,
    pub body: String,
    /// Server-assigned, see [`POST_DATE_FORMAT`].
    pub date: String,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            date: date.into(),
        }
    }

    /// Builds a post stamped with the given wall-clock time.
    pub fn dated(title: impl Into<String>, body: impl Into<String>, at: NaiveDateTime) -> Self {
        Self::new(title, body, at.format(POST_DATE_FORMAT).to_string())
    }

    /// Builds a post stamped with the current local time.
    pub fn now(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::dated(title, body, Local::now().naive_local())
    }

    /// True for the all-empty placeholder that older ledgers could store.
    pub fn is_sentinel(&self) -> bool {
        self.title.is_empty() && self.body.is_empty() && self.date.is_empty()
    }
}

/// Result of checking a username/password pair against the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// No user with that username exists.
    NoMatch,
    /// The user exists but the password differs.
    WrongPassword,
    Correct,
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "no match"),
            Self::WrongPassword => write!(f, "wrong password"),
            Self::Correct => write!(f, "correct"),
        }
    }
}

// Files written with a nil slice carry `"Posts": null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Post>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Post>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
