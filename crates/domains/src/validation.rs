//! # Validation Rules
//!
//! Pure predicates over raw field values, composed into per-entity checks that
//! report every violated field rather than a bare pass/fail.

use std::fmt;

use crate::models::{Post, User};

pub const CREDENTIAL_MIN_LEN: usize = 3;
pub const CREDENTIAL_MAX_LEN: usize = 16;
pub const TITLE_MAX_LEN: usize = 30;
pub const BODY_MAX_LEN: usize = 300;

/// One field that failed its rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: String,
}

/// Every rule an entity broke, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Names of the violated fields.
    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} {}", v.field, v.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collects violations and turns them into a `Result` at the end.
#[derive(Default)]
struct Report {
    violations: Vec<FieldViolation>,
}

impl Report {
    fn check(&mut self, ok: bool, field: &'static str, reason: impl Into<String>) -> &mut Self {
        if !ok {
            self.violations.push(FieldViolation {
                field,
                reason: reason.into(),
            });
        }
        self
    }

    fn finish(&mut self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: std::mem::take(&mut self.violations),
            })
        }
    }
}

fn credential(s: &str) -> bool {
    let len = s.chars().count();
    (CREDENTIAL_MIN_LEN..=CREDENTIAL_MAX_LEN).contains(&len)
        && s.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn valid_username(s: &str) -> bool {
    credential(s)
}

pub fn valid_password(s: &str) -> bool {
    credential(s)
}

/// 1 to `max_len` characters, all ASCII.
pub fn valid_post_field(s: &str, max_len: usize) -> bool {
    let len = s.chars().count();
    (1..=max_len).contains(&len) && s.is_ascii()
}

fn credential_reason() -> String {
    format!("must be {CREDENTIAL_MIN_LEN}-{CREDENTIAL_MAX_LEN} ASCII letters or digits")
}

/// Checks a registration attempt before any user is built from it.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    Report::default()
        .check(valid_username(username), "username", credential_reason())
        .check(valid_password(password), "password", credential_reason())
        .finish()
}

/// Checks the constrained fields of a user. Stored posts are not re-checked.
pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    Report::default()
        .check(valid_username(&user.username), "username", credential_reason())
        .check(valid_password(&user.password), "password", credential_reason())
        .check(user.id >= 1, "id", "must be assigned")
        .finish()
}

fn post_checks(post: &Post) -> Report {
    let mut report = Report::default();
    report
        .check(
            valid_post_field(&post.title, TITLE_MAX_LEN),
            "title",
            format!("must be 1-{TITLE_MAX_LEN} ASCII characters"),
        )
        .check(
            valid_post_field(&post.body, BODY_MAX_LEN),
            "body",
            format!("must be 1-{BODY_MAX_LEN} ASCII characters"),
        );
    report
}

pub fn validate_post(post: &Post) -> Result<(), ValidationError> {
    post_checks(post).finish()
}

/// Checks `candidate` and that `user`'s post counter has room for one more.
pub fn validate_append(user: &User, candidate: &Post) -> Result<(), ValidationError> {
    post_checks(candidate)
        .check(
            user.post_count.checked_add(1).is_some(),
            "post_count",
            "cannot grow any further",
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ab", false)]
    #[case("abc", true)]
    #[case("abcdefghijklmnop", true)]
    #[case("abcdefghijklmnopq", false)]
    #[case("Alice99", true)]
    #[case("al ice", false)]
    #[case("al_ice", false)]
    #[case("ålice", false)]
    #[case("", false)]
    fn credential_boundaries(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(valid_username(input), expected);
        assert_eq!(valid_password(input), expected);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(30, true)]
    #[case(31, false)]
    fn title_length_boundaries(#[case] len: usize, #[case] expected: bool) {
        let title = "t".repeat(len);
        assert_eq!(valid_post_field(&title, TITLE_MAX_LEN), expected);
    }

    #[test]
    fn body_allows_punctuation_but_not_unicode() {
        assert!(valid_post_field("Hello, world! <b>ok</b>", BODY_MAX_LEN));
        assert!(!valid_post_field("caf\u{e9}", BODY_MAX_LEN));
        assert!(valid_post_field(&"b".repeat(300), BODY_MAX_LEN));
        assert!(!valid_post_field(&"b".repeat(301), BODY_MAX_LEN));
    }

    #[test]
    fn validate_post_lists_every_bad_field() {
        let err = validate_post(&Post::new("", "caf\u{e9}", "01.02.2024 10:00:00"))
            .expect_err("both fields are invalid");
        assert_eq!(err.fields(), vec!["title", "body"]);
        assert!(err.to_string().contains("title must be 1-30"));
    }

    #[test]
    fn validate_post_ignores_date() {
        assert!(validate_post(&Post::new("title", "body", "")).is_ok());
    }

    #[test]
    fn validate_credentials_reports_both_fields() {
        let err = validate_credentials("x", "p@ss").expect_err("invalid");
        assert_eq!(err.fields(), vec!["username", "password"]);
        assert!(validate_credentials("alice", "secret1").is_ok());
    }

    #[test]
    fn validate_user_requires_an_id() {
        let user = User::new("alice", "secret1", 0);
        assert_eq!(validate_user(&user).expect_err("no id").fields(), vec!["id"]);
        assert!(validate_user(&User::new("alice", "secret1", 7)).is_ok());
    }

    #[test]
    fn append_needs_room_in_the_post_counter() {
        let mut user = User::new("alice", "secret1", 1);
        let post = Post::new("title", "body", "01.02.2024 10:00:00");
        assert!(validate_append(&user, &post).is_ok());

        user.post_count = u64::MAX;
        let err = validate_append(&user, &post).expect_err("counter is full");
        assert_eq!(err.fields(), vec!["post_count"]);
    }

    #[test]
    fn validation_does_not_touch_input() {
        let post = Post::new("", "", "");
        let before = post.clone();
        let _ = validate_post(&post);
        assert_eq!(post, before);
    }
}
