//! Askama templates for the blog pages.

use askama::Template;
use domains::User;

/// Login form shown to visitors without a session.
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Set after a rejected attempt.
    pub failed: bool,
}

/// Registration form, optionally explaining why the last attempt failed.
#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub notice: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "register_success.html")]
pub struct RegisterSuccessTemplate;

#[derive(Template)]
#[template(path = "user_list.html")]
pub struct UserListTemplate {
    pub viewer: String,
    pub users: Vec<User>,
}

/// The signed-in user's own feed.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub viewer: String,
    pub user: User,
}

/// Someone else's feed, read-only.
#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub viewer: String,
    pub user: User,
}

#[derive(Template)]
#[template(path = "new_post.html")]
pub struct NewPostTemplate {
    pub viewer: String,
    /// Set after a post was rejected by validation.
    pub invalid: bool,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub viewer: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::Post;

    #[test]
    fn home_lists_posts_and_escapes_markup() {
        let mut user = User::new("alice", "secret1", 1);
        user.posts.push(Post::new("<b>hi</b>", "first post", "01.02.2024 10:11:12"));
        user.post_count = 1;

        let html = HomeTemplate {
            viewer: "alice".into(),
            user,
        }
        .render()
        .unwrap();
        assert!(!html.contains("<b>hi</b>"));
        assert!(html.contains("&#60;b&#62;hi&#60;/b&#62;"));
        assert!(html.contains("01.02.2024 10:11:12"));
        assert!(html.contains("/users/alice/newPost"));
    }

    #[test]
    fn empty_feed_has_placeholder() {
        let html = ProfileTemplate {
            viewer: "bob".into(),
            user: User::new("alice", "secret1", 1),
        }
        .render()
        .unwrap();
        assert!(html.contains("No posts yet"));
        assert!(!html.contains("/newPost"));
    }

    #[test]
    fn register_notice_is_optional() {
        let plain = RegisterTemplate { notice: None }.render().unwrap();
        assert!(!plain.contains("class=\"notice\""));

        let taken = RegisterTemplate {
            notice: Some("That username is already taken."),
        }
        .render()
        .unwrap();
        assert!(taken.contains("already taken"));
    }
}
