//! Announcement body formatting.
//!
//! Renders a repository into the Telegram HTML message that gets posted to
//! the channel. Pure and infallible: missing optional fields are simply
//! omitted from the output.

use crate::github::Repo;

/// Render the channel announcement for a repository.
///
/// Produces HTML (`parse_mode=HTML`): bold header and name, the description,
/// a links block with the repository URL and, when present, the homepage as
/// a demo link, then hashtags derived from the primary language (falling
/// back to `#Code`) and the repository name with `-`/`_` stripped.
pub fn format_message(repo: &Repo) -> String {
    let mut body = String::new();

    body.push_str("📌 <b>New repository</b>\n\n");
    body.push_str(&format!("<b>{}</b>\n\n", repo.name));

    if let Some(description) = repo.description.as_deref() {
        let description = description.trim();
        if !description.is_empty() {
            body.push_str("<b>Description:</b>\n");
            body.push_str(description);
            body.push_str("\n\n");
        }
    }

    body.push_str("<b>🔗 Links:</b>\n");
    body.push_str(&format!("├ Code: <a href=\"{}\">GitHub</a>\n", repo.html_url));
    if let Some(homepage) = repo.homepage.as_deref().filter(|h| !h.trim().is_empty()) {
        body.push_str(&format!("└ Demo: <a href=\"{}\">Live</a>\n", homepage));
    }

    body.push_str(&format!(
        "\n#{} #{}",
        repo.language.as_deref().unwrap_or("Code"),
        repo.name.replace(['-', '_'], "")
    ));

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(description: Option<&str>, homepage: Option<&str>, language: Option<&str>) -> Repo {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "my-cool_project",
            "description": description,
            "created_at": "2024-05-01T12:00:00Z",
            "html_url": "https://github.com/octocat/my-cool_project",
            "homepage": homepage,
            "language": language,
        }))
        .unwrap()
    }

    #[test]
    fn test_full_message() {
        let body = format_message(&repo(
            Some("Does cool things"),
            Some("https://cool.example.com"),
            Some("Rust"),
        ));

        assert!(body.starts_with("📌 <b>New repository</b>"));
        assert!(body.contains("<b>my-cool_project</b>"));
        assert!(body.contains("<b>Description:</b>\nDoes cool things"));
        assert!(body.contains("├ Code: <a href=\"https://github.com/octocat/my-cool_project\">GitHub</a>"));
        assert!(body.contains("└ Demo: <a href=\"https://cool.example.com\">Live</a>"));
        assert!(body.ends_with("#Rust #mycoolproject"));
    }

    #[test]
    fn test_homepage_omitted() {
        let body = format_message(&repo(Some("x"), None, Some("Go")));
        assert!(!body.contains("Demo"));
        assert!(body.contains("Code: <a href="));

        // Empty-string homepage (GitHub sends "" rather than null) also omits
        let body = format_message(&repo(Some("x"), Some(""), Some("Go")));
        assert!(!body.contains("Demo"));
    }

    #[test]
    fn test_language_fallback() {
        let body = format_message(&repo(Some("x"), None, None));
        assert!(body.ends_with("#Code #mycoolproject"));
    }

    #[test]
    fn test_description_trimmed() {
        let body = format_message(&repo(Some("  padded  "), None, None));
        assert!(body.contains("<b>Description:</b>\npadded\n"));
    }
}
