use store::structs::{Link, User};

pub fn digest_subject(week: u32) -> String {
    format!("Your Weekly LinkLetter Digest - Week {week}")
}

/// Renders the digest email body: greeting header, a saved-count line and
/// one block per link with title, notes and tags.
pub fn digest_html(user: &User, links: &[Link], year: i32, week: u32) -> String {
    let plural = if links.len() == 1 { "" } else { "s" };
    let items = links.iter().map(link_html).collect::<Vec<String>>().join("\n");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Your Weekly LinkLetter Digest</title>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Your Weekly LinkLetter Digest</h1>
      <p>Week {week}, {year} &bull; {name}</p>
    </div>
    <div class="stats">You saved {count} link{plural} this week</div>
    <div class="content">
{items}
    </div>
    <div class="footer">
      <p>This digest was sent from <strong>LinkLetter</strong>.
      You can update your preferences at any time in your settings.</p>
    </div>
  </div>
</body>
</html>"#,
        name = escape(user.display_name()),
        count = links.len(),
    )
}

fn link_html(link: &Link) -> String {
    let mut block = format!(
        r#"      <div class="link-item">
        <a href="{url}" class="link-url">{title}</a>"#,
        url = escape(&link.url),
        title = escape(&link.title),
    );

    if !link.notes.is_empty() {
        block.push_str(&format!(
            "\n        <div class=\"link-notes\">{}</div>",
            escape(&link.notes)
        ));
    }

    let tags = link
        .tag_list()
        .iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", escape(t)))
        .collect::<Vec<String>>()
        .join(" ");
    if !tags.is_empty() {
        block.push_str(&format!("\n        <div class=\"link-tags\">{tags}</div>"));
    }

    block.push_str("\n      </div>");
    block
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::query::tests::link;
    use chrono::{TimeZone, Utc};
    use store::structs::TIER_FREE;

    fn user() -> User {
        User {
            id: 1,
            email: "ada@example.org".to_string(),
            first_name: "Ada".to_string(),
            last_name: String::new(),
            tier: TIER_FREE.to_string(),
            email_verified: true,
            email_notifications: true,
            account_created: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_digest_html_contains_links_and_greeting() {
        let links = vec![
            link(1, "Go Concurrency", "https://go.dev/x", "", "go,concurrency"),
            link(2, "Rust Book", "https://doc.rust-lang.org", "ownership guide", "rust"),
        ];
        let html = digest_html(&user(), &links, 2023, 24);

        assert!(html.contains("Week 24, 2023"));
        assert!(html.contains("Ada"));
        assert!(html.contains("You saved 2 links this week"));
        assert!(html.contains("https://go.dev/x"));
        assert!(html.contains("ownership guide"));
        assert!(html.contains("<span class=\"tag\">concurrency</span>"));
    }

    #[test]
    fn test_digest_html_escapes_markup() {
        let links = vec![link(1, "a <b> & c", "https://example.org", "", "")];
        let html = digest_html(&user(), &links, 2023, 24);

        assert!(html.contains("a &lt;b&gt; &amp; c"));
        assert!(!html.contains("a <b> & c"));
    }

    #[test]
    fn test_subject_names_week() {
        assert_eq!(
            digest_subject(24),
            "Your Weekly LinkLetter Digest - Week 24"
        );
    }
}
