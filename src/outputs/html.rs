//! HTML rendering for the email digest.
//!
//! Articles are rendered into one `<p>` fragment each; [`compose`] then wraps
//! the fragments into the full document and derives the subject line.
//!
//! Field values are inserted verbatim. NewsAPI descriptions occasionally carry
//! inline markup and the digest passes it through unchanged.

use crate::models::{Article, Digest};
use crate::utils::long_date;
use tracing::{debug, instrument};

/// Fixed subject prefix; the long-form date follows after an en dash.
pub const SUBJECT_PREFIX: &str = "AI & Tech News Digest";

/// Footer line appended below the articles.
pub const FOOTER: &str = "Generated automatically by daily_news_digest.";

/// A finished email: subject line plus HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDigest {
    pub subject: String,
    pub html_body: String,
}

/// Render one article as a digest fragment.
pub fn render_article(article: &Article) -> String {
    format!(
        "<p><strong>{}</strong><br>{}<br><a href='{}'>Read more</a></p>",
        article.title,
        article.description_or_placeholder(),
        article.url
    )
}

/// Subject line for a digest covering `digest`'s target date.
pub fn subject_line(digest: &Digest) -> String {
    format!("{} – {}", SUBJECT_PREFIX, long_date(digest.target_date))
}

/// Build the subject and HTML document for a non-empty digest.
#[instrument(level = "debug", skip_all, fields(date = %digest.target_date, articles = digest.len()))]
pub fn compose(digest: &Digest) -> ComposedDigest {
    let date_label = long_date(digest.target_date);
    let html_body = format!(
        "<html>\n  <body>\n    <h2>Top AI/Tech News for {date_label}</h2>\n    {articles}\n    <hr>\n    <p style='font-size:12px;'>{FOOTER}</p>\n  </body>\n</html>\n",
        articles = digest.fragments.concat(),
    );
    debug!(bytes = html_body.len(), "Composed digest HTML");

    ComposedDigest {
        subject: subject_line(digest),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_DESCRIPTION;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn article(title: &str, description: Option<&str>, url: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.map(str::to_string),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_render_article_fragment() {
        let fragment = render_article(&article("T1", Some("D1"), "http://u1"));
        assert_eq!(
            fragment,
            "<p><strong>T1</strong><br>D1<br><a href='http://u1'>Read more</a></p>"
        );
    }

    #[test]
    fn test_render_article_placeholder() {
        let fragment = render_article(&article("T1", None, "http://u1"));
        assert!(fragment.contains(NO_DESCRIPTION));
    }

    #[test]
    fn test_subject_uses_long_date() {
        let digest = Digest::new(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(), vec![]);
        assert_eq!(subject_line(&digest), "AI & Tech News Digest – May 05, 2025");
    }

    #[test]
    fn test_compose_keeps_fragment_order() {
        let digest = Digest::new(
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            vec!["<p>first</p>".to_string(), "<p>second</p>".to_string()],
        );
        let composed = compose(&digest);

        assert!(composed.html_body.contains("<h2>Top AI/Tech News for December 31, 2025</h2>"));
        assert!(composed.html_body.contains("<p>first</p><p>second</p>"));
        assert!(composed.html_body.contains(FOOTER));
        assert!(composed.subject.ends_with("December 31, 2025"));

        let first = composed.html_body.find("first").unwrap();
        let hr = composed.html_body.find("<hr>").unwrap();
        assert!(first < hr);
    }
}
