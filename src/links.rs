use scraper::{Html, Selector};
use url::Url;

use crate::config::Settings;

/// Picks problem document links out of a repository index page.
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    fallback_base: Option<Url>,
    suffix: String,
    marker: String,
}

impl LinkDiscoverer {
    pub fn new(settings: &Settings) -> Self {
        LinkDiscoverer {
            fallback_base: Url::parse(&settings.link_base).ok(),
            suffix: settings.doc_suffix.clone(),
            marker: settings.path_marker.clone(),
        }
    }

    /// Anchor targets resolved against `page_url`, kept when their path ends in
    /// the document suffix and contains the path marker. Page order is kept.
    /// If `page_url` does not parse, the configured link base is used instead.
    pub fn discover<'a>(&'a self, page_url: &str, html: &str) -> impl Iterator<Item = String> + 'a {
        let base = Url::parse(page_url).ok().or_else(|| self.fallback_base.clone());
        anchor_hrefs(html)
            .into_iter()
            .filter_map(move |href| resolve(base.as_ref(), &href))
            .filter(move |u| u.path().ends_with(&self.suffix) && u.path().contains(&self.marker))
            .map(String::from)
    }
}

fn resolve(base: Option<&Url>, href: &str) -> Option<Url> {
    match base {
        Some(b) => b.join(href).ok(),
        None => Url::parse(href).ok(),
    }
}

fn anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|h| h.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "https://github.com/a";

    #[test]
    fn keeps_only_problem_markdown() {
        let html = r#"<html><body>
            <a href="/a/problems/x.md">x</a>
            <a href="/a/other/y.md">y</a>
            <a href="/a/problems/z.txt">z</a>
        </body></html>"#;
        let d = LinkDiscoverer::new(&Settings::default());
        let found: Vec<String> = d.discover(INDEX, html).collect();
        assert_eq!(found, vec!["https://github.com/a/problems/x.md".to_string()]);
    }

    #[test]
    fn absolute_links_pass_through_in_order() {
        let html = r#"<a href="https://github.com/o/r/blob/master/problems/2.md">2</a>
            <a name="anchor-only">no href</a>
            <a href="https://github.com/o/r/blob/master/problems/1.md">1</a>"#;
        let d = LinkDiscoverer::new(&Settings::default());
        let found: Vec<String> = d.discover(INDEX, html).collect();
        assert_eq!(
            found,
            [
                "https://github.com/o/r/blob/master/problems/2.md",
                "https://github.com/o/r/blob/master/problems/1.md",
            ]
        );
    }

    #[test]
    fn page_without_anchors_yields_nothing() {
        let d = LinkDiscoverer::new(&Settings::default());
        assert_eq!(d.discover(INDEX, "<p>empty</p>").count(), 0);
    }

    #[test]
    fn relative_links_resolve_against_index_page() {
        let html = r#"<a href="problems/x.md">x</a> <a href="../other/problems/y.md">y</a>"#;
        let d = LinkDiscoverer::new(&Settings::default());
        let found: Vec<String> = d.discover("https://github.com/o/r/tree/master/", html).collect();
        assert_eq!(
            found,
            [
                "https://github.com/o/r/tree/master/problems/x.md",
                "https://github.com/o/r/tree/other/problems/y.md",
            ]
        );
    }

    #[test]
    fn unparseable_page_url_falls_back_to_link_base() {
        let html = r#"<a href="/o/r/blob/master/problems/x.md">x</a>"#;
        let d = LinkDiscoverer::new(&Settings::default());
        let found: Vec<String> = d.discover("not a url", html).collect();
        assert_eq!(found, ["https://github.com/o/r/blob/master/problems/x.md"]);
    }
}
