use crate::config::Settings;

/// Rewrites repository "view" URLs into direct-content URLs.
///
/// `https://github.com/owner/repo/blob/master/problems/1.two-sum.md`
/// becomes `https://raw.githubusercontent.com/owner/repo/master/problems/1.two-sum.md`.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    view_host: String,
    raw_host: String,
    view_marker: String,
}

impl UrlNormalizer {
    pub fn new(settings: &Settings) -> Self {
        UrlNormalizer {
            view_host: settings.view_host.clone(),
            raw_host: settings.raw_host.clone(),
            view_marker: settings.view_marker.clone(),
        }
    }

    /// Total over any input; strings that are not view URLs come back unchanged.
    pub fn normalize(&self, url: &str) -> String {
        let (scheme, rest) = match url.split_once("://") {
            Some((s, r)) => (Some(s), r),
            None => (None, url),
        };
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));

        let is_view = host.eq_ignore_ascii_case(&self.view_host)
            || host.eq_ignore_ascii_case(&format!("www.{}", self.view_host));
        if !is_view {
            return url.to_string();
        }

        // owner/repo/<marker>/ref/path... → owner/repo/ref/path...
        let mut segments: Vec<&str> = path.split('/').collect();
        if segments.len() > 3 && segments[2] == self.view_marker {
            segments.remove(2);
        }
        let path = segments.join("/");

        let mut out = String::with_capacity(url.len());
        if let Some(s) = scheme {
            out.push_str(s);
            out.push_str("://");
        }
        out.push_str(&self.raw_host);
        if rest.contains('/') {
            out.push('/');
            out.push_str(&path);
        }
        out
    }
}

/// Last non-empty path segment, ignoring query and fragment.
pub fn last_segment(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end]
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
}
