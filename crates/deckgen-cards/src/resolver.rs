//! Page title resolution for bare URL paragraphs.
//!
//! A failed lookup never aborts conversion: callers fall back to showing the
//! URL itself via [`link_text`].

use std::time::Duration;

use deckgen_config::ResolverConfig;
use ureq::Agent;

/// Looks up a human-readable title for a URL.
pub trait TitleResolver {
    /// Return the page title, or `None` if it cannot be determined.
    fn resolve(&self, url: &str) -> Option<String>;
}

/// Resolver that never performs network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineResolver;

impl TitleResolver for OfflineResolver {
    fn resolve(&self, _url: &str) -> Option<String> {
        None
    }
}

/// Title lookup failure (logged, never surfaced).
#[derive(Debug, thiserror::Error)]
enum ResolveError {
    #[error("HTTP request failed: {0}")]
    Request(#[source] ureq::Error),
    #[error("unreadable response body: {0}")]
    Body(#[source] ureq::Error),
    #[error("no <title> in response")]
    NoTitle,
}

/// Resolver that fetches the page over HTTP and reads its `<title>`.
pub struct HttpTitleResolver {
    agent: Agent,
    user_agent: String,
}

impl HttpTitleResolver {
    #[must_use]
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            agent: create_agent(config.timeout),
            user_agent: config.user_agent.clone(),
        }
    }

    fn fetch_title(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(ResolveError::Request)?;

        // Error pages still carry a usable title.
        let mut body_reader = response.into_body();
        let body = body_reader.read_to_string().map_err(ResolveError::Body)?;

        extract_title(&body)
            .map(str::to_owned)
            .ok_or(ResolveError::NoTitle)
    }
}

impl TitleResolver for HttpTitleResolver {
    fn resolve(&self, url: &str) -> Option<String> {
        match self.fetch_title(url) {
            Ok(title) => Some(title),
            Err(e) => {
                tracing::debug!(url, error = %e, "Falling back to URL as link text");
                None
            }
        }
    }
}

/// Create HTTP agent with the specified timeout.
///
/// Non-2xx statuses are returned as responses rather than errors.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Extract the text between the first `<title>` and the following `</title>`.
///
/// Returns `None` when either tag is missing or the title is blank.
pub fn extract_title(body: &str) -> Option<&str> {
    const OPEN: &str = "<title>";
    const CLOSE: &str = "</title>";

    let start = body.find(OPEN)? + OPEN.len();
    let len = body[start..].find(CLOSE)?;
    let title = body[start..start + len].trim();
    (!title.is_empty()).then_some(title)
}

/// Link text for `url`: its resolved title, or the URL itself.
pub fn link_text(resolver: &dyn TitleResolver, url: &str) -> String {
    resolver.resolve(url).unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port and return its URL.
    fn serve_once(body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/page", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.ends_with(b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><head><title>Rust</title></head></html>"),
            Some("Rust")
        );
    }

    #[test]
    fn test_extract_title_trims_whitespace() {
        assert_eq!(extract_title("<title>\n  The Book \n</title>"), Some("The Book"));
    }

    #[test]
    fn test_extract_title_first_occurrence() {
        assert_eq!(
            extract_title("<title>First</title><title>Second</title>"),
            Some("First")
        );
    }

    #[test]
    fn test_extract_title_missing() {
        assert_eq!(extract_title("<html><body>no title</body></html>"), None);
        assert_eq!(extract_title("<title>unterminated"), None);
        assert_eq!(extract_title("<title></title>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }

    #[test]
    fn test_offline_resolver_falls_back_to_url() {
        assert_eq!(
            link_text(&OfflineResolver, "https://example.com"),
            "https://example.com"
        );
    }

    #[test]
    fn test_http_resolver_reads_title_and_sends_user_agent() {
        let (url, handle) = serve_once("<html><title>Local Page</title></html>");
        let resolver = HttpTitleResolver::new(&ResolverConfig::default());

        assert_eq!(resolver.resolve(&url), Some("Local Page".to_owned()));

        let request = handle.join().unwrap().to_lowercase();
        assert!(request.contains("user-agent: mozilla/5.0"));
    }

    #[test]
    fn test_http_resolver_page_without_title() {
        let (url, handle) = serve_once("<html><body>nothing</body></html>");
        let resolver = HttpTitleResolver::new(&ResolverConfig::default());

        assert_eq!(link_text(&resolver, &url), url);
        handle.join().unwrap();
    }

    #[test]
    fn test_http_resolver_unreachable_url() {
        // Bind then drop to get a port with nothing listening.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/");
        let resolver = HttpTitleResolver::new(&ResolverConfig {
            timeout: Duration::from_secs(2),
            ..ResolverConfig::default()
        });

        assert_eq!(link_text(&resolver, &url), url);
    }

    #[test]
    fn test_http_resolver_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/slow", listener.local_addr().unwrap());
        let (release, released) = std::sync::mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            // Hold the connection open without ever answering.
            let (_stream, _) = listener.accept().unwrap();
            let _ = released.recv();
        });
        let resolver = HttpTitleResolver::new(&ResolverConfig {
            timeout: Duration::from_secs(1),
            ..ResolverConfig::default()
        });

        let started = std::time::Instant::now();
        assert_eq!(link_text(&resolver, &url), url);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(900), "returned after {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "returned after {elapsed:?}");

        release.send(()).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_http_resolver_invalid_url() {
        let resolver = HttpTitleResolver::new(&ResolverConfig::default());
        assert_eq!(resolver.resolve("http not a url"), None);
    }
}
