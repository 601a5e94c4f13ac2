use crate::config::HarvestConfig;
use crate::error::SessionError;
use crate::session::{Page, PageElement, Scope};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// A Chrome session driven over WebDriver
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Connects to the WebDriver server and starts a browser session
    pub async fn launch(config: &HarvestConfig) -> Result<Self, SessionError> {
        ::log::info!("Connecting to WebDriver at {}", config.webdriver_url);

        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_capabilities(config));

        let client = builder
            .connect(&config.webdriver_url)
            .await
            .map_err(|source| {
                ::log::error!(
                    "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
                );
                SessionError::Connect {
                    url: config.webdriver_url.clone(),
                    source,
                }
            })?;

        ::log::debug!(
            "Connected to WebDriver at {} (headless: {})",
            config.webdriver_url,
            config.headless
        );
        Ok(Self { client })
    }
}

/// Chrome options for running inside containers and CI
fn chrome_capabilities(config: &HarvestConfig) -> serde_json::Map<String, serde_json::Value> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        format!(
            "--window-size={},{}",
            config.window_width, config.window_height
        ),
        format!("--user-agent={}", config.user_agent),
    ];
    if config.headless {
        args.push("--headless".to_string());
    }

    let mut caps = serde_json::Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

impl Scope for WebDriverSession {
    type Element = Element;

    async fn find_all(&self, css: &str) -> Result<Vec<Element>, SessionError> {
        self.client
            .find_all(Locator::Css(css))
            .await
            .map_err(|e| SessionError::command("querying page", e))
    }
}

impl Page for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), SessionError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| SessionError::command("navigating", e))
    }

    async fn title(&self) -> Result<String, SessionError> {
        self.client
            .title()
            .await
            .map_err(|e| SessionError::command("reading title", e))
    }

    async fn wait_for_body(&self, timeout: Duration) -> Result<bool, SessionError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css("body"))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) => Err(SessionError::command("waiting for body", e)),
        }
    }

    async fn source(&self) -> Result<String, SessionError> {
        self.client
            .source()
            .await
            .map_err(|e| SessionError::command("reading page source", e))
    }

    async fn scroll_to_bottom(&self) -> Result<(), SessionError> {
        self.client
            .execute(SCROLL_TO_BOTTOM, vec![])
            .await
            .map(|_| ())
            .map_err(|e| SessionError::command("scrolling", e))
    }

    async fn close(self) -> Result<(), SessionError> {
        self.client
            .close()
            .await
            .map_err(|e| SessionError::command("closing session", e))
    }
}

impl Scope for Element {
    type Element = Element;

    async fn find_all(&self, css: &str) -> Result<Vec<Element>, SessionError> {
        Element::find_all(self, Locator::Css(css))
            .await
            .map_err(|e| SessionError::command("querying element", e))
    }
}

impl PageElement for Element {
    async fn text(&self) -> Result<String, SessionError> {
        Element::text(self)
            .await
            .map_err(|e| SessionError::command("reading element text", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_capabilities() {
        let caps = chrome_capabilities(&HarvestConfig::default());
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        let args: Vec<&str> = args.iter().filter_map(|a| a.as_str()).collect();
        assert!(args.contains(&"--no-sandbox"));
        assert!(args.contains(&"--disable-gpu"));
        assert!(args.contains(&"--window-size=1920,1080"));
        assert!(args.contains(&"--headless"));
        assert!(args.iter().any(|a| a.starts_with("--user-agent=Mozilla/5.0")));
    }

    #[test]
    fn test_headed_capabilities() {
        let config = HarvestConfig {
            headless: false,
            ..HarvestConfig::default()
        };
        let caps = chrome_capabilities(&config);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless"));
    }

    #[test]
    fn test_stale_reference_maps_to_stale_element() {
        use fantoccini::error::{ErrorStatus, WebDriver};

        let stale = CmdError::Standard(WebDriver::new(
            ErrorStatus::StaleElementReference,
            "element is not attached to the page document",
        ));
        assert!(matches!(
            SessionError::command("reading element text", stale),
            SessionError::StaleElement
        ));

        let missing = CmdError::Standard(WebDriver::new(ErrorStatus::NoSuchElement, "no such element"));
        assert!(matches!(
            SessionError::command("querying element", missing),
            SessionError::Command { context: "querying element", .. }
        ));
    }
}
