//! Competitor price lookup.
//!
//! Two interchangeable sources behind [`PriceSource`]: a simulated source
//! for exercising downstream code without network access, and a live source
//! that scrapes a configured URL with a CSS selector. Both uphold the same
//! contract: a lookup never errors, it returns `None`.

use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;
use scraper::{Html, Selector};
use ureq::Agent;

use crate::data::parse_price_text;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub trait PriceSource {
    /// Returns the competitor price for `product_id`, or `None` when the
    /// lookup fails for any reason.
    fn fetch(&self, product_id: &str) -> Option<f64>;
}

/// Simulated lookup: a short artificial delay, then a random price in
/// [10.0, 100.0] rounded to two decimals, or `None` with the configured
/// failure probability.
pub struct SimulatedSource {
    failure_probability: f64,
    max_delay: Duration,
}

impl SimulatedSource {
    pub fn new(failure_probability: f64) -> Self {
        Self {
            failure_probability,
            max_delay: Duration::from_millis(300),
        }
    }

    /// Caps the artificial delay; tests pass `Duration::ZERO`.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl PriceSource for SimulatedSource {
    fn fetch(&self, product_id: &str) -> Option<f64> {
        let mut rng = rand::rng();
        if !self.max_delay.is_zero() {
            let delay = rng.random_range(self.max_delay / 3..=self.max_delay);
            thread::sleep(delay);
        }
        if rng.random::<f64>() < self.failure_probability {
            info!("Simulated lookup found no price for {product_id}");
            return None;
        }
        let price = (rng.random_range(10.0..=100.0f64) * 100.0).round() / 100.0;
        info!("Simulated lookup found price {price:.2} for {product_id}");
        Some(price)
    }
}

/// Live lookup: GET the configured URL, extract the element at the CSS
/// selector, and parse its text as a price.
pub struct LiveSource {
    url: String,
    selector: String,
    http: Agent,
}

impl LiveSource {
    pub fn new(url: String, selector: String) -> Self {
        let http = ureq::AgentBuilder::new()
            .timeout_connect(HTTP_TIMEOUT)
            .timeout_read(HTTP_TIMEOUT)
            .timeout_write(HTTP_TIMEOUT)
            .build();
        Self {
            url,
            selector,
            http,
        }
    }

    /// Expands the `{product_id}` placeholder, when the URL carries one.
    fn resolve_url(&self, product_id: &str) -> String {
        self.url.replace("{product_id}", product_id)
    }
}

impl PriceSource for LiveSource {
    fn fetch(&self, product_id: &str) -> Option<f64> {
        let url = self.resolve_url(product_id);
        info!("Fetching competitor price for {product_id} from {url}");
        // ureq reports non-2xx statuses as errors, so one match covers
        // transport failures and bad statuses alike.
        let response = match self.http.get(&url).set("User-Agent", USER_AGENT).call() {
            Ok(response) => response,
            Err(err) => {
                warn!("Request to {url} failed: {err}");
                return None;
            }
        };
        let body = match response.into_string() {
            Ok(body) => body,
            Err(err) => {
                warn!("Reading response body from {url} failed: {err}");
                return None;
            }
        };
        extract_price(&body, &self.selector)
    }
}

/// Extracts the first element matching `selector` and parses its text as a
/// price. Split out from the HTTP path so it is testable offline.
pub fn extract_price(html: &str, selector: &str) -> Option<f64> {
    let selector = match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!("Invalid CSS selector '{selector}'");
            return None;
        }
    };
    let document = Html::parse_document(html);
    let Some(element) = document.select(&selector).next() else {
        warn!("CSS selector matched no element");
        return None;
    };
    let text = element.text().collect::<String>();
    let price = parse_price_text(&text);
    if price.is_none() {
        warn!("Could not parse price from text '{}'", text.trim());
    }
    price
}
