use serde::{Deserialize, Serialize};
use shared::{DeviceType, UNKNOWN_LOCATION};

/// Analytics profile for one browser session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorProfile {
    pub session_id: String,
    pub ip_address: String,
    pub utm_source: String,
    pub user_agent: String,
    pub device_type: DeviceType,
    /// Visited URLs in visit order
    pub page_urls: Vec<String>,
    /// Scroll depth sample for the URL at the same index
    pub scroll_depth: Vec<f64>,
    /// Time spent on the URL at the same index
    pub time_spent: Vec<f64>,
    pub country: String,
    pub region: String,
    /// Last time the session was seen
    pub date_time_visited: String,
}

impl VisitorProfile {
    /// True while either half of the location is still unresolved
    pub fn needs_location(&self) -> bool {
        self.country == UNKNOWN_LOCATION || self.region == UNKNOWN_LOCATION
    }

    /// Append a batch of page activity after the existing samples
    pub fn append_activity(&mut self, page_urls: Vec<String>, scroll_depth: Vec<f64>, time_spent: Vec<f64>) {
        self.page_urls.extend(page_urls);
        self.scroll_depth.extend(scroll_depth);
        self.time_spent.extend(time_spent);
    }
}

/// Input for creating a visitor profile
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisitorProfile {
    pub session_id: String,
    pub ip_address: String,
    pub utm_source: String,
    pub user_agent: String,
    pub device_type: DeviceType,
    pub page_urls: Vec<String>,
    pub scroll_depth: Vec<f64>,
    pub time_spent: Vec<f64>,
    pub country: String,
    pub region: String,
}

impl NewVisitorProfile {
    /// A profile with no activity yet and an unresolved location
    pub fn new(
        session_id: impl Into<String>,
        ip_address: impl Into<String>,
        utm_source: impl Into<String>,
        user_agent: impl Into<String>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            ip_address: ip_address.into(),
            utm_source: utm_source.into(),
            user_agent: user_agent.into(),
            device_type,
            page_urls: Vec::new(),
            scroll_depth: Vec::new(),
            time_spent: Vec::new(),
            country: UNKNOWN_LOCATION.to_string(),
            region: UNKNOWN_LOCATION.to_string(),
        }
    }

    pub fn into_profile(self, date_time_visited: String) -> VisitorProfile {
        VisitorProfile {
            session_id: self.session_id,
            ip_address: self.ip_address,
            utm_source: self.utm_source,
            user_agent: self.user_agent,
            device_type: self.device_type,
            page_urls: self.page_urls,
            scroll_depth: self.scroll_depth,
            time_spent: self.time_spent,
            country: self.country,
            region: self.region,
            date_time_visited,
        }
    }
}
