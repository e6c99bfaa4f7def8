use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder stored for country/region until a geolocation lookup resolves them
pub const UNKNOWN_LOCATION: &str = "Unknown";

fn unknown_location() -> String {
    UNKNOWN_LOCATION.to_string()
}

/// Kind of device a visitor browses from, derived from the user agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceType {
    /// Classify a user agent string.
    ///
    /// "Mobile" wins over "Tablet" because many tablet agents also carry the
    /// mobile marker; anything else is treated as a desktop browser.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("Mobile") {
            DeviceType::Mobile
        } else if user_agent.contains("Tablet") {
            DeviceType::Tablet
        } else {
            DeviceType::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "Desktop",
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = DeviceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Desktop" => Ok(DeviceType::Desktop),
            "Mobile" => Ok(DeviceType::Mobile),
            "Tablet" => Ok(DeviceType::Tablet),
            other => Err(DeviceTypeError::Unrecognized(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceTypeError {
    Unrecognized(String),
}

impl fmt::Display for DeviceTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceTypeError::Unrecognized(value) => write!(f, "Unrecognized device type: {}", value),
        }
    }
}

impl std::error::Error for DeviceTypeError {}

/// Payload posted by the page script to the tracking endpoint
///
/// Every field is optional on the wire; missing sequences are empty and a
/// missing location reads as "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEventRequest {
    /// URLs visited since the last event, oldest first
    #[serde(default)]
    pub page_urls: Vec<String>,
    /// Scroll depth sample per visited URL (same index as `page_urls`)
    #[serde(default)]
    pub scroll_depth: Vec<f64>,
    /// Seconds spent per visited URL (same index as `page_urls`)
    #[serde(default)]
    pub time_spent: Vec<f64>,
    #[serde(default = "unknown_location")]
    pub country: String,
    #[serde(default = "unknown_location")]
    pub region: String,
    #[serde(default)]
    pub utm_source: Option<String>,
}

impl Default for TrackingEventRequest {
    fn default() -> Self {
        Self {
            page_urls: Vec::new(),
            scroll_depth: Vec::new(),
            time_spent: Vec::new(),
            country: unknown_location(),
            region: unknown_location(),
            utm_source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub status: String,
}

impl TrackingResponse {
    pub fn success() -> Self {
        Self { status: "success".to_string() }
    }

    pub fn failure() -> Self {
        Self { status: "failure".to_string() }
    }
}

/// Form submission for a new blog post (uploads travel separately)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    /// Rich text body as produced by the editor
    pub content: String,
    pub author: String,
}

/// Form submission for a comment on a blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    /// Title of the post being commented on
    pub blog_post_title: String,
    pub author: String,
    pub text: String,
}
