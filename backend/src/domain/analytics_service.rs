//! Analytics service for visitor sessions.
//!
//! Two entry points mirror the two moments a session is seen:
//!
//! - **`record_visit`** runs for every page response and makes sure the session
//!   has a profile
//! - **`track`** handles the events the browser posts while a page is open,
//!   appending activity and filling in the visitor's location once
//!
//! Tracking calls the geolocation service only when neither the stored profile
//! nor the event knows where the visitor is.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use log::{debug, info, warn};
use shared::{DeviceType, TrackingEventRequest, UNKNOWN_LOCATION};
use std::sync::Arc;

use crate::domain::clock::now_in;
use crate::domain::models::{NewVisitorProfile, VisitorProfile};
use crate::io::geolocation::{GeoLocator, Location};
use crate::storage::traits::VisitorProfileStorage;

/// Paths that never create a profile
const UNTRACKED_PREFIXES: &[&str] = &["/track_analytics/", "/media/"];

/// What is known about a request when its response is sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitRequest {
    pub session_id: String,
    pub path: String,
    pub ip_address: String,
    pub user_agent: String,
    pub utm_source: Option<String>,
    /// Country supplied by the edge proxy, if any
    pub country_hint: Option<String>,
    pub region_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisitOutcome {
    /// The path is not tracked
    Skipped,
    /// The session already has a profile
    Existing,
    Created(VisitorProfile),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Updated(VisitorProfile),
    /// No profile for the session; nothing was written
    UnknownSession,
}

/// True when every URL in the event has one scroll depth and one duration
fn has_aligned_samples(event: &TrackingEventRequest) -> bool {
    event.scroll_depth.len() == event.page_urls.len() && event.time_spent.len() == event.page_urls.len()
}

#[derive(Clone)]
pub struct AnalyticsService {
    profiles: Arc<dyn VisitorProfileStorage>,
    locator: Arc<dyn GeoLocator>,
    time_zone: Tz,
}

impl AnalyticsService {
    pub fn new(profiles: Arc<dyn VisitorProfileStorage>, locator: Arc<dyn GeoLocator>, time_zone: Tz) -> Self {
        Self {
            profiles,
            locator,
            time_zone,
        }
    }

    /// Client address: first entry of `X-Forwarded-For`, else the peer address
    pub fn client_ip(x_forwarded_for: Option<&str>, remote_addr: &str) -> String {
        x_forwarded_for
            .and_then(|header| header.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(remote_addr)
            .to_string()
    }

    /// Make sure the session behind a page response has a profile
    pub fn record_visit(&self, request: VisitRequest) -> Result<VisitOutcome> {
        if UNTRACKED_PREFIXES
            .iter()
            .any(|prefix| request.path.starts_with(prefix))
        {
            return Ok(VisitOutcome::Skipped);
        }

        let existing = self
            .profiles
            .find(&request.session_id)
            .context("Failed to look up visitor profile")?;
        if existing.is_some() {
            return Ok(VisitOutcome::Existing);
        }

        let device_type = DeviceType::from_user_agent(&request.user_agent);
        let mut new_profile = NewVisitorProfile::new(
            request.session_id,
            request.ip_address,
            request.utm_source.unwrap_or_default(),
            request.user_agent,
            device_type,
        );
        new_profile.country = request
            .country_hint
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());
        new_profile.region = request
            .region_hint
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        let profile = self
            .profiles
            .create(new_profile)
            .context("Failed to create visitor profile")?;

        info!(
            "New visitor profile for session {} from {} ({})",
            profile.session_id, profile.ip_address, profile.device_type
        );
        Ok(VisitOutcome::Created(profile))
    }

    /// Fold one tracking event into the session's profile
    pub async fn track(
        &self,
        session_id: &str,
        client_ip: &str,
        event: TrackingEventRequest,
    ) -> Result<TrackOutcome> {
        let Some(mut profile) = self
            .profiles
            .find(session_id)
            .context("Failed to look up visitor profile")?
        else {
            info!("Tracking event for unknown session {}; ignored", session_id);
            return Ok(TrackOutcome::UnknownSession);
        };

        debug!(
            "Tracking {} page samples for session {}",
            event.page_urls.len(),
            session_id
        );
        if !has_aligned_samples(&event) {
            warn!(
                "Tracking event for session {} has {} urls, {} scroll depths and {} durations; stored as sent",
                session_id,
                event.page_urls.len(),
                event.scroll_depth.len(),
                event.time_spent.len()
            );
        }
        profile.append_activity(event.page_urls, event.scroll_depth, event.time_spent);

        if let Some(utm_source) = event.utm_source.filter(|utm| !utm.is_empty()) {
            profile.utm_source = utm_source;
        }

        if profile.needs_location() {
            let location = if event.country == UNKNOWN_LOCATION && event.region == UNKNOWN_LOCATION {
                self.locator.lookup(client_ip).await
            } else {
                Location::new(event.country, event.region)
            };
            profile.country = location.country;
            profile.region = location.region;
        }

        profile.date_time_visited = now_in(self.time_zone);

        self.profiles
            .update(&profile)
            .context("Failed to save visitor profile")?;

        Ok(TrackOutcome::Updated(profile))
    }
}
