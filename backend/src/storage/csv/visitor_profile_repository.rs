//! # CSV Visitor Profile Repository
//!
//! Session analytics stored in `{data_directory}/visitorprofiles.csv`.
//!
//! The three activity columns (`page_urls`, `scroll_depth`, `time_spent`) hold
//! JSON arrays inside a single CSV field. Readers also accept arrays written
//! with spaces after the commas (`[10, 20]`).

use log::{debug, info};
use shared::DeviceType;

use super::cell_codec::{decode_sequence, encode_sequence};
use super::connection::CsvConnection;
use super::repository::{CsvRecord, CsvRepository};
use super::table::CsvRow;
use crate::domain::clock::now_in;
use crate::domain::models::{NewVisitorProfile, VisitorProfile};
use crate::error::StorageResult;
use crate::storage::traits::{DeleteOutcome, UpdateOutcome, VisitorProfileStorage};

impl CsvRecord for VisitorProfile {
    const HEADERS: &'static [&'static str] = &[
        "session_id",
        "ip_address",
        "utm_source",
        "user_agent",
        "device_type",
        "page_urls",
        "scroll_depth",
        "time_spent",
        "country",
        "region",
        "date_time_visited",
    ];

    fn to_row(&self) -> StorageResult<Vec<String>> {
        Ok(vec![
            self.session_id.clone(),
            self.ip_address.clone(),
            self.utm_source.clone(),
            self.user_agent.clone(),
            self.device_type.to_string(),
            encode_sequence("page_urls", &self.page_urls)?,
            encode_sequence("scroll_depth", &self.scroll_depth)?,
            encode_sequence("time_spent", &self.time_spent)?,
            self.country.clone(),
            self.region.clone(),
            self.date_time_visited.clone(),
        ])
    }

    fn from_row(row: &CsvRow) -> Result<Self, String> {
        let device_type = row.get("device_type").parse::<DeviceType>().map_err(|e| e.to_string())?;
        let page_urls = decode_sequence("page_urls", row.get("page_urls")).map_err(|e| e.to_string())?;
        let scroll_depth = decode_sequence("scroll_depth", row.get("scroll_depth")).map_err(|e| e.to_string())?;
        let time_spent = decode_sequence("time_spent", row.get("time_spent")).map_err(|e| e.to_string())?;

        Ok(VisitorProfile {
            session_id: row.get("session_id").to_string(),
            ip_address: row.get("ip_address").to_string(),
            utm_source: row.get("utm_source").to_string(),
            user_agent: row.get("user_agent").to_string(),
            device_type,
            page_urls,
            scroll_depth,
            time_spent,
            country: row.get("country").to_string(),
            region: row.get("region").to_string(),
            date_time_visited: row.get("date_time_visited").to_string(),
        })
    }
}

#[derive(Clone)]
pub struct VisitorProfileRepository {
    connection: CsvConnection,
    records: CsvRepository<VisitorProfile>,
}

impl VisitorProfileRepository {
    pub fn new(connection: CsvConnection) -> Self {
        let records = CsvRepository::new(connection.config().visitor_profiles_file());
        Self { connection, records }
    }
}

impl VisitorProfileStorage for VisitorProfileRepository {
    fn create(&self, new_profile: NewVisitorProfile) -> StorageResult<VisitorProfile> {
        let profile = new_profile.into_profile(now_in(self.connection.config().time_zone));

        self.records.append(&profile)?;

        info!(
            "Stored visitor profile for session {} ({})",
            profile.session_id, profile.device_type
        );
        Ok(profile)
    }

    fn all(&self) -> StorageResult<Vec<VisitorProfile>> {
        let profiles = self.records.load()?;
        debug!("Loaded {} visitor profiles", profiles.len());
        Ok(profiles)
    }

    fn find(&self, session_id: &str) -> StorageResult<Option<VisitorProfile>> {
        Ok(self
            .records
            .load()?
            .into_iter()
            .find(|profile| profile.session_id == session_id))
    }

    fn update(&self, profile: &VisitorProfile) -> StorageResult<UpdateOutcome> {
        let mut profiles = self.records.load()?;
        let mut matched = 0;
        for stored in profiles
            .iter_mut()
            .filter(|stored| stored.session_id == profile.session_id)
        {
            stored.page_urls = profile.page_urls.clone();
            stored.scroll_depth = profile.scroll_depth.clone();
            stored.time_spent = profile.time_spent.clone();
            stored.utm_source = profile.utm_source.clone();
            stored.country = profile.country.clone();
            stored.region = profile.region.clone();
            stored.date_time_visited = profile.date_time_visited.clone();
            matched += 1;
        }

        if matched == 0 {
            info!("No visitor profile for session {}; nothing updated", profile.session_id);
            return Ok(UpdateOutcome::Unchanged);
        }

        self.records.replace_all(&profiles)?;

        debug!("Updated {} visitor profiles for session {}", matched, profile.session_id);
        Ok(UpdateOutcome::Updated { matched })
    }

    fn delete(&self, session_id: &str) -> StorageResult<DeleteOutcome> {
        let mut profiles = self.records.load()?;
        let before = profiles.len();
        profiles.retain(|profile| profile.session_id != session_id);
        let removed = before - profiles.len();

        if removed == 0 {
            return Ok(DeleteOutcome::Unchanged);
        }

        self.records.replace_all(&profiles)?;

        info!("Deleted {} visitor profiles for session {}", removed, session_id);
        Ok(DeleteOutcome::Deleted { removed })
    }
}
