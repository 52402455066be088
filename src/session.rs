use chrono::{DateTime, Local};
use log::{error, info};

use crate::battery_record::BatteryRecord;
use crate::dashboard::Dashboard;
use crate::error::SourceError;
use crate::record_decoder::decode;
use crate::source::RecordSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A message for the user about the outcome of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: String) -> Self {
        match level {
            NotificationLevel::Error => error!("{message}"),
            _ => info!("{message}"),
        }
        Self { level, message }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// The record currently on display.
///
/// A successful read replaces the record wholesale. A failed read leaves the previous record in
/// place and only produces a notification.
pub struct Session {
    current: BatteryRecord,
    last_payload: Option<String>,
    last_update: DateTime<Local>,
}

impl Session {
    /// A session showing the default demo record
    pub fn new() -> Self {
        Self { current: BatteryRecord::default(), last_payload: None, last_update: Local::now() }
    }

    pub fn current(&self) -> &BatteryRecord {
        &self.current
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(&self.current)
    }

    /// The payload the current record was decoded from, `None` for the default record
    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }

    pub fn last_update(&self) -> DateTime<Local> {
        self.last_update
    }

    /// Read one payload from `source` and apply it
    pub async fn read_from<S>(&mut self, source: &mut S) -> Notification
    where
        S: RecordSource + ?Sized,
    {
        let outcome = source.read_payload().await;
        self.apply(source.name(), outcome)
    }

    /// Apply the outcome of a read from the source called `source_name`
    pub fn apply(
        &mut self,
        source_name: &str,
        outcome: Result<String, SourceError>,
    ) -> Notification {
        match outcome {
            Ok(payload) => {
                self.current = decode(&payload);
                self.last_payload = Some(payload);
                self.last_update = Local::now();
                Notification::new(
                    NotificationLevel::Success,
                    format!("{source_name}: data decoded"),
                )
            }
            Err(err @ SourceError::MissingParameter { .. }) => {
                Notification::new(NotificationLevel::Info, format!("{source_name}: {err}"))
            }
            Err(err) => {
                Notification::new(NotificationLevel::Error, format!("{source_name}: {err}"))
            }
        }
    }

    /// Go back to the default demo record
    pub fn reset(&mut self) -> Notification {
        self.current = BatteryRecord::default();
        self.last_payload = None;
        self.last_update = Local::now();
        Notification::new(NotificationLevel::Info, "reset to default data".to_string())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
const PAYLOAD: &str = "102712345678901234010100aabbccdd";

#[test]
fn test_starts_with_default_record() {
    let session = Session::new();
    assert_eq!(session.current(), &BatteryRecord::default());
    assert_eq!(session.last_payload(), None);
}

#[test]
fn test_success_replaces_record() {
    let mut session = Session::new();
    let notification = session.apply("url", Ok(PAYLOAD.to_string()));
    assert_eq!(notification.level, NotificationLevel::Success);
    assert_eq!(session.current(), &decode(PAYLOAD));
    assert_eq!(session.last_payload(), Some(PAYLOAD));
}

#[test]
fn test_failure_keeps_previous_record() {
    let mut session = Session::new();
    session.apply("url", Ok(PAYLOAD.to_string()));

    let notification =
        session.apply("nfc", Err(SourceError::Unavailable("no reader".to_string())));
    assert!(notification.is_error());
    assert_eq!(notification.message, "nfc: source unavailable: no reader");
    assert_eq!(session.current(), &decode(PAYLOAD));
    assert_eq!(session.last_payload(), Some(PAYLOAD));
}

#[test]
fn test_missing_parameter_is_informational() {
    let mut session = Session::new();
    let notification = session.apply("url", Err(SourceError::MissingParameter { name: "data" }));
    assert_eq!(notification.level, NotificationLevel::Info);
    assert_eq!(session.current(), &BatteryRecord::default());
}

#[test]
fn test_reset() {
    let mut session = Session::new();
    session.apply("url", Ok(PAYLOAD.to_string()));
    session.reset();
    assert_eq!(session.current(), &BatteryRecord::default());
    assert_eq!(session.last_payload(), None);
}

#[tokio::test]
async fn test_read_from_sources() {
    let mut session = Session::new();

    let url = format!("https://example.com/?data={PAYLOAD}");
    let mut url = crate::source::QueryParamSource::new(url);
    assert!(!session.read_from(&mut url).await.is_error());
    assert_eq!(session.current(), &decode(PAYLOAD));

    let mut simulated = crate::source::SimulatedSource::new(Some(1))
        .with_delay(tokio::time::Duration::ZERO);
    let dynamic: &mut dyn RecordSource = &mut simulated;
    assert!(!session.read_from(dynamic).await.is_error());
    assert!(session.current().manufacturer.is_known());
}
