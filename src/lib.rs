//! Decode the battery specification record carried on battery pack NFC tags and in dashboard URLs
//!
//! The record is 16 bytes, usually handled as 32 hex characters, and holds the pack's
//! specification rather than live measurements.
//!
//! Currently the following data can be accessed:
//!
//! - Total capacity (mAh)
//! - Overcharge and overdischarge protection voltages (mV)
//! - Charge and discharge max temperatures (°C)
//! - Manufacturer and model
//! - Production date
//!
//! Decoding never fails. Short input is zero padded, unparseable hex pairs read as zero and unknown
//! manufacturer or model ids come back as an `Unknown` sentinel. Only reading the payload from a
//! [`RecordSource`] (a URL, an NFC tag or the simulator) can fail.
//!
//! # Example
//!
//! ```rust
//! let record = battag::decode("102712345678901234010100AABBCCDD");
//! assert_eq!(record.total_capacity_mah, 10000);
//! println!("{}", battag::Dashboard::new(&record));
//! ```
//!
//! Reading from a source:
//!
//! ```rust
//! # #[tokio::main]
//! # pub async fn main(){
//!     let mut session = battag::Session::new();
//!     let mut source = battag::QueryParamSource::new(
//!         "https://example.com/battery?data=102712345678901234010100aabbccdd",
//!     );
//!     let notification = session.read_from(&mut source).await;
//!     println!("{}", notification.message);
//!     println!("{}", session.dashboard());
//! # }
//! ```

mod battery_record;
mod dashboard;
mod error;
mod manufacturer;
pub mod ndef;
mod record_decoder;
mod record_generator;
mod session;
mod source;

pub use battery_record::{BatteryRecord, Temperature};
pub use dashboard::{ChargeLevel, Dashboard, Highlight, StatusCard};
pub use error::{NdefError, SourceError};
pub use manufacturer::{BatteryModel, Manufacturer};
pub use record_decoder::{decode, encode, IntoRecordBytes, RecordBytes};
pub use record_generator::{generate, RecordGenerator};
pub use session::{Notification, NotificationLevel, Session};
pub use source::{QueryParamSource, RecordSource, SimulatedSource, TagSource};
