//! Places a record payload can come from.
//!
//! Every source hands back a single hex payload or a [`SourceError`]. Decoding the payload is left
//! to the caller, see [`crate::Session::apply`].

mod query;
mod simulated;
mod tag;

use async_trait::async_trait;

use crate::error::SourceError;

pub use query::QueryParamSource;
pub use simulated::SimulatedSource;
pub use tag::TagSource;

#[async_trait]
pub trait RecordSource: Send {
    /// Short human readable name, used in notifications and logs
    fn name(&self) -> &'static str;

    /// Read one payload from the source
    async fn read_payload(&mut self) -> Result<String, SourceError>;
}
