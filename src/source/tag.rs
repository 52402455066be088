use async_trait::async_trait;
use futures_util::Stream;
use futures_util::StreamExt;
use log::{debug, warn};
use tokio::time::timeout;
use tokio::time::Duration;

use crate::error::SourceError;
use crate::ndef::NdefMessage;
use crate::source::RecordSource;

/// Reads the record from the text record of an NFC tag.
///
/// The platform NFC driver is abstracted as a stream of raw NDEF messages, one item per tag
/// that was read. Tags without a text record are skipped and the source keeps waiting for the
/// next read, until the read timeout expires.
pub struct TagSource<S> {
    reads: S,
    read_timeout: Duration,
}

impl<S> TagSource<S>
where
    S: Stream<Item = Result<Vec<u8>, SourceError>> + Send + Unpin,
{
    // How long to wait for a tag to be presented
    const READ_TIMEOUT_S: u64 = 30;

    pub fn new(reads: S) -> Self {
        Self { reads, read_timeout: Duration::from_secs(Self::READ_TIMEOUT_S) }
    }

    pub fn with_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

#[async_trait]
impl<S> RecordSource for TagSource<S>
where
    S: Stream<Item = Result<Vec<u8>, SourceError>> + Send + Unpin,
{
    fn name(&self) -> &'static str {
        "nfc"
    }

    async fn read_payload(&mut self) -> Result<String, SourceError> {
        loop {
            let read_result = timeout(self.read_timeout, self.reads.next()).await;

            match read_result {
                Err(_) => {
                    // timeout
                    return Err(SourceError::Timeout(self.read_timeout));
                }
                Ok(None) => {
                    debug!("TAG: End of read stream");
                    return Err(SourceError::Unavailable("tag reader closed".to_string()));
                }
                Ok(Some(Ok(data))) => {
                    let h_message = hex::encode(&data);
                    debug!("TAG: RX message: 0x{h_message}");

                    match NdefMessage::parse(&data)?.first_text() {
                        Some(text) => return Ok(text?),
                        None => debug!("TAG: No text record, waiting for the next tag"),
                    }
                }
                Ok(Some(Err(err))) => {
                    warn!("TAG: Read error: {err}");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
type TagRead = Result<Vec<u8>, SourceError>;

#[cfg(test)]
fn text_message(text: &str) -> Vec<u8> {
    NdefMessage::new(vec![crate::ndef::NdefRecord::text("en", text)]).to_bytes().unwrap()
}

#[tokio::test]
async fn test_reads_first_text_record() {
    let reads: Vec<TagRead> = vec![Ok(text_message("102712345678901234010100aabbccdd"))];
    let mut source = TagSource::new(futures_util::stream::iter(reads));
    assert_eq!(source.read_payload().await.unwrap(), "102712345678901234010100aabbccdd");
}

#[tokio::test]
async fn test_skips_tags_without_text() {
    use crate::ndef::NdefRecord;

    let uri = NdefMessage::new(vec![NdefRecord::new(NdefRecord::TNF_WELL_KNOWN, b"U", b"\x04x")]);
    let reads: Vec<TagRead> = vec![Ok(uri.to_bytes().unwrap()), Ok(text_message("ff"))];
    let mut source = TagSource::new(futures_util::stream::iter(reads));
    assert_eq!(source.read_payload().await.unwrap(), "ff");
}

#[tokio::test]
async fn test_end_of_stream_is_unavailable() {
    let mut source = TagSource::new(futures_util::stream::iter(Vec::<TagRead>::new()));
    assert!(matches!(source.read_payload().await, Err(SourceError::Unavailable(_))));
}

#[tokio::test]
async fn test_read_error_is_surfaced() {
    let reads: Vec<TagRead> = vec![Err(SourceError::Read("tag lost".to_string()))];
    let mut source = TagSource::new(futures_util::stream::iter(reads));
    assert!(matches!(source.read_payload().await, Err(SourceError::Read(_))));
}

#[tokio::test]
async fn test_malformed_message() {
    let reads: Vec<TagRead> = vec![Ok(vec![0xd1, 0x01])];
    let mut source = TagSource::new(futures_util::stream::iter(reads));
    assert!(matches!(
        source.read_payload().await,
        Err(SourceError::Ndef(crate::error::NdefError::Truncated))
    ));
}

#[tokio::test]
async fn test_timeout() {
    let reads = futures_util::stream::pending::<TagRead>();
    let mut source = TagSource::new(reads).with_timeout(Duration::from_millis(10));
    assert!(matches!(source.read_payload().await, Err(SourceError::Timeout(_))));
}
