use async_trait::async_trait;
use log::debug;
use tokio::time::Duration;

use crate::error::SourceError;
use crate::record_generator::RecordGenerator;
use crate::source::RecordSource;

/// Stands in for a tag reader when there is no hardware, producing a random record after a
/// short scanning delay.
pub struct SimulatedSource {
    generator: RecordGenerator,
    scan_delay: Duration,
}

impl SimulatedSource {
    const SCAN_DELAY_MS: u64 = 2000;

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            generator: RecordGenerator::new(seed),
            scan_delay: Duration::from_millis(Self::SCAN_DELAY_MS),
        }
    }

    pub fn with_delay(mut self, scan_delay: Duration) -> Self {
        self.scan_delay = scan_delay;
        self
    }
}

#[async_trait]
impl RecordSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn read_payload(&mut self) -> Result<String, SourceError> {
        if !self.scan_delay.is_zero() {
            tokio::time::sleep(self.scan_delay).await;
        }
        let payload = self.generator.next_hex();
        debug!("SIMULATED: Generated {payload}");
        Ok(payload)
    }
}

#[tokio::test]
async fn test_simulated_payload_decodes_to_known_ids() {
    let mut source = SimulatedSource::new(Some(3)).with_delay(Duration::ZERO);
    for _ in 0..20 {
        let record = crate::decode(&source.read_payload().await.unwrap());
        assert!(record.manufacturer.is_known());
        assert!(record.model.is_known());
    }
}

#[tokio::test]
async fn test_simulated_is_seeded() {
    let mut a = SimulatedSource::new(Some(9)).with_delay(Duration::ZERO);
    let mut b = SimulatedSource::new(Some(9)).with_delay(Duration::from_millis(1));
    assert_eq!(a.read_payload().await.unwrap(), b.read_payload().await.unwrap());
}
