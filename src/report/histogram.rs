use hdrhistogram::Histogram;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyPercentiles {
    pub p50_ms: u64,
    pub p90_ms: u64,
    pub p99_ms: u64,
    pub max_ms: u64,
}

#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, String> {
        let hist = Histogram::<u64>::new(3)
            .map_err(|err| format!("Failed to create histogram: {}", err))?;
        Ok(Self { hist })
    }

    /// Record a latency value in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, latency_ms: u64) -> Result<(), String> {
        let value = latency_ms.max(1);
        self.hist
            .record(value)
            .map_err(|err| format!("Failed to record latency: {}", err))
    }

    #[must_use]
    pub fn percentiles(&self) -> LatencyPercentiles {
        if self.count() == 0 {
            return LatencyPercentiles::default();
        }

        LatencyPercentiles {
            p50_ms: self.hist.value_at_quantile(0.5),
            p90_ms: self.hist.value_at_quantile(0.9),
            p99_ms: self.hist.value_at_quantile(0.99),
            max_ms: self.hist.max(),
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }
}
