//! Running sample statistics in unsigned and signed views.

use std::fmt;

use serde::Serialize;

/// One decoded scalar sample in both interpretations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Raw value read as unsigned.
    pub unsigned: u16,
    /// Two's-complement reinterpretation (16-bit) or the raw byte value (8-bit).
    pub signed: i16,
}

impl Sample {
    /// Sample from a little-endian 16-bit word.
    pub fn from_pcm16(raw: u16) -> Self {
        Self {
            unsigned: raw,
            signed: raw as i16,
        }
    }

    /// Sample from an 8-bit byte; both views hold the byte value unchanged.
    pub fn from_pcm8(raw: u8) -> Self {
        Self {
            unsigned: u16::from(raw),
            signed: i16::from(raw),
        }
    }
}

/// Count, sum and extremes accumulated over one data chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningStatistics {
    count: u64,
    unsigned_sum: u64,
    signed_sum: i64,
    unsigned_min: u16,
    unsigned_max: u16,
    signed_min: i16,
    signed_max: i16,
}

impl Default for RunningStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStatistics {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            unsigned_sum: 0,
            signed_sum: 0,
            unsigned_min: u16::MAX,
            unsigned_max: u16::MIN,
            signed_min: i16::MAX,
            signed_max: i16::MIN,
        }
    }

    /// Folds one sample into the running totals.
    pub fn record(&mut self, sample: Sample) {
        self.count += 1;
        self.unsigned_sum += u64::from(sample.unsigned);
        self.signed_sum += i64::from(sample.signed);
        self.unsigned_min = self.unsigned_min.min(sample.unsigned);
        self.unsigned_max = self.unsigned_max.max(sample.unsigned);
        self.signed_min = self.signed_min.min(sample.signed);
        self.signed_max = self.signed_max.max(sample.signed);
    }

    /// Number of scalar samples recorded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Builds the end-of-chunk report, or `None` if nothing was recorded.
    pub fn report(&self, sample_rate: u32) -> Option<StatisticsReport> {
        if self.count == 0 {
            return None;
        }

        let count = self.count as f64;
        let duration_seconds = if sample_rate > 0 {
            count / f64::from(sample_rate)
        } else {
            0.0
        };

        Some(StatisticsReport {
            samples: self.count,
            duration_seconds,
            unsigned: ViewSummary {
                min: i64::from(self.unsigned_min),
                max: i64::from(self.unsigned_max),
                mean: self.unsigned_sum as f64 / count,
            },
            signed: ViewSummary {
                min: i64::from(self.signed_min),
                max: i64::from(self.signed_max),
                mean: self.signed_sum as f64 / count,
            },
        })
    }
}

/// Extremes and mean for one interpretation of the samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewSummary {
    /// Smallest value.
    pub min: i64,
    /// Largest value.
    pub max: i64,
    /// Arithmetic mean.
    pub mean: f64,
}

/// Summary reported after a data chunk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsReport {
    /// Scalar samples across all channels.
    pub samples: u64,
    /// `samples / sample_rate`, in seconds.
    pub duration_seconds: f64,
    /// Unsigned view.
    pub unsigned: ViewSummary,
    /// Signed view.
    pub signed: ViewSummary,
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "samples:  {:6} = {:8.3} s",
            self.samples, self.duration_seconds
        )?;
        writeln!(
            f,
            "unsigned: minimal={:6} maximal={:6} average={:6.1}",
            self.unsigned.min, self.unsigned.max, self.unsigned.mean
        )?;
        writeln!(
            f,
            "signed:   minimal={:6} maximal={:6} average={:7.1}",
            self.signed.min, self.signed.max, self.signed.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pcm16_views() {
        let sample = Sample::from_pcm16((-50i16) as u16);
        assert_eq!(sample.unsigned, 65486);
        assert_eq!(sample.signed, -50);
    }

    #[test]
    fn test_pcm8_views_are_equal() {
        let sample = Sample::from_pcm8(200);
        assert_eq!(sample.unsigned, 200);
        assert_eq!(sample.signed, 200);
    }

    #[test]
    fn test_empty_has_no_report() {
        assert!(RunningStatistics::new().report(8000).is_none());
    }

    #[test]
    fn test_two_sample_report() {
        let mut stats = RunningStatistics::new();
        stats.record(Sample::from_pcm16(100));
        stats.record(Sample::from_pcm16((-50i16) as u16));

        let report = stats.report(8000).unwrap();
        assert_eq!(report.samples, 2);
        assert_eq!(report.duration_seconds, 2.0 / 8000.0);
        assert_eq!(report.signed.min, -50);
        assert_eq!(report.signed.max, 100);
        assert_eq!(report.signed.mean, 25.0);
        assert_eq!(report.unsigned.min, 100);
        assert_eq!(report.unsigned.max, 65486);
        assert_eq!(report.unsigned.mean, 32793.0);
    }

    #[test]
    fn test_extremes_at_type_limits() {
        let mut stats = RunningStatistics::new();
        stats.record(Sample::from_pcm16(0x8000));
        stats.record(Sample::from_pcm16(0x7FFF));
        let report = stats.report(1).unwrap();
        assert_eq!(report.signed.min, i64::from(i16::MIN));
        assert_eq!(report.signed.max, i64::from(i16::MAX));
        assert_eq!(report.unsigned.min, 0x7FFF);
        assert_eq!(report.unsigned.max, 0x8000);
    }

    #[test]
    fn test_zero_sample_rate_duration() {
        let mut stats = RunningStatistics::new();
        stats.record(Sample::from_pcm8(1));
        assert_eq!(stats.report(0).unwrap().duration_seconds, 0.0);
    }

    #[test]
    fn test_report_text() {
        let mut stats = RunningStatistics::new();
        stats.record(Sample::from_pcm16(100));
        stats.record(Sample::from_pcm16((-50i16) as u16));
        let text = stats.report(8000).unwrap().to_string();
        assert_eq!(
            text,
            "samples:       2 =    0.000 s\n\
             unsigned: minimal=   100 maximal= 65486 average=32793.0\n\
             signed:   minimal=   -50 maximal=   100 average=   25.0\n"
        );
    }
}
