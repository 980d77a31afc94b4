//! Policy labels for route scores.

use serde::{Serialize, Serializer};

use crate::config::BandThresholds;
use crate::error::LabelError;

/// Policy advice derived from a route score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyLabel {
    OkToTravel,
    DelaysLikely,
    NotSafeToTravel,
}

impl PolicyLabel {
    /// | Score | Label              |
    /// |-------|--------------------|
    /// | >= 70 | NOT SAFE TO TRAVEL |
    /// | >= 50 | DELAYS LIKELY      |
    /// | < 50  | OK TO TRAVEL       |
    pub fn from_score(score: i32, bands: &BandThresholds) -> Self {
        match score {
            s if s >= bands.high => PolicyLabel::NotSafeToTravel,
            s if s >= bands.medium => PolicyLabel::DelaysLikely,
            _ => PolicyLabel::OkToTravel,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyLabel::OkToTravel => "OK TO TRAVEL",
            PolicyLabel::DelaysLikely => "DELAYS LIKELY",
            PolicyLabel::NotSafeToTravel => "NOT SAFE TO TRAVEL",
        }
    }
}

impl std::fmt::Display for PolicyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PolicyLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Writes the label for `score` into `buf` as a NUL-terminated string,
/// truncating when the buffer is too small. Bytes after the label are zeroed.
pub fn risk_label_from_score(score: i32, buf: &mut [u8]) -> Result<(), LabelError> {
    if buf.is_empty() {
        return Err(LabelError::InvalidBuffer);
    }
    let label = PolicyLabel::from_score(score, &BandThresholds::default()).as_str();
    let n = label.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&label.as_bytes()[..n]);
    buf[n..].fill(0);
    Ok(())
}
