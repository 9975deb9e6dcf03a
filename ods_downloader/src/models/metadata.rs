use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    models::organisation::{PracticeRecord, RegionRecord},
};

/// The organisation metadata document published once per job run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    /// When the document was assembled (UTC, RFC 3339 on the wire).
    pub generated_on: DateTime<Utc>,
    /// Year of the date anchor the document was built for.
    pub year: i32,
    /// Month (1-12) of the date anchor.
    pub month: u32,
    pub practices: Vec<PracticeRecord>,
    #[serde(rename = "icbs")]
    pub regions: Vec<RegionRecord>,
}

impl MetadataDocument {
    /// Assembles the document, stamping `generated_on` from `clock`.
    pub fn assemble(
        practices: Vec<PracticeRecord>,
        regions: Vec<RegionRecord>,
        year: i32,
        month: u32,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            generated_on: clock.now(),
            year,
            month,
            practices,
            regions,
        }
    }
}
