use chrono::{DateTime, Datelike, Utc};

use crate::io::store::ObjectUri;

pub const METADATA_VERSION: &str = "v3";
pub const METADATA_FILE_NAME: &str = "organisationMetadata.json";
pub const IDENTIFIER_LOOKUP_FILE_NAME: &str = "asidLookup.csv.gz";

/// Derives the job's input and output locations from the date anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUriResolver {
    lookup_bucket: String,
    metadata_bucket: String,
}

impl ObjectUriResolver {
    pub fn new(lookup_bucket: impl Into<String>, metadata_bucket: impl Into<String>) -> Self {
        Self {
            lookup_bucket: lookup_bucket.into(),
            metadata_bucket: metadata_bucket.into(),
        }
    }

    /// `s3://<lookup bucket>/<year>/<month>/asidLookup.csv.gz`
    pub fn identifier_lookup(&self, anchor: DateTime<Utc>) -> ObjectUri {
        self.lookup_for(anchor.year(), anchor.month())
    }

    /// The identifier lookup of the calendar month before `anchor`.
    pub fn previous_month_identifier_lookup(&self, anchor: DateTime<Utc>) -> ObjectUri {
        let (year, month) = match anchor.month() {
            1 => (anchor.year() - 1, 12),
            month => (anchor.year(), month - 1),
        };
        self.lookup_for(year, month)
    }

    /// `s3://<metadata bucket>/v3/<year>/<month>/organisationMetadata.json`
    pub fn metadata(&self, anchor: DateTime<Utc>) -> ObjectUri {
        ObjectUri::new(
            &self.metadata_bucket,
            format!(
                "{METADATA_VERSION}/{}/{METADATA_FILE_NAME}",
                date_prefix(anchor.year(), anchor.month())
            ),
        )
    }

    fn lookup_for(&self, year: i32, month: u32) -> ObjectUri {
        ObjectUri::new(
            &self.lookup_bucket,
            format!("{}/{IDENTIFIER_LOOKUP_FILE_NAME}", date_prefix(year, month)),
        )
    }
}

// Months are not zero-padded.
fn date_prefix(year: i32, month: u32) -> String {
    format!("{year}/{month}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn resolver() -> ObjectUriResolver {
        ObjectUriResolver::new("asid-lookup", "ods-metadata")
    }

    #[test]
    fn lookup_and_metadata_locations() {
        let anchor = Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap();

        assert_eq!(
            resolver().identifier_lookup(anchor).to_string(),
            "s3://asid-lookup/2021/3/asidLookup.csv.gz"
        );
        assert_eq!(
            resolver().metadata(anchor).to_string(),
            "s3://ods-metadata/v3/2021/3/organisationMetadata.json"
        );
    }

    #[test]
    fn previous_month_of_january_is_last_december() {
        let anchor = Utc.with_ymd_and_hms(2022, 1, 31, 12, 0, 0).unwrap();

        assert_eq!(
            resolver().previous_month_identifier_lookup(anchor).to_string(),
            "s3://asid-lookup/2021/12/asidLookup.csv.gz"
        );
    }

    #[test]
    fn previous_month_within_a_year() {
        let anchor = Utc.with_ymd_and_hms(2021, 11, 1, 0, 0, 0).unwrap();

        assert_eq!(
            resolver().previous_month_identifier_lookup(anchor).to_string(),
            "s3://asid-lookup/2021/10/asidLookup.csv.gz"
        );
    }
}
