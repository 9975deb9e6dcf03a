use std::sync::Arc;

use tracing::warn;

pub const IDENTIFIERS_NOT_FOUND_EVENT: &str = "IDENTIFIERS_NOT_FOUND";
pub const DUPLICATE_ORGANISATION_EVENT: &str = "DUPLICATE_ODS_CODE_FOUND";

/// Receives the recoverable conditions met while assembling metadata.
///
/// Both calls are fire-and-continue: they never fail and never stop the run.
pub trait ObservabilityProbe {
    /// A practice has no identifiers and is being left out.
    fn record_identifiers_not_found(&self, ods_code: &str);

    /// A code appeared again in the same fetch; the later record is being dropped.
    fn record_duplicate_organisation(&self, ods_code: &str);
}

/// Emits each condition as a structured `warn` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProbe;

impl ObservabilityProbe for TracingProbe {
    fn record_identifiers_not_found(&self, ods_code: &str) {
        warn!(
            event = IDENTIFIERS_NOT_FOUND_EVENT,
            ods_code,
            "ASIDs not found for ODS code: {ods_code}"
        );
    }

    fn record_duplicate_organisation(&self, ods_code: &str) {
        warn!(
            event = DUPLICATE_ORGANISATION_EVENT,
            ods_code,
            "Duplicate ODS code found: {ods_code}"
        );
    }
}

impl<P: ObservabilityProbe + ?Sized> ObservabilityProbe for &P {
    fn record_identifiers_not_found(&self, ods_code: &str) {
        (**self).record_identifiers_not_found(ods_code)
    }

    fn record_duplicate_organisation(&self, ods_code: &str) {
        (**self).record_duplicate_organisation(ods_code)
    }
}

impl<P: ObservabilityProbe + ?Sized> ObservabilityProbe for Arc<P> {
    fn record_identifiers_not_found(&self, ods_code: &str) {
        (**self).record_identifiers_not_found(ods_code)
    }

    fn record_duplicate_organisation(&self, ods_code: &str) {
        (**self).record_duplicate_organisation(ods_code)
    }
}
