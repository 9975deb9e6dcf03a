use indexmap::IndexMap;

/// Active GP practices: prescribing cost centres that also hold the GP practice role.
pub const PRACTICE_FILTERS: &[(&str, &str)] = &[
    ("PrimaryRoleId", "RO177"),
    ("Status", "Active"),
    ("NonPrimaryRoleId", "RO76"),
    ("Limit", "1000"),
];

/// Every active prescribing cost centre, including those (prison and secure-estate
/// practices among them) that do not carry the GP practice role.
pub const EXTENDED_PRACTICE_FILTERS: &[(&str, &str)] = &[
    ("PrimaryRoleId", "RO177"),
    ("Status", "Active"),
    ("Limit", "1000"),
];

/// Active regional administrative bodies (CCG / sub-ICB locations).
pub const REGION_FILTERS: &[(&str, &str)] = &[
    ("PrimaryRoleId", "RO98"),
    ("Status", "Active"),
    ("Limit", "1000"),
];

/// Organisations with an active "commissioned by" relationship to a target region.
/// Combined with `TargetOrgId` per call.
pub const REGION_PRACTICE_FILTERS: &[(&str, &str)] = &[
    ("RelTypeId", "RE4"),
    ("RelStatus", "active"),
    ("Limit", "1000"),
];

pub const TARGET_ORG_ID: &str = "TargetOrgId";

/// Query parameters for one registry search.
///
/// Built fresh from an immutable template on every call; [`SearchFilters::with`]
/// consumes the value and returns a new one, so no two calls share a parameter map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilters(IndexMap<String, String>);

impl SearchFilters {
    pub fn from_template(template: &[(&str, &str)]) -> Self {
        Self(
            template
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    /// Returns these filters with `key` set to `value`, replacing any existing value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Query-string pairs in template order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Filters for the practice search. Exactly one template is used: the two are
    /// alternatives, never merged.
    pub fn practices(include_extended_roles: bool) -> Self {
        if include_extended_roles {
            Self::from_template(EXTENDED_PRACTICE_FILTERS)
        } else {
            Self::from_template(PRACTICE_FILTERS)
        }
    }

    pub fn regions() -> Self {
        Self::from_template(REGION_FILTERS)
    }

    pub fn practices_for_region(region_code: &str) -> Self {
        Self::from_template(REGION_PRACTICE_FILTERS).with(TARGET_ORG_ID, region_code)
    }
}
