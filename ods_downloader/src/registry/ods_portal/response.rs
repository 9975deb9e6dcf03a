use serde::Deserialize;

/// One organisation as the registry returns it. Other fields are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawOrganisation {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "OrgId")]
    pub org_id: String,
}

#[derive(Deserialize, Debug)]
pub struct OrganisationsPage {
    #[serde(rename = "Organisations")]
    pub organisations: Vec<RawOrganisation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_fields_outside_name_and_org_id() {
        let body = r#"{
            "Organisations": [
                {"Name": "SURGERY", "OrgId": "A12345", "Status": "Active", "PostCode": "LS1 4HR"}
            ]
        }"#;

        let page: OrganisationsPage = serde_json::from_str(body).unwrap();

        assert_eq!(
            page.organisations,
            vec![RawOrganisation {
                name: "SURGERY".into(),
                org_id: "A12345".into()
            }]
        );
    }

    #[test]
    fn rejects_a_body_without_organisations() {
        let result = serde_json::from_str::<OrganisationsPage>(r#"{"errorCode": 400}"#);
        assert!(result.is_err());
    }
}
