mod common;

use common::{FakeOrganisationSource, ProbeEvent, RecordingProbe, lookup, org};
use ods_downloader::{
    lookup::IdentifierLookup,
    models::organisation::{PracticeRecord, RegionRecord},
    service::MetadataService,
};

fn practice(code: &str, name: &str, identifiers: &[&str]) -> PracticeRecord {
    PracticeRecord {
        code: code.into(),
        name: name.into(),
        identifiers: identifiers.iter().map(|id| id.to_string()).collect(),
    }
}

#[tokio::test]
async fn repeated_practice_keeps_first_name_and_reports_each_repeat() {
    let source = FakeOrganisationSource::with_practices(vec![
        org("A12345", "GP PRACTICE"),
        org("A12345", "GP PRACTICE RENAMED"),
        org("B23456", "ANOTHER PRACTICE"),
        org("A12345", "GP PRACTICE AGAIN"),
    ]);
    let probe = RecordingProbe::default();
    let service = MetadataService::new(source, &probe);
    let lookup = lookup(&[("A12345", "123456789123"), ("B23456", "223456789123")]);

    let practices = service
        .retrieve_practices_with_identifiers(&lookup, false)
        .await
        .unwrap();

    assert_eq!(
        practices,
        vec![
            practice("A12345", "GP PRACTICE", &["123456789123"]),
            practice("B23456", "ANOTHER PRACTICE", &["223456789123"]),
        ]
    );
    assert_eq!(
        probe.events(),
        vec![
            ProbeEvent::DuplicateOrganisation("A12345".into()),
            ProbeEvent::DuplicateOrganisation("A12345".into()),
        ]
    );
}

#[tokio::test]
async fn practice_without_identifiers_is_excluded_and_reported_once() {
    let source = FakeOrganisationSource::with_practices(vec![
        org("A12345", "GP PRACTICE"),
        org("Z99999", "UNKNOWN PRACTICE"),
        org("Z99999", "UNKNOWN PRACTICE"),
    ]);
    let probe = RecordingProbe::default();
    let service = MetadataService::new(source, &probe);

    let practices = service
        .retrieve_practices_with_identifiers(&lookup(&[("A12345", "123456789123")]), false)
        .await
        .unwrap();

    assert_eq!(
        practices,
        vec![practice("A12345", "GP PRACTICE", &["123456789123"])]
    );
    assert_eq!(
        probe.events(),
        vec![
            ProbeEvent::DuplicateOrganisation("Z99999".into()),
            ProbeEvent::IdentifiersNotFound("Z99999".into()),
        ]
    );
}

#[tokio::test]
async fn all_identifiers_of_a_code_are_attached_in_order() {
    let source = FakeOrganisationSource::with_practices(vec![org("A", "GP")]);
    let probe = RecordingProbe::default();
    let service = MetadataService::new(source, &probe);
    let lookup = lookup(&[("A", "i1"), ("A", "i2")]);

    let practices = service
        .retrieve_practices_with_identifiers(&lookup, false)
        .await
        .unwrap();

    assert_eq!(practices, vec![practice("A", "GP", &["i1", "i2"])]);
    assert!(probe.events().is_empty());
}

#[tokio::test]
async fn extended_roles_toggle_selects_the_broader_listing() {
    let source = FakeOrganisationSource {
        practices: vec![org("A12345", "GP PRACTICE")],
        extended_practices: vec![
            org("A12345", "GP PRACTICE"),
            org("Y01234", "OUT OF HOURS SERVICE"),
        ],
        ..FakeOrganisationSource::default()
    };
    let probe = RecordingProbe::default();
    let service = MetadataService::new(source, &probe);
    let lookup = lookup(&[("A12345", "111"), ("Y01234", "222")]);

    let default = service
        .retrieve_practices_with_identifiers(&lookup, false)
        .await
        .unwrap();
    let extended = service
        .retrieve_practices_with_identifiers(&lookup, true)
        .await
        .unwrap();

    assert_eq!(default, vec![practice("A12345", "GP PRACTICE", &["111"])]);
    assert_eq!(
        extended,
        vec![
            practice("A12345", "GP PRACTICE", &["111"]),
            practice("Y01234", "OUT OF HOURS SERVICE", &["222"]),
        ]
    );
}

#[tokio::test]
async fn regions_keep_only_canonical_practices_in_registry_order() {
    let source = FakeOrganisationSource::default()
        .region(
            org("X12", "CCG"),
            vec![
                org("C34567", "THIRD PRACTICE"),
                org("OUTSIDE", "NOT CANONICAL"),
                org("A12345", "GP PRACTICE"),
            ],
        )
        .region(org("Y34", "EMPTY CCG"), vec![org("OUTSIDE", "NOT CANONICAL")]);
    let probe = RecordingProbe::default();
    let service = MetadataService::new(source, &probe);
    let canonical = vec![
        practice("A12345", "GP PRACTICE", &["1"]),
        practice("C34567", "THIRD PRACTICE", &["3"]),
    ];

    let regions = service
        .retrieve_region_practice_allocations(&canonical)
        .await
        .unwrap();

    assert_eq!(
        regions,
        vec![
            RegionRecord {
                code: "X12".into(),
                name: "CCG".into(),
                practices: vec!["C34567".into(), "A12345".into()],
            },
            RegionRecord {
                code: "Y34".into(),
                name: "EMPTY CCG".into(),
                practices: vec![],
            },
        ]
    );
    assert!(probe.events().is_empty());
}

#[tokio::test]
async fn duplicate_regions_are_fetched_once() {
    let mut source = FakeOrganisationSource::default().region(
        org("X12", "CCG"),
        vec![org("A12345", "GP PRACTICE")],
    );
    source.regions.push(org("X12", "CCG DUPLICATE"));
    let probe = RecordingProbe::default();
    let service = MetadataService::new(&source, &probe);

    let regions = service
        .retrieve_region_practice_allocations(&[practice("A12345", "GP PRACTICE", &["1"])])
        .await
        .unwrap();

    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].name, "CCG");
    assert_eq!(*source.region_calls.lock().unwrap(), vec!["X12".to_string()]);
    assert_eq!(
        probe.events(),
        vec![ProbeEvent::DuplicateOrganisation("X12".into())]
    );
}

#[tokio::test]
async fn registry_failures_propagate_unchanged() {
    let probe = RecordingProbe::default();
    let service = MetadataService::new(FakeOrganisationSource::failing(503), &probe);

    let practices_err = service
        .retrieve_practices_with_identifiers(&IdentifierLookup::default(), false)
        .await
        .unwrap_err();
    let regions_err = service
        .retrieve_region_practice_allocations(&[])
        .await
        .unwrap_err();

    assert_eq!(practices_err.status(), Some(503));
    assert_eq!(regions_err.status(), Some(503));
    assert_eq!(
        practices_err.to_string(),
        "Unable to fetch organisation data (HTTP status 503)"
    );
    assert!(probe.events().is_empty());
}
