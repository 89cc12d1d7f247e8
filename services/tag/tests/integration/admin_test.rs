use chrono::Duration;

use vahan_domain::action::ActionType;
use vahan_domain::qr::{TagStatus, TagType};
use vahan_tag::domain::types::EmergencyLog;
use vahan_tag::error::TagServiceError;
use vahan_tag::usecase::admin::{
    ActivateQrInput, ActivateQrUseCase, CreateQrInput, CreateQrUseCase, ListLogsInput,
    ListLogsUseCase, RevokeQrUseCase, UpsertProfileInput, UpsertProfileUseCase,
};
use vahan_tag::usecase::lookup::{LookupTagInput, LookupTagUseCase};

use crate::helpers::{
    MockClock, MockLogRepo, MockProfileRepo, MockQrTagRepo, active_vehicle_tag, epoch, test_tag,
};

fn create_input(qr_code: &str, tag_type: &str) -> CreateQrInput {
    CreateQrInput {
        qr_code: qr_code.to_owned(),
        tag_type: tag_type.to_owned(),
    }
}

fn profile_input(code: &str, owner_mobile: &str) -> UpsertProfileInput {
    UpsertProfileInput {
        code: code.to_owned(),
        vehicle_number: " mh12ab1234 ".to_owned(),
        owner_mobile: owner_mobile.to_owned(),
        blood_group: Some("B+".to_owned()),
        model: Some("  ".to_owned()),
    }
}

async fn resolve(
    tags: &MockQrTagRepo,
    profiles: &MockProfileRepo,
    clock: &MockClock,
    code: &str,
) -> Result<(), TagServiceError> {
    let uc = LookupTagUseCase {
        tags: tags.clone(),
        profiles: profiles.clone(),
        logs: MockLogRepo::default(),
        clock: clock.clone(),
        action: ActionType::View,
    };
    uc.execute(LookupTagInput {
        code: code.to_owned(),
        caller_ip: "10.0.0.1".to_owned(),
        require_profile: false,
    })
    .await
    .map(|_| ())
}

#[tokio::test]
async fn should_create_normalized_inactive_tag_that_does_not_resolve() {
    let tags = MockQrTagRepo::default();
    let clock = MockClock::new();
    let uc = CreateQrUseCase {
        tags: tags.clone(),
        clock: clock.clone(),
    };

    let created = uc.execute(create_input("abc123", "vehicle")).await.unwrap();

    assert_eq!(created.code.as_str(), "ABC123");
    assert_eq!(created.tag_type, TagType::Vehicle);
    assert_eq!(created.status, TagStatus::Inactive);
    assert!(created.activated_at.is_none());
    assert_eq!(created.created_at, epoch());
    assert!(tags.get("ABC123").is_some());

    let result = resolve(&tags, &MockProfileRepo::default(), &clock, "ABC123").await;
    assert!(
        matches!(result, Err(TagServiceError::QrInactive)),
        "expected QrInactive, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_duplicate_code() {
    let tags = MockQrTagRepo::new(vec![active_vehicle_tag("ABC123")]);
    let uc = CreateQrUseCase {
        tags,
        clock: MockClock::new(),
    };

    let result = uc.execute(create_input(" abc123", "other")).await;

    assert!(
        matches!(result, Err(TagServiceError::QrAlreadyExists)),
        "expected QrAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_validate_create_fields() {
    let uc = CreateQrUseCase {
        tags: MockQrTagRepo::default(),
        clock: MockClock::new(),
    };

    for (code, tag_type) in [("", "vehicle"), ("ABC123", ""), ("  ", "  ")] {
        let result = uc.execute(create_input(code, tag_type)).await;
        assert!(
            matches!(result, Err(TagServiceError::MissingQrFields)),
            "expected MissingQrFields, got {result:?}"
        );
    }

    let result = uc.execute(create_input("ABC123", "truck")).await;
    assert!(
        matches!(result, Err(TagServiceError::InvalidTagType)),
        "expected InvalidTagType, got {result:?}"
    );
}

#[tokio::test]
async fn should_activate_with_expiry_and_expire_later() {
    let tag = test_tag("ABC123", TagType::Other, TagStatus::Inactive, None);
    let tags = MockQrTagRepo::new(vec![tag]);
    let profiles = MockProfileRepo::default();
    let clock = MockClock::new();
    let uc = ActivateQrUseCase {
        tags: tags.clone(),
        clock: clock.clone(),
    };

    let expires_at = epoch() + Duration::days(365);
    let activated = uc
        .execute(ActivateQrInput {
            code: "abc123".to_owned(),
            expires_at: Some(expires_at),
        })
        .await
        .unwrap();

    assert_eq!(activated.status, TagStatus::Active);
    assert_eq!(activated.activated_at, Some(epoch()));
    let stored = tags.get("ABC123").unwrap();
    assert_eq!(stored.status, TagStatus::Active);
    assert_eq!(stored.expires_at, Some(expires_at));

    resolve(&tags, &profiles, &clock, "ABC123").await.unwrap();

    clock.advance(Duration::days(365));
    let result = resolve(&tags, &profiles, &clock, "ABC123").await;
    assert!(
        matches!(result, Err(TagServiceError::QrExpired)),
        "expected QrExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_past_expiry_on_activate() {
    let tags = MockQrTagRepo::new(vec![test_tag(
        "ABC123",
        TagType::Vehicle,
        TagStatus::Inactive,
        None,
    )]);
    let uc = ActivateQrUseCase {
        tags: tags.clone(),
        clock: MockClock::new(),
    };

    let result = uc
        .execute(ActivateQrInput {
            code: "ABC123".to_owned(),
            expires_at: Some(epoch()),
        })
        .await;

    assert!(
        matches!(result, Err(TagServiceError::InvalidExpiry)),
        "expected InvalidExpiry, got {result:?}"
    );
    assert_eq!(tags.get("ABC123").unwrap().status, TagStatus::Inactive);
}

#[tokio::test]
async fn should_return_not_found_when_activating_unknown_code() {
    let uc = ActivateQrUseCase {
        tags: MockQrTagRepo::default(),
        clock: MockClock::new(),
    };

    let result = uc
        .execute(ActivateQrInput {
            code: "NOPE".to_owned(),
            expires_at: None,
        })
        .await;

    assert!(
        matches!(result, Err(TagServiceError::QrNotFound)),
        "expected QrNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_revoke_tag() {
    let tags = MockQrTagRepo::new(vec![test_tag("KEY001", TagType::Other, TagStatus::Active, None)]);
    let clock = MockClock::new();
    let uc = RevokeQrUseCase { tags: tags.clone() };

    let revoked = uc.execute("key001").await.unwrap();

    assert_eq!(revoked.status, TagStatus::Revoked);
    let result = resolve(&tags, &MockProfileRepo::default(), &clock, "KEY001").await;
    assert!(
        matches!(result, Err(TagServiceError::QrInactive)),
        "expected QrInactive, got {result:?}"
    );
}

#[tokio::test]
async fn should_upsert_profile_and_keep_created_at() {
    let tag = active_vehicle_tag("ABC123");
    let tags = MockQrTagRepo::new(vec![tag.clone()]);
    let profiles = MockProfileRepo::default();
    let clock = MockClock::new();
    let uc = UpsertProfileUseCase {
        tags: tags.clone(),
        profiles: profiles.clone(),
        clock: clock.clone(),
    };

    let first = uc.execute(profile_input("ABC123", "9876543210")).await.unwrap();
    assert_eq!(first.qr_tag_id, tag.id);
    assert_eq!(first.vehicle_number, "MH12AB1234");
    assert_eq!(first.blood_group.as_deref(), Some("B+"));
    assert_eq!(first.model, None);
    assert_eq!(first.created_at, epoch());

    clock.advance(Duration::hours(1));
    let second = uc.execute(profile_input("ABC123", "9123456789")).await.unwrap();
    assert_eq!(second.created_at, epoch());
    assert_eq!(second.updated_at, epoch() + Duration::hours(1));

    let stored = profiles.profiles.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].owner_mobile, "9123456789");
}

#[tokio::test]
async fn should_validate_profile_input() {
    let tags = MockQrTagRepo::new(vec![
        active_vehicle_tag("ABC123"),
        test_tag("KEY001", TagType::Other, TagStatus::Active, None),
    ]);
    let uc = UpsertProfileUseCase {
        tags,
        profiles: MockProfileRepo::default(),
        clock: MockClock::new(),
    };

    let result = uc.execute(profile_input("ABC123", " ")).await;
    assert!(
        matches!(result, Err(TagServiceError::MissingProfileFields)),
        "expected MissingProfileFields, got {result:?}"
    );

    let result = uc.execute(profile_input("ABC123", "12345")).await;
    assert!(
        matches!(result, Err(TagServiceError::InvalidMobile)),
        "expected InvalidMobile, got {result:?}"
    );

    let result = uc.execute(profile_input("KEY001", "9876543210")).await;
    assert!(
        matches!(result, Err(TagServiceError::NotVehicleTag)),
        "expected NotVehicleTag, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_logs_newest_first_with_clamped_limit() {
    let tag = active_vehicle_tag("ABC123");
    let other = active_vehicle_tag("XYZ789");
    let mut entries: Vec<EmergencyLog> = (0..5)
        .map(|i| {
            EmergencyLog::new(
                tag.id,
                ActionType::View,
                "10.0.0.1",
                epoch() + Duration::seconds(i),
            )
        })
        .collect();
    entries.push(EmergencyLog::new(other.id, ActionType::Call, "10.0.0.1", epoch()));
    let uc = ListLogsUseCase {
        tags: MockQrTagRepo::new(vec![tag.clone(), other]),
        logs: MockLogRepo::new(entries),
    };

    let all = uc
        .execute(ListLogsInput {
            code: "ABC123".to_owned(),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|e| e.qr_tag_id == tag.id));
    assert_eq!(all[0].created_at, epoch() + Duration::seconds(4));

    let one = uc
        .execute(ListLogsInput {
            code: "ABC123".to_owned(),
            limit: Some(0),
        })
        .await
        .unwrap();
    assert_eq!(one.len(), 1, "a zero limit is clamped up to one");
}
