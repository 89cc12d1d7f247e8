use chrono::Duration;

use vahan_domain::action::ActionType;
use vahan_domain::qr::{TagStatus, TagType};
use vahan_tag::domain::types::EmergencyLog;
use vahan_tag::error::TagServiceError;
use vahan_tag::usecase::contact::{ContactOwnerInput, ContactOwnerUseCase};

use crate::helpers::{
    MockClock, MockLogRepo, MockProfileRepo, MockQrTagRepo, RecordingGateway, active_vehicle_tag,
    epoch, test_profile, test_tag,
};

type ContactUseCase =
    ContactOwnerUseCase<MockQrTagRepo, MockProfileRepo, MockLogRepo, RecordingGateway, MockClock>;

struct Fixture {
    uc: ContactUseCase,
    logs: MockLogRepo,
    gateway: RecordingGateway,
    clock: MockClock,
}

fn fixture() -> Fixture {
    let tag = active_vehicle_tag("ABC123");
    let profile = test_profile(&tag);
    let logs = MockLogRepo::default();
    let gateway = RecordingGateway::default();
    let clock = MockClock::new();
    let uc = ContactOwnerUseCase {
        tags: MockQrTagRepo::new(vec![tag]),
        profiles: MockProfileRepo::new(vec![profile]),
        logs: logs.clone(),
        gateway: gateway.clone(),
        clock: clock.clone(),
    };
    Fixture {
        uc,
        logs,
        gateway,
        clock,
    }
}

fn input(action: ActionType, caller_ip: &str) -> ContactOwnerInput {
    ContactOwnerInput {
        code: "ABC123".to_owned(),
        action,
        caller_ip: caller_ip.to_owned(),
        message: None,
        require_profile: false,
    }
}

#[tokio::test]
async fn should_log_and_relay_call() {
    let f = fixture();

    f.uc.execute(input(ActionType::Call, "10.0.0.1")).await.unwrap();

    let entries = f.logs.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, ActionType::Call);
    assert_eq!(entries[0].caller_ip, "10.0.0.1");

    let dispatches = f.gateway.dispatches.lock().unwrap();
    assert_eq!(dispatches.len(), 1);
    assert_eq!(dispatches[0].action, ActionType::Call);
    assert_eq!(dispatches[0].owner_mobile.as_str(), "9876543210");
    assert!(dispatches[0].message.is_none());
}

#[tokio::test]
async fn should_relay_trimmed_sms_message() {
    let f = fixture();

    f.uc.execute(ContactOwnerInput {
        message: Some("  car blocking gate  ".to_owned()),
        ..input(ActionType::Sms, "10.0.0.1")
    })
    .await
    .unwrap();

    let dispatches = f.gateway.dispatches.lock().unwrap();
    assert_eq!(dispatches[0].message.as_deref(), Some("car blocking gate"));
}

#[tokio::test]
async fn should_reject_short_sms_without_logging() {
    let f = fixture();

    let result = f
        .uc
        .execute(ContactOwnerInput {
            message: Some(" hi  ".to_owned()),
            ..input(ActionType::Sms, "10.0.0.1")
        })
        .await;

    assert!(
        matches!(result, Err(TagServiceError::InvalidMessage)),
        "expected InvalidMessage, got {result:?}"
    );
    assert_eq!(f.logs.len(), 0);
}

#[tokio::test]
async fn should_reject_non_contact_action() {
    let f = fixture();

    for action in [ActionType::View, ActionType::Scan] {
        let result = f.uc.execute(input(action, "10.0.0.1")).await;
        assert!(
            matches!(result, Err(TagServiceError::InvalidActionType)),
            "expected InvalidActionType for {action}, got {result:?}"
        );
    }
    assert_eq!(f.logs.len(), 0);
}

#[tokio::test]
async fn should_return_not_found_before_throttling() {
    let f = fixture();

    let result = f
        .uc
        .execute(ContactOwnerInput {
            code: "MISSING".to_owned(),
            ..input(ActionType::Call, "10.0.0.1")
        })
        .await;

    assert!(
        matches!(result, Err(TagServiceError::QrNotFound)),
        "expected QrNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_rate_limit_sixth_contact_until_window_elapses() {
    let f = fixture();

    for _ in 0..5 {
        f.uc.execute(input(ActionType::Call, "10.0.0.1"))
            .await
            .unwrap();
        f.clock.advance(Duration::seconds(1));
    }

    let result = f.uc.execute(input(ActionType::Call, "10.0.0.1")).await;
    assert!(
        matches!(result, Err(TagServiceError::TooManyContacts)),
        "expected TooManyContacts, got {result:?}"
    );
    assert_eq!(f.logs.len(), 5, "rejected attempt must not be logged");
    assert_eq!(f.gateway.dispatches.lock().unwrap().len(), 5);

    // Two minutes on, every earlier row has left the window.
    f.clock.advance(Duration::seconds(120));
    f.uc.execute(input(ActionType::Call, "10.0.0.1")).await.unwrap();
    assert_eq!(f.logs.len(), 6);
}

#[tokio::test]
async fn should_not_throttle_other_caller() {
    let f = fixture();

    for _ in 0..5 {
        f.uc.execute(input(ActionType::Call, "10.0.0.1")).await.unwrap();
    }

    f.uc.execute(input(ActionType::Call, "10.0.0.2")).await.unwrap();
    assert_eq!(f.logs.len(), 6);
}

#[tokio::test]
async fn should_count_views_and_other_tags_toward_throttle() {
    let other = test_tag("OTHER1", TagType::Other, TagStatus::Active, None);
    let prior: Vec<EmergencyLog> = (0..5)
        .map(|i| {
            EmergencyLog::new(
                other.id,
                ActionType::View,
                "10.0.0.1",
                epoch() - Duration::seconds(i * 10),
            )
        })
        .collect();
    let f = fixture();
    f.logs.entries.lock().unwrap().extend(prior);

    let result = f.uc.execute(input(ActionType::Call, "10.0.0.1")).await;

    assert!(
        matches!(result, Err(TagServiceError::TooManyContacts)),
        "expected TooManyContacts, got {result:?}"
    );
}

#[tokio::test]
async fn should_log_contact_on_other_tag_without_relay() {
    let tag = test_tag("KEY001", TagType::Other, TagStatus::Active, None);
    let logs = MockLogRepo::default();
    let gateway = RecordingGateway::default();
    let uc = ContactOwnerUseCase {
        tags: MockQrTagRepo::new(vec![tag]),
        profiles: MockProfileRepo::default(),
        logs: logs.clone(),
        gateway: gateway.clone(),
        clock: MockClock::new(),
    };

    uc.execute(ContactOwnerInput {
        code: "KEY001".to_owned(),
        ..input(ActionType::Call, "10.0.0.1")
    })
    .await
    .unwrap();

    assert_eq!(logs.len(), 1);
    assert!(gateway.dispatches.lock().unwrap().is_empty());
}

fn owner_less_fixture() -> (ContactUseCase, MockLogRepo, RecordingGateway) {
    let tag = test_tag("KEY001", TagType::Other, TagStatus::Active, None);
    let logs = MockLogRepo::default();
    let gateway = RecordingGateway::default();
    let uc = ContactOwnerUseCase {
        tags: MockQrTagRepo::new(vec![tag]),
        profiles: MockProfileRepo::default(),
        logs: logs.clone(),
        gateway: gateway.clone(),
        clock: MockClock::new(),
    };
    (uc, logs, gateway)
}

#[tokio::test]
async fn should_refuse_emergency_call_on_tag_without_profile() {
    let (uc, logs, gateway) = owner_less_fixture();

    let result = uc
        .execute(ContactOwnerInput {
            code: "KEY001".to_owned(),
            require_profile: true,
            ..input(ActionType::Call, "10.0.0.1")
        })
        .await;

    assert!(
        matches!(result, Err(TagServiceError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
    assert_eq!(logs.len(), 0);
    assert!(gateway.dispatches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_refuse_emergency_sms_on_tag_without_profile() {
    let (uc, logs, gateway) = owner_less_fixture();

    let result = uc
        .execute(ContactOwnerInput {
            code: "KEY001".to_owned(),
            message: Some("car blocking gate".to_owned()),
            require_profile: true,
            ..input(ActionType::Sms, "10.0.0.1")
        })
        .await;

    assert!(
        matches!(result, Err(TagServiceError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
    assert_eq!(logs.len(), 0);
    assert!(gateway.dispatches.lock().unwrap().is_empty());
}
