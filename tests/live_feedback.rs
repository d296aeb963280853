use std::time::{Duration, Instant};

use futures::executor::block_on;
use regform::ValidationConfig;
use regform::form::{Feedback, FeedbackStatus, FieldId, FormOptions, ValidationOrchestrator};

fn blur(orchestrator: &ValidationOrchestrator, field: FieldId, value: &str) -> Feedback {
    orchestrator.set_value(field, value).expect("set value");
    block_on(orchestrator.on_focus_lost(field))
        .expect("blur")
        .expect("focus-lost field validates")
}

#[test]
fn remote_check_takes_the_default_field_latency() {
    let orchestrator =
        ValidationOrchestrator::from_config(&ValidationConfig::default(), FormOptions::default());

    let started = Instant::now();
    let feedback = blur(&orchestrator, FieldId::Username, "newuser1");
    assert_eq!(feedback, Feedback::valid("Username is available"));
    assert!(started.elapsed() >= Duration::from_millis(800));

    let started = Instant::now();
    let feedback = blur(&orchestrator, FieldId::Username, "");
    assert_eq!(feedback, Feedback::invalid("Username is required"));
    assert!(started.elapsed() < Duration::from_millis(800));
}

#[test]
fn documented_examples_grade_as_expected() {
    let orchestrator = ValidationOrchestrator::from_config(
        &ValidationConfig::default().without_latency(),
        FormOptions::default(),
    );

    let cases = [
        (FieldId::Username, "ab1", FeedbackStatus::Invalid),
        (FieldId::Username, "abc##", FeedbackStatus::Invalid),
        (FieldId::Username, "rahul123", FeedbackStatus::Invalid),
        (FieldId::Username, "newuser1", FeedbackStatus::Valid),
        (FieldId::Email, "not-an-email", FeedbackStatus::Invalid),
        (FieldId::Email, "priya@gmail.com", FeedbackStatus::Invalid),
        (FieldId::Email, "fresh@new.com", FeedbackStatus::Valid),
        (FieldId::Mobile, "12345", FeedbackStatus::Invalid),
        (FieldId::Mobile, "5123456789", FeedbackStatus::Invalid),
        (FieldId::Mobile, "9123456789", FeedbackStatus::Valid),
    ];
    for (field, value, expected) in cases {
        let feedback = blur(&orchestrator, field, value);
        assert_eq!(feedback.status, expected, "{field} = {value:?}");
        assert_eq!(
            orchestrator.feedback(field).expect("feedback"),
            Some(feedback)
        );
    }
}

#[test]
fn style_classes_follow_status() {
    assert_eq!(FeedbackStatus::Pending.style_class(), "processing");
    assert_eq!(FeedbackStatus::Valid.style_class(), "valid-feedback");
    assert_eq!(FeedbackStatus::Invalid.style_class(), "invalid-feedback");
    assert_eq!(FeedbackStatus::Warning.style_class(), "warning-feedback");
}
