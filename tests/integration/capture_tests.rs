// tests/integration/capture_tests.rs
use std::sync::Arc;
use std::time::Duration;

use seguro_defeso::core::biometry::{BiometricError, CaptureStatus};

use crate::common::{
    descriptor, distant_face, good_face, test_config, FakeCamera, ScriptedDetector, TestContext,
};

#[test_log::test(tokio::test)]
async fn test_enrollment_needs_a_full_streak() {
    // two good frames, one bad (streak 2 -> 0), then five good ones
    let mut script = vec![Some(good_face(0.1)), Some(good_face(0.1)), None];
    script.extend((1..=5).map(|i| Some(good_face(i as f32))));
    let ctx = TestContext::with_detector(ScriptedDetector::new(script)).await;

    let camera = Arc::new(FakeCamera::new());
    let session = ctx.app.capture_session(camera.clone());
    let capture = session.enroll().await.unwrap();

    assert_eq!(capture.frames_polled, 8);
    // descriptor comes from the frame that completed the streak
    assert_eq!(capture.detection.descriptor, descriptor(5.0));
    assert!(camera.is_stopped());
    assert_eq!(*session.subscribe().borrow(), CaptureStatus::Complete);
}

#[test_log::test(tokio::test)]
async fn test_verification_accepts_first_passing_frame() {
    let script = vec![None, Some(distant_face(0.1)), Some(good_face(0.11))];
    let ctx = TestContext::with_detector(ScriptedDetector::new(script)).await;

    let camera = Arc::new(FakeCamera::new());
    let capture = ctx
        .app
        .capture_session(camera.clone())
        .verify(&descriptor(0.1))
        .await
        .unwrap();

    assert_eq!(capture.frames_polled, 3);
    assert!(capture.result.is_match);
    assert!(camera.is_stopped());
}

#[tokio::test]
async fn test_verification_reports_mismatch_without_failing() {
    let ctx = TestContext::with_detector(ScriptedDetector::always(Some(good_face(0.9)))).await;

    let capture = ctx
        .app
        .capture_session(Arc::new(FakeCamera::new()))
        .verify(&descriptor(0.1))
        .await
        .unwrap();

    assert!(!capture.result.is_match);
    assert!(capture.result.distance > 0.6);
}

#[tokio::test]
async fn test_frame_budget_ends_capture() {
    let ctx = TestContext::with_detector(ScriptedDetector::always(Some(distant_face(0.1)))).await;

    let camera = Arc::new(FakeCamera::new());
    let session = ctx.app.capture_session(camera.clone());
    let result = session.enroll().await;

    assert_eq!(result.unwrap_err(), BiometricError::CaptureTimedOut(200));
    assert!(camera.is_stopped());
    match &*session.subscribe().borrow() {
        CaptureStatus::Failed { retryable, .. } => assert!(*retryable),
        other => panic!("unexpected status {:?}", other),
    };
}

#[tokio::test]
async fn test_camera_released_when_capture_is_cancelled() {
    let ctx = TestContext::build(ScriptedDetector::always(None), |dir| {
        let mut config = test_config(dir);
        config.biometry.capture_frame_budget = None;
        config
    })
    .await;
    let camera = Arc::new(FakeCamera::new());
    let session = ctx.app.capture_session(camera.clone());

    let attempt = tokio::time::timeout(Duration::from_millis(20), session.enroll()).await;

    assert!(attempt.is_err());
    assert_eq!(camera.opened.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(camera.is_stopped());
}

#[tokio::test]
async fn test_status_tracks_streak_progress() {
    let script = vec![Some(good_face(0.1)), Some(good_face(0.1)), None, None];
    let ctx = TestContext::with_detector(ScriptedDetector::new(script)).await;
    let session = ctx.app.capture_session(Arc::new(FakeCamera::new()));
    let mut status = session.subscribe();

    let watcher = tokio::spawn(async move {
        let mut best = 0;
        while status.changed().await.is_ok() {
            let current = status.borrow().clone();
            if let CaptureStatus::Positioning { progress, .. } = current {
                best = best.max(progress.streak);
            }
        }
        best
    });

    let _ = session.enroll().await;
    drop(session);

    assert_eq!(watcher.await.unwrap(), 2);
}

#[tokio::test]
async fn test_permission_denied_is_reported() {
    let ctx = TestContext::new().await;
    let session = ctx.app.capture_session(Arc::new(FakeCamera::denied()));

    let err = session.enroll().await.unwrap_err();
    assert_eq!(err, BiometricError::PermissionDenied);
    match &*session.subscribe().borrow() {
        CaptureStatus::Failed { message, .. } => assert_eq!(message, err.user_message()),
        other => panic!("unexpected status {:?}", other),
    };
}

#[tokio::test]
async fn test_models_load_once_across_sessions() {
    let ctx = TestContext::new().await;

    for _ in 0..3 {
        ctx.app
            .capture_session(Arc::new(FakeCamera::new()))
            .verify(&descriptor(0.1))
            .await
            .unwrap();
    }

    assert_eq!(ctx.detector.loads.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_model_load_failure_surfaces() {
    let ctx = TestContext::with_detector(ScriptedDetector::failing_load(
        BiometricError::ModelLoad("offline".into()),
    ))
    .await;
    let camera = Arc::new(FakeCamera::new());

    let err = ctx.app.capture_session(camera.clone()).enroll().await.unwrap_err();
    assert!(matches!(err, BiometricError::ModelLoad(_)));
    assert_eq!(camera.opened.load(std::sync::atomic::Ordering::SeqCst), 0);
}
