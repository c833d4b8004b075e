// tests/integration/identity_tests.rs
use std::sync::Arc;

use seguro_defeso::{
    core::{
        biometry::BiometricError,
        identity::{LoginAttempt, ProfileUpdate, Region, RegistrationForm, SecurityMode, SecuritySetup},
    },
    utils::error::AppError,
};

use crate::common::{descriptor, good_face, FakeCamera, ScriptedDetector, TestContext};

fn form(cpf: &str) -> RegistrationForm {
    RegistrationForm {
        name: "Raimundo Nonato".into(),
        cpf: cpf.into(),
        rgp: "AM-000123".into(),
        region: None,
        photo: None,
    }
}

fn pin_setup(pin: &str) -> SecuritySetup {
    SecuritySetup::Pin {
        pin: pin.into(),
        confirmation: pin.into(),
    }
}

#[test_log::test(tokio::test)]
async fn test_face_registration_and_login_through_capture() {
    let ctx = TestContext::with_detector(ScriptedDetector::always(Some(good_face(0.3)))).await;
    let identity = &ctx.app.state().identity;

    // enrollment screen
    let enrolled = ctx
        .app
        .capture_session(Arc::new(FakeCamera::new()))
        .enroll()
        .await
        .unwrap();

    let profile = identity
        .register(
            form("123.456.789-00"),
            SecuritySetup::Biometric {
                descriptor: Some(enrolled.detection.descriptor.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.cpf, "12345678900");
    assert_eq!(profile.security_mode(), SecurityMode::Biometric);
    assert_eq!(profile.region, Region::Norte);

    // login screen
    let captured = ctx
        .app
        .capture_session(Arc::new(FakeCamera::new()))
        .verify(&enrolled.detection.descriptor)
        .await
        .unwrap();

    let outcome = identity
        .login(
            "12345678900",
            LoginAttempt::Face {
                descriptor: captured.descriptor,
            },
        )
        .await
        .unwrap();
    assert!(outcome.match_result.unwrap().is_match);
}

#[tokio::test]
async fn test_face_login_rejects_someone_else() {
    let ctx = TestContext::new().await;
    let identity = &ctx.app.state().identity;

    identity
        .register(
            form("11122233344"),
            SecuritySetup::Biometric {
                descriptor: Some(descriptor(0.1)),
            },
        )
        .await
        .unwrap();

    let err = identity
        .login("11122233344", LoginAttempt::Face { descriptor: descriptor(0.5) })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Biometric(BiometricError::DescriptorMismatch { .. })
    ));
}

#[tokio::test]
async fn test_pin_profile_survives_restart() {
    let ctx = TestContext::new().await;
    let identity = &ctx.app.state().identity;

    identity.register(form("55566677788"), pin_setup("4821")).await.unwrap();
    ctx.app.shutdown().await.unwrap();

    let current = identity.current_profile().await.unwrap().unwrap();
    assert_eq!(current.cpf, "55566677788");

    assert!(identity
        .login("55566677788", LoginAttempt::Pin { pin: "4821".into() })
        .await
        .is_ok());
    assert!(matches!(
        identity
            .login("55566677788", LoginAttempt::Pin { pin: "1111".into() })
            .await,
        Err(AppError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_face_login_on_pin_profile_is_refused() {
    let ctx = TestContext::new().await;
    let identity = &ctx.app.state().identity;
    identity.register(form("99988877766"), pin_setup("0000")).await.unwrap();

    let err = identity
        .login("99988877766", LoginAttempt::Face { descriptor: descriptor(0.1) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::WrongSecurityMode(SecurityMode::Pin)));
}

#[tokio::test]
async fn test_region_change_moves_defeso_window() {
    let ctx = TestContext::new().await;
    let state = ctx.app.state();
    let profile = state.identity.register(form("10120230344"), pin_setup("1234")).await.unwrap();

    let before = state.defeso.window_for_profile(&profile).unwrap();
    assert_eq!(before.data.region, "Norte - Bacia Amazônica");

    let updated = state
        .identity
        .update_profile(
            "10120230344",
            ProfileUpdate {
                region: Some("Nordeste - Bacia do Parnaíba".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = state.defeso.window_for_profile(&updated).unwrap();
    assert_eq!(after.data.species, "Lagosta / Camarão");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let ctx = TestContext::new().await;
    let identity = &ctx.app.state().identity;

    identity.register(form("12312312312"), pin_setup("2468")).await.unwrap();
    let err = identity
        .register(form("123.123.123-12"), pin_setup("2468"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
