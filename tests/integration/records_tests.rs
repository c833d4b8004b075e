// tests/integration/records_tests.rs
use chrono::NaiveDate;
use seguro_defeso::{
    core::{
        defeso::DefesoStatus,
        identity::{RegistrationForm, SecuritySetup},
        records::{inss::parse_brl, ContributionStatus, DocumentType, FishingMode, FishingType, ReapDraft, WaterType},
    },
    utils::error::AppError,
};

use crate::common::{at, TestContext};

async fn registered(ctx: &TestContext, cpf: &str) {
    ctx.app
        .state()
        .identity
        .register(
            RegistrationForm {
                name: "Maria das Graças".into(),
                cpf: cpf.into(),
                rgp: "PA-998877".into(),
                region: None,
                photo: None,
            },
            SecuritySetup::Pin {
                pin: "2580".into(),
                confirmation: "2580".into(),
            },
        )
        .await
        .unwrap();
}

fn draft(start: (i32, u32, u32), end: (i32, u32, u32)) -> ReapDraft {
    ReapDraft {
        id: None,
        start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
        end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2),
        water_type: Some(WaterType::Rio),
        mode: Some(FishingMode::Embarcado),
        quantity: Some("120 kg".into()),
        status: None,
        photo: None,
    }
}

#[tokio::test]
async fn test_insurance_flow_requires_documents() {
    let ctx = TestContext::new().await;
    let records = &ctx.app.state().records;
    registered(&ctx, "32132132100").await;

    let err = records
        .submit_insurance_request("32132132100", Some(FishingType::Artesanal))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    records
        .save_document(DocumentType::Rgp, "image/jpeg", vec![0xff, 0xd8, 0x01])
        .await
        .unwrap();
    records
        .save_document(DocumentType::Cpf, "image/jpeg", vec![0xff, 0xd8, 0x02])
        .await
        .unwrap();

    let request = records
        .submit_insurance_request("32132132100", Some(FishingType::Artesanal))
        .await
        .unwrap();
    assert_eq!(request.defeso.status, DefesoStatus::Upcoming);
    assert_eq!(request.defeso.start_date, NaiveDate::from_ymd_opt(2026, 11, 15).unwrap());

    assert_eq!(records.list_insurance_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insurance_needs_fishing_type() {
    let ctx = TestContext::new().await;
    registered(&ctx, "32132132100").await;

    let err = ctx
        .app
        .state()
        .records
        .submit_insurance_request("32132132100", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_reap_edit_replaces_report() {
    let ctx = TestContext::new().await;
    let records = &ctx.app.state().records;

    let saved = records.save_reap(draft((2026, 3, 16), (2026, 4, 30))).await.unwrap();

    let mut edit = draft((2026, 3, 16), (2026, 5, 15));
    edit.id = Some(saved.id.clone());
    records.save_reap(edit).await.unwrap();

    let reports = records.list_reaps().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].end_date, NaiveDate::from_ymd_opt(2026, 5, 15).unwrap());
}

#[tokio::test]
async fn test_reap_rejects_inverted_dates() {
    let ctx = TestContext::new().await;
    let err = ctx
        .app
        .state()
        .records
        .save_reap(draft((2026, 5, 1), (2026, 4, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_inss_slip_lifecycle() {
    let ctx = TestContext::new().await;
    let records = &ctx.app.state().records;

    let income = parse_brl("R$ 1.500,00").unwrap();
    let slip = records.calculate_contribution("2026-09", income).unwrap();
    assert_eq!(slip.year, 2026);
    assert_eq!(slip.status, ContributionStatus::Generated);

    records.save_contribution(&slip).await.unwrap();
    let older = records.calculate_contribution("2026-08", income).unwrap();
    records.save_contribution(&older).await.unwrap();

    let listed = records.list_contributions().await.unwrap();
    assert_eq!(listed[0].month, "2026-09");
    assert_eq!(listed[1].month, "2026-08");

    let paid = records.mark_paid(&slip.id).await.unwrap();
    assert_eq!(paid.status, ContributionStatus::Paid);

    records.delete_contribution(&older.id).await.unwrap();
    assert_eq!(records.list_contributions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_document_wallet_replaces_by_type() {
    let ctx = TestContext::new().await;
    let records = &ctx.app.state().records;

    records.save_document(DocumentType::Address, "image/png", vec![1, 2, 3]).await.unwrap();
    records.save_document(DocumentType::Address, "image/png", vec![4, 5]).await.unwrap();

    let listed = records.list_documents().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].size, 2);

    let stored = records.get_document(DocumentType::Address).await.unwrap().unwrap();
    assert_eq!(stored.bytes, vec![4, 5]);

    records.delete_document(DocumentType::Address).await.unwrap();
    assert!(records.get_document(DocumentType::Address).await.unwrap().is_none());
}

#[tokio::test]
async fn test_defeso_cache_expires_next_day() {
    let ctx = TestContext::new().await;
    let defeso = &ctx.app.state().defeso;

    let first = defeso.window_for_region("Norte - Bacia Amazônica").unwrap();
    assert_eq!(first.data.days_remaining, 45);

    ctx.clock.set(at(2026, 11, 20));
    let later = defeso.window_for_region("Norte - Bacia Amazônica").unwrap();
    assert_eq!(later.data.status, DefesoStatus::Ongoing);
    assert_eq!(later.data.end_date, NaiveDate::from_ymd_opt(2027, 3, 15).unwrap());
}
