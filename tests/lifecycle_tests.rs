//! End-to-end lifecycle scenarios over the service facade and the
//! in-memory infrastructure.

#![allow(clippy::unwrap_used)]

use rfq_engine::application::{
    ApplicationError, CallerContext, CreateRfqRequest, QuoteSubmission, RfqService,
};
use rfq_engine::config::EngineConfig;
use rfq_engine::domain::entities::quote::QuoteLineItem;
use rfq_engine::domain::entities::rfq::ItemRequirement;
use rfq_engine::domain::errors::{DomainError, EligibilityError};
use rfq_engine::domain::value_objects::{
    Money, QuoteStatus, RfqStatus, SelectionCriteria, SupplierId, Timestamp, Visibility,
};
use rfq_engine::infrastructure::directory::InMemorySupplierDirectory;
use rfq_engine::infrastructure::numbering::InMemoryNumberGenerator;
use rfq_engine::infrastructure::persistence::in_memory::InMemoryRfqRepository;
use std::sync::Arc;

fn service() -> RfqService {
    let config = EngineConfig {
        retry_initial_delay_ms: 1,
        retry_max_delay_ms: 5,
        ..EngineConfig::default()
    };
    RfqService::new(
        Arc::new(InMemoryRfqRepository::new()),
        Arc::new(InMemoryNumberGenerator::new()),
        Arc::new(InMemorySupplierDirectory::with_active([
            SupplierId::new("supplier-1"),
            SupplierId::new("supplier-2"),
            SupplierId::new("supplier-3"),
        ])),
        config,
    )
}

fn buyer() -> CallerContext {
    CallerContext::buyer("buyer-1", "acme")
}

fn supplier(id: &str) -> CallerContext {
    CallerContext::supplier(format!("user-at-{id}"), id)
}

fn request() -> CreateRfqRequest {
    CreateRfqRequest {
        title: "Hydraulic fittings Q3".to_owned(),
        description: "Restock for plant 4".to_owned(),
        category: "hydraulics".to_owned(),
        items: vec![
            ItemRequirement::new("Elbow fitting 3/4\"", 1_000, "pcs"),
            ItemRequirement::new("Straight coupling 1/2\"", 400, "pcs"),
        ],
        delivery_location: "Plant 4, Dock B".to_owned(),
        delivery_terms: Some("DAP".to_owned()),
        criteria: SelectionCriteria::price_only(),
        due_date: None,
        valid_until: None,
        visibility: Visibility::Public,
        invited_suppliers: Vec::new(),
        excluded_suppliers: Vec::new(),
    }
}

fn submission(amount: f64) -> QuoteSubmission {
    QuoteSubmission {
        total_amount: Money::new(amount, "USD").unwrap(),
        valid_until: Timestamp::now().add_days(30),
        line_items: vec![
            QuoteLineItem {
                item_index: 0,
                unit_price: Money::new(amount * 0.7 / 1_000.0, "USD").unwrap(),
                quantity: 1_000,
                lead_time_days: 14,
                notes: None,
            },
            QuoteLineItem {
                item_index: 1,
                unit_price: Money::new(amount * 0.3 / 400.0, "USD").unwrap(),
                quantity: 400,
                lead_time_days: 14,
                notes: None,
            },
        ],
    }
}

#[tokio::test]
async fn price_only_scores_span_the_normalized_range() {
    // Two quotes at 100 and 200 with price-only weights: scores 100 and 0.
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(100.0))
        .await
        .unwrap();
    service
        .submit_quote(&supplier("supplier-2"), view.id, submission(200.0))
        .await
        .unwrap();

    let ranking = service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].supplier_id, SupplierId::new("supplier-1"));
    assert!((ranking[0].score - 100.0).abs() < f64::EPSILON);
    assert!(ranking[1].score.abs() < f64::EPSILON);

    // Display scores are persisted rounded; ranks 1 and 2.
    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    let best = rfq
        .quotes()
        .iter()
        .find(|q| q.supplier_id() == &SupplierId::new("supplier-1"))
        .unwrap();
    assert_eq!(best.score(), Some(100.0));
    assert_eq!(best.ranking(), Some(1));
}

#[tokio::test]
async fn ties_break_by_submission_time() {
    // Equal totals tie at 100; the earlier submission ranks first.
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    service
        .submit_quote(&supplier("supplier-2"), view.id, submission(150.0))
        .await
        .unwrap();
    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(150.0))
        .await
        .unwrap();

    let ranking = service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    assert!((ranking[0].score - 100.0).abs() < f64::EPSILON);
    assert!((ranking[1].score - 100.0).abs() < f64::EPSILON);
    assert_eq!(ranking[0].supplier_id, SupplierId::new("supplier-2"));
    assert_eq!(ranking[0].rank, 1);
    assert_eq!(ranking[1].rank, 2);
}

#[tokio::test]
async fn tied_leaders_rank_by_submission_with_the_rest_below() {
    // 100 / 100 / 150: the two leaders tie at score 100 and split ranks 1
    // and 2 by submission time; the 150 quote scores 0 at rank 3.
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(100.0))
        .await
        .unwrap();
    service
        .submit_quote(&supplier("supplier-2"), view.id, submission(100.0))
        .await
        .unwrap();
    service
        .submit_quote(&supplier("supplier-3"), view.id, submission(150.0))
        .await
        .unwrap();

    let ranking = service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    assert_eq!(ranking.len(), 3);

    assert_eq!(ranking[0].supplier_id, SupplierId::new("supplier-1"));
    assert_eq!(ranking[0].rank, 1);
    assert!((ranking[0].score - 100.0).abs() < f64::EPSILON);

    assert_eq!(ranking[1].supplier_id, SupplierId::new("supplier-2"));
    assert_eq!(ranking[1].rank, 2);
    assert!((ranking[1].score - 100.0).abs() < f64::EPSILON);

    assert_eq!(ranking[2].supplier_id, SupplierId::new("supplier-3"));
    assert_eq!(ranking[2].rank, 3);
    assert!(ranking[2].score.abs() < f64::EPSILON);
}

#[tokio::test]
async fn concurrent_duplicate_submissions_admit_exactly_one() {
    let service = Arc::new(service());
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .submit_quote(&supplier("supplier-1"), view.id, submission(120.0))
                .await
        })
    };
    let second = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .submit_quote(&supplier("supplier-1"), view.id, submission(110.0))
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let failure = results.into_iter().find(Result::is_err).unwrap();
    assert!(matches!(
        failure,
        Err(ApplicationError::Domain(DomainError::Eligibility(
            EligibilityError::DuplicateQuote(_)
        )))
    ));

    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.competing_quotes().count(), 1);
}

#[tokio::test]
async fn backward_deadline_extension_is_rejected() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    let earlier = Timestamp::now().add_days(7);
    let result = service.extend_deadline(&buyer(), view.id, earlier).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::DeadlineNotForward { .. }))
    ));

    // Deadline unchanged.
    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.due_date(), view.due_date);
}

#[tokio::test]
async fn cancel_after_award_is_a_state_error() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();
    let receipt = service
        .submit_quote(&supplier("supplier-1"), view.id, submission(500.0))
        .await
        .unwrap();
    service
        .award(
            &buyer(),
            view.id,
            SupplierId::new("supplier-1"),
            receipt.quote_id.unwrap(),
        )
        .await
        .unwrap();

    let result = service.cancel_rfq(&buyer(), view.id, "changed my mind").await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.status(), RfqStatus::Awarded);
}

#[tokio::test]
async fn award_finalizes_every_quote() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    for (supplier_id, amount) in [
        ("supplier-1", 1_000.0),
        ("supplier-2", 900.0),
        ("supplier-3", 1_100.0),
    ] {
        service
            .submit_quote(&supplier(supplier_id), view.id, submission(amount))
            .await
            .unwrap();
    }
    let ranking = service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    let winner = &ranking[0];
    assert_eq!(winner.supplier_id, SupplierId::new("supplier-2"));

    service
        .award(&buyer(), view.id, winner.supplier_id.clone(), winner.quote_id)
        .await
        .unwrap();

    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.status(), RfqStatus::Awarded);
    assert_eq!(rfq.awarded_to(), Some(&SupplierId::new("supplier-2")));
    for quote in rfq.quotes() {
        if quote.id() == winner.quote_id {
            assert_eq!(quote.status(), QuoteStatus::Accepted);
        } else {
            assert_eq!(quote.status(), QuoteStatus::Rejected);
        }
    }
}

#[tokio::test]
async fn revision_supersedes_and_rescores() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(200.0))
        .await
        .unwrap();
    service
        .submit_quote(&supplier("supplier-2"), view.id, submission(150.0))
        .await
        .unwrap();

    // supplier-1 undercuts with a revision.
    service
        .revise_quote(&supplier("supplier-1"), view.id, submission(100.0))
        .await
        .unwrap();

    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.quotes().len(), 3);
    assert_eq!(rfq.competing_quotes().count(), 2);

    let ranking = service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    assert_eq!(ranking[0].supplier_id, SupplierId::new("supplier-1"));
    assert!((ranking[0].score - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn withdrawn_quote_allows_resubmission() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(300.0))
        .await
        .unwrap();
    service
        .withdraw_quote(&supplier("supplier-1"), view.id)
        .await
        .unwrap();
    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(250.0))
        .await
        .unwrap();

    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.quotes().len(), 2);
    assert_eq!(rfq.competing_quotes().count(), 1);
}

#[tokio::test]
async fn evaluation_with_no_quotes_is_a_noop() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    let ranking = service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    assert!(ranking.is_empty());

    // No quotes_evaluated entry was appended.
    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert!(!rfq
        .activity_log()
        .iter()
        .any(|entry| entry.kind.action() == "quotes_evaluated"));
}

#[tokio::test]
async fn award_with_no_quotes_fails() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    let result = service
        .award(
            &buyer(),
            view.id,
            SupplierId::new("supplier-1"),
            rfq_engine::domain::value_objects::QuoteId::new_v4(),
        )
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::QuoteNotFound(_)))
    ));
}

#[tokio::test]
async fn expired_rfq_rejects_submissions_lazily() {
    let service = service();
    let mut create = request();
    let now = Timestamp::now();
    // A one-second quoting window that lapses immediately.
    create.due_date = Some(now.add_secs(1));
    create.valid_until = Some(now.add_days(30));
    let view = service.create_rfq(&buyer(), create).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1_100)).await;

    let result = service
        .submit_quote(&supplier("supplier-1"), view.id, submission(100.0))
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Eligibility(
            EligibilityError::RfqNotActive(_)
        )))
    ));

    // The lazily observed expiry was persisted.
    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    assert_eq!(rfq.status(), RfqStatus::Expired);
    assert!(rfq
        .activity_log()
        .iter()
        .any(|entry| entry.kind.action() == "rfq_expired" && entry.actor == "system"));
}

#[tokio::test]
async fn activity_log_orders_the_full_history() {
    let service = service();
    let view = service.create_rfq(&buyer(), request()).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();
    let receipt = service
        .submit_quote(&supplier("supplier-1"), view.id, submission(500.0))
        .await
        .unwrap();
    service.evaluate_quotes(&buyer(), view.id).await.unwrap();
    service
        .award(
            &buyer(),
            view.id,
            SupplierId::new("supplier-1"),
            receipt.quote_id.unwrap(),
        )
        .await
        .unwrap();

    let rfq = service.get_rfq(&buyer(), view.id).await.unwrap();
    let actions: Vec<&str> = rfq
        .activity_log()
        .iter()
        .map(|entry| entry.kind.action())
        .collect();
    assert_eq!(
        actions,
        [
            "rfq_created",
            "rfq_published",
            "quote_submitted",
            "quotes_evaluated",
            "rfq_awarded",
        ]
    );
    assert_eq!(rfq.version(), rfq.activity_log().len() as u64);
}

#[tokio::test]
async fn invited_visibility_is_enforced_end_to_end() {
    let service = service();
    let mut create = request();
    create.visibility = Visibility::Invited;
    create.invited_suppliers = vec![SupplierId::new("supplier-1")];
    let view = service.create_rfq(&buyer(), create).await.unwrap();
    service.publish_rfq(&buyer(), view.id).await.unwrap();

    service
        .submit_quote(&supplier("supplier-1"), view.id, submission(100.0))
        .await
        .unwrap();
    let denied = service
        .submit_quote(&supplier("supplier-2"), view.id, submission(90.0))
        .await;
    assert!(matches!(
        denied,
        Err(ApplicationError::Domain(DomainError::Eligibility(
            EligibilityError::VisibilityDenied(_)
        )))
    ));
}
