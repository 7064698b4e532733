use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use common::{JobFixture, TestContext, date};
use haulbook::database::models::DispatchType;

mod common;

struct Billing {
    dispatcher_id: i64,
    other_dispatcher_id: i64,
    job_ids: Vec<i64>,
    stray_job_id: i64,
}

/// Three jobs for one dispatcher (1000.00, 500.00, 250.25) and one for another.
async fn billing(ctx: &TestContext) -> Billing {
    let company = ctx.company().await;
    let job_type = ctx.job_type(company.id, DispatchType::Load, 250.0).await;
    let driver = ctx.driver().await;
    let unit = ctx.unit("T-33").await;
    let dispatcher = ctx.dispatcher(10.0).await;
    let other = ctx.dispatcher(5.0).await;

    let fixture = JobFixture {
        job_date: date(2024, 6, 10),
        job_type_id: job_type.id,
        driver_id: driver.id,
        unit_id: unit.id,
        dispatcher_id: Some(dispatcher.id),
        hours: None,
        rate: 250.0,
        amount: 1000.0,
    };

    let mut job_ids = Vec::new();
    for (day, amount) in [(12, 500.0), (3, 1000.0), (20, 250.25)] {
        let job = ctx
            .job(JobFixture {
                job_date: date(2024, 6, day),
                amount,
                ..fixture.clone()
            })
            .await;
        job_ids.push(job.id);
    }
    let stray = ctx
        .job(JobFixture {
            dispatcher_id: Some(other.id),
            ..fixture
        })
        .await;

    Billing {
        dispatcher_id: dispatcher.id,
        other_dispatcher_id: other.id,
        job_ids,
        stray_job_id: stray.id,
    }
}

async fn job_status(ctx: &TestContext, job_id: i64) -> String {
    sqlx::query_scalar("SELECT invoice_status FROM jobs WHERE id = ?1")
        .bind(job_id)
        .fetch_one(&ctx.pool)
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_create_invoice_computes_totals() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = ctx.post(
        "/invoices",
        &json!({
            "dispatcherId": billing.dispatcher_id,
            "billedTo": "Route Masters Dispatch",
            "billedEmail": "billing@routemasters.example",
            "invoiceDate": "2024-07-01",
            "taxPercent": 13,
            "jobIds": [billing.job_ids[0], billing.job_ids[1], billing.job_ids[2], billing.job_ids[0]]
        }),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["invoiceNumber"], "INV-00001");
    assert_eq!(invoice["status"], "unpaid");
    assert_eq!(invoice["periodStart"], "2024-06-03");
    assert_eq!(invoice["periodEnd"], "2024-06-20");
    assert_eq!(invoice["subtotal"], 1750.25);
    assert_eq!(invoice["commissionPercent"], 10.0);
    assert_eq!(invoice["commission"], 175.03);
    assert_eq!(invoice["tax"], 204.78);
    assert_eq!(invoice["total"], 1780.0);

    let lines = invoice["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["jobDate"], "2024-06-03");
    assert_eq!(lines[0]["lineNumber"], 1);
    assert_eq!(lines[0]["unitNumber"], "T-33");
    assert_eq!(lines[2]["amount"], 250.25);

    for job_id in &billing.job_ids {
        assert_eq!(job_status(&ctx, *job_id).await, "raised");
    }
    assert_eq!(job_status(&ctx, billing.stray_job_id).await, "pending");

    let resp = test::call_service(&app, ctx.get("/invoices").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["lineCount"], 3);
    assert!(body["data"][0]["dispatcherName"].is_string());
}

#[actix_web::test]
async fn test_invoice_job_rules() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let create = |job_ids: Vec<i64>, dispatcher_id: i64| {
        ctx.post(
            "/invoices",
            &json!({ "dispatcherId": dispatcher_id, "billedTo": "Route Masters", "jobIds": job_ids }),
        )
        .to_request()
    };

    let resp = test::call_service(&app, create(vec![billing.stray_job_id], billing.dispatcher_id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, create(vec![9999], billing.dispatcher_id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Job 9999 does not exist");

    let resp = test::call_service(&app, create(vec![], billing.dispatcher_id)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, create(vec![billing.job_ids[0]], 9999)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, create(vec![billing.job_ids[0]], billing.dispatcher_id)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        create(vec![billing.job_ids[1], billing.job_ids[0]], billing.dispatcher_id),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        format!("Job {} is already on another invoice", billing.job_ids[0])
    );

    // The failed attempt must not leave job 1 attached.
    assert_eq!(job_status(&ctx, billing.job_ids[1]).await, "pending");

    let resp = test::call_service(
        &app,
        create(vec![billing.stray_job_id], billing.other_dispatcher_id),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["invoiceNumber"], "INV-00002");
    assert_eq!(invoice["commissionPercent"], 5.0);
}

#[actix_web::test]
async fn test_generated_numbers_skip_numbers_already_taken() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let create = |job_id: i64, invoice_number: Option<&str>| {
        ctx.post(
            "/invoices",
            &json!({
                "invoiceNumber": invoice_number,
                "dispatcherId": billing.dispatcher_id,
                "billedTo": "Route Masters",
                "jobIds": [job_id]
            }),
        )
        .to_request()
    };

    let resp = test::call_service(&app, create(billing.job_ids[0], Some("INV-00002"))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, create(billing.job_ids[1], None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["invoiceNumber"], "INV-00003");

    let resp = test::call_service(&app, create(billing.job_ids[2], None)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    assert_eq!(invoice["invoiceNumber"], "INV-00004");

    let resp = test::call_service(&app, ctx.get("/invoices").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 3);
}

#[actix_web::test]
async fn test_invoice_status_moves_its_jobs() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = ctx.post(
        "/invoices",
        &json!({ "dispatcherId": billing.dispatcher_id, "billedTo": "Route Masters", "jobIds": billing.job_ids }),
    );
    let invoice: Value = test::read_body_json(test::call_service(&app, req.to_request()).await).await;
    let status_uri = format!("/invoices/{}/status", invoice["id"]);

    let resp = test::call_service(&app, ctx.put(&status_uri, &json!({ "status": "paid" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["status"], "paid");
    assert_eq!(job_status(&ctx, billing.job_ids[0]).await, "received");

    let resp = test::call_service(&app, ctx.get("/invoices?status=paid").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);

    let resp = test::call_service(&app, ctx.put(&status_uri, &json!({ "status": "unpaid" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(job_status(&ctx, billing.job_ids[2]).await, "raised");

    let resp = test::call_service(&app, ctx.put(&status_uri, &json!({ "status": "void" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        ctx.put("/invoices/9999/status", &json!({ "status": "paid" })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_invoice_replaces_its_jobs() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = ctx.post(
        "/invoices",
        &json!({
            "invoiceNumber": "RM-2024-06",
            "dispatcherId": billing.dispatcher_id,
            "billedTo": "Route Masters",
            "jobIds": [billing.job_ids[0], billing.job_ids[1]]
        }),
    );
    let invoice: Value = test::read_body_json(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(invoice["subtotal"], 1500.0);
    let id = invoice["id"].as_i64().unwrap();

    let req = ctx.put(
        &format!("/invoices/{}", id),
        &json!({
            "dispatcherId": billing.dispatcher_id,
            "billedTo": "Route Masters",
            "commissionPercent": 0,
            "notes": "Net 30",
            "jobIds": [billing.job_ids[1], billing.job_ids[2]]
        }),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["invoiceNumber"], "RM-2024-06");
    assert_eq!(updated["subtotal"], 1250.25);
    assert_eq!(updated["commission"], 0.0);
    assert_eq!(updated["total"], 1250.25);
    assert_eq!(updated["notes"], "Net 30");
    assert_eq!(updated["lines"].as_array().unwrap().len(), 2);

    assert_eq!(job_status(&ctx, billing.job_ids[0]).await, "pending");
    assert_eq!(job_status(&ctx, billing.job_ids[2]).await, "raised");

    let req = ctx.put(
        "/invoices/9999",
        &json!({ "dispatcherId": billing.dispatcher_id, "billedTo": "x", "jobIds": [billing.job_ids[0]] }),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_invoice_releases_jobs() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = ctx.post(
        "/invoices",
        &json!({ "dispatcherId": billing.dispatcher_id, "billedTo": "Route Masters", "jobIds": billing.job_ids }),
    );
    let invoice: Value = test::read_body_json(test::call_service(&app, req.to_request()).await).await;
    let uri = format!("/invoices/{}", invoice["id"]);

    let resp = test::call_service(
        &app,
        ctx.delete(&format!("/dispatchers/{}", billing.dispatcher_id)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, ctx.delete(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    for job_id in &billing.job_ids {
        assert_eq!(job_status(&ctx, *job_id).await, "pending");
    }

    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_lines")
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(lines, 0);

    let resp = test::call_service(&app, ctx.get(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, ctx.delete(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_invoice_pdf_download() {
    let ctx = TestContext::new().await;
    let billing = billing(&ctx).await;
    let app = test::init_service(ctx.app()).await;

    let req = ctx.post(
        "/invoices",
        &json!({ "dispatcherId": billing.dispatcher_id, "billedTo": "Route Masters", "jobIds": billing.job_ids }),
    );
    let invoice: Value = test::read_body_json(test::call_service(&app, req.to_request()).await).await;

    let resp = test::call_service(
        &app,
        ctx.get(&format!("/invoices/{}/pdf", invoice["id"])).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"INV-00001.pdf\""
    );

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"%PDF-"));
    assert!(body.windows(5).any(|window| window == b"%%EOF"));

    let resp = test::call_service(&app, ctx.get("/invoices/9999/pdf").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
