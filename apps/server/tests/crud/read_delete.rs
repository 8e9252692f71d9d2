//! READ (GET /companies/{id}) and DELETE (DELETE /companies/{id})

use crate::support::{
    assert_status, company_payload, json_of, with_test_app, VALID_DOCUMENT,
    VALID_DOCUMENT_DIGITS,
};
use axum::http::{Method, StatusCode};

#[tokio::test]
async fn read_returns_stored_company() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            let id = created["id"].as_str().unwrap();

            let (status, _headers, body) = app
                .request(Method::GET, &format!("/companies/{id}"), None)
                .await?;

            assert_status(status, StatusCode::OK, "read company");
            let body = json_of(&body);
            assert_eq!(body, created);
            assert_eq!(body["document_number"], VALID_DOCUMENT_DIGITS);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn read_unknown_id_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(
                    Method::GET,
                    "/companies/4f1c8a2e-0000-4000-8000-000000000000",
                    None,
                )
                .await?;

            assert_status(status, StatusCode::NOT_FOUND, "unknown id");
            let body = json_of(&body);
            assert_eq!(body["errors"], true);
            assert_eq!(body["message"], "Empresa não encontrada.");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn read_unparseable_id_is_not_found() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, _body) =
                app.request(Method::GET, "/companies/42", None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "non-uuid id");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn delete_removes_company() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            let path = format!("/companies/{}", created["id"].as_str().unwrap());

            let (status, _headers, body) = app.request(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::NO_CONTENT, "delete company");
            assert!(body.is_empty());
            assert_eq!(app.stored_count().await, 0);

            let (status, _headers, _body) = app.request(Method::GET, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "read after delete");

            let (status, _headers, _body) = app.request(Method::DELETE, &path, None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "second delete");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn deleted_document_can_be_registered_again() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            let path = format!("/companies/{}", created["id"].as_str().unwrap());
            app.request(Method::DELETE, &path, None).await?;

            let again = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            assert_ne!(again["id"], created["id"]);
            Ok(())
        })
    })
    .await
}
