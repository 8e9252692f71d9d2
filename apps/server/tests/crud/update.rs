//! UPDATE (PUT /companies/{id})

use crate::support::{
    assert_status, company_payload, json_of, to_json_body, with_test_app, StubAnswer,
    VALID_DOCUMENT, VALID_DOCUMENT_DIGITS,
};
use axum::http::{Method, StatusCode};
use serde_json::json;

const OTHER_DOCUMENT: &str = "98.765.432/0001-10";
const OTHER_DOCUMENT_DIGITS: &str = "98765432000110";

#[tokio::test]
async fn update_overwrites_all_fields() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            let path = format!("/companies/{}", created["id"].as_str().unwrap());

            let payload = json!({
                "document_number": VALID_DOCUMENT,
                "social_name": "Acme Sul",
                "legal_name": "Acme Sul Representações Ltda",
                "creation_date": "10/01/2016",
                "responsible_email": "joao@acme.com.br",
                "responsible_name": "João Lima"
            });
            let (status, _headers, body) = app
                .request(Method::PUT, &path, Some(to_json_body(&payload)?))
                .await?;

            assert_status(status, StatusCode::OK, "update company");
            let body = json_of(&body);
            assert_eq!(body["id"], created["id"]);
            assert_eq!(body["created_at"], created["created_at"]);
            assert_eq!(body["document_number"], VALID_DOCUMENT_DIGITS);
            assert_eq!(body["social_name"], "Acme Sul");
            assert_eq!(body["creation_date"], "2016-01-10");
            assert_eq!(body["responsible_name"], "João Lima");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_with_changed_document_is_verified() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            let path = format!("/companies/{}", created["id"].as_str().unwrap());
            app.registry
                .script(OTHER_DOCUMENT_DIGITS, StubAnswer::NotFound);

            let (status, _headers, _body) = app
                .request(
                    Method::PUT,
                    &path,
                    Some(to_json_body(&company_payload(OTHER_DOCUMENT))?),
                )
                .await?;

            assert_status(status, StatusCode::NOT_FOUND, "changed document unknown");
            assert_eq!(app.registry.calls(), 2);

            let (_status, _headers, body) = app.request(Method::GET, &path, None).await?;
            assert_eq!(json_of(&body)["document_number"], VALID_DOCUMENT_DIGITS);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_unknown_id_is_not_found_before_validation() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _headers, body) = app
                .request(
                    Method::PUT,
                    "/companies/4f1c8a2e-0000-4000-8000-000000000000",
                    Some(to_json_body(&json!({ "social_name": "" }))?),
                )
                .await?;

            assert_status(status, StatusCode::NOT_FOUND, "update unknown id");
            assert_eq!(json_of(&body)["message"], "Empresa não encontrada.");
            assert_eq!(app.registry.calls(), 0);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn update_with_invalid_fields_keeps_stored_data() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let created = app.create_company(&company_payload(VALID_DOCUMENT)).await?;
            let path = format!("/companies/{}", created["id"].as_str().unwrap());

            let mut payload = company_payload(VALID_DOCUMENT);
            payload["responsible_email"] = json!("nope");
            let (status, _headers, _body) = app
                .request(Method::PUT, &path, Some(to_json_body(&payload)?))
                .await?;
            assert_status(status, StatusCode::UNPROCESSABLE_ENTITY, "invalid update");

            let (_status, _headers, body) = app.request(Method::GET, &path, None).await?;
            assert_eq!(json_of(&body), created);
            Ok(())
        })
    })
    .await
}
