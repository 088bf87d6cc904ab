//! Custom axum extractors for Tollgate

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Query, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Error;

/// Request parameters merged from the query string and the body.
///
/// The body may be JSON or `application/x-www-form-urlencoded`; any other
/// content type is ignored. Body values take precedence over query values.
///
/// All input errors return 400 via `Error::Validation`.
#[derive(Debug)]
pub struct Params<T>(pub T);

fn body_kind(req: &Request) -> Option<&'static str> {
    let content_type = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    if content_type.starts_with("application/json") {
        Some("json")
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Some("form")
    } else {
        None
    }
}

impl<T, S> FromRequest<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut merged = Map::new();

        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(req.uri())
            .map_err(|e| Error::Validation(e.body_text()))?;
        merged.extend(query.into_iter().map(|(k, v)| (k, Value::String(v))));

        match body_kind(&req) {
            Some("json") => {
                let Json(body) = Json::<Map<String, Value>>::from_request(req, state)
                    .await
                    .map_err(|e| Error::Validation(e.body_text()))?;
                merged.extend(body);
            }
            Some(_) => {
                let Form(body) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| Error::Validation(e.body_text()))?;
                merged.extend(body.into_iter().map(|(k, v)| (k, Value::String(v))));
            }
            None => {}
        }

        let value = serde_json::from_value(Value::Object(merged))
            .map_err(|e| Error::Validation(format!("Invalid parameters: {}", e)))?;

        Ok(Params(value))
    }
}
