use std::future::{Ready, ready};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Correlation id of the current request, stored in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Echoes the caller's `X-Correlation-ID` or assigns a fresh one.
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = req
            .headers()
            .get(CORRELATION_HEADER)
            .filter(|value| !value.is_empty())
            .cloned();
        let value = match header {
            Some(value) => value,
            None => HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
        };

        if let Ok(id) = value.to_str() {
            req.extensions_mut().insert(CorrelationId(id.to_string()));
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            res.headers_mut()
                .insert(HeaderName::from_static(CORRELATION_HEADER), value);
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn echoes_or_assigns_a_correlation_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestId)
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Correlation-ID", "abc-123"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.headers().get(CORRELATION_HEADER).unwrap(), "abc-123");

        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        let assigned = res.headers().get(CORRELATION_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(assigned).is_ok());
    }
}
