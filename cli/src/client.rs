//! `reqwest` client for the admin REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use gasdash_shared::{
    forms::{ProductPayload, SubscriptionPayload},
    routes::{self, Endpoint, Envelope, Method},
    session::{LoginRequest, LoginResponse},
    AdminSettings, ApiError, BulkAction, BulkBackend, EntityKind, FormBackend, Order, Product,
    Session, Subscription,
};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

pub struct AdminClient {
    http: Client,
    session: Session,
}

impl AdminClient {
    pub fn new(session: Session, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gasdash-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build admin http client")?;
        Ok(Self {
            http,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.session.url(path);
        let builder = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Patch => self.http.patch(url),
            Method::Delete => self.http.delete(url),
        };
        match self.session.bearer() {
            Some(bearer) => builder.header(reqwest::header::AUTHORIZATION, bearer),
            None => builder,
        }
    }

    fn endpoint(&self, endpoint: &Endpoint) -> RequestBuilder {
        self.request(endpoint.method, &endpoint.path)
    }

    async fn send_raw(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %err, "admin api request failed");
            return Err(err);
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(builder).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn send_record<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send::<Envelope<T>>(builder)
            .await
            .map(Envelope::into_inner)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_raw(self.endpoint(endpoint).json(body))
            .await
            .map(|_| ())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_record(self.request(Method::Post, routes::login()).json(&body))
            .await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let endpoint = routes::list(EntityKind::Orders);
        let response: routes::OrderListResponse = self.send(self.endpoint(&endpoint)).await?;
        Ok(response.orders)
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        let endpoint = routes::list(EntityKind::Subscriptions);
        let response: routes::SubscriptionListResponse = self.send(self.endpoint(&endpoint)).await?;
        Ok(response.subscriptions)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let endpoint = routes::list(EntityKind::Products);
        let response: routes::ProductListResponse = self.send(self.endpoint(&endpoint)).await?;
        Ok(response.products)
    }

    pub async fn fetch_settings(&self) -> Result<AdminSettings, ApiError> {
        self.send_record(self.request(Method::Get, routes::settings()))
            .await
    }

    pub async fn save_settings(&self, settings: &AdminSettings) -> Result<AdminSettings, ApiError> {
        self.send_record(self.request(Method::Put, routes::settings()).json(settings))
            .await
    }
}

#[async_trait(?Send)]
impl BulkBackend for AdminClient {
    fn supports_batch(&self, kind: EntityKind, action: &BulkAction) -> bool {
        routes::batch(kind, action).is_some()
    }

    async fn update_status(&self, kind: EntityKind, id: &str, status: &str) -> Result<(), ApiError> {
        let endpoint = routes::update_status(kind, id, status);
        tracing::debug!(%kind, id, status, path = %endpoint.path, "updating status");
        if routes::status_route_has_body(kind, status) {
            self.send_json(&endpoint, &routes::StatusBody::for_kind(kind, status))
                .await
        } else {
            self.send_raw(self.endpoint(&endpoint)).await.map(|_| ())
        }
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ApiError> {
        let endpoint = routes::delete(kind, id);
        self.send_raw(self.endpoint(&endpoint)).await.map(|_| ())
    }

    async fn bulk_update_status(
        &self,
        kind: EntityKind,
        ids: &[String],
        status: &str,
    ) -> Result<(), ApiError> {
        let action = BulkAction::SetStatus(status.to_string());
        let endpoint = routes::batch(kind, &action).ok_or_else(|| ApiError::Http {
            status: 501,
            message: format!("no batch status endpoint for {kind}"),
        })?;
        let body = routes::BulkStatusRequest {
            ids: ids.to_vec(),
            status: status.to_string(),
        };
        self.send_json(&endpoint, &body).await
    }

    async fn bulk_delete(&self, kind: EntityKind, ids: &[String]) -> Result<(), ApiError> {
        let endpoint = routes::batch(kind, &BulkAction::Delete).ok_or_else(|| ApiError::Http {
            status: 501,
            message: format!("no batch delete endpoint for {kind}"),
        })?;
        let body = routes::BulkDeleteRequest {
            ids: ids.to_vec(),
        };
        self.send_json(&endpoint, &body).await
    }
}

#[async_trait(?Send)]
impl FormBackend for AdminClient {
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.send_record(self.endpoint(&routes::create_product()).json(payload))
            .await
    }

    async fn update_product(&self, id: &str, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.send_record(self.endpoint(&routes::update_product(id)).json(payload))
            .await
    }

    async fn create_subscription(
        &self,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        self.send_record(self.endpoint(&routes::create_subscription()).json(payload))
            .await
    }

    async fn update_subscription(
        &self,
        id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        self.send_record(self.endpoint(&routes::update_subscription(id)).json(payload))
            .await
    }
}
