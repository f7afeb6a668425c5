use async_trait::async_trait;
use gasdash_shared::{
    forms::{ProductPayload, SubscriptionPayload},
    routes::{self, Endpoint, Envelope, Method},
    session::{LoginRequest, LoginResponse},
    AdminSettings, ApiError, BulkAction, BulkBackend, BulkEntity, EntityKind, FormBackend, Order,
    Product, Session, Subscription,
};
use gloo_net::http::{Request, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

// API base URL, read from the environment at compile time. Release builds
// set GASDASH_API_BASE; local development talks to the default port.
pub const API_BASE: &str = match option_env!("GASDASH_API_BASE") {
    Some(url) => url,
    None => "http://localhost:4000/api",
};

/// `gloo-net` transport for the admin API, bound to one session.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserBackend {
    session: Session,
}

impl BrowserBackend {
    pub fn new(session: Session) -> Self {
        Self {
            session,
        }
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.session.url(path);
        let builder = match method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };
        match self.session.bearer() {
            Some(bearer) => builder.header("Authorization", &bearer),
            None => builder,
        }
    }

    fn plain(&self, endpoint: &Endpoint) -> Result<Request, ApiError> {
        self.builder(endpoint.method, &endpoint.path)
            .build()
            .map_err(|e| ApiError::Network(format!("{e:?}")))
    }

    fn with_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Request, ApiError> {
        self.builder(method, path)
            .json(body)
            .map_err(|e| ApiError::Decode(format!("{e:?}")))
    }

    async fn send_raw(&self, request: Request) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("{e:?}")))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !response.ok() {
            return Err(ApiError::from_response(status, &body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_record<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        self.send::<Envelope<T>>(request)
            .await
            .map(Envelope::into_inner)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let request = self.with_json(Method::Post, routes::login(), &body)?;
        self.send_record(request).await
    }

    pub async fn fetch_settings(&self) -> Result<AdminSettings, ApiError> {
        let request = self.plain(&Endpoint {
            method: Method::Get,
            path: routes::settings().to_string(),
        })?;
        self.send_record(request).await
    }

    pub async fn save_settings(&self, settings: &AdminSettings) -> Result<AdminSettings, ApiError> {
        let request = self.with_json(Method::Put, routes::settings(), settings)?;
        self.send_record(request).await
    }
}

/// Entities a list page can load from the backend.
#[async_trait(?Send)]
pub trait RemoteRows: BulkEntity + PartialEq + 'static {
    async fn fetch_all(backend: &BrowserBackend) -> Result<Vec<Self>, ApiError>;
}

#[async_trait(?Send)]
impl RemoteRows for Order {
    async fn fetch_all(backend: &BrowserBackend) -> Result<Vec<Self>, ApiError> {
        let request = backend.plain(&routes::list(EntityKind::Orders))?;
        let response: routes::OrderListResponse = backend.send(request).await?;
        Ok(response.orders)
    }
}

#[async_trait(?Send)]
impl RemoteRows for Subscription {
    async fn fetch_all(backend: &BrowserBackend) -> Result<Vec<Self>, ApiError> {
        let request = backend.plain(&routes::list(EntityKind::Subscriptions))?;
        let response: routes::SubscriptionListResponse = backend.send(request).await?;
        Ok(response.subscriptions)
    }
}

#[async_trait(?Send)]
impl RemoteRows for Product {
    async fn fetch_all(backend: &BrowserBackend) -> Result<Vec<Self>, ApiError> {
        let request = backend.plain(&routes::list(EntityKind::Products))?;
        let response: routes::ProductListResponse = backend.send(request).await?;
        Ok(response.products)
    }
}

#[async_trait(?Send)]
impl BulkBackend for BrowserBackend {
    fn supports_batch(&self, kind: EntityKind, action: &BulkAction) -> bool {
        routes::batch(kind, action).is_some()
    }

    async fn update_status(&self, kind: EntityKind, id: &str, status: &str) -> Result<(), ApiError> {
        let endpoint = routes::update_status(kind, id, status);
        let request = if routes::status_route_has_body(kind, status) {
            let body = routes::StatusBody::for_kind(kind, status);
            self.with_json(endpoint.method, &endpoint.path, &body)?
        } else {
            self.plain(&endpoint)?
        };
        self.send_raw(request).await.map(|_| ())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), ApiError> {
        let request = self.plain(&routes::delete(kind, id))?;
        self.send_raw(request).await.map(|_| ())
    }

    async fn bulk_update_status(
        &self,
        kind: EntityKind,
        ids: &[String],
        status: &str,
    ) -> Result<(), ApiError> {
        let action = BulkAction::SetStatus(status.to_string());
        let Some(endpoint) = routes::batch(kind, &action) else {
            return Err(ApiError::Http {
                status: 501,
                message: format!("no batch status endpoint for {kind}"),
            });
        };
        let body = routes::BulkStatusRequest {
            ids: ids.to_vec(),
            status: status.to_string(),
        };
        let request = self.with_json(endpoint.method, &endpoint.path, &body)?;
        self.send_raw(request).await.map(|_| ())
    }

    async fn bulk_delete(&self, kind: EntityKind, ids: &[String]) -> Result<(), ApiError> {
        let Some(endpoint) = routes::batch(kind, &BulkAction::Delete) else {
            return Err(ApiError::Http {
                status: 501,
                message: format!("no batch delete endpoint for {kind}"),
            });
        };
        let body = routes::BulkDeleteRequest {
            ids: ids.to_vec(),
        };
        let request = self.with_json(endpoint.method, &endpoint.path, &body)?;
        self.send_raw(request).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl FormBackend for BrowserBackend {
    async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        let endpoint = routes::create_product();
        let request = self.with_json(endpoint.method, &endpoint.path, payload)?;
        self.send_record(request).await
    }

    async fn update_product(&self, id: &str, payload: &ProductPayload) -> Result<Product, ApiError> {
        let endpoint = routes::update_product(id);
        let request = self.with_json(endpoint.method, &endpoint.path, payload)?;
        self.send_record(request).await
    }

    async fn create_subscription(
        &self,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        let endpoint = routes::create_subscription();
        let request = self.with_json(endpoint.method, &endpoint.path, payload)?;
        self.send_record(request).await
    }

    async fn update_subscription(
        &self,
        id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<Subscription, ApiError> {
        let endpoint = routes::update_subscription(id);
        let request = self.with_json(endpoint.method, &endpoint.path, payload)?;
        self.send_record(request).await
    }
}
