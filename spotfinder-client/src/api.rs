use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
    credentials::{authorization_header, CredentialProvider},
    into_json,
    json::{NewReport, RateReport, RatingResult, Report},
    Result,
};

/// Upper bound for waiting on the next chunk of a response.
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for a whole request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[async_trait]
pub trait ReportsApi: Send + Sync {
    /// Active reports around the position, nearest first.
    async fn nearby(&self, lat: f64, lng: f64, radius: f64) -> Result<Vec<Report>>;

    async fn submit(&self, new_report: &NewReport) -> Result<Report>;

    async fn rate(&self, id: &str, is_upvote: bool) -> Result<RatingResult>;
}

#[async_trait]
pub trait FavoritesApi: Send + Sync {
    async fn add_favorite(&self, id: &str) -> Result<()>;

    async fn remove_favorite(&self, id: &str) -> Result<()>;

    async fn favorites(&self) -> Result<Vec<Report>>;

    async fn favorite_ids(&self) -> Result<Vec<String>>;
}

/// SpotFinder REST API
#[derive(Clone)]
pub struct HttpApi {
    url: String,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpApi {
    /// `url` is the base of the API, e.g. `https://example.com/api`.
    pub fn try_new(url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let client = Client::builder()
            .read_timeout(READ_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let url = url.into().trim_end_matches('/').to_owned();
        Ok(Self {
            url,
            client,
            credentials,
        })
    }

    async fn send<T>(&self, req: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.add_auth_headers(req).await.send().await?;
        into_json(response).await
    }

    async fn add_auth_headers(&self, req: RequestBuilder) -> RequestBuilder {
        match authorization_header(&*self.credentials).await {
            Some(value) => req.header("Authorization", value),
            None => req,
        }
    }
}

#[async_trait]
impl ReportsApi for HttpApi {
    async fn nearby(&self, lat: f64, lng: f64, radius: f64) -> Result<Vec<Report>> {
        let url = format!("{}/reports/nearby", self.url);
        let request = self
            .client
            .get(url)
            .query(&[("lat", lat), ("lng", lng), ("radius", radius)]);
        self.send(request).await
    }

    async fn submit(&self, new_report: &NewReport) -> Result<Report> {
        let url = format!("{}/reports", self.url);
        self.send(self.client.post(url).json(new_report)).await
    }

    async fn rate(&self, id: &str, is_upvote: bool) -> Result<RatingResult> {
        let url = format!("{}/reports/{id}/rate", self.url);
        let rating = if is_upvote {
            RateReport::up()
        } else {
            RateReport::down()
        };
        self.send(self.client.put(url).json(&rating)).await
    }
}

#[async_trait]
impl FavoritesApi for HttpApi {
    async fn add_favorite(&self, id: &str) -> Result<()> {
        let url = format!("{}/reports/{id}/favorite", self.url);
        self.send(self.client.post(url)).await
    }

    async fn remove_favorite(&self, id: &str) -> Result<()> {
        let url = format!("{}/reports/{id}/favorite", self.url);
        self.send(self.client.delete(url)).await
    }

    async fn favorites(&self) -> Result<Vec<Report>> {
        let url = format!("{}/favorites", self.url);
        self.send(self.client.get(url)).await
    }

    async fn favorite_ids(&self) -> Result<Vec<String>> {
        let url = format!("{}/favorites/ids", self.url);
        self.send(self.client.get(url)).await
    }
}
