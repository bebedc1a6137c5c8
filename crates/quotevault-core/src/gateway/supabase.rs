//! PostgREST implementation of [`QuoteBackend`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::query::QUOTE_SELECT;
use super::{BearerToken, QuoteBackend, QuoteQuery};
use crate::auth::parse_api_error;
use crate::models::{
    Category, Collection, CollectionId, CollectionQuote, FavoriteWithQuote, NewCollection,
    NewFavorite, ProfileUpdate, QuoteId, QuoteWithCategory, UserId, UserProfile,
};
use crate::util::is_http_url;
use crate::{Error, Result};

const FAVORITE_SELECT: &str = "*,quotes(*,categories(*))";

/// Client for the Supabase REST endpoint (`/rest/v1`).
#[derive(Debug, Clone)]
pub struct SupabaseGateway {
    rest_url: String,
    anon_key: String,
    client: Client,
    token: BearerToken,
}

impl SupabaseGateway {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>, token: BearerToken) -> Result<Self> {
        let rest_url = normalize_rest_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::InvalidInput(
                "Supabase anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            client: Client::builder().build()?,
            token,
        })
    }

    fn table(&self, method: Method, table: &str) -> RequestBuilder {
        self.authorize(
            self.client
                .request(method, format!("{}/{table}", self.rest_url)),
        )
    }

    fn rpc(&self, function: &str) -> RequestBuilder {
        self.authorize(
            self.client
                .post(format!("{}/rpc/{function}", self.rest_url)),
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.token.get().unwrap_or_else(|| self.anon_key.clone());
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_status(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_first<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let rows = self.fetch_rows(request.query(&[("limit", "1")])).await?;
        Ok(rows.into_iter().next())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteBackend for SupabaseGateway {
    async fn list_quotes(&self, query: &QuoteQuery) -> Result<Vec<QuoteWithCategory>> {
        tracing::debug!(
            offset = query.offset,
            limit = query.limit,
            "Fetching quotes"
        );
        self.fetch_rows(self.table(Method::GET, "quotes").query(&query.to_query_pairs()))
            .await
    }

    async fn get_quote(&self, id: QuoteId) -> Result<QuoteWithCategory> {
        self.fetch_first(
            self.table(Method::GET, "quotes")
                .query(&[
                    ("select", QUOTE_SELECT.to_string()),
                    ("id", format!("eq.{id}")),
                ]),
        )
        .await?
        .ok_or_else(|| Error::NotFound(format!("quote {id}")))
    }

    async fn quotes_by_ids(&self, ids: &[QuoteId]) -> Result<Vec<QuoteWithCategory>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.fetch_rows(
            self.table(Method::GET, "quotes")
                .query(&[
                    ("select", QUOTE_SELECT.to_string()),
                    ("id", format!("in.({ids})")),
                ]),
        )
        .await
    }

    async fn quote_for_date(&self, date: NaiveDate) -> Result<Option<QuoteWithCategory>> {
        self.fetch_first(self.table(Method::GET, "quotes").query(&[
            ("select", QUOTE_SELECT.to_string()),
            ("quote_of_day_date", format!("eq.{}", date.format("%Y-%m-%d"))),
        ]))
        .await
    }

    async fn first_unassigned_quote(&self) -> Result<Option<QuoteWithCategory>> {
        self.fetch_first(
            self.table(Method::GET, "quotes")
                .query(&[("select", QUOTE_SELECT), ("quote_of_day_date", "is.null")]),
        )
        .await
    }

    async fn first_quote(&self) -> Result<Option<QuoteWithCategory>> {
        self.fetch_first(
            self.table(Method::GET, "quotes")
                .query(&[("select", QUOTE_SELECT)]),
        )
        .await
    }

    async fn mark_quote_of_day(&self, id: QuoteId, date: NaiveDate) -> Result<()> {
        let payload = serde_json::json!({
            "quote_of_day_date": date.format("%Y-%m-%d").to_string(),
            "is_quote_of_day": true,
        });
        self.execute(
            self.table(Method::PATCH, "quotes")
                .query(&[("id", format!("eq.{id}"))])
                .json(&payload),
        )
        .await
    }

    async fn increment_likes(&self, id: QuoteId) -> Result<()> {
        self.execute(
            self.rpc("increment_likes")
                .json(&serde_json::json!({ "quote_id": id })),
        )
        .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.fetch_rows(
            self.table(Method::GET, "categories")
                .query(&[("select", "*"), ("order", "name.asc")]),
        )
        .await
    }

    async fn list_favorites(&self, user: UserId) -> Result<Vec<FavoriteWithQuote>> {
        self.fetch_rows(self.table(Method::GET, "favorites").query(&[
            ("select", FAVORITE_SELECT.to_string()),
            ("user_id", format!("eq.{user}")),
            ("order", "created_at.desc".to_string()),
        ]))
        .await
    }

    async fn favorite_quote_ids(&self, user: UserId) -> Result<Vec<QuoteId>> {
        #[derive(Deserialize)]
        struct FavoriteQuoteRef {
            quote_id: QuoteId,
        }

        let rows: Vec<FavoriteQuoteRef> = self
            .fetch_rows(
                self.table(Method::GET, "favorites")
                    .query(&[
                        ("select", "quote_id".to_string()),
                        ("user_id", format!("eq.{user}")),
                    ]),
            )
            .await?;
        Ok(rows.into_iter().map(|row| row.quote_id).collect())
    }

    async fn is_favorited(&self, user: UserId, quote: QuoteId) -> Result<bool> {
        let rows: Vec<serde_json::Value> = self
            .fetch_rows(self.table(Method::GET, "favorites").query(&[
                ("select", "id".to_string()),
                ("user_id", format!("eq.{user}")),
                ("quote_id", format!("eq.{quote}")),
            ]))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> Result<()> {
        self.execute(self.table(Method::POST, "favorites").json(&favorite))
            .await
    }

    async fn remove_favorite(&self, user: UserId, quote: QuoteId) -> Result<()> {
        self.execute(self.table(Method::DELETE, "favorites").query(&[
            ("user_id", format!("eq.{user}")),
            ("quote_id", format!("eq.{quote}")),
        ]))
        .await
    }

    async fn list_collections(&self, user: UserId) -> Result<Vec<Collection>> {
        self.fetch_rows(self.table(Method::GET, "collections").query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{user}")),
            ("order", "created_at.desc".to_string()),
        ]))
        .await
    }

    async fn count_collection_quotes(&self, collection: CollectionId) -> Result<usize> {
        let response = self
            .table(Method::GET, "collection_quotes")
            .query(&[
                ("select", "id".to_string()),
                ("collection_id", format!("eq.{collection}")),
            ])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let status = response.status();
        let total = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_status(status, &body));
        }
        if let Some(total) = total {
            return Ok(total);
        }
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        Ok(rows.len())
    }

    async fn create_collection(&self, collection: NewCollection) -> Result<Collection> {
        let rows: Vec<Collection> = self
            .fetch_rows(
                self.table(Method::POST, "collections")
                    .header("Prefer", "return=representation")
                    .json(&collection),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::Unknown("Insert returned no collection row".to_string()))
    }

    async fn rename_collection(
        &self,
        id: CollectionId,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::json!({
            "name": name,
            "updated_at": updated_at,
        });
        self.execute(
            self.table(Method::PATCH, "collections")
                .query(&[("id", format!("eq.{id}"))])
                .json(&payload),
        )
        .await
    }

    // `collection_quotes.collection_id` is `ON DELETE CASCADE`.
    async fn delete_collection(&self, id: CollectionId) -> Result<()> {
        self.execute(
            self.table(Method::DELETE, "collections")
                .query(&[("id", format!("eq.{id}"))]),
        )
        .await
    }

    async fn list_collection_entries(
        &self,
        collection: CollectionId,
    ) -> Result<Vec<CollectionQuote>> {
        self.fetch_rows(self.table(Method::GET, "collection_quotes").query(&[
            ("select", "*".to_string()),
            ("collection_id", format!("eq.{collection}")),
        ]))
        .await
    }

    async fn add_collection_quote(&self, collection: CollectionId, quote: QuoteId) -> Result<()> {
        let payload = serde_json::json!({
            "collection_id": collection,
            "quote_id": quote,
        });
        self.execute(self.table(Method::POST, "collection_quotes").json(&payload))
            .await
    }

    async fn remove_collection_quote(
        &self,
        collection: CollectionId,
        quote: QuoteId,
    ) -> Result<()> {
        self.execute(self.table(Method::DELETE, "collection_quotes").query(&[
            ("collection_id", format!("eq.{collection}")),
            ("quote_id", format!("eq.{quote}")),
        ]))
        .await
    }

    async fn collection_contains(&self, collection: CollectionId, quote: QuoteId) -> Result<bool> {
        let rows: Vec<serde_json::Value> = self
            .fetch_rows(self.table(Method::GET, "collection_quotes").query(&[
                ("select", "id".to_string()),
                ("collection_id", format!("eq.{collection}")),
                ("quote_id", format!("eq.{quote}")),
            ]))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn get_profile(&self, user: UserId) -> Result<UserProfile> {
        self.fetch_first(
            self.table(Method::GET, "profiles")
                .query(&[("select", "*".to_string()), ("id", format!("eq.{user}"))]),
        )
        .await?
        .ok_or_else(|| Error::NotFound(format!("profile {user}")))
    }

    async fn update_profile(&self, user: UserId, update: &ProfileUpdate) -> Result<()> {
        self.execute(
            self.table(Method::PATCH, "profiles")
                .query(&[("id", format!("eq.{user}"))])
                .json(update),
        )
        .await
    }
}

/// Map a non-success response onto the gateway error taxonomy
pub(crate) fn classify_status(status: StatusCode, body: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized,
        StatusCode::NOT_FOUND => Error::NotFound(parse_api_error(status, body)),
        _ if status.is_client_error() || status.is_server_error() => {
            Error::Server(parse_api_error(status, body))
        }
        _ => Error::Unknown(parse_api_error(status, body)),
    }
}

fn normalize_rest_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "Supabase URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(trimmed) {
        return Err(Error::InvalidInput(
            "Supabase URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

// `0-24/3573` or `*/0`
fn parse_content_range_total(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
