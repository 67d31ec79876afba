//! Box.com folder source
//!
//! Read-only client for the Box content API 2.0, authenticated with a
//! bearer access token (typically a service account's admin token).

use async_trait::async_trait;
use boxwalk_core::{
    BwError, BwResult, Cursor, FieldSet, FolderSource, Item, ItemKind, Page, PageRequest,
    PathEntry,
};
use chrono::{DateTime, Utc};
use oauth2::AccessToken;
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const BOX_API_URL: &str = "https://api.box.com/2.0";

const PROVIDER: &str = "box";
const USER_FIELDS: &str = "id,name,login";

/// Box client configuration
#[derive(Debug, Clone)]
pub struct BoxConfig {
    pub api_url: String,
    pub access_token: AccessToken,
    /// Act on behalf of this user id (`As-User` header)
    pub as_user: Option<String>,
}

impl BoxConfig {
    pub fn new(access_token: AccessToken) -> Self {
        Self {
            api_url: BOX_API_URL.to_string(),
            access_token,
            as_user: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_as_user(mut self, user_id: impl Into<String>) -> Self {
        self.as_user = Some(user_id.into());
        self
    }
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoxUser {
    pub id: String,
    pub name: String,
    pub login: String,
}

/// Box API client
pub struct BoxClient {
    config: BoxConfig,
    base: Url,
    http: Client,
}

impl BoxClient {
    pub fn new(config: BoxConfig) -> BwResult<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| BwError::Config(format!("invalid API URL {}: {}", config.api_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(BwError::Config(format!("invalid API URL {}", config.api_url)));
        }

        let http = Client::builder()
            .user_agent(concat!("boxwalk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BwError::Config(e.to_string()))?;

        Ok(Self { config, base, http })
    }

    /// Fetch the user the access token belongs to
    pub async fn current_user(&self) -> BwResult<BoxUser> {
        self.get_json(&["users", "me"], &[("fields", USER_FIELDS.to_string())])
            .await
    }

    fn endpoint(&self, segments: &[&str]) -> BwResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BwError::Config(format!("invalid API URL {}", self.config.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> BwResult<T> {
        let url = self.endpoint(segments)?;
        tracing::trace!(%url, "GET");

        let mut request = self
            .http
            .get(url)
            .bearer_auth(self.config.access_token.secret())
            .query(query);
        if let Some(ref user) = self.config.as_user {
            request = request.header("As-User", user);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BwError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| BwError::Serialization(e.to_string()))
    }
}

#[derive(Deserialize)]
struct BoxErrorBody {
    message: Option<String>,
}

async fn error_from_response(response: Response) -> BwError {
    let status = response.status();
    let retry_after_secs = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BoxErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);

    match status {
        StatusCode::UNAUTHORIZED => BwError::AuthFailed(message),
        StatusCode::FORBIDDEN => BwError::PermissionDenied(message),
        StatusCode::NOT_FOUND => BwError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => BwError::RateLimited { retry_after_secs },
        _ => BwError::ProviderApi {
            provider: PROVIDER.into(),
            message: format!("{}: {}", status, message),
        },
    }
}

/// Box item as returned by the folder endpoints
#[derive(Debug, Clone, Deserialize)]
struct BoxItem {
    id: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    name: String,
    path_collection: Option<BoxPathCollection>,
    size: Option<u64>,
    modified_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct BoxPathCollection {
    #[serde(default)]
    entries: Vec<BoxPathEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct BoxPathEntry {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct BoxItemPage {
    #[serde(default)]
    entries: Vec<BoxItem>,
    total_count: Option<u64>,
    next_marker: Option<String>,
}

impl BoxItem {
    /// Folders and files only; web links and anything newer map to `None`
    fn into_item(self) -> Option<Item> {
        let kind = match self.item_type.as_str() {
            "folder" => ItemKind::Folder,
            "file" => ItemKind::File,
            _ => return None,
        };

        let path_entries = self
            .path_collection
            .map(|pc| {
                pc.entries
                    .into_iter()
                    .map(|e| PathEntry::new(e.id, e.name))
                    .collect()
            })
            .unwrap_or_default();

        let modified = self
            .modified_at
            .as_deref()
            .and_then(|m| DateTime::parse_from_rfc3339(m).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(Item {
            id: self.id,
            name: self.name,
            kind,
            path_entries,
            size: self.size,
            modified,
        })
    }
}

#[async_trait]
impl FolderSource for BoxClient {
    async fn folder_info(&self, folder_id: &str, fields: &FieldSet) -> BwResult<Item> {
        let item: BoxItem = self
            .get_json(&["folders", folder_id], &[("fields", fields.to_query())])
            .await?;

        match item.into_item() {
            Some(item) if item.is_folder() => Ok(item),
            _ => Err(BwError::ProviderApi {
                provider: PROVIDER.into(),
                message: format!("{} is not a folder", folder_id),
            }),
        }
    }

    async fn folder_items(&self, folder_id: &str, request: &PageRequest) -> BwResult<Page> {
        let mut query = vec![
            ("fields", request.fields.to_query()),
            ("limit", request.limit.to_string()),
        ];
        match &request.cursor {
            Cursor::Offset(offset) => query.push(("offset", offset.to_string())),
            Cursor::Marker(marker) => {
                query.push(("usemarker", "true".to_string()));
                if let Some(marker) = marker {
                    query.push(("marker", marker.clone()));
                }
            }
        }

        let list: BoxItemPage = self
            .get_json(&["folders", folder_id, "items"], &query)
            .await?;

        let returned = list.entries.len();
        let mut entries = Vec::with_capacity(returned);
        for raw in list.entries {
            let item_type = raw.item_type.clone();
            match raw.into_item() {
                Some(item) => entries.push(item),
                None => tracing::debug!(folder_id, %item_type, "skipping unsupported item"),
            }
        }

        Ok(Page {
            skipped: returned - entries.len(),
            entries,
            total_count: list.total_count,
            next_marker: list.next_marker,
        })
    }
}
