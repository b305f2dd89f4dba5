//! # Hosting API
//!
//! The splitter needs four things from the hosting service: look up a
//! repository, create one under the authenticated account, create one under an
//! organization, and confirm the credential works. [`HostingApi`] captures
//! exactly that surface so the provisioner can be exercised against a mock,
//! and [`GitHubClient`] implements it against the GitHub REST API using a
//! blocking `reqwest` client.
//!
//! A repository that does not exist is `Ok(None)`, not an error: the
//! provisioner uses it to decide whether to create.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// A repository as reported by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRepository {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub clone_url: String,
    #[serde(default)]
    pub html_url: String,
}

/// Request body for repository creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

impl NewRepository {
    /// A public, empty repository ready to receive a pushed history.
    pub fn public(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            private: false,
            auto_init: false,
        }
    }
}

/// Who owns the repositories being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// The authenticated account
    User(String),
    /// An organization the credential can create repositories in
    Organization(String),
}

impl Owner {
    /// Interpret the `ORG` setting.
    ///
    /// A plain login is account-owned. A value with a namespace separator
    /// (`acme/platform`) is organization-owned by the segment before the
    /// first `/`.
    pub fn parse(org: &str) -> Self {
        match org.split_once('/') {
            Some((organization, _)) => Owner::Organization(organization.to_string()),
            None => Owner::User(org.to_string()),
        }
    }

    pub fn login(&self) -> &str {
        match self {
            Owner::User(login) | Owner::Organization(login) => login,
        }
    }
}

/// Trait for hosting operations - allows mocking in tests
pub trait HostingApi: Send + Sync {
    /// Look up `owner/name`; `Ok(None)` when it does not exist.
    fn get_repository(&self, owner: &str, name: &str) -> Result<Option<RemoteRepository>>;

    /// Create a repository owned by the authenticated account.
    fn create_user_repository(&self, repo: &NewRepository) -> Result<RemoteRepository>;

    /// Create a repository owned by `org`.
    fn create_org_repository(&self, org: &str, repo: &NewRepository) -> Result<RemoteRepository>;

    /// Login of the account the credential belongs to.
    fn authenticated_user(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// GitHub REST implementation of [`HostingApi`].
pub struct GitHubClient {
    http: Client,
    base: Url,
}

impl GitHubClient {
    /// Build a client for `api_url` authenticating with `token`.
    ///
    /// No request is made until an operation is called.
    pub fn new(api_url: &str, token: &SecretString) -> Result<Self> {
        let base = Url::parse(&format!("{}/", api_url.trim_end_matches('/')))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Config {
                message: "GITHUB_TOKEN contains characters not allowed in an HTTP header"
                    .to_string(),
                hint: None,
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Network {
                url: base.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { http, base })
    }

    /// Absolute URL of an API path such as `repos/acme/web-app`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        request.send().map_err(|e| Error::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn create(&self, url: Url, repo: &NewRepository) -> Result<RemoteRepository> {
        log::debug!("POST {}", url);
        let response = self.send(self.http.post(url.clone()).json(repo), &url)?;
        decode(response, &url)
    }
}

impl HostingApi for GitHubClient {
    fn get_repository(&self, owner: &str, name: &str) -> Result<Option<RemoteRepository>> {
        let url = self.endpoint(&format!("repos/{}/{}", owner, name))?;
        log::debug!("GET {}", url);
        let response = self.send(self.http.get(url.clone()), &url)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response, &url).map(Some)
    }

    fn create_user_repository(&self, repo: &NewRepository) -> Result<RemoteRepository> {
        let url = self.endpoint("user/repos")?;
        self.create(url, repo)
    }

    fn create_org_repository(&self, org: &str, repo: &NewRepository) -> Result<RemoteRepository> {
        let url = self.endpoint(&format!("orgs/{}/repos", org))?;
        self.create(url, repo)
    }

    fn authenticated_user(&self) -> Result<String> {
        let url = self.endpoint("user")?;
        let response = self.send(self.http.get(url.clone()), &url)?;
        let user: UserPayload = decode(response, &url)?;
        Ok(user.login)
    }
}

fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T> {
    let status = response.status();
    let body = response.text().map_err(|e| Error::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !status.is_success() {
        return Err(Error::Api {
            url: url.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull the human-readable message out of a GitHub error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .map(|payload| payload.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
