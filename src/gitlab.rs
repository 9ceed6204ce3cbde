//! GitLab remote interface: the `GitlabApi` seam, its blocking HTTP
//! implementation, and the degraded-capture semantics for mutations.
//!
//! Reads (group/project/key listings) return `Result` and let the caller
//! decide how far the failure reaches. Mutations (create/delete) never
//! fail: they always produce an [`ApiResponse`], with `status: None` when
//! the transport itself broke down.

use crate::cli::RunConfig;
use crate::domain::models::{DeployKey, KeyPayload, Project, SubgroupRef};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub enum GitlabError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid header {0:?}")]
    InvalidHeader(String),
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Raw outcome of a mutation request. `status` is absent when no response
/// was received at all.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: Option<u16>,
    pub body: String,
}

/// The remote endpoints the traversal and the applier consume.
pub trait GitlabApi {
    fn group_projects(&self, group_id: u64) -> Result<Vec<Project>, GitlabError>;
    fn group_subgroups(&self, group_id: u64) -> Result<Vec<SubgroupRef>, GitlabError>;
    fn project(&self, project_id: u64) -> Result<Project, GitlabError>;
    fn project_deploy_keys(&self, project_id: u64) -> Result<Vec<DeployKey>, GitlabError>;
    fn create_deploy_key(&self, project_id: u64, payload: &KeyPayload) -> ApiResponse;
    fn delete_deploy_key(&self, project_id: u64, key_id: u64) -> ApiResponse;
}

pub struct HttpGitlab {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpGitlab {
    pub fn new(config: &RunConfig) -> Result<Self, GitlabError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GitlabError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            headers: build_headers(config)?,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GitlabError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .map_err(|source| GitlabError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GitlabError::Status {
                url,
                status: status.as_u16(),
            });
        }
        resp.json::<T>()
            .map_err(|source| GitlabError::Decode { url, source })
    }

    fn capture(&self, req: reqwest::blocking::RequestBuilder, url: &str) -> ApiResponse {
        match req.headers(self.headers.clone()).send() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().unwrap_or_default();
                ApiResponse {
                    status: Some(status),
                    body,
                }
            }
            Err(e) => {
                warn!(url, error = %e, "transport failure");
                ApiResponse {
                    status: None,
                    body: String::new(),
                }
            }
        }
    }
}

impl GitlabApi for HttpGitlab {
    fn group_projects(&self, group_id: u64) -> Result<Vec<Project>, GitlabError> {
        self.get_json(&format!("/groups/{}/projects", group_id))
    }

    fn group_subgroups(&self, group_id: u64) -> Result<Vec<SubgroupRef>, GitlabError> {
        self.get_json(&format!("/groups/{}/subgroups", group_id))
    }

    fn project(&self, project_id: u64) -> Result<Project, GitlabError> {
        self.get_json(&format!("/projects/{}", project_id))
    }

    fn project_deploy_keys(&self, project_id: u64) -> Result<Vec<DeployKey>, GitlabError> {
        self.get_json(&format!("/projects/{}/deploy_keys", project_id))
    }

    fn create_deploy_key(&self, project_id: u64, payload: &KeyPayload) -> ApiResponse {
        let url = format!("{}/projects/{}/deploy_keys", self.base_url, project_id);
        self.capture(self.client.post(&url).json(payload), &url)
    }

    fn delete_deploy_key(&self, project_id: u64, key_id: u64) -> ApiResponse {
        let url = format!(
            "{}/projects/{}/deploy_keys/{}",
            self.base_url, project_id, key_id
        );
        self.capture(self.client.delete(&url), &url)
    }
}

fn build_headers(config: &RunConfig) -> Result<HeaderMap, GitlabError> {
    let mut map = HeaderMap::new();
    match &config.headers {
        Some(overrides) => {
            for (name, value) in overrides {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| GitlabError::InvalidHeader(name.clone()))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|_| GitlabError::InvalidHeader(name.to_string()))?;
                map.insert(name, value);
            }
        }
        None => {
            let value = HeaderValue::from_str(&config.token)
                .map_err(|_| GitlabError::InvalidHeader("PRIVATE-TOKEN".to_string()))?;
            map.insert("PRIVATE-TOKEN", value);
        }
    }
    Ok(map)
}
