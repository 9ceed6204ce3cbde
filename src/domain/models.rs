use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// A repository-like entity that can hold deploy keys. Fields beyond
/// `id`/`name` are carried opaquely so `--json` output round-trips whatever
/// the API returned.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A nested group as returned by the subgroups listing; only the id drives
/// the traversal.
#[derive(Debug, Deserialize, Clone)]
pub struct SubgroupRef {
    pub id: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeployKey {
    pub id: u64,
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub can_push: bool,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Create-deploy-key request body, sent unchanged to every targeted project.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct KeyPayload {
    pub title: String,
    pub key: String,
    pub can_push: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Remove,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Add => write!(f, "add"),
            Action::Remove => write!(f, "remove"),
        }
    }
}

/// Outcome of one add/delete attempt against one project. `status` is `None`
/// when the transport itself failed and no response was received.
#[derive(Debug, Serialize, Clone)]
pub struct OperationResult {
    pub project_name: String,
    pub action: Action,
    pub status: Option<u16>,
    pub body: String,
}

impl OperationResult {
    pub fn failed(&self) -> bool {
        match self.status {
            Some(code) => code >= 400,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_omits_absent_expiry() {
        let payload = KeyPayload {
            title: "Key-2024-01-01".to_string(),
            key: "ssh-ed25519 AAAA".to_string(),
            can_push: true,
            expires_at: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("expires_at").is_none());
        assert_eq!(json["can_push"], true);
    }

    #[test]
    fn project_keeps_passthrough_fields() {
        let raw = r#"{"id": 7, "name": "api", "path_with_namespace": "org/api"}"#;
        let p: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(p.id, 7);
        assert_eq!(p.extra["path_with_namespace"], "org/api");
    }

    #[test]
    fn absent_status_counts_as_failure() {
        let r = OperationResult {
            project_name: "api".to_string(),
            action: Action::Add,
            status: None,
            body: String::new(),
        };
        assert!(r.failed());
        let ok = OperationResult { status: Some(201), ..r.clone() };
        assert!(!ok.failed());
        let denied = OperationResult { status: Some(403), ..r };
        assert!(denied.failed());
    }
}
