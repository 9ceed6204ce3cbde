//! Key operation applier: fans the chosen operation out over every
//! discovered project and collects one result per attempt.
//!
//! Best-effort batch semantics: exactly one create attempt per project for
//! add, one delete attempt per matching key for remove, no retries and no
//! rollback. A failed request becomes a degraded result for that attempt
//! only.

use crate::cli::RunConfig;
use crate::domain::models::{Action, KeyPayload, OperationResult, Project};
use crate::gitlab::GitlabApi;
use crate::services::discovery::discover_projects;
use tracing::{info, warn};

pub fn apply_add(
    api: &dyn GitlabApi,
    config: &RunConfig,
    payload: &KeyPayload,
) -> Vec<OperationResult> {
    let projects = discover_projects(api, config);
    info!(projects = projects.len(), title = %payload.title, "adding deploy key");

    projects
        .iter()
        .map(|project| {
            let resp = api.create_deploy_key(project.id, payload);
            result(project, Action::Add, resp.status, resp.body)
        })
        .collect()
}

pub fn apply_remove(
    api: &dyn GitlabApi,
    config: &RunConfig,
    title: &str,
    key_material: Option<&str>,
    remove_by_key: bool,
) -> Vec<OperationResult> {
    let projects = discover_projects(api, config);
    info!(projects = projects.len(), title, "removing deploy key");

    let mut results = Vec::new();
    for project in &projects {
        let keys = match api.project_deploy_keys(project.id) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(project = %project.name, error = %e, "deploy key listing failed, project skipped");
                continue;
            }
        };
        // All matches are deleted, not just the first: a misconfigured
        // project can hold several keys under one title.
        for key in keys {
            let title_matches = key.title == title;
            let material_matches =
                remove_by_key && key_material.is_some_and(|material| material == key.key);
            if title_matches || material_matches {
                let resp = api.delete_deploy_key(project.id, key.id);
                results.push(result(project, Action::Remove, resp.status, resp.body));
            }
        }
    }
    results
}

fn result(
    project: &Project,
    action: Action,
    status: Option<u16>,
    body: String,
) -> OperationResult {
    OperationResult {
        project_name: project.name.clone(),
        action,
        status,
        body,
    }
}
