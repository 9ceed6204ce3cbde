//! Project discovery: turns the configured group target into the flat list
//! of projects the applier will fan out over.
//!
//! The recursive walk uses an explicit work-stack instead of call-stack
//! recursion, tracks visited group ids so a malformed cyclic hierarchy
//! still terminates, and deduplicates projects reachable through more than
//! one subgroup path. A listing failure anywhere contributes nothing from
//! that branch and leaves siblings untouched.

use crate::cli::RunConfig;
use crate::domain::models::Project;
use crate::gitlab::GitlabApi;
use std::collections::HashSet;
use tracing::{debug, warn};

pub fn discover_projects(api: &dyn GitlabApi, config: &RunConfig) -> Vec<Project> {
    if !config.project_ids.is_empty() {
        return fetch_explicit(api, &config.project_ids);
    }
    let Some(group_id) = config.group_id else {
        // Validation guarantees one of group id / project ids; an empty
        // target set is still a safe answer.
        return Vec::new();
    };
    if config.recursive {
        walk_group_tree(api, group_id)
    } else {
        direct_projects(api, group_id)
    }
}

/// Explicit project ids bypass traversal entirely. Output preserves input
/// order; an id that fails to fetch is skipped, not fatal.
fn fetch_explicit(api: &dyn GitlabApi, ids: &[u64]) -> Vec<Project> {
    let mut out = Vec::new();
    for &id in ids {
        match api.project(id) {
            Ok(p) => out.push(p),
            Err(e) => warn!(project_id = id, error = %e, "skipping unfetchable project"),
        }
    }
    out
}

fn direct_projects(api: &dyn GitlabApi, group_id: u64) -> Vec<Project> {
    match api.group_projects(group_id) {
        Ok(projects) => projects,
        Err(e) => {
            warn!(group_id, error = %e, "group project listing failed");
            Vec::new()
        }
    }
}

fn walk_group_tree(api: &dyn GitlabApi, root: u64) -> Vec<Project> {
    let mut out = Vec::new();
    let mut seen_projects: HashSet<u64> = HashSet::new();
    let mut visited_groups: HashSet<u64> = HashSet::new();
    let mut pending = vec![root];

    while let Some(group_id) = pending.pop() {
        if !visited_groups.insert(group_id) {
            debug!(group_id, "group already visited, skipping");
            continue;
        }
        match api.group_projects(group_id) {
            Ok(projects) => {
                for p in projects {
                    if seen_projects.insert(p.id) {
                        out.push(p);
                    } else {
                        debug!(project_id = p.id, "duplicate project across subgroup paths");
                    }
                }
            }
            Err(e) => warn!(group_id, error = %e, "group project listing failed"),
        }
        match api.group_subgroups(group_id) {
            Ok(subgroups) => pending.extend(subgroups.iter().map(|s| s.id)),
            Err(e) => warn!(group_id, error = %e, "subgroup listing failed, subtree dropped"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::fake::{project, FakeGitlab};
    use std::time::Duration;

    fn config(group_id: Option<u64>, project_ids: Vec<u64>, recursive: bool) -> RunConfig {
        RunConfig {
            base_url: "http://gitlab.test".to_string(),
            token: "secret".to_string(),
            headers: None,
            group_id,
            project_ids,
            recursive,
            timeout: Duration::from_secs(5),
            export: false,
            json: false,
        }
    }

    fn names(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn non_recursive_returns_direct_projects_only() {
        let mut api = FakeGitlab::default();
        api.group_projects.insert(10, vec![project(1, "a")]);
        api.group_subgroups.insert(10, vec![20]);
        api.group_projects.insert(20, vec![project(2, "b")]);

        let found = discover_projects(&api, &config(Some(10), vec![], false));
        assert_eq!(names(&found), vec!["a"]);
    }

    #[test]
    fn recursive_collects_projects_from_nested_subgroups() {
        let mut api = FakeGitlab::default();
        api.group_projects.insert(10, vec![project(1, "a")]);
        api.group_subgroups.insert(10, vec![20]);
        api.group_projects.insert(20, vec![project(2, "b")]);

        let found = discover_projects(&api, &config(Some(10), vec![], true));
        let mut ids: Vec<u64> = found.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn recursive_walks_to_unbounded_depth() {
        let mut api = FakeGitlab::default();
        api.group_projects.insert(1, vec![project(100, "root")]);
        for depth in 1..=50u64 {
            api.group_subgroups.insert(depth, vec![depth + 1]);
            api.group_projects
                .insert(depth + 1, vec![project(100 + depth, "nested")]);
        }

        let found = discover_projects(&api, &config(Some(1), vec![], true));
        assert_eq!(found.len(), 51);
    }

    #[test]
    fn explicit_ids_bypass_traversal_and_keep_input_order() {
        let mut api = FakeGitlab::default();
        api.projects.insert(3, project(3, "c"));
        api.projects.insert(1, project(1, "a"));
        // Group data present but must not be consulted.
        api.group_projects.insert(10, vec![project(9, "x")]);

        let found = discover_projects(&api, &config(Some(10), vec![3, 1], true));
        assert_eq!(names(&found), vec!["c", "a"]);
    }

    #[test]
    fn unfetchable_explicit_id_is_skipped_without_aborting_the_batch() {
        let mut api = FakeGitlab::default();
        api.projects.insert(1, project(1, "a"));
        api.projects.insert(3, project(3, "c"));
        api.failing_projects.insert(2);

        let found = discover_projects(&api, &config(None, vec![1, 2, 3], false));
        assert_eq!(names(&found), vec!["a", "c"]);
    }

    #[test]
    fn failing_subtree_does_not_block_sibling_subgroups() {
        let mut api = FakeGitlab::default();
        api.group_projects.insert(10, vec![project(1, "a")]);
        api.group_subgroups.insert(10, vec![20, 30]);
        api.failing_groups.insert(20);
        api.group_projects.insert(30, vec![project(3, "c")]);

        let found = discover_projects(&api, &config(Some(10), vec![], true));
        let mut got = names(&found);
        got.sort_unstable();
        assert_eq!(got, vec!["a", "c"]);
    }

    #[test]
    fn duplicate_projects_across_branches_appear_once() {
        let mut api = FakeGitlab::default();
        api.group_subgroups.insert(10, vec![20, 30]);
        api.group_projects.insert(20, vec![project(5, "shared")]);
        api.group_projects.insert(30, vec![project(5, "shared"), project(6, "own")]);

        let found = discover_projects(&api, &config(Some(10), vec![], true));
        assert_eq!(found.len(), 2);
        assert_eq!(found.iter().filter(|p| p.id == 5).count(), 1);
    }

    #[test]
    fn cyclic_group_graph_terminates() {
        let mut api = FakeGitlab::default();
        api.group_subgroups.insert(10, vec![20]);
        api.group_subgroups.insert(20, vec![10]);
        api.group_projects.insert(20, vec![project(2, "b")]);

        let found = discover_projects(&api, &config(Some(10), vec![], true));
        assert_eq!(names(&found), vec!["b"]);
    }

    #[test]
    fn failing_root_group_yields_empty_set() {
        let mut api = FakeGitlab::default();
        api.failing_groups.insert(10);

        let found = discover_projects(&api, &config(Some(10), vec![], false));
        assert!(found.is_empty());
    }
}
