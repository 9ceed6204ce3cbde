use crate::cli::{default_key_title, Cli, Commands, RunConfig};
use crate::domain::models::KeyPayload;
use crate::gitlab::GitlabApi;
use crate::services::applier::{apply_add, apply_remove};
use crate::services::output::print_results;

/// Run the selected operation end to end and report. Any failed result
/// turns into a nonzero exit so CI pipelines can gate on partial failure.
pub fn handle_key_command(
    cli: &Cli,
    config: &RunConfig,
    api: &dyn GitlabApi,
) -> anyhow::Result<()> {
    let results = match &cli.command {
        Commands::Add {
            title,
            key,
            can_push,
            expires_at,
        } => {
            let payload = KeyPayload {
                title: title.clone().unwrap_or_else(default_key_title),
                key: key.clone(),
                can_push: *can_push,
                expires_at: expires_at.clone(),
            };
            apply_add(api, config, &payload)
        }
        Commands::Remove { title, key, by_key } => {
            let title = title.clone().unwrap_or_else(default_key_title);
            apply_remove(api, config, &title, key.as_deref(), *by_key)
        }
    };

    print_results(config, &results)?;

    let failed = results.iter().filter(|r| r.failed()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} operations failed", failed, results.len());
    }
    Ok(())
}
