use crate::cli::RunConfig;
use crate::domain::models::{JsonOut, OperationResult};

/// One line per result with `--export`, a `JsonOut` envelope with `--json`,
/// silence otherwise.
pub fn print_results(config: &RunConfig, results: &[OperationResult]) -> anyhow::Result<()> {
    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut {
                ok: true,
                data: results
            })?
        );
    } else if config.export {
        for r in results {
            println!(
                "{}\t{}\t{}\t{}",
                r.action,
                r.project_name,
                status_label(r.status),
                r.body
            );
        }
    }
    Ok(())
}

fn status_label(status: Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "transport-error".to_string(),
    }
}
