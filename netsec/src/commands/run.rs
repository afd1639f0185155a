// netsec/src/commands/run.rs
//
// USE CASE: Run the training pipeline.

use std::path::PathBuf;

use netsec_core::application::run_pipeline;
use netsec_core::domain::state::PipelineState;

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    let result = run_pipeline(&project_dir, print_artifact).await;

    match result {
        Ok(run_res) => {
            println!("\n📄 Run summary:\n{}", serde_yaml::to_string(&run_res)?);
            println!("✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
        }
        Err(e) => {
            let stage = e
                .stage()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "setup".to_string());
            eprintln!("\n💥 PIPELINE FAILED during {}:", stage);
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_artifact(state: &PipelineState) {
    let Some(stage) = state.completed_stage() else {
        return;
    };
    match state.artifact_yaml() {
        Ok(Some(yaml)) => println!("   ✅ {} artifact:\n{}", stage, indent(&yaml)),
        Ok(None) => {}
        Err(e) => tracing::warn!(%stage, error = %e, "Could not render artifact"),
    }
}

fn indent(yaml: &str) -> String {
    yaml.lines()
        .map(|l| format!("      {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
