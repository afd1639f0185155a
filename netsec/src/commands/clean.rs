// netsec/src/commands/clean.rs
//
// USE CASE: Remove past runs.

use std::path::PathBuf;

use netsec_core::application::clean_artifacts;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    match clean_artifacts(&project_dir) {
        Ok(Some(_)) => {}
        Ok(None) => println!("   Nothing to clean."),
        Err(e) => {
            eprintln!("❌ Clean failed:");
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    }
    Ok(())
}
