//! Clean command handler.

use super::open_knowledge_base;
use clap::Args;
use ragfile_core::{config::AppConfig, AppResult};

/// Delete the vector store
#[derive(Args, Debug)]
pub struct CleanCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl CleanCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let kb = open_knowledge_base(config)?;

        if !self.yes {
            eprint!(
                "Delete everything under '{}'? [y/N] ",
                kb.config().index_prefix
            );
            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer)?;
            if !matches!(answer.trim(), "y" | "Y" | "yes") {
                println!("Aborted");
                return Ok(());
            }
        }

        let removed = kb.clean()?;
        println!("Removed {} objects", removed);
        Ok(())
    }
}
