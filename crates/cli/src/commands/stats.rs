//! Stats command handler.
//!
//! Handles vector store statistics display.

use super::{open_knowledge_base, print_json};
use clap::Args;
use ragfile_core::{config::AppConfig, AppResult};

/// Show vector store statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = open_knowledge_base(config)?.stats()?;

        if self.json {
            return print_json(&stats);
        }

        println!("Store:       {}", stats.index_key);
        println!("Records:     {}", stats.records);
        println!("Unique text: {}", stats.unique_texts);
        println!("Sources:     {}", stats.sources);
        match stats.dimension {
            Some(d) => println!("Dimension:   {}", d),
            None => println!("Dimension:   -"),
        }
        if stats.dimension_mismatches > 0 {
            println!("Mismatched:  {}", stats.dimension_mismatches);
        }
        println!("Size:        {} bytes", stats.bytes);

        Ok(())
    }
}
