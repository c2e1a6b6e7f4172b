//! Invoke command handler.
//!
//! Runs one JSON request through the knowledge base handler.

use super::open_with_synthesizer;
use clap::Args;
use ragfile_core::{config::AppConfig, AppError, AppResult};
use ragfile_knowledge::handler::handle_body;
use std::io::Read;
use tokio_util::sync::CancellationToken;

/// Handle a JSON request and print the JSON response
#[derive(Args, Debug)]
pub struct InvokeCommand {
    /// Request body, e.g. '{"question": "...", "k": 4}'; read from stdin when omitted
    pub request: Option<String>,
}

impl InvokeCommand {
    pub async fn execute(&self, config: &AppConfig, cancel: &CancellationToken) -> AppResult<()> {
        let body = match &self.request {
            Some(body) => body.clone(),
            None => {
                let mut body = String::new();
                std::io::stdin().read_to_string(&mut body)?;
                body
            }
        };

        let kb = open_with_synthesizer(config)?;
        let response = handle_body(&kb, &body, cancel).await;

        println!("{}", serde_json::to_string(&response)?);

        if response.is_error() {
            return Err(AppError::Other("request failed".to_string()));
        }
        Ok(())
    }
}
