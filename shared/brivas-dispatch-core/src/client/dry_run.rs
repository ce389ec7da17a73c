use async_trait::async_trait;
use tracing::info;

use super::DispatchClient;
use crate::command::DispatchCommand;
use crate::domain::{DispatchMode, DispatchOutcome};

/// Renders the equivalent `lk` command and reports success without any network call
#[derive(Debug, Clone, Default)]
pub struct DryRunClient;

impl DryRunClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DispatchClient for DryRunClient {
    fn mode(&self) -> DispatchMode {
        DispatchMode::DryRun
    }

    async fn dispatch(&self, cmd: &DispatchCommand) -> DispatchOutcome {
        let rendered = cmd.render_cli();

        info!(
            call_id = %cmd.session.call_id,
            phone = %cmd.phone,
            command = %rendered,
            "Dry run: dispatch not sent"
        );

        DispatchOutcome::accepted(
            cmd,
            format!(
                "Dry run: call to {} prepared, not dispatched",
                cmd.lead.customer_name()
            ),
        )
        .with_command(rendered)
    }
}
