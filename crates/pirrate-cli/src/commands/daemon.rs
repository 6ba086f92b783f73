use crate::commands::{load_settings, ui};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_request_core::FulfillmentPoller;
use media_request_sources::Services;
use tracing::info;

pub async fn run_daemon(once: bool, output: &Output) -> Result<()> {
    let settings = load_settings()?;
    let poller = FulfillmentPoller::from_services(&Services::from_settings(&settings));

    if !once {
        info!(operation = "daemon_start", "Starting fulfillment daemon");
        poller.run_forever().await;
        return Ok(());
    }

    let report = poller
        .run_cycle()
        .await
        .map_err(|e| eyre!("Poll cycle failed: {:#}", e))?;

    if output.is_human() {
        output.info(format!(
            "Checked {} rows: {} added, {} skipped, {} failed",
            report.rows_seen,
            report.added(),
            report.skipped(),
            report.failed()
        ));
        if !report.rows.is_empty() {
            output.println(ui::report_table(&report));
        }
    } else {
        output.json(&serde_json::to_value(&report)?);
    }
    Ok(())
}
