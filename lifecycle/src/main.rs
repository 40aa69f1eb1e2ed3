// myspltoken-lifecycle: runs initialize / mint / transfer / burn against a cluster
// and checks every balance change on-chain.

use std::fs;

use myspltoken_lifecycle::{
    config::LifecycleConfig,
    rpc::RpcLedger,
    scenario::{run_scenario, ScenarioPlan},
    telemetry::setup_telemetry,
    ClusterContext, LifecycleOrchestrator,
};
use solana_sdk::signature::Keypair;
use tracing::{error, info};

async fn run(config: LifecycleConfig) -> Result<(), Box<dyn std::error::Error>> {
    let payer = config.load_payer()?;
    let cluster = config.cluster();
    let ledger = RpcLedger::new(&config.rpc_url, config.commitment);

    info!(
        rpc = %ledger.url(),
        commitment = ?ledger.commitment().commitment,
        program_id = %config.program_id,
        "cluster context loaded"
    );

    let mut orchestrator = LifecycleOrchestrator::new(ClusterContext {
        ledger,
        payer,
        program_id: config.program_id,
        cluster: cluster.clone(),
        receiver_funding_lamports: config.receiver_funding_lamports,
    })?;

    let plan = ScenarioPlan::new(config.token.clone());
    let receiver = Keypair::new();
    let report = run_scenario(&mut orchestrator, &plan, &receiver).await?;

    let summary = serde_json::to_string_pretty(&report.summary(&cluster))?;
    match &config.report_file {
        Some(path) => {
            fs::write(path, &summary)?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", summary),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    setup_telemetry();

    let config = match LifecycleConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!();
            eprintln!("Optional environment variables:");
            eprintln!("  ANCHOR_PROVIDER_URL        RPC URL (fallback RPC_URL, default: http://localhost:8899)");
            eprintln!("  ANCHOR_WALLET              Payer keypair path (default: ~/.config/solana/id.json)");
            eprintln!("  MYSPLTOKEN_PROGRAM_ID      Token program ID");
            eprintln!("  COMMITMENT                 processed | confirmed | finalized (default: confirmed)");
            eprintln!("  TOKEN_NAME / TOKEN_SYMBOL / TOKEN_URI / TOKEN_DECIMALS");
            eprintln!("  RECEIVER_FUNDING_LAMPORTS  Lamports sent to the receiver (default: 2000000000)");
            eprintln!("  REPORT_FILE                Write the JSON report here instead of stdout");
            eprintln!("  RUST_LOG                   Log filter (default: info)");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!(error = %e, "lifecycle failed");
        std::process::exit(1);
    }
}
