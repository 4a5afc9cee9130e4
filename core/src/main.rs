use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ledger_admin::error::diagnostic;
use ledger_admin::{
    create_channel, install_chaincode, invoke_chaincode, AdminSettings, ChaincodeSpec,
    ChannelOutcome, DevNetwork, Error, InvokeRequest, IssuingAuthority, LevelDbCollection,
    LevelDbManager, Session,
};

#[derive(Parser, Debug)]
#[command(name = "ledger-admin")]
#[command(about = "Administration of a multi-organization permissioned ledger network")]
#[command(version)]
struct Cli {
    /// Network and session settings
    #[arg(short, long, default_value = "ledger-admin.toml")]
    config: PathBuf,

    /// Run against the in-process development network
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Installs a chaincode on the peers of every organization.
    Install {
        #[arg(short = 'p', long)]
        path: String,
        #[arg(short = 'i', long)]
        id: String,
        #[arg(short = 'v', long)]
        version: String,
    },
    /// Creates a channel signed by every organization and by the orderer admin.
    CreateChannel {
        #[arg(short, long)]
        name: String,
    },
    /// Invokes a chaincode function and waits for its transaction to be committed.
    Invoke {
        #[arg(long)]
        org: String,
        #[arg(short = 'i', long)]
        id: String,
        #[arg(long)]
        fcn: String,
        #[arg(long = "arg")]
        args: Vec<String>,
        #[arg(short, long)]
        channel: String,
        /// Also wait for a chaincode event whose name matches this pattern
        #[arg(long)]
        event: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            log::error!("{}", diagnostic(&error));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool, Error> {
    if !cli.dev {
        return Err(Error::NoTransport);
    }
    let settings = AdminSettings::load(&cli.config)?;
    let network = Arc::new(DevNetwork::new());
    let authority: Arc<dyn IssuingAuthority> = network.clone();
    let session: Session<DevNetwork, LevelDbManager, LevelDbCollection> = Session::open(
        settings,
        network,
        Arc::new(LevelDbManager::new()),
        Some(authority),
    )
    .await?;

    let succeeded = match cli.command {
        Command::Install { path, id, version } => {
            let report = install_chaincode(&session, &ChaincodeSpec { path, id, version }).await;
            report.all_endorsed()
        }
        Command::CreateChannel { name } => {
            create_channel(&session, &name).await == ChannelOutcome::Created
        }
        Command::Invoke {
            org,
            id,
            fcn,
            args,
            channel,
            event,
        } => {
            let request = InvokeRequest {
                chaincode_id: id,
                fcn,
                args,
                channel,
                event_pattern: event,
            };
            match invoke_chaincode(&session, &org, &request).await {
                Ok(outcome) => {
                    log::info!("Transaction id: {}", outcome.tx_id);
                    true
                }
                Err(error) => {
                    log::error!("Failed to invoke {}: {}", request.chaincode_id, diagnostic(&error));
                    false
                }
            }
        }
    };
    session.close().await;
    Ok(succeeded)
}
