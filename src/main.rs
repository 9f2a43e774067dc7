use clap::Parser;

use adorna::cli::{Cli, Commands};
use adorna::config::{get_config, init_config};
use adorna::interfaces::cli::run_cli_command;
use adorna::runtime::modes::run_server;
use adorna::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&get_config().logging)?;
            run_server().await
        }
        Some(cmd) => {
            if let Err(e) = run_cli_command(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
