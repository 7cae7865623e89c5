//! NUT Exporter - Prometheus exporter binary for Network UPS Tools servers.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use nut_exporter::{
    nut::quote, start_web_server, ExporterConfig, NutClient, NutCollector, Observation,
    PrometheusSink, WebConfig, DEFAULT_NAMESPACE, DEFAULT_TIMEOUT_MS, DEFAULT_WEB_PORT,
};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "nut_exporter")]
#[command(about = "Prometheus exporter for Network UPS Tools")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Polls NUT servers for UPS variables and exposes them as Prometheus metrics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// NUT server to poll, as host or host:port (repeatable, comma separated)
    #[arg(
        short = 'H',
        long = "nut-host",
        value_delimiter = ',',
        default_value = "localhost"
    )]
    nut_hosts: Vec<String>,

    /// Connect, read and write deadline in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Prefix of exported metric names
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve metrics over HTTP (default)
    Serve(ServeArgs),

    /// Run a single collection pass and print the result
    Scrape(ScrapeArgs),

    /// List the UPSs and raw variables of every NUT server
    List,
}

#[derive(Args)]
struct ServeArgs {
    /// Path to serve metrics on
    #[arg(long, default_value = "/metrics")]
    metrics_path: String,

    /// Send permissive CORS headers
    #[arg(long)]
    cors: bool,
}

#[derive(Args)]
struct ScrapeArgs {
    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let exporter = exporter_config(&cli);
    exporter.validate()?;

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args, exporter).await?,
        Some(Commands::Scrape(args)) => scrape_command(args, exporter).await?,
        Some(Commands::List) => list_command(exporter).await?,
        None => {
            let serve_args = ServeArgs {
                metrics_path: "/metrics".to_string(),
                cors: false,
            };
            serve_command(&cli, &serve_args, exporter).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn exporter_config(cli: &Cli) -> ExporterConfig {
    ExporterConfig::default()
        .with_hosts(
            cli.nut_hosts
                .iter()
                .map(|h| h.trim())
                .filter(|h| !h.is_empty()),
        )
        .with_timeout_ms(cli.timeout)
        .with_namespace(cli.namespace.as_str())
}

async fn serve_command(
    cli: &Cli,
    args: &ServeArgs,
    exporter: ExporterConfig,
) -> anyhow::Result<()> {
    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_metrics_path(args.metrics_path.as_str())
        .with_cors(args.cors);

    info!("Web server configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - Metrics path: {}", web_config.metrics_path);
    info!("  - NUT timeout: {}ms", exporter.timeout_ms);

    start_web_server(web_config, exporter).await?;
    Ok(())
}

async fn scrape_command(args: &ScrapeArgs, exporter: ExporterConfig) -> anyhow::Result<()> {
    let collector = NutCollector::new(&exporter)?;

    match args.format.as_str() {
        "text" => {
            let mut sink = PrometheusSink::new(exporter.namespace.as_str());
            collector.collect(&mut sink).await?;
            print!("{}", sink.encode()?);
        }
        "json" => {
            let mut observations: Vec<Observation> = Vec::new();
            let summary = collector.collect(&mut observations).await?;
            let json = serde_json::json!({
                "summary": summary,
                "observations": observations,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        other => bail!("Unsupported format: {}. Use 'text' or 'json'", other),
    }

    Ok(())
}

async fn list_command(exporter: ExporterConfig) -> anyhow::Result<()> {
    for host in &exporter.hosts {
        println!("{}:", host);

        let mut client = match NutClient::connect(host, exporter.timeout()).await {
            Ok(client) => client,
            Err(e) => {
                println!("  unreachable: {}", e);
                continue;
            }
        };

        let upss = client
            .list_upss()
            .await
            .with_context(|| format!("listing UPSs on {}", host));
        let upss = match upss {
            Ok(upss) => upss,
            Err(e) => {
                println!("  {:#}", e);
                close_client(host, client).await;
                continue;
            }
        };

        for ups in &upss {
            println!("  {}:", ups);
            match client.list_variables(ups).await {
                Ok(vars) => {
                    let mut vars: Vec<_> = vars.into_iter().collect();
                    vars.sort();
                    for (key, value) in vars {
                        println!("    {} {}", key, quote(&value));
                    }
                }
                Err(e) => println!("    error: {}", e),
            }
        }

        close_client(host, client).await;
    }

    Ok(())
}

async fn close_client(host: &str, client: NutClient) {
    if let Err(e) = client.close().await {
        debug!("Error closing connection to {}: {}", host, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "nut_exporter",
            "--port",
            "9300",
            "-H",
            "ups-a.lan,ups-b.lan:3494",
            "--nut-host",
            "ups-c.lan",
        ])
        .unwrap();
        assert_eq!(cli.port, 9300);
        assert_eq!(cli.nut_hosts, vec!["ups-a.lan", "ups-b.lan:3494", "ups-c.lan"]);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["nut_exporter"]).unwrap();
        assert_eq!(cli.port, DEFAULT_WEB_PORT);
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT_MS);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.nut_hosts, vec!["localhost"]);

        let exporter = exporter_config(&cli);
        assert_eq!(exporter, ExporterConfig::default());
    }

    #[test]
    fn test_scrape_subcommand() {
        let cli = Cli::try_parse_from(["nut_exporter", "-H", "ups.lan", "scrape", "--format", "json"])
            .unwrap();
        match cli.command {
            Some(Commands::Scrape(args)) => assert_eq!(args.format, "json"),
            _ => panic!("expected scrape subcommand"),
        }
    }

    #[tokio::test]
    async fn test_list_command_survives_failing_host() {
        use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

        // Refuses the listing and hangs up, so closing the client may fail too.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let Ok((socket, _)) = listener.accept().await else {
                return;
            };
            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();
            if let Ok(Some(_)) = lines.next_line().await {
                let _ = write.write_all(b"ERR ACCESS-DENIED\n").await;
            }
        });

        let exporter = ExporterConfig::default()
            .with_hosts([addr.as_str()])
            .with_timeout_ms(1000);
        list_command(exporter).await.unwrap();
    }
}
