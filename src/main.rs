use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use cartlink_lib::{load_config, logging, process_upload, LocalFileUpload, UploadOutcome};

const USAGE: &str = "usage: cartlink [--config PATH] [--json] <FILE>";

struct Args {
    config: Option<PathBuf>,
    json: bool,
    file: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut config = None;
    let mut json = false;
    let mut file = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            "--json" => json = true,
            "-h" | "--help" => bail!(USAGE),
            other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
            other => {
                if file.replace(PathBuf::from(other)).is_some() {
                    bail!("only one file can be uploaded at a time\n{USAGE}");
                }
            }
        }
    }

    Ok(Args {
        config,
        json,
        file: file.context(USAGE)?,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_tracing();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;

    let upload = LocalFileUpload::new(&args.file);
    let outcome = UploadOutcome::from(process_upload(&upload, &config.shop).await);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match &outcome {
            UploadOutcome::Ready(link) => {
                println!("{}", link.url);
                eprintln!("Ready to add {} product(s) to cart", link.item_count);
            }
            UploadOutcome::Failed(failure) => eprintln!("{}", failure.error_message),
        }
    }

    Ok(if outcome.is_ready() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
