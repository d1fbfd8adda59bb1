use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{Cursor, Read};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voltwire::cli::parse_param;
use voltwire::protocol::{
    decode_call_response_with, decode_login_response_with, encode_call_request,
    encode_login_request, CallRequest, LoginRequest,
};
use voltwire::Config;

#[derive(Parser, Debug)]
#[command(name = "voltwire")]
#[command(about = "Encode requests and decode responses of the stored procedure wire protocol", long_about = None)]
struct Args {
    /// Directory holding voltwire.toml and an optional .env
    #[arg(long, default_value = ".")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a login request as hex
    Login {
        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        password: String,
    },

    /// Print a procedure call request as hex
    Call {
        /// Procedure name
        #[arg(long)]
        procedure: String,

        /// Client handle echoed back by the server
        #[arg(long, default_value_t = 0)]
        handle: i64,

        /// Parameter as KIND:VALUE (repeatable, in call order)
        #[arg(long = "param")]
        params: Vec<String>,
    },

    /// Decode a captured login response
    DecodeLogin(DecodeArgs),

    /// Decode a captured procedure call response
    DecodeCall(DecodeArgs),
}

#[derive(clap::Args, Debug)]
struct DecodeArgs {
    /// Input file, or - for stdin
    input: String,

    /// Input is hex text rather than raw bytes
    #[arg(long)]
    hex: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voltwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(&args.config)?;
    let limits = config.limits;

    match args.command {
        Command::Login { user, password } => {
            let bytes = encode_login_request(&LoginRequest::new(&user, &password), &limits)?;
            println!("{}", hex::encode(bytes));
        }
        Command::Call {
            procedure,
            handle,
            params,
        } => {
            let params = params
                .iter()
                .map(|p| parse_param(p))
                .collect::<Result<Vec<_>, _>>()?;
            let request = CallRequest::new(&procedure, handle, params);
            let bytes = encode_call_request(&request, &limits)?;
            tracing::info!(
                "Encoded call to {} ({} parameters, {} bytes)",
                procedure,
                request.params.len(),
                bytes.len()
            );
            println!("{}", hex::encode(bytes));
        }
        Command::DecodeLogin(decode) => {
            let mut input = Cursor::new(read_input(&decode)?);
            let response = decode_login_response_with(&mut input, &limits)?;
            print_json(&response, decode.pretty)?;
        }
        Command::DecodeCall(decode) => {
            let mut input = Cursor::new(read_input(&decode)?);
            let response = decode_call_response_with(&mut input, &limits)?;
            print_json(&response, decode.pretty)?;
        }
    }

    Ok(())
}

fn read_input(args: &DecodeArgs) -> anyhow::Result<Vec<u8>> {
    let mut raw = Vec::new();
    if args.input == "-" {
        std::io::stdin().read_to_end(&mut raw)?;
    } else {
        raw = std::fs::read(&args.input)
            .with_context(|| format!("Failed to read {}", args.input))?;
    }

    if args.hex {
        let text = String::from_utf8(raw).context("Hex input is not text")?;
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        return hex::decode(cleaned).context("Invalid hex input");
    }
    Ok(raw)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
