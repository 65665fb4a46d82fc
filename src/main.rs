// src/main.rs

use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};

use openrtb::{BidRequest, BidResponse, ModelError};

mod config;
mod logging;

use config::{ConfigManager, PayloadKind};

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "Decode and inspect OpenRTB payloads")]
struct CliArgs {
    /// payload 文件路径，"-" 表示 stdin
    input: String,
    #[arg(short, long, value_enum, default_value_t = PayloadKind::Request)]
    kind: PayloadKind,
    #[arg(long)]
    log_dir: Option<String>,
    /// 额外输出重新序列化后的 payload
    #[arg(long)]
    echo: bool,
}

#[derive(Error, Debug)]
enum InspectError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = ConfigManager::new(&args.input, args.kind, args.log_dir.as_deref(), args.echo);

    let _guard = match logging::logger::init(config.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Unable to set global tracing subscriber: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(input = %config.input_label(), kind = ?config.kind, "inspecting OpenRTB payload");

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(input = %config.input_label(), error = %e, "failed to inspect payload");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ConfigManager) -> Result<(), InspectError> {
    let payload = read_payload(config)?;

    let (summary, echo) = match config.kind {
        PayloadKind::Request => {
            let request: BidRequest = openrtb::from_slice(&payload)?;
            info!(request_id = %request.id, imp_count = request.imp.len(), "decoded bid request");
            (summarize_request(&request), encode(&request)?)
        }
        PayloadKind::Response => {
            let response: BidResponse = openrtb::from_slice(&payload)?;
            info!(response_id = %response.id, seat_count = response.seatbid.len(), "decoded bid response");
            (summarize_response(&response)?, encode(&response)?)
        }
    };

    println!("{}", summary);
    if config.echo {
        println!("{}", echo);
    }
    Ok(())
}

fn encode<T: Serialize>(payload: &T) -> Result<String, ModelError> {
    Ok(serde_json::to_string(payload)?)
}

fn read_payload(config: &ConfigManager) -> io::Result<Vec<u8>> {
    match &config.input {
        Some(path) => fs::read(path),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn summarize_request(request: &BidRequest) -> Value {
    let domain = request.site.domain.as_ref().or(request.app.domain.as_ref());
    json!({
        "kind": "request",
        "id": request.id,
        "imp_count": request.imp.len(),
        "imp_ids": request.imp.iter().map(|imp| imp.id.as_str()).collect::<Vec<_>>(),
        "domain": domain,
        "cellular": request.device.is_on_cellular(),
        "coordinates": request.device.geo.coordinates(),
    })
}

fn summarize_response(response: &BidResponse) -> Result<Value, ModelError> {
    Ok(json!({
        "kind": "response",
        "id": response.id,
        "seat_count": response.seatbid.len(),
        "bid_id": response.get_bid_id()?,
        "imp_id": response.get_imp_id()?,
        "ad_id": response.get_ad_id()?,
        "price": response.get_first_price()?.to_string(),
    }))
}
