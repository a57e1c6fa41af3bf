// crates/vlx-rs-tokio/examples/keepalive.rs
//
// Runs the heartbeat against an in-process fake gateway for a few cycles.
//
//   RUST_LOG=debug cargo run -p vlx-rs-tokio --example keepalive

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use vlx_rs::frame::{Command, FrameEnvelope, SlipDecoder, slip};
use vlx_rs::{ApiCall, DeviceKind, NodeEntry, NodeId, Session, api::HouseStatusMonitor};
use vlx_rs_tokio::{Connection, GatewayConfig, Heartbeat, NodeRegistry};

const CONFIG: &str = r#"{
    "heartbeat": { "interval_secs": 1 },
    "connection": { "api_timeout_secs": 2 }
}"#;

/// Answers every request the heartbeat sends, like a healthy gateway would.
async fn fake_gateway(mut io: DuplexStream) {
    let mut decoder = SlipDecoder::new();
    let mut chunk = [0u8; 128];
    loop {
        let read = match io.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => read,
        };
        decoder.push(&chunk[..read]);

        while let Some(Ok(packet)) = decoder.next_packet() {
            let Ok(request) = FrameEnvelope::from_bytes(&packet) else {
                continue;
            };
            let payload = request.payload();
            let replies = match request.command() {
                Command::GetStateReq => vec![FrameEnvelope::build(Command::GetStateCfm, vec![2, 0, 0, 0, 0, 0])],
                Command::HouseStatusMonitorEnableReq => {
                    vec![FrameEnvelope::empty(Command::HouseStatusMonitorEnableCfm)]
                }
                Command::StatusRequestReq => vec![
                    FrameEnvelope::build(Command::StatusRequestCfm, vec![payload[0], payload[1], 1]),
                    FrameEnvelope::build(Command::SessionFinishedNtf, payload[0..2].to_vec()),
                ],
                _ => vec![],
            };
            for reply in replies.into_iter().flatten() {
                if io.write_all(&slip::encode(&reply.to_bytes())).await.is_err() {
                    return;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = GatewayConfig::from_json(CONFIG)?;

    let (client, gateway) = tokio::io::duplex(4096);
    tokio::spawn(fake_gateway(gateway));
    let connection = Arc::new(Connection::new(client, &config.connection));

    let mut monitor = HouseStatusMonitor::enable();
    connection.do_api_call(&mut monitor).await?;
    log::info!("House status monitor enabled: {}", monitor.success());

    let nodes = NodeRegistry::new();
    nodes.insert(NodeEntry::new(NodeId(0), "Kitchen window", DeviceKind::Window));
    nodes.insert(NodeEntry::new(NodeId(1), "Office blind", DeviceKind::Blind));

    let mut heartbeat = Heartbeat::from_config(Arc::clone(&connection), nodes, &config.heartbeat)?;
    heartbeat.start();
    tokio::time::sleep(Duration::from_millis(3500)).await;
    heartbeat.stop().await;

    Ok(())
}
