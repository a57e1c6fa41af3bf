// crates/vlx-rs-tokio/tests/connection_test.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use vlx_rs::api::{GatewayState, GetState, HouseStatusMonitor, StatusRequest};
use vlx_rs::frame::{Command, FrameEnvelope, SlipDecoder, checksum, slip};
use vlx_rs::{ApiCall, DeviceKind, NodeEntry, NodeId, ProtocolError, Session};
use vlx_rs_tokio::{Connection, ConnectionConfig, Heartbeat, NodeRegistry};

/// The gateway side of a duplex stream.
struct GatewayEnd {
    io: DuplexStream,
    decoder: SlipDecoder,
}

impl GatewayEnd {
    fn new(io: DuplexStream) -> Self {
        Self {
            io,
            decoder: SlipDecoder::new(),
        }
    }

    async fn read_request(&mut self) -> Option<FrameEnvelope> {
        let mut chunk = [0u8; 64];
        loop {
            if let Some(packet) = self.decoder.next_packet() {
                return Some(FrameEnvelope::from_bytes(&packet.unwrap()).unwrap());
            }
            let read = self.io.read(&mut chunk).await.unwrap();
            if read == 0 {
                return None;
            }
            self.decoder.push(&chunk[..read]);
        }
    }

    async fn send(&mut self, frame: &FrameEnvelope) {
        self.send_raw(&frame.to_bytes()).await;
    }

    async fn send_raw(&mut self, bytes: &[u8]) {
        self.io.write_all(&slip::encode(bytes)).await.unwrap();
    }
}

fn connect() -> (Connection<DuplexStream>, GatewayEnd) {
    let (client, gateway) = duplex(1024);
    let connection = Connection::new(client, &ConnectionConfig::default());
    (connection, GatewayEnd::new(gateway))
}

fn get_state_cfm() -> FrameEnvelope {
    FrameEnvelope::build(Command::GetStateCfm, vec![2, 0, 0, 0, 0, 0]).unwrap()
}

#[tokio::test]
async fn test_get_state_over_stream() {
    let (connection, mut gateway) = connect();

    let gateway_task = tokio::spawn(async move {
        let request = gateway.read_request().await.unwrap();
        assert_eq!(request.command(), Command::GetStateReq);

        // A notification outside the catalog, then an unrelated frame, then the answer.
        let mut unknown = vec![0x00, 0x05, 0x03, 0x07, 0xAA, 0xBB];
        unknown.push(checksum(&unknown));
        gateway.send_raw(&unknown).await;
        gateway
            .send(&FrameEnvelope::empty(Command::HouseStatusMonitorEnableCfm).unwrap())
            .await;
        gateway.send(&get_state_cfm()).await;
        gateway
    });

    let mut call = GetState::new();
    connection.do_api_call(&mut call).await.unwrap();
    assert!(call.success());
    assert_eq!(call.gateway_state(), Some(GatewayState::GatewayModeWithActuators));

    gateway_task.await.unwrap();
}

#[tokio::test]
async fn test_house_status_monitor_enable() {
    let (connection, mut gateway) = connect();

    let gateway_task = tokio::spawn(async move {
        let request = gateway.read_request().await.unwrap();
        assert_eq!(request.command(), Command::HouseStatusMonitorEnableReq);
        assert!(request.payload().is_empty());
        gateway
            .send(&FrameEnvelope::empty(Command::HouseStatusMonitorEnableCfm).unwrap())
            .await;
        gateway
    });

    let mut call = HouseStatusMonitor::enable();
    connection.do_api_call(&mut call).await.unwrap();
    assert!(call.success());

    gateway_task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_call_times_out() {
    let (connection, mut gateway) = connect();

    let gateway_task = tokio::spawn(async move {
        gateway.read_request().await.unwrap();
        // Keep the stream open without answering.
        gateway.read_request().await
    });

    let start = tokio::time::Instant::now();
    let mut call = GetState::new();
    let result = connection.do_api_call(&mut call).await;

    assert_eq!(result, Err(ProtocolError::Timeout(Command::GetStateReq)));
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    assert!(!call.success());

    drop(connection);
    assert!(gateway_task.await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_blocked_write_times_out() {
    // The gateway never reads, so a request larger than the pipe cannot be
    // written completely.
    let (client, gateway) = duplex(8);
    let connection = Connection::new(client, &ConnectionConfig::default());

    let start = tokio::time::Instant::now();
    let mut call = StatusRequest::new(connection.next_session_id(), NodeId(4));
    let result = connection.do_api_call(&mut call).await;

    assert_eq!(result, Err(ProtocolError::Timeout(Command::StatusRequestReq)));
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    drop(gateway);
}

#[tokio::test]
async fn test_closed_stream_fails_call() {
    let (connection, mut gateway) = connect();

    tokio::spawn(async move {
        gateway.read_request().await.unwrap();
        drop(gateway);
    });

    let mut call = GetState::new();
    let result = connection.do_api_call(&mut call).await;
    assert_eq!(result, Err(ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn test_session_ids_are_unique() {
    let (connection, _gateway) = connect();
    let first = connection.next_session_id();
    let second = connection.next_session_id();
    assert_ne!(first, 0);
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_heartbeat_pulse_over_connection() {
    let (connection, mut gateway) = connect();
    let nodes = NodeRegistry::new();
    nodes.insert(NodeEntry::new(NodeId(6), "Studio blind", DeviceKind::Blind));
    nodes.insert(NodeEntry::new(NodeId(7), "Studio window", DeviceKind::Window));

    let gateway_task = tokio::spawn(async move {
        let request = gateway.read_request().await.unwrap();
        assert_eq!(request.command(), Command::GetStateReq);
        gateway.send(&get_state_cfm()).await;

        let request = gateway.read_request().await.unwrap();
        assert_eq!(request.command(), Command::StatusRequestReq);
        let payload = request.payload().to_vec();
        let (session, node) = ([payload[0], payload[1]], payload[3]);
        gateway
            .send(&FrameEnvelope::build(Command::StatusRequestCfm, vec![session[0], session[1], 1]).unwrap())
            .await;
        gateway
            .send(&FrameEnvelope::build(Command::SessionFinishedNtf, session.to_vec()).unwrap())
            .await;
        node
    });

    let hb = Heartbeat::new(Arc::new(connection), nodes, Duration::from_secs(60)).unwrap();
    hb.pulse().await.unwrap();

    assert_eq!(gateway_task.await.unwrap(), 6);
}
