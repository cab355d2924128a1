//! Runs the responder against a fake GCS over loopback UDP.
use binrw::{BinRead, BinWrite};
use mavcam::{
    codec::decode_value,
    protocol::{
        message::{
            CommandLong, Heartbeat, MavCmd, MavResult, MavType, Message, ParamAck, ParamExtSet,
            ParamExtType, PARAM_ID_LENGTH, PARAM_VALUE_LENGTH,
        },
        MavFrame,
    },
    DeviceControl, Dispatcher, HandshakeOutcome, MemoryDeviceControl, ParamType,
    ParameterDefinition, ParameterStore, Responder, ResponderConfig, ResponderTiming, Result,
};
use std::{
    io::Cursor,
    net::SocketAddr,
    time::{Duration, Instant},
};
use tokio::{net::UdpSocket, time::timeout};

const ZOOM: u32 = 0x009a090d;
const WAIT: Duration = Duration::from_secs(2);

fn timing() -> ResponderTiming {
    ResponderTiming {
        handshake_timeout: Duration::from_millis(50),
        handshake_attempts: 3,
        handshake_delay: Duration::from_millis(10),
        recv_timeout: Duration::from_millis(20),
        quantum: Duration::from_millis(5),
        heartbeat_interval: 10,
    }
}

/// A GCS, listening on an ephemeral loopback port.
struct Gcs {
    sock: UdpSocket,
    camera: Option<SocketAddr>,
    sequence: u8,
}

impl Gcs {
    async fn new() -> Result<Self> {
        Ok(Self {
            sock: UdpSocket::bind("127.0.0.1:0").await?,
            camera: None,
            sequence: 0,
        })
    }

    fn port(&self) -> Result<u16> {
        Ok(self.sock.local_addr()?.port())
    }

    /// Receives the next frame from the camera.
    async fn recv(&mut self) -> Result<MavFrame> {
        let mut b = [0u8; MavFrame::MAX_FRAME_LENGTH];
        let (l, from) = timeout(WAIT, self.sock.recv_from(&mut b))
            .await
            .expect("timed out waiting for the camera")?;
        self.camera = Some(from);
        Ok(MavFrame::read(&mut Cursor::new(&b[..l]))?)
    }

    /// Receives the next message from the camera which isn't a heartbeat.
    async fn recv_message(&mut self) -> Result<(MavFrame, Message)> {
        loop {
            let frame = self.recv().await?;
            let message = frame.message()?;
            if !matches!(message, Message::Heartbeat(_)) {
                return Ok((frame, message));
            }
        }
    }

    async fn send(&mut self, message: Message) -> Result<()> {
        let camera = self.camera.expect("camera address unknown");
        let frame = MavFrame::new(self.sequence, 255, 190, &message)?;
        self.sequence = self.sequence.wrapping_add(1);
        let mut out = Cursor::new(Vec::new());
        frame.write(&mut out)?;
        self.sock.send_to(&out.into_inner(), camera).await?;
        Ok(())
    }

    /// Answers the camera's first heartbeat.
    async fn handshake(&mut self) -> Result<()> {
        let frame = self.recv().await?;
        let Message::Heartbeat(hb) = frame.message()? else {
            panic!("expected a heartbeat, got {frame:?}");
        };
        assert_eq!(Some(MavType::Camera), hb.mav_type());
        self.send(
            Heartbeat {
                typ: MavType::Gcs as u8,
                ..Heartbeat::camera()
            }
            .into(),
        )
        .await
    }
}

fn config(gcs: &Gcs) -> Result<ResponderConfig> {
    ResponderConfig::new(
        1,
        "video",
        "127.0.0.1",
        gcs.port()?,
        1,
        Some("rtsp://host/stream".to_string()),
    )
}

async fn responder(gcs: &Gcs, device: MemoryDeviceControl) -> Result<Responder> {
    let mut zoom = ParameterDefinition::new("zoom", ZOOM, ParamType::Uint32);
    zoom.default = Some(1);
    let dispatcher = Dispatcher::new(config(gcs)?, ParameterStore::new(vec![zoom]), device);
    Responder::bind(dispatcher, timing()).await
}

#[tokio::test]
async fn stream_descriptor() -> Result<()> {
    let mut gcs = Gcs::new().await?;
    let handle = responder(&gcs, MemoryDeviceControl::new()).await?.start();
    gcs.handshake().await?;

    gcs.send(CommandLong::new(MavCmd::RequestVideoStreamInformation, 1, 1).into())
        .await?;

    let (frame, message) = gcs.recv_message().await?;
    assert_eq!((1, 1), (frame.system_id, frame.component_id));
    let Message::CommandAck(ack) = message else {
        panic!("expected an ack, got {message:?}");
    };
    assert_eq!(MavCmd::RequestVideoStreamInformation as u16, ack.command);
    assert_eq!(Some(MavResult::Accepted), ack.mav_result());
    assert_eq!((255, 190), (ack.target_system, ack.target_component));

    let (_, message) = gcs.recv_message().await?;
    let Message::VideoStreamInformation(info) = message else {
        panic!("expected stream information, got {message:?}");
    };
    assert_eq!("video", info.name()?);
    assert_eq!("rtsp://host/stream", info.uri()?);
    assert!(info.uri[18..].iter().all(|b| *b == 0));

    assert!(handle.stop());
    timeout(WAIT, handle.join()).await.expect("join timed out")?;
    Ok(())
}

#[tokio::test]
async fn set_zoom() -> Result<()> {
    let mut gcs = Gcs::new().await?;
    let device = MemoryDeviceControl::new();
    let handle = responder(&gcs, device.clone()).await?.start();
    gcs.handshake().await?;

    let mut param_id = [0; PARAM_ID_LENGTH];
    param_id[..4].copy_from_slice(b"zoom");
    let mut value = [0; PARAM_VALUE_LENGTH];
    value[4..8].copy_from_slice(&5u32.to_le_bytes());
    gcs.send(ParamExtSet::new(param_id, value, ParamExtType::Uint32).into())
        .await?;

    let (_, message) = gcs.recv_message().await?;
    let Message::ParamExtAck(ack) = message else {
        panic!("expected a parameter ack, got {message:?}");
    };
    assert_eq!("zoom", ack.name()?);
    assert_eq!(Some(ParamAck::Accepted), ack.result());
    assert_eq!(5, decode_value(&ack.param_value, ParamType::Uint32)?);
    assert_eq!(5, device.get_value(ZOOM)?);

    handle.stop();
    timeout(WAIT, handle.join()).await.expect("join timed out")?;
    Ok(())
}

#[tokio::test]
async fn handshake_connected() -> Result<()> {
    let mut gcs = Gcs::new().await?;
    let responder = responder(&gcs, MemoryDeviceControl::new()).await?;
    let (outcome, handshake) = tokio::join!(
        responder.establish_with(Duration::from_secs(1), 3),
        gcs.handshake()
    );
    handshake?;
    assert_eq!(HandshakeOutcome::Connected { attempts: 1 }, outcome);
    Ok(())
}

#[tokio::test]
async fn handshake_degraded() -> Result<()> {
    let mut gcs = Gcs::new().await?;
    let responder = responder(&gcs, MemoryDeviceControl::new()).await?;

    let outcome = responder.establish().await;
    assert_eq!(HandshakeOutcome::Degraded { attempts: 3 }, outcome);

    // One heartbeat per attempt, and nothing else.
    for _ in 0..3 {
        let frame = gcs.recv().await?;
        assert!(matches!(frame.message()?, Message::Heartbeat(_)));
    }
    let mut b = [0u8; MavFrame::MAX_FRAME_LENGTH];
    assert!(gcs.sock.try_recv_from(&mut b).is_err());
    Ok(())
}

#[tokio::test]
async fn stop_before_start() -> Result<()> {
    let gcs = Gcs::new().await?;
    let responder = responder(&gcs, MemoryDeviceControl::new()).await?;
    let stop = responder.stop_handle();
    assert!(stop.stop());

    let handle = responder.start();
    assert!(!handle.stop());
    timeout(WAIT, handle.join()).await.expect("join timed out")?;

    let mut b = [0u8; MavFrame::MAX_FRAME_LENGTH];
    assert!(
        timeout(Duration::from_millis(100), gcs.sock.recv_from(&mut b))
            .await
            .is_err(),
        "stopped responder sent something"
    );
    Ok(())
}

#[tokio::test]
async fn stop_while_serving() -> Result<()> {
    let mut gcs = Gcs::new().await?;
    let handle = responder(&gcs, MemoryDeviceControl::new()).await?.start();
    gcs.handshake().await?;

    // Wait for a periodic heartbeat, so the loop is known to be serving.
    gcs.recv().await?;
    assert!(handle.stop());
    timeout(WAIT, handle.join()).await.expect("join timed out")?;

    // Whatever was sent before stopping may still be queued.
    let mut b = [0u8; MavFrame::MAX_FRAME_LENGTH];
    while gcs.sock.try_recv_from(&mut b).is_ok() {}
    assert!(timeout(Duration::from_millis(100), gcs.sock.recv_from(&mut b))
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn stop_within_quantum() -> Result<()> {
    let quantum = Duration::from_millis(100);
    let timing = ResponderTiming {
        recv_timeout: quantum,
        quantum,
        heartbeat_interval: 1,
        ..timing()
    };
    let mut gcs = Gcs::new().await?;
    let dispatcher = Dispatcher::new(
        config(&gcs)?,
        ParameterStore::new(Vec::new()),
        MemoryDeviceControl::new(),
    );
    let handle = Responder::bind(dispatcher, timing).await?.start();
    gcs.handshake().await?;

    // A periodic heartbeat is sent right before the next receive starts.
    gcs.recv().await?;
    let stopped = Instant::now();
    assert!(handle.stop());
    timeout(WAIT, handle.join()).await.expect("join timed out")?;

    let elapsed = stopped.elapsed();
    assert!(
        elapsed < quantum + quantum / 2,
        "took {elapsed:?} to stop, quantum is {quantum:?}"
    );
    Ok(())
}
