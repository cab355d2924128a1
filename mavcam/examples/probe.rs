//! Acts as a GCS: waits for a camera's heartbeat, then asks it to describe
//! itself and its video stream.
use binrw::{BinRead, BinWrite};
use clap::Parser;
use mavcam::{
    protocol::{
        message::{CommandLong, Heartbeat, MavCmd, MavType, Message, ParamExtRequestList},
        MavFrame,
    },
    Result,
};
use std::{io::Cursor, net::SocketAddr, time::Duration};
use tokio::{net::UdpSocket, time::timeout};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

/// MAVLink camera probe.
#[derive(Debug, Parser)]
#[clap(verbatim_doc_comment)]
struct CliParser {
    /// UDP port to listen on.
    #[clap(short, long, default_value_t = 14550)]
    pub port: u16,
}

async fn send(sock: &UdpSocket, camera: SocketAddr, sequence: u8, message: Message) -> Result<()> {
    let frame = MavFrame::new(sequence, 255, 190, &message)?;
    let mut out = Cursor::new(Vec::new());
    frame.write(&mut out)?;
    sock.send_to(&out.into_inner(), camera).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .compact()
        .init();
    let opts = CliParser::parse();
    let sock = UdpSocket::bind(("0.0.0.0", opts.port)).await?;
    let mut b = [0u8; MavFrame::MAX_FRAME_LENGTH];

    info!("Waiting for a camera heartbeat on port {}...", opts.port);
    let (camera, target) = loop {
        let (l, from) = sock.recv_from(&mut b).await?;
        let frame = MavFrame::read(&mut Cursor::new(&b[..l]))?;
        if let Message::Heartbeat(hb) = frame.message()? {
            if hb.mav_type() == Some(MavType::Camera) {
                info!(
                    "Camera {}/{} at {from}",
                    frame.system_id, frame.component_id
                );
                break (from, (frame.system_id, frame.component_id));
            }
        }
    };

    let gcs = Heartbeat {
        typ: MavType::Gcs as u8,
        ..Heartbeat::camera()
    };
    send(&sock, camera, 0, gcs.into()).await?;
    for (sequence, cmd) in [
        MavCmd::RequestCameraInformation,
        MavCmd::RequestCameraSettings,
        MavCmd::RequestVideoStreamInformation,
        MavCmd::RequestVideoStreamStatus,
    ]
    .into_iter()
    .enumerate()
    {
        let command = CommandLong::new(cmd, target.0, target.1);
        send(&sock, camera, sequence as u8 + 1, command.into()).await?;
    }
    let list = ParamExtRequestList {
        target_system: target.0,
        target_component: target.1,
    };
    send(&sock, camera, 5, list.into()).await?;

    // Report everything until the camera goes quiet.
    while let Ok(r) = timeout(Duration::from_secs(2), sock.recv_from(&mut b)).await {
        let (l, _) = r?;
        let frame = MavFrame::read(&mut Cursor::new(&b[..l]))?;
        match frame.message() {
            Ok(Message::Heartbeat(_)) => (),
            Ok(Message::CameraInformation(i)) => info!(
                "Camera: {:?} {:?}, {}x{}, flags {:?}",
                i.vendor_name()?,
                i.model_name()?,
                i.resolution_h,
                i.resolution_v,
                i.flags
            ),
            Ok(Message::VideoStreamInformation(i)) => info!(
                "Stream {} {:?}: {:?} ({:?}), {} fps",
                i.stream_id,
                i.name()?,
                i.uri()?,
                i.stream_type(),
                i.framerate
            ),
            Ok(Message::ParamExtValue(v)) => info!(
                "Parameter {}/{} {:?}: type {:?}",
                v.param_index + 1,
                v.param_count,
                v.name()?,
                v.value_type()
            ),
            Ok(m) => info!("{m:?}"),
            Err(e) => warn!("bad frame: {e}"),
        }
    }

    info!("No more messages");
    Ok(())
}
