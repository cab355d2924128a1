use crate::{
    config::ResponderTiming,
    dispatch::Dispatcher,
    heartbeat::HeartbeatTick,
    inbound::InboundMessage,
    protocol::{message::Heartbeat, MavFrame},
    udp::MavUdpChannel,
    Error, Result,
};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{task::JoinHandle, time::sleep};

/// Result of the [handshake][Responder::establish].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// The GCS answered after this many heartbeats.
    Connected { attempts: u32 },
    /// Nothing answered; the responder carries on regardless.
    Degraded { attempts: u32 },
}

impl HandshakeOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Connected { attempts } | Self::Degraded { attempts } => *attempts,
        }
    }
}

/// Stops a [Responder] from another task or thread.
///
/// The responder notices within one loop iteration.
#[derive(Debug, Clone)]
pub struct StopHandle {
    alive: Arc<AtomicBool>,
}

impl StopHandle {
    fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Asks the responder to stop.
    ///
    /// Returns `false` if it had already been asked to.
    pub fn stop(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// A MAVLink camera component, talking to a single GCS.
///
/// ## General design
///
/// [`run()`][Self::run] goes through three states:
///
/// 1. **Handshake**: [sends heartbeats until anything comes back][Self::establish],
///    or it runs out of attempts. Either way, it then starts serving.
///
/// 2. **Serving**: each loop iteration:
///
///    * waits up to [`recv_timeout`][ResponderTiming::recv_timeout] for a
///      message
///    * [classifies][InboundMessage::classify] it, and sends whatever the
///      [Dispatcher] reacts with
///    * sleeps for [`quantum`][ResponderTiming::quantum]
///    * sends a heartbeat, if [one is due][HeartbeatTick::is_due]
///
///    Failures are logged, and never end the loop.
///
/// 3. **Stopped**: after [`StopHandle::stop()`], nothing more is sent, and
///    `run()` returns without draining the socket. The flag is checked after
///    each receive and each sleep, so this takes at most the longer of
///    `recv_timeout` and `quantum`.
pub struct Responder {
    channel: MavUdpChannel,
    dispatcher: Dispatcher,
    timing: ResponderTiming,
    stop: StopHandle,
}

impl Responder {
    /// Makes a responder for the GCS in the dispatcher's configuration.
    pub async fn bind(dispatcher: Dispatcher, timing: ResponderTiming) -> Result<Self> {
        let config = dispatcher.config();
        let mut channel = MavUdpChannel::new(config.system_id, config.camera_id);
        let peer = config.peer();
        info!("connecting to GCS at {peer}");
        channel.connect(peer).await?;

        Ok(Self {
            channel,
            dispatcher,
            timing,
            stop: StopHandle::new(),
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.channel.local_addr()
    }

    /// Sends heartbeats until any message is received, up to
    /// [`handshake_attempts`][ResponderTiming::handshake_attempts] times.
    ///
    /// The received message is not processed.
    pub async fn establish(&self) -> HandshakeOutcome {
        self.establish_with(
            self.timing.handshake_timeout,
            self.timing.handshake_attempts,
        )
        .await
    }

    /// [`establish()`][Self::establish] with explicit timing.
    pub async fn establish_with(&self, timeout: Duration, max_attempts: u32) -> HandshakeOutcome {
        let mut attempts = 0;
        while attempts < max_attempts && self.stop.is_alive() {
            attempts += 1;
            self.send_heartbeat().await;

            match self.channel.recv_timeout(timeout).await {
                Ok(Some(frame)) => {
                    info!("connection established after {attempts} attempt(s)");
                    trace!("handshake response: {frame:?}");
                    return HandshakeOutcome::Connected { attempts };
                }
                Ok(None) => (),
                Err(e) => debug!("handshake receive error: {e}"),
            }

            sleep(self.timing.handshake_delay).await;
        }

        warn!("no response after {attempts} attempt(s), continuing anyway");
        HandshakeOutcome::Degraded { attempts }
    }

    /// Runs the responder until it is stopped.
    pub async fn run(mut self) -> Result {
        self.establish().await;

        let mut tick = HeartbeatTick::new(self.timing.heartbeat_interval);
        debug!("serving");
        while self.stop.is_alive() {
            match self.channel.recv_timeout(self.timing.recv_timeout).await {
                Ok(Some(frame)) => self.handle_frame(&frame).await,
                Ok(None) => (),
                Err(e) => debug!("receive error: {e}"),
            }

            // Stopped while receiving: don't sleep again.
            if !self.stop.is_alive() {
                break;
            }

            sleep(self.timing.quantum).await;
            tick.advance();
            self.maybe_emit(&tick).await;
        }

        info!("responder stopped");
        Ok(())
    }

    /// Spawns [`run()`][Self::run] as a task.
    pub fn start(self) -> ResponderHandle {
        let stop = self.stop_handle();
        let task = tokio::task::spawn(self.run());
        ResponderHandle { stop, task }
    }

    async fn handle_frame(&mut self, frame: &MavFrame) {
        let inbound = match InboundMessage::classify(frame) {
            Ok(i) => i,
            Err(e) => {
                debug!("dropping message {} from {}: {e}", frame.message_id, frame.system_id);
                return;
            }
        };

        for message in self.dispatcher.react(inbound) {
            if !self.stop.is_alive() {
                return;
            }

            if let Err(e) = self.channel.send(&message).await {
                debug!("error sending message {}: {e}", message.id());
            }
        }
    }

    /// Sends a heartbeat if one is due on this tick.
    async fn maybe_emit(&self, tick: &HeartbeatTick) {
        if tick.is_due() && self.stop.is_alive() {
            self.send_heartbeat().await;
        }
    }

    async fn send_heartbeat(&self) {
        if let Err(e) = self.channel.send(&Heartbeat::camera().into()).await {
            warn!("error sending heartbeat: {e}");
        }
    }
}

/// A [Responder] running in its own task.
pub struct ResponderHandle {
    stop: StopHandle,
    task: JoinHandle<Result>,
}

impl ResponderHandle {
    /// Asks the responder to stop; see [`StopHandle::stop()`].
    pub fn stop(&self) -> bool {
        self.stop.stop()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Waits for the responder to finish.
    pub async fn join(self) -> Result {
        self.task.await.map_err(|e| {
            error!("responder task failed: {e}");
            Error::Internal
        })?
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let stop = StopHandle::new();
        let other = stop.clone();
        assert!(stop.is_alive());
        assert!(stop.stop());
        assert!(!stop.is_alive());
        assert!(!other.is_alive());
        assert!(!other.stop());
        assert!(!stop.stop());
    }

    #[test]
    fn outcome() {
        assert_eq!(3, HandshakeOutcome::Connected { attempts: 3 }.attempts());
        assert_eq!(10, HandshakeOutcome::Degraded { attempts: 10 }.attempts());
    }
}
