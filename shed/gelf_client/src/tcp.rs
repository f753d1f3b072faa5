/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This source code is licensed under both the MIT license found in the
 * LICENSE-MIT file in the root directory of this source tree and the Apache
 * License, Version 2.0 found in the LICENSE-APACHE file in the root directory
 * of this source tree.
 */

//! GELF-over-TCP transport, optionally wrapped in TLS

use std::io;
use std::io::Write;
use std::net::Shutdown;
use std::net::SocketAddr;
use std::net::TcpStream;
use std::net::ToSocketAddrs;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use openssl::ssl::SslConnector;
use openssl::ssl::SslMethod;
use openssl::ssl::SslStream;
use openssl::ssl::SslVerifyMode;

use crate::message::GelfMessage;
use crate::transport::Graylog;
use crate::transport::GraylogConfig;
use crate::transport::SinkConnector;

/// Production connector: opens a TCP session to the collector, optionally
/// wrapped in TLS, bounded by the configured connection timeout.
pub struct TcpConnector;

impl SinkConnector for TcpConnector {
    fn connect(&self, config: &GraylogConfig) -> Result<Box<dyn Graylog>> {
        let stream = open_stream(config)?;
        Ok(Box::new(TcpGraylog { stream }))
    }
}

fn resolve(config: &GraylogConfig) -> Result<SocketAddr> {
    (config.address.as_str(), config.port)
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {}:{}", config.address, config.port))?
        .next()
        .ok_or_else(|| anyhow!("no addresses found for {}:{}", config.address, config.port))
}

fn open_stream(config: &GraylogConfig) -> Result<GraylogStream> {
    let addr = resolve(config)?;
    let tcp = if config.connection_timeout.is_zero() {
        TcpStream::connect(addr)
    } else {
        TcpStream::connect_timeout(&addr, config.connection_timeout)
    }
    .with_context(|| format!("failed to connect to Graylog at {addr}"))?;
    tcp.set_nodelay(true)
        .context("failed to set TCP_NODELAY on Graylog session")?;

    if config.use_tls {
        Ok(GraylogStream::Tls(Box::new(tls_handshake(config, tcp)?)))
    } else {
        Ok(GraylogStream::Plain(tcp))
    }
}

fn tls_handshake(config: &GraylogConfig, tcp: TcpStream) -> Result<SslStream<TcpStream>> {
    let mut builder = SslConnector::builder(SslMethod::tls())
        .context("failed to build TLS connector")?;
    if config.insecure_skip_verify {
        builder.set_verify(SslVerifyMode::NONE);
    }
    let mut session = builder
        .build()
        .configure()
        .context("failed to configure TLS session")?;
    if config.insecure_skip_verify {
        session.set_verify_hostname(false);
    }
    session.connect(&config.address, tcp).map_err(|err| {
        anyhow!(
            "TLS handshake with {}:{} failed: {err}",
            config.address,
            config.port
        )
    })
}

enum GraylogStream {
    Plain(TcpStream),
    Tls(Box<SslStream<TcpStream>>),
}

impl Write for GraylogStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            GraylogStream::Plain(tcp) => tcp.write(buf),
            GraylogStream::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            GraylogStream::Plain(tcp) => tcp.flush(),
            GraylogStream::Tls(tls) => tls.flush(),
        }
    }
}

/// A connected GELF TCP session. Messages go out as NUL-terminated JSON
/// frames.
struct TcpGraylog {
    stream: GraylogStream,
}

impl Graylog for TcpGraylog {
    fn send(&mut self, message: &GelfMessage) -> Result<()> {
        let frame = message.to_tcp_frame()?;
        self.stream
            .write_all(&frame)
            .context("failed to write GELF frame")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stream
            .flush()
            .context("failed to flush Graylog session")?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match &mut self.stream {
            GraylogStream::Plain(tcp) => tcp
                .shutdown(Shutdown::Both)
                .context("failed to shut Graylog session down")?,
            GraylogStream::Tls(tls) => {
                // Best-effort close_notify; the peer may already be gone.
                let _ = tls.shutdown();
                tls.get_ref()
                    .shutdown(Shutdown::Both)
                    .context("failed to shut Graylog session down")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use serde_json::Value;

    use super::*;

    #[test]
    fn test_send_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().expect("no local addr").port();
        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().expect("accept failed");
            let mut buf = Vec::new();
            socket.read_to_end(&mut buf).expect("read failed");
            buf
        });

        let config = GraylogConfig {
            address: "127.0.0.1".to_owned(),
            port,
            connection_timeout: Duration::from_secs(5),
            ..GraylogConfig::default()
        };
        let mut graylog = TcpConnector.connect(&config).expect("failed to connect");
        let message = GelfMessage::new("", "testhost", "over the wire", 6);
        graylog.send(&message).expect("failed to send");
        graylog.close().expect("failed to close");

        let buf = server.join().expect("server thread panicked");
        assert_eq!(buf.last(), Some(&0u8));
        let decoded: Value =
            serde_json::from_slice(&buf[..buf.len() - 1]).expect("invalid frame payload");
        assert_eq!(decoded["short_message"], "over the wire");
        assert_eq!(decoded["host"], "testhost");
        assert_eq!(decoded["version"], "1.1");
    }

    #[test]
    fn test_connect_failure_is_reported() {
        // Grab a port with no listener behind it.
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().expect("no local addr").port();
        drop(listener);

        let config = GraylogConfig {
            address: "127.0.0.1".to_owned(),
            port,
            connection_timeout: Duration::from_millis(500),
            ..GraylogConfig::default()
        };
        assert!(TcpConnector.connect(&config).is_err());
    }
}
