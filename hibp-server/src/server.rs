//! The accept loop: binds a TCP listener and serves each connection with
//! `hyper`'s HTTP/1.1 server, dispatching requests through [`crate::routes`].

use std::net::SocketAddr;
use std::sync::Arc;

use hibp_verifier::Engine;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::routes;

/// Binds `addr` and serves requests against `engine` until the process is
/// killed. Each accepted connection gets its own task; a panic or I/O error
/// on one connection never takes down the listener.
pub async fn serve(addr: SocketAddr, engine: Arc<Engine>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    serve_on(listener, engine).await
}

/// Serves requests on an already-bound listener. Split out from [`serve`] so
/// tests can bind to `127.0.0.1:0` and discover the OS-assigned port via
/// `TcpListener::local_addr` before handing the listener off here.
pub async fn serve_on(listener: TcpListener, engine: Arc<Engine>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let engine = Arc::clone(&engine);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let engine = Arc::clone(&engine);
                async move { routes::route(req, engine).await }
            });

            if let Err(err) =
                hyper::server::conn::http1::Builder::new().serve_connection(io, service).await
            {
                tracing::debug!(%peer, error = %err, "connection closed with error");
            }
        });
    }
}
