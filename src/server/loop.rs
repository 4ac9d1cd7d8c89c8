// Server loop module
// Accepts connections until a shutdown signal arrives

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop. Must run inside a `LocalSet`; connections are `spawn_local` tasks.
///
/// Accept errors are logged and the loop keeps going; only `shutdown` ends it.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_info("Accept loop stopped");
                break;
            }
        }
    }
}
