//! IPC server implementation

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, error, warn};
use warden_api::{ErrorCode, ErrorInfo, Request, Response};

use crate::{IpcError, IpcResult};

/// A request waiting for the daemon's answer
pub struct PendingRequest {
    pub request: Request,
    pub respond: oneshot::Sender<Response>,
}

/// IPC server
pub struct IpcServer {
    socket_path: PathBuf,
    listener: Option<UnixListener>,
    request_tx: mpsc::UnboundedSender<PendingRequest>,
    request_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<PendingRequest>>>>,
}

impl IpcServer {
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();

        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            listener: None,
            request_tx,
            request_rx: Arc::new(Mutex::new(Some(request_rx))),
        }
    }

    /// Bind the socket.
    pub async fn start(&mut self) -> IpcResult<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;

        // Owner and group only; mutations are privileged
        std::fs::set_permissions(&self.socket_path, std::fs::Permissions::from_mode(0o660))?;

        debug!(path = %self.socket_path.display(), "IPC server listening");

        self.listener = Some(listener);

        Ok(())
    }

    /// Take the receiver the daemon loop consumes requests from.
    pub async fn take_request_receiver(
        &self,
    ) -> Option<mpsc::UnboundedReceiver<PendingRequest>> {
        self.request_rx.lock().await.take()
    }

    /// Accept connections until the process exits.
    pub async fn run(&self) -> IpcResult<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| IpcError::ServerError("Server not started".into()))?;

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let request_tx = self.request_tx.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, request_tx).await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn handle_connection(
    stream: UnixStream,
    request_tx: mpsc::UnboundedSender<PendingRequest>,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("Client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let response = match serde_json::from_str::<Request>(trimmed) {
                    Ok(request) => {
                        let request_id = request.request_id;
                        let (respond, answered) = oneshot::channel();

                        if request_tx.send(PendingRequest { request, respond }).is_err() {
                            // Daemon loop gone; nothing left to answer with
                            break;
                        }

                        match answered.await {
                            Ok(response) => response,
                            Err(_) => Response::error(
                                request_id,
                                ErrorInfo::new(ErrorCode::InternalError, "Request dropped"),
                            ),
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Invalid request");
                        Response::error(
                            0,
                            ErrorInfo::new(ErrorCode::InvalidRequest, format!("bad request: {e}")),
                        )
                    }
                };

                match serde_json::to_string(&response) {
                    Ok(mut json) => {
                        json.push('\n');
                        if let Err(e) = write_half.write_all(json.as_bytes()).await {
                            debug!(error = %e, "Write error");
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to serialize response");
                        break;
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Read error");
                break;
            }
        }
    }
}
