use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    recorded: Recorded,
}

impl ServerHandle {
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.recorded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn bodies(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.body)
            .collect()
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server answering 200 to everything.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    spawn_scripted_server(Vec::new())
}

/// Spawn a server answering the n-th request with `statuses[n]` (200 once exhausted).
/// The returned address is `host:port`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_scripted_server(statuses: Vec<u16>) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let statuses = Arc::new(statuses);

    let server_recorded = Arc::clone(&recorded);
    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let recorded = Arc::clone(&server_recorded);
                    let statuses = Arc::clone(&statuses);
                    thread::spawn(move || handle_client(stream, &recorded, &statuses));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        addr.to_string(),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            recorded,
        },
    ))
}

/// Returns a `host:port` nothing is listening on.
///
/// # Errors
///
/// Returns an error if a probe listener cannot be bound.
pub fn closed_port() -> Result<String, String> {
    let listener =
        TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind probe failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("probe addr failed: {}", err))?;
    drop(listener);
    Ok(addr.to_string())
}

fn handle_client(stream: TcpStream, recorded: &Recorded, statuses: &[u16]) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    if stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .is_err()
    {
        return;
    }
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let path = parts.next().unwrap_or_default().to_owned();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    let status = {
        let Ok(mut guard) = recorded.lock() else {
            return;
        };
        let position = guard.len();
        guard.push(RecordedRequest {
            method,
            path,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        statuses.get(position).copied().unwrap_or(200)
    };

    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK",
        status, reason
    );
    let mut writer = stream;
    if writer.write_all(response.as_bytes()).is_err() {
        return;
    }
    if writer.flush().is_err() {
        return;
    }
    drop(writer.shutdown(Shutdown::Both));
}

/// Run the `workload-replay` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_replay<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = replay_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .env_remove("REPLAY_LOG")
        .output()
        .map_err(|err| format!("run workload-replay failed: {}", err))
}

fn replay_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_workload-replay").map_or_else(
        || Err("CARGO_BIN_EXE_workload-replay missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
