use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use crate::frames::FrameService;

pub mod api;
pub mod routes;

pub const TOKEN_HEADER: &str = "menat-token";

/// Everything a request handler may touch. Requests are served one at a time,
/// so handlers get exclusive access (reload rebuilds the index in place).
pub struct ServerState {
    pub service: FrameService,
    pub token: Option<String>,
}

pub fn run_server(bind_addr: &str, mut state: ServerState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    log::info!("menat server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, &mut state) {
                    log::error!("request error: {err}");
                }
            }
            Err(err) => log::error!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

fn handle_connection(stream: &mut TcpStream, state: &mut ServerState) -> std::io::Result<()> {
    let mut buffer = [0_u8; 16_384];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let (head, body) = request
        .split_once("\r\n\r\n")
        .or_else(|| request.split_once("\n\n"))
        .unwrap_or((&request[..], ""));

    let request_line = head.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");
    let token = header_value(head, TOKEN_HEADER);

    log::debug!("{method} {path}");
    let response = routes::route_request(state, method, path, body, token).to_http_string();
    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}
