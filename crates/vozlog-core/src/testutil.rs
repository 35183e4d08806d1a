//! Test-only HTTP stubs: a single-connection server bound to a random local
//! port, so the adapters' request/response handling can be exercised without
//! touching the real endpoints.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

/// Serve exactly one HTTP/1.1 request with a canned JSON response.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and a handle whose join
/// value is the raw request the client sent, for asserting on headers and
/// body.
pub(crate) fn spawn_one_shot_server(status: u16, body: &'static str) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
    let addr = listener.local_addr().expect("stub server addr");

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept stub connection");
        let request = read_request(&mut stream);

        let response = format!(
            "HTTP/1.1 {status} Stub\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write stub response");

        request
    });

    (format!("http://{addr}"), handle)
}

/// Read one full request: headers, then as many body bytes as Content-Length
/// announces. The client must see its upload consumed before the response.
fn read_request(stream: &mut std::net::TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut buf).expect("read stub request");
        if n == 0 {
            return data;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).expect("read stub request body");
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }

    data
}
