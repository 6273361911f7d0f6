//! Local HTTP server answering backend requests with canned replies.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// One request as the server saw it.
#[derive(Debug)]
pub(crate) struct Seen {
	pub method: String,
	pub path: String,
	pub body: String,
}

/// Serves `replies` in order, one connection each, then stops.
///
/// Returns the base URL and a handle yielding the requests received.
pub(crate) fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Seen>>) {
	let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
	let endpoint = format!("http://{}", listener.local_addr().expect("listener address"));

	let handle = thread::spawn(move || {
		let mut seen = Vec::new();
		for (status, body) in replies {
			let (mut stream, _) = listener.accept().expect("accept connection");
			let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

			let mut request_line = String::new();
			reader.read_line(&mut request_line).expect("request line");
			let mut content_length = 0;
			loop {
				let mut header = String::new();
				reader.read_line(&mut header).expect("header line");
				let header = header.trim_end();
				if header.is_empty() {
					break;
				}
				if let Some((name, value)) = header.split_once(':') {
					if name.eq_ignore_ascii_case("content-length") {
						content_length = value.trim().parse().expect("numeric content-length");
					}
				}
			}
			let mut payload = vec![0; content_length];
			reader.read_exact(&mut payload).expect("request body");

			let mut parts = request_line.split_whitespace();
			seen.push(Seen {
				method: parts.next().unwrap_or_default().to_owned(),
				path: parts.next().unwrap_or_default().to_owned(),
				body: String::from_utf8_lossy(&payload).into_owned(),
			});

			let response = format!(
				"HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
				body.len()
			);
			stream.write_all(response.as_bytes()).expect("write reply");
		}
		seen
	});

	(endpoint, handle)
}

/// Base URL of a port nothing listens on.
pub(crate) fn closed_endpoint() -> String {
	let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
	let address = listener.local_addr().expect("listener address");
	drop(listener);
	format!("http://{address}")
}
