#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// A one-connection-per-response HTTP server on localhost.
pub struct MockServer {
    pub url: String,
    handle: JoinHandle<Vec<String>>,
}

impl MockServer {
    /// Wait for every scripted response to be served and return the request
    /// lines received (e.g. `GET /repos/o/r/issues?state=open HTTP/1.1`).
    pub fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

/// Serve `responses` (status, JSON body) in order, one per connection.
pub fn serve(responses: Vec<(u16, String)>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            request_lines.push(request_line.trim_end().to_string());
            loop {
                let mut header = String::new();
                let n = reader.read_line(&mut header).unwrap();
                if n == 0 || header == "\r\n" {
                    break;
                }
            }

            let reason = match status {
                200 => "OK",
                403 => "Forbidden",
                404 => "Not Found",
                _ => "Error",
            };
            write!(
                stream,
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        }
        request_lines
    });

    MockServer { url, handle }
}

pub fn issue_json(number: u64, title: &str, labels: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": title,
        "body": format!("{title} body"),
        "labels": labels.iter().map(|l| serde_json::json!({"name": l})).collect::<Vec<_>>(),
        "html_url": format!("https://github.com/tj/pomo/issues/{number}")
    })
}
