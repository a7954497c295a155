//! In-process mock of the analysis API.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

type Handler = dyn Fn(&Captured) -> (u16, String) + Send + Sync;

/// A mock API answering every request with `handler`. Stops on drop.
pub struct MockApi {
    server: Arc<Server>,
    port: u16,
    requests: Arc<Mutex<Vec<Captured>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockApi {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
    {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Box<Handler> = Box::new(handler);

        let handle = {
            let server = server.clone();
            let requests = requests.clone();
            thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let mut body = String::new();
                    request.as_reader().read_to_string(&mut body).unwrap();

                    let captured = Captured {
                        method: request.method().to_string(),
                        path: request.url().to_string(),
                        content_type: request
                            .headers()
                            .iter()
                            .find(|h| h.field.equiv("Content-Type"))
                            .map(|h| h.value.as_str().to_string()),
                        body,
                    };

                    let (status, reply) = handler(&captured);
                    requests.lock().unwrap().push(captured);

                    let header =
                        Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                    let response = Response::from_string(reply)
                        .with_status_code(status)
                        .with_header(header);
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            server,
            port,
            requests,
            handle: Some(handle),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A successful analysis body.
pub fn success_body(time: f64, speedup: f64, efficiency: f64) -> String {
    serde_json::json!({
        "success": true,
        "execution_time": time,
        "stats": {
            "speedup": speedup,
            "efficiency": efficiency,
            "throughput": 810.0 / time,
            "files_processed": 810,
            "total_words": 1_234_567
        },
        "output": "analysis complete\n"
    })
    .to_string()
}

/// Get an address where nothing is listening.
pub fn unused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Short timeouts so failures surface quickly.
pub fn client(url: &str) -> hybrid_bench::HttpClient {
    hybrid_bench::HttpClient::new(url)
        .with_connect_timeout(Duration::from_secs(2))
        .with_timeout(Some(Duration::from_secs(10)))
}
