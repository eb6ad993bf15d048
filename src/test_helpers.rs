use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Write a ledger file with the given contents into a fresh temp directory
#[cfg(test)]
pub fn create_ledger_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("sent_posts.json");
    std::fs::write(&path, contents).expect("Failed to write ledger file");

    (temp_dir, path)
}

/// One request as the stub server saw it.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Request body is not JSON")
    }
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
impl StubReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// Local HTTP server answering one connection per canned reply, in order.
#[cfg(test)]
pub struct StubServer {
    listener: TcpListener,
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[cfg(test)]
impl StubServer {
    pub async fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");

        Self {
            listener,
            base_url: format!("http://{addr}"),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve the replies in the background; the returned handle reads back
    /// what the clients sent.
    pub fn serve(self, replies: Vec<StubReply>) -> StubRequests {
        let requests = self.requests;
        let listener = self.listener;
        let recorded = requests.clone();
        tokio::spawn(async move {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                if let Some(request) = read_request(&mut stream).await {
                    recorded.lock().unwrap().push(request);
                }
                write_reply(&mut stream, &reply).await;
            }
        });
        StubRequests { requests }
    }
}

#[cfg(test)]
#[derive(Clone)]
pub struct StubRequests {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[cfg(test)]
impl StubRequests {
    pub fn all(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(body_start + content_length);
    let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

#[cfg(test)]
async fn write_reply(stream: &mut TcpStream, reply: &StubReply) {
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ledger_file() {
        let (_temp_dir, path) = create_ledger_file("[]");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_stub_server_records_request_and_replies() {
        let server = StubServer::bind().await;
        let url = format!("{}/echo", server.base_url);
        let requests = server.serve(vec![StubReply::new(201, "{\"ok\":true}")]);

        let response = reqwest::Client::new()
            .post(url)
            .header("X-Test", "yes")
            .body("hello")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 201);
        assert_eq!(response.text().await.unwrap(), "{\"ok\":true}");

        let recorded = requests.all();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].path, "/echo");
        assert_eq!(recorded[0].header("x-test"), Some("yes"));
        assert_eq!(recorded[0].body, "hello");
    }
}
