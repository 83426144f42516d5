#![allow(dead_code)]

pub mod test_server {
    use kahless::server::{AppService, HttpServer, ServerHandle};
    use kahless::Api;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::{Arc, Once};
    use std::time::Duration;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// Start `api` on an ephemeral port and wait until it accepts connections
    pub fn start_app(api: Api) -> (ServerHandle, SocketAddr) {
        setup_may_runtime();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(AppService::new(Arc::new(api))).start(addr).unwrap();
        handle.wait_ready().unwrap();
        (handle, addr)
    }

    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Split a raw response into (status, content type, body)
    pub fn parse_parts(resp: &str) -> (u16, String, String) {
        let (headers, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut status = 0;
        let mut content_type = String::new();
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            } else if let Some((name, val)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-type") {
                    content_type = val.trim().to_string();
                }
            }
        }
        (status, content_type, body.to_string())
    }
}
