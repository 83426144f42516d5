use std::io;
use std::sync::Arc;
use std::time::Instant;

use may_minihttp::{HttpService, Request, Response};
use tracing::{error, info};

use super::request::parse_request;
use super::response::{write_response, write_server_error};
use crate::app::Api;

/// may_minihttp service wrapping a shared [`Api`].
///
/// Every connection coroutine gets a clone; the application itself is shared read-only.
#[derive(Clone)]
pub struct AppService {
    pub app: Arc<Api>,
}

impl AppService {
    pub fn new(app: Arc<Api>) -> Self {
        Self { app }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let start = Instant::now();
        let request = parse_request(req);

        match self.app.respond(&request) {
            Ok(response) => {
                info!(
                    request_id = %request.request_id,
                    method = %request.method,
                    path = %request.path,
                    status = response.status,
                    latency_us = start.elapsed().as_micros(),
                    "Request completed"
                );
                write_response(res, response);
            }
            Err(e) => {
                error!(
                    request_id = %request.request_id,
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    latency_us = start.elapsed().as_micros(),
                    "Unhandled dispatch failure - responding 500"
                );
                write_server_error(res);
            }
        }
        Ok(())
    }
}
