//! Test doubles: a scripted engine and a recording fallback chain.

#![allow(dead_code)]

use bytes::BytesMut;
use enginebridge::bridge::Chain;
use enginebridge::engine::{
    Engine, EngineFault, EngineRequestParams, UrlRequest, UrlRequestCallback, UrlResponseInfo,
};
use enginebridge::http::{Headers, Request, Response};
use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

/// How a scripted request ends after its redirects.
#[derive(Debug, Clone)]
pub enum Ending {
    /// Respond with these headers and stream these chunks, then succeed.
    Respond {
        status: u16,
        text: String,
        headers: Vec<(String, String)>,
        protocol: String,
        chunks: Vec<Vec<u8>>,
    },
    /// Report a transport fault.
    Fail(EngineFault),
    /// Drop the request without any terminal callback.
    Abandon,
}

impl Ending {
    pub fn ok(chunks: Vec<Vec<u8>>) -> Self {
        Ending::Respond {
            status: 200,
            text: "OK".into(),
            headers: vec![],
            protocol: "h2".into(),
            chunks,
        }
    }

    pub fn with_headers(headers: &[(&str, &str)], protocol: &str) -> Self {
        Ending::Respond {
            status: 200,
            text: "OK".into(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            protocol: protocol.into(),
            chunks: vec![b"body".to_vec()],
        }
    }
}

/// What the engine does for every request it is given.
#[derive(Debug, Clone)]
pub struct Script {
    /// Location of each redirect hop, in order.
    pub redirects: Vec<String>,
    pub ending: Ending,
}

#[derive(Debug)]
enum Command {
    Start,
    FollowRedirect,
    Cancel,
    Read(BytesMut),
}

/// What the scripted engine observed for one request.
#[derive(Debug, Default, Clone)]
pub struct Trace {
    pub followed: usize,
    pub canceled: bool,
    pub reads: usize,
}

struct Handle {
    tx: Mutex<mpsc::Sender<Command>>,
}

impl Handle {
    fn send(&self, cmd: Command) {
        // The worker may already have finished; late commands are dropped.
        let _ = self.tx.lock().unwrap().send(cmd);
    }
}

impl UrlRequest for Handle {
    fn start(&self) {
        self.send(Command::Start);
    }

    fn follow_redirect(&self) {
        self.send(Command::FollowRedirect);
    }

    fn cancel(&self) {
        self.send(Command::Cancel);
    }

    fn read(&self, buffer: BytesMut) {
        self.send(Command::Read(buffer));
    }
}

/// An engine that plays a fixed [`Script`] on a worker thread per request.
pub struct ScriptedEngine {
    script: Script,
    pub dispatched: Mutex<Vec<EngineRequestParams>>,
    pub traces: Arc<Mutex<Vec<Trace>>>,
}

impl ScriptedEngine {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            dispatched: Mutex::new(Vec::new()),
            traces: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn responding(ending: Ending) -> Arc<Self> {
        Self::new(Script {
            redirects: vec![],
            ending,
        })
    }

    pub fn last_params(&self) -> EngineRequestParams {
        self.dispatched.lock().unwrap().last().cloned().unwrap()
    }

    pub fn last_trace(&self) -> Trace {
        self.traces.lock().unwrap().last().cloned().unwrap()
    }
}

impl Engine for ScriptedEngine {
    fn new_url_request(
        &self,
        params: EngineRequestParams,
        callback: Arc<dyn UrlRequestCallback>,
    ) -> Box<dyn UrlRequest> {
        self.dispatched.lock().unwrap().push(params.clone());
        let (tx, rx) = mpsc::channel();
        let worker_handle = Handle {
            tx: Mutex::new(tx.clone()),
        };
        let script = self.script.clone();
        let traces = self.traces.clone();

        thread::spawn(move || {
            let mut trace = Trace::default();
            run(&script, params, callback, &worker_handle, &rx, &mut trace);
            traces.lock().unwrap().push(trace);
        });

        Box::new(Handle { tx: Mutex::new(tx) })
    }
}

fn info(url: &str, chain: &[String], status: u16, text: &str) -> UrlResponseInfo {
    UrlResponseInfo {
        url: url.to_string(),
        url_chain: chain.to_vec(),
        http_status_code: status,
        http_status_text: text.to_string(),
        ..Default::default()
    }
}

fn run(
    script: &Script,
    params: EngineRequestParams,
    callback: Arc<dyn UrlRequestCallback>,
    handle: &Handle,
    rx: &mpsc::Receiver<Command>,
    trace: &mut Trace,
) {
    match rx.recv() {
        Ok(Command::Start) => {}
        other => panic!("expected start, got {other:?}"),
    }

    let mut chain = vec![params.url.to_string()];
    for location in &script.redirects {
        let current = chain.last().cloned().unwrap();
        let hop = info(&current, &chain, 302, "Found");
        callback.on_redirect_received(handle, &hop, location);
        match rx.recv() {
            Ok(Command::FollowRedirect) => {
                trace.followed += 1;
                chain.push(location.clone());
            }
            Ok(Command::Cancel) => {
                trace.canceled = true;
                callback.on_canceled(handle, Some(&hop));
                return;
            }
            other => panic!("expected redirect decision, got {other:?}"),
        }
    }

    let current = chain.last().cloned().unwrap();
    match &script.ending {
        Ending::Abandon => {}
        Ending::Fail(fault) => {
            callback.on_failed(handle, None, fault.clone());
        }
        Ending::Respond {
            status,
            text,
            headers,
            protocol,
            chunks,
        } => {
            let mut meta = info(&current, &chain, *status, text);
            meta.all_headers = headers.clone();
            meta.negotiated_protocol = protocol.clone();
            callback.on_response_started(handle, &meta);

            let mut received = 0u64;
            for chunk in chunks {
                let mut buf = match rx.recv() {
                    Ok(Command::Read(buf)) => buf,
                    other => panic!("expected read, got {other:?}"),
                };
                trace.reads += 1;
                assert!(buf.is_empty(), "read buffer must be cleared");
                assert!(chunk.len() <= buf.capacity(), "chunk larger than read buffer");
                buf.extend_from_slice(chunk);
                received += chunk.len() as u64;
                meta.received_byte_count = received;
                callback.on_read_completed(handle, &meta, buf);
            }

            match rx.recv() {
                Ok(Command::Read(_)) => trace.reads += 1,
                other => panic!("expected final read, got {other:?}"),
            }
            callback.on_succeeded(handle, &meta);
        }
    }
}

/// Fallback chain that records what it was asked to send.
pub struct TestChain {
    pub request: Request,
    pub proceeded: Vec<Request>,
    pub fallback: Box<dyn Fn(&Request) -> io::Result<Response> + Send>,
}

impl TestChain {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            proceeded: Vec::new(),
            fallback: Box::new(fallback_response),
        }
    }

    pub fn failing(request: Request, kind: io::ErrorKind) -> Self {
        Self {
            request,
            proceeded: Vec::new(),
            fallback: Box::new(move |_| Err(io::Error::new(kind, "fallback failed"))),
        }
    }
}

impl Chain for TestChain {
    fn request(&self) -> &Request {
        &self.request
    }

    fn proceed(&mut self, request: Request) -> io::Result<Response> {
        self.proceeded.push(request.clone());
        (self.fallback)(&request)
    }
}

/// Deterministic response the fallback transport produces for `request`.
pub fn fallback_response(request: &Request) -> io::Result<Response> {
    let mut headers = Headers::new();
    headers.append("X-Transport", "fallback").unwrap();
    let body = enginebridge::http::ResponseBody::new(
        bytes::Bytes::from(format!("fallback for {}", request.url())),
        Some("text/plain".into()),
    );
    let fixed = time::OffsetDateTime::UNIX_EPOCH;
    Ok(Response::builder(request.clone())
        .code(200)
        .message("OK")
        .headers(headers)
        .body(body)
        .sent_at(fixed)
        .received_at(fixed)
        .build())
}
