//! End-to-end interceptor tests against a scripted engine.

mod common;

use common::{fallback_response, Ending, Script, ScriptedEngine, TestChain};
use enginebridge::base::neterror::NetError;
use enginebridge::bridge::{EngineInterceptor, Interceptor, RedirectPolicy};
use enginebridge::engine::{EngineFault, EngineSession};
use enginebridge::http::{Protocol, Request, RequestBody};
use enginebridge::observer::{CallObserver, ObserverError};
use enginebridge::BridgeError;
use http::Method;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use url::Url;

fn interceptor(engine: Arc<ScriptedEngine>) -> EngineInterceptor {
    EngineInterceptor::new(Arc::new(EngineSession::with_engine(engine)))
}

fn get(url: &str) -> Request {
    Request::get(Url::parse(url).unwrap())
}

fn redirects(n: usize, base: &str) -> Vec<String> {
    (0..n).map(|i| format!("{base}/hop{i}")).collect()
}

#[test]
fn test_body_chunks_concatenate_in_order() {
    let first = vec![b'a'; 5];
    let second: Vec<u8> = (0..32768u32).map(|i| (i % 251) as u8).collect();
    let third = vec![b'z'; 7];
    let engine = ScriptedEngine::responding(Ending::ok(vec![
        first.clone(),
        second.clone(),
        third.clone(),
    ]));

    let mut chain = TestChain::new(get("https://example.com/data"));
    let resp = interceptor(engine.clone()).intercept(&mut chain).unwrap();

    let expected: Vec<u8> = [first, second, third].concat();
    assert_eq!(resp.body().len(), 5 + 32768 + 7);
    assert_eq!(resp.body().as_bytes(), expected.as_slice());
    assert_eq!(engine.last_trace().reads, 4);
    assert!(chain.proceeded.is_empty());
}

#[test]
fn test_post_body_reaches_engine() {
    let engine = ScriptedEngine::responding(Ending::ok(vec![]));
    let req = Request::builder(Url::parse("https://example.com/submit").unwrap())
        .method(Method::POST)
        .body(RequestBody::from("hello").with_content_type("text/plain"))
        .build();

    let mut chain = TestChain::new(req);
    interceptor(engine.clone()).intercept(&mut chain).unwrap();

    let params = engine.last_params();
    assert_eq!(params.method, Method::POST);
    assert_eq!(params.url.path(), "/submit");
    assert_eq!(params.headers.get_str("Content-Type"), Some("text/plain"));
    assert_eq!(params.upload.unwrap().data().as_ref(), b"hello");
}

#[test]
fn test_compression_headers_stripped_both_ways() {
    let engine = ScriptedEngine::responding(Ending::with_headers(
        &[
            ("Content-Type", "text/html"),
            ("Content-Encoding", "gzip"),
            ("X-Served-By", "edge"),
        ],
        "h2",
    ));
    let req = Request::builder(Url::parse("https://example.com/").unwrap())
        .header("Accept-Encoding", "gzip, br")
        .unwrap()
        .header("User-Agent", "test")
        .unwrap()
        .build();

    let mut chain = TestChain::new(req);
    let resp = interceptor(engine.clone()).intercept(&mut chain).unwrap();

    let params = engine.last_params();
    assert!(!params.headers.contains("accept-encoding"));
    assert_eq!(params.headers.get_str("user-agent"), Some("test"));

    assert!(resp.header("content-encoding").is_none());
    assert_eq!(resp.header("x-served-by"), Some("edge"));
    assert_eq!(resp.body().content_type(), Some("text/html"));
}

#[test]
fn test_negotiated_protocol_mapping() {
    for (negotiated, expected) in [
        ("h2-16", Protocol::Http2),
        ("quic/1+spdy/3", Protocol::Quic),
        ("http/1.1", Protocol::Http11),
        ("http/1.0", Protocol::Http10),
        ("spdy/3", Protocol::Http10),
    ] {
        let engine = ScriptedEngine::responding(Ending::with_headers(&[], negotiated));
        let mut chain = TestChain::new(get("https://example.com/"));
        let resp = interceptor(engine).intercept(&mut chain).unwrap();
        assert_eq!(resp.protocol(), expected, "for {negotiated}");
    }
}

#[test]
fn test_cross_scheme_redirect_follows_ssl_flag() {
    for follow_ssl in [true, false] {
        let engine = ScriptedEngine::new(Script {
            redirects: vec!["http://example.com/plain".into()],
            ending: Ending::ok(vec![b"done".to_vec()]),
        });
        let policy = RedirectPolicy {
            follow_redirects: !follow_ssl,
            follow_ssl_redirects: follow_ssl,
        };
        let mut chain = TestChain::new(get("https://example.com/secure"));
        let result = interceptor(engine.clone())
            .redirect_policy(policy)
            .intercept(&mut chain);

        if follow_ssl {
            let resp = result.unwrap();
            assert_eq!(resp.request().url().as_str(), "http://example.com/plain");
            assert_eq!(engine.last_trace().followed, 1);
        } else {
            assert!(result.unwrap_err().is_canceled());
            assert!(engine.last_trace().canceled);
        }
    }
}

#[test]
fn test_upgrade_redirect_follows_ssl_flag() {
    let engine = ScriptedEngine::new(Script {
        redirects: vec!["https://example.com/secure".into()],
        ending: Ending::ok(vec![]),
    });
    let policy = RedirectPolicy {
        follow_redirects: true,
        follow_ssl_redirects: false,
    };
    let mut chain = TestChain::new(get("http://example.com/"));
    let err = interceptor(engine)
        .redirect_policy(policy)
        .intercept(&mut chain)
        .unwrap_err();
    assert!(err.is_canceled());
}

#[test]
fn test_same_scheme_redirect_ignores_ssl_flag() {
    for follow in [true, false] {
        let engine = ScriptedEngine::new(Script {
            redirects: vec!["https://example.com/next".into()],
            ending: Ending::ok(vec![]),
        });
        let policy = RedirectPolicy {
            follow_redirects: follow,
            follow_ssl_redirects: !follow,
        };
        let mut chain = TestChain::new(get("https://example.com/"));
        let result = interceptor(engine)
            .redirect_policy(policy)
            .intercept(&mut chain);
        assert_eq!(result.is_ok(), follow);
    }
}

#[test]
fn test_twenty_redirects_followed() {
    let engine = ScriptedEngine::new(Script {
        redirects: redirects(20, "https://example.com"),
        ending: Ending::ok(vec![b"end".to_vec()]),
    });
    let mut chain = TestChain::new(get("https://example.com/start"));
    let resp = interceptor(engine.clone()).intercept(&mut chain).unwrap();
    assert_eq!(resp.request().url().path(), "/hop19");
    assert_eq!(engine.last_trace().followed, 20);

    let chain_urls = resp.url_chain();
    assert_eq!(chain_urls.len(), 21);
    assert_eq!(chain_urls[0], "https://example.com/start");
    assert_eq!(chain_urls[20], "https://example.com/hop19");
    assert_eq!(chain_urls.last().map(String::as_str), Some(resp.request().url().as_str()));
}

#[test]
fn test_twenty_first_redirect_canceled() {
    let engine = ScriptedEngine::new(Script {
        redirects: redirects(25, "https://example.com"),
        ending: Ending::ok(vec![]),
    });
    let mut chain = TestChain::new(get("https://example.com/start"));
    let err = interceptor(engine.clone())
        .redirect_policy(RedirectPolicy::default())
        .intercept(&mut chain)
        .unwrap_err();

    assert!(err.is_canceled());
    let trace = engine.last_trace();
    assert_eq!(trace.followed, 20);
    assert!(trace.canceled);
}

#[test]
fn test_engine_failure_surfaces_from_wait() {
    let engine = ScriptedEngine::responding(Ending::Fail(
        EngineFault::new(NetError::QuicHandshakeFailed, "handshake").with_quic_detail(7),
    ));
    let mut chain = TestChain::new(get("https://example.com/"));
    let err = interceptor(engine).intercept(&mut chain).unwrap_err();

    let fault = err.engine_fault().expect("engine fault");
    assert_eq!(fault.net_error(), NetError::QuicHandshakeFailed);
    assert_eq!(fault.quic_detailed_error(), Some(7));
    assert!(chain.proceeded.is_empty());
}

#[test]
fn test_abandoned_request_does_not_hang() {
    let engine = ScriptedEngine::responding(Ending::Abandon);
    let mut chain = TestChain::new(get("https://example.com/"));
    let err = interceptor(engine).intercept(&mut chain).unwrap_err();
    assert!(matches!(err, BridgeError::Abandoned));
}

#[test]
fn test_translation_error_before_dispatch() {
    struct Broken;
    impl enginebridge::http::BodyWriter for Broken {
        fn write_to(&self, _sink: &mut dyn io::Write) -> io::Result<()> {
            Err(io::Error::other("disk gone"))
        }
    }

    let engine = ScriptedEngine::responding(Ending::ok(vec![]));
    let req = Request::builder(Url::parse("https://example.com/").unwrap())
        .method(Method::PUT)
        .body(RequestBody::writer(Broken))
        .build();
    let mut chain = TestChain::new(req);
    let err = interceptor(engine.clone()).intercept(&mut chain).unwrap_err();

    assert!(matches!(err, BridgeError::Translation { .. }));
    assert!(engine.dispatched.lock().unwrap().is_empty());
}

#[test]
fn test_fallback_when_session_not_ready() {
    let req = Request::builder(Url::parse("http://example.com/legacy").unwrap())
        .header("Accept-Encoding", "gzip")
        .unwrap()
        .build();
    let interceptor = EngineInterceptor::new(Arc::new(EngineSession::new()));

    let mut chain = TestChain::new(req.clone());
    let via_bridge = interceptor.intercept(&mut chain).unwrap();
    let direct = fallback_response(&req).unwrap();

    assert_eq!(chain.proceeded.len(), 1);
    assert_eq!(chain.proceeded[0].header("accept-encoding"), Some("gzip"));
    assert_eq!(via_bridge.code(), direct.code());
    assert_eq!(via_bridge.message(), direct.message());
    assert_eq!(via_bridge.headers(), direct.headers());
    assert_eq!(via_bridge.body(), direct.body());
    assert_eq!(via_bridge.sent_at(), direct.sent_at());
    assert_eq!(via_bridge.received_at(), direct.received_at());
    assert_eq!(via_bridge.request().url(), direct.request().url());
}

#[test]
fn test_fallback_error_passes_through() {
    let interceptor = EngineInterceptor::new(Arc::new(EngineSession::new()));
    let mut chain = TestChain::failing(get("http://example.com/"), io::ErrorKind::ConnectionReset);
    let err = interceptor.intercept(&mut chain).unwrap_err();
    match err {
        BridgeError::Fallback(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("expected fallback error, got {other:?}"),
    }
}

#[test]
fn test_panicking_observer_does_not_break_call() {
    struct Exploding(AtomicUsize);
    impl CallObserver for Exploding {
        fn call_end(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
            panic!("observer bug");
        }
        fn on_response(
            &self,
            _response: &enginebridge::http::Response,
        ) -> Result<(), ObserverError> {
            Err("rejected".into())
        }
    }

    let observer = Arc::new(Exploding(AtomicUsize::new(0)));
    let engine = ScriptedEngine::responding(Ending::ok(vec![b"fine".to_vec()]));
    let mut chain = TestChain::new(get("https://example.com/"));
    let resp = interceptor(engine)
        .observer(observer.clone())
        .intercept(&mut chain)
        .unwrap();

    assert_eq!(resp.body().as_bytes(), b"fine");
    assert_eq!(observer.0.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_requests_complete_independently() {
    let engine = ScriptedEngine::responding(Ending::ok(vec![b"x".to_vec(), b"y".to_vec()]));
    let interceptor = Arc::new(interceptor(engine.clone()));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let interceptor = interceptor.clone();
            thread::spawn(move || {
                let mut chain = TestChain::new(get(&format!("https://example.com/{i}")));
                interceptor.intercept(&mut chain).unwrap()
            })
        })
        .collect();

    for (i, worker) in workers.into_iter().enumerate() {
        let resp = worker.join().unwrap();
        assert_eq!(resp.body().as_bytes(), b"xy");
        assert_eq!(resp.request().url().path(), format!("/{i}"));
    }
    assert_eq!(engine.dispatched.lock().unwrap().len(), 8);
}
