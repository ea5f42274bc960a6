#![allow(clippy::unwrap_used)] // Integration tests use unwrap for brevity

//! WebSocket transport against a local server.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use riemann_bridge_core::transport::PushFeed;
use riemann_bridge_core::{Pipe, Sink, Source, Termination, TransportError};

async fn local_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/index", listener.local_addr().unwrap());
    (listener, url)
}

async fn refused_url() -> String {
    let (listener, url) = local_listener().await;
    drop(listener);
    url
}

#[tokio::test]
async fn source_forwards_frames_until_peer_closes() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(Message::Text(r#"{"service":"a"}"#.into()))
            .await
            .unwrap();
        ws.send(Message::Ping(vec![1, 2, 3])).await.unwrap();
        ws.send(Message::Binary(br#"{"service":"b"}"#.to_vec()))
            .await
            .unwrap();
        ws.close(None).await.unwrap();
    });

    let (tx, mut rx) = Pipe::new(8, 0).split();
    let reader = Box::new(PushFeed::new(url)).as_reader(tx);

    let mut out = Vec::new();
    while rx.recv().await {
        out.push(rx.bytes().to_vec());
    }
    reader.await.unwrap();
    server.await.unwrap();

    assert_eq!(
        out,
        vec![br#"{"service":"a"}"#.to_vec(), br#"{"service":"b"}"#.to_vec()]
    );
    assert_eq!(rx.termination(), Termination::Eof);
}

#[tokio::test]
async fn source_stops_at_send_limit() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        for n in 0..5 {
            if ws.send(Message::Text(format!(r#"{{"n":{n}}}"#))).await.is_err() {
                break;
            }
        }
        // Keep the connection open until the client hangs up.
        while let Some(Ok(_)) = ws.next().await {}
    });

    let (tx, mut rx) = Pipe::new(8, 2).split();
    let reader = Box::new(PushFeed::new(url)).as_reader(tx);

    let mut out = Vec::new();
    while rx.recv().await {
        out.push(rx.bytes().to_vec());
    }
    reader.await.unwrap();
    server.await.unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(rx.termination(), Termination::EndOfStream);
}

#[tokio::test]
async fn source_latches_connect_failure() {
    let url = refused_url().await;
    let (tx, mut rx) = Pipe::new(0, 0).split();
    Box::new(PushFeed::new(url.clone())).as_reader(tx).await.unwrap();

    assert!(!rx.recv().await);
    match rx.termination() {
        Termination::Failed(TransportError::Connect { addr, .. }) => assert_eq!(addr, url),
        other => panic!("unexpected termination: {other:?}"),
    }
}

#[tokio::test]
async fn sink_sends_one_text_frame_per_event() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        let mut got = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            match message {
                Message::Text(text) => got.push(text),
                Message::Close(_) => break,
                _ => {}
            }
        }
        got
    });

    let (mut tx, mut rx) = Pipe::new(4, 0).split();
    tx.send(br#"{"service":"a"}"#.to_vec()).await;
    tx.send(br#"{"service":"b"}"#.to_vec()).await;
    tx.close();

    Box::new(PushFeed::new(url))
        .as_writer(&mut rx)
        .await
        .unwrap();

    assert_eq!(
        server.await.unwrap(),
        vec![r#"{"service":"a"}"#.to_string(), r#"{"service":"b"}"#.to_string()]
    );
}

#[tokio::test]
async fn sink_reports_connect_failure() {
    let url = refused_url().await;
    let (_tx, mut rx) = Pipe::new(0, 0).split();

    let result = Box::new(PushFeed::new(url)).as_writer(&mut rx).await;
    assert!(matches!(result, Err(TransportError::Connect { .. })));
}

#[tokio::test]
async fn sink_passes_non_utf8_bytes_through_unchanged() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        let mut got = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            match message {
                Message::Close(_) => break,
                Message::Text(_) | Message::Binary(_) => got.push(message),
                _ => {}
            }
        }
        got
    });

    let raw = b"{\"host\":\"\xff\xfe\"}".to_vec();
    let (mut tx, mut rx) = Pipe::new(4, 0).split();
    tx.send(raw.clone()).await;
    tx.send(br#"{"service":"a"}"#.to_vec()).await;
    tx.close();

    Box::new(PushFeed::new(url))
        .as_writer(&mut rx)
        .await
        .unwrap();

    assert_eq!(
        server.await.unwrap(),
        vec![
            Message::Binary(raw),
            Message::Text(r#"{"service":"a"}"#.to_string()),
        ]
    );
}
