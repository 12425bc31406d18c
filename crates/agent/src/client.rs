//! WebSocket transport for the research runtime contract.

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::protocol::{cancel_frame, submit_frame, ResearchRequest, StreamEvent};

/// Control handle for one in-flight research run.
///
/// Events arrive in order until a terminal `Done`/`Error`, after which the
/// channel closes. Dropping the handle abandons the subscription.
pub struct RunHandle {
    events: mpsc::Receiver<StreamEvent>,
    cancel: mpsc::Sender<()>,
}

impl RunHandle {
    /// Next stream notification, `None` once the run is over.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Ask the runtime to abandon the run and close the subscription.
    pub async fn stop(&self) {
        let _ = self.cancel.send(()).await;
    }
}

/// Client side of the runtime's subscribe/submit/cancel contract.
pub struct AgentClient {
    url: String,
}

impl AgentClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit a request and subscribe to its event stream.
    ///
    /// The reader task forwards recognized frames until the runtime reports
    /// completion; a connection that drops mid-run surfaces as a single
    /// `Error` event. There is no automatic retry.
    pub async fn submit(&self, request: &ResearchRequest) -> Result<RunHandle> {
        let (socket, _) = connect_async(self.url.as_str())
            .await
            .with_context(|| format!("connecting to research runtime at {}", self.url))?;
        let (mut sink, mut stream) = socket.split();

        let frame = submit_frame(request).context("encoding research request")?;
        sink.send(Message::Text(frame))
            .await
            .context("submitting research request")?;

        let (event_tx, event_rx) = mpsc::channel(64);
        let (cancel_tx, mut cancel_rx) = mpsc::channel::<()>(1);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel_rx.recv() => {
                        if let Err(e) = sink.send(Message::Text(cancel_frame())).await {
                            warn!("cancel frame not delivered: {e}");
                        }
                        let _ = sink.close().await;
                        break;
                    }
                    frame = stream.next() => {
                        match frame {
                            Some(Ok(Message::Text(text))) => {
                                let Some(event) = StreamEvent::decode(&text) else {
                                    debug!("ignoring unrecognized frame");
                                    continue;
                                };
                                let terminal =
                                    matches!(event, StreamEvent::Done | StreamEvent::Error(_));
                                if event_tx.send(event).await.is_err() {
                                    break;
                                }
                                if terminal {
                                    break;
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                let _ = event_tx
                                    .send(StreamEvent::Error(
                                        "stream closed before completion".to_string(),
                                    ))
                                    .await;
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                let _ = event_tx.send(StreamEvent::Error(e.to_string())).await;
                                break;
                            }
                        }
                    }
                }
            }
        });

        Ok(RunHandle {
            events: event_rx,
            cancel: cancel_tx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use newsdesk_core::SearchBudget;
    use tokio::net::TcpListener;

    async fn accept_one(
        listener: TcpListener,
    ) -> tokio_tungstenite::WebSocketStream<tokio::net::TcpStream> {
        let (stream, _) = listener.accept().await.unwrap();
        tokio_tungstenite::accept_async(stream).await.unwrap()
    }

    #[tokio::test]
    async fn streams_events_until_done() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut ws = accept_one(listener).await;
            let submit = ws.next().await.unwrap().unwrap().into_text().unwrap();
            assert!(submit.contains("\"type\":\"submit\""));
            assert!(submit.contains("\"reasoning_model\":\"test-model\""));

            for frame in [
                r#"{"type":"update","payload":{"reflection":{}}}"#,
                r#"{"type":"heartbeat"}"#,
                r#"{"type":"message","payload":{"id":"m1","role":"ai","content":"answer"}}"#,
                r#"{"type":"done"}"#,
            ] {
                ws.send(Message::Text(frame.to_string())).await.unwrap();
            }
        });

        let client = AgentClient::new(&format!("ws://{addr}"));
        let request =
            ResearchRequest::new(Vec::new(), SearchBudget::from_effort("low"), "test-model");
        let mut run = client.submit(&request).await.unwrap();

        let mut events = Vec::new();
        while let Some(event) = run.next_event().await {
            events.push(event);
        }
        // The heartbeat frame is dropped by the decoder.
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StreamEvent::Update(_)));
        assert!(matches!(events[1], StreamEvent::Message(_)));
        assert!(matches!(events[2], StreamEvent::Done));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_connection_surfaces_as_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut ws = accept_one(listener).await;
            let _ = ws.next().await;
            ws.close(None).await.unwrap();
        });

        let client = AgentClient::new(&format!("ws://{addr}"));
        let request = ResearchRequest::new(Vec::new(), SearchBudget::default(), "m");
        let mut run = client.submit(&request).await.unwrap();

        match run.next_event().await {
            Some(StreamEvent::Error(message)) => {
                assert!(message.contains("closed before completion"));
            }
            other => panic!("expected error event, got {other:?}"),
        }

        server.await.unwrap();
    }

    #[tokio::test]
    async fn stop_sends_cancel_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut ws = accept_one(listener).await;
            let _submit = ws.next().await.unwrap().unwrap();
            let cancel = ws.next().await.unwrap().unwrap().into_text().unwrap();
            assert!(cancel.contains("\"type\":\"cancel\""));
        });

        let client = AgentClient::new(&format!("ws://{addr}"));
        let request = ResearchRequest::new(Vec::new(), SearchBudget::default(), "m");
        let run = client.submit(&request).await.unwrap();
        run.stop().await;

        server.await.unwrap();
    }
}
