// Chunked board event streaming
//
// Each chunk is a 4-byte big-endian length followed by one JSON encoded
// event, Brotli-compressed per chunk when the client asked for it.
use crate::application::chart_board::BoardEvent;
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// Create a chunked streaming response
pub fn chunked_event_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = BoardEvent> + Send + 'static,
{
    let byte_stream = stream.then(move |event| async move { serialize_chunk(&event, compress).await });

    // Content-Encoding stays unset: chunks are compressed individually,
    // not the HTTP body as a whole.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single event to a length-prefixed chunk
pub async fn serialize_chunk(event: &BoardEvent, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(event).map_err(std::io::Error::other)?;

    let payload = if compress {
        brotli_compress(json).await?
    } else {
        json
    };

    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Stream board events to the client until it disconnects.
pub fn stream_from_receiver(rx: broadcast::Receiver<BoardEvent>, compress: bool) -> impl IntoResponse {
    let stream = BroadcastStream::new(rx).filter_map(|item| async move {
        match item {
            Ok(event) => Some(event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!("Event stream lagged, skipped {} events", skipped);
                None
            }
        }
    });

    match chunked_event_stream(stream, compress) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::ChartKind;

    #[tokio::test]
    async fn test_chunk_is_length_prefixed_json() {
        let event = BoardEvent::KindChanged {
            kind: ChartKind::Bar,
        };
        let chunk = serialize_chunk(&event, false).await.unwrap();

        let length = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as usize;
        assert_eq!(length, chunk.len() - 4);

        let json: serde_json::Value = serde_json::from_slice(&chunk[4..]).unwrap();
        assert_eq!(json["type"], "kind_changed");
        assert_eq!(json["kind"], "bar");
    }

    #[tokio::test]
    async fn test_stream_forwards_broadcast_events() {
        let (tx, rx) = broadcast::channel(8);
        let response = stream_from_receiver(rx, false).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        tx.send(BoardEvent::Cleared).unwrap();
        drop(tx);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body[4..]).unwrap();
        assert_eq!(json["type"], "cleared");
    }
}
