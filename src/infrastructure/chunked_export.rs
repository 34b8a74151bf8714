// Chunked NDJSON streaming for the data export
use crate::application::export_service::ExportMessage;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;

/// Create a chunked NDJSON response, one message per line.
pub fn chunked_json_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = ExportMessage> + Send + 'static,
{
    let byte_stream = stream.map(|msg| serialize_chunk(&msg));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"program-data.ndjson\"",
        )
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn serialize_chunk(msg: &ExportMessage) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg)?;
    let mut chunk = BytesMut::with_capacity(json.len() + 1);
    chunk.put_slice(&json);
    chunk.put_u8(b'\n');
    Ok(chunk.freeze())
}

/// Helper to create a streaming response from a receiver
pub fn stream_from_receiver(mut rx: tokio::sync::mpsc::Receiver<ExportMessage>) -> impl IntoResponse {
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
        }
    };

    match chunked_json_stream(stream) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
