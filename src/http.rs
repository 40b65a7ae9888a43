use crate::transport::{Transport, TransportError};
use monoio::{
    io::{AsyncReadRent, AsyncWriteRent, AsyncWriteRentExt},
    net::TcpStream,
};
use pixelwall_common::{PixelState, UpdateRequest, UpdateResponse};
use std::{io, net::SocketAddr};

const READ_CHUNK: usize = 8 * 1024;
const MAX_RESPONSE: usize = 4 * 1024 * 1024;

macro_rules! attempt {
    ($io:expr) => {{
        let (result, buf) = { $io };
        result?;
        buf
    }};
}

#[inline]
fn encode_dec(buf: &mut itoa::Buffer, num: impl itoa::Integer) -> &str {
    buf.format(num)
}

#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

async fn connect(addr: SocketAddr) -> io::Result<TcpStream> {
    let stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    addr: SocketAddr,
    host: String,
}

impl HttpClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            host: addr.to_string(),
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response, TransportError> {
        trace!(method, path, "sending request");

        let mut conn = connect(self.addr).await?;
        let head = encode_request_head(method, path, &self.host, body.as_ref().map(Vec::len));

        attempt!(conn.write_all(head).await);
        if let Some(body) = body {
            attempt!(conn.write_all(body).await);
        }
        conn.flush().await?;

        let raw = read_response(&mut conn).await?;
        let response = parse_response(&raw)?;
        trace!(method, path, status = response.status, "got response");

        Ok(response)
    }
}

impl Transport for HttpClient {
    async fn fetch_pixels(&self) -> Result<PixelState, TransportError> {
        let response = self.request("GET", "/pixels", None).await?;
        if !response.is_success() {
            return Err(TransportError::Status {
                code: response.status,
                reason: None,
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn send_update(&self, request: &UpdateRequest) -> Result<UpdateResponse, TransportError> {
        let body = serde_json::to_vec(request)?;
        let response = self.request("POST", "/update", Some(body)).await?;
        if !response.is_success() {
            let reason = serde_json::from_slice::<UpdateResponse>(&response.body)
                .ok()
                .and_then(|reply| reply.error);

            return Err(TransportError::Status {
                code: response.status,
                reason,
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }
}

fn encode_request_head(method: &str, path: &str, host: &str, content_length: Option<usize>) -> Vec<u8> {
    let mut head = Vec::with_capacity(256);
    let mut put = |part: &str| head.extend_from_slice(part.as_bytes());

    put(method);
    put(" ");
    put(path);
    put(" HTTP/1.1\r\nHost: ");
    put(host);
    put("\r\nAccept: application/json\r\nConnection: close\r\n");

    if let Some(len) = content_length {
        let mut num_buf = itoa::Buffer::new();
        put("Content-Type: application/json\r\nContent-Length: ");
        put(encode_dec(&mut num_buf, len));
        put("\r\n");
    }

    put("\r\n");
    head
}

async fn read_response(conn: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut chunk = Vec::with_capacity(READ_CHUNK);

    loop {
        chunk.clear();
        let (result, buf) = conn.read(chunk).await;
        chunk = buf;

        let read = result?;
        if read == 0 {
            break;
        }

        raw.extend_from_slice(&chunk[..read]);
        if raw.len() > MAX_RESPONSE {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "response too large"));
        }

        // servers that ignore `Connection: close` never send EOF
        if matches!(parse_head(&raw), Ok(Some(head)) if head.is_complete(&raw)) {
            break;
        }
    }

    Ok(raw)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[derive(Clone, Copy, Debug)]
struct Head {
    status: u16,
    body_start: usize,
    content_length: Option<usize>,
    chunked: bool,
}

impl Head {
    fn is_complete(&self, raw: &[u8]) -> bool {
        let rest = &raw[self.body_start..];

        if self.chunked {
            decode_chunked(rest).is_ok()
        } else {
            self.content_length.is_some_and(|len| rest.len() >= len)
        }
    }
}

/// `Ok(None)` while the header block hasn't fully arrived yet
fn parse_head(raw: &[u8]) -> Result<Option<Head>, TransportError> {
    let Some(head_end) = find(raw, b"\r\n\r\n") else {
        return Ok(None);
    };
    let head = std::str::from_utf8(&raw[..head_end])
        .map_err(|_| TransportError::Malformed("headers are not UTF-8"))?;

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.split_whitespace();

    if !parts.next().is_some_and(|version| version.starts_with("HTTP/1.")) {
        return Err(TransportError::Malformed("not an HTTP/1.x status line"));
    }

    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|code| (100..1000).contains(code))
        .ok_or(TransportError::Malformed("invalid status code"))?;

    let mut content_length = None;
    let mut chunked = false;

    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or(TransportError::Malformed("invalid header line"))?;
        let value = value.trim();

        if name.eq_ignore_ascii_case("content-length") {
            let len = value
                .parse::<usize>()
                .map_err(|_| TransportError::Malformed("invalid content-length"))?;
            content_length = Some(len);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = value
                .rsplit(',')
                .next()
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }
    }

    Ok(Some(Head {
        status,
        body_start: head_end + 4,
        content_length,
        chunked,
    }))
}

/// Parse a complete HTTP/1.x response. Without `Content-Length` or chunked
/// framing the body runs to the end of `raw`.
pub fn parse_response(raw: &[u8]) -> Result<Response, TransportError> {
    let head = parse_head(raw)?.ok_or(TransportError::Malformed("missing end of headers"))?;
    let rest = &raw[head.body_start..];

    let body = if head.chunked {
        decode_chunked(rest)?
    } else if let Some(len) = head.content_length {
        rest.get(..len)
            .ok_or(TransportError::Malformed("body shorter than content-length"))?
            .to_vec()
    } else {
        rest.to_vec()
    };

    Ok(Response {
        status: head.status,
        body,
    })
}

fn decode_chunked(mut input: &[u8]) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();

    loop {
        let line_end = find(input, b"\r\n").ok_or(TransportError::Malformed("truncated chunk size"))?;
        let size_line = std::str::from_utf8(&input[..line_end])
            .map_err(|_| TransportError::Malformed("invalid chunk size"))?;

        // chunk extensions are allowed after a ';'
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| TransportError::Malformed("invalid chunk size"))?;
        input = &input[line_end + 2..];

        if size == 0 {
            // trailers are of no interest
            return Ok(body);
        }

        let data = input
            .get(..size)
            .ok_or(TransportError::Malformed("truncated chunk"))?;
        if input.get(size..size + 2) != Some(b"\r\n".as_slice()) {
            return Err(TransportError::Malformed("chunk without terminator"));
        }

        body.extend_from_slice(data);
        input = &input[size + 2..];
    }
}
