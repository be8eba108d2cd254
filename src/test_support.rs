//! Shared fixtures for unit tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A small Google News style feed with three items: one with escaped HTML in
/// its description, one using CDATA, and one missing most fields.
pub const SAMPLE_FEED: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"ia" - Google Notícias</title>
    <link>https://news.google.com/search?q=ia</link>
    <item>
      <title>Governo lança programa de IA - G1</title>
      <link>https://www.g1.globo.com/pi/noticia/1</link>
      <pubDate>Tue, 06 May 2025 14:30:00 GMT</pubDate>
      <description>&lt;a href="https://g1.globo.com/1"&gt;Governo lança programa&lt;/a&gt;&amp;nbsp;&lt;font color="#6f6f6f"&gt;G1&lt;/font&gt;</description>
      <source url="https://g1.globo.com">G1</source>
    </item>
    <item>
      <title><![CDATA[Crise & atraso no projeto]]></title>
      <link>https://cidadeverde.com/2</link>
      <description><![CDATA[<p>Projeto sofre <b>atraso</b></p>]]></description>
    </item>
    <item>
      <title>Sem link</title>
    </item>
  </channel>
</rss>"##;

/// Serve one canned HTTP response on a fresh local port and return the
/// endpoint URL. Later connections are refused.
pub async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/rss+xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/rss/search")
}

/// URL of a local port with nothing listening on it.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/rss/search")
}

/// URL of a local server that accepts connections but never answers.
pub async fn silent_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/rss/search")
}
