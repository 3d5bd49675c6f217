//! Servidor HTTP mínimo para los tests: responde una vez y se cierra.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Devuelve la URL de un servidor que contesta `status` con `body` a la primera petición.
pub async fn serve_once(status: &'static str, body: &'static [u8]) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();

  tokio::spawn(async move {
    let (mut socket, _) = listener.accept().await.unwrap();

    // Leemos hasta el final de las cabeceras; las peticiones GET no traen cuerpo.
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
      let n = socket.read(&mut buf).await.unwrap();
      if n == 0 {
        break;
      }
      request.extend_from_slice(&buf[..n]);
    }

    let head = format!("HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n", body.len());
    socket.write_all(head.as_bytes()).await.unwrap();
    socket.write_all(body).await.unwrap();
    socket.shutdown().await.unwrap();
  });

  format!("http://{addr}/audio/track.mp4")
}
