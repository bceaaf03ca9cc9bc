//! Integration tests for the WebSocket transport: a real server and a
//! real client exchanging frames over loopback.

#[cfg(feature = "websocket")]
mod websocket {
    use std::net::SocketAddr;

    use dropfour_transport::{
        Connection, Transport, WebSocketConnection, WebSocketTransport,
    };
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on an ephemeral port and returns the transport plus the
    /// address clients should dial.
    async fn bound_transport() -> (WebSocketTransport, SocketAddr) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should know its address");
        (transport, addr)
    }

    async fn connect_client(addr: SocketAddr) -> ClientWs {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    /// Accepts one connection while a client dials in.
    async fn accepted_pair() -> (WebSocketConnection, ClientWs) {
        let (mut transport, addr) = bound_transport().await;
        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let client = connect_client(addr).await;
        (server.await.expect("accept task"), client)
    }

    #[tokio::test]
    async fn test_bind_assigns_ephemeral_port() {
        let (_transport, addr) = bound_transport().await;
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn test_binary_frames_flow_both_ways() {
        let (server_conn, mut client_ws) = accepted_pair().await;
        assert!(server_conn.id().into_inner() > 0);

        server_conn.send(b"from server").await.expect("send");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"from server");

        client_ws
            .send(Message::Binary(b"from client".to_vec().into()))
            .await
            .unwrap();
        let received = server_conn
            .recv()
            .await
            .expect("recv")
            .expect("should have data");
        assert_eq!(received, b"from client");

        server_conn.close().await.expect("close");
    }

    #[tokio::test]
    async fn test_text_frames_surface_as_bytes() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        client_ws
            .send(Message::Text("{\"seq\":1}".into()))
            .await
            .unwrap();

        let received = server_conn.recv().await.expect("recv").expect("data");
        assert_eq!(received, b"{\"seq\":1}");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (server_conn, mut client_ws) = accepted_pair().await;

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "clean close should surface as None");
    }

    #[tokio::test]
    async fn test_send_works_while_recv_is_parked() {
        // The host pumps broadcasts from one task while another waits
        // in recv. The split halves must not block each other.
        let (server_conn, mut client_ws) = accepted_pair().await;
        let server_conn = std::sync::Arc::new(server_conn);

        let receiver = {
            let conn = server_conn.clone();
            tokio::spawn(async move { conn.recv().await })
        };
        // Give the recv task time to park on the stream.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        server_conn.send(b"not blocked").await.expect("send");
        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"not blocked");

        client_ws
            .send(Message::Binary(b"wake up".to_vec().into()))
            .await
            .unwrap();
        let received = receiver.await.unwrap().expect("recv").expect("data");
        assert_eq!(received, b"wake up");
    }
}
