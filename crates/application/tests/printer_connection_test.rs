use application::PrinterConnection;
use async_trait::async_trait;
use domain::CommandStream;
use domain::printer::{ConnectionState, PrinterError, PrinterTransport, RetryPolicy};
use mockall::mock;

mock! {
    pub Transport {}

    #[async_trait]
    impl PrinterTransport for Transport {
        async fn connect(&mut self) -> Result<(), PrinterError>;
        async fn disconnect(&mut self) -> Result<(), PrinterError>;
        async fn is_connected(&self) -> bool;
        async fn send_commands(&mut self, commands: &[u8]) -> Result<(), PrinterError>;
    }
}

fn stream() -> CommandStream {
    CommandStream::new("^XA\n^XZ")
}

fn broken_pipe() -> PrinterError {
    PrinterError::WriteFailed("broken pipe".to_string())
}

#[tokio::test]
async fn test_write_succeeds_without_recovery() {
    let mut transport = MockTransport::new();
    transport.expect_connect().times(1).returning(|| Ok(()));
    transport
        .expect_send_commands()
        .withf(|bytes| bytes.starts_with(b"^XA"))
        .times(1)
        .returning(|_| Ok(()));
    transport.expect_disconnect().times(0);

    let mut conn = PrinterConnection::open("10.0.0.1", Box::new(transport), RetryPolicy::default())
        .await
        .unwrap();

    conn.write(&stream()).await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(conn.reconnect_count(), 0);
}

#[tokio::test]
async fn test_single_failure_reconnects_once_and_retries() {
    let mut transport = MockTransport::new();
    // Initial open plus one reconnect
    transport.expect_connect().times(2).returning(|| Ok(()));
    transport.expect_disconnect().times(1).returning(|| Ok(()));

    let mut writes = 0;
    transport
        .expect_send_commands()
        .times(2)
        .returning(move |_| {
            writes += 1;
            if writes == 1 { Err(broken_pipe()) } else { Ok(()) }
        });

    let mut conn = PrinterConnection::open("10.0.0.1", Box::new(transport), RetryPolicy::default())
        .await
        .unwrap();

    conn.write(&stream()).await.unwrap();
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(conn.reconnect_count(), 1);
}

#[tokio::test]
async fn test_two_failures_give_up_after_one_retry() {
    let mut transport = MockTransport::new();
    transport.expect_connect().times(2).returning(|| Ok(()));
    transport.expect_disconnect().times(1).returning(|| Ok(()));
    // No third attempt
    transport
        .expect_send_commands()
        .times(2)
        .returning(|_| Err(broken_pipe()));
    transport.expect_is_connected().times(1).returning(|| false);

    let mut conn = PrinterConnection::open("10.0.0.1", Box::new(transport), RetryPolicy::default())
        .await
        .unwrap();

    let err = conn.write(&stream()).await.unwrap_err();
    assert!(matches!(err, PrinterError::WriteFailed(_)));
    assert_eq!(conn.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_failed_reconnect_is_reported_as_write_failure() {
    let mut transport = MockTransport::new();
    let mut connects = 0;
    transport.expect_connect().times(2).returning(move || {
        connects += 1;
        if connects == 1 {
            Ok(())
        } else {
            Err(PrinterError::ConnectionFailed("connection refused".to_string()))
        }
    });
    transport.expect_disconnect().times(1).returning(|| Ok(()));
    transport
        .expect_send_commands()
        .times(1)
        .returning(|_| Err(broken_pipe()));

    let mut conn = PrinterConnection::open("10.0.0.1", Box::new(transport), RetryPolicy::default())
        .await
        .unwrap();

    match conn.write(&stream()).await {
        Err(PrinterError::WriteFailed(msg)) => {
            assert!(msg.contains("broken pipe"));
            assert!(msg.contains("connection refused"));
        }
        other => panic!("expected WriteFailed, got {:?}", other),
    }
    assert_eq!(conn.state(), ConnectionState::Disconnected);
    assert_eq!(conn.reconnect_count(), 0);
}

#[tokio::test]
async fn test_no_retry_policy_fails_on_first_error() {
    let mut transport = MockTransport::new();
    transport.expect_connect().times(1).returning(|| Ok(()));
    transport.expect_disconnect().times(0);
    transport
        .expect_send_commands()
        .times(1)
        .returning(|_| Err(PrinterError::NotConnected));
    transport.expect_is_connected().times(1).returning(|| false);

    let mut conn = PrinterConnection::open("10.0.0.1", Box::new(transport), RetryPolicy::none())
        .await
        .unwrap();

    let err = conn.write(&stream()).await.unwrap_err();
    assert!(matches!(err, PrinterError::WriteFailed(_)));
}

#[tokio::test]
async fn test_open_propagates_connection_failure() {
    let mut transport = MockTransport::new();
    transport
        .expect_connect()
        .times(1)
        .returning(|| Err(PrinterError::ConnectionFailed("no route to host".to_string())));

    let err = PrinterConnection::open("10.0.0.9", Box::new(transport), RetryPolicy::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PrinterError::ConnectionFailed(_)));
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let mut transport = MockTransport::new();
    transport.expect_connect().times(1).returning(|| Ok(()));
    transport.expect_disconnect().times(2).returning(|| Ok(()));

    let mut conn = PrinterConnection::open("10.0.0.1", Box::new(transport), RetryPolicy::default())
        .await
        .unwrap();

    conn.close().await;
    conn.close().await;
    assert_eq!(conn.state(), ConnectionState::Disconnected);
}
