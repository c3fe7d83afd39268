// One development-mode OTP server shared by every integration test.
use otp_server::OtpServerConfig;
use std::net::{SocketAddr, TcpStream};
use std::sync::{OnceLock, mpsc};
use std::time::Duration;

static BASE_URL: OnceLock<String> = OnceLock::new();

// Starts the server on first use and returns `http://host:port`.
pub fn ensure_server() -> &'static str {
    BASE_URL.get_or_init(|| {
        let (bound_tx, bound_rx) = mpsc::channel::<SocketAddr>();

        // Own thread and runtime so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                bound_tx.send(addr).expect("publish bound address");
                otp_server::run(listener, OtpServerConfig::development(addr.port()))
                    .await
                    .expect("otp server stopped");
            });
        });

        let addr = bound_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("otp server did not bind in time");
        wait_until_accepting(addr);
        format!("http://{addr}")
    })
}

fn wait_until_accepting(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("otp server at {addr} never accepted connections");
}
