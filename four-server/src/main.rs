use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use four_server::server::{run, HubState};
use four_server::storage::RecordStore;
use protocol::{Listener, NetworkConfig, TcpListener};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("four_server=debug".parse()?))
        .init();

    let config = NetworkConfig::default();
    let listener = TcpListener::bind(&config.addr()).await?;
    info!(addr = %config.addr(), "四子棋服务端启动");

    let store = RecordStore::new()?;
    let state = HubState::new(store);

    run(listener, state).await
}
