use anyhow::Result;
use robot_order_submit::config::Config;
use robot_order_submit::logger;
use robot_order_submit::orchestrator::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
