use std::collections::BTreeSet;
use std::fs::File;
use std::sync::Arc;

use robot_order_submit::browser::open_session;
use robot_order_submit::config::Config;
use robot_order_submit::infrastructure::{Downloader, HttpDownloader, ZipArchiver};
use robot_order_submit::logger;
use robot_order_submit::models::{parse_orders, parse_orders_file, OutputLayout};
use robot_order_submit::orchestrator::App;
use robot_order_submit::services::{ArchiveBuilder, ArchiveInput};

fn zip_entries(path: &std::path::Path) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_parse_orders_keeps_file_order_and_verbatim_values() {
    let csv = "Order number,Head,Body,Legs,Address\n\
               3,1,2,3,\"Robot Street 3, Floor 2\"\n\
               1,6,6,6,Address 1\n";

    let orders = parse_orders(csv.as_bytes(), "inline").expect("解析订单失败");

    let numbers: Vec<&str> = orders.iter().map(|o| o.order_number.as_str()).collect();
    assert_eq!(numbers, ["3", "1"]);
    assert_eq!(orders[0].address, "Robot Street 3, Floor 2");
}

#[tokio::test]
async fn test_archive_scan_of_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path(), "orders.csv");
    layout.prepare().await.unwrap();
    std::fs::write(layout.receipt_pdf("1"), b"%PDF").unwrap();
    std::fs::write(layout.robot_image("1"), b"PNG").unwrap();
    std::fs::write(layout.diagnostic_screenshot("1"), b"PNG").unwrap();

    let summary = ArchiveBuilder::new(Arc::new(ZipArchiver), layout.clone())
        .build(ArchiveInput::ScanOutputDir)
        .await
        .expect("打包失败");

    assert_eq!((summary.pdf_count, summary.image_count), (1, 1));
    assert_eq!(
        zip_entries(&layout.image_archive()),
        BTreeSet::from(["robot_1.png".to_string()])
    );
}

#[test]
fn test_config_file_overrides_defaults() {
    let config = Config::from_toml_str(
        r#"
        output_dir = "run-output"
        max_submit_attempts = 0
        "#,
    )
    .expect("解析配置失败");

    assert_eq!(config.output_dir, "run-output");
    assert_eq!(config.submit_policy().max_attempts, None);
    assert_eq!(config.order_page_url, Config::default().order_page_url);
}

#[tokio::test]
#[ignore] // 需要网络，手动运行：cargo test -- --ignored
async fn test_download_real_orders_file() {
    logger::init(true);

    let config = Config::from_env();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("orders.csv");

    HttpDownloader::new()
        .download(&config.orders_url, &target)
        .await
        .expect("下载订单文件失败");
    let orders = parse_orders_file(&target).await.expect("解析订单文件失败");

    assert!(!orders.is_empty(), "订单文件不应为空");
}

#[tokio::test]
#[ignore] // 需要本地 Chrome
async fn test_open_browser_session() {
    logger::init(true);

    let config = Config::from_env();
    let mut session = open_session(&config).await.expect("打开浏览器会话失败");

    assert!(session.owned || config.browser_debug_port.is_some());
    if session.owned {
        session.browser.close().await.expect("关闭浏览器失败");
    }
}

#[tokio::test]
#[ignore] // 需要网络和本地 Chrome，会真实下单
async fn test_full_run_against_live_store() {
    logger::init(true);

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: dir.path().to_string_lossy().into_owned(),
        ..Config::from_env()
    };
    let layout = config.output_layout();

    let report = App::initialize(config)
        .await
        .expect("初始化失败")
        .run()
        .await
        .expect("运行失败");

    assert_eq!(report.archives.pdf_count, report.artifacts.len());
    for artifacts in &report.artifacts {
        assert!(artifacts.receipt_pdf_path.exists());
        assert!(artifacts.screenshot_path.exists());
    }
    assert!(layout.pdf_archive().exists());
    assert!(layout.image_archive().exists());
}
