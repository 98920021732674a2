#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use tracing::info;
use std::sync::Arc;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::Semaphore;
use voxlate::{
    asr::whisper::WhisperAsr, pipeline::PipelineRunner, task::{TaskRegistry, TaskSweeper},
    translate::{GoogleTranslator, Translator}, utils::logger, AppContext,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    let _guard = logger::init("./logs".to_string())?;
    voxlate::init_env();

    info!("Starting voxlate service...");

    // 初始化 ASR 模型
    info!("Initializing Whisper ASR model...");
    let asr = Arc::new(WhisperAsr::new(voxlate::MODEL_PATH.clone())?);

    // 初始化翻译客户端
    let translator: Arc<dyn Translator> = Arc::new(GoogleTranslator::new());

    // 初始化任务注册表
    info!("Initializing Task Registry...");
    let registry = Arc::new(TaskRegistry::new());

    let runner = Arc::new(PipelineRunner::new(
        asr,
        translator.clone(),
        registry.clone(),
        Duration::from_secs(*voxlate::TASK_TIMEOUT_SECS),
    ));

    // 启动过期任务清理
    let sweeper = TaskSweeper::new(registry.clone());
    tokio::spawn(async move {
        sweeper.run().await;
    });

    // 创建应用上下文
    let ctx = Arc::new(AppContext {
        registry,
        runner,
        translator,
        record_permits: Arc::new(Semaphore::new(*voxlate::MAX_TASKS)),
    });

    // 配置服务器地址
    let addr: SocketAddr = voxlate::BIND_ADDR.parse()?;
    info!("Starting HTTP server at http://{}", addr);

    // 启动 HTTP 服务器
    match voxlate::web::start_server(ctx, addr).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            tracing::error!("Server error: {}", e);
            return Err(e);
        }
    }

    info!("Shutting down...");

    Ok(())
}
