pub mod asr;
pub mod audio;
pub mod pipeline;
pub mod task;
pub mod translate;
pub mod utils;
pub mod web;

use std::{env, sync::Arc};
use once_cell::sync::Lazy;
use tokio::sync::Semaphore;

use pipeline::PipelineRunner;
use task::TaskRegistry;
use translate::Translator;

pub struct AppContext {
    pub registry: Arc<TaskRegistry>,
    pub runner: Arc<PipelineRunner>,
    pub translator: Arc<dyn Translator>,
    /// Admission control for /record: one permit per in-flight pipeline.
    pub record_permits: Arc<Semaphore>,
}

const VOXLATE_AUDIO_PATH: &str = "./voxlate_data/audio/";
const VOXLATE_MODEL_PATH: &str = "./models/ggml-base.en-q8_0.bin";
const VOXLATE_BIND: &str = "127.0.0.1:7200";

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) => value,
        Err(_) => dotenv::var(key).unwrap_or_else(|_| default.to_string()),
    }
}

pub static AUDIO_PATH: Lazy<String> = Lazy::new(|| env_or("VOXLATE_AUDIO_PATH", VOXLATE_AUDIO_PATH));

pub static MODEL_PATH: Lazy<String> = Lazy::new(|| env_or("VOXLATE_MODEL_PATH", VOXLATE_MODEL_PATH));

pub static BIND_ADDR: Lazy<String> = Lazy::new(|| env_or("VOXLATE_BIND", VOXLATE_BIND));

/// Maximum number of record pipelines allowed in flight at once.
pub static MAX_TASKS: Lazy<usize> = Lazy::new(|| {
    env_or("VOXLATE_MAX_TASKS", "4").parse().unwrap_or(4)
});

/// Deadline for one task's transcribe + translate work, in seconds.
pub static TASK_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
    env_or("VOXLATE_TASK_TIMEOUT_SECS", "300").parse().unwrap_or(300)
});

/// Microphone recording duration per /record request, in seconds.
pub static RECORD_SECS: Lazy<u64> = Lazy::new(|| {
    env_or("VOXLATE_RECORD_SECS", "7").parse().unwrap_or(7)
});

pub fn init_env() {
    dotenv::dotenv().ok();

    // 确保音频目录存在
    std::fs::create_dir_all(AUDIO_PATH.as_str()).unwrap_or_else(|e| {
        eprintln!("Failed to create audio directory: {}", e);
    });
}
