use anyhow::Result;
use std::path::PathBuf;

/// Fixed spatial resolution the model expects (224x224 RGB).
pub const INPUT_SIZE: usize = 224;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,

    /// Path to the serialized model artifact
    pub model_path: PathBuf,

    /// Directory uploads are spooled to before preprocessing
    pub spool_dir: PathBuf,

    /// ONNX Runtime tuning
    pub onnx_config: OnnxConfig,

    /// Server limits
    pub server_config: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// Intra-op CPU threads for the inference session
    pub intra_threads: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Maximum request body size in bytes
    pub max_request_size: usize,
}

impl Config {
    pub fn new(
        bind_addr: String,
        model_path: PathBuf,
        spool_dir: Option<PathBuf>,
        intra_threads: Option<usize>,
    ) -> Result<Self> {
        let cpu_cores = num_cpus::get();

        let onnx_config = OnnxConfig {
            intra_threads: intra_threads.unwrap_or((cpu_cores * 3 / 4).max(1)),
        };

        let server_config = ServerConfig {
            request_timeout: 60,
            max_request_size: 10 * 1024 * 1024, // 10 MiB
        };

        Ok(Self {
            bind_addr,
            model_path,
            spool_dir: spool_dir.unwrap_or_else(std::env::temp_dir),
            onnx_config,
            server_config,
        })
    }
}
