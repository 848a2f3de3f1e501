use bugfixer::core::ModelSettings;
use bugfixer::server::pool;
use bugfixer::utils::error::ErrorSeverity;
use bugfixer::utils::{logger, validation::Validate};
use bugfixer::{router, FixEngine, GeminiClient, HttpSettings, Result, ServerConfig};
use clap::Parser;
use std::sync::Arc;

fn start(mut config: ServerConfig) -> Result<()> {
    config.load_file()?;
    config.validate()?;

    // 金鑰缺失不影響啟動，請求時才回報錯誤
    if config.api_key().is_none() {
        tracing::error!("GEMINI_API_KEY environment variable not set; fix requests will fail");
    }
    tracing::info!("Using model {} at {}", config.model(), config.endpoint());

    let settings = HttpSettings::from(&config);
    pool::run(&config, |_| {
        let client = GeminiClient::new(&config)?;
        Ok(router(Arc::new(FixEngine::new(client)), &settings))
    })
}

fn main() {
    let config = ServerConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting bugfixer");

    if let Err(e) = start(config) {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}
