use clap::Parser;
use sheet_slides::config::CliArgs;
use sheet_slides::core::{ConfigProvider, DatasetProvider};
use sheet_slides::utils::error::ErrorSeverity;
use sheet_slides::utils::{logger, validation::Validate};
use sheet_slides::{DeckEngine, SlideGenerator, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting sheet-slides");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no deck will be created");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let generator = SlideGenerator::new(config.storage(), config.image_resolver())
        .with_step_margin(config.step_margin());
    let dataset = Box::new(config.dataset());
    let engine = DeckEngine::new(generator, Box::new(config), dataset);

    match engine.run().await {
        Ok(result) => {
            println!("✅ Generated {} slides", result.slides_generated);
            println!("📁 {} ({})", result.file_name, result.file_id);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let generation = config.generation_config()?;
    let dataset = config.dataset().load_dataset().await?;

    println!("📋 Configuration Summary:");
    println!("  Template: {} (slide {})", generation.template_id, generation.template_slide_index);
    println!("  Output folder: {}", generation.output_folder_id);
    println!("  File name: {}", generation.file_name_pattern);
    println!("  Headers: {}", dataset.headers.join(", "));
    println!(
        "  Rows: {} selected of {} (from row {})",
        dataset.selected_rows, dataset.total_rows, generation.start_row
    );
    for field in &generation.image_fields {
        println!(
            "  Image #{}: {} ({:?}, {:?})",
            field.index, field.field, field.source, field.fit
        );
    }
    Ok(())
}
