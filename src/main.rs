use burn::backend::ndarray::NdArrayDevice;
use dotenv::dotenv;
use std::env;
use strikebot::{TrainBackend, TrainConfig, TrainingSession};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn get_env_var_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|val| val.parse::<usize>().ok())
}

fn get_env_var_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|val| val.parse::<f64>().ok())
}

fn get_env_var_f32(key: &str) -> Option<f32> {
    env::var(key).ok().and_then(|val| val.parse::<f32>().ok())
}

fn get_env_var_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.parse::<u64>().ok())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("strikebot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let mut config = TrainConfig::default();
    if let Some(iterations) = get_env_var_usize("STRIKEBOT_ITERATIONS") {
        config.iterations = iterations;
    }
    if let Some(interval) = get_env_var_usize("STRIKEBOT_CHECKPOINT_INTERVAL") {
        config.checkpoint_interval = interval;
    }
    if let Some(window) = get_env_var_usize("STRIKEBOT_WINDOW_SIZE") {
        config.window_size = window;
    }
    if let Some(rate) = get_env_var_f64("STRIKEBOT_LEARNING_RATE") {
        config.learning_rate = rate;
    }
    if let Some(discount) = get_env_var_f32("STRIKEBOT_DISCOUNT_FACTOR") {
        config.discount_factor = discount;
    }
    if let Ok(path) = env::var("STRIKEBOT_CHECKPOINT_PATH") {
        config.checkpoint_path = path;
    }
    config.seed = get_env_var_u64("STRIKEBOT_SEED");

    let mut session = TrainingSession::<TrainBackend>::new(NdArrayDevice::default(), config);
    session.run()?;
    session.save_checkpoint()?;

    tracing::info!(
        "Training complete: {} episodes, avg length {:.1}",
        session.metrics().episodes(),
        session.metrics().average_length()
    );

    Ok(())
}
