use petsync_reminders_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between two poller ticks. One global timer drives the
    /// whole reminder queue, there are no per-reminder timers.
    pub poll_interval_secs: u64,
    /// Maximum number of due reminders processed in one tick. Anything
    /// beyond that is picked up by the next tick.
    pub due_batch_size: i64,
    /// Endpoint of the push gateway that owns device token lookup and the
    /// actual platform push. Absent means notifications are dropped.
    pub push_gateway_url: Option<String>,
    /// Key sent to the push gateway in the `petsync-push-key` header
    pub push_gateway_key: String,
}

fn read_positive_env(var: &str, default: i64) -> i64 {
    let raw = match std::env::var(var) {
        Ok(raw) => raw,
        Err(_) => return default,
    };
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                var, raw, default
            );
            default
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let poll_interval_secs = read_positive_env("REMINDERS_POLL_INTERVAL_SECS", 60) as u64;
        let due_batch_size = read_positive_env("REMINDERS_DUE_BATCH_SIZE", 200);

        let push_gateway_url = std::env::var("PUSH_GATEWAY_URL").ok();
        let push_gateway_key = match std::env::var("PUSH_GATEWAY_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find PUSH_GATEWAY_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Key for the push gateway was generated and set to: {}", key);
                key
            }
        };

        Self {
            poll_interval_secs,
            due_batch_size,
            push_gateway_url,
            push_gateway_key,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
