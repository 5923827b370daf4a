pub mod setup_generator;
pub mod zone_classifier;

pub use setup_generator::{SetupGenerator, risk_reward, targets_clear_entry};
pub use zone_classifier::{classify, nearest_zone, try_classify, verify_zone_set};
