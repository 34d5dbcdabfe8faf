mod init;
mod seed_admin;
mod seed_sample;
mod stats;

pub use init::cmd_init;
pub use seed_admin::cmd_seed_admin;
pub use seed_sample::{SeedReport, cmd_seed_sample_data, seed_sample_data};
pub use stats::cmd_stats;
