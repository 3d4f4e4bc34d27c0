pub mod best;
pub mod storage;
pub mod types;

pub use best::{BestN, BestResultItem};
pub use storage::{
    get_profiles_dir, list_profiles, load_or_create_profile, load_profile, save_profile,
    update_potential,
};
pub use types::{AddOutcome, Profile, PROFILE_VERSION};
