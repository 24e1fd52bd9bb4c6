mod fs_utils;
mod layout;
mod pins;
mod remove;
mod scatter;

pub use fs_utils::{ensure_dir, remove_dir_tree, write_file};
pub use layout::{
    local_relative_path, ProjectLayout, COLLECTION_DIR, COLLECTION_MANIFEST, PROJECT_MANIFEST,
    ROOT_MARKERS, WEB_COMPONENTS_INDEX,
};
pub use pins::{read_pin, read_pins, remove_pin, write_pin, PINS_KEY};
pub use remove::{remove, RemoveReport, RemoveRequest};
pub use scatter::{
    scatter, scatter_with_report, ScatterOutcome, ScatterReport, ScatterRequest,
    MAX_PARALLEL_DOWNLOADS,
};
