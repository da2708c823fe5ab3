pub mod filename;
pub mod filesystem;
pub mod fingerprint;
pub mod paths;
pub mod record;
