//! System-wide constants and defaults.

/// Default size of the pool backing image (100 MiB).
pub const DEFAULT_IMAGE_SIZE: u64 = 100 * (1 << 20);

/// Smallest backing image `zpool create` accepts for a file vdev (64 MiB).
pub const MIN_IMAGE_SIZE: u64 = 64 * (1 << 20);

/// Mount policy keyword that suppresses mounting the pool's datasets.
pub const MOUNT_NONE: &str = "none";

/// Dataset created below the pool that each test case works in.
pub const ROOT_DATASET: &str = "rootds";

/// Pool administration binary.
pub const ZPOOL_BIN: &str = "zpool";

/// Dataset administration binary.
pub const ZFS_BIN: &str = "zfs";
